use serde::{Deserialize, Serialize};

use super::token::Token;

/// A first-class error result returned in place of `Metadata` for a token
/// that could not be resolved. Never surfaced as a Rust `Error`/panic —
/// the pipeline always returns this as data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataProcessingError {
    pub token: Token,
    pub error_type: String,
    pub error_message: String,
}

impl MetadataProcessingError {
    pub fn new(token: Token, error_type: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            token,
            error_type: error_type.into(),
            error_message: error_message.into(),
        }
    }

    /// Build from any crate error. `error_type` is the error's own variant
    /// discriminant (`Error::kind()`), the Rust analog of the reference's
    /// `e.__class__.__name__` -- never a caller-supplied stage label or
    /// parser name.
    pub fn from_error(token: Token, err: &crate::error::Error) -> Self {
        Self::new(token, err.kind(), err.to_string())
    }

    pub fn no_parsers_found(token: Token) -> Self {
        Self::new(token, "NoParsersFound", "No parsers found.")
    }
}

/// Either the pipeline succeeded for a token, or it didn't -- there is no
/// third state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MetadataOrError {
    Metadata(Box<super::metadata::Metadata>),
    Error(MetadataProcessingError),
}

impl MetadataOrError {
    pub fn metadata(m: super::metadata::Metadata) -> Self {
        Self::Metadata(Box::new(m))
    }

    pub fn is_metadata(&self) -> bool {
        matches!(self, Self::Metadata(_))
    }

    pub fn as_metadata(&self) -> Option<&super::metadata::Metadata> {
        match self {
            Self::Metadata(m) => Some(m),
            Self::Error(_) => None,
        }
    }
}
