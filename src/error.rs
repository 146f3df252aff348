use thiserror::Error;

/// Crate-level error for failures that occur outside a single token's
/// resolution (adapter construction, RPC transport, malformed input).
///
/// Per-token resolution failures are not represented here; they surface as
/// [`crate::models::MetadataProcessingError`] values instead, never as this
/// type, per the pipeline's partial-failure contract.
#[derive(Error, Debug)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("dispatch error: {0}")]
    Dispatch(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("not found: {0}")]
    NotFound(String),
}

impl Error {
    /// The variant name, e.g. `"InvalidInput"` or `"Decode"`. This is the
    /// Rust-faithful analog of the reference's `e.__class__.__name__`: there
    /// is no exception class to introspect, but the error enum's discriminant
    /// plays the same role when stamping `MetadataProcessingError::error_type`.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Transport(_) => "Transport",
            Error::Decode(_) => "Decode",
            Error::Dispatch(_) => "Dispatch",
            Error::InvalidInput(_) => "InvalidInput",
            Error::Serialization(_) => "Serialization",
            Error::Http(_) => "Http",
            Error::NotFound(_) => "NotFound",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
