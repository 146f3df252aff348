use serde::{Deserialize, Serialize};

/// Descriptor for a single media resource (image or animation/content).
/// `sha256` is typically left unset by this system; it exists so a producer
/// that has already hashed the content can carry the digest through.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaDetails {
    pub uri: String,
    pub size: Option<u64>,
    pub sha256: Option<String>,
    pub mime_type: Option<String>,
}

impl MediaDetails {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            size: None,
            sha256: None,
            mime_type: None,
        }
    }
}
