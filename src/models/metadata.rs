use serde::{Deserialize, Serialize};

use super::attribute::Attribute;
use super::media::MediaDetails;
use super::metadata_field::MetadataField;
use super::token::Token;

/// Tags which stratum produced a `Metadata` record. Collection parsers may
/// clear this back to `None` if they don't want to claim a standard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetadataStandard {
    CollectionStandard,
    MarketplaceStandard,
    UnknownStandard,
}

/// The canonical, normalized output of resolving one token's off-chain data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    pub token: Token,
    pub raw_data: serde_json::Value,
    pub standard: Option<MetadataStandard>,
    pub attributes: Vec<Attribute>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub mime_type: Option<String>,
    pub image: Option<MediaDetails>,
    pub content: Option<MediaDetails>,
    pub additional_fields: Option<Vec<MetadataField>>,
}

impl Metadata {
    pub fn new(token: Token, raw_data: serde_json::Value) -> Self {
        Self {
            token,
            raw_data,
            standard: None,
            attributes: Vec::new(),
            name: None,
            description: None,
            mime_type: None,
            image: None,
            content: None,
            additional_fields: None,
        }
    }

    /// `mime_type` precedence: content's MIME > image's MIME > the probed
    /// URI's own MIME. Call after `image`/`content` are populated.
    pub fn resolve_mime_type_precedence(&mut self) {
        if let Some(image) = &self.image {
            if let Some(mime) = &image.mime_type {
                self.mime_type = Some(mime.clone());
            }
        }
        if let Some(content) = &self.content {
            if let Some(mime) = &content.mime_type {
                self.mime_type = Some(mime.clone());
            }
        }
    }
}
