use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::fetchers::blocking::BlockingFetcher;
use crate::fetchers::cooperative::AsyncFetcher;
use crate::models::{Metadata, MetadataField, MetadataFieldType, MetadataStandard, Token};

use super::super::extraction::{
    build_media_details, extract_attributes, extract_content_uri, extract_description,
    extract_name, gen_build_media_details,
};
use super::super::{Parser, ParserStratum};

/// Matches the marketplace metadata shape popularized by OpenSea: a flat
/// JSON object carrying `background_color`/`youtube_url` alongside the
/// usual `name`/`description`/`attributes`/`image`.
pub struct MarketplaceStandardParser {
    blocking_fetcher: Arc<BlockingFetcher>,
    async_fetcher: Arc<AsyncFetcher>,
}

impl MarketplaceStandardParser {
    pub fn new(blocking_fetcher: Arc<BlockingFetcher>, async_fetcher: Arc<AsyncFetcher>) -> Self {
        Self {
            blocking_fetcher,
            async_fetcher,
        }
    }
}

fn image_uri(raw: &Value) -> Option<String> {
    for key in ["image", "image_data"] {
        if let Some(s) = raw.get(key).and_then(Value::as_str) {
            return Some(s.to_string());
        }
    }
    None
}

fn additional_fields(raw: &Value) -> Option<Vec<MetadataField>> {
    let mut fields = Vec::new();
    if let Some(v) = raw.get("external_url").and_then(Value::as_str) {
        fields.push(MetadataField::new(
            "external_url",
            MetadataFieldType::Text,
            Some("This is the URL that will appear below the asset's image on OpenSea and will allow users to leave OpenSea and view the item on the site.".into()),
            Some(v.to_string()),
        ));
    }
    if let Some(v) = raw.get("background_color") {
        fields.push(MetadataField::new(
            "background_color",
            MetadataFieldType::Text,
            Some("Background color of the item on OpenSea. Must be a six-character hexadecimal without a pre-pended #.".into()),
            crate::models::Attribute::stringify(v),
        ));
    }
    if let Some(v) = raw.get("animation_url").and_then(Value::as_str) {
        fields.push(MetadataField::new(
            "animation_url",
            MetadataFieldType::Text,
            Some("A URL to a multi-media attachment for the item.".into()),
            Some(v.to_string()),
        ));
    }
    if let Some(v) = raw.get("youtube_url").and_then(Value::as_str) {
        fields.push(MetadataField::new(
            "youtube_url",
            MetadataFieldType::Text,
            Some("A URL to a YouTube video.".into()),
            Some(v.to_string()),
        ));
    }
    if fields.is_empty() {
        None
    } else {
        Some(fields)
    }
}

#[async_trait]
impl Parser for MarketplaceStandardParser {
    fn name(&self) -> &'static str {
        "MarketplaceStandardParser"
    }

    fn stratum(&self) -> ParserStratum {
        ParserStratum::Schema
    }

    fn declared_standard(&self) -> MetadataStandard {
        MetadataStandard::MarketplaceStandard
    }

    fn should_parse(&self, _token: &Token, raw_data: &Value) -> bool {
        raw_data.get("background_color").map(|v| !v.is_null()).unwrap_or(false)
            || raw_data.get("youtube_url").map(|v| !v.is_null()).unwrap_or(false)
    }

    fn parse(&self, token: &Token, raw_data: &Value) -> Result<Option<Metadata>> {
        let mut metadata = Metadata::new(token.clone(), raw_data.clone());
        metadata.standard = Some(MetadataStandard::MarketplaceStandard);
        metadata.name = extract_name(raw_data);
        metadata.description = extract_description(raw_data);
        metadata.attributes = extract_attributes(raw_data);
        metadata.additional_fields = additional_fields(raw_data);

        let mut mime_type = token
            .uri
            .as_ref()
            .and_then(|uri| self.blocking_fetcher.fetch_mime_type_and_size(uri).ok())
            .and_then(|probe| probe.mime_type);

        if let Some(uri) = image_uri(raw_data) {
            let details = build_media_details(
                &self.blocking_fetcher,
                &uri,
                raw_data.get("image_details"),
            )?;
            if let Some(m) = &details.mime_type {
                mime_type = Some(m.clone());
            }
            metadata.image = Some(details);
        }

        if let Some(uri) = extract_content_uri(raw_data) {
            let details = build_media_details(
                &self.blocking_fetcher,
                &uri,
                raw_data.get("animation_details"),
            )?;
            if let Some(m) = &details.mime_type {
                mime_type = Some(m.clone());
            }
            metadata.content = Some(details);
        }

        metadata.mime_type = mime_type;
        Ok(Some(metadata))
    }

    async fn gen_parse(&self, token: &Token, raw_data: &Value) -> Result<Option<Metadata>> {
        let mut metadata = Metadata::new(token.clone(), raw_data.clone());
        metadata.standard = Some(MetadataStandard::MarketplaceStandard);
        metadata.name = extract_name(raw_data);
        metadata.description = extract_description(raw_data);
        metadata.attributes = extract_attributes(raw_data);
        metadata.additional_fields = additional_fields(raw_data);

        let mut mime_type = match &token.uri {
            Some(uri) => self
                .async_fetcher
                .gen_fetch_mime_type_and_size(uri)
                .await
                .ok()
                .and_then(|probe| probe.mime_type),
            None => None,
        };

        if let Some(uri) = image_uri(raw_data) {
            let details = gen_build_media_details(
                &self.async_fetcher,
                &uri,
                raw_data.get("image_details"),
            )
            .await?;
            if let Some(m) = &details.mime_type {
                mime_type = Some(m.clone());
            }
            metadata.image = Some(details);
        }

        if let Some(uri) = extract_content_uri(raw_data) {
            let details = gen_build_media_details(
                &self.async_fetcher,
                &uri,
                raw_data.get("animation_details"),
            )
            .await?;
            if let Some(m) = &details.mime_type {
                mime_type = Some(m.clone());
            }
            metadata.content = Some(details);
        }

        metadata.mime_type = mime_type;
        Ok(Some(metadata))
    }
}
