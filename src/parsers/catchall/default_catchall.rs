use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::fetchers::blocking::BlockingFetcher;
use crate::fetchers::cooperative::AsyncFetcher;
use crate::models::{Metadata, MetadataStandard, Token};

use super::super::extraction::{
    build_media_details, extract_attributes, extract_content_uri, extract_description,
    extract_image_uri, extract_name, gen_build_media_details,
};
use super::super::{Parser, ParserStratum};

/// The mandatory last-resort parser: claims any token that has both a URI
/// and raw_data, and performs the canonical best-effort extraction.
pub struct DefaultCatchallParser {
    blocking_fetcher: Arc<BlockingFetcher>,
    async_fetcher: Arc<AsyncFetcher>,
}

impl DefaultCatchallParser {
    pub fn new(blocking_fetcher: Arc<BlockingFetcher>, async_fetcher: Arc<AsyncFetcher>) -> Self {
        Self {
            blocking_fetcher,
            async_fetcher,
        }
    }
}

#[async_trait]
impl Parser for DefaultCatchallParser {
    fn name(&self) -> &'static str {
        "DefaultCatchallParser"
    }

    fn stratum(&self) -> ParserStratum {
        ParserStratum::Catchall
    }

    fn declared_standard(&self) -> MetadataStandard {
        MetadataStandard::UnknownStandard
    }

    fn should_parse(&self, token: &Token, raw_data: &Value) -> bool {
        token.uri.is_some() && !raw_data.is_null()
    }

    fn parse(&self, token: &Token, raw_data: &Value) -> Result<Option<Metadata>> {
        let mut metadata = Metadata::new(token.clone(), raw_data.clone());
        metadata.standard = Some(MetadataStandard::UnknownStandard);
        metadata.name = extract_name(raw_data);
        metadata.description = extract_description(raw_data);
        metadata.attributes = extract_attributes(raw_data);

        let mut mime_type = token
            .uri
            .as_ref()
            .and_then(|uri| self.blocking_fetcher.fetch_mime_type_and_size(uri).ok())
            .and_then(|probe| probe.mime_type);

        if let Some(uri) = extract_image_uri(raw_data) {
            let details =
                build_media_details(&self.blocking_fetcher, &uri, raw_data.get("image_details"))?;
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
        metadata.standard = Some(MetadataStandard::UnknownStandard);
        metadata.name = extract_name(raw_data);
        metadata.description = extract_description(raw_data);
        metadata.attributes = extract_attributes(raw_data);

        let mut mime_type = match &token.uri {
            Some(uri) => self
                .async_fetcher
                .gen_fetch_mime_type_and_size(uri)
                .await
                .ok()
                .and_then(|probe| probe.mime_type),
            None => None,
        };

        if let Some(uri) = extract_image_uri(raw_data) {
            let details =
                gen_build_media_details(&self.async_fetcher, &uri, raw_data.get("image_details"))
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parser() -> DefaultCatchallParser {
        let adapters = Arc::new(crate::adapters::default_registry().unwrap());
        DefaultCatchallParser::new(
            Arc::new(BlockingFetcher::new(adapters.clone()).unwrap()),
            Arc::new(AsyncFetcher::new(adapters).unwrap()),
        )
    }

    fn token() -> Token {
        Token::new(
            "0x5180db8f5c931aae63c74266b211f580155ecac8",
            ethereum_types::U256::from(1),
            None,
            Some("ipfs://QmSr3/1.json".into()),
        )
        .unwrap()
    }

    #[test]
    fn should_parse_requires_uri_and_raw_data() {
        let p = parser();
        let t = token();
        assert!(p.should_parse(&t, &json!({"name": "x"})));
        let t_no_uri = Token::new(
            "0xabc",
            ethereum_types::U256::from(1),
            None,
            None,
        )
        .unwrap();
        assert!(!p.should_parse(&t_no_uri, &json!({"name": "x"})));
    }

    #[test]
    fn content_mime_takes_precedence_over_image_mime() {
        // Simulated downstream of a probe: verify the precedence wiring
        // directly on a constructed Metadata rather than over the network.
        let mut metadata = Metadata::new(token(), json!({}));
        metadata.image = Some(crate::models::MediaDetails {
            uri: "https://img".into(),
            size: None,
            sha256: None,
            mime_type: Some("image/png".into()),
        });
        metadata.content = Some(crate::models::MediaDetails {
            uri: "https://anim".into(),
            size: None,
            sha256: None,
            mime_type: Some("video/mp4".into()),
        });
        metadata.resolve_mime_type_precedence();
        assert_eq!(metadata.mime_type.as_deref(), Some("video/mp4"));
        assert_eq!(
            metadata.content.as_ref().unwrap().mime_type.as_deref(),
            Some("video/mp4")
        );
    }
}
