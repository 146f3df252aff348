//! End-to-end tests driven entirely through `data:` URIs, so no real
//! network I/O is needed: the data-URI adapter decodes inline and the
//! default RPC endpoint is never reached since every token already carries
//! its `uri`.

use async_trait::async_trait;
use base64::Engine;
use ethereum_types::U256;
use serde_json::{json, Value};

use nft_metadata_pipeline::adapters::default_registry;
use nft_metadata_pipeline::parsers::{Parser, ParserRegistry, ParserStratum};
use nft_metadata_pipeline::{Metadata, MetadataOrError, MetadataStandard, Pipeline, Token};

fn data_uri(body: &Value) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(body.to_string());
    format!("data:application/json;base64,{payload}")
}

fn token_with_uri(name: &str, uri: String) -> Token {
    let _ = name;
    Token::new(
        "0x5180db8f5c931aae63c74266b211f580155ecac8",
        U256::from(1),
        None,
        Some(uri),
    )
    .unwrap()
}

#[test]
fn ipfs_scheme_adapter_rewrites_to_a_gateway_url() {
    let registry = default_registry().unwrap();
    let adapter = registry
        .resolve("ipfs://QmSr3vdMuP2fSxWD7S26KzzBWcAN1eNhm4hk1qaR3x3vmj/1.json")
        .expect("ipfs:// should resolve to an adapter");
    let rewritten = adapter
        .rewrite("ipfs://QmSr3vdMuP2fSxWD7S26KzzBWcAN1eNhm4hk1qaR3x3vmj/1.json")
        .unwrap();
    match rewritten {
        nft_metadata_pipeline::adapters::Rewritten::Url(url) => {
            assert!(url.starts_with("https://"));
            assert!(url.ends_with("/ipfs/QmSr3vdMuP2fSxWD7S26KzzBWcAN1eNhm4hk1qaR3x3vmj/1.json"));
        }
        other => panic!("expected a rewritten url, got {other:?}"),
    }
}

#[test]
fn marketplace_standard_parser_wins_on_background_color() {
    let pipeline = Pipeline::builder().build().unwrap();
    let raw = json!({
        "name": "Nyx #1",
        "description": "A test token.",
        "background_color": "202020",
        "attributes": [
            {"trait_type": "eyes", "value": "green"},
            {"trait_type": "mouth", "value": "smile"},
            {"trait_type": "rarity", "value": 7, "display_type": "number"},
        ],
    });
    let token = token_with_uri("nyx-1", data_uri(&raw));

    let result = pipeline.fetch_token_metadata(token, None);
    let metadata = expect_metadata(result);
    assert_eq!(metadata.standard, Some(MetadataStandard::MarketplaceStandard));
    assert_eq!(metadata.name.as_deref(), Some("Nyx #1"));
    assert_eq!(metadata.attributes.len(), 3);
    let fields = metadata.additional_fields.expect("background_color promoted");
    assert!(fields.iter().any(|f| f.field_name == "background_color"));
}

#[test]
fn catchall_parser_prefers_content_mime_over_image_mime() {
    let pipeline = Pipeline::builder().build().unwrap();
    let image = data_uri_bytes("image/png", b"\x89PNG");
    let animation = data_uri_bytes("video/mp4", b"ftyp");
    let raw = json!({
        "name": "Nyx #2",
        "image": image,
        "animation_url": animation,
    });
    let token = token_with_uri("nyx-2", data_uri(&raw));

    let result = pipeline.fetch_token_metadata(token, None);
    let metadata = expect_metadata(result);
    assert_eq!(metadata.standard, Some(MetadataStandard::UnknownStandard));
    assert_eq!(metadata.mime_type.as_deref(), Some("video/mp4"));
}

fn data_uri_bytes(mime: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{payload}")
}

#[test]
fn parallel_run_preserves_input_order() {
    let pipeline = Pipeline::builder().build().unwrap();
    let tokens: Vec<Token> = (0..6)
        .map(|i| {
            let raw = json!({"name": format!("token-{i}")});
            token_with_uri(&format!("t{i}"), data_uri(&raw))
        })
        .collect();

    let results = pipeline.run(&tokens, true, None);
    assert_eq!(results.len(), tokens.len());
    for (i, result) in results.iter().enumerate() {
        let metadata = expect_metadata(result.clone());
        assert_eq!(metadata.name.as_deref(), Some(format!("token-{i}").as_str()));
    }
}

/// A parser that always fails, to exercise "a parser raising becomes a
/// captured `MetadataProcessingError`, not a panic that takes down the
/// whole batch."
struct PoisonParser;

#[async_trait]
impl Parser for PoisonParser {
    fn name(&self) -> &'static str {
        "PoisonParser"
    }

    fn stratum(&self) -> ParserStratum {
        ParserStratum::Schema
    }

    fn declared_standard(&self) -> MetadataStandard {
        MetadataStandard::UnknownStandard
    }

    fn should_parse(&self, _token: &Token, _raw_data: &Value) -> bool {
        true
    }

    fn parse(&self, _token: &Token, _raw_data: &Value) -> nft_metadata_pipeline::Result<Option<Metadata>> {
        Err(nft_metadata_pipeline::Error::InvalidInput(
            "PoisonParser always fails".into(),
        ))
    }
}

#[test]
fn a_failing_parser_is_captured_as_a_processing_error_not_a_panic() {
    let parsers = ParserRegistry::builder()
        .add(std::sync::Arc::new(PoisonParser))
        .unwrap()
        .build();
    let pipeline = Pipeline::builder().parsers(parsers).build().unwrap();

    let raw = json!({"name": "doomed"});
    let token = token_with_uri("doomed", data_uri(&raw));

    let result = pipeline.fetch_token_metadata(token, None);
    match result {
        MetadataOrError::Error(e) => {
            assert_eq!(e.error_type, "InvalidInput");
            assert!(e.error_message.contains("always fails"));
        }
        MetadataOrError::Metadata(_) => panic!("expected the poison parser's error to surface"),
    }
}

fn expect_metadata(result: MetadataOrError) -> Metadata {
    match result {
        MetadataOrError::Metadata(m) => *m,
        MetadataOrError::Error(e) => panic!("expected metadata, got error: {e:?}"),
    }
}

#[tokio::test]
async fn gen_fetch_token_metadata_resolves_the_cooperative_path() {
    let pipeline = Pipeline::builder().build().unwrap();
    let raw = json!({"name": "Nyx #3", "description": "cooperative path"});
    let token = token_with_uri("nyx-3", data_uri(&raw));

    let result = pipeline.gen_fetch_token_metadata(token, None).await;
    let metadata = expect_metadata(result);
    assert_eq!(metadata.name.as_deref(), Some("Nyx #3"));
}

#[tokio::test]
async fn gen_fetch_token_metadata_reports_a_missing_uri_as_a_processing_error() {
    let pipeline = Pipeline::builder().build().unwrap();
    let token = Token::new("0x5180db8f5c931aae63c74266b211f580155ecac8", U256::from(2), None, None).unwrap();

    let result = pipeline.gen_fetch_token_metadata(token, None).await;
    match result {
        MetadataOrError::Error(e) => {
            assert_eq!(e.error_type, "InvalidInput");
            assert!(e.error_message.contains("Token has not uri"));
        }
        MetadataOrError::Metadata(_) => panic!("expected a processing error for a uri-less token"),
    }
}

#[tokio::test]
async fn async_run_preserves_input_order() {
    let pipeline = Pipeline::builder().build().unwrap();
    let tokens: Vec<Token> = (0..4)
        .map(|i| {
            let raw = json!({"name": format!("async-token-{i}")});
            token_with_uri(&format!("a{i}"), data_uri(&raw))
        })
        .collect();

    let results = pipeline.async_run(&tokens, None).await;
    assert_eq!(results.len(), tokens.len());
    for (i, result) in results.into_iter().enumerate() {
        let metadata = expect_metadata(result);
        assert_eq!(metadata.name.as_deref(), Some(format!("async-token-{i}").as_str()));
    }
}
