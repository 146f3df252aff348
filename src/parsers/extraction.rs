//! The canonical catch-all extraction algorithm: the best-effort mapping
//! from an arbitrary JSON payload to the canonical `Metadata` shape that
//! every schema parser and the catch-all parser converge on when no
//! collection-specific logic applies.

use serde_json::Value;

use crate::error::Result;
use crate::fetchers::{blocking::BlockingFetcher, cooperative::AsyncFetcher};
use crate::models::{Attribute, MediaDetails};

pub fn extract_name(raw: &Value) -> Option<String> {
    raw.get("name").and_then(Value::as_str).map(str::to_string)
}

pub fn extract_description(raw: &Value) -> Option<String> {
    raw.get("description")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Union of three possible attribute sources: `properties` (object keyed by
/// trait name), `attributes` (array), `traits` (array, same shape as
/// `attributes`). A missing source contributes nothing.
pub fn extract_attributes(raw: &Value) -> Vec<Attribute> {
    let mut out = Vec::new();

    if let Some(props) = raw.get("properties").and_then(Value::as_object) {
        for (key, value) in props {
            if let Some(s) = value.as_str() {
                out.push(Attribute::new(Some(key.clone()), Some(s.to_string()), None));
            } else if let Some(obj) = value.as_object() {
                out.push(Attribute::new(
                    Some(key.clone()),
                    obj.get("description").and_then(Value::as_str).map(str::to_string),
                    obj.get("type").and_then(Value::as_str).map(str::to_string),
                ));
            }
        }
    }

    for list_key in ["attributes", "traits"] {
        if let Some(entries) = raw.get(list_key).and_then(Value::as_array) {
            for entry in entries {
                let trait_type = entry
                    .get("trait_type")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let value = entry.get("value").and_then(Attribute::stringify);
                let display_type = entry
                    .get("display_type")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                out.push(Attribute::new(trait_type, value, display_type));
            }
        }
    }

    out
}

pub fn extract_image_uri(raw: &Value) -> Option<String> {
    for key in ["image", "image_url", "imageUrl"] {
        if let Some(s) = raw.get(key).and_then(Value::as_str) {
            return Some(s.to_string());
        }
    }
    None
}

pub fn extract_content_uri(raw: &Value) -> Option<String> {
    for key in ["animation_url", "animation"] {
        if let Some(s) = raw.get(key).and_then(Value::as_str) {
            return Some(s.to_string());
        }
    }
    None
}

/// `image_details`/`animation_details` override `size`/`sha256` on an
/// already-probed `MediaDetails`, if present.
pub fn apply_details_override(details: &mut MediaDetails, override_obj: Option<&Value>) {
    let Some(obj) = override_obj.and_then(Value::as_object) else {
        return;
    };
    if let Some(size) = obj.get("size").and_then(Value::as_u64) {
        details.size = Some(size);
    }
    if let Some(sha256) = obj.get("sha256").and_then(Value::as_str) {
        details.sha256 = Some(sha256.to_string());
    }
}

/// Probe a media URI's MIME type and size, then let a declared
/// `image_details`/`animation_details` object override `size`/`sha256`.
///
/// A probe failure is silenced: it yields a `MediaDetails` with `uri` set
/// and no mime/size rather than failing the whole parse, matching the
/// reference's swallow-media-probe-errors behavior.
pub fn build_media_details(
    fetcher: &BlockingFetcher,
    uri: &str,
    override_obj: Option<&Value>,
) -> Result<MediaDetails> {
    let mut details = MediaDetails::new(uri);
    if let Ok(probed) = fetcher.fetch_mime_type_and_size(uri) {
        details.mime_type = probed.mime_type;
        details.size = Some(probed.size);
    }
    apply_details_override(&mut details, override_obj);
    Ok(details)
}

pub async fn gen_build_media_details(
    fetcher: &AsyncFetcher,
    uri: &str,
    override_obj: Option<&Value>,
) -> Result<MediaDetails> {
    let mut details = MediaDetails::new(uri);
    if let Ok(probed) = fetcher.gen_fetch_mime_type_and_size(uri).await {
        details.mime_type = probed.mime_type;
        details.size = Some(probed.size);
    }
    apply_details_override(&mut details, override_obj);
    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_attributes_from_all_three_shapes() {
        let raw = json!({
            "properties": {"background": "blue"},
            "attributes": [{"trait_type": "eyes", "value": "green"}],
            "traits": [{"trait_type": "mouth", "value": "smile", "display_type": "string"}],
        });
        let attrs = extract_attributes(&raw);
        assert_eq!(attrs.len(), 3);
        assert!(attrs.iter().any(|a| a.trait_type.as_deref() == Some("background")));
        assert!(attrs.iter().any(|a| a.trait_type.as_deref() == Some("eyes")));
        assert!(attrs.iter().any(|a| a.trait_type.as_deref() == Some("mouth")));
    }

    #[test]
    fn image_uri_prefers_image_key_over_aliases() {
        let raw = json!({"image": "https://a", "image_url": "https://b"});
        assert_eq!(extract_image_uri(&raw).as_deref(), Some("https://a"));
    }

    #[test]
    fn details_override_replaces_size_and_sha256() {
        let mut details = MediaDetails::new("https://x");
        details.size = Some(10);
        apply_details_override(&mut details, Some(&json!({"size": 99, "sha256": "abc"})));
        assert_eq!(details.size, Some(99));
        assert_eq!(details.sha256.as_deref(), Some("abc"));
    }
}
