pub mod blocking;
pub mod cooperative;

pub use blocking::BlockingFetcher;
pub use cooperative::AsyncFetcher;

/// Result of `fetch_mime_type_and_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeAndSize {
    pub mime_type: Option<String>,
    pub size: u64,
}

/// Result of `fetch_content`: the body decoded as JSON if it looked like a
/// JSON object, otherwise the raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedContent {
    Json(serde_json::Value),
    Text(String),
}

impl FetchedContent {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    /// Normalize to a `serde_json::Value`, the shape parsers operate on:
    /// text bodies become a bare JSON string.
    pub fn into_value(self) -> serde_json::Value {
        match self {
            Self::Json(v) => v,
            Self::Text(s) => serde_json::Value::String(s),
        }
    }
}

/// Strip `content-type` parameters, e.g. `application/json; charset=utf-8`
/// becomes `application/json`.
pub fn strip_content_type_params(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_string()
}

/// JSON-vs-text body detection: a body is decoded as JSON only if it looks
/// like a JSON object (starts with `{`); everything else, including JSON
/// arrays or scalars, is returned verbatim as text -- this matches the
/// reference fetcher's narrower-than-`serde_json` heuristic.
pub fn classify_body(bytes: &[u8]) -> FetchedContent {
    let text = String::from_utf8_lossy(bytes).into_owned();
    if text.trim_start().starts_with('{') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
            return FetchedContent::Json(value);
        }
    }
    FetchedContent::Text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_charset_parameter() {
        assert_eq!(
            strip_content_type_params("application/json; charset=utf-8"),
            "application/json"
        );
    }

    #[test]
    fn classifies_json_object_body() {
        let body = br#"{"name":"nyx"}"#;
        match classify_body(body) {
            FetchedContent::Json(v) => assert_eq!(v["name"], "nyx"),
            FetchedContent::Text(_) => panic!("expected json"),
        }
    }

    #[test]
    fn classifies_non_object_body_as_text() {
        match classify_body(b"just some text") {
            FetchedContent::Text(s) => assert_eq!(s, "just some text"),
            FetchedContent::Json(_) => panic!("expected text"),
        }
    }
}
