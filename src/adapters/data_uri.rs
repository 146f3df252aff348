use crate::error::{Error, Result};

use super::{Rewritten, SchemeAdapter};

/// Decodes `data:` URIs inline (RFC 2397), with no network I/O.
pub struct DataUriAdapter {
    mount_prefixes: Vec<String>,
}

impl DataUriAdapter {
    pub fn new() -> Self {
        Self {
            mount_prefixes: vec!["data:".into()],
        }
    }
}

impl Default for DataUriAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemeAdapter for DataUriAdapter {
    fn mount_prefixes(&self) -> &[String] {
        &self.mount_prefixes
    }

    fn rewrite(&self, uri: &str) -> Result<Rewritten> {
        decode_data_url(uri)
    }
}

/// `data:<mime>;base64,<payload>` decodes the base64 payload; any other
/// `data:...,<payload>` form returns the payload bytes verbatim.
pub fn decode_data_url(uri: &str) -> Result<Rewritten> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidInput(format!("not a data uri: {uri}")))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidInput(format!("malformed data uri: {uri}")))?;

    if let Some(mime) = meta.strip_suffix(";base64") {
        let bytes = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, payload)
            .map_err(|e| Error::Decode(format!("invalid base64 in data uri: {e}")))?;
        let mime_type = if mime.is_empty() {
            None
        } else {
            Some(mime.to_string())
        };
        Ok(Rewritten::Inline {
            bytes,
            mime_type,
        })
    } else {
        let mime_type = if meta.is_empty() {
            None
        } else {
            Some(meta.to_string())
        };
        Ok(Rewritten::Inline {
            bytes: payload.as_bytes().to_vec(),
            mime_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_json_payload() {
        let json = br#"{"name":"nyx"}"#;
        let b64 = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, json);
        let uri = format!("data:application/json;base64,{b64}");
        match decode_data_url(&uri).unwrap() {
            Rewritten::Inline { bytes, mime_type } => {
                assert_eq!(bytes, json);
                assert_eq!(mime_type.as_deref(), Some("application/json"));
            }
            Rewritten::Url(_) => panic!("expected inline decode"),
        }
    }

    #[test]
    fn passes_through_non_base64_payload_verbatim() {
        let uri = "data:text/plain,hello%20world";
        match decode_data_url(uri).unwrap() {
            Rewritten::Inline { bytes, .. } => {
                assert_eq!(bytes, b"hello%20world");
            }
            Rewritten::Url(_) => panic!("expected inline decode"),
        }
    }
}
