use ethereum_types::U256;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DEFAULT_CHAIN_IDENTIFIER: &str = "ETHEREUM-MAINNET";

/// Identity triple for an NFT, plus an optionally resolved metadata URI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub chain_identifier: String,
    pub collection_address: String,
    #[serde(with = "u256_decimal")]
    pub token_id: U256,
    pub uri: Option<String>,
}

impl Token {
    pub fn new(
        collection_address: impl Into<String>,
        token_id: U256,
        chain_identifier: Option<String>,
        uri: Option<String>,
    ) -> Result<Self> {
        let chain_identifier = chain_identifier.unwrap_or_else(|| DEFAULT_CHAIN_IDENTIFIER.to_string());
        if !chain_identifier_is_valid(&chain_identifier) {
            return Err(Error::InvalidInput(format!(
                "chain_identifier '{chain_identifier}' does not match ^[A-Z]+-[A-Z]+$"
            )));
        }
        let uri = uri.map(|u| normalize_data_uri(&u)).transpose()?;
        Ok(Self {
            chain_identifier,
            collection_address: collection_address.into(),
            token_id,
            uri,
        })
    }

    pub fn with_uri(&self, uri: Option<String>) -> Result<Self> {
        Self::new(
            self.collection_address.clone(),
            self.token_id,
            Some(self.chain_identifier.clone()),
            uri,
        )
    }

    pub fn collection_address_matches(&self, other: &str) -> bool {
        self.collection_address.eq_ignore_ascii_case(other)
    }
}

/// `^[A-Z]+-[A-Z]+$`: one or more uppercase ASCII letters, a single hyphen,
/// one or more uppercase ASCII letters, nothing else.
fn chain_identifier_is_valid(s: &str) -> bool {
    let Some((left, right)) = s.split_once('-') else {
        return false;
    };
    if right.contains('-') {
        return false;
    }
    !left.is_empty()
        && !right.is_empty()
        && left.bytes().all(|b| b.is_ascii_uppercase())
        && right.bytes().all(|b| b.is_ascii_uppercase())
}

const DATA_JSON_PREFIX: &str = "data:application/json;base64,";

/// If `uri` is a `data:application/json;base64,` URI, decode it; if the
/// decoded bytes do not parse as JSON, re-escape non-ASCII bytes as `\xNN`
/// and re-encode, byte-exact with the original producer's workaround.
/// Any other URI form passes through unchanged.
fn normalize_data_uri(uri: &str) -> Result<String> {
    let Some(payload) = uri.strip_prefix(DATA_JSON_PREFIX) else {
        return Ok(uri.to_string());
    };
    let decoded = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, payload)
        .map_err(|e| Error::Decode(format!("invalid base64 in data uri: {e}")))?;
    if serde_json::from_slice::<serde_json::Value>(&decoded).is_ok() {
        return Ok(uri.to_string());
    }
    let escaped = escape_non_ascii(&decoded);
    let re_encoded =
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, escaped);
    Ok(format!("{DATA_JSON_PREFIX}{re_encoded}"))
}

/// Replace every byte `>= 0x80` with a literal `\xNN` escape sequence;
/// ASCII bytes pass through untouched.
fn escape_non_ascii(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        if b < 0x80 {
            out.push(b);
        } else {
            out.extend(format!("\\x{b:02x}").into_bytes());
        }
    }
    out
}

mod u256_decimal {
    use ethereum_types::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &U256, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<U256, D::Error> {
        let s = String::deserialize(d)?;
        U256::from_dec_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chain_identifier_is_accepted() {
        let token = Token::new("0xabc", U256::from(1), None, None).unwrap();
        assert_eq!(token.chain_identifier, "ETHEREUM-MAINNET");
    }

    #[test]
    fn lowercase_chain_identifier_is_rejected() {
        let err = Token::new("0xabc", U256::from(1), Some("ethereum-mainnet".into()), None);
        assert!(err.is_err());
    }

    #[test]
    fn chain_identifier_without_hyphen_is_rejected() {
        let err = Token::new("0xabc", U256::from(1), Some("ETHEREUMMAINNET".into()), None);
        assert!(err.is_err());
    }

    #[test]
    fn chain_identifier_with_extra_chars_is_rejected() {
        let err = Token::new("0xabc", U256::from(1), Some("aETHEREUM-MAINNETa".into()), None);
        assert!(err.is_err());
    }

    #[test]
    fn token_id_accepts_256_bit_values() {
        let big = U256::from_dec_str(
            "115792089237316195423570985008687907853269984665640564039457584007913129639935",
        )
        .unwrap();
        let token = Token::new("0xabc", big, None, None).unwrap();
        assert_eq!(token.token_id, big);
    }

    #[test]
    fn valid_json_data_uri_is_preserved_verbatim() {
        let json = br#"{"name":"nyx"}"#;
        let b64 = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, json);
        let uri = format!("data:application/json;base64,{b64}");
        let token = Token::new("0xabc", U256::from(1), None, Some(uri.clone())).unwrap();
        assert_eq!(token.uri.unwrap(), uri);
    }

    #[test]
    fn non_json_data_uri_is_reescaped_and_differs() {
        let raw = vec![0x7b, 0xffu8, 0x7d]; // "{" 0xFF "}" -- not valid JSON or UTF-8
        let b64 = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &raw);
        let uri = format!("data:application/json;base64,{b64}");
        let token = Token::new("0xabc", U256::from(1), None, Some(uri.clone())).unwrap();
        let stored = token.uri.unwrap();
        assert_ne!(stored, uri);
        assert!(stored.starts_with(DATA_JSON_PREFIX));
    }

    #[test]
    fn collection_address_match_is_case_insensitive() {
        let token = Token::new("0xABC123", U256::from(1), None, None).unwrap();
        assert!(token.collection_address_matches("0xabc123"));
    }
}
