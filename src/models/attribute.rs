use serde::{Deserialize, Serialize};

/// A trait/value pair describing one facet of a token. `value` is always
/// stringified, regardless of the JSON type it came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attribute {
    pub trait_type: Option<String>,
    pub value: Option<String>,
    pub display_type: Option<String>,
}

impl Attribute {
    pub fn new(
        trait_type: Option<String>,
        value: Option<String>,
        display_type: Option<String>,
    ) -> Self {
        Self {
            trait_type,
            value,
            display_type,
        }
    }

    /// Stringify a raw JSON value the way the canonical extraction does:
    /// strings pass through unquoted, everything else uses its JSON text.
    pub fn stringify(value: &serde_json::Value) -> Option<String> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
