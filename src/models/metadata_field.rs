use serde::{Deserialize, Serialize};

/// A typed extra field for collection-specific data that does not fit the
/// canonical `Metadata` shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetadataFieldType {
    Boolean,
    List,
    Number,
    Object,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataField {
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: MetadataFieldType,
    pub description: Option<String>,
    pub value: Option<String>,
}

impl MetadataField {
    pub fn new(
        field_name: impl Into<String>,
        field_type: MetadataFieldType,
        description: Option<String>,
        value: Option<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            field_type,
            description,
            value,
        }
    }
}
