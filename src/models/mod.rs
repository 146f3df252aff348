pub mod attribute;
pub mod media;
pub mod metadata;
pub mod metadata_field;
pub mod processing_error;
pub mod token;

pub use attribute::Attribute;
pub use media::MediaDetails;
pub use metadata::{Metadata, MetadataStandard};
pub use metadata_field::{MetadataField, MetadataFieldType};
pub use processing_error::{MetadataOrError, MetadataProcessingError};
pub use token::Token;
