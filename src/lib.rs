pub mod adapters;
pub mod concurrency;
pub mod config {
    pub mod env;
}
pub mod error;
pub mod fetchers;
pub mod logging;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod web3;

pub use error::{Error, Result};
pub use models::{Attribute, MediaDetails, Metadata, MetadataOrError, MetadataProcessingError, MetadataStandard, Token};
pub use pipeline::{get_token_metadata, Pipeline, PipelineBuilder, SelectorFn};
