pub mod catchall;
pub mod collection;
pub mod extraction;
pub mod registry;
pub mod schema;

pub use registry::ParserRegistry;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Metadata, MetadataStandard, Token};

/// Which stratum a parser belongs to; dispatch always tries collection
/// parsers first, then schema parsers, then catch-all parsers last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserStratum {
    Collection,
    Schema,
    Catchall,
}

/// Breaks ties within a stratum; most parsers are `Normal`. Registry
/// iteration sorts by priority (descending) before falling back to
/// insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Normal,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

/// A format-specific or collection-specific interpreter that maps a raw
/// fetched payload into the canonical `Metadata` shape.
///
/// Implementations must be re-entrant: the pipeline constructs one instance
/// per parser and shares it across every worker thread or cooperative task.
#[async_trait]
pub trait Parser: Send + Sync {
    /// Stable identifier used for duplicate-registration checks. Not the
    /// same as the `standard` tag, which may be shared across parsers.
    fn name(&self) -> &'static str;

    fn stratum(&self) -> ParserStratum;

    /// The `standard` this parser stamps onto a successful result. Collection
    /// parsers may still clear `Metadata::standard` back to `None` at parse
    /// time if they choose to.
    fn declared_standard(&self) -> MetadataStandard;

    /// Non-empty only for collection parsers; the registry rejects a
    /// collection parser with an empty list.
    fn collection_addresses(&self) -> &[String] {
        &[]
    }

    fn priority(&self) -> Priority {
        Priority::default()
    }

    fn should_parse(&self, token: &Token, raw_data: &serde_json::Value) -> bool;

    fn parse(&self, token: &Token, raw_data: &serde_json::Value) -> Result<Option<Metadata>>;

    async fn gen_parse(&self, token: &Token, raw_data: &serde_json::Value) -> Result<Option<Metadata>> {
        // Default cooperative twin just defers to the synchronous parse --
        // correct for every shipped parser, since none of them perform their
        // own network I/O beyond what the fetcher already did.
        self.parse(token, raw_data)
    }
}
