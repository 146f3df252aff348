use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{Error, Result};

use super::{Parser, ParserStratum};

/// Insertion-ordered, frozen-after-construction set of parsers. Exposes
/// iteration over the whole registry in dispatch order (collection, then
/// schema, then catch-all, priority-sorted within each stratum) as well as
/// per-stratum iteration.
pub struct ParserRegistry {
    parsers: Vec<Arc<dyn Parser>>,
}

impl ParserRegistry {
    pub fn builder() -> ParserRegistryBuilder {
        ParserRegistryBuilder::default()
    }

    /// Dispatch order: collection parsers, then schema parsers, then
    /// catch-all parsers, each group priority-sorted (descending) and
    /// otherwise in insertion order.
    pub fn iter_dispatch_order(&self) -> impl Iterator<Item = &Arc<dyn Parser>> {
        self.get_collection_parsers()
            .into_iter()
            .chain(self.get_schema_parsers())
            .chain(self.get_catchall_parsers())
    }

    pub fn get_all(&self) -> Vec<&Arc<dyn Parser>> {
        self.iter_dispatch_order().collect()
    }

    pub fn get_collection_parsers(&self) -> Vec<&Arc<dyn Parser>> {
        self.stratum_sorted(ParserStratum::Collection)
    }

    pub fn get_schema_parsers(&self) -> Vec<&Arc<dyn Parser>> {
        self.stratum_sorted(ParserStratum::Schema)
    }

    pub fn get_catchall_parsers(&self) -> Vec<&Arc<dyn Parser>> {
        self.stratum_sorted(ParserStratum::Catchall)
    }

    fn stratum_sorted(&self, stratum: ParserStratum) -> Vec<&Arc<dyn Parser>> {
        let mut matching: Vec<&Arc<dyn Parser>> = self
            .parsers
            .iter()
            .filter(|p| p.stratum() == stratum)
            .collect();
        // `sort_by_key` is stable, so insertion order is preserved among
        // parsers sharing the same priority.
        matching.sort_by_key(|p| std::cmp::Reverse(p.priority()));
        matching
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

#[derive(Default)]
pub struct ParserRegistryBuilder {
    parsers: Vec<Arc<dyn Parser>>,
}

impl ParserRegistryBuilder {
    pub fn add(mut self, parser: Arc<dyn Parser>) -> Result<Self> {
        validate(&self.parsers, parser.as_ref())?;
        self.parsers.push(parser);
        Ok(self)
    }

    pub fn build(self) -> ParserRegistry {
        ParserRegistry {
            parsers: self.parsers,
        }
    }
}

fn validate(existing: &[Arc<dyn Parser>], parser: &dyn Parser) -> Result<()> {
    let names: HashSet<&str> = existing.iter().map(|p| p.name()).collect();
    if names.contains(parser.name()) {
        return Err(Error::InvalidInput(format!(
            "duplicate parser registration: {}",
            parser.name()
        )));
    }
    if parser.stratum() == ParserStratum::Collection && parser.collection_addresses().is_empty() {
        return Err(Error::InvalidInput(format!(
            "collection parser '{}' must declare a non-empty address list",
            parser.name()
        )));
    }
    Ok(())
}
