pub mod arweave;
pub mod data_uri;
pub mod http;
pub mod ipfs;

use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};

/// What an adapter does with a logical URI: either rewrite it into a
/// concrete HTTP(S) URL for the caller to `HEAD`/`GET`, or decode it inline
/// with no network I/O at all (the `data:` adapter).
#[derive(Debug, Clone)]
pub enum Rewritten {
    Url(String),
    Inline {
        bytes: Vec<u8>,
        mime_type: Option<String>,
    },
}

/// A scheme-specific URI rewriter. Adapters are stateless beyond their own
/// configuration and safe to share across worker threads or cooperative
/// tasks.
pub trait SchemeAdapter: Send + Sync {
    fn mount_prefixes(&self) -> &[String];
    fn rewrite(&self, uri: &str) -> Result<Rewritten>;
}

/// Per-adapter connection/retry/timeout knobs, mirroring the reference
/// `AdapterConfig` kwargs (`pool_connections`, `pool_maxsize`, `max_retries`,
/// `timeout`).
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub host_prefixes: Vec<String>,
    pub pool_connections: usize,
    pub pool_maxsize: usize,
    pub max_retries: u32,
    pub timeout: Duration,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            host_prefixes: Vec::new(),
            pool_connections: 100,
            pool_maxsize: 1000,
            max_retries: 0,
            timeout: crate::config::env::default_http_timeout(),
        }
    }
}

/// `(prefix -> adapter)` bindings, frozen after construction. Selection
/// always chooses the longest matching prefix, mirroring a `requests`
/// session's `mount()` dispatch.
pub struct AdapterRegistry {
    bindings: Vec<(String, Arc<dyn SchemeAdapter>)>,
}

impl AdapterRegistry {
    pub fn builder() -> AdapterRegistryBuilder {
        AdapterRegistryBuilder::default()
    }

    pub fn resolve(&self, uri: &str) -> Option<&Arc<dyn SchemeAdapter>> {
        self.bindings
            .iter()
            .find(|(prefix, _)| uri.starts_with(prefix.as_str()))
            .map(|(_, adapter)| adapter)
    }
}

#[derive(Default)]
pub struct AdapterRegistryBuilder {
    bindings: Vec<(String, Arc<dyn SchemeAdapter>)>,
}

impl AdapterRegistryBuilder {
    pub fn mount(mut self, adapter: Arc<dyn SchemeAdapter>) -> Self {
        for prefix in adapter.mount_prefixes() {
            self.bindings.push((prefix.clone(), adapter.clone()));
        }
        self
    }

    pub fn build(mut self) -> Result<AdapterRegistry> {
        if self.bindings.is_empty() {
            return Err(Error::InvalidInput("adapter registry has no bindings".into()));
        }
        // Longest prefix first so `resolve`'s linear scan finds the most
        // specific match, e.g. `https://gateway.pinata.cloud/` over `https://`.
        self.bindings.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(AdapterRegistry {
            bindings: self.bindings,
        })
    }
}

/// Build the default adapter set: IPFS, Arweave, data URIs, and a
/// pass-through HTTP(S) fallback -- the same four transports the pipeline
/// wires up when no caller-supplied adapter list is given.
pub fn default_registry() -> Result<AdapterRegistry> {
    let ipfs_gateways = crate::config::env::default_ipfs_gateways();
    let arweave_gateway = crate::config::env::default_arweave_gateway();

    AdapterRegistry::builder()
        .mount(Arc::new(ipfs::IpfsAdapter::new(
            vec!["ipfs://".into(), "https://ipfs.io/".into()],
            ipfs_gateways,
        )?))
        .mount(Arc::new(arweave::ArweaveAdapter::new(
            vec!["ar://".into()],
            arweave_gateway,
        )))
        .mount(Arc::new(data_uri::DataUriAdapter::new()))
        .mount(Arc::new(http::HttpAdapter::new(vec![
            "https://".into(),
            "http://".into(),
        ])))
        .build()
}
