pub mod convenience;

pub use convenience::get_token_metadata;

use std::sync::Arc;

use ethabi::{ParamType, Token as AbiToken};

use crate::adapters::AdapterRegistry;
use crate::concurrency::worker_pool_size;
use crate::config::env::{rpc_provider_url, worker_pool_chunk_size};
use crate::error::{Error, Result};
use crate::fetchers::{AsyncFetcher, BlockingFetcher};
use crate::models::{MetadataOrError, MetadataProcessingError, Token};
use crate::parsers::catchall::DefaultCatchallParser;
use crate::parsers::schema::MarketplaceStandardParser;
use crate::parsers::{Parser, ParserRegistry};
use crate::web3::ContractCaller;

/// A caller-supplied tiebreaker over the accumulated candidates for one
/// token (a mix of `Metadata` and `MetadataProcessingError`); its contract
/// is to return exactly one.
pub type SelectorFn = dyn Fn(&[MetadataOrError]) -> MetadataOrError + Send + Sync;

const DEFAULT_TOKEN_URI_SIGNATURE: &str = "tokenURI(uint256)";

/// The batch orchestrator: resolves a URI (on-chain read if absent),
/// fetches the off-chain document, dispatches it through the parser set,
/// and returns a `Metadata` or `MetadataProcessingError` for each input
/// token.
pub struct Pipeline {
    fetcher: Arc<BlockingFetcher>,
    async_fetcher: Arc<AsyncFetcher>,
    contract_caller: Arc<ContractCaller>,
    parsers: Arc<ParserRegistry>,
}

pub struct PipelineBuilder {
    adapters: Option<AdapterRegistry>,
    contract_caller: Option<ContractCaller>,
    parsers: Option<ParserRegistry>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            adapters: None,
            contract_caller: None,
            parsers: None,
        }
    }
}

impl PipelineBuilder {
    pub fn adapters(mut self, adapters: AdapterRegistry) -> Self {
        self.adapters = Some(adapters);
        self
    }

    pub fn contract_caller(mut self, caller: ContractCaller) -> Self {
        self.contract_caller = Some(caller);
        self
    }

    pub fn parsers(mut self, parsers: ParserRegistry) -> Self {
        self.parsers = Some(parsers);
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        let adapters = Arc::new(match self.adapters {
            Some(a) => a,
            None => crate::adapters::default_registry()?,
        });
        let fetcher = Arc::new(BlockingFetcher::new(adapters.clone())?);
        let async_fetcher = Arc::new(AsyncFetcher::new(adapters)?);
        let contract_caller = Arc::new(match self.contract_caller {
            Some(c) => c,
            None => ContractCaller::new(rpc_provider_url())?,
        });
        let parsers = Arc::new(match self.parsers {
            Some(p) => p,
            None => default_parser_registry(fetcher.clone(), async_fetcher.clone())?,
        });
        Ok(Pipeline {
            fetcher,
            async_fetcher,
            contract_caller,
            parsers,
        })
    }
}

/// The parsers this crate ships as worked examples of the interface:
/// the marketplace-standard schema parser and the mandatory catch-all.
/// Collection-specific parsers are external collaborators a caller mounts
/// via [`PipelineBuilder::parsers`].
fn default_parser_registry(
    fetcher: Arc<BlockingFetcher>,
    async_fetcher: Arc<AsyncFetcher>,
) -> Result<ParserRegistry> {
    let builder = ParserRegistry::builder()
        .add(Arc::new(MarketplaceStandardParser::new(
            fetcher.clone(),
            async_fetcher.clone(),
        )))?
        .add(Arc::new(DefaultCatchallParser::new(fetcher, async_fetcher)))?;
    Ok(builder.build())
}

impl Pipeline {
    /// A `Pipeline` wired with every default: the IPFS/Arweave/data/HTTP
    /// adapter set, the public Cloudflare Ethereum RPC endpoint, and the
    /// two shipped parsers. Use [`Pipeline::builder`] to override any of
    /// these.
    pub fn new() -> Result<Self> {
        PipelineBuilder::default().build()
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// `token.uri` via `tokenURI(uint256)` (or a caller-supplied signature).
    pub fn fetch_token_uri(&self, token: &Token, fn_sig: &str) -> Result<Option<String>> {
        let args = [AbiToken::Uint(token.token_id)];
        let result = self.contract_caller.call_single(
            &token.collection_address,
            fn_sig,
            &[ParamType::String],
            &args,
        )?;
        Ok(result.and_then(|values| values.into_iter().next()).and_then(|t| t.into_string()))
    }

    /// The single-token core: URI acquisition, content fetch, parser
    /// dispatch, classification into `Metadata` or `MetadataProcessingError`.
    pub fn fetch_token_metadata(
        &self,
        token: Token,
        selector_fn: Option<&SelectorFn>,
    ) -> MetadataOrError {
        let mut candidates: Vec<MetadataOrError> = Vec::new();
        let mut working_token = token.clone();

        if working_token.uri.is_none() {
            match self.fetch_token_uri(&working_token, DEFAULT_TOKEN_URI_SIGNATURE) {
                Ok(Some(uri)) => {
                    if let Ok(t) = working_token.with_uri(Some(uri)) {
                        working_token = t;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        collection_address = %working_token.collection_address,
                        token_id = %working_token.token_id,
                        "tokenURI contract read failed: {}",
                        e
                    );
                    candidates.push(MetadataOrError::Error(
                        MetadataProcessingError::from_error(working_token.clone(), &e),
                    ));
                }
            }
        }

        let raw_data = match &working_token.uri {
            Some(uri) => match self.fetcher.fetch_content(uri) {
                Ok(content) => Some(content.into_value()),
                Err(e) => {
                    tracing::warn!(uri = %uri, "content fetch failed: {}", e);
                    candidates.push(MetadataOrError::Error(MetadataProcessingError::from_error(
                        working_token.clone(),
                        &e,
                    )));
                    None
                }
            },
            None => None,
        };

        if let Some(raw_data) = raw_data {
            for parser in self.parsers.iter_dispatch_order() {
                if !parser.should_parse(&working_token, &raw_data) {
                    continue;
                }
                match parser.parse(&working_token, &raw_data) {
                    Ok(Some(metadata)) => {
                        tracing::debug!(parser = parser.name(), "parser claimed token");
                        if selector_fn.is_none() {
                            return MetadataOrError::metadata(metadata);
                        }
                        candidates.push(MetadataOrError::metadata(metadata));
                    }
                    Ok(None) => {}
                    Err(e) => candidates.push(MetadataOrError::Error(
                        MetadataProcessingError::from_error(working_token.clone(), &e),
                    )),
                }
            }
        }

        pick_winner(candidates, selector_fn, &working_token)
    }

    /// Cooperative twin: requires `token.uri` up front and fans out every
    /// applicable parser's `gen_parse` concurrently, then resolves the
    /// winner over the gathered results in the same dispatch order. A
    /// missing `token.uri` is a `MetadataProcessingError` returned as data,
    /// not a Rust `Err` -- matching the reference's `gen_fetch_token_metadata`,
    /// which returns a processing error for "Token has not uri" rather than
    /// raising.
    pub async fn gen_fetch_token_metadata(
        &self,
        token: Token,
        selector_fn: Option<&SelectorFn>,
    ) -> MetadataOrError {
        let Some(uri) = token.uri.clone() else {
            return MetadataOrError::Error(MetadataProcessingError::from_error(
                token.clone(),
                &Error::InvalidInput("Token has not uri".into()),
            ));
        };

        let mut candidates: Vec<MetadataOrError> = Vec::new();
        let raw_data = match self.async_fetcher.gen_fetch_content(&uri).await {
            Ok(content) => Some(content.into_value()),
            Err(e) => {
                candidates.push(MetadataOrError::Error(MetadataProcessingError::from_error(
                    token.clone(),
                    &e,
                )));
                None
            }
        };

        if let Some(raw_data) = raw_data {
            let applicable: Vec<_> = self
                .parsers
                .iter_dispatch_order()
                .filter(|p| p.should_parse(&token, &raw_data))
                .collect();
            let futures = applicable.iter().map(|p| p.gen_parse(&token, &raw_data));
            let results = futures::future::join_all(futures).await;
            for (parser, result) in applicable.into_iter().zip(results) {
                match result {
                    Ok(Some(metadata)) => {
                        tracing::debug!(parser = parser.name(), "parser claimed token");
                        candidates.push(MetadataOrError::metadata(metadata));
                    }
                    Ok(None) => {}
                    Err(e) => candidates.push(MetadataOrError::Error(
                        MetadataProcessingError::from_error(token.clone(), &e),
                    )),
                }
            }
        }

        pick_winner(candidates, selector_fn, &token)
    }

    /// `parallelize=false` iterates sequentially; `parallelize=true` submits
    /// to a bounded worker pool sized `min(N, 2*NumCPU+1)`, processed in
    /// chunks of 15 to bound burst concurrency. Preserves input order.
    pub fn run(
        &self,
        tokens: &[Token],
        parallelize: bool,
        selector_fn: Option<&SelectorFn>,
    ) -> Vec<MetadataOrError> {
        if tokens.is_empty() {
            return Vec::new();
        }
        if !parallelize {
            return tokens
                .iter()
                .map(|t| self.fetch_token_metadata(t.clone(), selector_fn))
                .collect();
        }

        let chunk_size = worker_pool_chunk_size();
        let mut results: Vec<Option<MetadataOrError>> = (0..tokens.len()).map(|_| None).collect();

        for (chunk_index, chunk) in tokens.chunks(chunk_size).enumerate() {
            let base = chunk_index * chunk_size;
            let workers = worker_pool_size(chunk.len()).max(1);
            std::thread::scope(|scope| {
                let handles: Vec<_> = (0..workers)
                    .map(|w| {
                        let indices: Vec<usize> = (w..chunk.len()).step_by(workers).collect();
                        scope.spawn(move || {
                            indices
                                .into_iter()
                                .map(|i| (i, self.fetch_token_metadata(chunk[i].clone(), selector_fn)))
                                .collect::<Vec<_>>()
                        })
                    })
                    .collect();
                for handle in handles {
                    for (i, result) in handle.join().expect("worker-pool thread panicked") {
                        results[base + i] = Some(result);
                    }
                }
            });
        }

        results
            .into_iter()
            .map(|r| r.expect("every index was filled by a worker"))
            .collect()
    }

    /// Fans out every token cooperatively with no explicit chunking,
    /// relying on the task scheduler. Preserves input order.
    pub async fn async_run(
        &self,
        tokens: &[Token],
        selector_fn: Option<&SelectorFn>,
    ) -> Vec<MetadataOrError> {
        if tokens.is_empty() {
            return Vec::new();
        }
        let futures = tokens
            .iter()
            .map(|t| self.gen_fetch_token_metadata(t.clone(), selector_fn));
        futures::future::join_all(futures).await
    }
}

/// Picks the first `Metadata` among `candidates` in (already dispatch-
/// ordered) insertion order; if none succeeded, the first captured error;
/// if there were no candidates at all, a synthetic "No parsers found."
/// error. When a selector is supplied it alone decides, over the same
/// candidate set (synthesizing "No parsers found." first if empty).
fn pick_winner(
    mut candidates: Vec<MetadataOrError>,
    selector_fn: Option<&SelectorFn>,
    token: &Token,
) -> MetadataOrError {
    if candidates.is_empty() {
        tracing::debug!(
            collection_address = %token.collection_address,
            token_id = %token.token_id,
            "no parser produced metadata"
        );
        candidates.push(MetadataOrError::Error(MetadataProcessingError::no_parsers_found(
            token.clone(),
        )));
    }
    if let Some(selector) = selector_fn {
        return selector(&candidates);
    }
    candidates
        .iter()
        .find(|c| c.is_metadata())
        .cloned()
        .unwrap_or_else(|| candidates.into_iter().next().expect("checked non-empty above"))
}
