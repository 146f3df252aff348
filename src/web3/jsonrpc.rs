use std::time::Duration;

use exponential_backoff::Backoff;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const RETRY_ATTEMPTS: u32 = 2;
const RETRY_MIN: Duration = Duration::from_secs(1);
const RETRY_MAX: Duration = Duration::from_secs(5);

/// One `eth_call` request in `{jsonrpc, id, method, params}` form.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: serde_json::Value,
}

impl RpcRequest {
    pub fn eth_call(id: u64, to: &str, data: &str, block_tag: &str) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: "eth_call",
            params: serde_json::json!([{ "to": to, "data": data }, block_tag]),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    pub id: u64,
    pub result: Option<String>,
    pub error: Option<serde_json::Value>,
}

fn retry_delays() -> Vec<Duration> {
    Backoff::new(RETRY_ATTEMPTS, RETRY_MIN, RETRY_MAX)
        .iter()
        .flatten()
        .collect()
}

fn is_retryable(status: Option<reqwest::StatusCode>) -> bool {
    match status {
        None => true, // network-level failure, no status at all
        Some(s) => s.is_server_error(),
    }
}

/// Thin JSON-RPC transport: batching, chunking, and the 2-attempt
/// exponential-backoff retry policy. ABI concerns live in [`super::abi`]
/// and [`super::contract_caller`].
pub struct JsonRpcClient {
    url: String,
    blocking: reqwest::blocking::Client,
    r#async: reqwest::Client,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let timeout = crate::config::env::default_http_timeout();
        Ok(Self {
            url: url.into(),
            blocking: reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(Error::Http)?,
            r#async: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(Error::Http)?,
        })
    }

    /// Send one JSON-RPC batch, retrying on network failure or a 5xx
    /// response up to `RETRY_ATTEMPTS` times with exponential backoff.
    pub fn call_batch(&self, requests: &[RpcRequest]) -> Result<Vec<RpcResponse>> {
        let delays = retry_delays();
        let mut attempt = 0usize;
        loop {
            let outcome = self
                .blocking
                .post(&self.url)
                .json(requests)
                .send();
            match outcome {
                Ok(resp) if resp.status().is_success() => {
                    return resp
                        .json::<Vec<RpcResponse>>()
                        .map_err(Error::Http);
                }
                Ok(resp) if is_retryable(Some(resp.status())) && attempt < delays.len() => {
                    tracing::warn!("eth_call batch got {}, retrying (attempt {})", resp.status(), attempt + 1);
                    std::thread::sleep(delays[attempt]);
                    attempt += 1;
                }
                Ok(resp) => {
                    return Err(Error::Transport(format!(
                        "eth_call batch -> {}",
                        resp.status()
                    )));
                }
                Err(e) if attempt < delays.len() => {
                    tracing::warn!("eth_call batch network error, retrying (attempt {}): {}", attempt + 1, e);
                    std::thread::sleep(delays[attempt]);
                    attempt += 1;
                }
                Err(e) => return Err(Error::Http(e)),
            }
        }
    }

    pub async fn gen_call_batch(&self, requests: &[RpcRequest]) -> Result<Vec<RpcResponse>> {
        let delays = retry_delays();
        let mut attempt = 0usize;
        loop {
            let outcome = self.r#async.post(&self.url).json(requests).send().await;
            match outcome {
                Ok(resp) if resp.status().is_success() => {
                    return resp.json::<Vec<RpcResponse>>().await.map_err(Error::Http);
                }
                Ok(resp) if is_retryable(Some(resp.status())) && attempt < delays.len() => {
                    tracing::warn!("eth_call batch got {}, retrying (attempt {})", resp.status(), attempt + 1);
                    tokio::time::sleep(delays[attempt]).await;
                    attempt += 1;
                }
                Ok(resp) => {
                    return Err(Error::Transport(format!(
                        "eth_call batch -> {}",
                        resp.status()
                    )));
                }
                Err(e) if attempt < delays.len() => {
                    tracing::warn!("eth_call batch network error, retrying (attempt {}): {}", attempt + 1, e);
                    tokio::time::sleep(delays[attempt]).await;
                    attempt += 1;
                }
                Err(e) => return Err(Error::Http(e)),
            }
        }
    }

    /// Split `requests` into chunks of `chunk_size` and dispatch them
    /// concurrently over a bounded thread pool, preserving input order in
    /// the flattened result.
    pub fn call_batch_chunked(
        &self,
        requests: &[RpcRequest],
        chunk_size: usize,
    ) -> Result<Vec<RpcResponse>> {
        let chunks: Vec<&[RpcRequest]> = requests.chunks(chunk_size.max(1)).collect();
        std::thread::scope(|scope| {
            let handles: Vec<_> = chunks
                .into_iter()
                .map(|chunk| scope.spawn(move || self.call_batch(chunk)))
                .collect();
            let mut out = Vec::with_capacity(requests.len());
            for handle in handles {
                out.extend(handle.join().expect("rpc chunk worker panicked")?);
            }
            Ok(out)
        })
    }

    pub async fn gen_call_batch_chunked(
        &self,
        requests: &[RpcRequest],
        chunk_size: usize,
    ) -> Result<Vec<RpcResponse>> {
        let chunks = requests.chunks(chunk_size.max(1));
        let futures = chunks.map(|chunk| self.gen_call_batch(chunk));
        let results = futures::future::join_all(futures).await;
        let mut out = Vec::with_capacity(requests.len());
        for result in results {
            out.extend(result?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunking_five_requests_at_size_one_yields_five_chunks() {
        let requests: Vec<RpcRequest> = (0..5)
            .map(|i| RpcRequest::eth_call(i, "0xabc", "0x", "latest"))
            .collect();
        let chunks: Vec<_> = requests.chunks(1).collect();
        assert_eq!(chunks.len(), 5);
    }
}
