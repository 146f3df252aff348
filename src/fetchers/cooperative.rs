use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{AdapterRegistry, Rewritten};
use crate::error::{Error, Result};

use super::{classify_body, strip_content_type_params, FetchedContent, MimeAndSize};

/// The cooperative half of the dual fetcher API: suspends at network-I/O
/// boundaries instead of blocking the thread, so many calls can run
/// concurrently on one task scheduler. Shares `AdapterRegistry` with
/// [`super::blocking::BlockingFetcher`] -- both are built from the same
/// adapter configuration.
pub struct AsyncFetcher {
    adapters: Arc<AdapterRegistry>,
    client: reqwest::Client,
    timeout: Duration,
    max_retries: u32,
}

impl AsyncFetcher {
    pub fn new(adapters: Arc<AdapterRegistry>) -> Result<Self> {
        let timeout = crate::config::env::default_http_timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Http)?;
        Ok(Self {
            adapters,
            client,
            timeout,
            max_retries: 0,
        })
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn set_max_retries(&mut self, max_retries: u32) {
        self.max_retries = max_retries;
    }

    pub async fn gen_fetch_mime_type_and_size(&self, uri: &str) -> Result<MimeAndSize> {
        match self.rewrite(uri)? {
            Rewritten::Inline { bytes, mime_type } => Ok(MimeAndSize {
                mime_type,
                size: bytes.len() as u64,
            }),
            Rewritten::Url(url) => {
                let head = self
                    .client
                    .head(&url)
                    .timeout(self.timeout)
                    .send()
                    .await
                    .map_err(Error::Http)?;
                let resp = if head.status().as_u16() >= 300 {
                    self.client
                        .get(&url)
                        .timeout(self.timeout)
                        .send()
                        .await
                        .map_err(Error::Http)?
                } else {
                    head
                };
                if !resp.status().is_success() {
                    return Err(Error::Transport(format!(
                        "gen_fetch_mime_type_and_size: {} -> {}",
                        url,
                        resp.status()
                    )));
                }
                let mime_type = resp
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(strip_content_type_params);
                let size = resp
                    .headers()
                    .get(reqwest::header::CONTENT_LENGTH)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
                Ok(MimeAndSize { mime_type, size })
            }
        }
    }

    pub async fn gen_fetch_content(&self, uri: &str) -> Result<FetchedContent> {
        match self.rewrite(uri)? {
            Rewritten::Inline { bytes, .. } => Ok(classify_body(&bytes)),
            Rewritten::Url(url) => {
                let resp = self
                    .client
                    .get(&url)
                    .timeout(self.timeout)
                    .send()
                    .await
                    .map_err(Error::Http)?;
                if !resp.status().is_success() {
                    return Err(Error::Transport(format!(
                        "gen_fetch_content: {} -> {}",
                        url,
                        resp.status()
                    )));
                }
                let bytes = resp.bytes().await.map_err(Error::Http)?;
                Ok(classify_body(&bytes))
            }
        }
    }

    /// No adapter matches -> fall back to a default client, per the
    /// cooperative-mode contract.
    fn rewrite(&self, uri: &str) -> Result<Rewritten> {
        match self.adapters.resolve(uri) {
            Some(adapter) => adapter.rewrite(uri),
            None => Ok(Rewritten::Url(uri.to_string())),
        }
    }
}
