use crate::error::Result;

use super::{Rewritten, SchemeAdapter};

/// Pass-through adapter for plain `https://`/`http://` URIs. Pool size and
/// retry policy are owned by the shared `reqwest` client the fetcher holds;
/// this adapter only participates in prefix selection.
pub struct HttpAdapter {
    mount_prefixes: Vec<String>,
}

impl HttpAdapter {
    pub fn new(mount_prefixes: Vec<String>) -> Self {
        Self { mount_prefixes }
    }
}

impl SchemeAdapter for HttpAdapter {
    fn mount_prefixes(&self) -> &[String] {
        &self.mount_prefixes
    }

    fn rewrite(&self, uri: &str) -> Result<Rewritten> {
        Ok(Rewritten::Url(uri.to_string()))
    }
}
