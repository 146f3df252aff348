use crate::error::{Error, Result};

use super::{Rewritten, SchemeAdapter};

/// Rewrites `ar://host/path` into `<gateway><host><path>`.
pub struct ArweaveAdapter {
    mount_prefixes: Vec<String>,
    gateway: String,
}

impl ArweaveAdapter {
    pub fn new(mount_prefixes: Vec<String>, gateway: String) -> Self {
        Self {
            mount_prefixes,
            gateway,
        }
    }
}

impl SchemeAdapter for ArweaveAdapter {
    fn mount_prefixes(&self) -> &[String] {
        &self.mount_prefixes
    }

    fn rewrite(&self, uri: &str) -> Result<Rewritten> {
        let tail = uri
            .strip_prefix("ar://")
            .ok_or_else(|| Error::InvalidInput(format!("not an ar:// uri: {uri}")))?;
        let rewritten = format!("{}{}", self.gateway, tail);
        Ok(Rewritten::Url(collapse_slashes_after_scheme(&rewritten)))
    }
}

/// Collapse runs of `/` after the `scheme://` prefix down to one, the way
/// joining a gateway host with an already-slashed path can otherwise
/// produce `//`.
pub fn collapse_slashes_after_scheme(url: &str) -> String {
    let Some(idx) = url.find("://") else {
        return url.to_string();
    };
    let (scheme, rest) = url.split_at(idx + 3);
    let mut collapsed = String::with_capacity(rest.len());
    let mut prev_slash = false;
    for c in rest.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        collapsed.push(c);
    }
    format!("{scheme}{collapsed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_ar_uri_to_gateway() {
        let adapter = ArweaveAdapter::new(vec!["ar://".into()], "https://arweave.net/".into());
        match adapter.rewrite("ar://abc123/metadata.json").unwrap() {
            Rewritten::Url(url) => assert_eq!(url, "https://arweave.net/abc123/metadata.json"),
            Rewritten::Inline { .. } => panic!("expected url rewrite"),
        }
    }
}
