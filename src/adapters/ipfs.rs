use rand::seq::SliceRandom;

use crate::error::{Error, Result};

use super::arweave::collapse_slashes_after_scheme;
use super::{Rewritten, SchemeAdapter};

/// Rewrites `ipfs://` URIs and `https://.../ipfs/<cid>` URIs against a pool
/// of gateways, picking one at random per request.
pub struct IpfsAdapter {
    mount_prefixes: Vec<String>,
    gateways: Vec<String>,
}

impl IpfsAdapter {
    /// Every gateway must end in `/`; this is a construction-time error,
    /// not a per-request one, since a gateway list is fixed configuration.
    pub fn new(mount_prefixes: Vec<String>, gateways: Vec<String>) -> Result<Self> {
        if gateways.is_empty() || gateways.iter().any(|g| !g.ends_with('/')) {
            return Err(Error::InvalidInput(
                "ipfs gateway list must be non-empty and every entry must end in '/'".into(),
            ));
        }
        Ok(Self {
            mount_prefixes,
            gateways,
        })
    }

    fn pick_gateway(&self) -> &str {
        self.gateways
            .choose(&mut rand::thread_rng())
            .expect("gateways is non-empty, checked at construction")
    }
}

impl SchemeAdapter for IpfsAdapter {
    fn mount_prefixes(&self) -> &[String] {
        &self.mount_prefixes
    }

    fn rewrite(&self, uri: &str) -> Result<Rewritten> {
        Ok(Rewritten::Url(build_request_url(
            self.pick_gateway(),
            uri,
        )?))
    }
}

/// Pure rewrite logic, split out so it can be tested with an injected
/// gateway rather than going through the adapter's random choice.
pub fn build_request_url(gateway: &str, uri: &str) -> Result<String> {
    let tail = if let Some(tail) = uri.strip_prefix("ipfs://") {
        // `ipfs://ipfs/<cid>/...` -- the literal "ipfs" host segment is
        // redundant since gateways already end in `.../ipfs/`.
        if let Some(stripped) = tail.strip_prefix("ipfs/") {
            tracing::debug!("ipfs adapter: skipping redundant 'ipfs' host segment in '{}'", uri);
            stripped
        } else {
            tail
        }
    } else if let Some(idx) = uri.find("/ipfs/") {
        &uri[idx + "/ipfs/".len()..]
    } else {
        return Err(Error::InvalidInput(format!("not an ipfs uri: {uri}")));
    };

    let joined = format!("{gateway}{tail}");
    Ok(collapse_slashes_after_scheme(&joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_ipfs_scheme_uri() {
        let url = build_request_url(
            "https://gateway.pinata.cloud/ipfs/",
            "ipfs://QmSr3vdMuP2fSxWD7S26KzzBWcAN1eNhm4hk1qaR3x3vmj/1.json",
        )
        .unwrap();
        assert_eq!(
            url,
            "https://gateway.pinata.cloud/ipfs/QmSr3vdMuP2fSxWD7S26KzzBWcAN1eNhm4hk1qaR3x3vmj/1.json"
        );
    }

    #[test]
    fn skips_redundant_ipfs_host_segment() {
        let url = build_request_url(
            "https://gateway.pinata.cloud/ipfs/",
            "ipfs://ipfs/QmAbc/1.json",
        )
        .unwrap();
        assert_eq!(url, "https://gateway.pinata.cloud/ipfs/QmAbc/1.json");
    }

    #[test]
    fn rewrites_https_ipfs_path_form() {
        let url = build_request_url(
            "https://gateway.pinata.cloud/ipfs/",
            "https://ipfs.io/ipfs/QmAbc/1.json",
        )
        .unwrap();
        assert_eq!(url, "https://gateway.pinata.cloud/ipfs/QmAbc/1.json");
    }

    #[test]
    fn rewritten_url_has_no_double_slash_after_join() {
        let url = build_request_url("https://gateway.pinata.cloud/ipfs/", "ipfs://QmAbc//1.json").unwrap();
        assert!(!url["https://".len()..].contains("//"));
    }

    #[test]
    fn construction_rejects_gateway_without_trailing_slash() {
        let err = IpfsAdapter::new(vec!["ipfs://".into()], vec!["https://gateway.pinata.cloud/ipfs".into()]);
        assert!(err.is_err());
    }
}
