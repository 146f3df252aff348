use std::time::Duration;

/// Public mainnet JSON-RPC endpoint used when no RPC provider is configured.
pub fn rpc_provider_url() -> String {
    std::env::var("NFTMETA_RPC_URL")
        .or_else(|_| std::env::var("RPC_URL"))
        .unwrap_or_else(|_| "https://cloudflare-eth.com".to_string())
}

/// Default IPFS gateways, used when a caller does not supply its own list.
/// Every entry must end in `/` (enforced by the IPFS adapter constructor).
pub fn default_ipfs_gateways() -> Vec<String> {
    std::env::var("NFTMETA_IPFS_GATEWAYS")
        .ok()
        .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_else(|| {
            vec![
                "https://gateway.pinata.cloud/ipfs/".to_string(),
                "https://ipfs.io/ipfs/".to_string(),
            ]
        })
}

/// Default Arweave gateway, used when a caller does not supply its own.
pub fn default_arweave_gateway() -> String {
    std::env::var("NFTMETA_ARWEAVE_GATEWAY")
        .unwrap_or_else(|_| "https://arweave.net/".to_string())
}

pub fn default_http_timeout() -> Duration {
    let secs: u64 = std::env::var("NFTMETA_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(20);
    Duration::from_secs(secs)
}

/// Chunk size for a bounded batch of worker-pool tasks (spec: 15).
pub fn worker_pool_chunk_size() -> usize {
    std::env::var("NFTMETA_WORKER_CHUNK_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(15)
}

/// Chunk size for a single JSON-RPC batch call (spec default: 500).
pub fn rpc_chunk_size() -> usize {
    std::env::var("NFTMETA_RPC_CHUNK_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(500)
}
