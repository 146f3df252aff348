use std::collections::HashMap;

use ethabi::{ParamType, Token};

use crate::config::env::rpc_chunk_size;
use crate::error::Result;

use super::abi::{decode_hex_result, decode_return, encode_call};
use super::jsonrpc::{JsonRpcClient, RpcRequest};

const DEFAULT_BLOCK_TAG: &str = "latest";

/// One decoded return value, or `None` if the call failed for any reason
/// (network error, empty `0x` result, ABI decode failure). A failed call
/// never fails its siblings in the same batch.
pub type CallResult = Option<Vec<Token>>;

/// Batches and chunks `eth_call`s against a JSON-RPC endpoint, amortizing
/// round trips the way the pipeline's contract reads need to.
pub struct ContractCaller {
    rpc: JsonRpcClient,
}

impl ContractCaller {
    pub fn new(rpc_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            rpc: JsonRpcClient::new(rpc_url)?,
        })
    }

    /// N calls to one address and one function signature, differing only in
    /// arguments; results are aligned with `args_list`.
    pub fn single_address_single_fn_many_args(
        &self,
        address: &str,
        fn_sig: &str,
        return_types: &[ParamType],
        args_list: &[Vec<Token>],
    ) -> Result<Vec<CallResult>> {
        let requests: Vec<RpcRequest> = args_list
            .iter()
            .enumerate()
            .map(|(i, args)| build_request(i as u64, address, fn_sig, args))
            .collect();
        let responses = self
            .rpc
            .call_batch_chunked(&requests, rpc_chunk_size())?;
        Ok(align_and_decode(responses, args_list.len(), return_types))
    }

    pub async fn gen_single_address_single_fn_many_args(
        &self,
        address: &str,
        fn_sig: &str,
        return_types: &[ParamType],
        args_list: &[Vec<Token>],
    ) -> Result<Vec<CallResult>> {
        let requests: Vec<RpcRequest> = args_list
            .iter()
            .enumerate()
            .map(|(i, args)| build_request(i as u64, address, fn_sig, args))
            .collect();
        let responses = self
            .rpc
            .gen_call_batch_chunked(&requests, rpc_chunk_size())
            .await?;
        Ok(align_and_decode(responses, args_list.len(), return_types))
    }

    /// N calls to one address across several function signatures, each with
    /// its own args and return types; results keyed by signature.
    pub fn single_address_many_fns_many_args(
        &self,
        address: &str,
        calls: &[(&str, Vec<ParamType>, Vec<Token>)],
    ) -> Result<HashMap<String, CallResult>> {
        let requests: Vec<RpcRequest> = calls
            .iter()
            .enumerate()
            .map(|(i, (fn_sig, _, args))| build_request(i as u64, address, fn_sig, args))
            .collect();
        let responses = self.rpc.call_batch_chunked(&requests, rpc_chunk_size())?;
        let mut out = HashMap::with_capacity(calls.len());
        let responses_by_id: HashMap<u64, _> = responses.into_iter().map(|r| (r.id, r)).collect();
        for (i, (fn_sig, return_types, _)) in calls.iter().enumerate() {
            let decoded = responses_by_id
                .get(&(i as u64))
                .and_then(|resp| decode_one(resp.result.as_deref(), return_types));
            out.insert((*fn_sig).to_string(), decoded);
        }
        Ok(out)
    }

    /// Convenience call for a single `fn_sig(args) -> return_types` read,
    /// used by the pipeline's `tokenURI(uint256)` lookup.
    pub fn call_single(
        &self,
        address: &str,
        fn_sig: &str,
        return_types: &[ParamType],
        args: &[Token],
    ) -> Result<CallResult> {
        let mut results =
            self.single_address_single_fn_many_args(address, fn_sig, return_types, &[args.to_vec()])?;
        Ok(results.pop().flatten())
    }

    pub async fn gen_call_single(
        &self,
        address: &str,
        fn_sig: &str,
        return_types: &[ParamType],
        args: &[Token],
    ) -> Result<CallResult> {
        let mut results = self
            .gen_single_address_single_fn_many_args(address, fn_sig, return_types, &[args.to_vec()])
            .await?;
        Ok(results.pop().flatten())
    }
}

fn build_request(id: u64, address: &str, fn_sig: &str, args: &[Token]) -> RpcRequest {
    let data = encode_call(fn_sig, args);
    RpcRequest::eth_call(id, address, &format!("0x{}", hex::encode(data)), DEFAULT_BLOCK_TAG)
}

fn align_and_decode(
    responses: Vec<super::jsonrpc::RpcResponse>,
    expected_len: usize,
    return_types: &[ParamType],
) -> Vec<CallResult> {
    let mut by_id: HashMap<u64, super::jsonrpc::RpcResponse> =
        responses.into_iter().map(|r| (r.id, r)).collect();
    (0..expected_len as u64)
        .map(|id| {
            by_id
                .remove(&id)
                .and_then(|resp| decode_one(resp.result.as_deref(), return_types))
        })
        .collect()
}

/// Any exception in the decode path (missing result, bad hex, ABI mismatch)
/// collapses to `None` rather than propagating, per the per-call swallow
/// policy.
fn decode_one(result: Option<&str>, return_types: &[ParamType]) -> CallResult {
    let hex_str = result?;
    let bytes = decode_hex_result(hex_str).ok()?;
    if bytes.is_empty() {
        return None;
    }
    decode_return(&bytes, return_types).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_one_returns_none_on_empty_result() {
        assert!(decode_one(Some("0x"), &[ParamType::Uint(256)]).is_none());
    }

    #[test]
    fn decode_one_returns_none_on_missing_result() {
        assert!(decode_one(None, &[ParamType::Uint(256)]).is_none());
    }

    #[test]
    fn decode_one_decodes_a_valid_uint256() {
        let encoded = ethabi::encode(&[Token::Uint(ethereum_types::U256::from(7u64))]);
        let hex_str = format!("0x{}", hex::encode(encoded));
        let decoded = decode_one(Some(&hex_str), &[ParamType::Uint(256)]).unwrap();
        assert_eq!(decoded, vec![Token::Uint(ethereum_types::U256::from(7u64))]);
    }
}
