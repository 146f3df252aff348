use ethabi::{ParamType, Token};
use sha3::{Digest, Keccak256};

use crate::error::{Error, Result};

/// First 4 bytes of the Keccak-256 hash of `<name>(<arg-types>)`, the
/// standard EVM function selector.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&digest[..4]);
    sel
}

/// Selector followed by ABI-encoded arguments, ready to hex-encode into an
/// `eth_call` request's `data` field.
pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut data = selector(signature).to_vec();
    data.extend(ethabi::encode(args));
    data
}

/// Decode an ABI-encoded return payload (the `result` field of an
/// `eth_call` response, already hex-decoded) against the declared return
/// types. Returns `Err` on any decode failure -- callers that must swallow
/// per-call failures to `None` do so at the call site, not here.
pub fn decode_return(data: &[u8], return_types: &[ParamType]) -> Result<Vec<Token>> {
    if return_types.is_empty() {
        return Ok(Vec::new());
    }
    ethabi::decode(return_types, data).map_err(|e| Error::Decode(format!("abi decode: {e}")))
}

/// Parse a `0x`-prefixed hex string (as returned by `eth_call`) into bytes.
pub fn decode_hex_result(hex_str: &str) -> Result<Vec<u8>> {
    let trimmed = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    hex::decode(trimmed).map_err(|e| Error::Decode(format!("invalid hex result: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matches_known_signature() {
        // tokenURI(uint256) -> 0xc87b56dd
        let sel = selector("tokenURI(uint256)");
        assert_eq!(hex::encode(sel), "c87b56dd");
    }

    #[test]
    fn encode_decode_round_trip_for_uint256() {
        let value = ethereum_types::U256::from(42u64);
        let args = vec![Token::Uint(value)];
        let encoded = ethabi::encode(&args);
        let decoded = decode_return(&encoded, &[ParamType::Uint(256)]).unwrap();
        assert_eq!(decoded, args);
    }

    #[test]
    fn empty_0x_result_decodes_to_error() {
        let bytes = decode_hex_result("0x").unwrap();
        assert!(decode_return(&bytes, &[ParamType::Uint(256)]).is_err());
    }
}
