use ethereum_types::U256;

use crate::error::Result;
use crate::models::{MetadataOrError, Token};

use super::Pipeline;

/// One-shot convenience wrapper: builds a default `Pipeline` and resolves a
/// single token. Fine for scripts and examples; anything calling this more
/// than once should build and reuse a `Pipeline` directly instead, since
/// every call here pays the adapter/client construction cost again.
pub fn get_token_metadata(
    collection_address: &str,
    token_id: U256,
    chain_identifier: Option<String>,
    uri: Option<String>,
) -> Result<MetadataOrError> {
    let token = Token::new(collection_address, token_id, chain_identifier, uri)?;
    let pipeline = Pipeline::new()?;
    Ok(pipeline.fetch_token_metadata(token, None))
}
