//! Support for collection-specific parsers.
//!
//! The concrete parsers that key off a specific `collection_address` (e.g. a
//! Nouns-style seed decoder, a generative-art SVG renderer) are external
//! collaborators: this crate only provides the interface they implement --
//! [`super::Parser`] with [`super::ParserStratum::Collection`] -- and the
//! case-insensitive address match every such parser needs for
//! `should_parse`.

use crate::models::Token;

/// Case-insensitive membership test against a parser's declared address
/// list, the selection rule collection parsers use for `should_parse`.
pub fn token_matches_any_address(token: &Token, addresses: &[String]) -> bool {
    addresses
        .iter()
        .any(|addr| token.collection_address_matches(addr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethereum_types::U256;

    #[test]
    fn matches_regardless_of_case() {
        let token = Token::new("0xABCDEF", U256::from(1), None, None).unwrap();
        assert!(token_matches_any_address(
            &token,
            &["0xabcdef".to_string()]
        ));
    }
}
