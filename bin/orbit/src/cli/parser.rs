//! Parser functions for CLI arguments.

use alloy_primitives::{Address, B256, U256};
use std::str::FromStr;

/// Parse a string slice into [B256].
pub(crate) fn parse_b256(s: &str) -> Result<B256, String> {
    B256::from_str(s).map_err(|_| format!("Invalid B256 value: {}", s))
}

/// Parse a string slice into an [Address].
pub(crate) fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s).map_err(|_| format!("Invalid address: {}", s))
}

/// Parse a decimal or `0x` prefixed hex string slice into [U256].
pub(crate) fn parse_u256(s: &str) -> Result<U256, String> {
    U256::from_str(s).map_err(|e| format!("Invalid U256 value {}: {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u256() {
        assert_eq!(parse_u256("1000").unwrap(), U256::from(1000));
        assert_eq!(parse_u256("0x10").unwrap(), U256::from(16));
        assert!(parse_u256("-1").is_err());
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(
            parse_address("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap(),
            Address::repeat_byte(0xaa)
        );
        assert!(parse_address("0xaa").is_err());
    }
}
