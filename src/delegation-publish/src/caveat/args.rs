//! Validation of raw (string) caveat arguments.
//!
//! Callers holding untyped wallet input go through these before any network interaction, so a
//! malformed argument surfaces as a [`CaveatError`] rather than an on-chain enforcer revert.

use std::str::FromStr;

use alloy_primitives::{hex, Address, Bytes, U256};

use crate::errors::CaveatError;

/// `0x` followed by exactly 40 hex digits, any case.
pub fn parse_address(field: &'static str, raw: &str) -> Result<Address, CaveatError> {
    let invalid = || CaveatError::InvalidAddress { field };
    let digits = raw.strip_prefix("0x").ok_or_else(invalid)?;
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    Address::from_str(raw).map_err(|_| invalid())
}

/// Non-negative integer, decimal or `0x`-prefixed hex.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<U256, CaveatError> {
    let raw = raw.trim();
    if raw.starts_with('-') {
        return Err(CaveatError::NegativeAmount { field });
    }
    if raw.is_empty() {
        return Err(CaveatError::InvalidAmount { field });
    }
    U256::from_str(raw).map_err(|_| CaveatError::InvalidAmount { field })
}

/// `0x`-prefixed, even-length hex. `0x` alone is the empty calldata.
pub fn parse_calldata(field: &'static str, raw: &str) -> Result<Bytes, CaveatError> {
    let invalid = || CaveatError::InvalidHex { field };
    let digits = raw.strip_prefix("0x").ok_or_else(invalid)?;
    hex::decode(digits).map(Bytes::from).map_err(|_| invalid())
}
