use alloy_primitives::{Address, ChainId, B256, U64};
use serde::{Deserialize, Serialize};

/// Parity of the `y` coordinate recovered from an authorization signature.
///
/// Serialised the way the relay expects it: `"0x"` for even, `"0x1"` for odd.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum YParity {
    #[serde(rename = "0x")]
    Even,
    #[serde(rename = "0x1")]
    Odd,
}

impl YParity {
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Even => 0,
            Self::Odd => 1,
        }
    }
}

/// Request for an EIP-7702 authorization signature from the account's keyring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequest {
    pub chain_id: ChainId,
    /// Contract whose code the account adopts.
    pub contract_address: Address,
    pub from: Address,
    pub nonce: u64,
}

/// Signed EIP-7702 authorization tuple as submitted to the relay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationListEntry {
    pub address: Address,
    pub chain_id: U64,
    pub nonce: U64,
    pub r: B256,
    pub s: B256,
    pub y_parity: YParity,
}
