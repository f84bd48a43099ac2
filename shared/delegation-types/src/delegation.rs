use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Authority of a delegation that is not a redelegation.
pub const ROOT_AUTHORITY: B256 = B256::repeat_byte(0xff);

/// Restriction attached to a delegation, validated on-chain by `enforcer`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caveat {
    pub enforcer: Address,
    /// Packed terms; layout is owned by the enforcer contract.
    pub terms: Bytes,
    #[serde(default)]
    pub args: Bytes,
}

/// Delegation before the delegator has signed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedDelegation {
    pub delegate: Address,
    pub delegator: Address,
    pub authority: B256,
    /// Evaluated on-chain in order.
    pub caveats: Vec<Caveat>,
    pub salt: U256,
}

impl UnsignedDelegation {
    /// Root delegation with zero salt.
    pub fn new(delegator: Address, delegate: Address, caveats: Vec<Caveat>) -> Self {
        Self {
            delegate,
            delegator,
            authority: ROOT_AUTHORITY,
            caveats,
            salt: U256::ZERO,
        }
    }

    pub fn into_signed(self, signature: Bytes) -> Delegation {
        Delegation {
            delegate: self.delegate,
            delegator: self.delegator,
            authority: self.authority,
            caveats: self.caveats,
            salt: self.salt,
            signature,
        }
    }
}

/// Delegation carrying the delegator's signature, ready to be redeemed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delegation {
    pub delegate: Address,
    pub delegator: Address,
    pub authority: B256,
    pub caveats: Vec<Caveat>,
    pub salt: U256,
    pub signature: Bytes,
}
