use std::str::FromStr;

use alloy_primitives::{Address, ChainId, U64};
use serde::{Deserialize, Deserializer, Serialize};

/// Atomic batch (EIP-7702) support of one account on one chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtomicBatchChainSupport {
    pub chain_id: U64,
    /// Whether the account's current code is the supported delegation contract.
    pub is_supported: bool,
    /// Contract the account currently delegates to, if upgraded.
    #[serde(
        default,
        deserialize_with = "empty_address_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub delegation_address: Option<Address>,
    /// Contract the account should be upgraded to.
    #[serde(
        default,
        deserialize_with = "empty_address_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub upgrade_contract_address: Option<Address>,
}

/// Upgrade state of an account on a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountUpgrade {
    /// Plain EOA; an authorization must accompany the first delegated call.
    NotUpgraded,
    /// Already delegating to the supported contract.
    UpgradedToKnownDelegation(Address),
    /// Delegating to some other contract; the delegation path does not apply.
    UpgradedToUnknownContract(Address),
}

impl AtomicBatchChainSupport {
    pub fn chain_id(&self) -> ChainId {
        self.chain_id.to::<u64>()
    }

    pub fn account_upgrade(&self) -> AccountUpgrade {
        match self.delegation_address {
            None => AccountUpgrade::NotUpgraded,
            Some(address) if self.is_supported => {
                AccountUpgrade::UpgradedToKnownDelegation(address)
            }
            Some(address) => AccountUpgrade::UpgradedToUnknownContract(address),
        }
    }
}

fn empty_address_as_none<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.is_empty() || raw == "0x" => Ok(None),
        Some(raw) => Address::from_str(&raw).map(Some).map_err(serde::de::Error::custom),
    }
}
