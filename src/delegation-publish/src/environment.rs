//! Per-chain delegation framework deployments.
//!
//! JSON layout (chain ids are decimal strings):
//!
//! ```json
//! {
//!   "chains": {
//!     "11155111": {
//!       "DelegationManager": "0x…",
//!       "EIP7702StatelessDeleGatorImpl": "0x…",
//!       "caveatEnforcers": {
//!         "ExactExecutionEnforcer": "0x…",
//!         "SpecificActionERC20TransferBatchEnforcer": "0x…"
//!       }
//!     }
//!   }
//! }
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use alloy_primitives::{Address, ChainId};
use delegation_types::DelegationEnvironment;
use serde::Deserialize;

use crate::errors::EnvironmentError;

#[derive(Debug, Deserialize)]
struct RegistryFile {
    chains: BTreeMap<String, DelegationEnvironment>,
}

/// Immutable chain id -> environment table, validated on construction.
#[derive(Clone, Debug, Default)]
pub struct EnvironmentRegistry {
    chains: BTreeMap<ChainId, DelegationEnvironment>,
}

impl EnvironmentRegistry {
    pub fn new(
        chains: impl IntoIterator<Item = (ChainId, DelegationEnvironment)>,
    ) -> Result<Self, EnvironmentError> {
        let chains: BTreeMap<_, _> = chains.into_iter().collect();
        for (chain_id, environment) in &chains {
            validate(*chain_id, environment)?;
        }
        Ok(Self { chains })
    }

    pub fn from_json_str(json: &str) -> Result<Self, EnvironmentError> {
        let file: RegistryFile = serde_json::from_str(json)?;
        let chains = file
            .chains
            .into_iter()
            .map(|(key, environment)| {
                key.parse::<ChainId>()
                    .map(|chain_id| (chain_id, environment))
                    .map_err(|_| EnvironmentError::InvalidChainId(key))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(chains)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EnvironmentError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn get(&self, chain_id: ChainId) -> Option<&DelegationEnvironment> {
        self.chains.get(&chain_id)
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.chains.keys().copied()
    }
}

fn validate(
    chain_id: ChainId,
    environment: &DelegationEnvironment,
) -> Result<(), EnvironmentError> {
    let required = [
        ("DelegationManager", environment.delegation_manager),
        ("ExactExecutionEnforcer", environment.caveat_enforcers.exact_execution),
        (
            "SpecificActionERC20TransferBatchEnforcer",
            environment.caveat_enforcers.specific_action_erc20_transfer_batch,
        ),
    ];
    let optional = environment
        .eip7702_stateless_delegator_impl
        .map(|address| ("EIP7702StatelessDeleGatorImpl", address));

    for (contract, address) in required.into_iter().chain(optional) {
        if address == Address::ZERO {
            return Err(EnvironmentError::ZeroAddress { chain_id, contract });
        }
    }
    Ok(())
}
