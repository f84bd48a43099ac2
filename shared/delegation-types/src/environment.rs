use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Caveat enforcer contracts deployed on a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaveatEnforcers {
    #[serde(rename = "ExactExecutionEnforcer")]
    pub exact_execution: Address,
    #[serde(rename = "SpecificActionERC20TransferBatchEnforcer")]
    pub specific_action_erc20_transfer_batch: Address,
}

/// Delegation framework contracts deployed on a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationEnvironment {
    #[serde(rename = "DelegationManager")]
    pub delegation_manager: Address,
    #[serde(
        rename = "EIP7702StatelessDeleGatorImpl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub eip7702_stateless_delegator_impl: Option<Address>,
    #[serde(rename = "caveatEnforcers")]
    pub caveat_enforcers: CaveatEnforcers,
}
