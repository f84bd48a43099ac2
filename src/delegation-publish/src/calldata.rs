//! `DelegationManager.redeemDelegations` calldata submitted through the relay.
//!
//! Execution data follows ERC-7579: single mode packs `target || value || callData`, batch mode
//! ABI-encodes `Execution[]`.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolValue};
use delegation_types::{Delegation, DelegationEnvironment, TransactionParams};

use crate::{caveat::decode_transfer_batch_terms, errors::BoxError, interfaces::CalldataGenerator};

/// ABI mirror of the delegation framework types.
pub mod abi {
    use alloy_sol_types::sol;

    sol! {
        #[derive(Debug, PartialEq, Eq)]
        struct Caveat {
            address enforcer;
            bytes terms;
            bytes args;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct Delegation {
            address delegate;
            address delegator;
            bytes32 authority;
            Caveat[] caveats;
            uint256 salt;
            bytes signature;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct Execution {
            address target;
            uint256 value;
            bytes callData;
        }

        interface IDelegationManager {
            function redeemDelegations(
                bytes[] calldata permissionContexts,
                bytes32[] calldata modes,
                bytes[] calldata executionCallDatas
            ) external;
        }

        interface IERC20 {
            function transfer(address to, uint256 amount) external returns (bool);
        }
    }
}

/// ERC-7579 mode: single call, revert on failure.
pub const SINGLE_DEFAULT_MODE: B256 = B256::ZERO;

/// ERC-7579 mode: batch call, revert on failure.
pub const BATCH_DEFAULT_MODE: B256 = {
    let mut mode = [0u8; 32];
    mode[0] = 0x01;
    B256::new(mode)
};

impl From<&Delegation> for abi::Delegation {
    fn from(delegation: &Delegation) -> Self {
        Self {
            delegate: delegation.delegate,
            delegator: delegation.delegator,
            authority: delegation.authority,
            caveats: delegation
                .caveats
                .iter()
                .map(|caveat| abi::Caveat {
                    enforcer: caveat.enforcer,
                    terms: caveat.terms.clone(),
                    args: caveat.args.clone(),
                })
                .collect(),
            salt: delegation.salt,
            signature: delegation.signature.clone(),
        }
    }
}

/// Packed single execution: `target || value || callData`.
pub fn encode_single_execution(target: Address, value: U256, call_data: &[u8]) -> Bytes {
    let mut buf = Vec::with_capacity(20 + 32 + call_data.len());
    buf.extend_from_slice(target.as_slice());
    buf.extend_from_slice(&value.to_be_bytes::<32>());
    buf.extend_from_slice(call_data);
    buf.into()
}

/// Redeems one signed delegation against the delegation manager.
///
/// A transfer-batch caveat turns the redemption into a two-call batch (original call, then the
/// gas token transfer); anything else redeems the original call alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct RedeemDelegationsCalldata;

impl CalldataGenerator for RedeemDelegationsCalldata {
    fn generate(
        &self,
        environment: &DelegationEnvironment,
        transaction: &TransactionParams,
        delegation: &Delegation,
    ) -> Result<Bytes, BoxError> {
        let target = transaction.to.ok_or("transaction has no recipient")?;
        let value = transaction.value.unwrap_or_default();
        let call_data = transaction.data_or_empty();

        let transfer = delegation
            .caveats
            .iter()
            .find(|caveat| {
                caveat.enforcer == environment.caveat_enforcers.specific_action_erc20_transfer_batch
            })
            .map(|caveat| decode_transfer_batch_terms(&caveat.terms))
            .transpose()?;

        let (mode, execution_call_data) = match transfer {
            Some(terms) => {
                let transfer_call = abi::IERC20::transferCall {
                    to: terms.recipient,
                    amount: terms.amount,
                };
                let executions = vec![
                    abi::Execution {
                        target: terms.first_target,
                        value,
                        callData: terms.first_calldata,
                    },
                    abi::Execution {
                        target: terms.token,
                        value: U256::ZERO,
                        callData: transfer_call.abi_encode().into(),
                    },
                ];
                (BATCH_DEFAULT_MODE, Bytes::from(executions.abi_encode()))
            }
            None => (SINGLE_DEFAULT_MODE, encode_single_execution(target, value, &call_data)),
        };

        let permission_context = vec![abi::Delegation::from(delegation)].abi_encode();
        let call = abi::IDelegationManager::redeemDelegationsCall {
            permissionContexts: vec![permission_context.into()],
            modes: vec![mode],
            executionCallDatas: vec![execution_call_data],
        };
        Ok(call.abi_encode().into())
    }
}
