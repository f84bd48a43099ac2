use alloy_primitives::{Address, Bytes, U256};
use delegation_types::{Caveat, DelegationEnvironment};

use crate::{
    caveat::args::{parse_address, parse_amount, parse_calldata},
    errors::CaveatError,
};

/// Fixed-width head of the transfer-batch terms: token, recipient, amount, first target.
pub const TRANSFER_BATCH_HEAD_LEN: usize = 20 + 20 + 32 + 20;

/// Terms for `SpecificActionERC20TransferBatchEnforcer`.
///
/// The redeemed batch must be exactly two executions: `first_target` called with
/// `first_calldata`, then `token.transfer(recipient, amount)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferBatchTerms {
    pub token: Address,
    pub recipient: Address,
    pub amount: U256,
    pub first_target: Address,
    pub first_calldata: Bytes,
}

impl TransferBatchTerms {
    /// Validate raw wallet input. Argument names in errors follow the enforcer's ABI.
    pub fn parse(
        token: &str,
        recipient: &str,
        amount: &str,
        first_target: &str,
        first_calldata: &str,
    ) -> Result<Self, CaveatError> {
        Ok(Self {
            token: parse_address("erc20TokenAddress", token)?,
            recipient: parse_address("tokenTransferRecipientAddress", recipient)?,
            amount: parse_amount("transferAmount", amount)?,
            first_target: parse_address("firstTxRecipientAddress", first_target)?,
            first_calldata: parse_calldata("firstTxCalldata", first_calldata)?,
        })
    }

    /// Packed `(address, address, uint256, address, bytes)`.
    pub fn encode(&self) -> Bytes {
        let mut buf = Vec::with_capacity(TRANSFER_BATCH_HEAD_LEN + self.first_calldata.len());
        buf.extend_from_slice(self.token.as_slice());
        buf.extend_from_slice(self.recipient.as_slice());
        buf.extend_from_slice(&self.amount.to_be_bytes::<32>());
        buf.extend_from_slice(self.first_target.as_slice());
        buf.extend_from_slice(&self.first_calldata);
        buf.into()
    }
}

/// Build the token-payment caveat for `environment`.
pub fn specific_action_erc20_transfer_batch(
    environment: &DelegationEnvironment,
    terms: &TransferBatchTerms,
) -> Caveat {
    Caveat {
        enforcer: environment.caveat_enforcers.specific_action_erc20_transfer_batch,
        terms: terms.encode(),
        args: Bytes::new(),
    }
}
