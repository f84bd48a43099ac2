//! Assembly of the self-delegation that the relay redeems on the account's behalf.

use delegation_types::{
    DelegationEnvironment, GasFeeToken, TransactionMeta, TransactionParams, UnsignedDelegation,
};

use crate::{
    caveat::{CaveatBuilder, CaveatSpec, ExactExecutionTerms, TransferBatchTerms},
    errors::{CaveatError, PublishError},
};

/// How the gas of a delegated transaction is paid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GasPayment {
    /// Gas is covered by a third party (e.g. a bridge quote); only the call is bound.
    Gasless,
    /// Gas is paid by transferring `token` in the same batch as the call.
    Token(GasFeeToken),
}

/// Decide how gas is paid, or `None` when the delegation path does not apply.
pub fn resolve_gas_payment(
    meta: &TransactionMeta,
    is_gasless: bool,
) -> Result<Option<GasPayment>, PublishError> {
    if is_gasless {
        return Ok(Some(GasPayment::Gasless));
    }

    let tokens = meta.gas_fee_tokens.as_deref().unwrap_or_default();
    let Some(selected) = meta.selected_gas_fee_token.filter(|_| !tokens.is_empty()) else {
        return Ok(None);
    };

    tokens
        .iter()
        .find(|token| token.token_address == selected)
        .cloned()
        .map(|token| Some(GasPayment::Token(token)))
        .ok_or(PublishError::GasFeeTokenNotFound(selected))
}

/// Build the unsigned self-delegation (`delegator == delegate == tx.from`) with exactly one
/// caveat binding the original call.
///
/// The native `value` of the transaction is not part of either caveat's terms.
pub fn build_unsigned_delegation(
    environment: &DelegationEnvironment,
    tx: &TransactionParams,
    gas_payment: &GasPayment,
) -> Result<UnsignedDelegation, CaveatError> {
    let caveat = match gas_payment {
        GasPayment::Token(token) => {
            let first_target = tx.to.ok_or(CaveatError::MissingRecipient)?;
            CaveatSpec::SpecificActionErc20TransferBatch(TransferBatchTerms {
                token: token.token_address,
                recipient: token.recipient,
                amount: token.amount,
                first_target,
                first_calldata: tx.data_or_empty(),
            })
        }
        GasPayment::Gasless => {
            CaveatSpec::ExactExecution(ExactExecutionTerms::new(tx.data_or_empty()))
        }
    };

    let caveats = CaveatBuilder::new(environment).add(caveat).build()?;
    tracing::debug!(?caveats, "built caveats");

    Ok(UnsignedDelegation::new(tx.from, tx.from, caveats))
}
