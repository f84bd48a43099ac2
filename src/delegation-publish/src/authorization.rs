//! EIP-7702 authorization list for accounts that are not yet upgraded.

use alloy_primitives::{Address, B256, U64};
use delegation_types::{AuthorizationListEntry, AuthorizationRequest, TransactionMeta, YParity};

use crate::{
    errors::{AuthorizationError, PublishError},
    interfaces::AuthorizationSigner,
};

/// `r || s || v`.
pub const SIGNATURE_LENGTH: usize = 65;

/// Components of a 65-byte authorization signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAuthorizationSignature {
    pub r: B256,
    pub s: B256,
    pub y_parity: YParity,
}

/// Split `r || s || v` and derive the parity from `v`.
///
/// `v` is accepted as `27`/`28` or as a raw parity `0`/`1`. Any other `v` is rejected rather
/// than read as odd, so a byte such as `0` or `29` never maps to `"0x1"` through `v - 27 != 0`.
pub fn decode_authorization_signature(
    signature: &[u8],
) -> Result<DecodedAuthorizationSignature, AuthorizationError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(AuthorizationError::InvalidSignatureLength(signature.len()));
    }
    let y_parity = match signature[64] {
        0 | 27 => YParity::Even,
        1 | 28 => YParity::Odd,
        v => return Err(AuthorizationError::InvalidRecoveryId(v)),
    };

    Ok(DecodedAuthorizationSignature {
        r: B256::from_slice(&signature[0..32]),
        s: B256::from_slice(&signature[32..64]),
        y_parity,
    })
}

/// Request an authorization for `upgrade_contract` and turn it into a one-entry list.
pub async fn build_authorization_list(
    signer: &dyn AuthorizationSigner,
    meta: &TransactionMeta,
    upgrade_contract: Option<Address>,
) -> Result<Vec<AuthorizationListEntry>, PublishError> {
    tracing::debug!("including authorization as account is not upgraded");

    let contract_address = upgrade_contract.ok_or(PublishError::UpgradeContractNotFound)?;
    let nonce = meta.tx_params.nonce.ok_or(PublishError::MissingNonce)?;

    let request = AuthorizationRequest {
        chain_id: meta.chain_id(),
        contract_address,
        from: meta.from(),
        nonce: nonce.to::<u64>(),
    };
    let signature = signer
        .sign_eip7702_authorization(&request)
        .await
        .map_err(PublishError::AuthorizationSigning)?;

    let DecodedAuthorizationSignature { r, s, y_parity } =
        decode_authorization_signature(&signature)?;
    tracing::debug!(%signature, %r, %s, ?y_parity, "authorization signature");

    Ok(vec![AuthorizationListEntry {
        address: contract_address,
        chain_id: meta.chain_id,
        nonce: U64::from(request.nonce),
        r,
        s,
        y_parity,
    }])
}
