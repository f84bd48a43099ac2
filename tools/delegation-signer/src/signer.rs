use std::sync::Arc;

use alloy_primitives::{hex, Address, Bytes, ChainId, B256};
use async_trait::async_trait;
use delegation_publish::{
    interfaces::{AuthorizationSigner, DelegationSigner},
    BoxError, EnvironmentRegistry,
};
use delegation_types::{AuthorizationRequest, UnsignedDelegation};
use k256::ecdsa::SigningKey;

use crate::{authorization::authorization_digest, eip712::delegation_digest, SignerError};

/// In-process secp256k1 key signing both delegations and 7702 authorizations.
#[derive(Clone)]
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
    environments: Arc<EnvironmentRegistry>,
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner").field("address", &self.address).finish_non_exhaustive()
    }
}

impl LocalSigner {
    pub fn new(key: SigningKey, environments: Arc<EnvironmentRegistry>) -> Self {
        let point = key.verifying_key().to_encoded_point(false);
        let address = Address::from_raw_public_key(&point.as_bytes()[1..]);
        Self {
            key,
            address,
            environments,
        }
    }

    /// Accepts the key with or without `0x`.
    pub fn from_hex(
        key: &str,
        environments: Arc<EnvironmentRegistry>,
    ) -> Result<Self, SignerError> {
        let bytes = hex::decode(key.trim())?;
        let key = SigningKey::from_slice(&bytes).map_err(SignerError::InvalidKey)?;
        Ok(Self::new(key, environments))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// `r || s || v` with `v` in {27, 28}.
    pub fn sign_digest(&self, digest: B256) -> Result<Bytes, SignerError> {
        let (signature, recovery_id) =
            self.key.sign_prehash_recoverable(digest.as_slice()).map_err(SignerError::Signing)?;

        let mut sig_bytes = Vec::with_capacity(65);
        sig_bytes.extend_from_slice(&signature.to_bytes());
        sig_bytes.push(27 + recovery_id.to_byte());
        Ok(sig_bytes.into())
    }

    pub fn sign_delegation_digest(
        &self,
        chain_id: ChainId,
        delegation: &UnsignedDelegation,
    ) -> Result<Bytes, SignerError> {
        if delegation.delegator != self.address {
            return Err(SignerError::NotDelegator {
                delegator: delegation.delegator,
                signer: self.address,
            });
        }
        let environment =
            self.environments.get(chain_id).ok_or(SignerError::UnknownChain(chain_id))?;
        self.sign_digest(delegation_digest(chain_id, environment.delegation_manager, delegation))
    }
}

#[async_trait]
impl DelegationSigner for LocalSigner {
    async fn sign_delegation(
        &self,
        chain_id: ChainId,
        delegation: &UnsignedDelegation,
    ) -> Result<Bytes, BoxError> {
        Ok(self.sign_delegation_digest(chain_id, delegation)?)
    }
}

#[async_trait]
impl AuthorizationSigner for LocalSigner {
    async fn sign_eip7702_authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<Bytes, BoxError> {
        if request.from != self.address {
            return Err(SignerError::NotDelegator {
                delegator: request.from,
                signer: self.address,
            }
            .into());
        }
        Ok(self.sign_digest(authorization_digest(request))?)
    }
}
