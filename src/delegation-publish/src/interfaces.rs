//! Collaborators the publish hook depends on.
//!
//! Implementations live with the embedding wallet (keyring, delegation controller, bridge status
//! store, relay client). Failures are returned as [`BoxError`] and wrapped by the hook with the
//! stage they occurred in.

use alloy_primitives::{Address, Bytes, ChainId};
use async_trait::async_trait;
use delegation_types::{
    AtomicBatchChainSupport, AuthorizationRequest, Delegation, DelegationEnvironment,
    RelayResult, RelaySubmitRequest, RelaySubmitResponse, TransactionParams, UnsignedDelegation,
};

use crate::errors::BoxError;

/// EIP-7702 upgrade state of an account across chains.
#[async_trait]
pub trait AtomicBatchSupport: Send + Sync {
    async fn is_atomic_batch_supported(
        &self,
        address: Address,
        chain_ids: &[ChainId],
    ) -> Result<Vec<AtomicBatchChainSupport>, BoxError>;
}

/// Bridge quotes that already include gas through EIP-7702.
#[async_trait]
pub trait BridgeStatusLookup: Send + Sync {
    async fn is_gas_included_7702(
        &self,
        chain_id: ChainId,
        transaction_id: &str,
    ) -> Result<bool, BoxError>;
}

/// Signs delegations on behalf of the delegator. May wait for user or hardware approval.
#[async_trait]
pub trait DelegationSigner: Send + Sync {
    async fn sign_delegation(
        &self,
        chain_id: ChainId,
        delegation: &UnsignedDelegation,
    ) -> Result<Bytes, BoxError>;
}

/// Signs EIP-7702 authorizations. Must return a 65-byte `r || s || v` signature.
#[async_trait]
pub trait AuthorizationSigner: Send + Sync {
    async fn sign_eip7702_authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<Bytes, BoxError>;
}

/// Encodes the call the relay sends to the delegation manager.
pub trait CalldataGenerator: Send + Sync {
    fn generate(
        &self,
        environment: &DelegationEnvironment,
        transaction: &TransactionParams,
        delegation: &Delegation,
    ) -> Result<Bytes, BoxError>;
}

/// Transaction relay submitting delegated calls on-chain.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn submit(&self, request: &RelaySubmitRequest) -> Result<RelaySubmitResponse, BoxError>;

    async fn status(&self, chain_id: ChainId, uuid: &str) -> Result<RelayResult, BoxError>;
}
