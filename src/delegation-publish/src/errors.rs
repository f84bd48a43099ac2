use alloy_primitives::{Address, ChainId};
use delegation_types::RelayStatus;

/// Failure reported by a collaborator (signer, relay, capability store).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors while validating caveat arguments or decoding caveat terms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaveatError {
    #[error("invalid {field}: must be a valid address")]
    InvalidAddress { field: &'static str },
    #[error("invalid {field}: must be a non-negative integer")]
    NegativeAmount { field: &'static str },
    #[error("invalid {field}: must be a decimal or hexadecimal integer")]
    InvalidAmount { field: &'static str },
    #[error("invalid {field}: must be a hexadecimal string")]
    InvalidHex { field: &'static str },
    #[error("transaction has no recipient to bind the first action to")]
    MissingRecipient,
    #[error("no caveats were added")]
    EmptyCaveats,
    #[error("caveat terms are truncated")]
    Truncated,
}

/// Errors while decoding an authorization signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("authorization signature must be 65 bytes, got {0}")]
    InvalidSignatureLength(usize),
    #[error("unsupported recovery id {0} in authorization signature")]
    InvalidRecoveryId(u8),
}

/// Errors while loading or validating the per-chain environment table.
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    #[error("failed reading environment file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed parsing environment JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("chain id `{0}` is not a decimal integer")]
    InvalidChainId(String),
    #[error("chain {chain_id}: {contract} address must not be zero")]
    ZeroAddress {
        chain_id: ChainId,
        contract: &'static str,
    },
}

/// Fatal errors of a publish attempt. "Not applicable" is not an error; it is an empty result.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("atomic batch support query failed: {0}")]
    CapabilityQuery(#[source] BoxError),
    #[error("Selected gas fee token not found: {0}")]
    GasFeeTokenNotFound(Address),
    #[error("no delegation environment for chain {0}")]
    UnknownChain(ChainId),
    #[error(transparent)]
    Caveat(#[from] CaveatError),
    #[error("delegation signing failed: {0}")]
    DelegationSigning(#[source] BoxError),
    #[error("Upgrade contract address not found")]
    UpgradeContractNotFound,
    #[error("transaction has no nonce to authorize")]
    MissingNonce,
    #[error("authorization signing failed: {0}")]
    AuthorizationSigning(#[source] BoxError),
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    #[error("calldata generation failed: {0}")]
    Calldata(#[source] BoxError),
    #[error("relay submission failed: {0}")]
    RelaySubmit(#[source] BoxError),
    #[error("relay status query failed: {0}")]
    RelayStatus(#[source] BoxError),
    #[error("Transaction relay error - {0}")]
    RelayFailed(RelayStatus),
    #[error("relay reported success without a transaction hash")]
    MissingTransactionHash,
}
