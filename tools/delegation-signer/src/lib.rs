//! Local signing for the delegation publish flow: EIP-712 delegation signatures and EIP-7702
//! authorization signatures from a single secp256k1 key.

pub mod authorization;
pub mod eip712;
mod signer;

use alloy_primitives::{hex, Address, ChainId};

pub use signer::LocalSigner;

#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("private key is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("invalid secp256k1 private key")]
    InvalidKey(#[source] k256::ecdsa::Error),
    #[error("signing failed")]
    Signing(#[source] k256::ecdsa::Error),
    #[error("no delegation environment for chain {0}")]
    UnknownChain(ChainId),
    #[error("signer {signer} cannot sign for delegator {delegator}")]
    NotDelegator {
        delegator: Address,
        signer: Address,
    },
}
