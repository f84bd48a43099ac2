//! Shared types for delegation publishing: caveats, delegations, transactions, authorizations,
//! relay payloads and per-chain environments.
//!
//! Field names serialise in camelCase so the same JSON shapes flow between the wallet, the relay
//! and the offline tooling.

pub mod authorization;
pub mod capability;
pub mod delegation;
pub mod environment;
pub mod relay;
pub mod transaction;

pub use authorization::{AuthorizationListEntry, AuthorizationRequest, YParity};
pub use capability::{AccountUpgrade, AtomicBatchChainSupport};
pub use delegation::{Caveat, Delegation, UnsignedDelegation, ROOT_AUTHORITY};
pub use environment::{CaveatEnforcers, DelegationEnvironment};
pub use relay::{RelayResult, RelayStatus, RelaySubmitRequest, RelaySubmitResponse};
pub use transaction::{GasFeeToken, TransactionMeta, TransactionParams};
