//! EIP-7702 delegation publishing for sponsored and gasless transactions.
//!
//! Flow: capability check -> gas payment resolution -> delegation assembly (one caveat) ->
//! delegation signature -> authorization list (un-upgraded accounts only) -> relay submit -> poll.
//!
//! Signing, capability queries and the relay transport are collaborators behind the traits in
//! [`interfaces`]; this crate only orchestrates them and encodes what the enforcers check.

pub mod authorization;
pub mod calldata;
pub mod caveat;
pub mod config;
pub mod delegation;
pub mod environment;
pub mod errors;
pub mod hook;
pub mod interfaces;
pub mod relay;

pub use config::PublishConfig;
pub use environment::EnvironmentRegistry;
pub use errors::{AuthorizationError, BoxError, CaveatError, EnvironmentError, PublishError};
pub use hook::{Delegation7702PublishHook, PublishHookDeps, PublishHookResult};
