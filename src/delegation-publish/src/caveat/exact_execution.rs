use alloy_primitives::Bytes;
use delegation_types::{Caveat, DelegationEnvironment};

use crate::{caveat::args::parse_calldata, errors::CaveatError};

/// Terms for `ExactExecutionEnforcer`: the redeemed execution must carry exactly this calldata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExactExecutionTerms {
    pub expected_execution: Bytes,
}

impl ExactExecutionTerms {
    pub fn new(expected_execution: Bytes) -> Self {
        Self { expected_execution }
    }

    pub fn parse(expected_execution: &str) -> Result<Self, CaveatError> {
        Ok(Self::new(parse_calldata("expectedExecution", expected_execution)?))
    }

    /// Packed `bytes`: the calldata verbatim.
    pub fn encode(&self) -> Bytes {
        self.expected_execution.clone()
    }
}

/// Build the exact-execution caveat for `environment`.
pub fn exact_execution(environment: &DelegationEnvironment, terms: &ExactExecutionTerms) -> Caveat {
    Caveat {
        enforcer: environment.caveat_enforcers.exact_execution,
        terms: terms.encode(),
        args: Bytes::new(),
    }
}
