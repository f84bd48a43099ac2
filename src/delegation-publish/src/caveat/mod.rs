//! Caveats restricting a delegation, and the builder that collects them in evaluation order.

pub mod args;
mod decoder;
mod exact_execution;
mod transfer_batch;

pub use decoder::{decode_exact_execution_terms, decode_transfer_batch_terms};
pub use delegation_types::Caveat;
pub use exact_execution::{exact_execution, ExactExecutionTerms};
pub use transfer_batch::{
    specific_action_erc20_transfer_batch, TransferBatchTerms, TRANSFER_BATCH_HEAD_LEN,
};

use delegation_types::DelegationEnvironment;

use crate::errors::CaveatError;

/// A caveat to build, with its typed arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaveatSpec {
    ExactExecution(ExactExecutionTerms),
    SpecificActionErc20TransferBatch(TransferBatchTerms),
}

impl CaveatSpec {
    pub fn build(&self, environment: &DelegationEnvironment) -> Caveat {
        match self {
            Self::ExactExecution(terms) => exact_execution(environment, terms),
            Self::SpecificActionErc20TransferBatch(terms) => {
                specific_action_erc20_transfer_batch(environment, terms)
            }
        }
    }
}

/// Collects caveats for one delegation. Enforcers run on-chain in the order caveats are added.
#[derive(Clone, Debug)]
pub struct CaveatBuilder<'a> {
    environment: &'a DelegationEnvironment,
    specs: Vec<CaveatSpec>,
}

impl<'a> CaveatBuilder<'a> {
    pub fn new(environment: &'a DelegationEnvironment) -> Self {
        Self {
            environment,
            specs: Vec::new(),
        }
    }

    pub fn add(mut self, spec: CaveatSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn build(self) -> Result<Vec<Caveat>, CaveatError> {
        if self.specs.is_empty() {
            return Err(CaveatError::EmptyCaveats);
        }
        Ok(self.specs.iter().map(|spec| spec.build(self.environment)).collect())
    }
}
