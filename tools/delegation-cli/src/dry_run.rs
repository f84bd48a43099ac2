//! Offline run of the publish hook: real caveats, signatures and calldata, with the wallet
//! controllers answered statically and the relay replaced by a recorder.

use std::sync::{Arc, Mutex};

use alloy_primitives::{keccak256, Address, ChainId, B256, U64};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use delegation_publish::{
    calldata::RedeemDelegationsCalldata,
    interfaces::{AtomicBatchSupport, BridgeStatusLookup, RelayTransport},
    BoxError, Delegation7702PublishHook, EnvironmentRegistry, PublishConfig, PublishHookDeps,
};
use delegation_signer::LocalSigner;
use delegation_types::{
    AtomicBatchChainSupport, RelayResult, RelayStatus, RelaySubmitRequest, RelaySubmitResponse,
    TransactionMeta,
};
use serde::Serialize;

pub const DRY_RUN_UUID: &str = "dry-run";

/// Account state reported for the single chain of the dry run.
pub struct StaticCapability(pub AtomicBatchChainSupport);

#[async_trait]
impl AtomicBatchSupport for StaticCapability {
    async fn is_atomic_batch_supported(
        &self,
        _address: Address,
        _chain_ids: &[ChainId],
    ) -> Result<Vec<AtomicBatchChainSupport>, BoxError> {
        Ok(vec![self.0.clone()])
    }
}

pub struct StaticBridgeStatus(pub bool);

#[async_trait]
impl BridgeStatusLookup for StaticBridgeStatus {
    async fn is_gas_included_7702(&self, _: ChainId, _: &str) -> Result<bool, BoxError> {
        Ok(self.0)
    }
}

/// Keeps the submitted request and reports it confirmed straight away.
#[derive(Default)]
pub struct CapturingRelay {
    captured: Mutex<Option<RelaySubmitRequest>>,
}

impl CapturingRelay {
    pub fn captured(&self) -> Option<RelaySubmitRequest> {
        self.captured.lock().ok().and_then(|captured| captured.clone())
    }
}

#[async_trait]
impl RelayTransport for CapturingRelay {
    async fn submit(&self, request: &RelaySubmitRequest) -> Result<RelaySubmitResponse, BoxError> {
        *self.captured.lock().map_err(|_| "relay capture poisoned")? = Some(request.clone());
        Ok(RelaySubmitResponse {
            uuid: DRY_RUN_UUID.to_string(),
        })
    }

    async fn status(&self, _: ChainId, _: &str) -> Result<RelayResult, BoxError> {
        let captured = self.captured().ok_or("nothing was submitted")?;
        Ok(RelayResult {
            transaction_hash: Some(keccak256(&captured.data)),
            status: RelayStatus::Success,
        })
    }
}

/// Outcome of a dry run. The relay fields are present only when the hook applied.
#[derive(Debug, Serialize)]
pub struct DryRunReport {
    pub generated_at: String,
    pub transaction_id: String,
    pub applicable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<U64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relay_request: Option<RelaySubmitRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulated_transaction_hash: Option<B256>,
}

impl DryRunReport {
    fn not_applicable(meta: &TransactionMeta) -> Self {
        Self {
            generated_at: crate::output::now_rfc3339(),
            transaction_id: meta.id.clone(),
            applicable: false,
            chain_id: None,
            relay_request: None,
            simulated_transaction_hash: None,
        }
    }
}

pub struct DryRunOptions {
    pub gasless: bool,
    pub delegation_address: Option<Address>,
    pub upgrade_contract: Option<Address>,
    pub config: PublishConfig,
}

/// Run the hook for `meta` and report the relay request it submitted.
pub async fn dry_run(
    registry: Arc<EnvironmentRegistry>,
    signer: LocalSigner,
    meta: &TransactionMeta,
    options: DryRunOptions,
) -> Result<DryRunReport> {
    let chain_id = meta.chain_id();
    let environment = registry
        .get(chain_id)
        .with_context(|| format!("no delegation environment for chain {chain_id}"))?;

    let upgrade_contract_address =
        options.upgrade_contract.or(environment.eip7702_stateless_delegator_impl);
    let support = AtomicBatchChainSupport {
        chain_id: meta.chain_id,
        is_supported: options.delegation_address.is_some(),
        delegation_address: options.delegation_address,
        upgrade_contract_address,
    };
    tracing::info!(
        signer = %signer.address(),
        account_upgrade = ?support.account_upgrade(),
        gasless = options.gasless,
        "starting dry run"
    );

    let signer = Arc::new(signer);
    let relay = Arc::new(CapturingRelay::default());
    let deps = PublishHookDeps {
        atomic_batch: Arc::new(StaticCapability(support)),
        bridge_status: Arc::new(StaticBridgeStatus(options.gasless)),
        delegation_signer: signer.clone(),
        authorization_signer: signer,
        calldata: Arc::new(RedeemDelegationsCalldata),
        relay: relay.clone(),
    };
    let hook = Delegation7702PublishHook::new(deps, registry, options.config);

    let result = hook.publish(meta).await.context("publish hook failed")?;
    let Some(transaction_hash) = result.transaction_hash else {
        return Ok(DryRunReport::not_applicable(meta));
    };
    let request = relay
        .captured()
        .ok_or_else(|| anyhow!("hook returned a hash without submitting"))?;

    Ok(DryRunReport {
        generated_at: crate::output::now_rfc3339(),
        transaction_id: meta.id.clone(),
        applicable: true,
        chain_id: Some(U64::from(chain_id)),
        relay_request: Some(request),
        simulated_transaction_hash: Some(transaction_hash),
    })
}
