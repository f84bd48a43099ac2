//! Publish hook: routes a wallet transaction through a signed self-delegation and the relay.

use std::sync::Arc;

use alloy_primitives::B256;
use delegation_types::{AccountUpgrade, RelaySubmitRequest, TransactionMeta};
use serde::{Deserialize, Serialize};

use crate::{
    authorization::build_authorization_list,
    config::PublishConfig,
    delegation::{build_unsigned_delegation, resolve_gas_payment},
    environment::EnvironmentRegistry,
    errors::PublishError,
    interfaces::{
        AtomicBatchSupport, AuthorizationSigner, BridgeStatusLookup, CalldataGenerator,
        DelegationSigner, RelayTransport,
    },
    relay::wait_for_relay_result,
};

/// Outcome of a publish attempt. Without a hash the wallet falls back to its default publish.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishHookResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<B256>,
}

impl PublishHookResult {
    /// The hook does not apply to this transaction.
    pub const EMPTY: Self = Self {
        transaction_hash: None,
    };

    pub fn is_empty(&self) -> bool {
        self.transaction_hash.is_none()
    }
}

/// Collaborators of the hook.
#[derive(Clone)]
pub struct PublishHookDeps {
    pub atomic_batch: Arc<dyn AtomicBatchSupport>,
    pub bridge_status: Arc<dyn BridgeStatusLookup>,
    pub delegation_signer: Arc<dyn DelegationSigner>,
    pub authorization_signer: Arc<dyn AuthorizationSigner>,
    pub calldata: Arc<dyn CalldataGenerator>,
    pub relay: Arc<dyn RelayTransport>,
}

#[derive(Clone)]
pub struct Delegation7702PublishHook {
    deps: PublishHookDeps,
    environments: Arc<EnvironmentRegistry>,
    config: PublishConfig,
}

impl Delegation7702PublishHook {
    pub fn new(
        deps: PublishHookDeps,
        environments: Arc<EnvironmentRegistry>,
        config: PublishConfig,
    ) -> Self {
        Self {
            deps,
            environments,
            config,
        }
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    /// Publish `meta` through the relay.
    ///
    /// Returns [`PublishHookResult::EMPTY`] when the account, chain or gas setup does not call
    /// for delegation. Every other failure is fatal and returned after being logged.
    pub async fn publish(&self, meta: &TransactionMeta) -> Result<PublishHookResult, PublishError> {
        self.run(meta).await.inspect_err(|err| {
            tracing::error!(
                transaction_id = %meta.id,
                chain_id = meta.chain_id(),
                error = %err,
                "delegation publish failed"
            );
        })
    }

    async fn run(&self, meta: &TransactionMeta) -> Result<PublishHookResult, PublishError> {
        let chain_id = meta.chain_id();
        let from = meta.from();

        let support = self
            .deps
            .atomic_batch
            .is_atomic_batch_supported(from, &[chain_id])
            .await
            .map_err(PublishError::CapabilityQuery)?;
        let Some(chain_support) = support.into_iter().find(|entry| entry.chain_id() == chain_id)
        else {
            tracing::debug!(chain_id, "skipping as EIP-7702 is not supported on chain");
            return Ok(PublishHookResult::EMPTY);
        };

        let upgrade = chain_support.account_upgrade();
        if let AccountUpgrade::UpgradedToUnknownContract(delegation_address) = upgrade {
            tracing::debug!(
                %from,
                %delegation_address,
                "skipping as account is upgraded to unsupported contract"
            );
            return Ok(PublishHookResult::EMPTY);
        }

        let is_gasless = self
            .deps
            .bridge_status
            .is_gas_included_7702(chain_id, &meta.id)
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(
                    transaction_id = %meta.id,
                    error = %err,
                    "gasless lookup failed, assuming gas is not included"
                );
                false
            });

        let Some(gas_payment) = resolve_gas_payment(meta, is_gasless)? else {
            tracing::debug!(transaction_id = %meta.id, "skipping as no gas fee token selected");
            return Ok(PublishHookResult::EMPTY);
        };
        tracing::debug!(?gas_payment, ?upgrade, "publishing through delegation");

        let environment =
            self.environments.get(chain_id).ok_or(PublishError::UnknownChain(chain_id))?;
        let unsigned = build_unsigned_delegation(environment, &meta.tx_params, &gas_payment)?;
        let signature = self
            .deps
            .delegation_signer
            .sign_delegation(chain_id, &unsigned)
            .await
            .map_err(PublishError::DelegationSigning)?;
        let delegation = unsigned.into_signed(signature);
        tracing::debug!(signature = %delegation.signature, "signed delegation");

        let authorization_list = match upgrade {
            AccountUpgrade::NotUpgraded => Some(
                build_authorization_list(
                    self.deps.authorization_signer.as_ref(),
                    meta,
                    chain_support.upgrade_contract_address,
                )
                .await?,
            ),
            _ => None,
        };

        let data = self
            .deps
            .calldata
            .generate(environment, &meta.tx_params, &delegation)
            .map_err(PublishError::Calldata)?;
        let request = RelaySubmitRequest {
            chain_id: meta.chain_id,
            to: environment.delegation_manager,
            data,
            authorization_list,
        };
        tracing::debug!(?request, "relay request");

        let uuid = self.deps.relay.submit(&request).await.map_err(PublishError::RelaySubmit)?.uuid;
        tracing::debug!(%uuid, "submitted to relay");

        let result = wait_for_relay_result(
            self.deps.relay.as_ref(),
            chain_id,
            &uuid,
            self.config.poll_interval(),
        )
        .await?;

        if !result.status.is_success() {
            return Err(PublishError::RelayFailed(result.status));
        }
        let transaction_hash = result.transaction_hash.ok_or(PublishError::MissingTransactionHash)?;
        tracing::debug!(%transaction_hash, "relay transaction confirmed");

        Ok(PublishHookResult {
            transaction_hash: Some(transaction_hash),
        })
    }
}
