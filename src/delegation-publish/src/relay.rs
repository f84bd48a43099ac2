use std::time::Duration;

use alloy_primitives::ChainId;
use delegation_types::RelayResult;

use crate::{errors::PublishError, interfaces::RelayTransport};

/// Poll the relay until it reports a terminal status.
///
/// There is no attempt bound; the relay is expected to eventually settle every submission.
pub async fn wait_for_relay_result(
    relay: &dyn RelayTransport,
    chain_id: ChainId,
    uuid: &str,
    interval: Duration,
) -> Result<RelayResult, PublishError> {
    let mut polls = 0u64;
    loop {
        let result = relay.status(chain_id, uuid).await.map_err(PublishError::RelayStatus)?;
        polls += 1;
        if result.status.is_terminal() {
            tracing::debug!(uuid, polls, status = %result.status, "relay settled");
            return Ok(result);
        }
        tracing::trace!(uuid, status = %result.status, "relay pending");
        tokio::time::sleep(interval).await;
    }
}
