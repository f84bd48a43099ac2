use std::fmt;

use alloy_primitives::{Address, Bytes, B256, U64};
use serde::{Deserialize, Serialize};

use crate::authorization::AuthorizationListEntry;

/// Payload submitted to the transaction relay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelaySubmitRequest {
    pub chain_id: U64,
    /// Delegation manager contract.
    pub to: Address,
    pub data: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_list: Option<Vec<AuthorizationListEntry>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaySubmitResponse {
    pub uuid: String,
}

/// Relay-side status of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelayStatus {
    Pending,
    Submitted,
    Success,
    Failed,
    Reverted,
    Dropped,
    Unknown(String),
}

impl RelayStatus {
    /// Whether polling can stop.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Submitted)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Submitted => "SUBMITTED",
            Self::Success => "VALIDATED",
            Self::Failed => "FAILED",
            Self::Reverted => "REVERTED",
            Self::Dropped => "DROPPED",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for RelayStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "SUBMITTED" => Self::Submitted,
            "VALIDATED" => Self::Success,
            "FAILED" => Self::Failed,
            "REVERTED" => Self::Reverted,
            "DROPPED" => Self::Dropped,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<RelayStatus> for String {
    fn from(status: RelayStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for RelayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one relay status query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<B256>,
    pub status: RelayStatus,
}
