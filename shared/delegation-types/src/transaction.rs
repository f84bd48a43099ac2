use alloy_primitives::{Address, Bytes, ChainId, U256, U64};
use serde::{Deserialize, Serialize};

/// Raw parameters of the transaction being published.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionParams {
    pub from: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U64>,
}

impl TransactionParams {
    /// Calldata, or empty bytes when the transaction carries none.
    pub fn data_or_empty(&self) -> Bytes {
        self.data.clone().unwrap_or_default()
    }
}

/// ERC-20 token the account may use to pay for gas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasFeeToken {
    pub token_address: Address,
    /// Receiver of the gas payment.
    pub recipient: Address,
    pub amount: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
}

/// Pending transaction as handed over by the transaction lifecycle manager.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    pub id: String,
    pub chain_id: U64,
    pub tx_params: TransactionParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_gas_fee_token: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_fee_tokens: Option<Vec<GasFeeToken>>,
}

impl TransactionMeta {
    pub fn chain_id(&self) -> ChainId {
        self.chain_id.to::<u64>()
    }

    pub fn from(&self) -> Address {
        self.tx_params.from
    }
}
