use std::sync::{Arc, Mutex};

use alloy_primitives::{address, bytes, Address, Bytes, ChainId, B256, U256, U64};
use async_trait::async_trait;
use delegation_publish::{
    calldata::RedeemDelegationsCalldata,
    caveat::{decode_transfer_batch_terms, TransferBatchTerms},
    interfaces::{
        AtomicBatchSupport, AuthorizationSigner, BridgeStatusLookup, DelegationSigner,
        RelayTransport,
    },
    AuthorizationError, BoxError, Delegation7702PublishHook, EnvironmentRegistry, PublishConfig,
    PublishError, PublishHookDeps, PublishHookResult,
};
use delegation_types::{
    AtomicBatchChainSupport, AuthorizationRequest, CaveatEnforcers, DelegationEnvironment,
    GasFeeToken, RelayResult, RelayStatus, RelaySubmitRequest, RelaySubmitResponse,
    TransactionMeta, TransactionParams, UnsignedDelegation, YParity,
};

const CHAIN_ID: ChainId = 11_155_111;
const FROM: Address = address!("1111111111111111111111111111111111111111");
const TO: Address = address!("2222222222222222222222222222222222222222");
const TOKEN: Address = address!("3333333333333333333333333333333333333333");
const FEE_RECIPIENT: Address = address!("4444444444444444444444444444444444444444");
const UPGRADE_CONTRACT: Address = address!("cccccccccccccccccccccccccccccccccccccccc");
const DELEGATION_MANAGER: Address = address!("dddddddddddddddddddddddddddddddddddddddd");
const EXACT_EXECUTION: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");
const TRANSFER_BATCH: Address = address!("ffffffffffffffffffffffffffffffffffffffff");
const TX_HASH: B256 = B256::repeat_byte(0xab);

enum Support {
    Chains(Vec<AtomicBatchChainSupport>),
    Fails,
}

#[async_trait]
impl AtomicBatchSupport for Support {
    async fn is_atomic_batch_supported(
        &self,
        address: Address,
        chain_ids: &[ChainId],
    ) -> Result<Vec<AtomicBatchChainSupport>, BoxError> {
        assert_eq!(address, FROM);
        assert_eq!(chain_ids, &[CHAIN_ID]);
        match self {
            Self::Chains(chains) => Ok(chains.clone()),
            Self::Fails => Err("capability controller unavailable".into()),
        }
    }
}

enum BridgeAnswer {
    Gasless,
    NotGasless,
    Fails,
}

#[async_trait]
impl BridgeStatusLookup for BridgeAnswer {
    async fn is_gas_included_7702(&self, _: ChainId, _: &str) -> Result<bool, BoxError> {
        match self {
            Self::Gasless => Ok(true),
            Self::NotGasless => Ok(false),
            Self::Fails => Err("bridge status store unavailable".into()),
        }
    }
}

#[derive(Clone, Copy, Default)]
enum SignerBehavior {
    #[default]
    Valid,
    DelegationFails,
    AuthorizationFails,
    ShortAuthorization,
}

#[derive(Default)]
struct RecordingSigner {
    behavior: SignerBehavior,
    delegations: Mutex<Vec<(ChainId, UnsignedDelegation)>>,
    authorizations: Mutex<Vec<AuthorizationRequest>>,
}

impl RecordingSigner {
    fn new(behavior: SignerBehavior) -> Self {
        Self {
            behavior,
            ..Default::default()
        }
    }

    fn delegations(&self) -> Vec<(ChainId, UnsignedDelegation)> {
        self.delegations.lock().unwrap().clone()
    }

    fn authorizations(&self) -> Vec<AuthorizationRequest> {
        self.authorizations.lock().unwrap().clone()
    }
}

#[async_trait]
impl DelegationSigner for RecordingSigner {
    async fn sign_delegation(
        &self,
        chain_id: ChainId,
        delegation: &UnsignedDelegation,
    ) -> Result<Bytes, BoxError> {
        self.delegations.lock().unwrap().push((chain_id, delegation.clone()));
        match self.behavior {
            SignerBehavior::DelegationFails => Err("user rejected the request".into()),
            _ => Ok(bytes!("deadbeef")),
        }
    }
}

#[async_trait]
impl AuthorizationSigner for RecordingSigner {
    async fn sign_eip7702_authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<Bytes, BoxError> {
        self.authorizations.lock().unwrap().push(request.clone());
        let mut signature = vec![0x11; 32];
        signature.extend_from_slice(&[0x22; 32]);
        match self.behavior {
            SignerBehavior::AuthorizationFails => Err("keyring locked".into()),
            SignerBehavior::ShortAuthorization => Ok(signature.into()),
            _ => {
                signature.push(28);
                Ok(signature.into())
            }
        }
    }
}

struct RecordingRelay {
    submit_fails: bool,
    submitted: Mutex<Vec<RelaySubmitRequest>>,
    results: Mutex<Vec<RelayResult>>,
    polled: Mutex<Vec<RelayStatus>>,
}

impl RecordingRelay {
    fn new(mut results: Vec<RelayResult>) -> Self {
        results.reverse();
        Self {
            submit_fails: false,
            submitted: Mutex::new(Vec::new()),
            results: Mutex::new(results),
            polled: Mutex::new(Vec::new()),
        }
    }

    fn rejecting_submissions() -> Self {
        Self {
            submit_fails: true,
            ..Self::new(vec![])
        }
    }

    fn submitted(&self) -> Vec<RelaySubmitRequest> {
        self.submitted.lock().unwrap().clone()
    }

    fn polled(&self) -> Vec<RelayStatus> {
        self.polled.lock().unwrap().clone()
    }
}

#[async_trait]
impl RelayTransport for RecordingRelay {
    async fn submit(&self, request: &RelaySubmitRequest) -> Result<RelaySubmitResponse, BoxError> {
        self.submitted.lock().unwrap().push(request.clone());
        if self.submit_fails {
            return Err("relay returned 503".into());
        }
        Ok(RelaySubmitResponse {
            uuid: "relay-uuid".to_string(),
        })
    }

    async fn status(&self, chain_id: ChainId, uuid: &str) -> Result<RelayResult, BoxError> {
        assert_eq!(chain_id, CHAIN_ID);
        assert_eq!(uuid, "relay-uuid");
        let result = self.results.lock().unwrap().pop().ok_or("relay status unavailable")?;
        self.polled.lock().unwrap().push(result.status.clone());
        Ok(result)
    }
}

fn pending() -> RelayResult {
    RelayResult {
        transaction_hash: None,
        status: RelayStatus::Pending,
    }
}

fn submitted() -> RelayResult {
    RelayResult {
        transaction_hash: None,
        status: RelayStatus::Submitted,
    }
}

fn confirmed() -> RelayResult {
    RelayResult {
        transaction_hash: Some(TX_HASH),
        status: RelayStatus::Success,
    }
}

fn reverted() -> RelayResult {
    RelayResult {
        transaction_hash: None,
        status: RelayStatus::Reverted,
    }
}

struct Harness {
    hook: Delegation7702PublishHook,
    signer: Arc<RecordingSigner>,
    relay: Arc<RecordingRelay>,
}

fn environment() -> DelegationEnvironment {
    DelegationEnvironment {
        delegation_manager: DELEGATION_MANAGER,
        eip7702_stateless_delegator_impl: Some(UPGRADE_CONTRACT),
        caveat_enforcers: CaveatEnforcers {
            exact_execution: EXACT_EXECUTION,
            specific_action_erc20_transfer_batch: TRANSFER_BATCH,
        },
    }
}

fn build_harness(
    support: Support,
    bridge: BridgeAnswer,
    signer: RecordingSigner,
    relay: RecordingRelay,
    registry: EnvironmentRegistry,
) -> Harness {
    let signer = Arc::new(signer);
    let relay = Arc::new(relay);
    let deps = PublishHookDeps {
        atomic_batch: Arc::new(support),
        bridge_status: Arc::new(bridge),
        delegation_signer: signer.clone(),
        authorization_signer: signer.clone(),
        calldata: Arc::new(RedeemDelegationsCalldata),
        relay: relay.clone(),
    };
    let hook = Delegation7702PublishHook::new(deps, Arc::new(registry), PublishConfig::default());
    Harness {
        hook,
        signer,
        relay,
    }
}

fn registry() -> EnvironmentRegistry {
    EnvironmentRegistry::new([(CHAIN_ID, environment())]).unwrap()
}

fn harness(
    support: Vec<AtomicBatchChainSupport>,
    bridge: BridgeAnswer,
    results: Vec<RelayResult>,
) -> Harness {
    build_harness(
        Support::Chains(support),
        bridge,
        RecordingSigner::default(),
        RecordingRelay::new(results),
        registry(),
    )
}

fn harness_with_signer(support: AtomicBatchChainSupport, behavior: SignerBehavior) -> Harness {
    build_harness(
        Support::Chains(vec![support]),
        BridgeAnswer::NotGasless,
        RecordingSigner::new(behavior),
        RecordingRelay::new(vec![confirmed()]),
        registry(),
    )
}

fn not_upgraded() -> AtomicBatchChainSupport {
    AtomicBatchChainSupport {
        chain_id: U64::from(CHAIN_ID),
        is_supported: false,
        delegation_address: None,
        upgrade_contract_address: Some(UPGRADE_CONTRACT),
    }
}

fn upgraded() -> AtomicBatchChainSupport {
    AtomicBatchChainSupport {
        chain_id: U64::from(CHAIN_ID),
        is_supported: true,
        delegation_address: Some(UPGRADE_CONTRACT),
        upgrade_contract_address: Some(UPGRADE_CONTRACT),
    }
}

fn gas_fee_token() -> GasFeeToken {
    GasFeeToken {
        token_address: TOKEN,
        recipient: FEE_RECIPIENT,
        amount: U256::from(1_000u64),
        symbol: Some("USDC".to_string()),
        decimals: Some(6),
    }
}

fn expected_transfer_terms() -> TransferBatchTerms {
    TransferBatchTerms {
        token: TOKEN,
        recipient: FEE_RECIPIENT,
        amount: U256::from(1_000u64),
        first_target: TO,
        first_calldata: bytes!("a9059cbb00"),
    }
}

fn meta(selected: Option<Address>) -> TransactionMeta {
    TransactionMeta {
        id: "tx-1".to_string(),
        chain_id: U64::from(CHAIN_ID),
        tx_params: TransactionParams {
            from: FROM,
            to: Some(TO),
            data: Some(bytes!("a9059cbb00")),
            value: None,
            nonce: Some(U64::from(7)),
        },
        selected_gas_fee_token: selected,
        gas_fee_tokens: Some(vec![gas_fee_token()]),
    }
}

#[tokio::test(start_paused = true)]
async fn test_not_upgraded_account_pays_with_token() {
    let h = harness(vec![not_upgraded()], BridgeAnswer::NotGasless, vec![pending(), confirmed()]);

    let result = h.hook.publish(&meta(Some(TOKEN))).await.unwrap();
    assert_eq!(
        result,
        PublishHookResult {
            transaction_hash: Some(TX_HASH),
        }
    );

    let delegations = h.signer.delegations();
    assert_eq!(delegations.len(), 1);
    let (chain_id, delegation) = &delegations[0];
    assert_eq!(*chain_id, CHAIN_ID);
    assert_eq!(delegation.delegator, FROM);
    assert_eq!(delegation.delegate, FROM);
    assert_eq!(delegation.caveats.len(), 1);
    assert_eq!(delegation.caveats[0].enforcer, TRANSFER_BATCH);
    assert_eq!(
        decode_transfer_batch_terms(&delegation.caveats[0].terms).unwrap(),
        expected_transfer_terms()
    );

    assert_eq!(
        h.signer.authorizations(),
        vec![AuthorizationRequest {
            chain_id: CHAIN_ID,
            contract_address: UPGRADE_CONTRACT,
            from: FROM,
            nonce: 7,
        }]
    );

    let submitted = h.relay.submitted();
    assert_eq!(submitted.len(), 1);
    let request = &submitted[0];
    assert_eq!(request.chain_id, U64::from(CHAIN_ID));
    assert_eq!(request.to, DELEGATION_MANAGER);
    assert!(!request.data.is_empty());
    let list = request.authorization_list.as_ref().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].address, UPGRADE_CONTRACT);
    assert_eq!(list[0].nonce, U64::from(7));
    assert_eq!(list[0].r, B256::repeat_byte(0x11));
    assert_eq!(list[0].s, B256::repeat_byte(0x22));
    assert_eq!(list[0].y_parity, YParity::Odd);
}

#[tokio::test(start_paused = true)]
async fn test_upgraded_account_omits_authorization() {
    let h = harness(
        vec![upgraded()],
        BridgeAnswer::NotGasless,
        vec![pending(), submitted(), confirmed()],
    );
    let started = tokio::time::Instant::now();

    let result = h.hook.publish(&meta(Some(TOKEN))).await.unwrap();
    assert_eq!(result.transaction_hash, Some(TX_HASH));

    let delegations = h.signer.delegations();
    assert_eq!(delegations.len(), 1);
    let caveats = &delegations[0].1.caveats;
    assert_eq!(caveats.len(), 1);
    assert_eq!(caveats[0].enforcer, TRANSFER_BATCH);
    assert_eq!(decode_transfer_batch_terms(&caveats[0].terms).unwrap(), expected_transfer_terms());
    assert!(h.signer.authorizations().is_empty());

    let submitted = h.relay.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].to, DELEGATION_MANAGER);
    assert_eq!(submitted[0].authorization_list, None);

    assert_eq!(
        h.relay.polled(),
        vec![RelayStatus::Pending, RelayStatus::Submitted, RelayStatus::Success]
    );
    assert!(started.elapsed() >= PublishConfig::default().poll_interval() * 2);
}

#[tokio::test(start_paused = true)]
async fn test_gasless_uses_exact_execution() {
    let h = harness(vec![upgraded()], BridgeAnswer::Gasless, vec![confirmed()]);

    // No gas fee token is selected; gasless alone makes the hook apply.
    let result = h.hook.publish(&meta(None)).await.unwrap();
    assert_eq!(result.transaction_hash, Some(TX_HASH));

    let delegations = h.signer.delegations();
    let caveats = &delegations[0].1.caveats;
    assert_eq!(caveats.len(), 1);
    assert_eq!(caveats[0].enforcer, EXACT_EXECUTION);
    assert_eq!(caveats[0].terms, bytes!("a9059cbb00"));
}

#[tokio::test(start_paused = true)]
async fn test_unsupported_chain_is_not_applicable() {
    let mut other_chain = not_upgraded();
    other_chain.chain_id = U64::from(1);
    let h = harness(vec![other_chain], BridgeAnswer::NotGasless, vec![]);

    let result = h.hook.publish(&meta(Some(TOKEN))).await.unwrap();
    assert_eq!(result, PublishHookResult::EMPTY);
    assert!(h.signer.delegations().is_empty());
    assert!(h.relay.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unknown_delegation_contract_is_not_applicable() {
    let mut foreign = upgraded();
    foreign.is_supported = false;
    foreign.delegation_address = Some(address!("9999999999999999999999999999999999999999"));
    let h = harness(vec![foreign], BridgeAnswer::Gasless, vec![]);

    let result = h.hook.publish(&meta(Some(TOKEN))).await.unwrap();
    assert!(result.is_empty());
    assert!(h.signer.delegations().is_empty());
    assert!(h.relay.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_no_selected_token_is_not_applicable() {
    let h = harness(vec![upgraded()], BridgeAnswer::NotGasless, vec![]);

    let result = h.hook.publish(&meta(None)).await.unwrap();
    assert_eq!(result, PublishHookResult::EMPTY);
    assert!(h.relay.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_gasless_lookup_failure_is_not_gasless() {
    let h = harness(vec![upgraded()], BridgeAnswer::Fails, vec![confirmed()]);

    // Falls through to the token path.
    let result = h.hook.publish(&meta(Some(TOKEN))).await.unwrap();
    assert_eq!(result.transaction_hash, Some(TX_HASH));
    assert_eq!(h.signer.delegations()[0].1.caveats[0].enforcer, TRANSFER_BATCH);

    // And without a token the hook does not apply.
    let h = harness(vec![upgraded()], BridgeAnswer::Fails, vec![]);
    assert!(h.hook.publish(&meta(None)).await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_capability_query_failure() {
    let h = build_harness(
        Support::Fails,
        BridgeAnswer::NotGasless,
        RecordingSigner::default(),
        RecordingRelay::new(vec![confirmed()]),
        registry(),
    );

    let err = h.hook.publish(&meta(Some(TOKEN))).await.unwrap_err();
    assert!(matches!(err, PublishError::CapabilityQuery(_)));
    assert_eq!(
        err.to_string(),
        "atomic batch support query failed: capability controller unavailable"
    );
    assert!(h.signer.delegations().is_empty());
    assert!(h.relay.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unknown_token_fails_before_signing() {
    let h = harness(vec![upgraded()], BridgeAnswer::NotGasless, vec![]);
    let missing = address!("5555555555555555555555555555555555555555");

    let err = h.hook.publish(&meta(Some(missing))).await.unwrap_err();
    assert!(matches!(err, PublishError::GasFeeTokenNotFound(token) if token == missing));
    assert_eq!(err.to_string(), format!("Selected gas fee token not found: {missing}"));
    assert!(h.signer.delegations().is_empty());
    assert!(h.relay.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unknown_chain_environment() {
    let h = build_harness(
        Support::Chains(vec![upgraded()]),
        BridgeAnswer::NotGasless,
        RecordingSigner::default(),
        RecordingRelay::new(vec![]),
        EnvironmentRegistry::new([(1, environment())]).unwrap(),
    );

    let err = h.hook.publish(&meta(Some(TOKEN))).await.unwrap_err();
    assert!(matches!(err, PublishError::UnknownChain(CHAIN_ID)));
    assert!(h.signer.delegations().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_delegation_signing_failure() {
    let h = harness_with_signer(not_upgraded(), SignerBehavior::DelegationFails);

    let err = h.hook.publish(&meta(Some(TOKEN))).await.unwrap_err();
    assert!(matches!(err, PublishError::DelegationSigning(_)));
    assert_eq!(err.to_string(), "delegation signing failed: user rejected the request");
    assert_eq!(h.signer.delegations().len(), 1);
    assert!(h.signer.authorizations().is_empty());
    assert!(h.relay.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_missing_upgrade_contract() {
    let mut support = not_upgraded();
    support.upgrade_contract_address = None;
    let h = harness(vec![support], BridgeAnswer::NotGasless, vec![]);

    let err = h.hook.publish(&meta(Some(TOKEN))).await.unwrap_err();
    assert!(matches!(err, PublishError::UpgradeContractNotFound));
    assert_eq!(err.to_string(), "Upgrade contract address not found");
    assert!(h.signer.authorizations().is_empty());
    assert!(h.relay.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_missing_nonce_for_authorization() {
    let h = harness(vec![not_upgraded()], BridgeAnswer::NotGasless, vec![]);
    let mut meta = meta(Some(TOKEN));
    meta.tx_params.nonce = None;

    let err = h.hook.publish(&meta).await.unwrap_err();
    assert!(matches!(err, PublishError::MissingNonce));
    assert!(h.signer.authorizations().is_empty());
    assert!(h.relay.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_authorization_signing_failure() {
    let h = harness_with_signer(not_upgraded(), SignerBehavior::AuthorizationFails);

    let err = h.hook.publish(&meta(Some(TOKEN))).await.unwrap_err();
    assert!(matches!(err, PublishError::AuthorizationSigning(_)));
    assert_eq!(h.signer.authorizations().len(), 1);
    assert!(h.relay.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_short_authorization_signature() {
    let h = harness_with_signer(not_upgraded(), SignerBehavior::ShortAuthorization);

    let err = h.hook.publish(&meta(Some(TOKEN))).await.unwrap_err();
    assert!(matches!(
        err,
        PublishError::Authorization(AuthorizationError::InvalidSignatureLength(64))
    ));
    assert!(h.relay.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_relay_submit_failure() {
    let h = build_harness(
        Support::Chains(vec![upgraded()]),
        BridgeAnswer::NotGasless,
        RecordingSigner::default(),
        RecordingRelay::rejecting_submissions(),
        registry(),
    );

    let err = h.hook.publish(&meta(Some(TOKEN))).await.unwrap_err();
    assert!(matches!(err, PublishError::RelaySubmit(_)));
    assert_eq!(err.to_string(), "relay submission failed: relay returned 503");
    assert_eq!(h.relay.submitted().len(), 1);
    assert!(h.relay.polled().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_relay_status_failure() {
    // One pending answer, then the status endpoint errors.
    let h = harness(vec![upgraded()], BridgeAnswer::NotGasless, vec![pending()]);

    let err = h.hook.publish(&meta(Some(TOKEN))).await.unwrap_err();
    assert!(matches!(err, PublishError::RelayStatus(_)));
    assert_eq!(err.to_string(), "relay status query failed: relay status unavailable");
    assert_eq!(h.relay.submitted().len(), 1);
    assert_eq!(h.relay.polled(), vec![RelayStatus::Pending]);
}

#[tokio::test(start_paused = true)]
async fn test_relay_failure_is_fatal() {
    let h = harness(
        vec![upgraded()],
        BridgeAnswer::NotGasless,
        vec![pending(), submitted(), reverted()],
    );

    let err = h.hook.publish(&meta(Some(TOKEN))).await.unwrap_err();
    assert!(matches!(err, PublishError::RelayFailed(RelayStatus::Reverted)));
    assert_eq!(err.to_string(), "Transaction relay error - REVERTED");
    assert_eq!(h.relay.submitted().len(), 1);
    assert_eq!(h.relay.polled().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_success_without_hash() {
    let success_without_hash = RelayResult {
        transaction_hash: None,
        status: RelayStatus::Success,
    };
    let h = harness(vec![upgraded()], BridgeAnswer::NotGasless, vec![success_without_hash]);

    let err = h.hook.publish(&meta(Some(TOKEN))).await.unwrap_err();
    assert!(matches!(err, PublishError::MissingTransactionHash));
    assert_eq!(h.relay.polled(), vec![RelayStatus::Success]);
}
