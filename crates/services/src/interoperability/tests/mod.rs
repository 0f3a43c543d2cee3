// Path: crates/services/src/interoperability/tests/mod.rs

use super::commands::{SubmitMainchainCrossChainUpdateCommand, SubmitSidechainCrossChainUpdateCommand};
use super::events::{
    CcmProcessedEventData, EVENT_NAME_CCM_PROCESSED, EVENT_NAME_CCM_SEND_SUCCESS,
    EVENT_NAME_CHAIN_ACCOUNT_UPDATED, EVENT_NAME_TERMINATED_STATE_CREATED,
};
use super::internal::{calculate_new_active_validators, compute_validators_hash, InternalMethod};
use super::stores::{outbox_root_proof_key, InteropStores};
use super::{interoperability_registry, CcmRegistry};
use meridian_api::context::{
    BlockHeaderInfo, CommandExecuteContext, CommandVerifyContext, ContextStore,
    CrossChainMessageContext, TransactionInfo, VerificationResult,
};
use meridian_api::events::EventQueue;
use meridian_api::interop::{Command, CrossChainCommand, InteroperableMethod};
use meridian_api::state::StateAccess;
use meridian_crypto::sha256;
use meridian_state::prelude::InMemoryState;
use meridian_state::tree::merkle::{merkle_root, EMPTY_HASH};
use meridian_test_utils::fixtures::{
    fake_block_header, last_certificate, right_witness, single_leaf_state_root, ValidatorSet,
};
use meridian_test_utils::randomness::TestRng;
use meridian_test_utils::{assert_ok, assert_verify_fails};
use meridian_types::app::{
    ActiveValidator, BlockHeader, Ccm, CcmProcessedCode, CcmProcessedResult, CcmStatusCode,
    ChainAccount, ChainId, ChainStatus, ChannelData, CrossChainUpdateParams, InboxUpdate, MessageTree, OutboxRoot, OwnChainAccount,
    RegistrationCcmParams, SidechainTerminatedCcmParams, CROSS_CHAIN_COMMAND_REGISTRATION,
    CROSS_CHAIN_COMMAND_SIDECHAIN_TERMINATED, LIVENESS_LIMIT,
};
use meridian_types::codec::{compile_static, Schema, SchemaObject};
use meridian_types::config::InteropConfig;
use meridian_types::error::InteropError;
use meridian_types::keys::{CONTEXT_STORE_KEY_CCM_PROCESSING, EMPTY_KEY, MODULE_NAME_INTEROPERABILITY};
use once_cell::sync::Lazy;
use proptest::prelude::*;
use std::sync::Arc;

const TIMESTAMP: u32 = 1_700_000_000;
const MAINCHAIN: ChainId = ChainId([4, 0, 0, 0]);
const SIDECHAIN_A: ChainId = ChainId([4, 0, 0, 1]);
const SIDECHAIN_B: ChainId = ChainId([4, 0, 0, 2]);
const TERMINATED_ELSEWHERE: ChainId = ChainId([4, 0, 0, 9]);
const TOKEN_ID: [u8; 8] = [4, 0, 0, 0, 0, 0, 0, 0];

fn header() -> BlockHeaderInfo {
    BlockHeaderInfo {
        height: 500,
        timestamp: TIMESTAMP,
    }
}

fn empty_tree() -> MessageTree {
    MessageTree {
        append_path: Vec::new(),
        size: 0,
        root: EMPTY_HASH.to_vec(),
    }
}

fn channel() -> ChannelData {
    ChannelData {
        inbox: empty_tree(),
        outbox: empty_tree(),
        partner_chain_outbox_root: EMPTY_HASH.to_vec(),
        message_fee_token_id: TOKEN_ID.to_vec(),
    }
}

/// One chain's view of the network: its own account plus accounts, channels
/// and signers of its partner chains.
struct Network {
    state: InMemoryState,
    internal: InternalMethod,
    own: OwnChainAccount,
    signers: ValidatorSet,
}

impl Network {
    fn new(internal: InternalMethod, own_name: &str, own_id: ChainId) -> Self {
        let own = OwnChainAccount {
            name: own_name.into(),
            chain_id: own_id,
            nonce: 0,
        };
        let mut state = InMemoryState::new();
        internal.stores().own_chain.set(&mut state, EMPTY_KEY, &own).unwrap();
        Self {
            state,
            internal,
            own,
            signers: ValidatorSet::new(4, 1).unwrap(),
        }
    }

    fn mainchain() -> Self {
        let mut network = Self::new(
            InternalMethod::mainchain(InteropConfig::default()),
            "mainchain",
            MAINCHAIN,
        );
        network.add_partner(SIDECHAIN_A, "sidechaina", ChainStatus::Active, TIMESTAMP - 1_000);
        network.add_partner(SIDECHAIN_B, "sidechainb", ChainStatus::Active, TIMESTAMP - 1_000);
        network.state.commit();
        network
    }

    fn sidechain() -> Self {
        let mut network = Self::new(
            InternalMethod::sidechain(InteropConfig::default()),
            "sidechaina",
            SIDECHAIN_A,
        );
        network.add_partner(MAINCHAIN, "mainchain", ChainStatus::Registered, 0);
        network.state.commit();
        network
    }

    fn stores(&self) -> &InteropStores {
        self.internal.stores()
    }

    fn add_partner(&mut self, id: ChainId, name: &str, status: ChainStatus, certified_at: u32) {
        let stores = self.internal.stores().clone();
        let account = ChainAccount {
            name: name.into(),
            last_certificate: last_certificate(5, certified_at),
            status,
        };
        stores.chain_account.set(&mut self.state, id.as_bytes(), &account).unwrap();
        stores.channel.set(&mut self.state, id.as_bytes(), &channel()).unwrap();
        stores
            .chain_validators
            .set(&mut self.state, id.as_bytes(), &self.signers.chain_validators())
            .unwrap();
    }

    fn set_status(&mut self, id: ChainId, status: ChainStatus) {
        let stores = self.internal.stores().clone();
        let mut account = stores.chain_account.get(&self.state, id.as_bytes()).unwrap();
        account.status = status;
        stores.chain_account.set(&mut self.state, id.as_bytes(), &account).unwrap();
    }

    fn set_certified_at(&mut self, id: ChainId, timestamp: u32) {
        let stores = self.internal.stores().clone();
        let mut account = stores.chain_account.get(&self.state, id.as_bytes()).unwrap();
        account.last_certificate.timestamp = timestamp;
        stores.chain_account.set(&mut self.state, id.as_bytes(), &account).unwrap();
    }

    fn account(&self, id: ChainId) -> ChainAccount {
        self.stores().chain_account.get(&self.state, id.as_bytes()).unwrap()
    }

    fn channel(&self, id: ChainId) -> ChannelData {
        self.stores().channel.get(&self.state, id.as_bytes()).unwrap()
    }

    /// A cross-chain update from `sending` carrying `ccms`, certified at
    /// `certified_at` by a state root that proves the resulting inbox root.
    fn update(&self, sending: ChainId, ccms: &[Ccm], certified_at: u32) -> CrossChainUpdateParams {
        self.partial_update(sending, ccms, ccms.len(), certified_at)
    }

    /// Like [`Network::update`], but only the first `delivered` of `ccms` are
    /// carried; a right witness stands in for the rest.
    fn partial_update(
        &self,
        sending: ChainId,
        ccms: &[Ccm],
        delivered: usize,
        certified_at: u32,
    ) -> CrossChainUpdateParams {
        let messages: Vec<Vec<u8>> = ccms.iter().map(|c| c.encode().unwrap()).collect();
        let leaves: Vec<Vec<u8>> = messages.iter().map(|m| sha256(m).to_vec()).collect();
        let outbox_root = OutboxRoot {
            root: merkle_root(&leaves).to_vec(),
        };
        let state_root = single_leaf_state_root(
            &outbox_root_proof_key(&self.own.chain_id),
            &sha256(&outbox_root.encode().unwrap()),
        )
        .unwrap();
        let block = fake_block_header(10, certified_at, state_root);
        CrossChainUpdateParams {
            sending_chain_id: sending,
            certificate: self.signers.certify_encoded(&sending, &block).unwrap(),
            active_validators_update: Vec::new(),
            certificate_threshold: self.signers.threshold,
            inbox_update: InboxUpdate {
                cross_chain_messages: messages.into_iter().take(delivered).collect(),
                message_witness_hashes: right_witness(delivered, &leaves).unwrap(),
                ..InboxUpdate::default()
            },
        }
    }
}

fn ccm(nonce: u64, module: &str, command: &str, sending: ChainId, receiving: ChainId, fee: u64, params: Vec<u8>) -> Ccm {
    Ccm {
        nonce,
        module: module.into(),
        cross_chain_command: command.into(),
        sending_chain_id: sending,
        receiving_chain_id: receiving,
        fee,
        status: CcmStatusCode::Ok.into(),
        params,
    }
}

fn registration(sending: ChainId, receiving: ChainId, name: &str) -> Ccm {
    let params = RegistrationCcmParams {
        name: name.into(),
        message_fee_token_id: TOKEN_ID.to_vec(),
    };
    ccm(
        0,
        MODULE_NAME_INTEROPERABILITY,
        CROSS_CHAIN_COMMAND_REGISTRATION,
        sending,
        receiving,
        0,
        params.encode().unwrap(),
    )
}

fn transfer(nonce: u64, receiving: ChainId, fee: u64) -> Ccm {
    ccm(nonce, "token", "transferCrossChain", SIDECHAIN_A, receiving, fee, vec![1, 2, 3])
}

fn verify<C: Command<Params = CrossChainUpdateParams>>(
    command: &C,
    network: &Network,
    params: CrossChainUpdateParams,
) -> Result<VerificationResult, InteropError> {
    let ctx = CommandVerifyContext {
        state: &network.state,
        chain_id: network.own.chain_id,
        header: header(),
        transaction: TransactionInfo::default(),
        params,
    };
    command.verify(&ctx)
}

fn execute<C: Command<Params = CrossChainUpdateParams>>(
    command: &C,
    network: &mut Network,
    params: CrossChainUpdateParams,
) -> (EventQueue, ContextStore) {
    let mut events = EventQueue::new();
    let mut context_store = ContextStore::new();
    {
        let mut ctx = CommandExecuteContext {
            state: &mut network.state,
            events: &mut events,
            context_store: &mut context_store,
            chain_id: network.own.chain_id,
            header: header(),
            transaction: TransactionInfo::default(),
            params,
        };
        assert_ok!(command.execute(&mut ctx));
    }
    (events, context_store)
}

fn processed(events: &EventQueue) -> Vec<(CcmProcessedResult, CcmProcessedCode)> {
    events
        .filter(MODULE_NAME_INTEROPERABILITY, EVENT_NAME_CCM_PROCESSED)
        .map(|e| CcmProcessedEventData::decode(&e.data).unwrap())
        .map(|data| (data.result, data.code))
        .collect()
}

fn mainchain_command(network: &Network, registry: CcmRegistry) -> SubmitMainchainCrossChainUpdateCommand {
    SubmitMainchainCrossChainUpdateCommand::new(network.internal.clone(), registry)
}

fn default_mainchain_command(network: &Network) -> SubmitMainchainCrossChainUpdateCommand {
    mainchain_command(network, interoperability_registry(&network.internal))
}

/// Records in state whether message processing was flagged in the context store.
struct FlagProbe;

impl InteroperableMethod for FlagProbe {
    fn before_cross_chain_command_execute(
        &self,
        ctx: &mut CrossChainMessageContext<'_>,
    ) -> Result<(), InteropError> {
        if ctx.context_store.contains(CONTEXT_STORE_KEY_CCM_PROCESSING) {
            ctx.state.insert(b"flag-seen", &[1])?;
        }
        Ok(())
    }
}

/// Writes to state, then refuses to let any message be forwarded.
struct RejectForwarding;

impl InteroperableMethod for RejectForwarding {
    fn before_cross_chain_message_forwarding(
        &self,
        ctx: &mut CrossChainMessageContext<'_>,
    ) -> Result<(), InteropError> {
        ctx.state.insert(b"partial-write", &[1])?;
        Err(InteropError::Hook("forwarding disabled".into()))
    }
}

static NO_PARAMS: Lazy<Arc<Schema>> = Lazy::new(|| compile_static(Schema::builder("/test/noParams")));

/// A cross-chain command that writes to state and then fails.
struct FailingCommand;

impl CrossChainCommand for FailingCommand {
    fn name(&self) -> &'static str {
        "boom"
    }

    fn params_schema(&self) -> &'static Schema {
        &NO_PARAMS
    }

    fn execute(&self, ctx: &mut CrossChainMessageContext<'_>) -> Result<(), InteropError> {
        ctx.state.insert(b"command-write", &[1])?;
        Err(InteropError::verification("insufficient balance"))
    }
}

#[test]
fn mainchain_applies_own_messages_and_forwards_the_rest() {
    let mut network = Network::mainchain();
    let terminated_root = vec![3; 32];
    let ccms = vec![
        registration(SIDECHAIN_A, MAINCHAIN, "mainchain"),
        ccm(
            1,
            MODULE_NAME_INTEROPERABILITY,
            CROSS_CHAIN_COMMAND_SIDECHAIN_TERMINATED,
            SIDECHAIN_A,
            MAINCHAIN,
            0,
            SidechainTerminatedCcmParams {
                chain_id: TERMINATED_ELSEWHERE,
                state_root: terminated_root.clone(),
            }
            .encode()
            .unwrap(),
        ),
        transfer(2, SIDECHAIN_B, 0),
    ];
    let params = network.update(SIDECHAIN_A, &ccms, TIMESTAMP - 100);
    let command = default_mainchain_command(&network);

    assert!(verify(&command, &network, params.clone()).unwrap().is_ok());
    let (events, context_store) = execute(&command, &mut network, params);

    assert_eq!(
        processed(&events),
        vec![
            (CcmProcessedResult::Applied, CcmProcessedCode::Success),
            (CcmProcessedResult::Applied, CcmProcessedCode::Success),
            (CcmProcessedResult::Forwarded, CcmProcessedCode::Success),
        ]
    );
    assert!(!context_store.contains(CONTEXT_STORE_KEY_CCM_PROCESSING));

    let inbox = network.channel(SIDECHAIN_A);
    assert_eq!(inbox.inbox.size, 3);
    assert_eq!(inbox.partner_chain_outbox_root, inbox.inbox.root);

    let forwarded = network.channel(SIDECHAIN_B);
    assert_eq!(forwarded.outbox.size, 1);
    let outbox_root = network
        .stores()
        .outbox_root
        .get(&network.state, SIDECHAIN_B.as_bytes())
        .unwrap();
    assert_eq!(outbox_root.root, forwarded.outbox.root);

    let terminated = network
        .stores()
        .terminated_state
        .get(&network.state, TERMINATED_ELSEWHERE.as_bytes())
        .unwrap();
    assert_eq!(terminated.state_root, terminated_root);
    assert!(terminated.initialized);
    assert_eq!(events.filter(MODULE_NAME_INTEROPERABILITY, EVENT_NAME_TERMINATED_STATE_CREATED).count(), 1);

    let sender = network.account(SIDECHAIN_A);
    assert_eq!(sender.status, ChainStatus::Active);
    assert_eq!(sender.last_certificate.height, 10);
    assert_eq!(sender.last_certificate.timestamp, TIMESTAMP - 100);
}

#[test]
fn partial_update_records_full_partner_outbox_root() {
    let mut network = Network::mainchain();
    let ccms: Vec<Ccm> = (0..3).map(|nonce| transfer(nonce, SIDECHAIN_B, 0)).collect();
    let params = network.partial_update(SIDECHAIN_A, &ccms, 2, TIMESTAMP - 100);
    let command = default_mainchain_command(&network);

    assert!(verify(&command, &network, params.clone()).unwrap().is_ok());
    let (events, _) = execute(&command, &mut network, params);

    assert_eq!(processed(&events).len(), 2);
    let leaves: Vec<Vec<u8>> = ccms
        .iter()
        .map(|c| sha256(&c.encode().unwrap()).to_vec())
        .collect();
    let channel = network.channel(SIDECHAIN_A);
    assert_eq!(channel.inbox.size, 2);
    assert_eq!(channel.partner_chain_outbox_root, merkle_root(&leaves).to_vec());
    assert_ne!(channel.partner_chain_outbox_root, channel.inbox.root);
}

#[test]
fn forwarding_to_registered_chain_discards_unpaid_messages() {
    let mut network = Network::mainchain();
    network.set_status(SIDECHAIN_B, ChainStatus::Registered);
    let params = network.update(SIDECHAIN_A, &[transfer(0, SIDECHAIN_B, 0)], TIMESTAMP - 100);
    let command = default_mainchain_command(&network);

    let (events, _) = execute(&command, &mut network, params);

    assert_eq!(
        processed(&events),
        vec![(CcmProcessedResult::Discarded, CcmProcessedCode::ChannelUnavailable)]
    );
    assert_eq!(network.channel(SIDECHAIN_B).outbox.size, 0);
    assert_eq!(network.channel(SIDECHAIN_A).outbox.size, 0);
    assert_eq!(network.channel(SIDECHAIN_A).inbox.size, 1);
}

#[test]
fn forwarding_to_registered_chain_bounces_paid_messages() {
    let mut network = Network::mainchain();
    network.set_status(SIDECHAIN_B, ChainStatus::Registered);
    let message = transfer(0, SIDECHAIN_B, 1_000_000);
    let params = network.update(SIDECHAIN_A, &[message.clone()], TIMESTAMP - 100);
    let command = default_mainchain_command(&network);

    let (events, _) = execute(&command, &mut network, params);

    assert_eq!(
        processed(&events),
        vec![(CcmProcessedResult::Bounced, CcmProcessedCode::ChannelUnavailable)]
    );
    assert_eq!(network.channel(SIDECHAIN_B).outbox.size, 0);
    assert_eq!(network.channel(SIDECHAIN_A).outbox.size, 1);

    let sent: Vec<_> = events
        .filter(MODULE_NAME_INTEROPERABILITY, EVENT_NAME_CCM_SEND_SUCCESS)
        .collect();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].topics[0], SIDECHAIN_B.as_bytes());
    assert_eq!(sent[0].topics[1], SIDECHAIN_A.as_bytes());
}

#[test]
fn forwarding_to_unknown_chain_bounces() {
    let mut network = Network::mainchain();
    let unknown = TestRng::default().sidechain_id(4);
    assert!(!network.stores().chain_account.has(&network.state, unknown.as_bytes()).unwrap());
    let params = network.update(SIDECHAIN_A, &[transfer(0, unknown, 1_000_000)], TIMESTAMP - 100);
    let command = default_mainchain_command(&network);

    let (events, _) = execute(&command, &mut network, params);

    assert_eq!(
        processed(&events),
        vec![(CcmProcessedResult::Bounced, CcmProcessedCode::ChannelUnavailable)]
    );
    assert_eq!(network.channel(SIDECHAIN_A).outbox.size, 1);
}

#[test]
fn forwarding_to_expired_chain_terminates_it() {
    let mut network = Network::mainchain();
    network.set_certified_at(SIDECHAIN_B, TIMESTAMP - LIVENESS_LIMIT - 1);
    let params = network.update(SIDECHAIN_A, &[transfer(0, SIDECHAIN_B, 0)], TIMESTAMP - 100);
    let command = default_mainchain_command(&network);

    let (events, _) = execute(&command, &mut network, params);

    assert_eq!(
        processed(&events),
        vec![(CcmProcessedResult::Discarded, CcmProcessedCode::ChannelUnavailable)]
    );
    assert_eq!(network.account(SIDECHAIN_B).status, ChainStatus::Terminated);
    assert!(network
        .stores()
        .terminated_state
        .has(&network.state, SIDECHAIN_B.as_bytes())
        .unwrap());
    // channelTerminated to the expired chain, sidechainTerminated to the sender
    assert_eq!(network.channel(SIDECHAIN_B).outbox.size, 1);
    assert_eq!(network.channel(SIDECHAIN_A).outbox.size, 1);
    let own = network.stores().own_chain.get(&network.state, EMPTY_KEY).unwrap();
    assert_eq!(own.nonce, 2);
}

#[test]
fn rejected_forwarding_rolls_back_and_terminates_sender() {
    let mut network = Network::mainchain();
    let mut registry = interoperability_registry(&network.internal);
    registry.register_method("guard", Box::new(RejectForwarding));
    let command = mainchain_command(&network, registry);
    let params = network.update(SIDECHAIN_A, &[transfer(0, SIDECHAIN_B, 0)], TIMESTAMP - 100);

    let (events, _) = execute(&command, &mut network, params);

    assert_eq!(
        processed(&events),
        vec![(
            CcmProcessedResult::Discarded,
            CcmProcessedCode::InvalidCcmBeforeCccForwardingException
        )]
    );
    assert_eq!(network.state.get(b"partial-write").unwrap(), None);
    assert_eq!(network.account(SIDECHAIN_A).status, ChainStatus::Terminated);
    assert_eq!(network.channel(SIDECHAIN_B).outbox.size, 0);
}

#[test]
fn failing_command_is_rolled_back_and_bounced() {
    let mut network = Network::mainchain();
    let mut registry = interoperability_registry(&network.internal);
    registry.register_command("failing", Box::new(FailingCommand));
    let command = mainchain_command(&network, registry);
    let message = ccm(0, "failing", "boom", SIDECHAIN_A, MAINCHAIN, 1_000_000, Vec::new());
    let params = network.update(SIDECHAIN_A, &[message], TIMESTAMP - 100);

    let (events, _) = execute(&command, &mut network, params);

    assert_eq!(
        processed(&events),
        vec![(CcmProcessedResult::Bounced, CcmProcessedCode::FailedCcm)]
    );
    assert_eq!(network.state.get(b"command-write").unwrap(), None);
    assert_eq!(network.account(SIDECHAIN_A).status, ChainStatus::Active);
    assert_eq!(network.channel(SIDECHAIN_A).outbox.size, 1);
}

#[test]
fn registration_with_wrong_name_terminates_sender() {
    let mut network = Network::mainchain();
    let command = default_mainchain_command(&network);
    let params = network.update(
        SIDECHAIN_A,
        &[registration(SIDECHAIN_A, MAINCHAIN, "othername")],
        TIMESTAMP - 100,
    );

    let (events, _) = execute(&command, &mut network, params);

    assert_eq!(
        processed(&events),
        vec![(CcmProcessedResult::Discarded, CcmProcessedCode::InvalidCcmVerifyException)]
    );
    assert_eq!(network.account(SIDECHAIN_A).status, ChainStatus::Terminated);
}

#[test]
fn unknown_module_is_bounced() {
    let mut network = Network::mainchain();
    let command = default_mainchain_command(&network);
    let message = ccm(0, "nft", "transfer", SIDECHAIN_A, MAINCHAIN, 1_000_000, Vec::new());
    let params = network.update(SIDECHAIN_A, &[message], TIMESTAMP - 100);

    let (events, _) = execute(&command, &mut network, params);

    assert_eq!(
        processed(&events),
        vec![(CcmProcessedResult::Bounced, CcmProcessedCode::ModuleNotSupported)]
    );
}

#[test]
fn processing_flag_is_visible_to_hooks_and_cleared() {
    let mut network = Network::mainchain();
    let mut registry = interoperability_registry(&network.internal);
    registry.register_method("probe", Box::new(FlagProbe));
    let command = mainchain_command(&network, registry);
    let params = network.update(
        SIDECHAIN_A,
        &[registration(SIDECHAIN_A, MAINCHAIN, "mainchain")],
        TIMESTAMP - 100,
    );

    let (_, context_store) = execute(&command, &mut network, params);

    assert_eq!(network.state.get(b"flag-seen").unwrap(), Some(vec![1]));
    assert!(!context_store.contains(CONTEXT_STORE_KEY_CCM_PROCESSING));
}

#[test]
fn verify_rejects_sending_chain_that_is_not_live() {
    let mut network = Network::mainchain();
    network.set_certified_at(SIDECHAIN_A, TIMESTAMP - LIVENESS_LIMIT - 1);
    let params = network.update(SIDECHAIN_A, &[transfer(0, SIDECHAIN_B, 0)], TIMESTAMP - 100);
    let command = default_mainchain_command(&network);

    assert_verify_fails!(verify(&command, &network, params), "The sending chain is not live.");
}

#[test]
fn verify_rejects_stale_first_certificate_of_registered_chain() {
    let mut network = Network::mainchain();
    network.set_status(SIDECHAIN_A, ChainStatus::Registered);
    let params = network.update(
        SIDECHAIN_A,
        &[transfer(0, SIDECHAIN_B, 0)],
        TIMESTAMP - LIVENESS_LIMIT / 2 - 1,
    );
    let command = default_mainchain_command(&network);

    assert_verify_fails!(
        verify(&command, &network, params),
        "The first CCU with a non-empty inbox update cannot contain a certificate older than 1296000 seconds."
    );
}

#[test]
fn verify_rejects_messages_from_other_chains() {
    let network = Network::mainchain();
    let mut foreign = transfer(0, MAINCHAIN, 0);
    foreign.sending_chain_id = SIDECHAIN_B;
    let params = network.update(SIDECHAIN_A, &[foreign], TIMESTAMP - 100);
    let command = default_mainchain_command(&network);

    assert_verify_fails!(verify(&command, &network, params), "CCM is not from the sending chain.");
}

#[test]
fn verify_rejects_messages_not_in_certified_outbox() {
    let network = Network::mainchain();
    let mut params = network.update(SIDECHAIN_A, &[transfer(0, SIDECHAIN_B, 0)], TIMESTAMP - 100);
    params.inbox_update.cross_chain_messages = vec![transfer(1, SIDECHAIN_B, 0).encode().unwrap()];
    let command = default_mainchain_command(&network);

    assert_verify_fails!(
        verify(&command, &network, params),
        "Invalid inclusion proof for inbox update."
    );
}

#[test]
fn verify_rejects_certificate_without_quorum() {
    let network = Network::mainchain();
    let mut params = network.update(SIDECHAIN_A, &[], TIMESTAMP - 100);
    let block = fake_block_header(10, TIMESTAMP - 100, vec![0; 32]);
    params.certificate = network
        .signers
        .certify(&SIDECHAIN_A, &block, 2)
        .unwrap()
        .encode()
        .unwrap();
    let command = default_mainchain_command(&network);

    assert_verify_fails!(
        verify(&command, &network, params),
        "Certificate is not a valid aggregate signature."
    );
}

#[test]
fn verify_rejects_uncertified_validators_update() {
    let network = Network::mainchain();
    let mut params = network.update(SIDECHAIN_A, &[], TIMESTAMP - 100);
    params.active_validators_update = vec![ActiveValidator {
        bls_key: network.signers.validators[0].bls_key.clone(),
        bft_weight: 2,
    }];
    let command = default_mainchain_command(&network);

    assert_verify_fails!(
        verify(&command, &network, params),
        "ValidatorsHash in certificate and the computed values do not match."
    );
}

#[test]
fn certified_validators_update_is_stored() {
    let mut network = Network::mainchain();
    let update = vec![ActiveValidator {
        bls_key: network.signers.validators[0].bls_key.clone(),
        bft_weight: 2,
    }];
    let new_validators = calculate_new_active_validators(&network.signers.validators, &update);
    let block = BlockHeader {
        validators_hash: compute_validators_hash(&new_validators, 4).unwrap(),
        ..fake_block_header(10, TIMESTAMP - 100, vec![0; 32])
    };
    let params = CrossChainUpdateParams {
        sending_chain_id: SIDECHAIN_A,
        certificate: network.signers.certify_encoded(&SIDECHAIN_A, &block).unwrap(),
        active_validators_update: update,
        certificate_threshold: 4,
        inbox_update: InboxUpdate::default(),
    };
    let command = default_mainchain_command(&network);

    assert!(verify(&command, &network, params.clone()).unwrap().is_ok());
    let (events, _) = execute(&command, &mut network, params);

    assert!(processed(&events).is_empty());
    let stored = network
        .stores()
        .chain_validators
        .get(&network.state, SIDECHAIN_A.as_bytes())
        .unwrap();
    assert_eq!(stored.certificate_threshold, 4);
    assert_eq!(stored.active_validators, new_validators);
    assert_eq!(network.account(SIDECHAIN_A).last_certificate.height, 10);
}

#[test]
fn sidechain_registration_activates_mainchain_account() {
    let mut network = Network::sidechain();
    let message = registration(MAINCHAIN, SIDECHAIN_A, "sidechaina");
    let params = network.update(MAINCHAIN, &[message], TIMESTAMP - 100);
    let command = SubmitSidechainCrossChainUpdateCommand::new(
        network.internal.clone(),
        interoperability_registry(&network.internal),
    );

    assert!(verify(&command, &network, params.clone()).unwrap().is_ok());
    let (events, _) = execute(&command, &mut network, params);

    assert_eq!(
        processed(&events),
        vec![(CcmProcessedResult::Applied, CcmProcessedCode::Success)]
    );
    assert_eq!(network.account(MAINCHAIN).status, ChainStatus::Active);
    assert!(events
        .filter(MODULE_NAME_INTEROPERABILITY, EVENT_NAME_CHAIN_ACCOUNT_UPDATED)
        .any(|e| e.topics == vec![MAINCHAIN.as_bytes().to_vec()]));
}

#[test]
fn sidechain_rejects_messages_for_other_chains() {
    let mut network = Network::sidechain();
    let message = ccm(0, "token", "transferCrossChain", MAINCHAIN, SIDECHAIN_B, 0, vec![1]);
    let params = network.update(MAINCHAIN, &[message], TIMESTAMP - 100);
    let command = SubmitSidechainCrossChainUpdateCommand::new(
        network.internal.clone(),
        interoperability_registry(&network.internal),
    );

    let (events, _) = execute(&command, &mut network, params);

    assert_eq!(
        processed(&events),
        vec![(
            CcmProcessedResult::Discarded,
            CcmProcessedCode::InvalidCcmValidationException
        )]
    );
    assert_eq!(network.account(MAINCHAIN).status, ChainStatus::Terminated);
    assert_eq!(network.channel(MAINCHAIN).inbox.size, 0);
    assert_eq!(network.account(MAINCHAIN).last_certificate.height, 5);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn bounce_pays_for_itself_or_discards(fee in 0u64..200_000, status in 0u32..3) {
        let mut network = Network::mainchain();
        let command = default_mainchain_command(&network);
        let mut message = transfer(0, MAINCHAIN, fee);
        message.status = status;
        let size = message.encode().unwrap().len() as u64;
        let ccm_id = sha256(&message.encode().unwrap()).to_vec();

        let mut events = EventQueue::new();
        let mut context_store = ContextStore::new();
        let mut ctx = CrossChainMessageContext {
            state: &mut network.state,
            events: &mut events,
            context_store: &mut context_store,
            chain_id: MAINCHAIN,
            header: header(),
            transaction: TransactionInfo::default(),
            ccm: message,
        };
        command
            .base()
            .bounce(&mut ctx, &ccm_id, size as usize, CcmStatusCode::ModuleNotSupported, CcmProcessedCode::ModuleNotSupported)
            .unwrap();

        let bounced = status == 0 && fee >= size * 1_000;
        let expected = if bounced { CcmProcessedResult::Bounced } else { CcmProcessedResult::Discarded };
        prop_assert_eq!(processed(&events), vec![(expected, CcmProcessedCode::ModuleNotSupported)]);
        prop_assert_eq!(network.channel(SIDECHAIN_A).outbox.size, u32::from(bounced));
    }
}
