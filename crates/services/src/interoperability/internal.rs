// Path: crates/services/src/interoperability/internal.rs
//! State transitions shared by the cross-chain update commands and the
//! interoperability cross-chain commands.
//!
//! Every `verify_*` function reports a protocol violation as
//! [`InteropError::Verification`] with the message callers surface to users.
//! Store and codec failures propagate unchanged.

use crate::interoperability::events::{
    emit_ccm_send_success, emit_chain_account_updated, emit_terminated_state_created,
};
use crate::interoperability::stores::{outbox_root_proof_key, InteropStores};
use crate::interoperability::compute_ccm_id;
use meridian_api::events::EventQueue;
use meridian_api::state::StateAccess;
use meridian_consensus::certificate::verify_aggregate_certificate_signature;
use meridian_crypto::sha256;
use meridian_state::tree::merkle::{
    calculate_merkle_root, calculate_root_from_right_witness, EMPTY_HASH,
};
use meridian_state::tree::sparse::{verify_inclusion, SparseMerkleQuery};
use meridian_types::app::{
    ActiveValidator, Ccm, CcmStatusCode, Certificate, ChainId, ChainStatus, ChainValidators,
    CrossChainUpdateParams, LastCertificate, MessageTree, OutboxRoot, OwnChainAccount,
    TerminatedState, CROSS_CHAIN_COMMAND_CHANNEL_TERMINATED,
};
use meridian_types::codec::{validate, SchemaObject};
use meridian_types::config::InteropConfig;
use meridian_types::error::{CodecError, InteropError, StateError};
use meridian_types::keys::{EMPTY_KEY, MODULE_NAME_INTEROPERABILITY};
use std::cmp::Ordering;

/// A message this chain originates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingCcm {
    /// Target module on the receiving chain.
    pub module: String,
    /// Target cross-chain command.
    pub cross_chain_command: String,
    /// Final destination.
    pub receiving_chain_id: ChainId,
    /// Fee attached to the message.
    pub fee: u64,
    /// Message status.
    pub status: CcmStatusCode,
    /// Encoded command parameters.
    pub params: Vec<u8>,
}

/// Applies `update` to `current`: a zero weight removes a key, any other weight
/// sets or inserts it. The result is sorted by BLS key.
pub fn calculate_new_active_validators(
    current: &[ActiveValidator],
    update: &[ActiveValidator],
) -> Vec<ActiveValidator> {
    let mut validators = current.to_vec();
    for change in update {
        let position = validators.iter().position(|v| v.bls_key == change.bls_key);
        match (position, change.bft_weight) {
            (Some(index), 0) => {
                validators.remove(index);
            }
            (Some(index), weight) => {
                if let Some(validator) = validators.get_mut(index) {
                    validator.bft_weight = weight;
                }
            }
            (None, 0) => {}
            (None, _) => validators.push(change.clone()),
        }
    }
    validators.sort_by(|a, b| a.bls_key.cmp(&b.bls_key));
    validators
}

/// Hash of the certificate signers: the preimage is the encoded
/// [`ChainValidators`].
pub fn compute_validators_hash(
    active_validators: &[ActiveValidator],
    certificate_threshold: u64,
) -> Result<Vec<u8>, CodecError> {
    let validators = ChainValidators {
        active_validators: active_validators.to_vec(),
        certificate_threshold,
    };
    Ok(sha256(&validators.encode()?).to_vec())
}

fn is_alphanumeric(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric())
}

fn appended(tree: &MessageTree, ccm_bytes: &[u8]) -> Result<MessageTree, InteropError> {
    let next = calculate_merkle_root(&sha256(ccm_bytes), &tree.append_path, tree.size)?;
    Ok(MessageTree {
        append_path: next.append_path,
        size: next.size,
        root: next.root.to_vec(),
    })
}

/// The interoperability internal method of one chain.
#[derive(Debug, Clone)]
pub struct InternalMethod {
    stores: InteropStores,
    config: InteropConfig,
    mainchain: bool,
}

impl InternalMethod {
    /// The internal method of the mainchain.
    pub fn mainchain(config: InteropConfig) -> Self {
        Self {
            stores: InteropStores::new(),
            config,
            mainchain: true,
        }
    }

    /// The internal method of a sidechain.
    pub fn sidechain(config: InteropConfig) -> Self {
        Self {
            stores: InteropStores::new(),
            config,
            mainchain: false,
        }
    }

    /// The module stores.
    pub fn stores(&self) -> &InteropStores {
        &self.stores
    }

    /// The module configuration.
    pub fn config(&self) -> &InteropConfig {
        &self.config
    }

    /// Whether this is the mainchain's method.
    pub fn is_mainchain(&self) -> bool {
        self.mainchain
    }

    /// The mainchain of the network `chain_id` belongs to.
    pub fn get_mainchain_id(&self, chain_id: &ChainId) -> ChainId {
        chain_id.mainchain_id()
    }

    /// This chain's account.
    pub fn own_chain_account<S: StateAccess + ?Sized>(
        &self,
        state: &S,
    ) -> Result<OwnChainAccount, InteropError> {
        Ok(self.stores.own_chain.get(state, EMPTY_KEY)?)
    }

    /// Whether `chain_id` may still exchange messages at `timestamp`.
    ///
    /// The own chain is always live. Unknown and terminated chains are not. On
    /// the mainchain an active chain also stops being live once its last
    /// certificate is older than the liveness limit.
    pub fn is_live<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        chain_id: &ChainId,
        timestamp: u32,
    ) -> Result<bool, InteropError> {
        if let Some(own) = self.stores.own_chain.get_opt(state, EMPTY_KEY)? {
            if own.chain_id == *chain_id {
                return Ok(true);
            }
        }
        if self.stores.terminated_state.has(state, chain_id.as_bytes())? {
            return Ok(false);
        }
        let Some(account) = self.stores.chain_account.get_opt(state, chain_id.as_bytes())? else {
            return Ok(false);
        };
        match account.status {
            ChainStatus::Terminated => Ok(false),
            ChainStatus::Active if self.mainchain => Ok(timestamp
                .saturating_sub(account.last_certificate.timestamp)
                <= self.config.liveness_limit),
            _ => Ok(true),
        }
    }

    /// Checks the bounds of `ccm` against its schema, the name alphabet and
    /// the maximum encoded size.
    pub fn validate_ccm_format(&self, ccm: &Ccm) -> Result<(), InteropError> {
        validate(Ccm::schema(), &ccm.to_object())?;
        if !is_alphanumeric(&ccm.module) {
            return Err(InteropError::verification(
                "Cross-chain message module name must be alphanumeric.",
            ));
        }
        if !is_alphanumeric(&ccm.cross_chain_command) {
            return Err(InteropError::verification(
                "Cross-chain message command name must be alphanumeric.",
            ));
        }
        let size = ccm.encode()?.len();
        if size > self.config.max_ccm_size {
            return Err(InteropError::verification(format!(
                "Cross-chain message size is larger than {}.",
                self.config.max_ccm_size
            )));
        }
        Ok(())
    }

    /// Appends a received message to the inbox of the channel with `chain_id`.
    pub fn append_to_inbox_tree<S: StateAccess + ?Sized>(
        &self,
        state: &mut S,
        chain_id: &ChainId,
        ccm_bytes: &[u8],
    ) -> Result<(), InteropError> {
        let mut channel = self.stores.channel.get(&*state, chain_id.as_bytes())?;
        channel.inbox = appended(&channel.inbox, ccm_bytes)?;
        self.stores.channel.set(state, chain_id.as_bytes(), &channel)?;
        Ok(())
    }

    /// Appends `ccm` to the outbox of the channel with `chain_id` and mirrors
    /// the new outbox root into the provable outbox root store.
    pub fn add_to_outbox<S: StateAccess + ?Sized>(
        &self,
        state: &mut S,
        chain_id: &ChainId,
        ccm: &Ccm,
    ) -> Result<(), InteropError> {
        let mut channel = self.stores.channel.get(&*state, chain_id.as_bytes())?;
        channel.outbox = appended(&channel.outbox, &ccm.encode()?)?;
        self.stores.channel.set(state, chain_id.as_bytes(), &channel)?;
        self.stores.outbox_root.set(
            state,
            chain_id.as_bytes(),
            &OutboxRoot {
                root: channel.outbox.root,
            },
        )?;
        Ok(())
    }

    /// Sends a message from this chain, returning its ID.
    ///
    /// Messages to chains without a chain account are routed through the
    /// mainchain. The own chain nonce is consumed.
    pub fn send_internal<S: StateAccess + ?Sized>(
        &self,
        state: &mut S,
        events: &mut EventQueue,
        message: OutgoingCcm,
    ) -> Result<Vec<u8>, InteropError> {
        let mut own = self.own_chain_account(&*state)?;
        let receiving = message.receiving_chain_id;
        let partner = if self.stores.chain_account.has(&*state, receiving.as_bytes())? {
            receiving
        } else {
            self.get_mainchain_id(&receiving)
        };

        let ccm = Ccm {
            nonce: own.nonce,
            module: message.module,
            cross_chain_command: message.cross_chain_command,
            sending_chain_id: own.chain_id,
            receiving_chain_id: receiving,
            fee: message.fee,
            status: message.status.into(),
            params: message.params,
        };
        self.validate_ccm_format(&ccm)?;
        self.add_to_outbox(state, &partner, &ccm)?;
        own.nonce = own.nonce.saturating_add(1);
        self.stores.own_chain.set(state, EMPTY_KEY, &own)?;

        let id = compute_ccm_id(&ccm)?;
        emit_ccm_send_success(events, &id, &ccm)?;
        tracing::debug!(
            target: "interop",
            ccm_id = %hex::encode(&id),
            receiving_chain_id = %receiving,
            command = %ccm.cross_chain_command,
            "ccm sent"
        );
        Ok(id)
    }

    /// Terminates the channel with `chain_id`: tells the chain with a
    /// `channelTerminated` message and records its terminated state.
    /// Terminating an already terminated chain does nothing.
    pub fn terminate_chain_internal<S: StateAccess + ?Sized>(
        &self,
        state: &mut S,
        events: &mut EventQueue,
        chain_id: &ChainId,
    ) -> Result<(), InteropError> {
        if self.stores.terminated_state.has(&*state, chain_id.as_bytes())? {
            return Ok(());
        }
        self.send_internal(
            state,
            events,
            OutgoingCcm {
                module: MODULE_NAME_INTEROPERABILITY.to_string(),
                cross_chain_command: CROSS_CHAIN_COMMAND_CHANNEL_TERMINATED.to_string(),
                receiving_chain_id: *chain_id,
                fee: 0,
                status: CcmStatusCode::Ok,
                params: Vec::new(),
            },
        )?;
        self.create_terminated_state_account(state, events, chain_id, None)?;
        tracing::info!(target: "interop", chain_id = %chain_id, "chain terminated");
        Ok(())
    }

    /// Records the terminated state of `chain_id`.
    ///
    /// A known chain is marked terminated, loses its outbox root entry and keeps
    /// `state_root` (or its last certified state root) for recovery. An unknown
    /// chain needs `state_root`, except on a sidechain, where the state is left
    /// uninitialized and anchored to the mainchain's last certified state root.
    pub fn create_terminated_state_account<S: StateAccess + ?Sized>(
        &self,
        state: &mut S,
        events: &mut EventQueue,
        chain_id: &ChainId,
        state_root: Option<Vec<u8>>,
    ) -> Result<(), InteropError> {
        let key = chain_id.as_bytes();
        let terminated = match (self.stores.chain_account.get_opt(&*state, key)?, state_root) {
            (Some(mut account), state_root) => {
                account.status = ChainStatus::Terminated;
                self.stores.chain_account.set(state, key, &account)?;
                self.stores.outbox_root.del(state, key)?;
                emit_chain_account_updated(events, chain_id, &account)?;
                TerminatedState {
                    state_root: state_root.unwrap_or(account.last_certificate.state_root),
                    mainchain_state_root: EMPTY_HASH.to_vec(),
                    initialized: true,
                }
            }
            (None, Some(state_root)) => TerminatedState {
                state_root,
                mainchain_state_root: EMPTY_HASH.to_vec(),
                initialized: true,
            },
            (None, None) => {
                if self.mainchain {
                    return Err(InteropError::verification(
                        "Chain to be terminated is not valid.",
                    ));
                }
                let mainchain = self.get_mainchain_id(chain_id);
                let mainchain_account =
                    self.stores.chain_account.get(&*state, mainchain.as_bytes())?;
                TerminatedState {
                    state_root: EMPTY_HASH.to_vec(),
                    mainchain_state_root: mainchain_account.last_certificate.state_root,
                    initialized: false,
                }
            }
        };
        self.stores.terminated_state.set(state, key, &terminated)?;
        emit_terminated_state_created(events, chain_id, &terminated)?;
        Ok(())
    }

    /// Checks that the certificate of `params` advances the sending chain's
    /// last certificate, predates the including block and is signed.
    pub fn verify_certificate<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        params: &CrossChainUpdateParams,
        timestamp: u32,
    ) -> Result<(), InteropError> {
        let certificate = Certificate::decode_validated(&params.certificate)?;
        let account = self
            .stores
            .chain_account
            .get(state, params.sending_chain_id.as_bytes())?;
        if certificate.height <= account.last_certificate.height {
            return Err(InteropError::verification(
                "Certificate height is not greater than last certificate height.",
            ));
        }
        if certificate.timestamp >= timestamp {
            return Err(InteropError::verification(
                "Certificate timestamp is not smaller than timestamp of the block including the CCU.",
            ));
        }
        self.verify_certificate_signature(state, params)
    }

    /// Checks the aggregate signature of the certificate of `params` against
    /// the stored signers of the sending chain.
    pub fn verify_certificate_signature<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        params: &CrossChainUpdateParams,
    ) -> Result<(), InteropError> {
        let certificate = Certificate::decode_validated(&params.certificate)?;
        let validators = self
            .stores
            .chain_validators
            .get(state, params.sending_chain_id.as_bytes())?;
        let valid = verify_aggregate_certificate_signature(
            &validators.active_validators,
            validators.certificate_threshold,
            &params.sending_chain_id,
            &certificate,
        )?;
        if !valid {
            return Err(InteropError::verification(
                "Certificate is not a valid aggregate signature.",
            ));
        }
        Ok(())
    }

    /// Checks a change of the sending chain's signers or threshold: it must be
    /// certified, sorted, within bounds and match the certified validators hash.
    pub fn verify_validators_update<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        params: &CrossChainUpdateParams,
    ) -> Result<(), InteropError> {
        if params.certificate.is_empty() {
            return Err(InteropError::verification(
                "Certificate must be non-empty if validators have been updated.",
            ));
        }
        for pair in params.active_validators_update.windows(2) {
            let [a, b] = pair else { continue };
            match a.bls_key.cmp(&b.bls_key) {
                Ordering::Less => {}
                Ordering::Equal => {
                    return Err(InteropError::verification("Keys have duplicated entry."))
                }
                Ordering::Greater => {
                    return Err(InteropError::verification(
                        "Keys are not sorted lexicographic order.",
                    ))
                }
            }
        }

        let current = self
            .stores
            .chain_validators
            .get(state, params.sending_chain_id.as_bytes())?;
        let validators =
            calculate_new_active_validators(&current.active_validators, &params.active_validators_update);
        if validators.len() > self.config.max_num_validators {
            return Err(InteropError::verification(format!(
                "Active validators must have at most {} elements.",
                self.config.max_num_validators
            )));
        }

        let total_weight = validators
            .iter()
            .fold(0u64, |sum, v| sum.saturating_add(v.bft_weight));
        if params.certificate_threshold < total_weight / 3 + 1 {
            return Err(InteropError::verification("Certificate threshold is too small."));
        }
        if params.certificate_threshold > total_weight {
            return Err(InteropError::verification("Certificate threshold is too large."));
        }

        let certificate = Certificate::decode_validated(&params.certificate)?;
        if certificate.validators_hash
            != compute_validators_hash(&validators, params.certificate_threshold)?
        {
            return Err(InteropError::verification(
                "ValidatorsHash in certificate and the computed values do not match.",
            ));
        }
        Ok(())
    }

    /// Checks that the inbox after appending the messages of `params`, completed
    /// by the message witness, is the partner chain's outbox.
    ///
    /// Without a certificate the result must equal the stored partner outbox
    /// root; with one it must be included in the certified state root.
    pub fn verify_partner_chain_outbox_root<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        params: &CrossChainUpdateParams,
    ) -> Result<(), InteropError> {
        let channel = self
            .stores
            .channel
            .get(state, params.sending_chain_id.as_bytes())?;
        let mut inbox = channel.inbox;
        for ccm_bytes in &params.inbox_update.cross_chain_messages {
            inbox = appended(&inbox, ccm_bytes)?;
        }
        let new_inbox_root = calculate_root_from_right_witness(
            inbox.size,
            &inbox.append_path,
            &params.inbox_update.message_witness_hashes,
        )?;

        if params.certificate.is_empty() {
            if new_inbox_root.as_slice() != channel.partner_chain_outbox_root.as_slice() {
                return Err(InteropError::verification(
                    "Inbox root does not match partner chain outbox root.",
                ));
            }
            return Ok(());
        }

        let certificate = Certificate::decode_validated(&params.certificate)?;
        let own = self.own_chain_account(state)?;
        let witness = &params.inbox_update.outbox_root_witness;
        let query = SparseMerkleQuery {
            key: outbox_root_proof_key(&own.chain_id),
            value: sha256(
                &OutboxRoot {
                    root: new_inbox_root.to_vec(),
                }
                .encode()?,
            )
            .to_vec(),
            bitmap: witness.bitmap.clone(),
        };
        if !verify_inclusion(&certificate.state_root, &query, &witness.sibling_hashes)? {
            return Err(InteropError::verification(
                "Invalid inclusion proof for inbox update.",
            ));
        }
        Ok(())
    }

    /// Stores the certificate of a cross-chain update as the sending chain's
    /// last certificate.
    pub fn update_certificate<S: StateAccess + ?Sized>(
        &self,
        state: &mut S,
        events: &mut EventQueue,
        chain_id: &ChainId,
        certificate_bytes: &[u8],
    ) -> Result<(), InteropError> {
        let certificate = Certificate::decode(certificate_bytes)?;
        let mut account = self.stores.chain_account.get(&*state, chain_id.as_bytes())?;
        account.last_certificate = LastCertificate {
            height: certificate.height,
            timestamp: certificate.timestamp,
            state_root: certificate.state_root,
            validators_hash: certificate.validators_hash,
        };
        self.stores
            .chain_account
            .set(state, chain_id.as_bytes(), &account)?;
        emit_chain_account_updated(events, chain_id, &account)?;
        tracing::info!(
            target: "interop",
            chain_id = %chain_id,
            height = certificate.height,
            "certificate updated"
        );
        Ok(())
    }

    /// Applies the validators update and threshold of `params` to the sending
    /// chain's signers.
    pub fn update_validators<S: StateAccess + ?Sized>(
        &self,
        state: &mut S,
        params: &CrossChainUpdateParams,
    ) -> Result<(), InteropError> {
        let key = params.sending_chain_id.as_bytes();
        let current = self.stores.chain_validators.get(&*state, key)?;
        let updated = ChainValidators {
            active_validators: calculate_new_active_validators(
                &current.active_validators,
                &params.active_validators_update,
            ),
            certificate_threshold: params.certificate_threshold,
        };
        self.stores.chain_validators.set(state, key, &updated)?;
        Ok(())
    }

    /// Completes the inbox of the channel with `chain_id` with `witness` and
    /// stores the result as the partner chain's outbox root.
    pub fn update_partner_chain_outbox_root<S: StateAccess + ?Sized>(
        &self,
        state: &mut S,
        chain_id: &ChainId,
        witness: &[Vec<u8>],
    ) -> Result<(), InteropError> {
        let mut channel = self.stores.channel.get(&*state, chain_id.as_bytes())?;
        let root =
            calculate_root_from_right_witness(channel.inbox.size, &channel.inbox.append_path, witness)?;
        channel.partner_chain_outbox_root = root.to_vec();
        self.stores.channel.set(state, chain_id.as_bytes(), &channel)?;
        Ok(())
    }

    /// Whether the sending chain's signers or threshold change with `params`.
    pub fn has_validators_update<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        params: &CrossChainUpdateParams,
    ) -> Result<bool, StateError> {
        if !params.active_validators_update.is_empty() {
            return Ok(true);
        }
        let current = self
            .stores
            .chain_validators
            .get(state, params.sending_chain_id.as_bytes())?;
        Ok(current.certificate_threshold != params.certificate_threshold)
    }
}
