// Path: crates/types/src/app/interop.rs
//! Cross-chain data structures: messages, certificates, chain accounts and channels.

use crate::codec::{
    bytes_list, compile_static, object_list, DataType, Object, Schema, SchemaObject,
};
use crate::error::CodecError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Seconds a chain may go without a new certificate and still be live.
pub const LIVENESS_LIMIT: u32 = 2_592_000;
/// Maximum encoded size of a cross-chain message.
pub const MAX_CCM_SIZE: usize = 10_240;
/// Fee per encoded byte a message must carry to be bounced back.
pub const MIN_RETURN_FEE_PER_BYTE: u64 = 1_000;
/// Upper bound on a sidechain's active validator set.
pub const MAX_NUM_VALIDATORS: usize = 199;
/// Length of a chain ID.
pub const CHAIN_ID_LENGTH: usize = 4;
/// Length of a SHA-256 digest.
pub const HASH_LENGTH: usize = 32;
/// Length of a compressed BLS public key.
pub const BLS_PUBLIC_KEY_LENGTH: usize = 48;
/// Length of a compressed BLS signature.
pub const BLS_SIGNATURE_LENGTH: usize = 96;
/// Length of a token ID.
pub const TOKEN_ID_LENGTH: usize = 8;
/// Maximum length of a chain name.
pub const MAX_CHAIN_NAME_LENGTH: usize = 40;
/// Maximum length of a module or cross-chain command name.
pub const MAX_MODULE_NAME_LENGTH: usize = 32;
/// Tag prepended to certificates before they are signed.
pub const MESSAGE_TAG_CERTIFICATE: &[u8] = b"LSK_CE_";
/// Sender address used for protocol-generated messages.
pub const EMPTY_FEE_ADDRESS: &[u8] = &[];

/// Cross-chain command announcing a new channel.
pub const CROSS_CHAIN_COMMAND_REGISTRATION: &str = "registration";
/// Cross-chain command telling a chain that a sidechain was terminated.
pub const CROSS_CHAIN_COMMAND_SIDECHAIN_TERMINATED: &str = "sidechainTerminated";
/// Cross-chain command telling a chain that its channel was terminated.
pub const CROSS_CHAIN_COMMAND_CHANNEL_TERMINATED: &str = "channelTerminated";

/// A 4-byte chain identifier. The first byte is the network; a mainchain ID has
/// zeros in the remaining three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainId(pub [u8; CHAIN_ID_LENGTH]);

impl ChainId {
    /// Parses a chain ID from exactly four bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        <[u8; CHAIN_ID_LENGTH]>::try_from(bytes)
            .map(Self)
            .map_err(|_| CodecError::LengthBounds {
                name: "chainID".into(),
                length: bytes.len(),
                min: CHAIN_ID_LENGTH,
                max: CHAIN_ID_LENGTH,
            })
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The mainchain of the network this chain belongs to.
    pub fn mainchain_id(&self) -> ChainId {
        let [network, ..] = self.0;
        ChainId([network, 0, 0, 0])
    }

    /// Whether this is the mainchain of its network.
    pub fn is_mainchain(&self) -> bool {
        *self == self.mainchain_id()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

macro_rules! u32_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident = $value:expr),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value),*
        }

        impl TryFrom<u32> for $name {
            type Error = CodecError;

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)*
                    _ => Err(CodecError::TypeMismatch {
                        name: stringify!($name).to_string(),
                        expected: "known enum value",
                    }),
                }
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> u32 {
                value as u32
            }
        }
    };
}

u32_enum! {
    /// Lifecycle of a registered chain. Transitions only move forward.
    ChainStatus {
        /// Registered, no certificate received yet.
        Registered = 0,
        /// At least one certificate received.
        Active = 1,
        /// Terminated; absorbing.
        Terminated = 2,
    }
}

u32_enum! {
    /// Status carried by a cross-chain message.
    CcmStatusCode {
        /// A regular message.
        Ok = 0,
        /// Bounced: the receiving chain was unavailable.
        ChannelUnavailable = 1,
        /// Bounced: the receiving chain does not support the module.
        ModuleNotSupported = 2,
        /// Bounced: the receiving chain does not support the command.
        CrossChainCommandNotSupported = 3,
        /// Bounced: the command failed.
        FailedCcm = 4,
        /// Recovered from a terminated chain.
        Recovered = 5,
    }
}

u32_enum! {
    /// What happened to a processed message.
    CcmProcessedResult {
        /// Executed on this chain.
        Applied = 0,
        /// Forwarded to another chain.
        Forwarded = 1,
        /// Returned to the sending chain.
        Bounced = 2,
        /// Dropped.
        Discarded = 3,
    }
}

u32_enum! {
    /// Why a message ended up with its [`CcmProcessedResult`].
    CcmProcessedCode {
        /// Processed normally.
        Success = 0,
        /// The receiving chain was unknown, registered only, or not live.
        ChannelUnavailable = 1,
        /// The target module is not registered.
        ModuleNotSupported = 2,
        /// The target command is not registered.
        CrossChainCommandNotSupported = 3,
        /// The command failed.
        FailedCcm = 4,
        /// The message failed format validation.
        InvalidCcmValidationException = 5,
        /// A module's message verification hook failed.
        InvalidCcmVerifyCcmException = 6,
        /// The command's verification failed.
        InvalidCcmVerifyException = 7,
        /// A before-execution hook failed.
        InvalidCcmBeforeCccExecutionException = 8,
        /// An after-execution hook failed.
        InvalidCcmAfterCccExecutionException = 9,
        /// A before-forwarding hook failed.
        InvalidCcmBeforeCccForwardingException = 10,
    }
}

fn chain_id(object: &Object, name: &str) -> Result<ChainId, CodecError> {
    ChainId::from_slice(object.get_bytes(name)?)
}

static CCM_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/ccm")
            .uint64("nonce", 1)
            .string("module", 2)
            .min_length(1)
            .max_length(MAX_MODULE_NAME_LENGTH)
            .string("crossChainCommand", 3)
            .min_length(1)
            .max_length(MAX_MODULE_NAME_LENGTH)
            .bytes("sendingChainID", 4)
            .exact_length(CHAIN_ID_LENGTH)
            .bytes("receivingChainID", 5)
            .exact_length(CHAIN_ID_LENGTH)
            .uint64("fee", 6)
            .uint32("status", 7)
            .bytes("params", 8),
    )
});

/// A cross-chain message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ccm {
    /// Per-sender sequence number.
    pub nonce: u64,
    /// Target module on the receiving chain.
    pub module: String,
    /// Target command within the module.
    pub cross_chain_command: String,
    /// Origin chain.
    pub sending_chain_id: ChainId,
    /// Destination chain.
    pub receiving_chain_id: ChainId,
    /// Fee paid for processing.
    pub fee: u64,
    /// Raw [`CcmStatusCode`].
    pub status: u32,
    /// Command parameters, encoded with the command's own schema.
    pub params: Vec<u8>,
}

impl SchemaObject for Ccm {
    fn schema() -> &'static Schema {
        &CCM_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with("nonce", self.nonce)
            .with("module", self.module.as_str())
            .with("crossChainCommand", self.cross_chain_command.as_str())
            .with("sendingChainID", self.sending_chain_id.as_bytes())
            .with("receivingChainID", self.receiving_chain_id.as_bytes())
            .with("fee", self.fee)
            .with("status", self.status)
            .with("params", self.params.clone())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            nonce: object.get_u64("nonce")?,
            module: object.get_str("module")?.to_string(),
            cross_chain_command: object.get_str("crossChainCommand")?.to_string(),
            sending_chain_id: chain_id(object, "sendingChainID")?,
            receiving_chain_id: chain_id(object, "receivingChainID")?,
            fee: object.get_u64("fee")?,
            status: object.get_u32("status")?,
            params: object.get_bytes("params")?.to_vec(),
        })
    }
}

static LAST_CERTIFICATE_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/lastCertificate")
            .uint32("height", 1)
            .uint32("timestamp", 2)
            .bytes("stateRoot", 3)
            .bytes("validatorsHash", 4),
    )
});

static CHAIN_ACCOUNT_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/chainAccount")
            .string("name", 1)
            .max_length(MAX_CHAIN_NAME_LENGTH)
            .object("lastCertificate", 2, LAST_CERTIFICATE_SCHEMA.clone())
            .uint32("status", 3),
    )
});

/// The most recent certificate accepted from a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastCertificate {
    /// Certified height.
    pub height: u32,
    /// Timestamp of the certified block.
    pub timestamp: u32,
    /// State root of the certified block.
    pub state_root: Vec<u8>,
    /// Validators hash of the certified block.
    pub validators_hash: Vec<u8>,
}

impl LastCertificate {
    fn to_object(&self) -> Object {
        Object::new()
            .with("height", self.height)
            .with("timestamp", self.timestamp)
            .with("stateRoot", self.state_root.clone())
            .with("validatorsHash", self.validators_hash.clone())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            height: object.get_u32("height")?,
            timestamp: object.get_u32("timestamp")?,
            state_root: object.get_bytes("stateRoot")?.to_vec(),
            validators_hash: object.get_bytes("validatorsHash")?.to_vec(),
        })
    }
}

/// A chain registered with this chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainAccount {
    /// Registered chain name.
    pub name: String,
    /// The last accepted certificate.
    pub last_certificate: LastCertificate,
    /// Lifecycle status.
    pub status: ChainStatus,
}

impl SchemaObject for ChainAccount {
    fn schema() -> &'static Schema {
        &CHAIN_ACCOUNT_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with("name", self.name.as_str())
            .with("lastCertificate", self.last_certificate.to_object())
            .with("status", u32::from(self.status))
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            name: object.get_str("name")?.to_string(),
            last_certificate: LastCertificate::from_object(object.get_object("lastCertificate")?)?,
            status: ChainStatus::try_from(object.get_u32("status")?)?,
        })
    }
}

static MESSAGE_TREE_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/messageTree")
            .array_of("appendPath", 1, DataType::Bytes)
            .uint32("size", 2)
            .bytes("root", 3),
    )
});

static CHANNEL_DATA_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/channel")
            .object("inbox", 1, MESSAGE_TREE_SCHEMA.clone())
            .object("outbox", 2, MESSAGE_TREE_SCHEMA.clone())
            .bytes("partnerChainOutboxRoot", 3)
            .bytes("messageFeeTokenID", 4),
    )
});

/// The compact state of an append-only Merkle tree of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageTree {
    /// Roots of the perfect subtrees covering the leaves, smallest first.
    pub append_path: Vec<Vec<u8>>,
    /// Number of leaves.
    pub size: u32,
    /// Current root.
    pub root: Vec<u8>,
}

impl MessageTree {
    fn to_object(&self) -> Object {
        Object::new()
            .with("appendPath", bytes_list(&self.append_path))
            .with("size", self.size)
            .with("root", self.root.clone())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            append_path: object.get_bytes_list("appendPath")?,
            size: object.get_u32("size")?,
            root: object.get_bytes("root")?.to_vec(),
        })
    }
}

/// The message channel with a partner chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelData {
    /// Messages received from the partner.
    pub inbox: MessageTree,
    /// Messages sent to the partner.
    pub outbox: MessageTree,
    /// The partner's outbox root as last proven.
    pub partner_chain_outbox_root: Vec<u8>,
    /// Token in which message fees are paid.
    pub message_fee_token_id: Vec<u8>,
}

impl SchemaObject for ChannelData {
    fn schema() -> &'static Schema {
        &CHANNEL_DATA_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with("inbox", self.inbox.to_object())
            .with("outbox", self.outbox.to_object())
            .with("partnerChainOutboxRoot", self.partner_chain_outbox_root.clone())
            .with("messageFeeTokenID", self.message_fee_token_id.clone())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            inbox: MessageTree::from_object(object.get_object("inbox")?)?,
            outbox: MessageTree::from_object(object.get_object("outbox")?)?,
            partner_chain_outbox_root: object.get_bytes("partnerChainOutboxRoot")?.to_vec(),
            message_fee_token_id: object.get_bytes("messageFeeTokenID")?.to_vec(),
        })
    }
}

static ACTIVE_VALIDATOR_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/activeValidator")
            .bytes("blsKey", 1)
            .exact_length(BLS_PUBLIC_KEY_LENGTH)
            .uint64("bftWeight", 2),
    )
});

static CHAIN_VALIDATORS_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/chainValidators")
            .array_of_objects("activeValidators", 1, ACTIVE_VALIDATOR_SCHEMA.clone())
            .max_length(MAX_NUM_VALIDATORS)
            .uint64("certificateThreshold", 2),
    )
});

/// A certificate signer of a partner chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActiveValidator {
    /// Compressed BLS public key.
    pub bls_key: Vec<u8>,
    /// Signing weight.
    pub bft_weight: u64,
}

impl ActiveValidator {
    fn to_object(&self) -> Object {
        Object::new()
            .with("blsKey", self.bls_key.clone())
            .with("bftWeight", self.bft_weight)
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            bls_key: object.get_bytes("blsKey")?.to_vec(),
            bft_weight: object.get_u64("bftWeight")?,
        })
    }
}

/// The certificate signers of a partner chain. The encoding of this structure is
/// the preimage of the validators hash carried by certificates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainValidators {
    /// Signers sorted by BLS key.
    pub active_validators: Vec<ActiveValidator>,
    /// Aggregate weight a certificate needs.
    pub certificate_threshold: u64,
}

impl SchemaObject for ChainValidators {
    fn schema() -> &'static Schema {
        &CHAIN_VALIDATORS_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with(
                "activeValidators",
                object_list(self.active_validators.iter().map(ActiveValidator::to_object)),
            )
            .with("certificateThreshold", self.certificate_threshold)
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            active_validators: object.map_objects("activeValidators", ActiveValidator::from_object)?,
            certificate_threshold: object.get_u64("certificateThreshold")?,
        })
    }
}

static OWN_CHAIN_ACCOUNT_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/ownChainAccount")
            .string("name", 1)
            .bytes("chainID", 2)
            .exact_length(CHAIN_ID_LENGTH)
            .uint64("nonce", 3),
    )
});

/// This chain's identity and outgoing message counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnChainAccount {
    /// Chain name.
    pub name: String,
    /// Chain ID.
    pub chain_id: ChainId,
    /// Nonce of the next message sent by this chain.
    pub nonce: u64,
}

impl SchemaObject for OwnChainAccount {
    fn schema() -> &'static Schema {
        &OWN_CHAIN_ACCOUNT_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with("name", self.name.as_str())
            .with("chainID", self.chain_id.as_bytes())
            .with("nonce", self.nonce)
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            name: object.get_str("name")?.to_string(),
            chain_id: chain_id(object, "chainID")?,
            nonce: object.get_u64("nonce")?,
        })
    }
}

static TERMINATED_STATE_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/terminatedState")
            .bytes("stateRoot", 1)
            .bytes("mainchainStateRoot", 2)
            .boolean("initialized", 3),
    )
});

/// What remains of a terminated chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminatedState {
    /// Last certified state root of the terminated chain.
    pub state_root: Vec<u8>,
    /// Mainchain state root used to initialise the account, if not initialised.
    pub mainchain_state_root: Vec<u8>,
    /// Whether `state_root` is known.
    pub initialized: bool,
}

impl SchemaObject for TerminatedState {
    fn schema() -> &'static Schema {
        &TERMINATED_STATE_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with("stateRoot", self.state_root.clone())
            .with("mainchainStateRoot", self.mainchain_state_root.clone())
            .with("initialized", self.initialized)
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            state_root: object.get_bytes("stateRoot")?.to_vec(),
            mainchain_state_root: object.get_bytes("mainchainStateRoot")?.to_vec(),
            initialized: object.get_bool("initialized")?,
        })
    }
}

static OUTBOX_ROOT_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/outbox")
            .bytes("root", 1)
            .exact_length(HASH_LENGTH),
    )
});

/// The outbox root of a channel, stored separately so it can be proven.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboxRoot {
    /// The root.
    pub root: Vec<u8>,
}

impl SchemaObject for OutboxRoot {
    fn schema() -> &'static Schema {
        &OUTBOX_ROOT_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new().with("root", self.root.clone())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            root: object.get_bytes("root")?.to_vec(),
        })
    }
}

fn unsigned_certificate_builder(id: &str) -> crate::codec::SchemaBuilder {
    Schema::builder(id)
        .bytes("blockID", 1)
        .exact_length(HASH_LENGTH)
        .uint32("height", 2)
        .uint32("timestamp", 3)
        .bytes("stateRoot", 4)
        .exact_length(HASH_LENGTH)
        .bytes("validatorsHash", 5)
        .exact_length(HASH_LENGTH)
}

static CERTIFICATE_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        unsigned_certificate_builder("/engine/certificate")
            .bytes("aggregationBits", 6)
            .bytes("signature", 7),
    )
});

static UNSIGNED_CERTIFICATE_SCHEMA: Lazy<Arc<Schema>> =
    Lazy::new(|| compile_static(unsigned_certificate_builder("/engine/certificate/unsigned")));

/// An attestation of a block, aggregated from validator signatures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Certificate {
    /// ID of the certified block.
    pub block_id: Vec<u8>,
    /// Height of the certified block.
    pub height: u32,
    /// Timestamp of the certified block.
    pub timestamp: u32,
    /// State root of the certified block.
    pub state_root: Vec<u8>,
    /// Validators hash of the certified block.
    pub validators_hash: Vec<u8>,
    /// Bitmap of the signers, least significant bit first.
    pub aggregation_bits: Vec<u8>,
    /// Aggregate BLS signature.
    pub signature: Vec<u8>,
}

impl Certificate {
    fn unsigned_object(&self) -> Object {
        Object::new()
            .with("blockID", self.block_id.clone())
            .with("height", self.height)
            .with("timestamp", self.timestamp)
            .with("stateRoot", self.state_root.clone())
            .with("validatorsHash", self.validators_hash.clone())
    }

    /// The bytes validators sign: the certificate without bitmap and signature.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, CodecError> {
        crate::codec::encode(&UNSIGNED_CERTIFICATE_SCHEMA, &self.unsigned_object())
    }
}

impl SchemaObject for Certificate {
    fn schema() -> &'static Schema {
        &CERTIFICATE_SCHEMA
    }

    fn to_object(&self) -> Object {
        self.unsigned_object()
            .with("aggregationBits", self.aggregation_bits.clone())
            .with("signature", self.signature.clone())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            block_id: object.get_bytes("blockID")?.to_vec(),
            height: object.get_u32("height")?,
            timestamp: object.get_u32("timestamp")?,
            state_root: object.get_bytes("stateRoot")?.to_vec(),
            validators_hash: object.get_bytes("validatorsHash")?.to_vec(),
            aggregation_bits: object.get_bytes("aggregationBits")?.to_vec(),
            signature: object.get_bytes("signature")?.to_vec(),
        })
    }
}

static OUTBOX_ROOT_WITNESS_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/ccu/outboxRootWitness")
            .bytes("bitmap", 1)
            .array_of("siblingHashes", 2, DataType::Bytes),
    )
});

static INBOX_UPDATE_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/ccu/inboxUpdate")
            .array_of("crossChainMessages", 1, DataType::Bytes)
            .array_of("messageWitnessHashes", 2, DataType::Bytes)
            .object("outboxRootWitness", 3, OUTBOX_ROOT_WITNESS_SCHEMA.clone()),
    )
});

static CCU_PARAMS_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/ccu")
            .bytes("sendingChainID", 1)
            .exact_length(CHAIN_ID_LENGTH)
            .bytes("certificate", 2)
            .array_of_objects("activeValidatorsUpdate", 3, ACTIVE_VALIDATOR_SCHEMA.clone())
            .uint64("certificateThreshold", 4)
            .object("inboxUpdate", 5, INBOX_UPDATE_SCHEMA.clone()),
    )
});

/// The sparse Merkle proof of a partner chain's outbox root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboxRootWitness {
    /// Which tree levels carry a non-empty sibling.
    pub bitmap: Vec<u8>,
    /// The non-empty siblings, bottom up.
    pub sibling_hashes: Vec<Vec<u8>>,
}

/// Messages delivered by a cross-chain update and their proof.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboxUpdate {
    /// Encoded messages, in the order they were sent.
    pub cross_chain_messages: Vec<Vec<u8>>,
    /// Right witness completing the partner outbox root.
    pub message_witness_hashes: Vec<Vec<u8>>,
    /// Proof of the partner outbox root against the certified state root.
    pub outbox_root_witness: OutboxRootWitness,
}

impl InboxUpdate {
    /// Whether the update carries no messages and no proof.
    pub fn is_empty(&self) -> bool {
        self.cross_chain_messages.is_empty()
            && self.message_witness_hashes.is_empty()
            && self.outbox_root_witness.bitmap.is_empty()
            && self.outbox_root_witness.sibling_hashes.is_empty()
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with("crossChainMessages", bytes_list(&self.cross_chain_messages))
            .with("messageWitnessHashes", bytes_list(&self.message_witness_hashes))
            .with(
                "outboxRootWitness",
                Object::new()
                    .with("bitmap", self.outbox_root_witness.bitmap.clone())
                    .with(
                        "siblingHashes",
                        bytes_list(&self.outbox_root_witness.sibling_hashes),
                    ),
            )
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        let witness = object.get_object("outboxRootWitness")?;
        Ok(Self {
            cross_chain_messages: object.get_bytes_list("crossChainMessages")?,
            message_witness_hashes: object.get_bytes_list("messageWitnessHashes")?,
            outbox_root_witness: OutboxRootWitness {
                bitmap: witness.get_bytes("bitmap")?.to_vec(),
                sibling_hashes: witness.get_bytes_list("siblingHashes")?,
            },
        })
    }
}

/// Parameters of a cross-chain update transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossChainUpdateParams {
    /// The chain the messages come from.
    pub sending_chain_id: ChainId,
    /// Encoded [`Certificate`], or empty.
    pub certificate: Vec<u8>,
    /// Changes to the sending chain's certificate signers.
    pub active_validators_update: Vec<ActiveValidator>,
    /// New certificate threshold of the sending chain.
    pub certificate_threshold: u64,
    /// The delivered messages.
    pub inbox_update: InboxUpdate,
}

impl SchemaObject for CrossChainUpdateParams {
    fn schema() -> &'static Schema {
        &CCU_PARAMS_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with("sendingChainID", self.sending_chain_id.as_bytes())
            .with("certificate", self.certificate.clone())
            .with(
                "activeValidatorsUpdate",
                object_list(
                    self.active_validators_update
                        .iter()
                        .map(ActiveValidator::to_object),
                ),
            )
            .with("certificateThreshold", self.certificate_threshold)
            .with("inboxUpdate", self.inbox_update.to_object())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            sending_chain_id: chain_id(object, "sendingChainID")?,
            certificate: object.get_bytes("certificate")?.to_vec(),
            active_validators_update: object
                .map_objects("activeValidatorsUpdate", ActiveValidator::from_object)?,
            certificate_threshold: object.get_u64("certificateThreshold")?,
            inbox_update: InboxUpdate::from_object(object.get_object("inboxUpdate")?)?,
        })
    }
}

static REGISTRATION_PARAMS_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/ccCommand/registration")
            .string("name", 1)
            .max_length(MAX_CHAIN_NAME_LENGTH)
            .bytes("messageFeeTokenID", 2)
            .exact_length(TOKEN_ID_LENGTH),
    )
});

/// Parameters of the `registration` cross-chain command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationCcmParams {
    /// Name under which the receiving chain was registered.
    pub name: String,
    /// Message fee token of the channel.
    pub message_fee_token_id: Vec<u8>,
}

impl SchemaObject for RegistrationCcmParams {
    fn schema() -> &'static Schema {
        &REGISTRATION_PARAMS_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with("name", self.name.as_str())
            .with("messageFeeTokenID", self.message_fee_token_id.clone())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            name: object.get_str("name")?.to_string(),
            message_fee_token_id: object.get_bytes("messageFeeTokenID")?.to_vec(),
        })
    }
}

static SIDECHAIN_TERMINATED_PARAMS_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/modules/interoperability/ccCommand/sidechainTerminated")
            .bytes("chainID", 1)
            .exact_length(CHAIN_ID_LENGTH)
            .bytes("stateRoot", 2)
            .exact_length(HASH_LENGTH),
    )
});

/// Parameters of the `sidechainTerminated` cross-chain command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidechainTerminatedCcmParams {
    /// The terminated chain.
    pub chain_id: ChainId,
    /// Its last certified state root.
    pub state_root: Vec<u8>,
}

impl SchemaObject for SidechainTerminatedCcmParams {
    fn schema() -> &'static Schema {
        &SIDECHAIN_TERMINATED_PARAMS_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with("chainID", self.chain_id.as_bytes())
            .with("stateRoot", self.state_root.clone())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            chain_id: chain_id(object, "chainID")?,
            state_root: object.get_bytes("stateRoot")?.to_vec(),
        })
    }
}
