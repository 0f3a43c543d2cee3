// Path: crates/types/src/app/block.rs
//! Block headers as far as BFT vote tracking and certificates need them.

use crate::codec::{compile_static, Object, Schema, SchemaObject};
use crate::error::CodecError;
use once_cell::sync::Lazy;
use std::sync::Arc;

static AGGREGATE_COMMIT_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/block/header/aggregateCommit")
            .uint32("height", 1)
            .bytes("aggregationBits", 2)
            .bytes("certificateSignature", 3),
    )
});

fn header_builder(id: &str) -> crate::codec::SchemaBuilder {
    Schema::builder(id)
        .uint32("version", 1)
        .uint32("timestamp", 2)
        .uint32("height", 3)
        .bytes("previousBlockID", 4)
        .bytes("generatorAddress", 5)
        .bytes("transactionRoot", 6)
        .bytes("assetRoot", 7)
        .bytes("eventRoot", 8)
        .bytes("stateRoot", 9)
        .uint32("maxHeightPrevoted", 10)
        .uint32("maxHeightGenerated", 11)
        .boolean("impliesMaxPrevotes", 12)
        .bytes("validatorsHash", 13)
        .object("aggregateCommit", 14, AGGREGATE_COMMIT_SCHEMA.clone())
}

static BLOCK_HEADER_SCHEMA: Lazy<Arc<Schema>> =
    Lazy::new(|| compile_static(header_builder("/block/header").bytes("signature", 15)));

static UNSIGNED_BLOCK_HEADER_SCHEMA: Lazy<Arc<Schema>> =
    Lazy::new(|| compile_static(header_builder("/block/header/unsigned")));

/// The aggregate signature of validators on an earlier height, carried by a header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateCommit {
    /// The certified height.
    pub height: u32,
    /// Bitmap of the validators whose signatures are aggregated.
    pub aggregation_bits: Vec<u8>,
    /// The aggregate BLS signature.
    pub certificate_signature: Vec<u8>,
}

impl AggregateCommit {
    /// An aggregate commit is empty unless it carries both a bitmap and a signature.
    pub fn is_empty(&self) -> bool {
        self.aggregation_bits.is_empty() || self.certificate_signature.is_empty()
    }
}

impl SchemaObject for AggregateCommit {
    fn schema() -> &'static Schema {
        &AGGREGATE_COMMIT_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with("height", self.height)
            .with("aggregationBits", self.aggregation_bits.clone())
            .with("certificateSignature", self.certificate_signature.clone())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            height: object.get_u32("height")?,
            aggregation_bits: object.get_bytes("aggregationBits")?.to_vec(),
            certificate_signature: object.get_bytes("certificateSignature")?.to_vec(),
        })
    }
}

/// A block header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockHeader {
    /// Header format version.
    pub version: u32,
    /// Unix timestamp in seconds.
    pub timestamp: u32,
    /// Block height.
    pub height: u32,
    /// ID of the parent block.
    pub previous_block_id: Vec<u8>,
    /// Address of the validator that produced the block.
    pub generator_address: Vec<u8>,
    /// Merkle root of the included transactions.
    pub transaction_root: Vec<u8>,
    /// Merkle root of the block assets.
    pub asset_root: Vec<u8>,
    /// Merkle root of the emitted events.
    pub event_root: Vec<u8>,
    /// State root after applying the block.
    pub state_root: Vec<u8>,
    /// Greatest height the generator saw prevoted when producing the block.
    pub max_height_prevoted: u32,
    /// Greatest height the generator produced a block at before this one.
    pub max_height_generated: u32,
    /// Whether the block implies prevotes up to `max_height_prevoted`.
    pub implies_max_prevotes: bool,
    /// Hash of the validator set for the next height.
    pub validators_hash: Vec<u8>,
    /// Aggregate signature on an earlier height.
    pub aggregate_commit: AggregateCommit,
    /// Generator signature over [`BlockHeader::signing_bytes`].
    pub signature: Vec<u8>,
}

impl BlockHeader {
    fn unsigned_object(&self) -> Object {
        Object::new()
            .with("version", self.version)
            .with("timestamp", self.timestamp)
            .with("height", self.height)
            .with("previousBlockID", self.previous_block_id.clone())
            .with("generatorAddress", self.generator_address.clone())
            .with("transactionRoot", self.transaction_root.clone())
            .with("assetRoot", self.asset_root.clone())
            .with("eventRoot", self.event_root.clone())
            .with("stateRoot", self.state_root.clone())
            .with("maxHeightPrevoted", self.max_height_prevoted)
            .with("maxHeightGenerated", self.max_height_generated)
            .with("impliesMaxPrevotes", self.implies_max_prevotes)
            .with("validatorsHash", self.validators_hash.clone())
            .with("aggregateCommit", self.aggregate_commit.to_object())
    }

    /// The bytes the generator signs: the header without its signature.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, CodecError> {
        crate::codec::encode(&UNSIGNED_BLOCK_HEADER_SCHEMA, &self.unsigned_object())
    }
}

impl SchemaObject for BlockHeader {
    fn schema() -> &'static Schema {
        &BLOCK_HEADER_SCHEMA
    }

    fn to_object(&self) -> Object {
        self.unsigned_object()
            .with("signature", self.signature.clone())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            version: object.get_u32("version")?,
            timestamp: object.get_u32("timestamp")?,
            height: object.get_u32("height")?,
            previous_block_id: object.get_bytes("previousBlockID")?.to_vec(),
            generator_address: object.get_bytes("generatorAddress")?.to_vec(),
            transaction_root: object.get_bytes("transactionRoot")?.to_vec(),
            asset_root: object.get_bytes("assetRoot")?.to_vec(),
            event_root: object.get_bytes("eventRoot")?.to_vec(),
            state_root: object.get_bytes("stateRoot")?.to_vec(),
            max_height_prevoted: object.get_u32("maxHeightPrevoted")?,
            max_height_generated: object.get_u32("maxHeightGenerated")?,
            implies_max_prevotes: object.get_bool("impliesMaxPrevotes")?,
            validators_hash: object.get_bytes("validatorsHash")?.to_vec(),
            aggregate_commit: AggregateCommit::from_object(object.get_object("aggregateCommit")?)?,
            signature: object.get_bytes("signature")?.to_vec(),
        })
    }
}
