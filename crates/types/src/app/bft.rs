// Path: crates/types/src/app/bft.rs
//! BFT vote records and the parameters that weigh them.

use crate::codec::{compile_static, object_list, Object, Schema, SchemaObject};
use crate::error::CodecError;
use once_cell::sync::Lazy;
use std::sync::Arc;

static BLOCK_BFT_INFO_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/bft/blockBFTInfo")
            .uint32("height", 1)
            .bytes("generatorAddress", 2)
            .uint32("maxHeightGenerated", 3)
            .uint32("maxHeightPrevoted", 4)
            .uint64("prevoteWeight", 5)
            .uint64("precommitWeight", 6),
    )
});

static VOTE_INFO_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/bft/activeValidatorVoteInfo")
            .bytes("address", 1)
            .uint32("minActiveHeight", 2)
            .uint32("largestHeightPrecommit", 3),
    )
});

static BFT_VOTES_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/bft/votes")
            .uint32("maxHeightPrevoted", 1)
            .uint32("maxHeightPrecommitted", 2)
            .uint32("maxHeightCertified", 3)
            .array_of_objects("blockBFTInfos", 4, BLOCK_BFT_INFO_SCHEMA.clone())
            .array_of_objects("activeValidatorsVoteInfo", 5, VOTE_INFO_SCHEMA.clone()),
    )
});

static BFT_VALIDATOR_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/bft/validator")
            .bytes("address", 1)
            .exact_length(20)
            .uint64("bftWeight", 2)
            .bytes("blsKey", 3)
            .exact_length(48)
            .bytes("generatorKey", 4)
            .exact_length(32),
    )
});

static BFT_PARAMETERS_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/bft/parameters")
            .uint64("prevoteThreshold", 1)
            .uint64("precommitThreshold", 2)
            .uint64("certificateThreshold", 3)
            .array_of_objects("validators", 4, BFT_VALIDATOR_SCHEMA.clone())
            .bytes("validatorsHash", 5),
    )
});

/// Vote weights accumulated for one tracked block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockBftInfo {
    /// Height of the block.
    pub height: u32,
    /// Address of the block generator.
    pub generator_address: Vec<u8>,
    /// `maxHeightGenerated` copied from the header.
    pub max_height_generated: u32,
    /// `maxHeightPrevoted` copied from the header.
    pub max_height_prevoted: u32,
    /// Accumulated prevote weight.
    pub prevote_weight: u64,
    /// Accumulated precommit weight.
    pub precommit_weight: u64,
}

impl BlockBftInfo {
    fn to_object(&self) -> Object {
        Object::new()
            .with("height", self.height)
            .with("generatorAddress", self.generator_address.clone())
            .with("maxHeightGenerated", self.max_height_generated)
            .with("maxHeightPrevoted", self.max_height_prevoted)
            .with("prevoteWeight", self.prevote_weight)
            .with("precommitWeight", self.precommit_weight)
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            height: object.get_u32("height")?,
            generator_address: object.get_bytes("generatorAddress")?.to_vec(),
            max_height_generated: object.get_u32("maxHeightGenerated")?,
            max_height_prevoted: object.get_u32("maxHeightPrevoted")?,
            prevote_weight: object.get_u64("prevoteWeight")?,
            precommit_weight: object.get_u64("precommitWeight")?,
        })
    }
}

/// Voting progress of one active validator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveValidatorVoteInfo {
    /// Validator address.
    pub address: Vec<u8>,
    /// First height at which the validator's votes count.
    pub min_active_height: u32,
    /// Greatest height the validator has precommitted.
    pub largest_height_precommit: u32,
}

impl ActiveValidatorVoteInfo {
    fn to_object(&self) -> Object {
        Object::new()
            .with("address", self.address.clone())
            .with("minActiveHeight", self.min_active_height)
            .with("largestHeightPrecommit", self.largest_height_precommit)
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            address: object.get_bytes("address")?.to_vec(),
            min_active_height: object.get_u32("minActiveHeight")?,
            largest_height_precommit: object.get_u32("largestHeightPrecommit")?,
        })
    }
}

/// The BFT vote state of the chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BftVotes {
    /// Greatest height with enough prevote weight.
    pub max_height_prevoted: u32,
    /// Greatest height with enough precommit weight.
    pub max_height_precommitted: u32,
    /// Greatest height certified by an aggregate commit.
    pub max_height_certified: u32,
    /// Tracked blocks, newest first.
    pub block_bft_infos: Vec<BlockBftInfo>,
    /// Voting progress of the active validators.
    pub active_validators_vote_info: Vec<ActiveValidatorVoteInfo>,
}

impl SchemaObject for BftVotes {
    fn schema() -> &'static Schema {
        &BFT_VOTES_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with("maxHeightPrevoted", self.max_height_prevoted)
            .with("maxHeightPrecommitted", self.max_height_precommitted)
            .with("maxHeightCertified", self.max_height_certified)
            .with(
                "blockBFTInfos",
                object_list(self.block_bft_infos.iter().map(BlockBftInfo::to_object)),
            )
            .with(
                "activeValidatorsVoteInfo",
                object_list(
                    self.active_validators_vote_info
                        .iter()
                        .map(ActiveValidatorVoteInfo::to_object),
                ),
            )
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            max_height_prevoted: object.get_u32("maxHeightPrevoted")?,
            max_height_precommitted: object.get_u32("maxHeightPrecommitted")?,
            max_height_certified: object.get_u32("maxHeightCertified")?,
            block_bft_infos: object.map_objects("blockBFTInfos", BlockBftInfo::from_object)?,
            active_validators_vote_info: object
                .map_objects("activeValidatorsVoteInfo", ActiveValidatorVoteInfo::from_object)?,
        })
    }
}

/// A validator entry of the BFT parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BftValidator {
    /// Validator address.
    pub address: Vec<u8>,
    /// Voting weight.
    pub bft_weight: u64,
    /// BLS public key used for certificate signatures.
    pub bls_key: Vec<u8>,
    /// Key used to sign blocks.
    pub generator_key: Vec<u8>,
}

impl BftValidator {
    fn to_object(&self) -> Object {
        Object::new()
            .with("address", self.address.clone())
            .with("bftWeight", self.bft_weight)
            .with("blsKey", self.bls_key.clone())
            .with("generatorKey", self.generator_key.clone())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            address: object.get_bytes("address")?.to_vec(),
            bft_weight: object.get_u64("bftWeight")?,
            bls_key: object.get_bytes("blsKey")?.to_vec(),
            generator_key: object.get_bytes("generatorKey")?.to_vec(),
        })
    }
}

/// Thresholds and validator weights in force from some height on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BftParameters {
    /// Prevote weight a block needs to count as prevoted.
    pub prevote_threshold: u64,
    /// Precommit weight a block needs to count as precommitted.
    pub precommit_threshold: u64,
    /// Aggregate weight a certificate needs.
    pub certificate_threshold: u64,
    /// The validator set.
    pub validators: Vec<BftValidator>,
    /// Hash of the validator set and certificate threshold.
    pub validators_hash: Vec<u8>,
}

impl BftParameters {
    /// Finds the validator with `address`.
    pub fn validator(&self, address: &[u8]) -> Option<&BftValidator> {
        self.validators.iter().find(|v| v.address == address)
    }
}

impl SchemaObject for BftParameters {
    fn schema() -> &'static Schema {
        &BFT_PARAMETERS_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with("prevoteThreshold", self.prevote_threshold)
            .with("precommitThreshold", self.precommit_threshold)
            .with("certificateThreshold", self.certificate_threshold)
            .with(
                "validators",
                object_list(self.validators.iter().map(BftValidator::to_object)),
            )
            .with("validatorsHash", self.validators_hash.clone())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            prevote_threshold: object.get_u64("prevoteThreshold")?,
            precommit_threshold: object.get_u64("precommitThreshold")?,
            certificate_threshold: object.get_u64("certificateThreshold")?,
            validators: object.map_objects("validators", BftValidator::from_object)?,
            validators_hash: object.get_bytes("validatorsHash")?.to_vec(),
        })
    }
}
