// Path: crates/consensus/src/bft/votes.rs
//! Vote tracking over the window of recent blocks.
//!
//! Every new block implies a prevote by its generator for the blocks above the
//! generator's previous block, and a precommit for the prevoted blocks above the
//! generator's last precommit. A block is prevoted (precommitted) once the weight
//! of such votes reaches the threshold of the parameters at its height.

use crate::bft::params::BftParametersCache;
use meridian_api::state::StateAccess;
use meridian_types::app::{BftValidator, BftVotes, BlockBftInfo, BlockHeader};
use meridian_types::error::BftError;

/// The three heights summarising finality progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BftHeights {
    /// Greatest prevoted height.
    pub max_height_prevoted: u32,
    /// Greatest precommitted height.
    pub max_height_precommitted: u32,
    /// Greatest height certified by an aggregate commit.
    pub max_height_certified: u32,
}

/// The summary of `votes`.
pub fn get_bft_heights(votes: &BftVotes) -> BftHeights {
    BftHeights {
        max_height_prevoted: votes.max_height_prevoted,
        max_height_precommitted: votes.max_height_precommitted,
        max_height_certified: votes.max_height_certified,
    }
}

/// Records `header` as the newest tracked block, keeping at most `max_length` blocks.
pub fn insert_block_bft_info(votes: &mut BftVotes, header: &BlockHeader, max_length: usize) {
    votes.block_bft_infos.insert(
        0,
        BlockBftInfo {
            height: header.height,
            generator_address: header.generator_address.clone(),
            max_height_generated: header.max_height_generated,
            max_height_prevoted: header.max_height_prevoted,
            prevote_weight: 0,
            precommit_weight: 0,
        },
    );
    votes.block_bft_infos.truncate(max_length);
}

/// The greatest height the generator of the newest block has not prevoted.
///
/// Follows the chain of blocks the generator produced, each pointing at the
/// previous one through `maxHeightGenerated`, for as long as it stays within the
/// window and is consistent.
pub fn get_height_not_prevoted(votes: &BftVotes) -> u32 {
    let (Some(newest), Some(oldest)) = (votes.block_bft_infos.first(), votes.block_bft_infos.last())
    else {
        return 0;
    };
    let current_height = newest.height;
    let mut previous_height = newest.max_height_generated;

    while let Some(offset) = current_height.checked_sub(previous_height) {
        let Some(info) = votes.block_bft_infos.get(offset as usize) else {
            break;
        };
        if info.generator_address != newest.generator_address
            || info.max_height_generated >= previous_height
        {
            return previous_height;
        }
        previous_height = info.max_height_generated;
    }
    oldest.height.saturating_sub(1)
}

fn generator_in<'a>(
    validators: &'a [BftValidator],
    address: &[u8],
    height: u32,
) -> Result<&'a BftValidator, BftError> {
    validators
        .iter()
        .find(|v| v.address == address)
        .ok_or_else(|| BftError::ValidatorNotFound {
            address: hex::encode(address),
            height,
        })
}

/// Adds the prevotes and precommits implied by the newest block.
pub fn update_prevotes_precommits<S: StateAccess + ?Sized>(
    votes: &mut BftVotes,
    params: &mut BftParametersCache,
    state: &S,
) -> Result<(), BftError> {
    let height_not_prevoted = get_height_not_prevoted(votes);
    let Some(newest) = votes.block_bft_infos.first() else {
        return Ok(());
    };
    let generator = newest.generator_address.clone();
    let max_height_generated = newest.max_height_generated;

    let Some(vote_info) = votes
        .active_validators_vote_info
        .iter_mut()
        .find(|info| info.address == generator)
    else {
        tracing::debug!(
            target: "bft",
            generator = %hex::encode(&generator),
            "generator is not an active validator"
        );
        return Ok(());
    };

    let min_precommit_height = vote_info
        .min_active_height
        .max(height_not_prevoted.saturating_add(1))
        .max(vote_info.largest_height_precommit.saturating_add(1));
    let mut has_precommitted = false;
    for info in votes.block_bft_infos.iter_mut() {
        if info.height < min_precommit_height {
            break;
        }
        let at_height = params.get_parameters(state, info.height)?;
        if info.prevote_weight >= at_height.prevote_threshold {
            let validator = generator_in(&at_height.validators, &generator, info.height)?;
            info.precommit_weight = info.precommit_weight.saturating_add(validator.bft_weight);
            if !has_precommitted {
                vote_info.largest_height_precommit = info.height;
                has_precommitted = true;
            }
        }
    }

    let min_prevote_height = max_height_generated
        .saturating_add(1)
        .max(vote_info.min_active_height);
    for info in votes.block_bft_infos.iter_mut() {
        if info.height < min_prevote_height {
            break;
        }
        let at_height = params.get_parameters(state, info.height)?;
        let validator = generator_in(&at_height.validators, &generator, info.height)?;
        info.prevote_weight = info.prevote_weight.saturating_add(validator.bft_weight);
    }
    Ok(())
}

/// Raises `maxHeightPrevoted` to the newest block whose prevotes reach its threshold.
pub fn update_max_height_prevoted<S: StateAccess + ?Sized>(
    votes: &mut BftVotes,
    params: &mut BftParametersCache,
    state: &S,
) -> Result<(), BftError> {
    for info in &votes.block_bft_infos {
        let at_height = params.get_parameters(state, info.height)?;
        if info.prevote_weight >= at_height.prevote_threshold {
            if info.height > votes.max_height_prevoted {
                votes.max_height_prevoted = info.height;
            }
            return Ok(());
        }
    }
    Ok(())
}

/// Raises `maxHeightPrecommitted` to the newest block whose precommits reach its threshold.
pub fn update_max_height_precommitted<S: StateAccess + ?Sized>(
    votes: &mut BftVotes,
    params: &mut BftParametersCache,
    state: &S,
) -> Result<(), BftError> {
    for info in &votes.block_bft_infos {
        let at_height = params.get_parameters(state, info.height)?;
        if info.precommit_weight >= at_height.precommit_threshold {
            if info.height > votes.max_height_precommitted {
                votes.max_height_precommitted = info.height;
            }
            return Ok(());
        }
    }
    Ok(())
}

/// Takes `maxHeightCertified` from a non-empty aggregate commit.
pub fn update_max_height_certified(votes: &mut BftVotes, header: &BlockHeader) {
    if header.aggregate_commit.is_empty() {
        return;
    }
    votes.max_height_certified = header.aggregate_commit.height;
}

/// Aligns the vote info with a validator set taking effect at `from_height`.
///
/// Validators with zero weight do not vote. Validators already tracked keep
/// their progress; new ones start voting at `from_height`.
pub fn update_active_validators_vote_info(
    votes: &mut BftVotes,
    validators: &[BftValidator],
    from_height: u32,
) {
    let previous = std::mem::take(&mut votes.active_validators_vote_info);
    votes.active_validators_vote_info = validators
        .iter()
        .filter(|v| v.bft_weight > 0)
        .map(|v| {
            previous
                .iter()
                .find(|info| info.address == v.address)
                .cloned()
                .unwrap_or_else(|| meridian_types::app::ActiveValidatorVoteInfo {
                    address: v.address.clone(),
                    min_active_height: from_height,
                    largest_height_precommit: from_height.saturating_sub(1),
                })
        })
        .collect();
}
