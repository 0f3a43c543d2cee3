// Path: crates/consensus/src/bft/tests/mod.rs

use super::votes::*;
use super::*;
use meridian_state::prelude::InMemoryState;
use meridian_types::app::{
    ActiveValidatorVoteInfo, AggregateCommit, BftParameters, BftValidator, BftVotes, BlockBftInfo,
    BlockHeader,
};
use meridian_types::config::BftConfig;
use meridian_types::error::{BftError, StateError};
use proptest::prelude::*;

fn account(i: u8) -> Vec<u8> {
    vec![i; 20]
}

fn info(generator: u8, height: u32, mhg: u32, mhp: u32, precommit: u64, prevote: u64) -> BlockBftInfo {
    BlockBftInfo {
        height,
        generator_address: account(generator),
        max_height_generated: mhg,
        max_height_prevoted: mhp,
        prevote_weight: prevote,
        precommit_weight: precommit,
    }
}

fn vote_info(i: u8, min_active_height: u32, largest_height_precommit: u32) -> ActiveValidatorVoteInfo {
    ActiveValidatorVoteInfo {
        address: account(i),
        min_active_height,
        largest_height_precommit,
    }
}

fn fixture_votes() -> BftVotes {
    BftVotes {
        max_height_prevoted: 103,
        max_height_precommitted: 56,
        max_height_certified: 5,
        block_bft_infos: vec![
            info(0, 151, 148, 148, 64, 65),
            info(1, 150, 101, 104, 64, 65),
            info(2, 149, 149, 104, 64, 68),
            info(0, 148, 101, 104, 67, 68),
        ],
        active_validators_vote_info: vec![vote_info(0, 0, 140), vote_info(1, 101, 0), vote_info(2, 149, 0)],
    }
}

fn header(generator: Vec<u8>, height: u32, max_height_generated: u32) -> BlockHeader {
    BlockHeader {
        height,
        generator_address: generator,
        max_height_generated,
        ..BlockHeader::default()
    }
}

fn validator(i: u8, bft_weight: u64) -> BftValidator {
    BftValidator {
        address: account(i),
        bft_weight,
        bls_key: vec![i; 48],
        generator_key: vec![i; 32],
    }
}

fn params(prevote_threshold: u64, precommit_threshold: u64, weights: &[u64]) -> BftParameters {
    BftParameters {
        prevote_threshold,
        precommit_threshold,
        certificate_threshold: 68,
        validators: weights
            .iter()
            .enumerate()
            .map(|(i, w)| validator(i as u8, *w))
            .collect(),
        validators_hash: vec![7; 32],
    }
}

fn cache_with(at_101: BftParameters) -> (InMemoryState, BftParametersCache) {
    let mut state = InMemoryState::new();
    let store = BftParametersStore::new();
    store.set(&mut state, 101, &at_101).unwrap();
    (state, BftParametersCache::new(store, 16))
}

#[test]
fn test_insert_keeps_newest_first_within_window() {
    for (window, expected) in [(5, 5), (3, 3), (10, 5)] {
        let mut votes = fixture_votes();
        insert_block_bft_info(&mut votes, &header(account(1), 152, 150), window);
        assert_eq!(votes.block_bft_infos.len(), expected);
        assert_eq!(votes.block_bft_infos[0].height, 152);
        assert_eq!(votes.block_bft_infos[0].prevote_weight, 0);
    }
}

#[test]
fn test_height_not_prevoted() {
    // The block at maxHeightGenerated has a different generator.
    let mut votes = fixture_votes();
    insert_block_bft_info(&mut votes, &header(vec![9; 20], 152, 149), 5);
    assert_eq!(get_height_not_prevoted(&votes), 149);

    // The earlier block of the same generator does not point further back.
    let mut votes = fixture_votes();
    insert_block_bft_info(&mut votes, &header(account(2), 152, 149), 5);
    assert_eq!(get_height_not_prevoted(&votes), 149);

    // The generator's chain of blocks leaves the window.
    let mut votes = fixture_votes();
    insert_block_bft_info(&mut votes, &header(account(0), 152, 151), 5);
    assert_eq!(get_height_not_prevoted(&votes), 147);

    assert_eq!(get_height_not_prevoted(&BftVotes::default()), 0);
}

#[test]
fn test_empty_window_does_not_read_parameters() {
    // No parameters are stored, so any lookup would fail.
    let state = InMemoryState::new();
    let mut cache = BftParametersCache::new(BftParametersStore::new(), 4);
    let mut votes = BftVotes {
        block_bft_infos: vec![],
        ..fixture_votes()
    };
    update_prevotes_precommits(&mut votes, &mut cache, &state).unwrap();
    assert!(cache.is_empty());
}

#[test]
fn test_inactive_generator_casts_no_votes() {
    let state = InMemoryState::new();
    let mut cache = BftParametersCache::new(BftParametersStore::new(), 4);
    let mut votes = fixture_votes();
    insert_block_bft_info(&mut votes, &header(vec![9; 20], 152, 151), 5);
    let before = votes.clone();
    update_prevotes_precommits(&mut votes, &mut cache, &state).unwrap();
    assert_eq!(votes, before);
    assert!(cache.is_empty());
}

#[test]
fn test_precommits_above_largest_precommit() {
    let (state, mut cache) = cache_with(params(68, 68, &[1, 0, 1]));
    let mut votes = fixture_votes();
    insert_block_bft_info(&mut votes, &header(account(0), 152, 151), 5);
    update_prevotes_precommits(&mut votes, &mut cache, &state).unwrap();

    let at = |h: u32| votes.block_bft_infos.iter().find(|b| b.height == h).unwrap().clone();
    assert_eq!(at(149).precommit_weight, 65);
    // Already prevoted by this generator.
    assert_eq!(at(149).prevote_weight, 68);
    assert_eq!(at(152).prevote_weight, 1);

    let largest: Vec<u32> = votes
        .active_validators_vote_info
        .iter()
        .map(|v| v.largest_height_precommit)
        .collect();
    assert_eq!(largest, vec![149, 0, 0]);
}

#[test]
fn test_prevotes_start_at_min_active_height() {
    let (state, mut cache) = cache_with(params(68, 68, &[1, 0, 1]));
    let mut votes = fixture_votes();
    insert_block_bft_info(&mut votes, &header(account(2), 152, 0), 5);
    update_prevotes_precommits(&mut votes, &mut cache, &state).unwrap();

    let at = |h: u32| votes.block_bft_infos.iter().find(|b| b.height == h).unwrap().clone();
    assert_eq!(at(148).prevote_weight, 68);
    assert_eq!(at(149).prevote_weight, 69);
}

#[test]
fn test_missing_generator_in_parameters_is_an_error() {
    let (state, mut cache) = cache_with(params(68, 68, &[1]));
    let mut votes = fixture_votes();
    insert_block_bft_info(&mut votes, &header(account(2), 152, 0), 5);
    assert!(matches!(
        update_prevotes_precommits(&mut votes, &mut cache, &state),
        Err(BftError::ValidatorNotFound { height: 149, .. })
    ));
}

#[test]
fn test_max_height_prevoted() {
    let (state, mut cache) = cache_with(params(68, 68, &[1, 0, 1]));
    let mut votes = fixture_votes();
    update_max_height_prevoted(&mut votes, &mut cache, &state).unwrap();
    assert_eq!(votes.max_height_prevoted, 149);

    let (state, mut cache) = cache_with(params(103, 68, &[1, 0, 1]));
    let mut votes = fixture_votes();
    update_max_height_prevoted(&mut votes, &mut cache, &state).unwrap();
    assert_eq!(votes.max_height_prevoted, 103);

    // Block 149 reaches the threshold but lies below the current value.
    let (state, mut cache) = cache_with(params(68, 68, &[1, 0, 1]));
    let mut votes = BftVotes {
        max_height_prevoted: 160,
        ..fixture_votes()
    };
    update_max_height_prevoted(&mut votes, &mut cache, &state).unwrap();
    assert_eq!(votes.max_height_prevoted, 160);
}

#[test]
fn test_max_height_precommitted() {
    let (state, mut cache) = cache_with(params(68, 67, &[1, 0, 1]));
    let mut votes = fixture_votes();
    update_max_height_precommitted(&mut votes, &mut cache, &state).unwrap();
    assert_eq!(votes.max_height_precommitted, 148);

    let (state, mut cache) = cache_with(params(68, 103, &[1, 0, 1]));
    let mut votes = fixture_votes();
    update_max_height_precommitted(&mut votes, &mut cache, &state).unwrap();
    assert_eq!(votes.max_height_precommitted, 56);

    let (state, mut cache) = cache_with(params(68, 67, &[1, 0, 1]));
    let mut votes = BftVotes {
        max_height_precommitted: 160,
        ..fixture_votes()
    };
    update_max_height_precommitted(&mut votes, &mut cache, &state).unwrap();
    assert_eq!(votes.max_height_precommitted, 160);
}

#[test]
fn test_max_height_certified_needs_full_aggregate_commit() {
    let mut votes = fixture_votes();
    let mut block = header(account(0), 152, 0);
    block.aggregate_commit = AggregateCommit {
        height: 10,
        aggregation_bits: vec![],
        certificate_signature: vec![],
    };
    update_max_height_certified(&mut votes, &block);
    assert_eq!(votes.max_height_certified, 5);

    block.aggregate_commit.aggregation_bits = vec![0x03];
    block.aggregate_commit.certificate_signature = vec![1; 96];
    update_max_height_certified(&mut votes, &block);
    assert_eq!(votes.max_height_certified, 10);
}

#[test]
fn test_parameters_in_force_at_height() {
    let mut state = InMemoryState::new();
    let store = BftParametersStore::new();
    store.set(&mut state, 10, &params(1, 1, &[1])).unwrap();
    store.set(&mut state, 20, &params(2, 2, &[1])).unwrap();

    assert_eq!(store.get(&state, 10).unwrap().prevote_threshold, 1);
    assert_eq!(store.get(&state, 19).unwrap().prevote_threshold, 1);
    assert_eq!(store.get(&state, 20).unwrap().prevote_threshold, 2);
    assert_eq!(store.get(&state, u32::MAX).unwrap().prevote_threshold, 2);
    assert!(matches!(store.get(&state, 9), Err(StateError::NotFound(_))));

    assert!(store.exists(&state, 20).unwrap());
    assert!(!store.exists(&state, 21).unwrap());
    assert_eq!(store.delete_before(&mut state, 25).unwrap(), 1);
    assert!(store.get(&state, 15).is_err());
    assert_eq!(store.get(&state, 25).unwrap().prevote_threshold, 2);
}

#[test]
fn test_cache_is_invalidated_by_new_parameters() {
    let mut state = InMemoryState::new();
    let store = BftParametersStore::new();
    store.set(&mut state, 20, &params(2, 2, &[1])).unwrap();
    let mut cache = BftParametersCache::new(store.clone(), 8);

    assert_eq!(cache.get_parameters(&state, 25).unwrap().prevote_threshold, 2);
    assert_eq!(cache.get_parameters(&state, 21).unwrap().prevote_threshold, 2);
    store.set(&mut state, 22, &params(3, 3, &[1])).unwrap();
    // Still memoized.
    assert_eq!(cache.get_parameters(&state, 25).unwrap().prevote_threshold, 2);

    cache.invalidate_from(22);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get_parameters(&state, 25).unwrap().prevote_threshold, 3);
    assert_eq!(cache.get_parameters(&state, 21).unwrap().prevote_threshold, 2);
}

#[test]
fn test_method_finalizes_blocks() {
    let mut state = InMemoryState::new();
    let mut bft = BftMethod::new(BftConfig::default());
    bft.init_genesis_state(&mut state, 0).unwrap();
    bft.set_bft_parameters(&mut state, 1, &params(2, 2, &[1, 1, 1])).unwrap();

    let votes = bft.get_votes(&state).unwrap();
    assert_eq!(votes.active_validators_vote_info.len(), 3);
    assert_eq!(votes.active_validators_vote_info[0].min_active_height, 1);

    let blocks = [(0, 1, 0), (1, 2, 0), (2, 3, 0), (0, 4, 1)];
    let mut heights = BftHeights::default();
    for (generator, height, mhg) in blocks {
        heights = bft
            .before_transactions_execute(&mut state, &header(account(generator), height, mhg))
            .unwrap();
    }
    assert_eq!(heights.max_height_prevoted, 3);
    assert_eq!(heights.max_height_precommitted, 1);
    assert_eq!(bft.get_bft_heights(&state).unwrap(), heights);

    let mut block = header(account(1), 5, 2);
    block.aggregate_commit = AggregateCommit {
        height: 1,
        aggregation_bits: vec![0x07],
        certificate_signature: vec![1; 96],
    };
    assert_eq!(
        bft.before_transactions_execute(&mut state, &block)
            .unwrap()
            .max_height_certified,
        1
    );

    assert!(matches!(
        bft.before_transactions_execute(&mut state, &header(account(2), 5, 3)),
        Err(BftError::InvalidHeight { expected: 5, got: 5 })
    ));
}

#[test]
fn test_zero_weight_validators_do_not_vote() {
    let mut votes = BftVotes {
        active_validators_vote_info: vec![vote_info(1, 3, 40)],
        ..BftVotes::default()
    };
    let validators = [validator(0, 1), validator(1, 1), validator(2, 0)];
    update_active_validators_vote_info(&mut votes, &validators, 50);
    assert_eq!(
        votes.active_validators_vote_info,
        vec![vote_info(0, 50, 49), vote_info(1, 3, 40)]
    );
}

/// Inserts the block at `height` with the given weights and refreshes both
/// max heights, returning the values they had before.
fn insert_and_update(
    votes: &mut BftVotes,
    cache: &mut BftParametersCache,
    state: &InMemoryState,
    height: u32,
    (prevote, precommit): (u64, u64),
) -> (u32, u32) {
    let before = (votes.max_height_prevoted, votes.max_height_precommitted);
    insert_block_bft_info(votes, &header(account(0), height, 0), 5);
    votes.block_bft_infos[0].prevote_weight = prevote;
    votes.block_bft_infos[0].precommit_weight = precommit;
    update_max_height_prevoted(votes, cache, state).unwrap();
    update_max_height_precommitted(votes, cache, state).unwrap();
    before
}

proptest! {
    #[test]
    fn max_heights_never_decrease(
        weights in prop::collection::vec((0u64..100, 0u64..100), 1..30),
        threshold in 1u64..100,
        head_start in 0u32..20,
    ) {
        let mut state = InMemoryState::new();
        let store = BftParametersStore::new();
        store.set(&mut state, 0, &params(threshold, threshold, &[1])).unwrap();
        let mut cache = BftParametersCache::new(store, 8);

        let above = weights.len() as u32 + 1 + head_start;
        let mut ahead = BftVotes {
            max_height_prevoted: above,
            max_height_precommitted: above,
            ..BftVotes::default()
        };
        let mut fresh = BftVotes::default();

        for (height, block_weights) in (1u32..).zip(weights.iter().copied()) {
            let (prevoted, precommitted) =
                insert_and_update(&mut ahead, &mut cache, &state, height, block_weights);
            prop_assert_eq!(ahead.max_height_prevoted, prevoted);
            prop_assert_eq!(ahead.max_height_precommitted, precommitted);

            let (prevoted, precommitted) =
                insert_and_update(&mut fresh, &mut cache, &state, height, block_weights);
            prop_assert!(fresh.max_height_prevoted >= prevoted);
            prop_assert!(fresh.max_height_precommitted >= precommitted);
            if block_weights.0 >= threshold {
                prop_assert_eq!(fresh.max_height_prevoted, height);
            }
            if block_weights.1 >= threshold {
                prop_assert_eq!(fresh.max_height_precommitted, height);
            }
        }
        prop_assert_eq!(ahead.max_height_prevoted, above);
        prop_assert_eq!(ahead.max_height_precommitted, above);
    }

    #[test]
    fn window_never_exceeds_its_bound(count in 0u32..40, window in 1usize..12) {
        let mut votes = BftVotes::default();
        for height in 1..=count {
            insert_block_bft_info(&mut votes, &header(account(0), height, 0), window);
            prop_assert!(votes.block_bft_infos.len() <= window);
        }
        prop_assert_eq!(votes.block_bft_infos.len(), (count as usize).min(window));
        let heights: Vec<u32> = votes.block_bft_infos.iter().map(|b| b.height).collect();
        prop_assert!(heights.windows(2).all(|w| w[0] > w[1]));
    }
}
