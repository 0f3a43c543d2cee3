// Path: crates/consensus/src/bft/method.rs
//! The per-block BFT driver.

use crate::bft::params::{bft_module_prefix, BftParametersCache, BftParametersStore};
use crate::bft::votes::{
    get_bft_heights, insert_block_bft_info, update_active_validators_vote_info,
    update_max_height_certified, update_max_height_precommitted, update_max_height_prevoted,
    update_prevotes_precommits, BftHeights,
};
use meridian_api::state::{ModuleStore, StateAccess};
use meridian_types::app::{BftParameters, BftVotes, BlockHeader};
use meridian_types::config::BftConfig;
use meridian_types::error::BftError;
use meridian_types::keys::{EMPTY_KEY, STORE_PREFIX_BFT_VOTES};

/// Loads the BFT votes, applies each new block to them and stores them back.
#[derive(Debug)]
pub struct BftMethod {
    config: BftConfig,
    votes: ModuleStore<BftVotes>,
    params: BftParametersCache,
}

impl BftMethod {
    /// Creates the driver for `config`.
    pub fn new(config: BftConfig) -> Self {
        let params = BftParametersCache::new(BftParametersStore::new(), config.params_cache_capacity);
        Self {
            config,
            votes: ModuleStore::new(bft_module_prefix(), STORE_PREFIX_BFT_VOTES),
            params,
        }
    }

    /// Writes the initial votes: every max height starts at the genesis height.
    pub fn init_genesis_state<S: StateAccess + ?Sized>(
        &mut self,
        state: &mut S,
        genesis_height: u32,
    ) -> Result<(), BftError> {
        let votes = BftVotes {
            max_height_prevoted: genesis_height,
            max_height_precommitted: genesis_height,
            max_height_certified: genesis_height,
            ..BftVotes::default()
        };
        self.votes.set(state, EMPTY_KEY, &votes)?;
        Ok(())
    }

    /// The stored votes.
    pub fn get_votes<S: StateAccess + ?Sized>(&self, state: &S) -> Result<BftVotes, BftError> {
        Ok(self.votes.get(state, EMPTY_KEY)?)
    }

    /// The three finality heights.
    pub fn get_bft_heights<S: StateAccess + ?Sized>(&self, state: &S) -> Result<BftHeights, BftError> {
        Ok(get_bft_heights(&self.get_votes(state)?))
    }

    /// The parameters in force at `height`.
    pub fn get_bft_parameters<S: StateAccess + ?Sized>(
        &mut self,
        state: &S,
        height: u32,
    ) -> Result<BftParameters, BftError> {
        self.params.get_parameters(state, height)
    }

    /// Stores `params` as applying from `from_height` and starts tracking the
    /// votes of validators that join with them.
    pub fn set_bft_parameters<S: StateAccess + ?Sized>(
        &mut self,
        state: &mut S,
        from_height: u32,
        params: &BftParameters,
    ) -> Result<(), BftError> {
        self.params.store().set(state, from_height, params)?;
        self.params.invalidate_from(from_height);

        let mut votes = self.get_votes(&*state)?;
        update_active_validators_vote_info(&mut votes, &params.validators, from_height);
        self.votes.set(state, EMPTY_KEY, &votes)?;
        tracing::info!(
            target: "bft",
            from_height,
            validators = params.validators.len(),
            "BFT parameters updated"
        );
        Ok(())
    }

    /// Applies the votes implied by `header`, which must extend the tracked window.
    pub fn before_transactions_execute<S: StateAccess + ?Sized>(
        &mut self,
        state: &mut S,
        header: &BlockHeader,
    ) -> Result<BftHeights, BftError> {
        let mut votes = self.get_votes(&*state)?;
        if let Some(newest) = votes.block_bft_infos.first() {
            if header.height <= newest.height {
                return Err(BftError::InvalidHeight {
                    expected: newest.height,
                    got: header.height,
                });
            }
        }

        insert_block_bft_info(&mut votes, header, self.config.max_window_size);
        update_prevotes_precommits(&mut votes, &mut self.params, &*state)?;
        update_max_height_prevoted(&mut votes, &mut self.params, &*state)?;
        update_max_height_precommitted(&mut votes, &mut self.params, &*state)?;
        update_max_height_certified(&mut votes, header);
        self.votes.set(state, EMPTY_KEY, &votes)?;

        let heights = get_bft_heights(&votes);
        tracing::debug!(
            target: "bft",
            height = header.height,
            max_height_prevoted = heights.max_height_prevoted,
            max_height_precommitted = heights.max_height_precommitted,
            max_height_certified = heights.max_height_certified,
            "applied block votes"
        );
        Ok(heights)
    }
}
