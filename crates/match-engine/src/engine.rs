//! Match execution engine
//!
//! A `Match` drives turn-by-turn play between two borrowed players, decides
//! whether its record can come from (or go into) the deterministic cache,
//! and answers statistic queries over the stored record.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::action::{ActionRecord, Turn};
use crate::cache::{CacheKey, DeterministicCache, SharedCache};
use crate::error::{Error, Result};
use crate::game::{Game, Score};
use crate::interaction::{self, StateDistribution, Winner, DEFAULT_C_SYMBOL, DEFAULT_D_SYMBOL};
use crate::player::{is_stochastic, MatchContext, Player, PlayerId};
use crate::random::SeededRng;

/// Turns per match when none is configured
pub const DEFAULT_TURNS: usize = 200;

/// Configuration for a single match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub turns: usize,
    /// Probability in [0, 1] that a committed action is flipped
    pub noise: f64,
    /// Randomness seed for noise and stochastic strategies
    pub seed: [u8; 32],
    pub match_index: u32,
}

impl MatchConfig {
    /// Noiseless config with the default seed
    pub fn new(turns: usize) -> Self {
        Self { turns, noise: 0.0, seed: [0u8; 32], match_index: 0 }
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_seed(mut self, seed: [u8; 32], match_index: u32) -> Self {
        self.seed = seed;
        self.match_index = match_index;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.noise) {
            return Err(Error::InvalidNoise { noise: self.noise });
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TURNS)
    }
}

/// Match parameters advertised to players through `MatchContext`
#[derive(Clone, Debug, PartialEq)]
pub struct MatchAttributes {
    /// `None` hides the match length from strategies
    pub length: Option<usize>,
    pub game: Arc<Game>,
    pub noise: f64,
}

impl MatchAttributes {
    fn derived(turns: usize, game: &Arc<Game>, noise: f64) -> Self {
        Self { length: Some(turns), game: Arc::clone(game), noise }
    }
}

/// What the last `play()` did with the deterministic cache
#[derive(Clone, Debug, PartialEq)]
pub enum CacheEvent {
    /// `play()` has not been called
    NotPlayed,
    /// Stochastic match: cache neither read nor written
    Bypassed,
    /// Record served from the cache; players were not consulted
    Hit,
    /// Fresh simulation, record written to the cache
    Stored,
    /// Fresh simulation, cache not eligible for update (frozen)
    Miss,
    /// Cache could not be read; record came from a fresh simulation
    ReadFailed(Error),
    /// Fresh simulation succeeded but the record could not be stored
    WriteFailed(Error),
}

/// Serializable digest of a played match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub turns: usize,
    pub noise: f64,
    pub record: ActionRecord,
    pub final_score: (Score, Score),
    pub final_score_per_turn: Option<(Score, Score)>,
    pub winner: Winner,
    pub cooperation: (usize, usize),
    pub normalised_cooperation: Option<(f64, f64)>,
    pub state_distribution: StateDistribution<usize>,
}

/// One match between two players
pub struct Match<'p> {
    player_1: &'p mut dyn Player,
    player_2: &'p mut dyn Player,
    turns: usize,
    noise: f64,
    game: Arc<Game>,
    cache: SharedCache,
    attributes: MatchAttributes,
    attributes_overridden: bool,
    cache_key: CacheKey,
    rng: SeededRng,
    result: ActionRecord,
    cache_event: CacheEvent,
}

impl<'p> Match<'p> {
    /// Create a match with the default game and a fresh, private cache
    pub fn new(
        player_1: &'p mut dyn Player,
        player_2: &'p mut dyn Player,
        config: MatchConfig,
    ) -> Result<Self> {
        config.validate()?;

        let game = Arc::new(Game::default());
        let attributes = MatchAttributes::derived(config.turns, &game, config.noise);
        let cache_key = CacheKey::new(player_1.id(), player_2.id(), config.turns);

        debug!(
            player_1 = %player_1.id(),
            player_2 = %player_2.id(),
            turns = config.turns,
            noise = config.noise,
            "match created"
        );

        Ok(Self {
            player_1,
            player_2,
            turns: config.turns,
            noise: config.noise,
            game,
            cache: DeterministicCache::new().shared(),
            attributes,
            attributes_overridden: false,
            cache_key,
            rng: SeededRng::new(&config.seed, config.match_index),
            result: Vec::new(),
            cache_event: CacheEvent::NotPlayed,
        })
    }

    /// Score with a shared game. Derived attributes follow the new game.
    pub fn with_game(mut self, game: Arc<Game>) -> Self {
        if !self.attributes_overridden {
            self.attributes = MatchAttributes::derived(self.turns, &game, self.noise);
        }
        self.game = game;
        self
    }

    /// Read and write a cache shared with other matches
    pub fn with_cache(mut self, cache: SharedCache) -> Self {
        self.cache = cache;
        self
    }

    /// Advertise custom attributes to the players instead of the derived ones
    pub fn with_attributes(mut self, attributes: MatchAttributes) -> Self {
        self.attributes = attributes;
        self.attributes_overridden = true;
        self
    }

    pub fn players(&self) -> (&dyn Player, &dyn Player) {
        (&*self.player_1, &*self.player_2)
    }

    /// Swap in a new pairing. The cache key follows the new identities.
    pub fn set_players(&mut self, player_1: &'p mut dyn Player, player_2: &'p mut dyn Player) {
        self.cache_key = CacheKey::new(player_1.id(), player_2.id(), self.turns);
        self.player_1 = player_1;
        self.player_2 = player_2;
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn noise(&self) -> f64 {
        self.noise
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn attributes(&self) -> &MatchAttributes {
        &self.attributes
    }

    pub fn cache_key(&self) -> CacheKey {
        self.cache_key
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn cache_event(&self) -> &CacheEvent {
        &self.cache_event
    }

    /// Record from the last `play()`; empty before the first one
    pub fn result(&self) -> &[Turn] {
        &self.result
    }

    /// Noise, or either player being stochastic, makes the outcome unrepeatable
    pub fn is_stochastic(&self) -> bool {
        is_stochastic(&[&*self.player_1, &*self.player_2], self.noise)
    }

    /// Whether a freshly simulated record should be written to the cache
    ///
    /// Needs a noiseless match, deterministic players and a mutable cache.
    /// A poisoned cache lock counts as not eligible.
    pub fn cache_update_required(&self) -> bool {
        match self.cache.lock() {
            Ok(cache) => self.cache_update_allowed(&cache),
            Err(_) => false,
        }
    }

    fn cache_update_allowed(&self, cache: &DeterministicCache) -> bool {
        self.noise == 0.0 && cache.is_mutable() && !self.any_stochastic_player()
    }

    fn any_stochastic_player(&self) -> bool {
        self.player_1.classifier().stochastic || self.player_2.classifier().stochastic
    }

    /// Play the match and return its action record
    ///
    /// Deterministic matches whose key is already cached are served from the
    /// cache without consulting (or resetting) the players. Everything else
    /// is simulated afresh. Each call recomputes; nothing is appended.
    pub fn play(&mut self) -> &[Turn] {
        let lookup = if self.is_stochastic() { None } else { Some(self.lookup()) };

        let (record, event) = match lookup {
            Some(Ok(Some(record))) => {
                debug!(key = ?self.cache_key, "cache hit");
                (record, CacheEvent::Hit)
            }
            Some(Ok(None)) => {
                debug!(key = ?self.cache_key, "cache miss");
                let record = self.simulate();
                let event = self.store(&record);
                (record, event)
            }
            Some(Err(e)) => {
                warn!(key = ?self.cache_key, error = %e, "cache read failed, simulating");
                (self.simulate(), CacheEvent::ReadFailed(e))
            }
            None => {
                debug!(key = ?self.cache_key, noise = self.noise, "stochastic match, cache bypassed");
                (self.simulate(), CacheEvent::Bypassed)
            }
        };

        self.result = record;
        self.cache_event = event;
        &self.result
    }

    fn lookup(&self) -> Result<Option<ActionRecord>> {
        let cache = self.cache.lock().map_err(|_| Error::CachePoisoned)?;
        Ok(cache.get(&self.cache_key).cloned())
    }

    fn store(&self, record: &ActionRecord) -> CacheEvent {
        let mut cache = match self.cache.lock() {
            Ok(cache) => cache,
            Err(_) => {
                warn!(key = ?self.cache_key, "cache lock poisoned, record not stored");
                return CacheEvent::WriteFailed(Error::CachePoisoned);
            }
        };

        if !self.cache_update_allowed(&cache) {
            return CacheEvent::Miss;
        }

        match cache.insert(self.cache_key, record.clone()) {
            Ok(()) => {
                debug!(key = ?self.cache_key, turns = record.len(), "record cached");
                CacheEvent::Stored
            }
            Err(e) => {
                warn!(key = ?self.cache_key, error = %e, "cache write failed");
                CacheEvent::WriteFailed(e)
            }
        }
    }

    /// Reset both players and run every turn
    fn simulate(&mut self) -> ActionRecord {
        self.player_1.reset();
        self.player_2.reset();

        let mut rng = self.rng.split();
        let ctx = MatchContext {
            length: self.attributes.length,
            game: &self.attributes.game,
            noise: self.attributes.noise,
        };

        for _ in 0..self.turns {
            self.player_1.play(&mut *self.player_2, self.noise, &ctx, &mut rng);
        }

        self.player_1
            .history()
            .iter()
            .zip(self.player_2.history().iter())
            .collect()
    }

    /// Per-turn scores
    pub fn scores(&self) -> Vec<(Score, Score)> {
        interaction::compute_scores(&self.result, &self.game)
    }

    pub fn final_score(&self) -> (Score, Score) {
        interaction::compute_final_score(&self.result, &self.game)
    }

    /// Mean score per turn; `None` when nothing has been played
    pub fn final_score_per_turn(&self) -> Option<(Score, Score)> {
        interaction::compute_final_score_per_turn(&self.result, &self.game)
    }

    pub fn winner(&self) -> Winner {
        interaction::compute_winner_index(&self.result, &self.game)
    }

    /// Identity of the winning player, if there is one
    pub fn winner_id(&self) -> Option<PlayerId> {
        match self.winner() {
            Winner::Player(0) => Some(self.player_1.id()),
            Winner::Player(_) => Some(self.player_2.id()),
            Winner::Tie | Winner::NoData => None,
        }
    }

    pub fn cooperation(&self) -> (usize, usize) {
        interaction::compute_cooperations(&self.result)
    }

    pub fn normalised_cooperation(&self) -> Option<(f64, f64)> {
        interaction::compute_normalised_cooperation(&self.result)
    }

    pub fn state_distribution(&self) -> StateDistribution<usize> {
        interaction::compute_state_distribution(&self.result)
    }

    pub fn normalised_state_distribution(&self) -> Option<StateDistribution<f64>> {
        interaction::compute_normalised_state_distribution(&self.result)
    }

    pub fn sparklines(&self, c_symbol: char, d_symbol: char) -> String {
        interaction::compute_sparklines(&self.result, c_symbol, d_symbol)
    }

    pub fn default_sparklines(&self) -> String {
        self.sparklines(DEFAULT_C_SYMBOL, DEFAULT_D_SYMBOL)
    }

    /// Configured turns. A played record always has exactly this length.
    pub fn len(&self) -> usize {
        self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns == 0
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            turns: self.turns,
            noise: self.noise,
            record: self.result.clone(),
            final_score: self.final_score(),
            final_score_per_turn: self.final_score_per_turn(),
            winner: self.winner(),
            cooperation: self.cooperation(),
            normalised_cooperation: self.normalised_cooperation(),
            state_distribution: self.state_distribution(),
        }
    }
}
