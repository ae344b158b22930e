//! Player abstraction: identity, classifier, history and the turn routine

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::action::{apply_noise, Action, Turn};
use crate::game::Game;
use crate::random::SeededRng;

static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity token, assigned once per player instance
///
/// Never derived from a player's mutable state, so a player keeps the same
/// cache identity while its history changes from match to match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(u64);

impl PlayerId {
    /// Allocate a fresh, process-unique id
    pub fn next() -> Self {
        Self(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Static description of a strategy's behaviour
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifier {
    /// Outcome may differ between two plays against the same opponent
    pub stochastic: bool,
    /// How many past turns the strategy looks at; `None` means unbounded
    pub memory_depth: Option<usize>,
    pub makes_use_of_game: bool,
    pub makes_use_of_length: bool,
    pub long_run_time: bool,
    pub inspects_source: bool,
    pub manipulates_source: bool,
    pub manipulates_state: bool,
}

impl Classifier {
    pub fn deterministic(memory_depth: Option<usize>) -> Self {
        Self { memory_depth, ..Self::default() }
    }

    pub fn stochastic(memory_depth: Option<usize>) -> Self {
        Self { stochastic: true, memory_depth, ..Self::default() }
    }
}

/// A player's own committed actions, with running counts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    plays: Vec<Action>,
    cooperations: usize,
    defections: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        match action {
            Action::Cooperate => self.cooperations += 1,
            Action::Defect => self.defections += 1,
        }
        self.plays.push(action);
    }

    pub fn clear(&mut self) {
        self.plays.clear();
        self.cooperations = 0;
        self.defections = 0;
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn last(&self) -> Option<Action> {
        self.plays.last().copied()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.plays
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.plays.iter().copied()
    }

    pub fn cooperations(&self) -> usize {
        self.cooperations
    }

    pub fn defections(&self) -> usize {
        self.defections
    }
}

impl From<&[Action]> for History {
    fn from(actions: &[Action]) -> Self {
        let mut history = History::new();
        for action in actions {
            history.push(*action);
        }
        history
    }
}

/// Match parameters a strategy may consult while deciding
#[derive(Clone, Copy, Debug)]
pub struct MatchContext<'a> {
    /// Advertised match length; `None` when unknown to the players
    pub length: Option<usize>,
    pub game: &'a Game,
    /// Advertised noise level. Flipping uses the match's own noise.
    pub noise: f64,
}

/// State every player carries: its identity and its history
#[derive(Clone, Debug)]
pub struct PlayerCore {
    id: PlayerId,
    history: History,
}

impl PlayerCore {
    pub fn new() -> Self {
        Self { id: PlayerId::next(), history: History::new() }
    }

    pub(crate) fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }
}

impl Default for PlayerCore {
    fn default() -> Self {
        Self::new()
    }
}

/// A decision-making agent
///
/// Implementors provide `strategy` plus access to their `PlayerCore`;
/// the turn routine, identity and reset come for free.
pub trait Player {
    fn name(&self) -> &str;

    fn classifier(&self) -> Classifier;

    fn core(&self) -> &PlayerCore;

    fn core_mut(&mut self) -> &mut PlayerCore;

    /// Choose the intended action for the next turn
    ///
    /// `opponent` is the opponent's committed history; `self.history()` is
    /// ours. Both have the same length.
    fn strategy(&mut self, opponent: &History, ctx: &MatchContext<'_>, rng: &mut SeededRng) -> Action;

    /// Clear strategy-specific memory. History is cleared by `reset`.
    fn reset_memory(&mut self) {}

    fn id(&self) -> PlayerId {
        self.core().id
    }

    fn history(&self) -> &History {
        &self.core().history
    }

    /// Clear all per-match state
    fn reset(&mut self) {
        self.core_mut().history_mut().clear();
        self.reset_memory();
    }

    /// Play one simultaneous turn against `opponent`, advancing both histories
    ///
    /// Both sides decide from the pre-turn histories. Each intended action is
    /// flipped with probability `noise` before being committed, so what a
    /// player records is exactly what its opponent observes.
    fn play(
        &mut self,
        opponent: &mut dyn Player,
        noise: f64,
        ctx: &MatchContext<'_>,
        rng: &mut SeededRng,
    ) -> Turn {
        let turn_index = self.history().len() as u64;
        let mut own_rng = rng.for_round(turn_index.wrapping_mul(2));
        let mut opponent_rng = rng.for_round(turn_index.wrapping_mul(2).wrapping_add(1));

        let intended = self.strategy(opponent.history(), ctx, &mut own_rng);
        let opponent_intended = opponent.strategy(self.history(), ctx, &mut opponent_rng);

        let action = apply_noise(intended, noise, rng);
        let opponent_action = apply_noise(opponent_intended, noise, rng);

        trace!(
            turn = turn_index + 1,
            player = %self.id(),
            opponent = %opponent.id(),
            intended = %intended,
            committed = %action,
            opponent_intended = %opponent_intended,
            opponent_committed = %opponent_action,
            "turn played"
        );

        self.core_mut().history_mut().push(action);
        opponent.core_mut().history_mut().push(opponent_action);

        (action, opponent_action)
    }
}

/// A match is stochastic if there is noise or any player is stochastic
pub fn is_stochastic(players: &[&dyn Player], noise: f64) -> bool {
    noise > 0.0 || players.iter().any(|p| p.classifier().stochastic)
}
