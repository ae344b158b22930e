//! Payoff table for two-player, two-action games

use serde::{Deserialize, Serialize};
use crate::action::{Action, Turn};
use crate::error::{Error, Result};

/// A numeric payoff
pub type Score = f64;

/// Immutable payoff matrix described by the four canonical values
///
/// - `reward`: both cooperate
/// - `punishment`: both defect
/// - `sucker`: cooperate against a defector
/// - `temptation`: defect against a cooperator
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    reward: Score,
    punishment: Score,
    sucker: Score,
    temptation: Score,
}

impl Game {
    /// Create a game from (R, P, S, T). Every payoff must be finite.
    pub fn new(reward: Score, punishment: Score, sucker: Score, temptation: Score) -> Result<Self> {
        for (name, value) in [('R', reward), ('P', punishment), ('S', sucker), ('T', temptation)] {
            if !value.is_finite() {
                return Err(Error::InvalidPayoff { name, value });
            }
        }
        Ok(Self { reward, punishment, sucker, temptation })
    }

    /// The standard Prisoner's Dilemma: R=3, P=1, S=0, T=5
    pub const fn prisoners_dilemma() -> Self {
        Self { reward: 3.0, punishment: 1.0, sucker: 0.0, temptation: 5.0 }
    }

    /// (R, P, S, T)
    pub fn rpst(&self) -> (Score, Score, Score, Score) {
        (self.reward, self.punishment, self.sucker, self.temptation)
    }

    /// Returns (score_1, score_2) for one turn
    pub fn score(&self, turn: Turn) -> (Score, Score) {
        match turn {
            (Action::Cooperate, Action::Cooperate) => (self.reward, self.reward),
            (Action::Cooperate, Action::Defect) => (self.sucker, self.temptation),
            (Action::Defect, Action::Cooperate) => (self.temptation, self.sucker),
            (Action::Defect, Action::Defect) => (self.punishment, self.punishment),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::prisoners_dilemma()
    }
}
