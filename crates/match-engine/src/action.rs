//! Actions and the canonical action record

use core::fmt;
use serde::{Deserialize, Serialize};
use crate::random::SeededRng;

/// A move in a two-action game such as the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Cooperate,
    Defect,
}

impl Action {
    /// The opposite action
    pub fn flip(self) -> Self {
        match self {
            Action::Cooperate => Action::Defect,
            Action::Defect => Action::Cooperate,
        }
    }

    pub fn is_cooperate(self) -> bool {
        self == Action::Cooperate
    }

    /// Single-letter form used in logs and display strings
    pub fn symbol(self) -> char {
        match self {
            Action::Cooperate => 'C',
            Action::Defect => 'D',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One completed turn: (player 1's action, player 2's action)
pub type Turn = (Action, Action);

/// Ordered per-turn record of a match. One entry per completed turn.
pub type ActionRecord = Vec<Turn>;

/// Flip `action` with probability `noise`.
///
/// No draw is taken from `rng` when `noise` is zero, so noiseless play
/// leaves the stream untouched.
pub fn apply_noise(action: Action, noise: f64, rng: &mut SeededRng) -> Action {
    if noise > 0.0 && rng.bernoulli(noise) {
        action.flip()
    } else {
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip() {
        assert_eq!(Action::Cooperate.flip(), Action::Defect);
        assert_eq!(Action::Defect.flip(), Action::Cooperate);
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::Cooperate.to_string(), "C");
        assert_eq!(Action::Defect.to_string(), "D");
    }

    #[test]
    fn test_zero_noise_never_flips() {
        let mut rng = SeededRng::new(&[7u8; 32], 0);
        let before = rng.clone();
        for _ in 0..100 {
            assert_eq!(apply_noise(Action::Cooperate, 0.0, &mut rng), Action::Cooperate);
        }
        // No draws consumed
        assert_eq!(rng.next_u64(), before.clone().next_u64());
    }

    #[test]
    fn test_full_noise_always_flips() {
        let mut rng = SeededRng::new(&[7u8; 32], 0);
        for _ in 0..100 {
            assert_eq!(apply_noise(Action::Cooperate, 1.0, &mut rng), Action::Defect);
            assert_eq!(apply_noise(Action::Defect, 1.0, &mut rng), Action::Cooperate);
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&(Action::Cooperate, Action::Defect)).unwrap();
        assert_eq!(json, r#"["Cooperate","Defect"]"#);
    }
}
