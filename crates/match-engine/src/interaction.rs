//! Statistics derived from an action record
//!
//! Every function here is a pure function of the record (plus the game for
//! anything score-related). Empty records are "no data": counts and totals
//! are zero, rates are `None`, and the winner is `Winner::NoData`.

use serde::{Deserialize, Serialize};
use crate::action::{Action, Turn};
use crate::game::{Game, Score};

/// Default sparkline symbol for a cooperation
pub const DEFAULT_C_SYMBOL: char = '█';
/// Default sparkline symbol for a defection
pub const DEFAULT_D_SYMBOL: char = ' ';

/// Outcome of comparing final scores
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    /// Index (0 or 1) of the player with the strictly higher score
    Player(usize),
    /// Equal final scores
    Tie,
    /// Nothing has been played
    NoData,
}

/// Counts (or rates) of the four per-turn states
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDistribution<T> {
    pub cc: T,
    pub cd: T,
    pub dc: T,
    pub dd: T,
}

impl<T: Copy> StateDistribution<T> {
    pub fn get(&self, turn: Turn) -> T {
        match turn {
            (Action::Cooperate, Action::Cooperate) => self.cc,
            (Action::Cooperate, Action::Defect) => self.cd,
            (Action::Defect, Action::Cooperate) => self.dc,
            (Action::Defect, Action::Defect) => self.dd,
        }
    }

    /// States in (C,C), (C,D), (D,C), (D,D) order
    pub fn entries(&self) -> [(Turn, T); 4] {
        use Action::{Cooperate as C, Defect as D};
        [((C, C), self.cc), ((C, D), self.cd), ((D, C), self.dc), ((D, D), self.dd)]
    }
}

impl StateDistribution<usize> {
    pub fn total(&self) -> usize {
        self.cc + self.cd + self.dc + self.dd
    }

    fn record(&mut self, turn: Turn) {
        let slot = match turn {
            (Action::Cooperate, Action::Cooperate) => &mut self.cc,
            (Action::Cooperate, Action::Defect) => &mut self.cd,
            (Action::Defect, Action::Cooperate) => &mut self.dc,
            (Action::Defect, Action::Defect) => &mut self.dd,
        };
        *slot += 1;
    }
}

/// Per-turn (score_1, score_2)
pub fn compute_scores(record: &[Turn], game: &Game) -> Vec<(Score, Score)> {
    record.iter().map(|turn| game.score(*turn)).collect()
}

/// Total score for each player. (0, 0) for an empty record.
pub fn compute_final_score(record: &[Turn], game: &Game) -> (Score, Score) {
    record.iter().fold((0.0, 0.0), |(total_1, total_2), turn| {
        let (s1, s2) = game.score(*turn);
        (total_1 + s1, total_2 + s2)
    })
}

/// Mean score per turn. `None` for an empty record.
pub fn compute_final_score_per_turn(record: &[Turn], game: &Game) -> Option<(Score, Score)> {
    if record.is_empty() {
        return None;
    }
    let turns = record.len() as Score;
    let (total_1, total_2) = compute_final_score(record, game);
    Some((total_1 / turns, total_2 / turns))
}

pub fn compute_winner_index(record: &[Turn], game: &Game) -> Winner {
    if record.is_empty() {
        return Winner::NoData;
    }
    let (total_1, total_2) = compute_final_score(record, game);
    if total_1 > total_2 {
        Winner::Player(0)
    } else if total_2 > total_1 {
        Winner::Player(1)
    } else {
        Winner::Tie
    }
}

/// Number of cooperations by each player
pub fn compute_cooperations(record: &[Turn]) -> (usize, usize) {
    record.iter().fold((0, 0), |(c1, c2), (a1, a2)| {
        (c1 + usize::from(a1.is_cooperate()), c2 + usize::from(a2.is_cooperate()))
    })
}

/// Cooperation rate per turn for each player. `None` for an empty record.
pub fn compute_normalised_cooperation(record: &[Turn]) -> Option<(f64, f64)> {
    if record.is_empty() {
        return None;
    }
    let turns = record.len() as f64;
    let (c1, c2) = compute_cooperations(record);
    Some((c1 as f64 / turns, c2 as f64 / turns))
}

pub fn compute_state_distribution(record: &[Turn]) -> StateDistribution<usize> {
    let mut distribution = StateDistribution::default();
    for turn in record {
        distribution.record(*turn);
    }
    distribution
}

/// State frequencies divided by turns played. `None` for an empty record.
pub fn compute_normalised_state_distribution(record: &[Turn]) -> Option<StateDistribution<f64>> {
    if record.is_empty() {
        return None;
    }
    let turns = record.len() as f64;
    let counts = compute_state_distribution(record);
    Some(StateDistribution {
        cc: counts.cc as f64 / turns,
        cd: counts.cd as f64 / turns,
        dc: counts.dc as f64 / turns,
        dd: counts.dd as f64 / turns,
    })
}

/// Two lines, one character per turn: player 1 above player 2.
/// Empty string for an empty record.
pub fn compute_sparklines(record: &[Turn], c_symbol: char, d_symbol: char) -> String {
    if record.is_empty() {
        return String::new();
    }
    let symbol = |action: Action| match action {
        Action::Cooperate => c_symbol,
        Action::Defect => d_symbol,
    };
    let line_1: String = record.iter().map(|(a, _)| symbol(*a)).collect();
    let line_2: String = record.iter().map(|(_, b)| symbol(*b)).collect();
    format!("{}\n{}", line_1, line_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Action::{Cooperate as C, Defect as D};

    fn record() -> Vec<Turn> {
        vec![(C, C), (D, C), (C, D), (D, D), (C, C)]
    }

    #[test]
    fn test_scores() {
        let game = Game::default();
        assert_eq!(
            compute_scores(&record(), &game),
            vec![(3.0, 3.0), (5.0, 0.0), (0.0, 5.0), (1.0, 1.0), (3.0, 3.0)]
        );
    }

    #[test]
    fn test_final_score_and_per_turn() {
        let game = Game::default();
        assert_eq!(compute_final_score(&record(), &game), (12.0, 12.0));
        assert_eq!(compute_final_score_per_turn(&record(), &game), Some((2.4, 2.4)));
    }

    #[test]
    fn test_empty_record_is_no_data() {
        let game = Game::default();
        assert!(compute_scores(&[], &game).is_empty());
        assert_eq!(compute_final_score(&[], &game), (0.0, 0.0));
        assert_eq!(compute_final_score_per_turn(&[], &game), None);
        assert_eq!(compute_winner_index(&[], &game), Winner::NoData);
        assert_eq!(compute_cooperations(&[]), (0, 0));
        assert_eq!(compute_normalised_cooperation(&[]), None);
        assert_eq!(compute_state_distribution(&[]).total(), 0);
        assert_eq!(compute_normalised_state_distribution(&[]), None);
        assert_eq!(compute_sparklines(&[], 'C', 'D'), "");
    }

    #[test]
    fn test_winner() {
        let game = Game::default();
        assert_eq!(compute_winner_index(&record(), &game), Winner::Tie);
        assert_eq!(compute_winner_index(&[(D, C)], &game), Winner::Player(0));
        assert_eq!(compute_winner_index(&[(C, D)], &game), Winner::Player(1));
        assert_ne!(Winner::Tie, Winner::NoData);
    }

    #[test]
    fn test_cooperation() {
        assert_eq!(compute_cooperations(&record()), (3, 3));
        assert_eq!(compute_normalised_cooperation(&record()), Some((0.6, 0.6)));
        assert_eq!(compute_cooperations(&[(C, D), (C, D)]), (2, 0));
    }

    #[test]
    fn test_state_distribution() {
        let dist = compute_state_distribution(&record());
        assert_eq!(dist.get((C, C)), 2);
        assert_eq!(dist.get((D, C)), 1);
        assert_eq!(dist.get((C, D)), 1);
        assert_eq!(dist.get((D, D)), 1);
        assert_eq!(dist.total(), 5);

        let norm = compute_normalised_state_distribution(&record()).unwrap();
        assert_eq!(norm.cc, 0.4);
        assert_eq!(norm.dd, 0.2);
        let sum: f64 = norm.entries().iter().map(|(_, v)| v).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sparklines() {
        assert_eq!(
            compute_sparklines(&record(), DEFAULT_C_SYMBOL, DEFAULT_D_SYMBOL),
            "█ █ █\n██  █"
        );
        assert_eq!(compute_sparklines(&record(), 'C', 'D'), "CDCDC\nCCDDC");
    }
}
