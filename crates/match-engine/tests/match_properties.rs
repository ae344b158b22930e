//! Property-based tests for the match engine and record statistics.

use proptest::prelude::*;

use match_engine::interaction::{
    compute_cooperations, compute_final_score, compute_normalised_state_distribution, compute_scores,
    compute_state_distribution, compute_winner_index,
};
use match_engine::{
    Action, CacheEvent, DeterministicCache, Game, Match, MatchConfig, StrategyKind, Turn, Winner,
};

/// Strategy: a single action.
fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![Just(Action::Cooperate), Just(Action::Defect)]
}

/// Strategy: an action record of up to 100 turns.
fn record_strategy() -> impl Strategy<Value = Vec<Turn>> {
    prop::collection::vec((action_strategy(), action_strategy()), 0..100)
}

/// Strategy: a built-in strategy that never draws randomness.
fn deterministic_kind() -> impl Strategy<Value = StrategyKind> {
    prop::sample::select(vec![
        StrategyKind::Cooperator,
        StrategyKind::Defector,
        StrategyKind::TitForTat,
        StrategyKind::GrimTrigger,
        StrategyKind::Pavlov,
    ])
}

/// Strategy: any built-in strategy.
fn any_kind() -> impl Strategy<Value = StrategyKind> {
    prop::sample::select(StrategyKind::ALL.to_vec())
}

proptest! {
    // 1. Final score is the element-wise sum of per-turn scores
    #[test]
    fn final_score_is_sum_of_scores(record in record_strategy()) {
        let game = Game::default();
        let summed = compute_scores(&record, &game)
            .iter()
            .fold((0.0, 0.0), |acc, s| (acc.0 + s.0, acc.1 + s.1));
        prop_assert_eq!(compute_final_score(&record, &game), summed);
    }

    // 2. Cooperations plus defections account for every turn
    #[test]
    fn cooperations_plus_defections_is_turns(record in record_strategy()) {
        let (c1, c2) = compute_cooperations(&record);
        let d1 = record.iter().filter(|(a, _)| *a == Action::Defect).count();
        let d2 = record.iter().filter(|(_, b)| *b == Action::Defect).count();
        prop_assert_eq!(c1 + d1, record.len());
        prop_assert_eq!(c2 + d2, record.len());
    }

    // 3. State distribution counts sum to the number of turns
    #[test]
    fn state_distribution_sums_to_turns(record in record_strategy()) {
        prop_assert_eq!(compute_state_distribution(&record).total(), record.len());
        match compute_normalised_state_distribution(&record) {
            None => prop_assert!(record.is_empty()),
            Some(norm) => {
                let sum: f64 = norm.entries().iter().map(|(_, v)| v).sum();
                prop_assert!((sum - 1.0).abs() < 1e-9, "normalised sum {}", sum);
            }
        }
    }

    // 4. Winner agrees with the final score, and "no data" only for empty records
    #[test]
    fn winner_matches_final_score(record in record_strategy()) {
        let game = Game::default();
        let (s1, s2) = compute_final_score(&record, &game);
        let expected = if record.is_empty() {
            Winner::NoData
        } else if s1 > s2 {
            Winner::Player(0)
        } else if s2 > s1 {
            Winner::Player(1)
        } else {
            Winner::Tie
        };
        prop_assert_eq!(compute_winner_index(&record, &game), expected);
    }

    // 5. Deterministic pairings replay identically and the record has `turns` entries
    #[test]
    fn deterministic_matches_repeat(
        kind_a in deterministic_kind(),
        kind_b in deterministic_kind(),
        turns in 0..60usize,
    ) {
        let mut a = kind_a.build();
        let mut b = kind_b.build();

        let mut first = Match::new(a.as_mut(), b.as_mut(), MatchConfig::new(turns)).unwrap();
        prop_assert_eq!(first.len(), turns);
        let first_record = first.play().to_vec();
        drop(first);

        let mut second = Match::new(a.as_mut(), b.as_mut(), MatchConfig::new(turns)).unwrap();
        let second_record = second.play().to_vec();

        prop_assert_eq!(first_record.len(), turns);
        prop_assert_eq!(&first_record, &second_record);
    }

    // 6. A shared cache serves the second run of a deterministic pairing
    #[test]
    fn shared_cache_hit_reproduces_record(
        kind_a in deterministic_kind(),
        kind_b in deterministic_kind(),
        turns in 0..60usize,
    ) {
        let cache = DeterministicCache::new().shared();
        let mut a = kind_a.build();
        let mut b = kind_b.build();

        let mut first = Match::new(a.as_mut(), b.as_mut(), MatchConfig::new(turns))
            .unwrap()
            .with_cache(cache.clone());
        let first_record = first.play().to_vec();
        prop_assert_eq!(first.cache_event(), &CacheEvent::Stored);
        drop(first);

        let mut second = Match::new(a.as_mut(), b.as_mut(), MatchConfig::new(turns))
            .unwrap()
            .with_cache(cache.clone());
        let second_record = second.play().to_vec();
        prop_assert_eq!(second.cache_event(), &CacheEvent::Hit);
        prop_assert_eq!(first_record, second_record);
    }

    // 7. Noisy matches never touch the cache
    #[test]
    fn noisy_matches_never_cached(
        kind_a in any_kind(),
        kind_b in any_kind(),
        turns in 1..40usize,
        noise in 0.01..=1.0f64,
    ) {
        let cache = DeterministicCache::new().shared();
        let mut a = kind_a.build();
        let mut b = kind_b.build();

        let mut m = Match::new(a.as_mut(), b.as_mut(), MatchConfig::new(turns).with_noise(noise))
            .unwrap()
            .with_cache(cache.clone());
        prop_assert!(m.is_stochastic());
        prop_assert_eq!(m.play().len(), turns);
        prop_assert_eq!(m.cache_event(), &CacheEvent::Bypassed);
        prop_assert!(cache.lock().unwrap().is_empty());
    }

    // 8. Any pairing yields exactly `turns` entries and consistent statistics
    #[test]
    fn any_pairing_has_consistent_statistics(
        kind_a in any_kind(),
        kind_b in any_kind(),
        turns in 1..60usize,
        index in any::<u32>(),
    ) {
        let mut a = kind_a.build();
        let mut b = kind_b.build();
        let config = MatchConfig::new(turns).with_seed([11u8; 32], index);

        let mut m = Match::new(a.as_mut(), b.as_mut(), config).unwrap();
        m.play();

        prop_assert_eq!(m.result().len(), m.len());
        prop_assert_eq!(m.state_distribution().total(), turns);
        let (s1, s2) = m.final_score();
        let (p1, p2) = m.final_score_per_turn().unwrap();
        prop_assert!((p1 * turns as f64 - s1).abs() < 1e-9);
        prop_assert!((p2 * turns as f64 - s2).abs() < 1e-9);
    }
}
