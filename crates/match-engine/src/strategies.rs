//! Built-in players

use serde::{Deserialize, Serialize};
use crate::action::Action;
use crate::game::Score;
use crate::player::{Classifier, History, MatchContext, Player, PlayerCore};
use crate::random::SeededRng;

/// Always cooperate, never defect.
#[derive(Clone, Debug, Default)]
pub struct Cooperator {
    core: PlayerCore,
}

impl Cooperator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Player for Cooperator {
    fn name(&self) -> &str {
        "Cooperator"
    }

    fn classifier(&self) -> Classifier {
        Classifier::deterministic(Some(0))
    }

    fn core(&self) -> &PlayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlayerCore {
        &mut self.core
    }

    fn strategy(&mut self, _opponent: &History, _ctx: &MatchContext<'_>, _rng: &mut SeededRng) -> Action {
        Action::Cooperate
    }
}

/// Always defect, never cooperate.
#[derive(Clone, Debug, Default)]
pub struct Defector {
    core: PlayerCore,
}

impl Defector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Player for Defector {
    fn name(&self) -> &str {
        "Defector"
    }

    fn classifier(&self) -> Classifier {
        Classifier::deterministic(Some(0))
    }

    fn core(&self) -> &PlayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlayerCore {
        &mut self.core
    }

    fn strategy(&mut self, _opponent: &History, _ctx: &MatchContext<'_>, _rng: &mut SeededRng) -> Action {
        Action::Defect
    }
}

/// Copy opponent's last move. Start with cooperate.
#[derive(Clone, Debug, Default)]
pub struct TitForTat {
    core: PlayerCore,
}

impl TitForTat {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Player for TitForTat {
    fn name(&self) -> &str {
        "Tit For Tat"
    }

    fn classifier(&self) -> Classifier {
        Classifier::deterministic(Some(1))
    }

    fn core(&self) -> &PlayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlayerCore {
        &mut self.core
    }

    fn strategy(&mut self, opponent: &History, _ctx: &MatchContext<'_>, _rng: &mut SeededRng) -> Action {
        opponent.last().unwrap_or(Action::Cooperate)
    }
}

/// Cooperate until the opponent defects once, then always defect.
#[derive(Clone, Debug, Default)]
pub struct GrimTrigger {
    core: PlayerCore,
}

impl GrimTrigger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Player for GrimTrigger {
    fn name(&self) -> &str {
        "Grim Trigger"
    }

    fn classifier(&self) -> Classifier {
        Classifier::deterministic(None)
    }

    fn core(&self) -> &PlayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlayerCore {
        &mut self.core
    }

    fn strategy(&mut self, opponent: &History, _ctx: &MatchContext<'_>, _rng: &mut SeededRng) -> Action {
        if opponent.defections() > 0 {
            Action::Defect
        } else {
            Action::Cooperate
        }
    }
}

/// Win-stay, lose-switch
/// - If last turn paid at least the reward, repeat the move
/// - Otherwise switch
#[derive(Clone, Debug, Default)]
pub struct Pavlov {
    core: PlayerCore,
}

impl Pavlov {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Player for Pavlov {
    fn name(&self) -> &str {
        "Pavlov"
    }

    fn classifier(&self) -> Classifier {
        Classifier { makes_use_of_game: true, ..Classifier::deterministic(Some(1)) }
    }

    fn core(&self) -> &PlayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlayerCore {
        &mut self.core
    }

    fn strategy(&mut self, opponent: &History, ctx: &MatchContext<'_>, _rng: &mut SeededRng) -> Action {
        let (Some(my_last), Some(opp_last)) = (self.history().last(), opponent.last()) else {
            return Action::Cooperate; // Start with cooperate
        };

        let (my_score, _) = ctx.game.score((my_last, opp_last));
        let (reward, _, _, _) = ctx.game.rpst();

        if my_score >= reward {
            my_last
        } else {
            my_last.flip()
        }
    }
}

/// Random choice each turn with a fixed cooperation probability.
#[derive(Clone, Debug)]
pub struct RandomPlayer {
    core: PlayerCore,
    cooperate_probability: f64,
}

impl RandomPlayer {
    /// `cooperate_probability` is clamped to [0, 1]
    pub fn new(cooperate_probability: f64) -> Self {
        let p = if cooperate_probability.is_nan() { 0.5 } else { cooperate_probability.clamp(0.0, 1.0) };
        Self { core: PlayerCore::new(), cooperate_probability: p }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        "Random"
    }

    fn classifier(&self) -> Classifier {
        // Degenerate probabilities play a fixed action
        let stochastic = self.cooperate_probability > 0.0 && self.cooperate_probability < 1.0;
        Classifier { stochastic, ..Classifier::deterministic(Some(0)) }
    }

    fn core(&self) -> &PlayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlayerCore {
        &mut self.core
    }

    fn strategy(&mut self, _opponent: &History, _ctx: &MatchContext<'_>, rng: &mut SeededRng) -> Action {
        if rng.bernoulli(self.cooperate_probability) {
            Action::Cooperate
        } else {
            Action::Defect
        }
    }
}

/// Mood-driven player that tracks its own running average payoff.
///
/// - Average above R: ego inflated, defect
/// - Average between (R+P)/2 and R, or above 2: cooperate
/// - Average between 1 and 2: defect
/// - Average below 1: rock bottom, play randomly
///
/// Opens with cooperation and always cooperates on the last turn when the
/// match length is known.
#[derive(Clone, Debug, Default)]
pub struct Stalker {
    core: PlayerCore,
    scores: Vec<Score>,
}

impl Stalker {
    pub fn new() -> Self {
        Self::default()
    }

    fn mood(&self, ctx: &MatchContext<'_>, rng: &mut SeededRng) -> Action {
        let (very_good, very_bad, _, _) = ctx.game.rpst();
        let wish = (very_bad + very_good) / 2.0;
        let average = self.scores.iter().sum::<Score>() / self.scores.len() as Score;

        if average > very_good {
            Action::Defect
        } else if average > wish && average < very_good {
            Action::Cooperate
        } else if average > 2.0 {
            Action::Cooperate
        } else if average > 1.0 && average < 2.0 {
            Action::Defect
        } else if average < 1.0 {
            if rng.bernoulli(0.5) {
                Action::Cooperate
            } else {
                Action::Defect
            }
        } else {
            // Boundary averages (exactly 1 or 2) fall through every band
            Action::Cooperate
        }
    }
}

impl Player for Stalker {
    fn name(&self) -> &str {
        "Stalker"
    }

    fn classifier(&self) -> Classifier {
        Classifier {
            makes_use_of_game: true,
            makes_use_of_length: true,
            ..Classifier::stochastic(None)
        }
    }

    fn core(&self) -> &PlayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlayerCore {
        &mut self.core
    }

    fn strategy(&mut self, opponent: &History, ctx: &MatchContext<'_>, rng: &mut SeededRng) -> Action {
        if let (Some(my_last), Some(opp_last)) = (self.history().last(), opponent.last()) {
            let (score, _) = ctx.game.score((my_last, opp_last));
            self.scores.push(score);
        }

        if matches!(ctx.length, Some(length) if self.history().len() + 1 >= length) {
            return Action::Cooperate;
        }
        if self.scores.is_empty() {
            return Action::Cooperate;
        }

        self.mood(ctx, rng)
    }

    fn reset_memory(&mut self) {
        self.scores.clear();
    }
}

/// Built-in strategy kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    Cooperator,
    Defector,
    TitForTat,
    GrimTrigger,
    Pavlov,
    Random,
    Stalker,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 7] = [
        StrategyKind::Cooperator,
        StrategyKind::Defector,
        StrategyKind::TitForTat,
        StrategyKind::GrimTrigger,
        StrategyKind::Pavlov,
        StrategyKind::Random,
        StrategyKind::Stalker,
    ];

    /// Construct a fresh player instance with its own identity
    pub fn build(self) -> Box<dyn Player> {
        match self {
            StrategyKind::Cooperator => Box::new(Cooperator::new()),
            StrategyKind::Defector => Box::new(Defector::new()),
            StrategyKind::TitForTat => Box::new(TitForTat::new()),
            StrategyKind::GrimTrigger => Box::new(GrimTrigger::new()),
            StrategyKind::Pavlov => Box::new(Pavlov::new()),
            StrategyKind::Random => Box::new(RandomPlayer::default()),
            StrategyKind::Stalker => Box::new(Stalker::new()),
        }
    }

    /// Human-readable description
    pub fn description(self) -> &'static str {
        match self {
            StrategyKind::Cooperator => "Never defects. Always cooperates.",
            StrategyKind::Defector => "Never cooperates. Always defects.",
            StrategyKind::TitForTat => "Copies opponent's last move. Starts by cooperating.",
            StrategyKind::GrimTrigger => "Cooperates until betrayed, then always defects.",
            StrategyKind::Pavlov => "Repeats move if outcome was good, switches if bad.",
            StrategyKind::Random => "Randomly cooperates or defects each turn.",
            StrategyKind::Stalker => "Mood follows its average score; cooperates on the last turn.",
        }
    }
}
