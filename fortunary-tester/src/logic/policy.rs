use std::fmt;

use fortunary_game::{Action, MarketState, SessionSnapshot};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub action: Option<Action>,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(action: Option<Action>, rationale: Option<String>) -> Self {
        Self { action, rationale }
    }

    fn because(action: Action, rationale: &str) -> Self {
        Self::new(Some(action), Some(rationale.to_string()))
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick this month's action from the current snapshot.
    fn pick_action(&mut self, snapshot: &SessionSnapshot) -> PolicyDecision;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameplayStrategy {
    Saver,
    Cautious,
    Gambler,
    Hedonist,
    Balanced,
    Random,
}

impl GameplayStrategy {
    pub const ALL: [Self; 6] = [
        Self::Saver,
        Self::Cautious,
        Self::Gambler,
        Self::Hedonist,
        Self::Balanced,
        Self::Random,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Saver => "Saver",
            Self::Cautious => "Cautious",
            Self::Gambler => "Gambler",
            Self::Hedonist => "Hedonist",
            Self::Balanced => "Balanced",
            Self::Random => "Random",
        }
    }

    /// CLI key, the lowercase label.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Saver => "saver",
            Self::Cautious => "cautious",
            Self::Gambler => "gambler",
            Self::Hedonist => "hedonist",
            Self::Balanced => "balanced",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(key.trim()))
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Saver => Box::new(SaverPolicy),
            Self::Cautious => Box::new(CautiousPolicy),
            Self::Gambler => Box::new(GamblerPolicy),
            Self::Hedonist => Box::new(HedonistPolicy),
            Self::Balanced => Box::new(BalancedPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const COMFORT_RESERVE: i64 = 600_000;
const STRESS_BREAK: i32 = 65;
const HEALTH_FLOOR: i32 = 35;

struct SaverPolicy;
struct CautiousPolicy;
struct GamblerPolicy;
struct HedonistPolicy;
struct BalancedPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

const fn affords(snapshot: &SessionSnapshot, action: Action, reserve: i64) -> bool {
    snapshot.balance >= action.cost() + reserve
}

const fn market_is_up(market: MarketState) -> bool {
    matches!(market, MarketState::Boom | MarketState::Bullish)
}

impl PlayerPolicy for SaverPolicy {
    fn name(&self) -> &'static str {
        "Saver"
    }

    fn pick_action(&mut self, _snapshot: &SessionSnapshot) -> PolicyDecision {
        PolicyDecision::because(Action::Save, "always save")
    }
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn pick_action(&mut self, snapshot: &SessionSnapshot) -> PolicyDecision {
        if snapshot.stress >= STRESS_BREAK && affords(snapshot, Action::Entertain, 0) {
            return PolicyDecision::because(Action::Entertain, "stress relief");
        }
        if market_is_up(snapshot.market) && affords(snapshot, Action::InvestLow, COMFORT_RESERVE) {
            return PolicyDecision::because(Action::InvestLow, "rising market");
        }
        PolicyDecision::because(Action::Save, "hold cash")
    }
}

impl PlayerPolicy for GamblerPolicy {
    fn name(&self) -> &'static str {
        "Gambler"
    }

    fn pick_action(&mut self, snapshot: &SessionSnapshot) -> PolicyDecision {
        if affords(snapshot, Action::InvestHigh, 0) {
            PolicyDecision::because(Action::InvestHigh, "all in")
        } else {
            PolicyDecision::because(Action::Save, "rebuild stake")
        }
    }
}

impl PlayerPolicy for HedonistPolicy {
    fn name(&self) -> &'static str {
        "Hedonist"
    }

    fn pick_action(&mut self, snapshot: &SessionSnapshot) -> PolicyDecision {
        if snapshot.stress > 0 || snapshot.health < 100 {
            PolicyDecision::because(Action::Entertain, "enjoy life")
        } else {
            PolicyDecision::because(Action::TrainSkill, "nothing left to enjoy")
        }
    }
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn pick_action(&mut self, snapshot: &SessionSnapshot) -> PolicyDecision {
        if (snapshot.stress >= STRESS_BREAK || snapshot.health <= HEALTH_FLOOR)
            && affords(snapshot, Action::Entertain, 0)
        {
            return PolicyDecision::because(Action::Entertain, "recover");
        }
        if snapshot.month <= 6 && snapshot.luck < 60 && affords(snapshot, Action::TrainSkill, COMFORT_RESERVE) {
            return PolicyDecision::because(Action::TrainSkill, "early luck");
        }
        match snapshot.market {
            MarketState::Boom | MarketState::Bullish
                if affords(snapshot, Action::InvestHigh, 2 * COMFORT_RESERVE) =>
            {
                PolicyDecision::because(Action::InvestHigh, "ride the boom")
            }
            MarketState::Sideways if affords(snapshot, Action::InvestLow, COMFORT_RESERVE) => {
                PolicyDecision::because(Action::InvestLow, "steady market")
            }
            _ => PolicyDecision::because(Action::Save, "default to saving"),
        }
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_action(&mut self, _snapshot: &SessionSnapshot) -> PolicyDecision {
        let action = Action::ALL.choose(&mut self.rng).copied();
        PolicyDecision::new(action, Some("coin flip".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortunary_game::{ChallengeSettings, EventCatalog, GameSession};

    fn snapshot() -> SessionSnapshot {
        GameSession::seeded("Policy", ChallengeSettings::default(), EventCatalog::empty(), 3)
            .snapshot()
    }

    #[test]
    fn strategy_keys_roundtrip() {
        for strategy in GameplayStrategy::ALL {
            assert_eq!(GameplayStrategy::from_key(strategy.key()), Some(strategy));
        }
        assert_eq!(GameplayStrategy::from_key(" GAMBLER "), Some(GameplayStrategy::Gambler));
        assert!(GameplayStrategy::from_key("yolo").is_none());
    }

    #[test]
    fn balanced_recovers_when_stressed() {
        let mut snap = snapshot();
        snap.stress = 80;
        let decision = GameplayStrategy::Balanced.create_policy(1).pick_action(&snap);
        assert_eq!(decision.action, Some(Action::Entertain));
    }

    #[test]
    fn gambler_falls_back_to_saving_when_broke() {
        let mut snap = snapshot();
        snap.balance = 10_000;
        let decision = GameplayStrategy::Gambler.create_policy(1).pick_action(&snap);
        assert_eq!(decision.action, Some(Action::Save));
        snap.balance = 5_000_000;
        let decision = GameplayStrategy::Gambler.create_policy(1).pick_action(&snap);
        assert_eq!(decision.action, Some(Action::InvestHigh));
    }

    #[test]
    fn cautious_only_invests_in_rising_markets() {
        let mut snap = snapshot();
        snap.market = MarketState::Crash;
        let mut policy = GameplayStrategy::Cautious.create_policy(1);
        assert_eq!(policy.pick_action(&snap).action, Some(Action::Save));
        snap.market = MarketState::Boom;
        assert_eq!(policy.pick_action(&snap).action, Some(Action::InvestLow));
    }

    #[test]
    fn random_policy_is_seeded() {
        let snap = snapshot();
        let picks = |seed| {
            let mut policy = GameplayStrategy::Random.create_policy(seed);
            (0..12)
                .map(|_| policy.pick_action(&snap).action)
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(9), picks(9));
    }
}
