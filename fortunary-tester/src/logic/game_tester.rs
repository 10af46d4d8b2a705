use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use fortunary_game::{ChallengeSettings, EventCatalog, SessionState, format_money};

use crate::logic::policy::GameplayStrategy;
use crate::logic::simulation::{
    DecisionRecord, SAFETY_TURN_LIMIT, SimulationConfig, SimulationSession, TurnOutcome,
};

const BUNDLED_CATALOG: &str = include_str!("../../../fortunary-game/assets/data/events.json");

/// Collection of immutable data required to run a simulation.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    catalog: EventCatalog,
}

impl TesterAssets {
    /// Assets built from the catalog shipped with the game crate.
    pub fn load_default() -> Self {
        Self {
            catalog: EventCatalog::from_json_or_empty(BUNDLED_CATALOG),
        }
    }

    /// Load a catalog file strictly; a broken file is a CLI error, not a
    /// silent fallback.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let catalog = EventCatalog::from_json(&raw)
            .with_context(|| format!("invalid catalog {}", path.display()))?;
        Ok(Self { catalog })
    }

    #[must_use]
    pub const fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }
}

/// What to run and what must hold afterwards.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: GameplayStrategy,
    pub settings: ChallengeSettings,
    pub max_turns: u32,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy, settings: ChallengeSettings) -> Self {
        Self {
            strategy,
            settings,
            max_turns: SAFETY_TURN_LIMIT,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub turns: Vec<TurnOutcome>,
    pub metrics: PlayabilityMetrics,
    pub final_state: SessionState,
    pub ending_message: String,
    pub game_ended: bool,
}

/// Per-run numbers used by the playability aggregates.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct PlayabilityMetrics {
    pub months_played: u32,
    pub turns_taken: u32,
    pub final_balance: i64,
    pub min_balance: i64,
    pub peak_balance: i64,
    pub final_health: i32,
    pub final_stress: i32,
    pub final_luck: i32,
    pub ending_code: String,
    pub ending_title: String,
    pub route_key: String,
    pub route_label: String,
    pub success: bool,
    pub catalog_events: u32,
    pub lucky_events: u32,
    pub peak_catalog_per_month: usize,
    pub peak_lucky_per_month: usize,
    pub refused_actions: u32,
    pub stats_in_range: bool,
    #[serde(skip)]
    pub decision_log: Vec<DecisionRecord>,
}

impl PlayabilityMetrics {
    fn start(state: &SessionState) -> Self {
        let balance = state.player().balance();
        Self {
            min_balance: balance,
            peak_balance: balance,
            stats_in_range: true,
            ..Self::default()
        }
    }

    pub fn record_turn(&mut self, outcome: &TurnOutcome) {
        self.turns_taken += 1;
        self.min_balance = self.min_balance.min(outcome.balance);
        self.peak_balance = self.peak_balance.max(outcome.balance);
        if outcome.catalog_fired.is_some() {
            self.catalog_events += 1;
        }
        if outcome.lucky_fired {
            self.lucky_events += 1;
        }
        self.peak_catalog_per_month = self.peak_catalog_per_month.max(outcome.catalog_count);
        self.peak_lucky_per_month = self.peak_lucky_per_month.max(outcome.lucky_count);
        if outcome.action_refused {
            self.refused_actions += 1;
        }
        self.decision_log.push(outcome.decision.clone());
    }

    pub fn finalize(&mut self, state: &SessionState) {
        let player = state.player();
        self.months_played = player.month();
        self.final_balance = player.balance();
        self.final_health = player.health();
        self.final_stress = player.stress();
        self.final_luck = player.luck();
        self.stats_in_range = [player.health(), player.stress(), player.luck()]
            .iter()
            .all(|stat| (0..=100).contains(stat));
        if let Some(record) = state.ending() {
            self.ending_code = record.code().to_string();
            self.ending_title = record.title().to_string();
            self.route_key = record.route.key().to_string();
            self.route_label = record.route_label().to_string();
            self.success = record.ending.is_success();
        } else {
            self.ending_code = String::from("UNFINISHED");
            self.ending_title = String::from("Unfinished");
            self.route_key = state.routes().dominant().key().to_string();
            self.route_label = state.routes().dominant().label().to_string();
        }
    }
}

/// Headless deterministic runner for the core game logic.
#[derive(Clone)]
pub struct GameTester {
    verbose: bool,
    assets: Arc<TesterAssets>,
}

impl GameTester {
    pub const fn new(assets: Arc<TesterAssets>, verbose: bool) -> Self {
        Self { verbose, assets }
    }

    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> SimulationSummary {
        let config =
            SimulationConfig::new(plan.strategy, plan.settings, seed).with_max_turns(plan.max_turns);
        let mut session = SimulationSession::new(config, self.assets.catalog().clone());
        if self.verbose {
            log_initial_state(seed, plan, session.session().state());
        }

        let mut policy = plan.strategy.create_policy(seed);
        let mut metrics = PlayabilityMetrics::start(session.session().state());
        let mut turns = Vec::new();

        loop {
            let outcome = session.advance(policy.as_mut());
            metrics.record_turn(&outcome);
            if self.verbose {
                log_turn(&outcome);
            }
            let finished = outcome.game_ended;
            turns.push(outcome);
            if finished {
                break;
            }
        }

        let final_state = session.into_state();
        metrics.finalize(&final_state);
        log::debug!(
            "seed {seed} strategy {} ended {} after {} turns",
            plan.strategy,
            metrics.ending_code,
            metrics.turns_taken
        );
        let (ending_message, game_ended) = turns
            .last()
            .map_or((String::new(), false), |last| (last.message.clone(), final_state.is_over()));

        SimulationSummary {
            seed,
            strategy: plan.strategy,
            turns,
            metrics,
            final_state,
            ending_message,
            game_ended,
        }
    }
}

fn log_initial_state(seed: u64, plan: &SimulationPlan, state: &SessionState) {
    println!(
        "🎮 Starting simulation | seed:{seed} policy:{} challenges:{}",
        plan.strategy.label(),
        plan.settings.describe()
    );
    println!(
        "📊 Initial stats | Balance:{} Health:{} Stress:{} Luck:{} Market:{}",
        format_money(state.player().balance()),
        state.player().health(),
        state.player().stress(),
        state.player().luck(),
        state.market()
    );
}

fn log_turn(outcome: &TurnOutcome) {
    let action = outcome
        .decision
        .action
        .map_or("none", fortunary_game::Action::token);
    println!(
        "🎯 Month {}: {} ({}, {}) -> net {} balance {}",
        outcome.month,
        action,
        outcome.decision.policy_name,
        outcome.decision.rationale.as_deref().unwrap_or("-"),
        format_money(outcome.net_cash_flow),
        format_money(outcome.balance)
    );
    if let Some(event) = &outcome.catalog_fired {
        println!("   ⚡ {event}");
    }
    if outcome.game_ended {
        println!("🏁 Simulation ended: {}", outcome.message);
    }
}
