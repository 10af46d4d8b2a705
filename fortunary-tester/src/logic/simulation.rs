use fortunary_game::{Action, ChallengeSettings, EventCatalog, GameSession, SessionState};

use crate::logic::policy::{GameplayStrategy, PlayerPolicy, PolicyDecision};

/// Turn cap for a single playthrough. The engine always ends by month 24;
/// this only guards against a regression looping forever.
pub const SAFETY_TURN_LIMIT: u32 = 40;

/// Configuration for a simulation session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub settings: ChallengeSettings,
    pub max_turns: u32,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy, settings: ChallengeSettings, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            settings,
            max_turns: SAFETY_TURN_LIMIT,
        }
    }

    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }
}

/// Snapshot of one policy decision.
#[derive(Debug, Clone)]
pub struct DecisionRecord {
    pub month: u32,
    pub action: Option<Action>,
    pub policy_name: String,
    pub rationale: Option<String>,
}

/// Result of advancing the simulation by one month.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub month: u32,
    pub game_ended: bool,
    pub balance: i64,
    pub net_cash_flow: i64,
    pub catalog_fired: Option<String>,
    /// Catalog events applied this month.
    pub catalog_count: usize,
    pub lucky_fired: bool,
    /// Lucky windfall lines in this month's narration (dodges excluded).
    pub lucky_count: usize,
    pub action_refused: bool,
    pub decision: DecisionRecord,
    pub message: String,
}

/// Deterministic harness around one [`GameSession`].
pub struct SimulationSession {
    session: GameSession,
    max_turns: u32,
    turns_taken: u32,
}

impl SimulationSession {
    #[must_use]
    pub fn new(config: SimulationConfig, catalog: EventCatalog) -> Self {
        let name = format!("{} #{}", config.strategy.label(), config.seed);
        Self {
            session: GameSession::seeded(name, config.settings, catalog, config.seed),
            max_turns: config.max_turns,
            turns_taken: 0,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn into_state(self) -> SessionState {
        self.session.into_state()
    }

    pub fn advance(&mut self, policy: &mut dyn PlayerPolicy) -> TurnOutcome {
        let snapshot = self.session.snapshot();
        let PolicyDecision { action, rationale } = policy.pick_action(&snapshot);
        let decision = DecisionRecord {
            month: snapshot.month,
            action,
            policy_name: policy.name().to_string(),
            rationale,
        };

        let report = self.session.process_action(action);
        self.turns_taken += 1;

        let summary = report.summary.as_ref();
        let mut game_ended = report.snapshot.game_over;
        let mut message = report
            .snapshot
            .ending_title
            .clone()
            .unwrap_or_else(|| report.message.clone());
        if !game_ended && self.turns_taken >= self.max_turns {
            game_ended = true;
            message = String::from("Safety turn limit reached");
        }

        TurnOutcome {
            month: snapshot.month,
            game_ended,
            balance: report.snapshot.balance,
            net_cash_flow: summary.map_or(0, fortunary_game::TurnSummary::net_cash_flow),
            catalog_fired: summary
                .and_then(|summary| summary.catalog.fired.as_ref())
                .map(|event| event.name.clone()),
            catalog_count: summary.map_or(0, |summary| summary.catalog.fired_count()),
            lucky_fired: summary.is_some_and(|summary| summary.lucky.is_some()),
            lucky_count: summary.map_or(0, |summary| {
                summary
                    .narration
                    .iter()
                    .filter(|line| line.starts_with("LUCKY!") && !line.contains("Dodged"))
                    .count()
            }),
            action_refused: summary.is_some_and(|summary| {
                matches!(
                    summary.action_outcome,
                    fortunary_game::ActionOutcome::InsufficientFunds { .. }
                )
            }),
            decision,
            message,
        }
    }
}
