//! Session state, the read-only snapshot, and the owning session object.
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::constants::{GOAL_ALT, GOAL_MAIN};
use crate::data::EventCatalog;
use crate::dice::{Dice, RngBundle};
use crate::ending::EndingRecord;
use crate::market::{MarketState, roll_market_state};
use crate::player::PlayerState;
use crate::route::RouteStats;
use crate::settings::ChallengeSettings;
use crate::turn::{TurnEngine, TurnReport, TurnStatus};

/// Goal texts shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalInfo {
    pub main: String,
    pub alt: String,
}

impl Default for GoalInfo {
    fn default() -> Self {
        Self {
            main: String::from(GOAL_MAIN),
            alt: String::from(GOAL_ALT),
        }
    }
}

/// Persistable state of one playthrough.
///
/// Only the turn pipeline and [`SessionState::update_settings`] mutate it.
/// Once `ending` is set it is never cleared or replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) seed: u64,
    pub(crate) player: PlayerState,
    pub(crate) market: MarketState,
    pub(crate) settings: ChallengeSettings,
    #[serde(default)]
    pub(crate) routes: RouteStats,
    #[serde(default)]
    pub(crate) salary_blocked: bool,
    #[serde(default)]
    pub(crate) log: Vec<String>,
    #[serde(default)]
    pub(crate) ending: Option<EndingRecord>,
    #[serde(default)]
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) goals: GoalInfo,
}

impl SessionState {
    /// Start a playthrough: roll the opening market and greet the player.
    pub fn new<D: Dice + ?Sized>(
        player: PlayerState,
        settings: ChallengeSettings,
        seed: u64,
        dice: &mut D,
    ) -> Self {
        let mut state = Self {
            seed,
            player,
            market: MarketState::default(),
            settings,
            routes: RouteStats::default(),
            salary_blocked: false,
            log: Vec::new(),
            ending: None,
            status: String::new(),
            goals: GoalInfo::default(),
        };
        state.reroll_market(dice);
        state
            .log
            .push(format!("FORTUNARY begins. Welcome, {}!", state.player.name()));
        state.log.push(format!("Main goal: {}", state.goals.main));
        state.log.push(format!("Bonus goal: {}", state.goals.alt));
        state
    }

    pub(crate) fn reroll_market<D: Dice + ?Sized>(&mut self, dice: &mut D) -> MarketState {
        self.market = roll_market_state(dice);
        self.log.push(format!("Market this month: {}", self.market));
        self.market
    }

    pub(crate) fn finish(&mut self, record: EndingRecord) {
        if self.ending.is_some() {
            return;
        }
        self.ending = Some(record);
        self.status = String::from(record.ending.description());
        self.log.push(record.banner());
    }

    /// Replace the challenge flags. Does not consume a month.
    pub fn update_settings(&mut self, settings: ChallengeSettings) {
        self.settings = settings;
        self.log.push(format!(
            "Financial settings changed: {}",
            self.settings.describe()
        ));
    }

    /// Re-apply clamping after deserialization.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.player = self.player.sanitized();
        self
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Mutable player access for staging scenarios. Has no effect on the
    /// ending record.
    pub const fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    #[must_use]
    pub const fn market(&self) -> MarketState {
        self.market
    }

    #[must_use]
    pub const fn settings(&self) -> &ChallengeSettings {
        &self.settings
    }

    #[must_use]
    pub const fn routes(&self) -> &RouteStats {
        &self.routes
    }

    #[must_use]
    pub const fn salary_blocked(&self) -> bool {
        self.salary_blocked
    }

    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    #[must_use]
    pub const fn ending(&self) -> Option<&EndingRecord> {
        self.ending.as_ref()
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.ending.is_some()
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub const fn goals(&self) -> &GoalInfo {
        &self.goals
    }

    /// Read-only view for rendering layers.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            name: self.player.name().to_string(),
            balance: self.player.balance(),
            health: self.player.health(),
            stress: self.player.stress(),
            luck: self.player.luck(),
            month: self.player.month(),
            market: self.market,
            market_description: self.market.description().to_string(),
            settings: self.settings,
            routes: self.routes,
            log: self.log.clone(),
            game_over: self.is_over(),
            ending_code: self.ending.map(|record| record.code().to_string()),
            ending_title: self.ending.map(|record| record.title().to_string()),
            route_label: self.ending.map(|record| record.route_label().to_string()),
            status: self.status.clone(),
            goals: self.goals.clone(),
        }
    }
}

/// Everything a caller may render after a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub name: String,
    pub balance: i64,
    pub health: i32,
    pub stress: i32,
    pub luck: i32,
    pub month: u32,
    pub market: MarketState,
    pub market_description: String,
    pub settings: ChallengeSettings,
    pub routes: RouteStats,
    pub log: Vec<String>,
    pub game_over: bool,
    pub ending_code: Option<String>,
    pub ending_title: Option<String>,
    pub route_label: Option<String>,
    pub status: String,
    pub goals: GoalInfo,
}

/// Owns one playthrough: state, catalog and random source.
#[derive(Debug, Clone)]
pub struct GameSession<D: Dice = RngBundle> {
    state: SessionState,
    catalog: EventCatalog,
    dice: D,
}

impl GameSession<RngBundle> {
    /// Fresh session driven by the production RNG bundle.
    #[must_use]
    pub fn seeded(
        name: impl Into<String>,
        settings: ChallengeSettings,
        catalog: EventCatalog,
        seed: u64,
    ) -> Self {
        Self::new(
            name,
            settings,
            catalog,
            seed,
            RngBundle::from_user_seed(seed),
        )
    }

    /// Deterministically reseed the random source.
    pub fn reseed(&mut self, seed: u64) {
        self.state.seed = seed;
        self.dice = RngBundle::from_user_seed(seed);
    }
}

impl<D: Dice> GameSession<D> {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        settings: ChallengeSettings,
        catalog: EventCatalog,
        seed: u64,
        mut dice: D,
    ) -> Self {
        let state = SessionState::new(PlayerState::new(name), settings, seed, &mut dice);
        Self {
            state,
            catalog,
            dice,
        }
    }

    /// Build a session around an existing state.
    #[must_use]
    pub fn from_state(state: SessionState, catalog: EventCatalog, dice: D) -> Self {
        Self {
            state: state.sanitized(),
            catalog,
            dice,
        }
    }

    /// Play one month with the given action token. Unknown tokens still run
    /// the month without an action effect.
    pub fn process_turn(&mut self, action: &str) -> TurnReport {
        self.process_action(Action::from_token(action))
    }

    /// Play one month with an already-parsed action.
    pub fn process_action(&mut self, action: Option<Action>) -> TurnReport {
        let summary = TurnEngine::new(&self.catalog, &mut self.dice).process(&mut self.state, action);
        match summary {
            Some(summary) => TurnReport {
                status: TurnStatus::Processed,
                message: self.state.status.clone(),
                summary: Some(summary),
                snapshot: self.state.snapshot(),
            },
            None => TurnReport::already_ended(self.state.snapshot()),
        }
    }

    pub fn update_settings(&mut self, settings: ChallengeSettings) {
        self.state.update_settings(settings);
    }

    /// Start over with the same name and settings.
    pub fn reset(&mut self) {
        let player = PlayerState::new(self.state.player.name());
        let settings = self.state.settings;
        let seed = self.state.seed;
        self.state = SessionState::new(player, settings, seed, &mut self.dice);
        log::debug!("session reset for {}", self.state.player.name());
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply a closure to the mutable state.
    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut self.state)
    }

    #[must_use]
    pub const fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub const fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Consume the session, returning the underlying state.
    #[must_use]
    pub fn into_state(self) -> SessionState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{DiceStream, ScriptedDice};
    use crate::ending::Ending;

    fn scripted_session() -> GameSession<ScriptedDice> {
        let dice = ScriptedDice::new().with_rolls(DiceStream::Market, [30]);
        GameSession::new("Ayu", ChallengeSettings::default(), EventCatalog::empty(), 1, dice)
    }

    #[test]
    fn new_session_logs_market_then_welcome() {
        let session = scripted_session();
        let log = session.state().log();
        assert_eq!(log[0], "Market this month: Sideways");
        assert_eq!(log[1], "FORTUNARY begins. Welcome, Ayu!");
        assert!(log[2].starts_with("Main goal:"));
        assert!(log[3].starts_with("Bonus goal:"));
        assert!(!session.is_over());
        assert!(session.snapshot().ending_code.is_none());
    }

    #[test]
    fn settings_update_logs_without_consuming_a_month() {
        let mut session = scripted_session();
        session.update_settings(ChallengeSettings::from_csv("debt,sideHustle"));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.month, 1);
        assert!(snapshot.settings.debt);
        assert_eq!(
            snapshot.log.last().map(String::as_str),
            Some("Financial settings changed: Monthly debt installment, Side hustle")
        );
    }

    #[test]
    fn unknown_tokens_still_advance_the_month() {
        let mut session = scripted_session();
        session.dice_mut().push_rolls(DiceStream::Lucky, [100]);
        let report = session.process_turn("dance");
        assert!(report.is_processed());
        assert_eq!(report.snapshot.month, 2);
        assert_eq!(report.snapshot.routes.total(), 0);
        assert!(report.snapshot.log.iter().any(|line| line == "No action was chosen."));
    }

    #[test]
    fn ending_fields_freeze_and_reset_starts_over() {
        let mut session = scripted_session();
        session.with_state_mut(|state| state.player_mut().set_balance(-5_000_000));
        let report = session.process_turn("save");
        assert_eq!(report.snapshot.ending_code.as_deref(), Some("BANKRUPT"));
        assert_eq!(report.snapshot.route_label.as_deref(), Some("Conservative Saver"));
        assert_eq!(report.message, Ending::Bankrupt.description());

        let frozen = session.state().clone();
        let again = session.process_turn("invest_high");
        assert_eq!(again.status, TurnStatus::AlreadyEnded);
        assert_eq!(session.state(), &frozen);

        session.reset();
        assert!(!session.is_over());
        assert_eq!(session.state().player().name(), "Ayu");
        assert_eq!(session.state().player().balance(), 1_200_000);
    }

    #[test]
    fn seeded_sessions_are_reproducible() {
        let play = |seed| {
            let mut session = GameSession::seeded("Seed", ChallengeSettings::all(), EventCatalog::empty(), seed);
            for _ in 0..6 {
                session.process_turn("invest_low");
            }
            session.into_state()
        };
        assert_eq!(play(77), play(77));
    }
}
