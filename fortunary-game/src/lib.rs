//! Fortunary Game Engine
//!
//! Platform-agnostic core logic for FORTUNARY, a 24-month personal-finance
//! game. Each turn runs a fixed pipeline (income, expenses, the chosen action,
//! one catalog event, one lucky event, the ending check) and the session
//! resolves into exactly one ending. Rendering, persistence transport and
//! asset loading stay with the caller.

pub mod actions;
pub mod catalog;
pub mod constants;
pub mod data;
pub mod dice;
pub mod ending;
pub mod ledger;
pub mod lucky;
pub mod market;
pub mod numbers;
pub mod player;
pub mod route;
pub mod session;
pub mod settings;
pub mod turn;

// Re-export commonly used types
pub use actions::{Action, ActionOutcome, apply_action, win_chance};
pub use catalog::{CatalogOutcome, FiredEvent, avoid_chance, effective_chance, run_catalog_pass};
pub use constants::HORIZON_MONTHS;
pub use data::{CatalogError, EventCatalog, EventDefinition, EventKind};
pub use dice::{
    CountingRng, Dice, DiceStream, RngBundle, ScriptedDice, SingleStreamDice, seed_from_phrase,
};
pub use ending::{Ending, EndingRecord, Evaluation, evaluate};
pub use ledger::{ExpenseBreakdown, IncomeBreakdown, apply_expenses, apply_income, inflation_for};
pub use lucky::{LuckyKind, LuckyOutcome, lucky_chance, roll_lucky_event};
pub use market::{MarketState, roll_market_state};
pub use numbers::format_money;
pub use player::PlayerState;
pub use route::{DominantRoute, RouteCategory, RouteStats};
pub use session::{GameSession, GoalInfo, SessionSnapshot, SessionState};
pub use settings::{Challenge, ChallengeSettings};
pub use turn::{TurnEngine, TurnNarration, TurnReport, TurnStatus, TurnSummary};

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the random-event catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or parsed.
    fn load_event_catalog(&self) -> Result<EventCatalog, Self::Error>;
}

/// Trait for abstracting save/load operations
/// Platform-specific implementations should provide this
pub trait SessionStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save session state
    ///
    /// # Errors
    ///
    /// Returns an error if the session state cannot be saved.
    fn save_session(&self, session_id: &str, state: &SessionState) -> Result<(), Self::Error>;

    /// Load session state
    ///
    /// # Errors
    ///
    /// Returns an error if the session state cannot be loaded.
    fn load_session(&self, session_id: &str) -> Result<Option<SessionState>, Self::Error>;

    /// Delete a saved session
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_session(&self, session_id: &str) -> Result<(), Self::Error>;
}

/// Main game engine for managing sessions
pub struct GameEngine<L, S>
where
    L: DataLoader,
    S: SessionStorage,
{
    data_loader: L,
    storage: S,
}

impl<L, S> GameEngine<L, S>
where
    L: DataLoader,
    S: SessionStorage,
{
    /// Create a new game engine with the provided data loader and storage
    pub const fn new(data_loader: L, storage: S) -> Self {
        Self {
            data_loader,
            storage,
        }
    }

    /// Load the catalog, degrading to an empty one when the loader fails.
    #[must_use]
    pub fn event_catalog(&self) -> EventCatalog {
        self.data_loader.load_event_catalog().unwrap_or_else(|err| {
            log::warn!("event catalog unavailable, continuing without random events: {err}");
            EventCatalog::empty()
        })
    }

    /// Start a new session for `name` with the given challenges and seed.
    #[must_use]
    pub fn create_session(
        &self,
        name: &str,
        settings: ChallengeSettings,
        seed: u64,
    ) -> GameSession {
        GameSession::seeded(name, settings, self.event_catalog(), seed)
    }

    /// Save a session state
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be saved.
    pub fn save_session(&self, session_id: &str, state: &SessionState) -> Result<(), S::Error> {
        self.storage.save_session(session_id, state)
    }

    /// Load a session, rehydrating it with a fresh catalog and random source.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn load_session(&self, session_id: &str) -> Result<Option<GameSession>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let Some(state) = self.storage.load_session(session_id).map_err(Into::into)? else {
            return Ok(None);
        };
        let dice = RngBundle::from_user_seed(resume_seed(&state));
        Ok(Some(GameSession::from_state(state, self.event_catalog(), dice)))
    }

    /// Delete a saved session
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn delete_session(&self, session_id: &str) -> Result<(), S::Error> {
        self.storage.delete_session(session_id)
    }
}

/// Seed for a resumed session so it does not replay the opening draws.
fn resume_seed(state: &SessionState) -> u64 {
    let progress = (u64::from(state.player().month()) << 32) | state.log().len() as u64;
    state.seed() ^ progress.rotate_left(17)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl DataLoader for FixtureLoader {
        type Error = Infallible;

        fn load_event_catalog(&self) -> Result<EventCatalog, Self::Error> {
            Ok(EventCatalog::from_json_or_empty(
                r#"[{"name": "Gift", "chance": 10, "type": "bonus", "reward": 50000}]"#,
            ))
        }
    }

    #[derive(Clone, Copy, Default)]
    struct BrokenLoader;

    impl DataLoader for BrokenLoader {
        type Error = CatalogError;

        fn load_event_catalog(&self) -> Result<EventCatalog, Self::Error> {
            EventCatalog::from_json("{broken")
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStorage {
        saves: Rc<RefCell<HashMap<String, SessionState>>>,
    }

    impl SessionStorage for MemoryStorage {
        type Error = Infallible;

        fn save_session(&self, session_id: &str, state: &SessionState) -> Result<(), Self::Error> {
            self.saves
                .borrow_mut()
                .insert(session_id.to_string(), state.clone());
            Ok(())
        }

        fn load_session(&self, session_id: &str) -> Result<Option<SessionState>, Self::Error> {
            Ok(self.saves.borrow().get(session_id).cloned())
        }

        fn delete_session(&self, session_id: &str) -> Result<(), Self::Error> {
            self.saves.borrow_mut().remove(session_id);
            Ok(())
        }
    }

    #[test]
    fn engine_creates_and_roundtrips_state() {
        let engine = GameEngine::new(FixtureLoader, MemoryStorage::default());
        let mut session = engine.create_session("Dewi", ChallengeSettings::default(), 0xABCD);
        assert_eq!(session.catalog().len(), 1);
        session.process_turn("save");
        session.with_state_mut(|state| state.player_mut().set_balance(2_500_000));
        let state = session.into_state();
        engine.save_session("slot-one", &state).unwrap();

        let loaded = engine.load_session("slot-one").unwrap().expect("save exists");
        assert_eq!(loaded.state(), &state);
        assert_eq!(loaded.catalog().len(), 1);
        assert!(engine.load_session("missing-slot").unwrap().is_none());

        engine.delete_session("slot-one").unwrap();
        assert!(engine.load_session("slot-one").unwrap().is_none());
    }

    #[test]
    fn loader_failures_degrade_to_an_empty_catalog() {
        let engine = GameEngine::new(BrokenLoader, MemoryStorage::default());
        let session = engine.create_session("Budi", ChallengeSettings::all(), 9);
        assert!(session.catalog().is_empty());
        assert_eq!(session.state().player().month(), 1);
    }
}
