//! The fixed monthly pipeline.
//!
//! Income, expenses, the chosen action, one catalog pass, one lucky roll and
//! the ending check run in that order. When no ending fires the month
//! advances and the market is re-rolled; once an ending fires the state is
//! frozen and later turns are refused.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::actions::{Action, ActionOutcome, apply_action};
use crate::catalog::{CatalogOutcome, run_catalog_pass};
use crate::constants::{LOG_TURN_SEPARATOR, STATUS_ALREADY_ENDED};
use crate::data::EventCatalog;
use crate::dice::Dice;
use crate::ending::{EndingRecord, Evaluation, evaluate};
use crate::ledger::{ExpenseBreakdown, IncomeBreakdown, apply_expenses, apply_income};
use crate::lucky::{LuckyOutcome, roll_lucky_event};
use crate::market::MarketState;
use crate::session::{SessionSnapshot, SessionState};

/// Narration lines appended during one turn.
pub type TurnNarration = SmallVec<[String; 8]>;

/// Whether a turn call advanced the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Processed,
    AlreadyEnded,
}

/// Everything that happened during one processed month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSummary {
    /// Month the turn was played in.
    pub month: u32,
    pub market: MarketState,
    pub action: Option<Action>,
    pub income: IncomeBreakdown,
    pub expenses: ExpenseBreakdown,
    pub action_outcome: ActionOutcome,
    pub catalog: CatalogOutcome,
    pub lucky: Option<LuckyOutcome>,
    pub evaluation: Evaluation,
    /// Regime rolled for the following month, if the session continues.
    pub next_market: Option<MarketState>,
    pub narration: TurnNarration,
}

impl TurnSummary {
    /// Net balance change across the whole month.
    #[must_use]
    pub fn net_cash_flow(&self) -> i64 {
        let mut net = self.income.salary - self.expenses.total();
        net += self.expenses.side_hustle.unwrap_or(0);
        net += match &self.action_outcome {
            ActionOutcome::Saved { gain, .. } => *gain,
            ActionOutcome::InvestmentWon { action, profit } => profit - action.cost(),
            ActionOutcome::InvestmentLost { action, loss, .. } => -(action.cost() + loss),
            ActionOutcome::Entertained => -Action::Entertain.cost(),
            ActionOutcome::Trained => -Action::TrainSkill.cost(),
            ActionOutcome::NoAction | ActionOutcome::InsufficientFunds { .. } => 0,
        };
        net += self.catalog.fired.as_ref().map_or(0, |event| event.balance_delta);
        net += self.lucky.as_ref().map_or(0, |lucky| lucky.balance_delta);
        net
    }
}

/// Result of `process_turn`: status, per-turn detail and the post-turn view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub status: TurnStatus,
    pub message: String,
    pub summary: Option<TurnSummary>,
    pub snapshot: SessionSnapshot,
}

impl TurnReport {
    #[must_use]
    pub const fn is_processed(&self) -> bool {
        matches!(self.status, TurnStatus::Processed)
    }

    #[must_use]
    pub fn already_ended(snapshot: SessionSnapshot) -> Self {
        Self {
            status: TurnStatus::AlreadyEnded,
            message: String::from(STATUS_ALREADY_ENDED),
            summary: None,
            snapshot,
        }
    }
}

/// Orchestrates one month against a session state.
pub struct TurnEngine<'a, D: Dice + ?Sized> {
    catalog: &'a EventCatalog,
    dice: &'a mut D,
}

impl<'a, D: Dice + ?Sized> TurnEngine<'a, D> {
    pub const fn new(catalog: &'a EventCatalog, dice: &'a mut D) -> Self {
        Self { catalog, dice }
    }

    /// Run the pipeline. Returns `None` without touching `state` when the
    /// session has already ended.
    pub fn process(&mut self, state: &mut SessionState, action: Option<Action>) -> Option<TurnSummary> {
        if state.ending.is_some() {
            log::debug!("turn refused: session already ended");
            return None;
        }

        let log_start = state.log.len();
        let month = state.player.month();
        let market = state.market;
        state.log.push(String::from(LOG_TURN_SEPARATOR));
        state.log.push(format!("Month {month}"));

        let income = apply_income(
            &mut state.player,
            &state.settings,
            &mut state.salary_blocked,
            &mut *self.dice,
            &mut state.log,
        );
        let expenses = apply_expenses(&mut state.player, &state.settings, &mut *self.dice, &mut state.log);
        log::debug!(
            "month {month}: salary {} expenses {}",
            income.salary,
            expenses.total()
        );

        let action_outcome = apply_action(
            action,
            &mut state.player,
            market,
            &mut state.routes,
            &mut *self.dice,
            &mut state.log,
        );

        let catalog = run_catalog_pass(self.catalog, &mut state.player, &mut *self.dice, &mut state.log);
        if catalog.blocks_salary() {
            state.salary_blocked = true;
        }
        let lucky = roll_lucky_event(&mut state.player, &state.settings, &mut *self.dice, &mut state.log);

        let evaluation = evaluate(&state.player, &state.settings, &state.routes);
        let next_market = match evaluation {
            Evaluation::Ended(ending) => {
                let record = EndingRecord::new(ending, &state.routes);
                state.finish(record);
                log::info!(
                    "session ended in month {month}: {} ({})",
                    ending.code(),
                    record.route_label()
                );
                None
            }
            Evaluation::Continue => {
                state.player.next_month();
                Some(state.reroll_market(&mut *self.dice))
            }
        };

        let narration = state.log[log_start..].iter().cloned().collect();
        Some(TurnSummary {
            month,
            market,
            action,
            income,
            expenses,
            action_outcome,
            catalog,
            lucky,
            evaluation,
            next_market,
            narration,
        })
    }
}
