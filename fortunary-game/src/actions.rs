//! The five monthly player actions.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::constants::{
    ENTERTAIN_COST, ENTERTAIN_HEALTH, ENTERTAIN_STRESS, INVEST_HIGH_BASE_WIN, INVEST_HIGH_COST,
    INVEST_HIGH_LOSS_MAX_PCT, INVEST_HIGH_LOSS_MIN_PCT, INVEST_HIGH_LOSS_STRESS,
    INVEST_HIGH_LUCK_DIVISOR, INVEST_HIGH_WIN_STRESS, INVEST_LOW_BASE_WIN, INVEST_LOW_COST,
    INVEST_LOW_LOSS_MAX_PCT, INVEST_LOW_LOSS_MIN_PCT, INVEST_LOW_LOSS_STRESS,
    INVEST_LOW_LUCK_DIVISOR, SAVE_LUCK, SAVE_RATE_MAX_PCT, SAVE_RATE_MIN_PCT, SAVE_STRESS,
    TRAIN_COST, TRAIN_LUCK, TRAIN_STRESS, WIN_CHANCE_MAX, WIN_CHANCE_MIN,
};
use crate::dice::{Dice, DiceStream};
use crate::market::MarketState;
use crate::numbers::{floor_div, format_money, percent_floor};
use crate::player::PlayerState;
use crate::route::{RouteCategory, RouteStats};

/// Action chosen by the player for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Save,
    InvestLow,
    InvestHigh,
    Entertain,
    TrainSkill,
}

impl Action {
    pub const ALL: [Self; 5] = [
        Self::Save,
        Self::InvestLow,
        Self::InvestHigh,
        Self::Entertain,
        Self::TrainSkill,
    ];

    /// Parse an action token. Anything unrecognized yields `None`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.token() == token.trim())
    }

    #[must_use]
    pub const fn token(self) -> &'static str {
        self.route().key()
    }

    #[must_use]
    pub const fn route(self) -> RouteCategory {
        match self {
            Self::Save => RouteCategory::Save,
            Self::InvestLow => RouteCategory::InvestLow,
            Self::InvestHigh => RouteCategory::InvestHigh,
            Self::Entertain => RouteCategory::Entertain,
            Self::TrainSkill => RouteCategory::TrainSkill,
        }
    }

    /// Up-front cost; `0` for saving.
    #[must_use]
    pub const fn cost(self) -> i64 {
        match self {
            Self::Save => 0,
            Self::InvestLow => INVEST_LOW_COST,
            Self::InvestHigh => INVEST_HIGH_COST,
            Self::Entertain => ENTERTAIN_COST,
            Self::TrainSkill => TRAIN_COST,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Save => "Save",
            Self::InvestLow => "Low-risk investment",
            Self::InvestHigh => "High-risk investment",
            Self::Entertain => "Entertainment",
            Self::TrainSkill => "Financial training",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// What the chosen action did this month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The token named no action.
    NoAction,
    /// A priced action was skipped for lack of funds.
    InsufficientFunds { action: Action, cost: i64 },
    Saved { rate_pct: i64, gain: i64 },
    InvestmentWon { action: Action, profit: i64 },
    InvestmentLost { action: Action, loss_pct: i64, loss: i64 },
    Entertained,
    Trained,
}

struct InvestProfile {
    cost: i64,
    base_win: i32,
    luck_divisor: i32,
    loss_pct: RangeInclusive<i64>,
    win_stress: i32,
    loss_stress: i32,
}

const fn invest_profile(action: Action) -> Option<InvestProfile> {
    match action {
        Action::InvestLow => Some(InvestProfile {
            cost: INVEST_LOW_COST,
            base_win: INVEST_LOW_BASE_WIN,
            luck_divisor: INVEST_LOW_LUCK_DIVISOR,
            loss_pct: INVEST_LOW_LOSS_MIN_PCT..=INVEST_LOW_LOSS_MAX_PCT,
            win_stress: 0,
            loss_stress: INVEST_LOW_LOSS_STRESS,
        }),
        Action::InvestHigh => Some(InvestProfile {
            cost: INVEST_HIGH_COST,
            base_win: INVEST_HIGH_BASE_WIN,
            luck_divisor: INVEST_HIGH_LUCK_DIVISOR,
            loss_pct: INVEST_HIGH_LOSS_MIN_PCT..=INVEST_HIGH_LOSS_MAX_PCT,
            win_stress: INVEST_HIGH_WIN_STRESS,
            loss_stress: INVEST_HIGH_LOSS_STRESS,
        }),
        _ => None,
    }
}

/// Win chance for an investment action, or `None` for other actions.
#[must_use]
pub fn win_chance(action: Action, luck: i32, market: MarketState) -> Option<i64> {
    let profile = invest_profile(action)?;
    let raw = profile
        .base_win
        .saturating_add(floor_div(luck, profile.luck_divisor))
        .saturating_add(market.market_adjust());
    Some(i64::from(raw.clamp(WIN_CHANCE_MIN, WIN_CHANCE_MAX)))
}

/// Apply the chosen action and record its route.
///
/// The route is recorded before the balance check, so a refused purchase still
/// counts toward the player's play style.
pub fn apply_action<D: Dice + ?Sized>(
    action: Option<Action>,
    player: &mut PlayerState,
    market: MarketState,
    routes: &mut RouteStats,
    dice: &mut D,
    log: &mut Vec<String>,
) -> ActionOutcome {
    let Some(action) = action else {
        log.push(String::from("No action was chosen."));
        return ActionOutcome::NoAction;
    };
    routes.record(action.route());

    let cost = action.cost();
    if cost > 0 && player.balance() < cost {
        log.push(format!(
            "Insufficient balance for {} (needs {}).",
            action.label(),
            format_money(cost)
        ));
        return ActionOutcome::InsufficientFunds { action, cost };
    }

    match action {
        Action::Save => save(player, dice, log),
        Action::InvestLow | Action::InvestHigh => invest(action, player, market, dice, log),
        Action::Entertain => {
            player.add_balance(-cost);
            player.add_stress(ENTERTAIN_STRESS);
            player.add_health(ENTERTAIN_HEALTH);
            log.push(String::from("Entertainment: stress drops sharply, health rises."));
            ActionOutcome::Entertained
        }
        Action::TrainSkill => {
            player.add_balance(-cost);
            player.add_luck(TRAIN_LUCK);
            player.add_stress(TRAIN_STRESS);
            log.push(format!(
                "Financial training: Luck +{TRAIN_LUCK}, Stress +{TRAIN_STRESS}."
            ));
            ActionOutcome::Trained
        }
    }
}

fn save<D: Dice + ?Sized>(player: &mut PlayerState, dice: &mut D, log: &mut Vec<String>) -> ActionOutcome {
    let rate_pct = dice.roll(DiceStream::Action, SAVE_RATE_MIN_PCT, SAVE_RATE_MAX_PCT);
    let gain = percent_floor(player.balance(), rate_pct);
    player.add_balance(gain);
    player.add_stress(SAVE_STRESS);
    player.add_luck(SAVE_LUCK);
    log.push(format!("SAVE: {rate_pct}% interest -> +{}", format_money(gain)));
    ActionOutcome::Saved { rate_pct, gain }
}

fn invest<D: Dice + ?Sized>(
    action: Action,
    player: &mut PlayerState,
    market: MarketState,
    dice: &mut D,
    log: &mut Vec<String>,
) -> ActionOutcome {
    let (Some(profile), Some(chance)) = (
        invest_profile(action),
        win_chance(action, player.luck(), market),
    ) else {
        return ActionOutcome::NoAction;
    };

    player.add_balance(-profile.cost);
    log.push(format!("{}: -{}", action.label(), format_money(profile.cost)));

    let roll = dice.percent(DiceStream::Action);
    if roll <= chance {
        let range = match action {
            Action::InvestHigh => market.high_risk_profit_pct(),
            _ => market.low_risk_profit_pct(),
        };
        let margin = dice.roll(DiceStream::Action, *range.start(), *range.end());
        let profit = percent_floor(profile.cost, 100 + margin);
        player.add_balance(profit);
        player.add_stress(profile.win_stress);
        log.push(format!(
            "{} PROFIT: +{} (market: {market}).",
            action.label(),
            format_money(profit)
        ));
        log::debug!("action: {action} won (roll {roll} <= {chance}, margin {margin}%)");
        ActionOutcome::InvestmentWon { action, profit }
    } else {
        let loss_pct = dice.roll(
            DiceStream::Action,
            *profile.loss_pct.start(),
            *profile.loss_pct.end(),
        );
        let loss = percent_floor(profile.cost, loss_pct);
        player.add_balance(-loss);
        player.add_stress(profile.loss_stress);
        log.push(format!(
            "{} LOSS {loss_pct}%: -{}.",
            action.label(),
            format_money(loss)
        ));
        log::debug!("action: {action} lost (roll {roll} > {chance})");
        ActionOutcome::InvestmentLost {
            action,
            loss_pct,
            loss,
        }
    }
}
