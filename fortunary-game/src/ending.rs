//! Ending classification.
//!
//! [`evaluate`] is a pure threshold machine over the post-event state. The
//! first matching rule in priority order wins; no match means the session
//! continues.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    BANKRUPT_BALANCE, DEBT_CLEAR_BALANCE, DEBT_CLEAR_STRESS, EARLY_RETIRE_BALANCE,
    EARLY_RETIRE_HEALTH, EARLY_RETIRE_MONTH_LIMIT, EARLY_RETIRE_STRESS, FIN_FREE_BALANCE,
    FIN_FREE_HEALTH, FIN_FREE_STRESS, HARDMODE_CHALLENGES, HEALTHY_GROWTH_HEALTH,
    HORIZON_MONTHS, HUSTLE_MASTER_DISCIPLINE, HUSTLE_MASTER_LUCK, HUSTLE_MASTER_STRESS,
    INFLATION_TAMER_BALANCE, STAT_MAX, STAT_MIN, SURVIVE_BALANCE,
};
use crate::player::PlayerState;
use crate::route::{DominantRoute, RouteStats};
use crate::settings::ChallengeSettings;

/// Possible session endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ending {
    /// Balance fell to the bankruptcy floor.
    Bankrupt,
    /// Health reached zero.
    Burnout,
    /// Stress maxed out.
    StressOut,
    /// Rich and healthy ahead of schedule.
    EarlyRetire,
    /// Financial freedom with at least three challenges active.
    ChampionHardmode,
    DebtClear,
    InflationTamer,
    HealthyGrowth,
    HustleMaster,
    /// Plain financial freedom.
    FinFree,
    VolatilitySurvivor,
    Survive,
    Drift,
}

impl Ending {
    pub const ALL: [Self; 13] = [
        Self::Bankrupt,
        Self::Burnout,
        Self::StressOut,
        Self::EarlyRetire,
        Self::ChampionHardmode,
        Self::DebtClear,
        Self::InflationTamer,
        Self::HealthyGrowth,
        Self::HustleMaster,
        Self::FinFree,
        Self::VolatilitySurvivor,
        Self::Survive,
        Self::Drift,
    ];

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Bankrupt => "BANKRUPT",
            Self::Burnout => "BURNOUT",
            Self::StressOut => "STRESS_OUT",
            Self::EarlyRetire => "EARLY_RETIRE",
            Self::ChampionHardmode => "CHAMPION_HARDMODE",
            Self::DebtClear => "DEBT_CLEAR",
            Self::InflationTamer => "INFLATION_TAMER",
            Self::HealthyGrowth => "HEALTHY_GROWTH",
            Self::HustleMaster => "HUSTLE_MASTER",
            Self::FinFree => "FIN_FREE",
            Self::VolatilitySurvivor => "VOLATILITY_SURVIVOR",
            Self::Survive => "SURVIVE",
            Self::Drift => "DRIFT",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Bankrupt => "Deep Bankruptcy",
            Self::Burnout => "Total Burnout",
            Self::StressOut => "Mental Collapse",
            Self::EarlyRetire => "Early Retirement",
            Self::ChampionHardmode => "Challenge Mode Champion",
            Self::DebtClear => "Installment Free!",
            Self::InflationTamer => "Inflation Tamer",
            Self::HealthyGrowth => "Healthy & Resilient",
            Self::HustleMaster => "Hustle Master",
            Self::FinFree => "Stable & In Control",
            Self::VolatilitySurvivor => "Rollercoaster Survivor",
            Self::Survive => "Surviving, Not Yet Free",
            Self::Drift => "Financially Adrift",
        }
    }

    /// Status message shown once the session ends.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Bankrupt => {
                "Your balance dropped below -500,000. The debt load grew too heavy."
            }
            Self::Burnout => "You pushed yourself until health hit 0. Balance matters.",
            Self::StressOut => "Stress peaked. Financial pressure broke your mind.",
            Self::EarlyRetire => {
                "Financial freedom ahead of schedule and in top shape. Special ending!"
            }
            Self::ChampionHardmode => {
                "At least three challenges were active and you still reached financial freedom."
            }
            Self::DebtClear => "Financially stable despite a monthly debt installment.",
            Self::InflationTamer => "High inflation could not stop you from reaching the target.",
            Self::HealthyGrowth => "Financial target reached while keeping your health excellent.",
            Self::HustleMaster => {
                "A steady side hustle paid off thanks to skill and discipline."
            }
            Self::FinFree => {
                "Main goal reached: strong balance, decent health, stress under control."
            }
            Self::VolatilitySurvivor => {
                "With a volatile job you lasted to the end and kept a positive balance."
            }
            Self::Survive => {
                "You lasted 24 months without collapsing, but you are not financially free yet."
            }
            Self::Drift => "24 months went by. A more disciplined strategy is needed next time.",
        }
    }

    /// Whether the ending counts as reaching a financial goal.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(
            self,
            Self::EarlyRetire
                | Self::ChampionHardmode
                | Self::DebtClear
                | Self::InflationTamer
                | Self::HealthyGrowth
                | Self::HustleMaster
                | Self::FinFree
        )
    }

    /// Parse a stable code back into an ending.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ending| ending.code() == code)
    }
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of the end-of-turn check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "ending", rename_all = "snake_case")]
pub enum Evaluation {
    Continue,
    Ended(Ending),
}

impl Evaluation {
    #[must_use]
    pub const fn ending(self) -> Option<Ending> {
        match self {
            Self::Continue => None,
            Self::Ended(ending) => Some(ending),
        }
    }
}

/// Immutable record of how a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingRecord {
    pub ending: Ending,
    pub route: DominantRoute,
}

impl EndingRecord {
    #[must_use]
    pub fn new(ending: Ending, routes: &RouteStats) -> Self {
        Self {
            ending,
            route: routes.dominant(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.ending.code()
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.ending.title()
    }

    #[must_use]
    pub const fn route_label(&self) -> &'static str {
        self.route.label()
    }

    /// Narration line appended when the session ends.
    #[must_use]
    pub fn banner(&self) -> String {
        format!("=== ENDING: {} ({}) ===", self.title(), self.route_label())
    }
}

/// Classify the state after a turn's events.
#[must_use]
pub fn evaluate(player: &PlayerState, settings: &ChallengeSettings, routes: &RouteStats) -> Evaluation {
    let balance = player.balance();
    let health = player.health();
    let stress = player.stress();
    let month = player.month();

    if balance <= BANKRUPT_BALANCE {
        return Evaluation::Ended(Ending::Bankrupt);
    }
    if health <= STAT_MIN {
        return Evaluation::Ended(Ending::Burnout);
    }
    if stress >= STAT_MAX {
        return Evaluation::Ended(Ending::StressOut);
    }

    if month <= EARLY_RETIRE_MONTH_LIMIT
        && balance >= EARLY_RETIRE_BALANCE
        && health >= EARLY_RETIRE_HEALTH
        && stress <= EARLY_RETIRE_STRESS
    {
        return Evaluation::Ended(Ending::EarlyRetire);
    }

    let meets_fin_free = balance >= FIN_FREE_BALANCE
        && health >= FIN_FREE_HEALTH
        && stress <= FIN_FREE_STRESS
        && month <= HORIZON_MONTHS;
    if meets_fin_free {
        return Evaluation::Ended(classify_freedom(player, settings, routes));
    }

    if month >= HORIZON_MONTHS {
        let ending = if settings.volatile_job && balance > 0 {
            Ending::VolatilitySurvivor
        } else if balance >= SURVIVE_BALANCE {
            Ending::Survive
        } else {
            Ending::Drift
        };
        return Evaluation::Ended(ending);
    }

    Evaluation::Continue
}

fn classify_freedom(player: &PlayerState, settings: &ChallengeSettings, routes: &RouteStats) -> Ending {
    let balance = player.balance();
    let stress = player.stress();

    if settings.active_count() >= HARDMODE_CHALLENGES {
        Ending::ChampionHardmode
    } else if settings.debt && balance >= DEBT_CLEAR_BALANCE && stress <= DEBT_CLEAR_STRESS {
        Ending::DebtClear
    } else if settings.high_inflation && balance >= INFLATION_TAMER_BALANCE {
        Ending::InflationTamer
    } else if settings.medical_risk && player.health() >= HEALTHY_GROWTH_HEALTH {
        Ending::HealthyGrowth
    } else if settings.side_hustle
        && player.luck() >= HUSTLE_MASTER_LUCK
        && stress <= HUSTLE_MASTER_STRESS
        && routes.train_skill.saturating_add(routes.save) >= HUSTLE_MASTER_DISCIPLINE
    {
        Ending::HustleMaster
    } else {
        Ending::FinFree
    }
}
