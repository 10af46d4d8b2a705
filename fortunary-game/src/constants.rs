//! Centralized balance and tuning constants for Fortunary game logic.
//!
//! These values define the deterministic math for the monthly pipeline.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets. Only the event catalog is supplied from outside.

// Player start -------------------------------------------------------------
pub const DEFAULT_PLAYER_NAME: &str = "Player";
pub const START_BALANCE: i64 = 1_200_000;
pub const START_HEALTH: i32 = 80;
pub const START_STRESS: i32 = 20;
pub const START_LUCK: i32 = 50;
pub const START_MONTH: u32 = 1;
pub const STAT_MIN: i32 = 0;
pub const STAT_MAX: i32 = 100;

// Percent rolls --------------------------------------------------------------
pub(crate) const PERCENT_ROLL_MIN: i64 = 1;
pub(crate) const PERCENT_ROLL_MAX: i64 = 100;

// Market -------------------------------------------------------------------
pub(crate) const MARKET_CRASH_CEILING: i64 = 7;
pub(crate) const MARKET_BEARISH_CEILING: i64 = 22;
pub(crate) const MARKET_SIDEWAYS_CEILING: i64 = 62;
pub(crate) const MARKET_BULLISH_CEILING: i64 = 87;

// Income -------------------------------------------------------------------
pub(crate) const BASE_SALARY: i64 = 600_000;
pub(crate) const VOLATILE_SHIFT_MIN_PCT: i64 = -15;
pub(crate) const VOLATILE_SHIFT_MAX_PCT: i64 = 20;
pub(crate) const HIGH_STRESS_THRESHOLD: i32 = 80;
pub(crate) const HIGH_STRESS_SALARY_PCT: i64 = 90;

// Expenses -----------------------------------------------------------------
pub(crate) const BASE_EXPENSES: i64 = 280_000;
pub(crate) const INFLATION_PER_MONTH: i64 = 10_000;
pub(crate) const HIGH_INFLATION_FACTOR_TENTHS: i64 = 14;
pub(crate) const RANDOM_EXTRA_MIN: i64 = 10_000;
pub(crate) const RANDOM_EXTRA_MAX: i64 = 30_000;
pub(crate) const DEBT_INSTALLMENT: i64 = 90_000;
pub(crate) const MEDICAL_EXTRA: i64 = 40_000;
pub(crate) const MEDICAL_HEALTH_THRESHOLD: i32 = 60;
pub(crate) const SIDE_HUSTLE_CHANCE: i64 = 80;
pub(crate) const SIDE_HUSTLE_MIN: i64 = 120_000;
pub(crate) const SIDE_HUSTLE_MAX: i64 = 220_000;
pub(crate) const SIDE_HUSTLE_STRESS_HIT: i32 = 3;
pub(crate) const SIDE_HUSTLE_STRESS_MISS: i32 = 1;

// Actions ------------------------------------------------------------------
pub(crate) const SAVE_RATE_MIN_PCT: i64 = 2;
pub(crate) const SAVE_RATE_MAX_PCT: i64 = 4;
pub(crate) const SAVE_STRESS: i32 = -5;
pub(crate) const SAVE_LUCK: i32 = 1;

pub(crate) const INVEST_LOW_COST: i64 = 200_000;
pub(crate) const INVEST_LOW_BASE_WIN: i32 = 70;
pub(crate) const INVEST_LOW_LUCK_DIVISOR: i32 = 10;
pub(crate) const INVEST_LOW_LOSS_MIN_PCT: i64 = 2;
pub(crate) const INVEST_LOW_LOSS_MAX_PCT: i64 = 7;
pub(crate) const INVEST_LOW_LOSS_STRESS: i32 = 5;

pub(crate) const INVEST_HIGH_COST: i64 = 260_000;
pub(crate) const INVEST_HIGH_BASE_WIN: i32 = 50;
pub(crate) const INVEST_HIGH_LUCK_DIVISOR: i32 = 15;
pub(crate) const INVEST_HIGH_WIN_STRESS: i32 = 10;
pub(crate) const INVEST_HIGH_LOSS_MIN_PCT: i64 = 25;
pub(crate) const INVEST_HIGH_LOSS_MAX_PCT: i64 = 70;
pub(crate) const INVEST_HIGH_LOSS_STRESS: i32 = 14;

pub(crate) const WIN_CHANCE_MIN: i32 = 5;
pub(crate) const WIN_CHANCE_MAX: i32 = 95;

pub(crate) const ENTERTAIN_COST: i64 = 100_000;
pub(crate) const ENTERTAIN_STRESS: i32 = -22;
pub(crate) const ENTERTAIN_HEALTH: i32 = 5;

pub(crate) const TRAIN_COST: i64 = 180_000;
pub(crate) const TRAIN_LUCK: i32 = 8;
pub(crate) const TRAIN_STRESS: i32 = 9;

// Catalog events -----------------------------------------------------------
pub(crate) const CATALOG_EVENTS_PER_MONTH: usize = 1;
pub(crate) const BONUS_LUCK_DIVISOR: i32 = 12;
pub(crate) const MAJOR_LUCK_SHIELD_THRESHOLD: i32 = 40;
pub(crate) const MAJOR_LUCK_SHIELD_PENALTY: i32 = 10;
pub(crate) const MAJOR_AVOID_LUCK_DIVISOR: i32 = 2;
pub(crate) const EVENT_CHANCE_MIN: i32 = 1;
pub(crate) const EVENT_CHANCE_MAX: i32 = 100;

// Lucky events -------------------------------------------------------------
pub(crate) const LUCKY_BASE_CHANCE: i32 = 12;
pub(crate) const LUCKY_LUCK_DIVISOR: i32 = 8;
pub(crate) const LUCKY_DEBT_PENALTY: i32 = 1;
pub(crate) const LUCKY_CHANCE_MIN: i32 = 5;
pub(crate) const LUCKY_CHANCE_MAX: i32 = 40;
pub(crate) const LUCKY_WINDFALL_MIN: i64 = 90_000;
pub(crate) const LUCKY_WINDFALL_MAX: i64 = 260_000;
pub(crate) const LUCKY_WINDFALL_STRESS: i32 = -3;
pub(crate) const LUCKY_RELIEF_STRESS: i32 = -20;
pub(crate) const LUCKY_RELIEF_HEALTH: i32 = 4;
pub(crate) const LUCKY_LOTTERY_CASH: i64 = 320_000;
pub(crate) const LUCKY_LOTTERY_LUCK: i32 = 7;
pub(crate) const LUCKY_BILL_CUT_CASH: i64 = 100_000;
pub(crate) const LUCKY_SIDE_PROJECT_CASH: i64 = 220_000;
pub(crate) const LUCKY_SIDE_PROJECT_STRESS: i32 = -4;
pub(crate) const LUCKY_VOUCHER_CASH: i64 = 150_000;

// Endings ------------------------------------------------------------------
pub const HORIZON_MONTHS: u32 = 24;
pub(crate) const BANKRUPT_BALANCE: i64 = -500_000;
pub(crate) const EARLY_RETIRE_MONTH_LIMIT: u32 = 18;
pub(crate) const EARLY_RETIRE_BALANCE: i64 = 20_000_000;
pub(crate) const EARLY_RETIRE_HEALTH: i32 = 60;
pub(crate) const EARLY_RETIRE_STRESS: i32 = 65;
pub(crate) const FIN_FREE_BALANCE: i64 = 15_000_000;
pub(crate) const FIN_FREE_HEALTH: i32 = 50;
pub(crate) const FIN_FREE_STRESS: i32 = 70;
pub(crate) const HARDMODE_CHALLENGES: usize = 3;
pub(crate) const DEBT_CLEAR_BALANCE: i64 = 12_000_000;
pub(crate) const DEBT_CLEAR_STRESS: i32 = 75;
pub(crate) const INFLATION_TAMER_BALANCE: i64 = 10_000_000;
pub(crate) const HEALTHY_GROWTH_HEALTH: i32 = 70;
pub(crate) const HUSTLE_MASTER_LUCK: i32 = 60;
pub(crate) const HUSTLE_MASTER_STRESS: i32 = 80;
pub(crate) const HUSTLE_MASTER_DISCIPLINE: u32 = 5;
pub(crate) const SURVIVE_BALANCE: i64 = 10_000_000;

// Narration ----------------------------------------------------------------
pub(crate) const LOG_TURN_SEPARATOR: &str = "------------------------------";
pub(crate) const STATUS_ALREADY_ENDED: &str =
    "FORTUNARY has already ended. Reset to play again.";
pub(crate) const GOAL_MAIN: &str = "Within 24 months, reach a balance of at least 15,000,000 with Health >= 50 and Stress <= 70.";
pub(crate) const GOAL_ALT: &str = "Special ending: by month 18, reach a balance of at least 20,000,000 with Health >= 60 and Stress <= 65.";
