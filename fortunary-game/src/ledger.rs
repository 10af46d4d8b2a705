//! Monthly income and fixed outgoings.
use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_EXPENSES, BASE_SALARY, DEBT_INSTALLMENT, HIGH_INFLATION_FACTOR_TENTHS,
    HIGH_STRESS_SALARY_PCT, HIGH_STRESS_THRESHOLD, INFLATION_PER_MONTH, MEDICAL_EXTRA,
    MEDICAL_HEALTH_THRESHOLD, RANDOM_EXTRA_MAX, RANDOM_EXTRA_MIN, SIDE_HUSTLE_CHANCE, SIDE_HUSTLE_MAX, SIDE_HUSTLE_MIN,
    SIDE_HUSTLE_STRESS_HIT, SIDE_HUSTLE_STRESS_MISS, VOLATILE_SHIFT_MAX_PCT,
    VOLATILE_SHIFT_MIN_PCT,
};
use crate::dice::{Dice, DiceStream};
use crate::numbers::{format_money, percent_floor, tenths_floor};
use crate::player::PlayerState;
use crate::settings::ChallengeSettings;

/// Salary side of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    /// Amount credited to the balance.
    pub salary: i64,
    /// Salary was withheld by a layoff event.
    pub blocked: bool,
    /// Percent shift applied by a volatile job.
    pub volatile_shift_pct: Option<i64>,
    /// Salary was cut for high stress.
    pub stress_penalty: bool,
}

/// Mandatory spending plus the optional side hustle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub base: i64,
    pub inflation: i64,
    pub random_extra: i64,
    pub debt: i64,
    pub medical: i64,
    /// Side-hustle income, if the hustle paid this month.
    pub side_hustle: Option<i64>,
}

impl ExpenseBreakdown {
    /// Total debited from the balance.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.base + self.inflation + self.random_extra + self.debt + self.medical
    }
}

/// Inflation surcharge for a given month.
#[must_use]
pub const fn inflation_for(month: u32, high_inflation: bool) -> i64 {
    let elapsed = month.saturating_sub(1) as i64;
    let inflation = INFLATION_PER_MONTH.saturating_mul(elapsed);
    if high_inflation {
        tenths_floor(inflation, HIGH_INFLATION_FACTOR_TENTHS)
    } else {
        inflation
    }
}

/// Credit this month's salary. `salary_blocked` is consumed.
pub fn apply_income<D: Dice + ?Sized>(
    player: &mut PlayerState,
    settings: &ChallengeSettings,
    salary_blocked: &mut bool,
    dice: &mut D,
    log: &mut Vec<String>,
) -> IncomeBreakdown {
    if *salary_blocked {
        *salary_blocked = false;
        log.push(String::from("Temporarily laid off. No salary this month."));
        return IncomeBreakdown {
            blocked: true,
            ..IncomeBreakdown::default()
        };
    }

    let mut breakdown = IncomeBreakdown::default();
    let mut salary = BASE_SALARY;
    if settings.volatile_job {
        let shift = dice.roll(DiceStream::Ledger, VOLATILE_SHIFT_MIN_PCT, VOLATILE_SHIFT_MAX_PCT);
        salary = salary.saturating_add(percent_floor(BASE_SALARY, shift)).max(0);
        breakdown.volatile_shift_pct = Some(shift);
        log.push(format!("Volatile job: salary shifted about {shift}% this month."));
    }
    if player.stress() >= HIGH_STRESS_THRESHOLD {
        salary = percent_floor(salary, HIGH_STRESS_SALARY_PCT);
        breakdown.stress_penalty = true;
        log.push(String::from("High stress: salary -10%."));
    }

    player.add_balance(salary);
    breakdown.salary = salary;
    log.push(format!("Monthly salary: +{}", format_money(salary)));
    breakdown
}

/// Debit mandatory spending, then run the side hustle when enabled.
pub fn apply_expenses<D: Dice + ?Sized>(
    player: &mut PlayerState,
    settings: &ChallengeSettings,
    dice: &mut D,
    log: &mut Vec<String>,
) -> ExpenseBreakdown {
    let mut breakdown = ExpenseBreakdown {
        base: BASE_EXPENSES,
        inflation: inflation_for(player.month(), settings.high_inflation),
        ..ExpenseBreakdown::default()
    };
    if dice.roll(DiceStream::Ledger, 0, 1) == 1 {
        breakdown.random_extra = dice.roll(DiceStream::Ledger, RANDOM_EXTRA_MIN, RANDOM_EXTRA_MAX);
    }
    if settings.debt {
        breakdown.debt = DEBT_INSTALLMENT;
        log.push(format!("Debt installment: -{}", format_money(DEBT_INSTALLMENT)));
    }
    if settings.medical_risk && player.health() < MEDICAL_HEALTH_THRESHOLD {
        breakdown.medical = MEDICAL_EXTRA;
        log.push(format!("Extra medical costs: -{}", format_money(MEDICAL_EXTRA)));
    }

    let total = breakdown.total();
    player.add_balance(-total);
    log.push(format!("Mandatory expenses: -{}", format_money(total)));

    if settings.side_hustle {
        let roll = dice.percent(DiceStream::Ledger);
        if roll <= SIDE_HUSTLE_CHANCE {
            let extra = dice.roll(DiceStream::Ledger, SIDE_HUSTLE_MIN, SIDE_HUSTLE_MAX);
            player.add_balance(extra);
            player.add_stress(SIDE_HUSTLE_STRESS_HIT);
            breakdown.side_hustle = Some(extra);
            log.push(format!(
                "Side hustle paid off: +{} (Stress +{SIDE_HUSTLE_STRESS_HIT}).",
                format_money(extra)
            ));
        } else {
            player.add_stress(SIDE_HUSTLE_STRESS_MISS);
            log.push(format!("Side hustle was quiet (Stress +{SIDE_HUSTLE_STRESS_MISS})."));
        }
    }
    breakdown
}
