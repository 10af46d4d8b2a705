//! Monthly economic regime.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::constants::{
    MARKET_BEARISH_CEILING, MARKET_BULLISH_CEILING, MARKET_CRASH_CEILING,
    MARKET_SIDEWAYS_CEILING,
};
use crate::dice::{Dice, DiceStream};

/// Economic regime in effect for the current month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MarketState {
    Boom,
    Bullish,
    #[default]
    Sideways,
    Bearish,
    Crash,
}

impl MarketState {
    pub const ALL: [Self; 5] = [
        Self::Boom,
        Self::Bullish,
        Self::Sideways,
        Self::Bearish,
        Self::Crash,
    ];

    /// Map a percent roll onto the regime table.
    #[must_use]
    pub const fn from_roll(roll: i64) -> Self {
        if roll <= MARKET_CRASH_CEILING {
            Self::Crash
        } else if roll <= MARKET_BEARISH_CEILING {
            Self::Bearish
        } else if roll <= MARKET_SIDEWAYS_CEILING {
            Self::Sideways
        } else if roll <= MARKET_BULLISH_CEILING {
            Self::Bullish
        } else {
            Self::Boom
        }
    }

    /// Additive adjustment to investment win chances.
    #[must_use]
    pub const fn market_adjust(self) -> i32 {
        match self {
            Self::Boom => 12,
            Self::Bullish => 7,
            Self::Sideways => 0,
            Self::Bearish => -6,
            Self::Crash => -12,
        }
    }

    /// Profit percent range for a winning low-risk investment.
    #[must_use]
    pub const fn low_risk_profit_pct(self) -> RangeInclusive<i64> {
        match self {
            Self::Boom => 7..=13,
            Self::Bullish => 5..=10,
            Self::Sideways => 2..=7,
            Self::Bearish => 0..=5,
            Self::Crash => 0..=3,
        }
    }

    /// Profit percent range for a winning high-risk investment.
    #[must_use]
    pub const fn high_risk_profit_pct(self) -> RangeInclusive<i64> {
        match self {
            Self::Boom => 40..=120,
            Self::Bullish => 30..=90,
            Self::Sideways => 15..=60,
            Self::Bearish => 5..=40,
            Self::Crash => 0..=25,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Boom => "Boom",
            Self::Bullish => "Bullish",
            Self::Sideways => "Sideways",
            Self::Bearish => "Bearish",
            Self::Crash => "Crash",
        }
    }

    /// One-line flavor text for rendering layers.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Boom => {
                "The economy is red hot and asset prices are soaring. Big profits are possible, but so is a bubble popping."
            }
            Self::Bullish => {
                "The market is growing steadily. Odds of profit are up and the risk is still reasonable."
            }
            Self::Sideways => {
                "The market is flat. Small ups and downs with small steady gains, suited to conservative play."
            }
            Self::Bearish => {
                "The market is falling. Investing gets riskier and losses are more likely, especially on high-risk bets."
            }
            Self::Crash => {
                "A deep crisis. Most assets are dropping sharply and speculation is very dangerous, though small rebounds happen."
            }
        }
    }
}

impl fmt::Display for MarketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Draw the next regime from the market stream.
pub fn roll_market_state<D: Dice + ?Sized>(dice: &mut D) -> MarketState {
    let roll = dice.percent(DiceStream::Market);
    MarketState::from_roll(roll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    #[test]
    fn thresholds_partition_the_percent_range() {
        assert_eq!(MarketState::from_roll(1), MarketState::Crash);
        assert_eq!(MarketState::from_roll(7), MarketState::Crash);
        assert_eq!(MarketState::from_roll(8), MarketState::Bearish);
        assert_eq!(MarketState::from_roll(22), MarketState::Bearish);
        assert_eq!(MarketState::from_roll(23), MarketState::Sideways);
        assert_eq!(MarketState::from_roll(62), MarketState::Sideways);
        assert_eq!(MarketState::from_roll(63), MarketState::Bullish);
        assert_eq!(MarketState::from_roll(87), MarketState::Bullish);
        assert_eq!(MarketState::from_roll(88), MarketState::Boom);
        assert_eq!(MarketState::from_roll(100), MarketState::Boom);
    }

    #[test]
    fn regime_counts_match_the_table_widths() {
        let mut counts = std::collections::HashMap::new();
        for roll in 1..=100 {
            *counts.entry(MarketState::from_roll(roll)).or_insert(0) += 1;
        }
        assert_eq!(counts[&MarketState::Crash], 7);
        assert_eq!(counts[&MarketState::Bearish], 15);
        assert_eq!(counts[&MarketState::Sideways], 40);
        assert_eq!(counts[&MarketState::Bullish], 25);
        assert_eq!(counts[&MarketState::Boom], 13);
    }

    #[test]
    fn roll_uses_the_market_stream() {
        let mut dice = ScriptedDice::new().with_rolls(DiceStream::Market, [5, 70]);
        assert_eq!(roll_market_state(&mut dice), MarketState::Crash);
        assert_eq!(roll_market_state(&mut dice), MarketState::Bullish);
    }

    #[test]
    fn adjustments_are_ordered_by_optimism() {
        let adjusts: Vec<i32> = MarketState::ALL.iter().map(|m| m.market_adjust()).collect();
        assert_eq!(adjusts, vec![12, 7, 0, -6, -12]);
        assert_eq!(MarketState::Crash.high_risk_profit_pct(), 0..=25);
        assert_eq!(MarketState::Boom.to_string(), "Boom");
    }
}
