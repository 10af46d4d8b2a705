//! Play-style tallies and the dominant route.
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five action-bearing play styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteCategory {
    Save,
    InvestLow,
    InvestHigh,
    Entertain,
    TrainSkill,
}

impl RouteCategory {
    /// Tie-break order for the dominant route.
    pub const ALL: [Self; 5] = [
        Self::Save,
        Self::InvestLow,
        Self::InvestHigh,
        Self::Entertain,
        Self::TrainSkill,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::InvestLow => "invest_low",
            Self::InvestHigh => "invest_high",
            Self::Entertain => "entertain",
            Self::TrainSkill => "train_skill",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Save => "Conservative Saver",
            Self::InvestLow => "Careful Investor",
            Self::InvestHigh => "Aggressive Gambler",
            Self::Entertain => "Life Enjoyer",
            Self::TrainSkill => "Growth Mindset",
        }
    }
}

/// Dominant route, or `Mixed` when no action has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DominantRoute {
    Category(RouteCategory),
    Mixed,
}

impl DominantRoute {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Category(category) => category.key(),
            Self::Mixed => "mixed",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category(category) => category.label(),
            Self::Mixed => "Mixed Route",
        }
    }
}

impl fmt::Display for DominantRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-category action counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteStats {
    pub save: u32,
    pub invest_low: u32,
    pub invest_high: u32,
    pub entertain: u32,
    pub train_skill: u32,
}

impl RouteStats {
    #[must_use]
    pub const fn count(&self, category: RouteCategory) -> u32 {
        match category {
            RouteCategory::Save => self.save,
            RouteCategory::InvestLow => self.invest_low,
            RouteCategory::InvestHigh => self.invest_high,
            RouteCategory::Entertain => self.entertain,
            RouteCategory::TrainSkill => self.train_skill,
        }
    }

    pub const fn record(&mut self, category: RouteCategory) {
        let slot = match category {
            RouteCategory::Save => &mut self.save,
            RouteCategory::InvestLow => &mut self.invest_low,
            RouteCategory::InvestHigh => &mut self.invest_high,
            RouteCategory::Entertain => &mut self.entertain,
            RouteCategory::TrainSkill => &mut self.train_skill,
        };
        *slot = slot.saturating_add(1);
    }

    /// Number of action-bearing turns recorded.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.save
            .saturating_add(self.invest_low)
            .saturating_add(self.invest_high)
            .saturating_add(self.entertain)
            .saturating_add(self.train_skill)
    }

    /// Highest count wins; ties resolve in [`RouteCategory::ALL`] order.
    #[must_use]
    pub fn dominant(&self) -> DominantRoute {
        let mut best: Option<(RouteCategory, u32)> = None;
        for category in RouteCategory::ALL {
            let count = self.count(category);
            if count > best.map_or(0, |(_, top)| top) {
                best = Some((category, count));
            }
        }
        best.map_or(DominantRoute::Mixed, |(category, _)| {
            DominantRoute::Category(category)
        })
    }
}
