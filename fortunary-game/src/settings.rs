//! Challenge modifiers chosen by the player.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Individual challenge toggles, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Challenge {
    Debt,
    HighInflation,
    MedicalRisk,
    SideHustle,
    VolatileJob,
}

impl Challenge {
    pub const ALL: [Self; 5] = [
        Self::Debt,
        Self::HighInflation,
        Self::MedicalRisk,
        Self::SideHustle,
        Self::VolatileJob,
    ];

    /// Settings key used by rendering and CLI layers.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Debt => "debt",
            Self::HighInflation => "highInflation",
            Self::MedicalRisk => "medicalRisk",
            Self::SideHustle => "sideHustle",
            Self::VolatileJob => "volatileJob",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Debt => "Monthly debt installment",
            Self::HighInflation => "High inflation",
            Self::MedicalRisk => "High medical risk",
            Self::SideHustle => "Side hustle",
            Self::VolatileJob => "Volatile job",
        }
    }

    /// Parse a settings key, accepting both camelCase and snake_case spellings.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized: String = key
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "debt" => Some(Self::Debt),
            "highinflation" | "inflation" => Some(Self::HighInflation),
            "medicalrisk" | "medical" => Some(Self::MedicalRisk),
            "sidehustle" => Some(Self::SideHustle),
            "volatilejob" | "volatile" => Some(Self::VolatileJob),
            _ => None,
        }
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Five independent challenge flags. Unknown keys are ignored on load and
/// missing keys default to off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeSettings {
    pub debt: bool,
    pub high_inflation: bool,
    pub medical_risk: bool,
    pub side_hustle: bool,
    pub volatile_job: bool,
}

impl ChallengeSettings {
    /// Settings with every challenge enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            debt: true,
            high_inflation: true,
            medical_risk: true,
            side_hustle: true,
            volatile_job: true,
        }
    }

    /// Build settings from an iterator of challenges.
    #[must_use]
    pub fn from_challenges(challenges: impl IntoIterator<Item = Challenge>) -> Self {
        let mut settings = Self::default();
        for challenge in challenges {
            settings.set(challenge, true);
        }
        settings
    }

    /// Parse a comma-separated list of settings keys. Unknown keys are skipped.
    #[must_use]
    pub fn from_csv(raw: &str) -> Self {
        Self::from_challenges(
            raw.split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .filter_map(Challenge::from_key),
        )
    }

    /// Lenient JSON loader: malformed input yields all challenges off.
    #[must_use]
    pub fn from_json_or_default(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|err| {
            log::warn!("ignoring malformed challenge settings: {err}");
            Self::default()
        })
    }

    #[must_use]
    pub const fn is_active(&self, challenge: Challenge) -> bool {
        match challenge {
            Challenge::Debt => self.debt,
            Challenge::HighInflation => self.high_inflation,
            Challenge::MedicalRisk => self.medical_risk,
            Challenge::SideHustle => self.side_hustle,
            Challenge::VolatileJob => self.volatile_job,
        }
    }

    pub const fn set(&mut self, challenge: Challenge, enabled: bool) {
        match challenge {
            Challenge::Debt => self.debt = enabled,
            Challenge::HighInflation => self.high_inflation = enabled,
            Challenge::MedicalRisk => self.medical_risk = enabled,
            Challenge::SideHustle => self.side_hustle = enabled,
            Challenge::VolatileJob => self.volatile_job = enabled,
        }
    }

    /// Iterate over the enabled challenges in display order.
    pub fn active(&self) -> impl Iterator<Item = Challenge> + '_ {
        Challenge::ALL
            .into_iter()
            .filter(|challenge| self.is_active(*challenge))
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Human-readable summary for the narration log.
    #[must_use]
    pub fn describe(&self) -> String {
        let labels: Vec<&str> = self.active().map(Challenge::label).collect();
        if labels.is_empty() {
            String::from("No extra challenges")
        } else {
            labels.join(", ")
        }
    }
}
