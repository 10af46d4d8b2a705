use anyhow::{Result, bail};
use fortunary_game::seed_from_phrase;
use std::collections::HashMap;

/// Number of consecutive seeds the `sweep` keyword expands to.
pub const SWEEP_SEED_COUNT: u64 = 64;

/// Detailed seed metadata used for playability analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub phrase: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, phrase: None }
    }

    #[must_use]
    pub fn from_phrase(phrase: &str) -> Self {
        Self {
            seed: seed_from_phrase(phrase),
            phrase: Some(phrase.to_string()),
        }
    }

    /// Label used in reports: the phrase when one was given.
    #[must_use]
    pub fn label(&self) -> String {
        self.phrase
            .clone()
            .unwrap_or_else(|| self.seed.to_string())
    }
}

/// Resolve a list of CLI seed arguments into canonical seed metadata.
///
/// Supports literal integers (negative values use their magnitude), quoted
/// phrases hashed into a seed, and the keyword `sweep` which expands to
/// seeds `1..=64`.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if token.eq_ignore_ascii_case("sweep") {
            pending.extend((1..=SWEEP_SEED_COUNT).map(SeedInfo::from_numeric));
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }

        if token.chars().any(char::is_control) {
            bail!("Unrecognized seed token: {token:?}");
        }

        pending.push(SeedInfo::from_phrase(token));
    }

    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for info in pending {
        if let Some(&existing) = index.get(&info.seed) {
            if let Some(entry) = deduped.get_mut(existing)
                && entry.phrase.is_none()
                && info.phrase.is_some()
            {
                *entry = info;
            }
        } else {
            index.insert(info.seed, deduped.len());
            deduped.push(info);
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(1337));
    }

    Ok(deduped)
}
