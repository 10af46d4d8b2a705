//! Externally supplied event catalog.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::constants::{EVENT_CHANCE_MAX, STAT_MAX};

/// Type-specific payload of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventKind {
    /// A small bill: money out plus wellbeing deltas.
    Minor {
        #[serde(default)]
        cost: i64,
        #[serde(default)]
        health: i32,
        #[serde(default)]
        stress: i32,
    },
    /// A windfall. Luck makes these more likely.
    Bonus {
        #[serde(default)]
        reward: i64,
        #[serde(default)]
        stress: i32,
    },
    /// A heavy blow that luck can dodge entirely.
    Major {
        #[serde(
            default,
            alias = "percentLoss",
            skip_serializing_if = "Option::is_none"
        )]
        percent_loss: Option<i64>,
        #[serde(
            default,
            alias = "monthsLoss",
            skip_serializing_if = "Option::is_none"
        )]
        months_loss: Option<u32>,
        #[serde(default)]
        health: i32,
        #[serde(default)]
        stress: i32,
    },
}

impl EventKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Minor { .. } => "minor",
            Self::Bonus { .. } => "bonus",
            Self::Major { .. } => "major",
        }
    }

    #[must_use]
    pub const fn is_bonus(&self) -> bool {
        matches!(self, Self::Bonus { .. })
    }

    #[must_use]
    pub const fn is_major(&self) -> bool {
        matches!(self, Self::Major { .. })
    }
}

/// One random event the engine may fire during a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub name: String,
    /// Base trigger chance in percent.
    #[serde(default)]
    pub chance: i32,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl EventDefinition {
    /// Check the load-time bounds for this entry.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::OutOfRange` or `CatalogError::Negative` naming the
    /// first offending field.
    pub fn validate(&self, index: usize) -> Result<(), CatalogError> {
        let out_of_range = |field: &'static str, value: i64, max: i64| CatalogError::OutOfRange {
            index,
            name: self.name.clone(),
            field,
            value,
            max,
        };
        let negative = |field: &'static str, value: i64| CatalogError::Negative {
            index,
            name: self.name.clone(),
            field,
            value,
        };
        let chance_max = i64::from(EVENT_CHANCE_MAX);
        if !(0..=chance_max).contains(&i64::from(self.chance)) {
            return Err(out_of_range("chance", self.chance.into(), chance_max));
        }
        match &self.kind {
            EventKind::Minor { cost, .. } if *cost < 0 => Err(negative("cost", *cost)),
            EventKind::Bonus { reward, .. } if *reward < 0 => Err(negative("reward", *reward)),
            EventKind::Major {
                percent_loss: Some(pct),
                ..
            } if !(0..=i64::from(STAT_MAX)).contains(pct) => {
                Err(out_of_range("percent_loss", *pct, i64::from(STAT_MAX)))
            }
            _ => Ok(()),
        }
    }
}

/// Errors raised while loading the event catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("event catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("event catalog must be an array or an object with an `events` array")]
    Shape,
    #[error("event #{index} ({name}): {field} must be between 0 and {max} (got {value})")]
    OutOfRange {
        index: usize,
        name: String,
        field: &'static str,
        value: i64,
        max: i64,
    },
    #[error("event #{index} ({name}): {field} must not be negative (got {value})")]
    Negative {
        index: usize,
        name: String,
        field: &'static str,
        value: i64,
    },
}

/// Ordered, read-only list of event definitions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventCatalog {
    pub events: Vec<EventDefinition>,
}

impl EventCatalog {
    /// Create an empty catalog (no random events ever fire).
    #[must_use]
    pub const fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Build a catalog from pre-parsed definitions.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn from_events(events: Vec<EventDefinition>) -> Result<Self, CatalogError> {
        for (index, event) in events.iter().enumerate() {
            event.validate(index)?;
        }
        Ok(Self { events })
    }

    /// Strict loader accepting a bare array or `{ "events": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the JSON cannot be parsed, has the wrong
    /// shape, or contains an out-of-range entry.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: Value = serde_json::from_str(json)?;
        let entries = match document {
            Value::Array(items) => Value::Array(items),
            Value::Object(mut map) => match map.remove("events") {
                Some(events @ Value::Array(_)) => events,
                _ => return Err(CatalogError::Shape),
            },
            _ => return Err(CatalogError::Shape),
        };
        let events: Vec<EventDefinition> = serde_json::from_value(entries)?;
        Self::from_events(events)
    }

    /// Lenient loader: any failure degrades to an empty catalog.
    #[must_use]
    pub fn from_json_or_empty(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|err| {
            log::warn!("event catalog unavailable, continuing without random events: {err}");
            Self::empty()
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&EventDefinition> {
        self.events.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventDefinition> {
        self.events.iter()
    }
}
