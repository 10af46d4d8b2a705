//! Monthly catalog event pass.
//!
//! The catalog is visited in a fresh random order each month and at most one
//! entry fires. Luck is sampled once at the start of the pass; effects applied
//! by the firing event never feed back into the odds of the same pass.
use serde::{Deserialize, Serialize};

use crate::constants::{
    BONUS_LUCK_DIVISOR, CATALOG_EVENTS_PER_MONTH, EVENT_CHANCE_MAX, EVENT_CHANCE_MIN,
    MAJOR_AVOID_LUCK_DIVISOR, MAJOR_LUCK_SHIELD_PENALTY, MAJOR_LUCK_SHIELD_THRESHOLD,
};
use crate::data::{EventCatalog, EventDefinition, EventKind};
use crate::dice::{Dice, DiceStream};
use crate::numbers::{floor_div, format_money, percent_floor};
use crate::player::PlayerState;

/// Effect of the single event that fired this month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredEvent {
    pub name: String,
    pub kind: EventKind,
    /// Net balance change caused by the event.
    pub balance_delta: i64,
    /// True when the event withholds next month's salary.
    pub blocks_salary: bool,
}

/// Result of one catalog pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogOutcome {
    pub fired: Option<FiredEvent>,
    /// Major events that triggered but were dodged by luck, in scan order.
    pub avoided: Vec<String>,
}

impl CatalogOutcome {
    #[must_use]
    pub const fn fired_count(&self) -> usize {
        if self.fired.is_some() { 1 } else { 0 }
    }

    #[must_use]
    pub fn blocks_salary(&self) -> bool {
        self.fired.as_ref().is_some_and(|event| event.blocks_salary)
    }
}

/// Trigger chance for one candidate given the luck sampled at pass start.
#[must_use]
pub fn effective_chance(event: &EventDefinition, luck: i32) -> i64 {
    let mut chance = event.chance;
    if event.kind.is_bonus() {
        chance = chance.saturating_add(floor_div(luck, BONUS_LUCK_DIVISOR));
    }
    if event.kind.is_major() && luck >= MAJOR_LUCK_SHIELD_THRESHOLD {
        chance = chance.saturating_sub(MAJOR_LUCK_SHIELD_PENALTY);
    }
    i64::from(chance.clamp(EVENT_CHANCE_MIN, EVENT_CHANCE_MAX))
}

/// Chance that a triggered major event is dodged entirely.
#[must_use]
pub const fn avoid_chance(luck: i32) -> i64 {
    floor_div(luck, MAJOR_AVOID_LUCK_DIVISOR) as i64
}

/// Run the monthly pass against `player`, appending narration to `log`.
pub fn run_catalog_pass<D: Dice + ?Sized>(
    catalog: &EventCatalog,
    player: &mut PlayerState,
    dice: &mut D,
    log: &mut Vec<String>,
) -> CatalogOutcome {
    let mut outcome = CatalogOutcome::default();
    if catalog.is_empty() {
        return outcome;
    }

    let luck = player.luck();
    let order = dice.permutation(DiceStream::Catalog, catalog.len());
    let mut fired = 0usize;

    for idx in order {
        if fired >= CATALOG_EVENTS_PER_MONTH {
            break;
        }
        let Some(event) = catalog.get(idx) else {
            continue;
        };
        let chance = effective_chance(event, luck);
        let roll = dice.percent(DiceStream::Catalog);
        if roll > chance {
            continue;
        }
        if event.kind.is_major() {
            let avoid_roll = dice.percent(DiceStream::Catalog);
            if avoid_roll <= avoid_chance(luck) {
                log.push(format!("LUCKY! Dodged a heavy blow: {}.", event.name));
                log::debug!("catalog: major event {} avoided (roll {avoid_roll})", event.name);
                outcome.avoided.push(event.name.clone());
                continue;
            }
        }
        outcome.fired = Some(apply_event(event, player, log));
        fired += 1;
    }
    outcome
}

fn apply_event(event: &EventDefinition, player: &mut PlayerState, log: &mut Vec<String>) -> FiredEvent {
    let before = player.balance();
    let mut blocks_salary = false;
    match &event.kind {
        EventKind::Minor {
            cost,
            health,
            stress,
        } => {
            player.add_balance(-cost);
            player.add_health(*health);
            player.add_stress(*stress);
            log.push(format!("MINOR EVENT: {} | -{}", event.name, format_money(*cost)));
        }
        EventKind::Bonus { reward, stress } => {
            player.add_balance(*reward);
            player.add_stress(*stress);
            log.push(format!("BONUS EVENT: {} | +{}", event.name, format_money(*reward)));
        }
        EventKind::Major {
            percent_loss,
            months_loss,
            health,
            stress,
        } => {
            if let Some(pct) = percent_loss {
                let loss = percent_floor(player.balance(), *pct);
                player.add_balance(-loss);
                log.push(format!(
                    "MAJOR EVENT: {} | Lost {pct}%: -{}",
                    event.name,
                    format_money(loss)
                ));
            }
            if months_loss.is_some_and(|months| months > 0) {
                blocks_salary = true;
                log.push(format!(
                    "MAJOR EVENT: {} | Salary withheld for 1 month.",
                    event.name
                ));
            }
            if percent_loss.is_none() && !blocks_salary {
                log.push(format!("MAJOR EVENT: {}", event.name));
            }
            player.add_health(*health);
            player.add_stress(*stress);
        }
    }
    log::debug!("catalog: {} event {} fired", event.kind.label(), event.name);
    FiredEvent {
        name: event.name.clone(),
        kind: event.kind.clone(),
        balance_delta: player.balance().saturating_sub(before),
        blocks_salary,
    }
}
