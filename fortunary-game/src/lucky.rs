//! Independent, always-positive monthly windfalls.
use serde::{Deserialize, Serialize};

use crate::constants::{
    LUCKY_BASE_CHANCE, LUCKY_BILL_CUT_CASH, LUCKY_CHANCE_MAX, LUCKY_CHANCE_MIN,
    LUCKY_DEBT_PENALTY, LUCKY_LOTTERY_CASH, LUCKY_LOTTERY_LUCK, LUCKY_LUCK_DIVISOR,
    LUCKY_RELIEF_HEALTH, LUCKY_RELIEF_STRESS, LUCKY_SIDE_PROJECT_CASH, LUCKY_SIDE_PROJECT_STRESS,
    LUCKY_VOUCHER_CASH, LUCKY_WINDFALL_MAX, LUCKY_WINDFALL_MIN, LUCKY_WINDFALL_STRESS,
};
use crate::dice::{Dice, DiceStream};
use crate::numbers::{floor_div, format_money};
use crate::player::PlayerState;
use crate::settings::ChallengeSettings;

/// The six fixed micro-events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LuckyKind {
    CashWindfall,
    StressRelief,
    CashAndLuck,
    BillCut,
    SideProject,
    Voucher,
}

impl LuckyKind {
    pub const ALL: [Self; 6] = [
        Self::CashWindfall,
        Self::StressRelief,
        Self::CashAndLuck,
        Self::BillCut,
        Self::SideProject,
        Self::Voucher,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CashWindfall => "Found money on the street",
            Self::StressRelief => "Treated to dinner by friends",
            Self::CashAndLuck => "Won a small receipt lottery",
            Self::BillCut => "Big discount on the power bill",
            Self::SideProject => "Surprise side-project client",
            Self::Voucher => "Grocery voucher",
        }
    }
}

/// A lucky event that fired this month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckyOutcome {
    pub kind: LuckyKind,
    pub balance_delta: i64,
}

/// Monthly firing chance for the given luck and debt setting.
#[must_use]
pub fn lucky_chance(luck: i32, settings: &ChallengeSettings) -> i64 {
    let mut base = LUCKY_BASE_CHANCE;
    if settings.debt {
        base -= LUCKY_DEBT_PENALTY;
    }
    let chance = base.saturating_add(floor_div(luck, LUCKY_LUCK_DIVISOR));
    i64::from(chance.clamp(LUCKY_CHANCE_MIN, LUCKY_CHANCE_MAX))
}

/// Roll for at most one lucky event and apply it.
pub fn roll_lucky_event<D: Dice + ?Sized>(
    player: &mut PlayerState,
    settings: &ChallengeSettings,
    dice: &mut D,
    log: &mut Vec<String>,
) -> Option<LuckyOutcome> {
    let chance = lucky_chance(player.luck(), settings);
    let roll = dice.percent(DiceStream::Lucky);
    if roll > chance {
        return None;
    }

    let last = LuckyKind::ALL.len() as i64 - 1;
    let pick = dice.roll(DiceStream::Lucky, 0, last);
    let kind = usize::try_from(pick)
        .ok()
        .and_then(|idx| LuckyKind::ALL.get(idx).copied())
        .unwrap_or(LuckyKind::Voucher);

    let name = kind.name();
    let before = player.balance();
    match kind {
        LuckyKind::CashWindfall => {
            let amount = dice.roll(DiceStream::Lucky, LUCKY_WINDFALL_MIN, LUCKY_WINDFALL_MAX);
            player.add_balance(amount);
            player.add_stress(LUCKY_WINDFALL_STRESS);
            log.push(format!("LUCKY! {name} | +{} and stress eases.", format_money(amount)));
        }
        LuckyKind::StressRelief => {
            player.add_stress(LUCKY_RELIEF_STRESS);
            player.add_health(LUCKY_RELIEF_HEALTH);
            log.push(format!("LUCKY! {name} | Stress down, health up."));
        }
        LuckyKind::CashAndLuck => {
            player.add_balance(LUCKY_LOTTERY_CASH);
            player.add_luck(LUCKY_LOTTERY_LUCK);
            log.push(format!(
                "LUCKY! {name} | +{} and Luck +{LUCKY_LOTTERY_LUCK}.",
                format_money(LUCKY_LOTTERY_CASH)
            ));
        }
        LuckyKind::BillCut => {
            player.add_balance(LUCKY_BILL_CUT_CASH);
            log.push(format!(
                "LUCKY! {name} | This month's spending feels lighter (+{}).",
                format_money(LUCKY_BILL_CUT_CASH)
            ));
        }
        LuckyKind::SideProject => {
            player.add_balance(LUCKY_SIDE_PROJECT_CASH);
            player.add_stress(LUCKY_SIDE_PROJECT_STRESS);
            log.push(format!(
                "LUCKY! {name} | +{} and Stress {LUCKY_SIDE_PROJECT_STRESS}.",
                format_money(LUCKY_SIDE_PROJECT_CASH)
            ));
        }
        LuckyKind::Voucher => {
            player.add_balance(LUCKY_VOUCHER_CASH);
            log.push(format!(
                "LUCKY! {name} | Saved about +{}.",
                format_money(LUCKY_VOUCHER_CASH)
            ));
        }
    }
    log::debug!("lucky: {kind:?} fired (roll {roll} <= {chance})");
    Some(LuckyOutcome {
        kind,
        balance_delta: player.balance().saturating_sub(before),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    #[test]
    fn chance_is_clamped_between_five_and_forty() {
        let plain = ChallengeSettings::default();
        let debt = ChallengeSettings { debt: true, ..ChallengeSettings::default() };
        assert_eq!(lucky_chance(50, &plain), 18);
        assert_eq!(lucky_chance(50, &debt), 17);
        assert_eq!(lucky_chance(0, &debt), 11);
        assert_eq!(lucky_chance(100, &plain), 24);
        assert_eq!(lucky_chance(7, &plain), 12);
    }

    #[test]
    fn failed_gate_changes_nothing() {
        let mut dice = ScriptedDice::new().with_rolls(DiceStream::Lucky, [19, 0]);
        let mut player = PlayerState::default();
        let mut log = Vec::new();
        let outcome = roll_lucky_event(&mut player, &ChallengeSettings::default(), &mut dice, &mut log);
        assert!(outcome.is_none());
        assert_eq!(player, PlayerState::default());
        assert_eq!(dice.remaining(DiceStream::Lucky), 1);
    }

    #[test]
    fn each_kind_applies_its_fixed_effect() {
        // (kind index, balance, stress, luck, health)
        let cases = [
            (1, 1_200_000, 0, 50, 84),
            (2, 1_520_000, 20, 57, 80),
            (3, 1_300_000, 20, 50, 80),
            (5, 1_350_000, 20, 50, 80),
        ];
        for (index, balance, stress, luck, health) in cases {
            let mut dice = ScriptedDice::new().with_rolls(DiceStream::Lucky, [1, index]);
            let mut player = PlayerState::default();
            let mut log = Vec::new();
            let outcome =
                roll_lucky_event(&mut player, &ChallengeSettings::default(), &mut dice, &mut log)
                    .expect("gate roll of 1 always fires");
            assert_eq!(outcome.kind, LuckyKind::ALL[index as usize]);
            assert_eq!(player.balance(), balance);
            assert_eq!(player.stress(), stress);
            assert_eq!(player.luck(), luck);
            assert_eq!(player.health(), health);
            assert_eq!(log.len(), 1);
        }
    }

    #[test]
    fn cash_windfall_draws_an_amount() {
        let mut dice = ScriptedDice::new().with_rolls(DiceStream::Lucky, [5, 0, 123_456]);
        let mut player = PlayerState::default();
        let mut log = Vec::new();
        let outcome = roll_lucky_event(&mut player, &ChallengeSettings::default(), &mut dice, &mut log).unwrap();
        assert_eq!(outcome.kind, LuckyKind::CashWindfall);
        assert_eq!(outcome.balance_delta, 123_456);
        assert_eq!(player.stress(), 17);
        assert_eq!(log[0], "LUCKY! Found money on the street | +123,456 and stress eases.");
    }

    #[test]
    fn side_project_adds_money_and_relief() {
        let mut dice = ScriptedDice::new().with_rolls(DiceStream::Lucky, [1, 4]);
        let mut player = PlayerState::default();
        let mut log = Vec::new();
        let outcome = roll_lucky_event(&mut player, &ChallengeSettings::default(), &mut dice, &mut log).unwrap();
        assert_eq!(outcome.kind, LuckyKind::SideProject);
        assert_eq!(player.balance(), 1_420_000);
        assert_eq!(player.stress(), 16);
        assert_eq!(log[0], "LUCKY! Surprise side-project client | +220,000 and Stress -4.");
    }

    #[test]
    fn lottery_log_names_the_luck_bonus() {
        let mut dice = ScriptedDice::new().with_rolls(DiceStream::Lucky, [1, 2]);
        let mut player = PlayerState::default();
        let mut log = Vec::new();
        roll_lucky_event(&mut player, &ChallengeSettings::default(), &mut dice, &mut log).unwrap();
        assert_eq!(log, vec!["LUCKY! Won a small receipt lottery | +320,000 and Luck +7.".to_string()]);
    }
}
