//! Player attributes and their clamping rules.
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PLAYER_NAME, START_BALANCE, START_HEALTH, START_LUCK, START_MONTH, START_STRESS,
    STAT_MAX, STAT_MIN,
};

const fn clamp_stat(value: i32) -> i32 {
    if value < STAT_MIN {
        STAT_MIN
    } else if value > STAT_MAX {
        STAT_MAX
    } else {
        value
    }
}

/// Numeric state of a single playthrough.
///
/// Health, stress and luck are always within `[0, 100]`; every mutation goes
/// through a clamping setter. Balance is unbounded and may go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    name: String,
    balance: i64,
    health: i32,
    stress: i32,
    luck: i32,
    month: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER_NAME)
    }
}

impl PlayerState {
    /// Fresh player with the standard starting buffer.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            balance: START_BALANCE,
            health: START_HEALTH,
            stress: START_STRESS,
            luck: START_LUCK,
            month: START_MONTH,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn balance(&self) -> i64 {
        self.balance
    }

    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub const fn stress(&self) -> i32 {
        self.stress
    }

    #[must_use]
    pub const fn luck(&self) -> i32 {
        self.luck
    }

    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    pub const fn set_balance(&mut self, value: i64) {
        self.balance = value;
    }

    pub const fn set_health(&mut self, value: i32) {
        self.health = clamp_stat(value);
    }

    pub const fn set_stress(&mut self, value: i32) {
        self.stress = clamp_stat(value);
    }

    pub const fn set_luck(&mut self, value: i32) {
        self.luck = clamp_stat(value);
    }

    pub const fn add_balance(&mut self, delta: i64) {
        self.set_balance(self.balance.saturating_add(delta));
    }

    pub const fn add_health(&mut self, delta: i32) {
        self.set_health(self.health.saturating_add(delta));
    }

    pub const fn add_stress(&mut self, delta: i32) {
        self.set_stress(self.stress.saturating_add(delta));
    }

    pub const fn add_luck(&mut self, delta: i32) {
        self.set_luck(self.luck.saturating_add(delta));
    }

    /// Advance the calendar by exactly one month.
    pub const fn next_month(&mut self) {
        self.month = self.month.saturating_add(1);
    }

    /// Force the month counter; used when restoring or staging scenarios.
    pub const fn set_month(&mut self, month: u32) {
        self.month = if month == 0 { START_MONTH } else { month };
    }

    /// Re-apply the clamping rules to a freshly deserialized player.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.health = clamp_stat(self.health);
        self.stress = clamp_stat(self.stress);
        self.luck = clamp_stat(self.luck);
        if self.month == 0 {
            self.month = START_MONTH;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_player_uses_starting_buffer() {
        let player = PlayerState::new("Rina");
        assert_eq!(player.name(), "Rina");
        assert_eq!(player.balance(), 1_200_000);
        assert_eq!(player.health(), 80);
        assert_eq!(player.stress(), 20);
        assert_eq!(player.luck(), 50);
        assert_eq!(player.month(), 1);
        assert_eq!(PlayerState::default().name(), "Player");
    }

    #[test]
    fn setters_clamp_stats_but_not_balance() {
        let mut player = PlayerState::default();
        player.set_health(150);
        player.set_stress(-20);
        player.set_luck(101);
        player.set_balance(-9_000_000);
        assert_eq!(player.health(), 100);
        assert_eq!(player.stress(), 0);
        assert_eq!(player.luck(), 100);
        assert_eq!(player.balance(), -9_000_000);
    }

    #[test]
    fn add_operations_clamp_on_mutation() {
        let mut player = PlayerState::default();
        player.add_stress(-22);
        assert_eq!(player.stress(), 0);
        player.add_health(30);
        assert_eq!(player.health(), 100);
        player.add_luck(-70);
        assert_eq!(player.luck(), 0);
        player.add_balance(-2_000_000);
        assert_eq!(player.balance(), -800_000);
    }

    #[test]
    fn month_only_moves_forward_by_one() {
        let mut player = PlayerState::default();
        player.next_month();
        player.next_month();
        assert_eq!(player.month(), 3);
        player.set_month(0);
        assert_eq!(player.month(), 1);
    }

    #[test]
    fn sanitized_restores_invariants() {
        let raw = r#"{"name":"X","balance":5,"health":140,"stress":-3,"luck":250,"month":0}"#;
        let player: PlayerState = serde_json::from_str(raw).unwrap();
        let player = player.sanitized();
        assert_eq!(player.health(), 100);
        assert_eq!(player.stress(), 0);
        assert_eq!(player.luck(), 100);
        assert_eq!(player.month(), 1);
    }
}
