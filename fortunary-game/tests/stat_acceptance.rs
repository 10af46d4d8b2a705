use fortunary_game::{
    Action, ChallengeSettings, Dice, DiceStream, EventCatalog, EventDefinition, EventKind,
    MarketState, PlayerState, RngBundle, RouteStats, SingleStreamDice, apply_action,
    apply_expenses, roll_lucky_event, roll_market_state, run_catalog_pass,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_chacha::ChaCha20Rng;
use std::collections::HashMap;
use std::convert::TryFrom;

const SAMPLE_SIZE: usize = 20_000;
const TOLERANCE: f64 = 0.015;

fn rate(count: usize) -> f64 {
    let count = u32::try_from(count).expect("count fits u32");
    let total = u32::try_from(SAMPLE_SIZE).expect("sample size fits u32");
    f64::from(count) / f64::from(total)
}

fn assert_rate(label: &str, count: usize, expected: f64) {
    let observed = rate(count);
    assert!(
        (observed - expected).abs() <= TOLERANCE,
        "{label} drifted: observed {observed:.4}, expected {expected:.4}"
    );
}

#[test]
fn market_regimes_follow_the_threshold_table() {
    let mut dice = RngBundle::from_user_seed(0x00C0_FFEE);
    let mut counts: HashMap<MarketState, usize> = HashMap::new();
    for _ in 0..SAMPLE_SIZE {
        *counts.entry(roll_market_state(&mut dice)).or_default() += 1;
    }
    assert_rate("crash", counts[&MarketState::Crash], 0.07);
    assert_rate("bearish", counts[&MarketState::Bearish], 0.15);
    assert_rate("sideways", counts[&MarketState::Sideways], 0.40);
    assert_rate("bullish", counts[&MarketState::Bullish], 0.25);
    assert_rate("boom", counts[&MarketState::Boom], 0.13);
}

#[test]
fn lucky_events_fire_at_the_luck_scaled_rate() {
    let mut dice = RngBundle::from_user_seed(1234);
    let settings = ChallengeSettings::default();
    let mut fired = 0usize;
    let mut kinds = HashMap::new();
    for _ in 0..SAMPLE_SIZE {
        let mut player = PlayerState::default();
        let mut log = Vec::new();
        if let Some(outcome) = roll_lucky_event(&mut player, &settings, &mut dice, &mut log) {
            fired += 1;
            *kinds.entry(outcome.kind).or_insert(0usize) += 1;
            assert!(outcome.balance_delta >= 0, "lucky events never cost money");
        }
    }
    // luck 50: 12 + floor(50 / 8) = 18%.
    assert_rate("lucky", fired, 0.18);
    assert_eq!(kinds.len(), 6, "every micro-event should appear");
}

#[test]
fn bonus_events_gain_the_luck_bonus() {
    let catalog = EventCatalog::from_events(vec![EventDefinition {
        name: String::from("Refund"),
        chance: 10,
        kind: EventKind::Bonus {
            reward: 1,
            stress: 0,
        },
    }])
    .unwrap();
    let mut dice = SingleStreamDice(SmallRng::seed_from_u64(0xACED));
    let mut fired = 0usize;
    for _ in 0..SAMPLE_SIZE {
        let mut player = PlayerState::default();
        let mut log = Vec::new();
        fired += run_catalog_pass(&catalog, &mut player, &mut dice, &mut log).fired_count();
    }
    // 10 + floor(50 / 12) = 14%.
    assert_rate("bonus", fired, 0.14);
}

#[test]
fn side_hustle_pays_four_times_in_five() {
    let settings = ChallengeSettings {
        side_hustle: true,
        ..ChallengeSettings::default()
    };
    let mut dice = RngBundle::from_user_seed(77);
    let mut paid = 0usize;
    let mut extras = 0usize;
    for _ in 0..SAMPLE_SIZE {
        let mut player = PlayerState::default();
        let mut log = Vec::new();
        let expenses = apply_expenses(&mut player, &settings, &mut dice, &mut log);
        if let Some(amount) = expenses.side_hustle {
            assert!((120_000..=220_000).contains(&amount));
            paid += 1;
        }
        if expenses.random_extra > 0 {
            assert!((10_000..=30_000).contains(&expenses.random_extra));
            extras += 1;
        }
    }
    assert_rate("side hustle", paid, 0.80);
    assert_rate("expense extra", extras, 0.50);
}

#[test]
fn low_risk_investing_wins_at_the_advertised_chance() {
    let mut dice = SingleStreamDice(ChaCha20Rng::seed_from_u64(0xBEEF));
    let mut wins = 0usize;
    for _ in 0..SAMPLE_SIZE {
        let mut player = PlayerState::default();
        let mut routes = RouteStats::default();
        let mut log = Vec::new();
        let outcome = apply_action(
            Some(Action::InvestLow),
            &mut player,
            MarketState::Bearish,
            &mut routes,
            &mut dice,
            &mut log,
        );
        if matches!(outcome, fortunary_game::ActionOutcome::InvestmentWon { .. }) {
            wins += 1;
        }
    }
    // 70 + floor(50 / 10) - 6 = 69%.
    assert_rate("invest_low win", wins, 0.69);
}

#[test]
fn bundle_rolls_are_uniform_enough() {
    let mut dice = RngBundle::from_user_seed(5);
    let mut buckets = [0usize; 3];
    for _ in 0..SAMPLE_SIZE {
        let rate = dice.roll(DiceStream::Action, 2, 4);
        buckets[usize::try_from(rate - 2).expect("rate in range")] += 1;
    }
    for bucket in buckets {
        assert_rate("save rate bucket", bucket, 1.0 / 3.0);
    }
}
