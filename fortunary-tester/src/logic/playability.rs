use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::convert::TryFrom;

use fortunary_game::{ChallengeSettings, HORIZON_MONTHS};

use crate::logic::game_tester::{GameTester, PlayabilityMetrics, SimulationPlan, SimulationSummary};
use crate::logic::policy::GameplayStrategy;
use crate::logic::seeds::SeedInfo;

#[derive(Debug, Clone, Serialize)]
pub struct PlayabilityRecord {
    pub scenario_name: String,
    pub strategy: GameplayStrategy,
    pub challenges: String,
    pub seed_label: String,
    pub seed_value: u64,
    pub metrics: PlayabilityMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayabilityAggregate {
    pub scenario_name: String,
    pub strategy: GameplayStrategy,
    pub iterations: usize,
    pub mean_months: f64,
    pub std_months: f64,
    pub mean_final_balance: f64,
    pub std_final_balance: f64,
    pub success_rate: f64,
    pub bankrupt_rate: f64,
    pub mean_catalog_events: f64,
    pub mean_lucky_events: f64,
    pub ending_histogram: BTreeMap<String, usize>,
    pub route_histogram: BTreeMap<String, usize>,
}

fn terminal_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.game_ended,
        "run did not reach an ending within {} turns",
        summary.metrics.turns_taken
    );
    ensure!(
        summary.metrics.months_played <= HORIZON_MONTHS,
        "run ended in month {}, past the horizon",
        summary.metrics.months_played
    );
    Ok(())
}

fn stat_range_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.metrics.stats_in_range,
        "stats escaped [0, 100]: health {} stress {} luck {}",
        summary.metrics.final_health,
        summary.metrics.final_stress,
        summary.metrics.final_luck
    );
    Ok(())
}

fn single_event_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.metrics.peak_catalog_per_month <= 1,
        "{} catalog events fired in a single month",
        summary.metrics.peak_catalog_per_month
    );
    ensure!(
        summary.metrics.peak_lucky_per_month <= 1,
        "{} lucky events fired in a single month",
        summary.metrics.peak_lucky_per_month
    );
    Ok(())
}

/// The plan every playthrough runs under.
#[must_use]
pub fn playability_plan(strategy: GameplayStrategy, settings: ChallengeSettings) -> SimulationPlan {
    SimulationPlan::new(strategy, settings)
        .with_expectation(terminal_expectation)
        .with_expectation(stat_range_expectation)
        .with_expectation(single_event_expectation)
}

pub fn run_playability_analysis(
    tester: &GameTester,
    seeds: &[SeedInfo],
    strategies: &[GameplayStrategy],
    settings: ChallengeSettings,
    iterations: usize,
) -> Result<Vec<PlayabilityRecord>> {
    let iterations = iterations.max(1);
    let challenges = if settings.active_count() == 0 {
        String::from("none")
    } else {
        settings.describe()
    };
    let mut records = Vec::with_capacity(seeds.len() * strategies.len() * iterations);

    for &strategy in strategies {
        let plan = playability_plan(strategy, settings);
        for seed in seeds {
            for iteration in 0..iterations {
                let iteration_offset = u64::try_from(iteration).unwrap_or(0);
                let iteration_seed = seed.seed.wrapping_add(iteration_offset);
                let summary = tester.run_plan(&plan, iteration_seed);
                #[rustfmt::skip]
                let context = format!("Playability expectation failed for strategy {}, seed {} (iteration {}, run seed {}, ending '{}', final balance {}): {}", summary.strategy, seed.label(), iteration + 1, summary.seed, summary.ending_message, summary.final_state.player().balance(), summarize_decision_path(&summary));
                for expectation in &plan.expectations {
                    expectation
                        .evaluate(&summary)
                        .with_context(|| context.clone())?;
                }

                let seed_label = if iteration == 0 {
                    seed.label()
                } else {
                    format!("{}+{iteration}", seed.label())
                };
                records.push(PlayabilityRecord {
                    scenario_name: strategy.label().to_string(),
                    strategy,
                    challenges: challenges.clone(),
                    seed_label,
                    seed_value: iteration_seed,
                    metrics: summary.metrics,
                });
            }
        }
    }

    Ok(records)
}

fn summarize_decision_path(summary: &SimulationSummary) -> String {
    if summary.metrics.decision_log.is_empty() {
        return "no decisions recorded".to_string();
    }

    summary
        .metrics
        .decision_log
        .iter()
        .rev()
        .take(3)
        .map(|entry| {
            format!(
                "month {}: {} [{}] reason {}",
                entry.month,
                entry.action.map_or("none", fortunary_game::Action::token),
                entry.policy_name,
                entry.rationale.as_deref().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn aggregate_playability(records: &[PlayabilityRecord]) -> Vec<PlayabilityAggregate> {
    let mut aggregates: BTreeMap<GameplayStrategy, AggregateBuilder> = BTreeMap::new();
    for record in records {
        aggregates
            .entry(record.strategy)
            .or_insert_with(|| AggregateBuilder::new(record))
            .ingest(&record.metrics);
    }
    aggregates
        .into_values()
        .map(AggregateBuilder::finish)
        .collect()
}

/// Cross-run checks that only make sense over the whole record set.
pub fn validate_playability_targets(records: &[PlayabilityRecord]) -> Result<()> {
    let mut endings: HashMap<(GameplayStrategy, u64), &str> = HashMap::new();
    for record in records {
        let ending = record.metrics.ending_code.as_str();
        if let Some(previous) = endings.insert((record.strategy, record.seed_value), ending) {
            ensure!(
                previous == ending,
                "Determinism violated for strategy {} seed {}: {previous} vs {ending}",
                record.strategy,
                record.seed_value
            );
        }
        ensure!(
            record.metrics.ending_code != "UNFINISHED",
            "Strategy {} seed {} never reached an ending",
            record.strategy,
            record.seed_label
        );
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct AggregateBuilder {
    scenario_name: String,
    strategy: GameplayStrategy,
    stats_months: RunningStats,
    stats_balance: RunningStats,
    iterations: u32,
    successes: u32,
    bankruptcies: u32,
    catalog_events_sum: u32,
    lucky_events_sum: u32,
    ending_histogram: BTreeMap<String, usize>,
    route_histogram: BTreeMap<String, usize>,
}

impl AggregateBuilder {
    fn new(record: &PlayabilityRecord) -> Self {
        Self {
            scenario_name: record.scenario_name.clone(),
            strategy: record.strategy,
            stats_months: RunningStats::default(),
            stats_balance: RunningStats::default(),
            iterations: 0,
            successes: 0,
            bankruptcies: 0,
            catalog_events_sum: 0,
            lucky_events_sum: 0,
            ending_histogram: BTreeMap::new(),
            route_histogram: BTreeMap::new(),
        }
    }

    fn ingest(&mut self, metrics: &PlayabilityMetrics) {
        self.iterations += 1;
        self.stats_months.add(f64::from(metrics.months_played));
        #[allow(clippy::cast_precision_loss)]
        self.stats_balance.add(metrics.final_balance as f64);
        if metrics.success {
            self.successes += 1;
        }
        if metrics.ending_code == "BANKRUPT" {
            self.bankruptcies += 1;
        }
        self.catalog_events_sum = self.catalog_events_sum.saturating_add(metrics.catalog_events);
        self.lucky_events_sum = self.lucky_events_sum.saturating_add(metrics.lucky_events);
        *self
            .ending_histogram
            .entry(metrics.ending_code.clone())
            .or_default() += 1;
        *self
            .route_histogram
            .entry(metrics.route_key.clone())
            .or_default() += 1;
    }

    fn finish(self) -> PlayabilityAggregate {
        let iterations = usize::try_from(self.iterations).unwrap_or(usize::MAX);
        let denom = f64::from(self.iterations.max(1));
        PlayabilityAggregate {
            scenario_name: self.scenario_name,
            strategy: self.strategy,
            iterations,
            mean_months: self.stats_months.mean(),
            std_months: self.stats_months.std_dev(),
            mean_final_balance: self.stats_balance.mean(),
            std_final_balance: self.stats_balance.std_dev(),
            success_rate: f64::from(self.successes) / denom,
            bankrupt_rate: f64::from(self.bankruptcies) / denom,
            mean_catalog_events: f64::from(self.catalog_events_sum) / denom,
            mean_lucky_events: f64::from(self.lucky_events_sum) / denom,
            ending_histogram: self.ending_histogram,
            route_histogram: self.route_histogram,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let count = f64::from(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    fn variance(&self) -> f64 {
        if self.count > 1 {
            self.m2 / f64::from(self.count - 1)
        } else {
            0.0
        }
    }

    fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}
