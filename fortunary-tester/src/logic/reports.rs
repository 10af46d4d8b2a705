use anyhow::Result;
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use fortunary_game::format_money;

use super::playability::{PlayabilityAggregate, PlayabilityRecord};

#[allow(clippy::cast_possible_truncation)]
fn money(value: f64) -> String {
    format_money(value.round() as i64)
}

fn histogram_line(histogram: &BTreeMap<String, usize>) -> String {
    let mut entries: Vec<(&String, &usize)> = histogram.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .map(|(key, count)| format!("{key} x{count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn generate_console_report(
    out: &mut dyn Write,
    aggregates: &[PlayabilityAggregate],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Playability Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "======================".cyan())?;

    let total_runs: usize = aggregates.iter().map(|agg| agg.iterations).sum();
    writeln!(out, "Strategies: {}", aggregates.len())?;
    writeln!(out, "Playthroughs: {total_runs}")?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for agg in aggregates {
        writeln!(out, "{}", agg.scenario_name.bold())?;
        writeln!(
            out,
            "   Runs: {} | Months: {:.1} ± {:.1}",
            agg.iterations, agg.mean_months, agg.std_months
        )?;
        writeln!(
            out,
            "   Final balance: {} ± {}",
            money(agg.mean_final_balance),
            money(agg.std_final_balance)
        )?;
        let success = format!("{:.1}%", agg.success_rate * 100.0);
        let bankrupt = format!("{:.1}%", agg.bankrupt_rate * 100.0);
        writeln!(
            out,
            "   Success: {} | Bankrupt: {}",
            success.green(),
            bankrupt.red()
        )?;
        writeln!(
            out,
            "   Events per run: catalog {:.2}, lucky {:.2}",
            agg.mean_catalog_events, agg.mean_lucky_events
        )?;
        writeln!(out, "   Endings: {}", histogram_line(&agg.ending_histogram))?;
        writeln!(out, "   Routes: {}", histogram_line(&agg.route_histogram))?;
        writeln!(out)?;
    }

    if let (Some(best), Some(worst)) = (
        aggregates
            .iter()
            .max_by(|a, b| a.success_rate.total_cmp(&b.success_rate)),
        aggregates
            .iter()
            .max_by(|a, b| a.bankrupt_rate.total_cmp(&b.bankrupt_rate)),
    ) {
        writeln!(out, "{}", "⚡ Highlights".bright_yellow().bold())?;
        writeln!(out, "{}", "============".yellow())?;
        writeln!(
            out,
            "Most successful: {} ({:.1}%)",
            best.scenario_name.green(),
            best.success_rate * 100.0
        )?;
        writeln!(
            out,
            "Most bankruptcies: {} ({:.1}%)",
            worst.scenario_name.red(),
            worst.bankrupt_rate * 100.0
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, aggregates: &[PlayabilityAggregate]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, aggregates)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    aggregates: &[PlayabilityAggregate],
) -> Result<()> {
    writeln!(out, "# FORTUNARY Playability Results\n")?;
    writeln!(
        out,
        "| Strategy | Runs | Mean months | Mean final balance | Success | Bankrupt |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|")?;
    for agg in aggregates {
        writeln!(
            out,
            "| {} | {} | {:.1} | {} | {:.1}% | {:.1}% |",
            agg.scenario_name,
            agg.iterations,
            agg.mean_months,
            money(agg.mean_final_balance),
            agg.success_rate * 100.0,
            agg.bankrupt_rate * 100.0
        )?;
    }
    writeln!(out)?;

    for agg in aggregates {
        writeln!(out, "## {}\n", agg.scenario_name)?;
        writeln!(out, "- **Endings**: {}", histogram_line(&agg.ending_histogram))?;
        writeln!(out, "- **Routes**: {}", histogram_line(&agg.route_histogram))?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, records: &[PlayabilityRecord]) -> Result<()> {
    writeln!(
        out,
        "strategy,challenges,seed,seed_value,months,final_balance,min_balance,peak_balance,health,stress,luck,ending,route,catalog_events,lucky_events,refused_actions"
    )?;
    for record in records {
        let m = &record.metrics;
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            record.strategy.key(),
            csv_field(&record.challenges),
            csv_field(&record.seed_label),
            record.seed_value,
            m.months_played,
            m.final_balance,
            m.min_balance,
            m.peak_balance,
            m.final_health,
            m.final_stress,
            m.final_luck,
            m.ending_code,
            m.route_key,
            m.catalog_events,
            m.lucky_events,
            m.refused_actions
        )?;
    }
    Ok(())
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
