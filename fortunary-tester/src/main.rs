mod common;
mod logic;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use fortunary_game::ChallengeSettings;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use common::{resolve_strategies, split_csv};
use logic::{
    GameTester, GameplayStrategy, PlayabilityAggregate, PlayabilityRecord, TesterAssets,
    aggregate_playability, resolve_seed_inputs, run_playability_analysis,
    validate_playability_targets,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored summary for terminals
    Console,
    /// Per-strategy aggregates as JSON
    Json,
    /// Per-strategy aggregates as a Markdown table
    Markdown,
    /// One row per playthrough
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "fortunary-tester", version)]
#[command(about = "Headless playthrough harness for the FORTUNARY finance game")]
struct Args {
    /// Seeds to run (comma-separated integers, phrases, or `sweep`)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Strategies to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    strategies: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Playthroughs per seed and strategy
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Challenges to enable (comma-separated settings keys, or `all`)
    #[arg(long, default_value = "")]
    challenges: String,

    /// Event catalog JSON to load instead of the bundled one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print every simulated month
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let seed_infos = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let strategies = resolve_strategies(&split_csv(&args.strategies))?;
    let settings = parse_challenges(&args.challenges);
    let assets = match &args.catalog {
        Some(path) => TesterAssets::load_from(path)?,
        None => TesterAssets::load_default(),
    };
    log::info!(
        "running {} strategies x {} seeds x {} iterations ({} catalog events)",
        strategies.len(),
        seed_infos.len(),
        args.iterations,
        assets.catalog().len()
    );
    let game_tester = GameTester::new(Arc::new(assets), args.verbose);

    let records = run_playability_analysis(
        &game_tester,
        &seed_infos,
        &strategies,
        settings,
        args.iterations,
    )?;
    let aggregates = aggregate_playability(&records);

    write_reports(&args, &records, &aggregates, start_time)?;
    validate_playability_targets(&records)?;

    Ok(())
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in GameplayStrategy::ALL {
        writeln!(output_target.writer(), "  {:10} - {}", strategy.key(), strategy)?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "💰 FORTUNARY Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn parse_challenges(raw: &str) -> ChallengeSettings {
    if raw.trim().eq_ignore_ascii_case("all") {
        ChallengeSettings::all()
    } else {
        ChallengeSettings::from_csv(raw)
    }
}

fn write_reports(
    args: &Args,
    records: &[PlayabilityRecord],
    aggregates: &[PlayabilityAggregate],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => logic::reports::generate_json_report(&mut output_target, aggregates)?,
        ReportFormat::Markdown => {
            logic::reports::generate_markdown_report(&mut output_target, aggregates)?;
        }
        ReportFormat::Csv => logic::reports::generate_csv_report(&mut output_target, records)?,
        ReportFormat::Console => {
            if aggregates.is_empty() {
                writeln!(&mut output_target, "No playthroughs executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    aggregates,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            seeds: "1337".to_string(),
            strategies: "saver".to_string(),
            list_strategies: false,
            iterations: 1,
            challenges: String::new(),
            catalog: None,
            report: ReportFormat::Json,
            output: None,
            verbose: false,
        }
    }

    fn temp_file(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "fortunary-main-{label}-{}",
            std::process::id()
        ))
    }

    fn sample_run() -> (Vec<PlayabilityRecord>, Vec<PlayabilityAggregate>) {
        let tester = GameTester::new(Arc::new(TesterAssets::load_default()), false);
        let seeds = resolve_seed_inputs(&["7".to_string()]).unwrap();
        let records = run_playability_analysis(
            &tester,
            &seeds,
            &[GameplayStrategy::Balanced],
            ChallengeSettings::default(),
            2,
        )
        .unwrap();
        let aggregates = aggregate_playability(&records);
        (records, aggregates)
    }

    #[test]
    fn challenges_accept_all_keyword() {
        assert_eq!(parse_challenges(" ALL "), ChallengeSettings::all());
        assert_eq!(parse_challenges(""), ChallengeSettings::default());
        assert!(parse_challenges("debt,volatileJob").volatile_job);
    }

    #[test]
    fn maybe_list_strategies_writes_output() {
        let temp = temp_file("strategies.txt");
        let args = Args {
            list_strategies: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_strategies(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available strategies"));
        assert!(content.contains("gambler"));
    }

    #[test]
    fn maybe_list_strategies_returns_false_when_disabled() {
        assert!(!maybe_list_strategies(&base_args()).unwrap());
    }

    #[test]
    fn write_reports_emits_each_format() {
        let (records, aggregates) = sample_run();
        for (format, needle) in [
            (ReportFormat::Json, "\"scenario_name\": \"Balanced\""),
            (ReportFormat::Markdown, "# FORTUNARY Playability Results"),
            (ReportFormat::Csv, "strategy,challenges,seed"),
            (ReportFormat::Console, "Playability Summary"),
        ] {
            let temp = temp_file(&format!("{format:?}"));
            let args = Args {
                report: format,
                output: Some(temp.clone()),
                ..base_args()
            };
            write_reports(&args, &records, &aggregates, Instant::now()).unwrap();
            let content = std::fs::read_to_string(temp).unwrap();
            assert!(content.contains(needle), "{format:?} report missing {needle}");
        }
    }

    #[test]
    fn console_report_handles_no_runs() {
        let temp = temp_file("empty.txt");
        let args = Args {
            report: ReportFormat::Console,
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No playthroughs executed"));
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
