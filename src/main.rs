use analytics::{AnalyticsEngine, CalendarPeriod, TradeFilter, summarize};
use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use configuration::SimulationOverrides;
use core_types::{Outcome, TradeRecord};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod loader;
mod render;

/// Performance statistics for a trading journal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Also write logs to a daily-rotated file in this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full statistics report for a journal.
    Report(ReportArgs),
    /// Quick statistics over a filtered journal.
    Summary(SummaryArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser)]
struct ReportArgs {
    /// Path to the journal export (a JSON array of trades).
    #[arg(long, short)]
    trades: PathBuf,

    /// Path to a TOML config file. Defaults to `tradelog.toml` when present.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Calendar year. Defaults to the month of the latest trade.
    #[arg(long, requires = "month")]
    year: Option<i32>,

    /// Calendar month, 1-12.
    #[arg(long, requires = "year")]
    month: Option<u32>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(flatten)]
    simulation: SimulationOverrides,
}

#[derive(Parser)]
struct SummaryArgs {
    /// Path to the journal export (a JSON array of trades).
    #[arg(long, short)]
    trades: PathBuf,

    /// Only trades on this pair (e.g. "EURUSD").
    #[arg(long)]
    pair: Option<String>,

    /// Only trades with this outcome (e.g. "Target", "Stop Loss").
    #[arg(long)]
    outcome: Option<Outcome>,

    /// Only trades in this month (format: YYYY-MM).
    #[arg(long, value_parser = parse_period)]
    month: Option<CalendarPeriod>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.as_deref())?;

    match cli.command {
        Commands::Report(args) => handle_report(args),
        Commands::Summary(args) => handle_summary(args),
    }
}

/// Logs go to stderr so that JSON on stdout stays clean.
fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "tradelog.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;
    Ok(guard)
}

fn handle_report(args: ReportArgs) -> Result<()> {
    let mut config = configuration::load_config(args.config.as_deref())?;
    config.apply_overrides(&args.simulation);
    let engine = AnalyticsEngine::new(&config)?;

    let trades = loader::load_trades(&args.trades)?;
    let period = match (args.year, args.month) {
        (Some(year), Some(month)) => CalendarPeriod::new(year, month)?,
        _ => default_period(&trades),
    };

    let seed = config.simulation.seed.unwrap_or_else(rand::random);
    tracing::info!(
        seed,
        year = period.year(),
        month = period.month(),
        "Calculating statistics."
    );
    let report = engine.calculate(&trades, period, &mut StdRng::seed_from_u64(seed));

    match args.format {
        OutputFormat::Table => render::print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn handle_summary(args: SummaryArgs) -> Result<()> {
    let trades = loader::load_trades(&args.trades)?;
    let filter = TradeFilter {
        pair: args.pair.map(|p| p.trim().to_uppercase()),
        outcome: args.outcome,
        period: args.month,
    };
    let summary = summarize(&trades, &filter);

    match args.format {
        OutputFormat::Table => render::print_summary(&summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}

/// The month of the latest trade, or the current month for an empty journal.
fn default_period(trades: &[TradeRecord]) -> CalendarPeriod {
    let date = trades
        .iter()
        .map(|t| t.date)
        .max()
        .unwrap_or_else(|| Local::now().date_naive());
    CalendarPeriod::containing(date)
}

fn parse_period(raw: &str) -> Result<CalendarPeriod> {
    let Some((year, month)) = raw.split_once('-') else {
        bail!("expected YYYY-MM, got '{raw}'");
    };
    let year: i32 = year.parse().with_context(|| format!("invalid year in '{raw}'"))?;
    let month: u32 = month.parse().with_context(|| format!("invalid month in '{raw}'"))?;
    Ok(CalendarPeriod::new(year, month)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_month_argument() {
        let period = parse_period("2024-03").unwrap();
        assert_eq!((period.year(), period.month()), (2024, 3));
        assert!(parse_period("2024-13").is_err());
        assert!(parse_period("March").is_err());
    }

    #[test]
    fn default_period_follows_latest_trade() {
        let trades = vec![
            TradeRecord::new(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), "EURUSD", Outcome::Target),
            TradeRecord::new(NaiveDate::from_ymd_opt(2024, 2, 9).unwrap(), "EURUSD", Outcome::Target),
        ];
        let period = default_period(&trades);
        assert_eq!((period.year(), period.month()), (2024, 5));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
