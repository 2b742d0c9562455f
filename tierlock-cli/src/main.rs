//! Tierlock CLI: the engine from the command line.
//!
//! Commands:
//! - `tiers`: print the configured tier schedule
//! - `resolve`: tier status for a locked balance
//! - `price`: price and claim eligibility of an item, plus its per-tier price table
//! - `forecast`: history statistics and next-tier forecast for an event log
//! - `batch`: evaluate a JSONL file of member snapshots and write reports

mod logging;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use tierlock_batch::{
    load_snapshots, summarize, write_reports, write_summary, BatchEvaluator, ReportFormat,
};
use tierlock_core::{
    all_tier_prices, can_claim, compute_statistics, forecast_next_tier_at, price_for_tier,
    tier_status, CatalogItem, EngineConfig, ProgressionEvent,
};

#[derive(Parser)]
#[command(
    name = "tierlock",
    about = "Tierlock CLI: membership tiers, claim pricing and progression forecasts"
)]
struct Cli {
    /// TOML file with [[tiers]] and [forecast] sections. Defaults to the standard schedule.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Log filter when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tier schedule.
    Tiers,
    /// Resolve a locked balance to its tier.
    Resolve {
        /// Locked balance.
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
    },
    /// Price a catalog item for a tier and check claim eligibility.
    Price {
        /// JSON file with one catalog item.
        #[arg(long)]
        item: PathBuf,

        /// Tier name of the claiming user.
        #[arg(long)]
        tier: String,

        /// Claim balance to check affordability against.
        #[arg(long)]
        balance: Option<u64>,
    },
    /// Forecast arrival at the next tier from a progression event log.
    Forecast {
        /// JSON file with an array of progression events.
        #[arg(long)]
        events: PathBuf,

        /// Day to project from (YYYY-MM-DD). Defaults to today (UTC).
        #[arg(long)]
        today: Option<String>,
    },
    /// Evaluate member snapshots in bulk.
    Batch {
        /// JSONL file, one member snapshot per line.
        #[arg(long)]
        input: PathBuf,

        /// Output directory for reports.
        #[arg(long, default_value = "reports")]
        output: PathBuf,

        /// Report format: json or csv.
        #[arg(long, default_value = "json")]
        format: ReportFormat,

        /// Day to project from (YYYY-MM-DD). Defaults to today (UTC).
        #[arg(long)]
        today: Option<String>,

        /// Evaluate members one at a time.
        #[arg(long, default_value_t = false)]
        serial: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize_logging(&cli.log_level)?;

    let config = EngineConfig::load(cli.config.as_deref())
        .with_context(|| match &cli.config {
            Some(path) => format!("loading config {}", path.display()),
            None => "loading default config".to_string(),
        })?;

    match cli.command {
        Commands::Tiers => run_tiers(&config, cli.json),
        Commands::Resolve { amount } => run_resolve(&config, amount, cli.json),
        Commands::Price {
            item,
            tier,
            balance,
        } => run_price(&config, &item, &tier, balance, cli.json),
        Commands::Forecast { events, today } => {
            run_forecast(&config, &events, today.as_deref(), cli.json)
        }
        Commands::Batch {
            input,
            output,
            format,
            today,
            serial,
        } => run_batch(&config, &input, &output, format, today.as_deref(), serial),
    }
}

fn parse_today(today: Option<&str>) -> Result<NaiveDate> {
    Ok(today
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("--today must be YYYY-MM-DD")?
        .unwrap_or_else(|| chrono::Utc::now().date_naive()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_tiers(config: &EngineConfig, json: bool) -> Result<()> {
    if json {
        return print_json(&config.tiers);
    }

    println!(
        "{:<6} {:<12} {:>12} {:>10} {:>9}  Benefits",
        "Level", "Tier", "Requirement", "Multiplier", "Discount"
    );
    println!("{}", "-".repeat(72));
    for tier in &config.tiers {
        println!(
            "{:<6} {:<12} {:>12.0} {:>9.2}x {:>8}%  {}",
            tier.level,
            tier.name,
            tier.requirement,
            tier.multiplier,
            tier.discount_percent,
            tier.benefits.join(", ")
        );
    }
    Ok(())
}

fn run_resolve(config: &EngineConfig, amount: f64, json: bool) -> Result<()> {
    let status = tier_status(&config.tiers, amount);
    if json {
        return print_json(&status);
    }

    println!("Locked balance: {:.2}", status.locked_amount);
    println!("Tier:           {} (level {})", status.current.name, status.current.level);
    match &status.next {
        Some(next) => {
            println!("Next tier:      {} at {:.0}", next.name, next.requirement);
            println!("Progress:       {:.1}%", status.progress_percent);
            println!("Remaining:      {:.2}", status.amount_to_next_tier);
        }
        None => println!("Next tier:      none (top tier)"),
    }
    Ok(())
}

fn run_price(
    config: &EngineConfig,
    item_path: &Path,
    tier: &str,
    balance: Option<u64>,
    json: bool,
) -> Result<()> {
    let item: CatalogItem = read_json(item_path)?;
    if config.tiers.rank_of(tier).is_none() {
        tracing::warn!(tier, "tier is not in the configured schedule");
    }

    let price = price_for_tier(&item, tier);
    let eligibility = balance.map(|b| can_claim(&config.tiers, &item, tier, b));
    let table = all_tier_prices(&config.tiers, &item);

    if json {
        return print_json(&serde_json::json!({
            "tier": tier,
            "price": price,
            "eligibility": eligibility,
            "tier_prices": table,
        }));
    }

    println!(
        "Price for {tier}: {} (base {}, {}% off){}",
        price.price,
        price.original_price,
        price.discount_percent,
        if price.is_free { " FREE" } else { "" }
    );
    if let Some(eligibility) = eligibility {
        match &eligibility.reason {
            None => println!("Claim: eligible"),
            Some(reason) => println!("Claim: not eligible [{}] {reason}", reason.code()),
        }
    }
    println!();
    println!("{:<12} {:>10}  {}", "Tier", "Price", "");
    println!("{}", "-".repeat(32));
    for row in &table {
        let note = if row.locked {
            "locked"
        } else if row.is_free {
            "free"
        } else {
            ""
        };
        println!("{:<12} {:>10}  {}", row.tier, row.price, note);
    }
    Ok(())
}

fn run_forecast(
    config: &EngineConfig,
    events_path: &Path,
    today: Option<&str>,
    json: bool,
) -> Result<()> {
    let events: Vec<ProgressionEvent> = read_json(events_path)?;
    let today = parse_today(today)?;

    let statistics = compute_statistics(&events);
    let forecast = forecast_next_tier_at(&events, &config.tiers, &config.forecast, today);

    if json {
        return print_json(&serde_json::json!({
            "statistics": statistics,
            "forecast": forecast,
        }));
    }

    println!("Events:               {}", statistics.event_count);
    println!("Total locked:         {:.2}", statistics.total_locked);
    println!("Avg tier dwell:       {:.1} days", statistics.average_tier_dwell_days);
    println!("Upgrade velocity:     {:.2} / month", statistics.upgrade_velocity_per_month);
    println!();
    println!("Current tier:         {}", forecast.current_tier.name);
    match &forecast.next_tier {
        None => println!("Next tier:            none (top tier)"),
        Some(next) => {
            println!("Next tier:            {}", next.name);
            println!("Remaining:            {:.2}", forecast.amount_remaining);
            match (forecast.estimated_arrival_date, forecast.days_remaining) {
                (Some(date), Some(days)) => {
                    println!("Daily rate:           {:.2}", forecast.daily_rate);
                    println!("Estimated arrival:    {date} ({days} days)");
                }
                _ => println!("Estimated arrival:    not enough data yet"),
            }
        }
    }
    println!("Confidence:           {}", forecast.confidence);
    Ok(())
}

fn run_batch(
    config: &EngineConfig,
    input: &Path,
    output: &Path,
    format: ReportFormat,
    today: Option<&str>,
    serial: bool,
) -> Result<()> {
    let today = parse_today(today)?;
    let snapshots = load_snapshots(input)?;

    let evaluator = BatchEvaluator::new(config.clone()).with_parallelism(!serial);
    let reports = evaluator.evaluate(&snapshots, today);
    let summary = summarize(&reports, config);

    let reports_path = write_reports(output, &reports, format)?;
    let summary_path = write_summary(output, &summary)?;

    println!("Members evaluated: {}", summary.members);
    for count in &summary.tiers {
        println!("  {:<12} {:>6}", count.tier, count.members);
    }
    println!(
        "Forecast confidence: high {}, medium {}, low {}",
        summary.confidence.high, summary.confidence.medium, summary.confidence.low
    );
    println!("Reports: {}", reports_path.display());
    println!("Summary: {}", summary_path.display());
    Ok(())
}
