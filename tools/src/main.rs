//! seed-runner: fills the inventory backend with two years of synthetic rows.
//!
//! Usage:
//!   seed-runner                          # hosted backend, from env
//!   seed-runner --db seed.db --report    # local SQLite file
//!   seed-runner --seed 42 --batch-size 500 --pace-ms 250
//!   seed-runner --notify-user <uuid>

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate, Utc};
use inventory_core::{
    analytics::{aggregate_by_date, DashboardMetrics},
    config::{BackendConfig, GeneratorConfig, IngestConfig},
    ingest::{BatchIngester, BatchOutcome, BatchStatus, IngestReport, ThreadPacer},
    notification::generate_notifications,
    rng::SeedRng,
    store::{RestStore, RowStore, SqliteStore},
    synthesizer::RecordSynthesizer,
    SeedError,
};
use std::env;
use std::process::ExitCode;
use uuid::Uuid;

const REPORT_WINDOW_DAYS: i64 = 7;

enum Target {
    Rest(RestStore),
    Sqlite(SqliteStore),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(report) => ExitCode::from(report.exit_code() as u8),
        Err(e) => {
            if let Some(SeedError::MissingConfig { .. } | SeedError::InvalidConfig { .. }) =
                e.downcast_ref::<SeedError>()
            {
                eprintln!("Configuration error: {e}");
            } else {
                eprintln!("Fatal error during seeding: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<IngestReport> {
    let args: Vec<String> = env::args().collect();
    let db = flag_value(&args, "--db");
    let seed: Option<u64> = parse_opt(&args, "--seed")?;
    let want_report = args.iter().any(|a| a == "--report");
    let notify_user: Option<Uuid> = parse_opt(&args, "--notify-user")?;

    let defaults = IngestConfig::default();
    let ingest_config = IngestConfig {
        table: flag_value(&args, "--table").map_or(defaults.table, str::to_string),
        batch_size: parse_opt(&args, "--batch-size")?.unwrap_or(defaults.batch_size),
        pace: parse_opt(&args, "--pace-ms")?
            .map_or(defaults.pace, std::time::Duration::from_millis),
    };
    ingest_config.validate()?;

    let mut gen_config = GeneratorConfig::ending(Local::now().date_naive());
    gen_config.days = parse_opt(&args, "--days")?.unwrap_or(gen_config.days);
    gen_config.records_per_day = parse_opt(&args, "--per-day")?.unwrap_or(gen_config.records_per_day);
    gen_config.validate()?;

    // Configuration first: nothing is generated against a backend we
    // cannot reach.
    let target = match db {
        Some(path) => {
            let store = SqliteStore::open(path).with_context(|| format!("opening {path}"))?;
            store.migrate()?;
            Target::Sqlite(store)
        }
        None => Target::Rest(RestStore::new(&BackendConfig::from_env()?)?),
    };

    let mut rng = match seed {
        Some(s) => SeedRng::seeded(s),
        None => SeedRng::from_entropy(),
    };

    println!(
        "Generating {} inventory records for {} days ending {}...",
        gen_config.total_records(),
        gen_config.days,
        gen_config.end_date
    );
    let records = RecordSynthesizer::new().generate(&gen_config, &mut rng);
    println!("Total records to insert: {}", records.len());

    let (report, mut target) = match target {
        Target::Rest(store) => {
            let (report, store) = ingest(store, ingest_config, &records)?;
            (report, Target::Rest(store))
        }
        Target::Sqlite(store) => {
            let (report, store) = ingest(store, ingest_config, &records)?;
            (report, Target::Sqlite(store))
        }
    };

    print_summary(&report);

    if let Some(user) = notify_user {
        let notes = generate_notifications(user, Utc::now(), &mut rng);
        let store: &mut dyn RowStore = match &mut target {
            Target::Rest(s) => s,
            Target::Sqlite(s) => s,
        };
        let inserted = store
            .insert_notifications(&notes)
            .context("inserting sample notifications")?;
        println!("Inserted {inserted} sample notifications for user {user}");
    }

    if want_report {
        match &target {
            Target::Sqlite(store) => print_dashboard(store, gen_config.end_date)?,
            Target::Rest(_) => log::warn!("--report needs --db; skipping"),
        }
    }

    Ok(report)
}

fn ingest<S: RowStore>(
    store: S,
    config: IngestConfig,
    records: &[inventory_core::InventoryRecord],
) -> Result<(IngestReport, S)> {
    let mut ingester = BatchIngester::new(store, ThreadPacer, config)?;
    let report = ingester.run_with(records, print_progress);
    Ok((report, ingester.into_store()))
}

fn print_progress(outcome: &BatchOutcome) {
    let line = progress_line(outcome);
    if outcome.is_success() {
        println!("{line}");
    } else {
        eprintln!("{line}");
    }
}

fn progress_line(outcome: &BatchOutcome) -> String {
    match &outcome.status {
        BatchStatus::Inserted => format!(
            "✓ Batch {}/{} complete ({:.1}% done - {} records inserted)",
            outcome.index,
            outcome.total_batches,
            outcome.percent_complete(),
            outcome.succeeded
        ),
        BatchStatus::Failed { error } => format!(
            "✗ Batch {}/{} failed ({:.1}% done): {error}",
            outcome.index,
            outcome.total_batches,
            outcome.percent_complete()
        ),
    }
}

fn print_summary(report: &IngestReport) {
    println!();
    println!("=== Database Seeding Summary ===");
    println!("  Total records generated: {}", report.generated);
    println!("  Successfully inserted:   {}", report.succeeded);
    println!("  Failed insertions:       {}", report.failed);
    if !report.failed_batches.is_empty() {
        println!("  Failed batches:          {:?}", report.failed_batches);
    }
}

fn print_dashboard(store: &SqliteStore, today: NaiveDate) -> Result<()> {
    let week_ago = today - Duration::days(REPORT_WINDOW_DAYS);
    let two_weeks_ago = today - Duration::days(2 * REPORT_WINDOW_DAYS);

    let current = store.records_between(week_ago, today)?;
    let previous = store.records_between(two_weeks_ago, week_ago - Duration::days(1))?;
    let m = DashboardMetrics::compute(&current, &previous);

    println!();
    println!("=== Last {REPORT_WINDOW_DAYS} Days ===");
    println!("  revenue:         ${:.2} ({:+.1}%)", m.total_revenue, m.revenue_change);
    println!("  units sold:      {} ({:+.1}%)", m.total_units_sold, m.units_sold_change);
    println!("  avg inventory:   {:.0}", m.avg_inventory_level);
    println!("  turnover rate:   {:.2}x", m.inventory_turnover_rate);
    println!("  reorder alerts:  {}", m.reorder_alerts_count);
    println!();
    for p in aggregate_by_date(&current) {
        println!(
            "  {} | sold {:>5} | predicted {:>5} | revenue ${:>10.2}",
            p.date, p.units_sold, p.predicted_units_sold, p.revenue
        );
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_opt<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    flag_value(args, flag)
        .map(|raw| raw.parse::<T>().with_context(|| format!("invalid value for {flag}: '{raw}'")))
        .transpose()
}
