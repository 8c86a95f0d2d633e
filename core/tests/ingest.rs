//! Batch driver behavior against scripted and SQLite row-stores.

use chrono::NaiveDate;
use inventory_core::{
    config::{GeneratorConfig, IngestConfig},
    error::{SeedError, SeedResult},
    ingest::{BatchIngester, BatchOutcome, BatchStatus, Pacer},
    notification::Notification,
    rng::SeedRng,
    store::{RowStore, SqliteStore},
    synthesizer::RecordSynthesizer,
    InventoryRecord,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// What a store or pacer did, in call order.
#[derive(Debug, Clone, PartialEq)]
enum Event {
    Insert(usize),
    Pause,
}

type EventLog = Rc<RefCell<Vec<Event>>>;

/// Accepts every batch except the listed 1-based call numbers.
#[derive(Default)]
struct ScriptedStore {
    fail_on: Vec<usize>,
    calls: usize,
    sizes: Vec<usize>,
    tables: Vec<String>,
    log: Option<EventLog>,
}

impl ScriptedStore {
    fn failing(fail_on: &[usize]) -> Self {
        Self {
            fail_on: fail_on.to_vec(),
            ..Self::default()
        }
    }
}

impl RowStore for ScriptedStore {
    fn insert_inventory(&mut self, table: &str, rows: &[InventoryRecord]) -> SeedResult<usize> {
        self.calls += 1;
        self.sizes.push(rows.len());
        self.tables.push(table.to_string());
        if let Some(log) = &self.log {
            log.borrow_mut().push(Event::Insert(self.calls));
        }
        if self.fail_on.contains(&self.calls) {
            return Err(SeedError::Backend {
                table: table.to_string(),
                status: 503,
                message: format!("scripted failure on call {}", self.calls),
            });
        }
        Ok(rows.len())
    }

    fn insert_notifications(&mut self, rows: &[Notification]) -> SeedResult<usize> {
        Ok(rows.len())
    }
}

/// Reports one row fewer than it was handed.
struct ShortCountStore;

impl RowStore for ShortCountStore {
    fn insert_inventory(&mut self, _table: &str, rows: &[InventoryRecord]) -> SeedResult<usize> {
        Err(SeedError::RowCountMismatch {
            expected: rows.len(),
            actual: rows.len().saturating_sub(1),
        })
    }

    fn insert_notifications(&mut self, rows: &[Notification]) -> SeedResult<usize> {
        Ok(rows.len())
    }
}

#[derive(Default)]
struct RecordingPacer {
    pauses: Vec<Duration>,
    log: Option<EventLog>,
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
        if let Some(log) = &self.log {
            log.borrow_mut().push(Event::Pause);
        }
    }
}

fn full_window() -> Vec<InventoryRecord> {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = GeneratorConfig::ending(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    RecordSynthesizer::new().generate(&config, &mut SeedRng::seeded(2024))
}

#[test]
fn all_batches_succeed() {
    let records = full_window();
    let mut store = ScriptedStore::default();
    let mut pacer = RecordingPacer::default();

    let report = BatchIngester::new(&mut store, &mut pacer, IngestConfig::default())
        .unwrap()
        .run(&records);

    assert_eq!(report.generated, 36_550);
    assert_eq!(report.succeeded, 36_550);
    assert_eq!(report.failed, 0);
    assert_eq!(report.total_batches, 37);
    assert!(report.is_success());
    assert_eq!(report.exit_code(), 0);

    assert_eq!(store.calls, 37);
    assert!(store.sizes[..36].iter().all(|&s| s == 1000));
    assert_eq!(store.sizes[36], 550);
    assert!(store.tables.iter().all(|t| t == "inventory_data"));
}

#[test]
fn one_failed_batch_is_isolated() {
    let records = full_window();
    let mut store = ScriptedStore::failing(&[5]);
    let mut pacer = RecordingPacer::default();

    let report = BatchIngester::new(&mut store, &mut pacer, IngestConfig::default())
        .unwrap()
        .run(&records);

    assert_eq!(report.failed, 1000, "only batch 5 failed");
    assert_eq!(report.succeeded, 35_550);
    assert_eq!(report.failed_batches, vec![5]);
    assert_eq!(store.calls, 37, "later batches must still be attempted");
    assert!(!report.is_success());
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn counters_always_cover_every_record() {
    let records = full_window();
    let cases: Vec<Vec<usize>> = vec![vec![], vec![1], vec![37], vec![2, 3, 4], (1..=37).collect()];
    for failures in cases {
        let mut store = ScriptedStore::failing(&failures);
        let report = BatchIngester::new(&mut store, RecordingPacer::default(), IngestConfig::default())
            .unwrap()
            .run(&records);
        assert_eq!(
            report.succeeded + report.failed,
            36_550,
            "failures at {failures:?} lost records"
        );
        assert_eq!(report.failed_batches, failures);
    }
}

#[test]
fn pause_follows_every_batch_including_failures() {
    let records = full_window();
    let mut store = ScriptedStore::failing(&[1, 2]);
    let mut pacer = RecordingPacer::default();

    BatchIngester::new(&mut store, &mut pacer, IngestConfig::default())
        .unwrap()
        .run(&records);

    assert_eq!(pacer.pauses.len(), 37);
    assert!(pacer.pauses.iter().all(|d| *d == Duration::from_millis(100)));
}

#[test]
fn each_insert_and_its_pause_finish_before_the_next_insert() {
    let records = full_window();
    let log = EventLog::default();
    let mut store = ScriptedStore {
        log: Some(log.clone()),
        ..ScriptedStore::failing(&[2])
    };
    let mut pacer = RecordingPacer {
        log: Some(log.clone()),
        ..RecordingPacer::default()
    };
    let config = IngestConfig {
        batch_size: 10_000,
        ..IngestConfig::default()
    };

    let report = BatchIngester::new(&mut store, &mut pacer, config)
        .unwrap()
        .run(&records);
    assert_eq!(report.failed_batches, vec![2]);

    assert_eq!(
        *log.borrow(),
        vec![
            Event::Insert(1),
            Event::Pause,
            Event::Insert(2),
            Event::Pause,
            Event::Insert(3),
            Event::Pause,
            Event::Insert(4),
            Event::Pause,
        ]
    );
}

#[test]
fn progress_reports_cumulative_percent() {
    let records = full_window();
    let mut store = ScriptedStore::failing(&[2]);
    let mut outcomes: Vec<BatchOutcome> = Vec::new();

    BatchIngester::new(&mut store, RecordingPacer::default(), IngestConfig::default())
        .unwrap()
        .run_with(&records, |o| outcomes.push(o.clone()));

    assert_eq!(outcomes.len(), 37);
    assert_eq!(outcomes[0].index, 1);
    assert_eq!(outcomes[0].total_batches, 37);
    assert_eq!(format!("{:.1}", outcomes[0].percent_complete()), "2.7");
    assert!(matches!(outcomes[1].status, BatchStatus::Failed { ref error } if error.contains("call 2")));
    assert_eq!(outcomes[2].succeeded, 2000);
    assert_eq!(outcomes[2].failed, 1000);

    let last = outcomes.last().unwrap();
    assert_eq!(last.size, 550);
    assert_eq!(last.processed, 36_550);
    assert_eq!(format!("{:.1}", last.percent_complete()), "100.0");
}

#[test]
fn reported_count_mismatch_counts_as_failure() {
    let records = full_window();
    let config = IngestConfig {
        batch_size: 10_000,
        ..IngestConfig::default()
    };
    let report = BatchIngester::new(ShortCountStore, RecordingPacer::default(), config)
        .unwrap()
        .run(&records);

    assert_eq!(report.total_batches, 4);
    assert_eq!(report.failed, 36_550);
    assert_eq!(report.succeeded, 0);
}

#[test]
fn zero_batch_size_is_rejected_up_front() {
    let config = IngestConfig {
        batch_size: 0,
        ..IngestConfig::default()
    };
    let err = BatchIngester::new(ScriptedStore::default(), RecordingPacer::default(), config)
        .err()
        .expect("batch size 0 must be rejected");
    assert!(matches!(err, SeedError::InvalidConfig { .. }));
}

#[test]
fn sqlite_store_receives_whole_window() {
    let store = SqliteStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    let records = full_window();

    let mut ingester =
        BatchIngester::new(store, RecordingPacer::default(), IngestConfig::default()).unwrap();
    let report = ingester.run(&records);
    let store = ingester.into_store();

    assert!(report.is_success());
    assert_eq!(store.inventory_count().unwrap(), 36_550);

    // Re-running appends rather than deduplicating.
    let mut ingester =
        BatchIngester::new(store, RecordingPacer::default(), IngestConfig::default()).unwrap();
    ingester.run(&records);
    assert_eq!(ingester.into_store().inventory_count().unwrap(), 73_100);
}

#[test]
fn sqlite_store_rejects_unknown_table_per_batch() {
    let store = SqliteStore::in_memory().unwrap();
    store.migrate().unwrap();
    let config = IngestConfig {
        table: "inventory_archive".into(),
        ..IngestConfig::default()
    };
    let records = full_window();
    let report = BatchIngester::new(store, RecordingPacer::default(), config)
        .unwrap()
        .run(&records[..2500]);

    assert_eq!(report.failed, 2500);
    assert_eq!(report.failed_batches, vec![1, 2, 3]);
}
