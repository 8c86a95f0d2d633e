//! Batch ingestion driver.
//!
//! RULES:
//!   - Chunks go out strictly one at a time, in order.
//!   - A chunk is finished (insert returned AND pacing pause elapsed)
//!     before the next one starts.
//!   - A failed chunk is counted whole and never retried; later chunks
//!     still run and earlier ones are not rolled back.

use crate::{
    config::IngestConfig,
    error::SeedResult,
    record::InventoryRecord,
    store::RowStore,
};
use std::ops::Range;
use std::time::Duration;

/// Inter-batch throttle.
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn pause(&mut self, duration: Duration) {
        (**self).pause(duration)
    }
}

/// Blocks the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Contiguous index ranges of at most `batch_size`; the last may be short.
pub fn partition(len: usize, batch_size: usize) -> Vec<Range<usize>> {
    assert!(batch_size > 0, "batch_size must be > 0");
    (0..len)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(len))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchStatus {
    Inserted,
    Failed { error: String },
}

/// What happened to one chunk, plus running totals at that point.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// 1-based.
    pub index: usize,
    pub total_batches: usize,
    pub size: usize,
    /// Records covered by this and all earlier chunks.
    pub processed: usize,
    pub total_records: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub status: BatchStatus,
}

impl BatchOutcome {
    pub fn percent_complete(&self) -> f64 {
        if self.total_records == 0 {
            return 100.0;
        }
        self.processed as f64 / self.total_records as f64 * 100.0
    }

    pub fn is_success(&self) -> bool {
        self.status == BatchStatus::Inserted
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub generated: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_batches: usize,
    /// 1-based indices of chunks that failed.
    pub failed_batches: Vec<usize>,
}

impl IngestReport {
    pub fn is_success(&self) -> bool {
        self.failed_batches.is_empty()
    }

    /// 0 when every chunk landed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

pub struct BatchIngester<S: RowStore, P: Pacer> {
    store: S,
    pacer: P,
    config: IngestConfig,
}

impl<S: RowStore, P: Pacer> BatchIngester<S, P> {
    pub fn new(store: S, pacer: P, config: IngestConfig) -> SeedResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            pacer,
            config,
        })
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn run(&mut self, records: &[InventoryRecord]) -> IngestReport {
        self.run_with(records, |_| {})
    }

    /// Ship every chunk, calling `on_batch` after each insert attempt
    /// (before the pacing pause).
    pub fn run_with<F>(&mut self, records: &[InventoryRecord], mut on_batch: F) -> IngestReport
    where
        F: FnMut(&BatchOutcome),
    {
        let chunks = partition(records.len(), self.config.batch_size);
        let total_batches = chunks.len();
        let mut succeeded = 0usize;
        let mut failed = 0usize;
        let mut failed_batches = Vec::new();

        log::info!(
            "ingesting {} records into '{}' as {total_batches} batches of up to {}",
            records.len(),
            self.config.table,
            self.config.batch_size
        );

        for (i, range) in chunks.into_iter().enumerate() {
            let index = i + 1;
            let batch = &records[range.clone()];

            let status = match self.store.insert_inventory(&self.config.table, batch) {
                Ok(_) => {
                    succeeded += batch.len();
                    log::debug!("batch {index}/{total_batches}: {} rows inserted", batch.len());
                    BatchStatus::Inserted
                }
                Err(e) => {
                    failed += batch.len();
                    failed_batches.push(index);
                    log::warn!("batch {index}/{total_batches} failed: {e}");
                    BatchStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };

            on_batch(&BatchOutcome {
                index,
                total_batches,
                size: batch.len(),
                processed: range.end,
                total_records: records.len(),
                succeeded,
                failed,
                status,
            });

            self.pacer.pause(self.config.pace);
        }

        log::info!(
            "ingest finished: {succeeded} succeeded, {failed} failed across {total_batches} batches"
        );

        IngestReport {
            generated: records.len(),
            succeeded,
            failed,
            total_batches,
            failed_batches,
        }
    }
}
