//! Synthetic warehouse inventory generation and batched ingestion.
//!
//! `synthesizer` builds the rows, `ingest` ships them through a
//! `store::RowStore`, `analytics` reads them back the way the dashboard
//! does.

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ingest;
pub mod notification;
pub mod record;
pub mod rng;
pub mod store;
pub mod synthesizer;
pub mod types;

pub use error::{SeedError, SeedResult};
pub use record::InventoryRecord;
