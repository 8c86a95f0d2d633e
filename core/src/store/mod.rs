//! Row-store boundary.
//!
//! RULE: Only types in this module talk to a backend.
//! The ingest driver sees a `RowStore` and nothing else.

mod rest;
mod sqlite;

pub use rest::RestStore;
pub use sqlite::SqliteStore;

use crate::{error::SeedResult, notification::Notification, record::InventoryRecord};

/// "Insert N rows into a named table, report the exact affected-row
/// count or an error."
///
/// Implementations make no atomicity promise across calls. Within one
/// call a batch either lands whole or the call returns an error.
pub trait RowStore {
    fn insert_inventory(&mut self, table: &str, rows: &[InventoryRecord]) -> SeedResult<usize>;

    fn insert_notifications(&mut self, rows: &[Notification]) -> SeedResult<usize>;
}

impl<S: RowStore + ?Sized> RowStore for &mut S {
    fn insert_inventory(&mut self, table: &str, rows: &[InventoryRecord]) -> SeedResult<usize> {
        (**self).insert_inventory(table, rows)
    }

    fn insert_notifications(&mut self, rows: &[Notification]) -> SeedResult<usize> {
        (**self).insert_notifications(rows)
    }
}
