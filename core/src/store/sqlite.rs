//! Local SQLite row-store. Same table shapes as the hosted backend, used
//! for offline seeding, the runner's report, and tests.

use super::RowStore;
use crate::{
    catalog::{parse_label, Category, Region, Season, WeatherCondition},
    config::INVENTORY_TABLE,
    error::{SeedError, SeedResult},
    notification::{Notification, NotificationKind, StoredNotification, NOTIFICATION_LIST_LIMIT},
    record::InventoryRecord,
};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, types::Type, Connection, Row};
use uuid::Uuid;

const INVENTORY_COLUMNS: &str = "product_id, store_id, date, inventory_level, units_sold,
    units_ordered, demand_forecast, predicted_units_sold, price, discount,
    competitor_pricing, revenue, stock_movement, inventory_turnover, category,
    region, weather_condition, seasonality, holiday_promotion, reorder_alert";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> SeedResult<Self> {
        let conn = Connection::open(path)?;
        // WAL only matters for real files; in-memory ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SeedResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Apply all schema migrations in order. Idempotent.
    pub fn migrate(&self) -> SeedResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_inventory.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_notifications.sql"))?;
        Ok(())
    }

    // ── Inventory ──────────────────────────────────────────────

    pub fn inventory_count(&self) -> SeedResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM inventory_data", [], |row| row.get(0))?;
        Ok(n)
    }

    /// Rows with `start <= date <= end`, oldest first, in insert order
    /// within a day.
    pub fn records_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SeedResult<Vec<InventoryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory_data
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date ASC, id ASC"
        ))?;
        let rows = stmt.query_map(params![start.to_string(), end.to_string()], read_record)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// The newest `limit` rows, newest day first.
    pub fn latest_records(&self, limit: usize) -> SeedResult<Vec<InventoryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory_data
             ORDER BY date DESC, id DESC LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit as i64], read_record)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn reorder_alert_count_since(&self, since: NaiveDate) -> SeedResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM inventory_data WHERE reorder_alert = 1 AND date >= ?1",
            params![since.to_string()],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    pub fn distinct_categories(&self) -> SeedResult<Vec<String>> {
        self.distinct_text("category")
    }

    pub fn distinct_regions(&self) -> SeedResult<Vec<String>> {
        self.distinct_text("region")
    }

    fn distinct_text(&self, column: &'static str) -> SeedResult<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT {column} FROM inventory_data ORDER BY {column}"
        ))?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Notifications ──────────────────────────────────────────

    /// The user's newest notifications, at most `NOTIFICATION_LIST_LIMIT`.
    pub fn notifications_for_user(&self, user_id: Uuid) -> SeedResult<Vec<StoredNotification>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, type, title, message, read, created_at
             FROM notifications WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(
            params![user_id.to_string(), NOTIFICATION_LIST_LIMIT as i64],
            |row| {
                let user: String = row.get(1)?;
                let kind: String = row.get(2)?;
                let created: String = row.get(6)?;
                Ok(StoredNotification {
                    id: row.get(0)?,
                    notification: Notification {
                        user_id: Uuid::parse_str(&user)
                            .map_err(|e| bad_column(1, e.to_string()))?,
                        kind: NotificationKind::ALL
                            .into_iter()
                            .find(|k| k.as_str() == kind)
                            .ok_or_else(|| {
                                bad_column(2, format!("unknown notification type '{kind}'"))
                            })?,
                        title: row.get(3)?,
                        message: row.get(4)?,
                        read: row.get::<_, i32>(5)? != 0,
                        created_at: DateTime::parse_from_rfc3339(&created)
                            .map_err(|e| bad_column(6, e.to_string()))?
                            .with_timezone(&Utc),
                    },
                })
            },
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Returns false when no notification has that id.
    pub fn mark_notification_read(&self, id: i64) -> SeedResult<bool> {
        let n = self
            .conn
            .execute("UPDATE notifications SET read = 1 WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    /// Marks every unread notification of the user; returns how many changed.
    pub fn mark_all_read(&self, user_id: Uuid) -> SeedResult<usize> {
        let n = self.conn.execute(
            "UPDATE notifications SET read = 1 WHERE user_id = ?1 AND read = 0",
            params![user_id.to_string()],
        )?;
        Ok(n)
    }
}

impl RowStore for SqliteStore {
    /// Whole batch in one transaction: all rows land or none do.
    fn insert_inventory(&mut self, table: &str, rows: &[InventoryRecord]) -> SeedResult<usize> {
        if table != INVENTORY_TABLE {
            return Err(SeedError::InvalidConfig {
                reason: format!("sqlite store has no table '{table}'"),
            });
        }
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO inventory_data ({INVENTORY_COLUMNS}) VALUES
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                  ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)"
            ))?;
            for r in rows {
                stmt.execute(params![
                    &r.product_id,
                    &r.store_id,
                    r.date.to_string(),
                    r.inventory_level as i64,
                    r.units_sold as i64,
                    r.units_ordered as i64,
                    r.demand_forecast as i64,
                    r.predicted_units_sold as i64,
                    r.price,
                    r.discount,
                    r.competitor_pricing,
                    r.revenue,
                    r.stock_movement,
                    r.inventory_turnover,
                    r.category.label(),
                    r.region.label(),
                    r.weather_condition.label(),
                    r.seasonality.label(),
                    r.holiday_promotion as i32,
                    r.reorder_alert as i32,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    fn insert_notifications(&mut self, rows: &[Notification]) -> SeedResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO notifications (user_id, type, title, message, read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for n in rows {
                stmt.execute(params![
                    n.user_id.to_string(),
                    n.kind.as_str(),
                    &n.title,
                    &n.message,
                    n.read as i32,
                    n.created_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<InventoryRecord> {
    let date: String = row.get(2)?;
    Ok(InventoryRecord {
        product_id: row.get(0)?,
        store_id: row.get(1)?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|e| bad_column(2, e.to_string()))?,
        inventory_level: row.get::<_, i64>(3)? as u32,
        units_sold: row.get::<_, i64>(4)? as u32,
        units_ordered: row.get::<_, i64>(5)? as u32,
        demand_forecast: row.get::<_, i64>(6)? as u32,
        predicted_units_sold: row.get::<_, i64>(7)? as u32,
        price: row.get(8)?,
        discount: row.get(9)?,
        competitor_pricing: row.get(10)?,
        revenue: row.get(11)?,
        stock_movement: row.get(12)?,
        inventory_turnover: row.get(13)?,
        category: label_column(row, 14, &Category::ALL)?,
        region: label_column(row, 15, &Region::ALL)?,
        weather_condition: label_column(row, 16, &WeatherCondition::ALL)?,
        seasonality: label_column(row, 17, &Season::ALL)?,
        holiday_promotion: row.get::<_, i32>(18)? != 0,
        reorder_alert: row.get::<_, i32>(19)? != 0,
    })
}

fn label_column<T: Copy + std::fmt::Display>(
    row: &Row<'_>,
    idx: usize,
    all: &[T],
) -> rusqlite::Result<T> {
    let label: String = row.get(idx)?;
    parse_label(all, &label).ok_or_else(|| bad_column(idx, format!("unknown label '{label}'")))
}

fn bad_column(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, msg.into())
}
