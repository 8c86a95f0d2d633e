//! Row-level analytics the dashboard runs over `inventory_data`.

use crate::{
    catalog::{Category, Region},
    record::InventoryRecord,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// One day of summed chart values.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub units_sold: u64,
    pub predicted_units_sold: u64,
    pub revenue: f64,
    pub inventory_level: u64,
}

impl TimeSeriesPoint {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            units_sold: 0,
            predicted_units_sold: 0,
            revenue: 0.0,
            inventory_level: 0,
        }
    }
}

/// Sum rows per calendar day, ordered by date.
pub fn aggregate_by_date<'a, I>(records: I) -> Vec<TimeSeriesPoint>
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    let mut by_day: BTreeMap<NaiveDate, TimeSeriesPoint> = BTreeMap::new();
    for r in records {
        let point = by_day
            .entry(r.date)
            .or_insert_with(|| TimeSeriesPoint::empty(r.date));
        point.units_sold += r.units_sold as u64;
        point.predicted_units_sold += r.predicted_units_sold as u64;
        point.revenue += r.revenue;
        point.inventory_level += r.inventory_level as u64;
    }
    by_day.into_values().collect()
}

/// Headline cards: current window totals plus change vs the previous
/// window of the same length.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardMetrics {
    pub total_revenue: f64,
    pub total_units_sold: u64,
    pub avg_inventory_level: f64,
    pub inventory_turnover_rate: f64,
    pub reorder_alerts_count: usize,
    /// Percent; 0 when the previous window had no revenue.
    pub revenue_change: f64,
    /// Percent; 0 when the previous window sold nothing.
    pub units_sold_change: f64,
}

impl DashboardMetrics {
    pub fn compute(current: &[InventoryRecord], previous: &[InventoryRecord]) -> Self {
        let current_revenue: f64 = current.iter().map(|r| r.revenue).sum();
        let previous_revenue: f64 = previous.iter().map(|r| r.revenue).sum();
        let current_units: u64 = current.iter().map(|r| r.units_sold as u64).sum();
        let previous_units: u64 = previous.iter().map(|r| r.units_sold as u64).sum();

        Self {
            total_revenue: current_revenue,
            total_units_sold: current_units,
            avg_inventory_level: mean(current.iter().map(|r| r.inventory_level as f64)),
            inventory_turnover_rate: mean(current.iter().map(|r| r.inventory_turnover)),
            reorder_alerts_count: current.iter().filter(|r| r.reorder_alert).count(),
            revenue_change: percent_change(current_revenue, previous_revenue),
            units_sold_change: percent_change(current_units as f64, previous_units as f64),
        }
    }
}

fn mean<I: Iterator<Item = f64>>(values: I) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyBand {
    Good,
    Fair,
    Poor,
}

impl AccuracyBand {
    pub fn for_accuracy(accuracy: f64) -> Self {
        if accuracy >= 80.0 {
            Self::Good
        } else if accuracy >= 60.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Inventory table filter: free-text search over product and store
/// codes, plus optional exact category and region.
#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    pub search: String,
    pub category: Option<Category>,
    pub region: Option<Region>,
}

impl InventoryFilter {
    pub fn matches(&self, r: &InventoryRecord) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = r.product_id.to_lowercase().contains(&needle)
            || r.store_id.to_lowercase().contains(&needle);
        let matches_category = self.category.map_or(true, |c| c == r.category);
        let matches_region = self.region.map_or(true, |g| g == r.region);
        matches_search && matches_category && matches_region
    }

    pub fn apply<'a>(&self, records: &'a [InventoryRecord]) -> Vec<&'a InventoryRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
