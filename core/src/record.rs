//! The inventory row and the pure derivations that fill its computed
//! columns.

use crate::{
    catalog::{Category, Region, Season, WeatherCondition},
    types::{ProductId, StoreId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Restock threshold. Levels strictly below it raise a reorder alert.
pub const REORDER_THRESHOLD: u32 = 150;

/// Display multiplier applied to predicted units to get the forecast.
pub const DEMAND_FORECAST_MULTIPLIER: f64 = 1.08;

/// One synthetic observation of a (product, store, day) triple.
/// Field names are the `inventory_data` column names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryRecord {
    pub product_id:           ProductId,
    pub store_id:             StoreId,
    pub date:                 NaiveDate,
    pub inventory_level:      u32,
    pub units_sold:           u32,
    pub units_ordered:        u32,
    pub demand_forecast:      u32,
    pub predicted_units_sold: u32,
    pub price:                f64,
    pub discount:             f64,
    pub competitor_pricing:   f64,
    pub revenue:              f64,
    pub stock_movement:       i64,
    pub inventory_turnover:   f64,
    pub category:             Category,
    pub region:               Region,
    pub weather_condition:    WeatherCondition,
    pub seasonality:          Season,
    pub holiday_promotion:    bool,
    pub reorder_alert:        bool,
}

pub fn reorder_alert(inventory_level: u32) -> bool {
    inventory_level < REORDER_THRESHOLD
}

/// Units sold per unit on hand, to 4 decimals. Zero stock gives 0.
pub fn inventory_turnover(units_sold: u32, inventory_level: u32) -> f64 {
    if inventory_level == 0 {
        return 0.0;
    }
    round_to(units_sold as f64 / inventory_level as f64, 4)
}

pub fn stock_movement(units_ordered: u32, units_sold: u32) -> i64 {
    units_ordered as i64 - units_sold as i64
}

pub fn demand_forecast(predicted_units_sold: u32) -> u32 {
    (predicted_units_sold as f64 * DEMAND_FORECAST_MULTIPLIER).round() as u32
}

pub fn revenue(units_sold: u32, price: f64, discount: f64) -> f64 {
    round_cents(units_sold as f64 * price * (1.0 - discount))
}

pub fn round_cents(value: f64) -> f64 {
    round_to(value, 2)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// How close the prediction came, as a percentage. Display only; can
/// go negative when the miss exceeds the actual.
pub fn forecast_accuracy(units_sold: u32, predicted_units_sold: u32) -> f64 {
    if units_sold == 0 {
        return 0.0;
    }
    let miss = (predicted_units_sold as f64 - units_sold as f64).abs();
    (1.0 - miss / units_sold as f64) * 100.0
}

impl InventoryRecord {
    pub fn forecast_accuracy(&self) -> f64 {
        forecast_accuracy(self.units_sold, self.predicted_units_sold)
    }
}
