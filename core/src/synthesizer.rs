//! Record synthesizer: fills a fixed historical window with synthetic
//! inventory rows.
//!
//! DRAW ORDER (fixed; scripted tests depend on it):
//!   product, store, category, region, base units, sales noise,
//!   prediction noise, price, discount roll, [discount amount],
//!   inventory level, order factor, competitor factor, weather, holiday.

use crate::{
    catalog::{self, Category, Region, Season, WeatherCondition},
    config::GeneratorConfig,
    record::{self, InventoryRecord},
    rng::UniformSource,
};
use chrono::{Duration, NaiveDate};

pub const DISCOUNT_PROBABILITY: f64 = 0.25;
pub const MAX_DISCOUNT: f64 = 0.35;
pub const HOLIDAY_PROBABILITY: f64 = 0.15;

/// Owns the fixed product and store code lists so they are built once
/// per run rather than once per record.
pub struct RecordSynthesizer {
    products: Vec<String>,
    stores: Vec<String>,
}

impl Default for RecordSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSynthesizer {
    pub fn new() -> Self {
        Self {
            products: catalog::product_codes(),
            stores: catalog::store_codes(),
        }
    }

    /// Generate the whole window, oldest day first.
    pub fn generate<R: UniformSource>(
        &self,
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Vec<InventoryRecord> {
        let mut records = Vec::with_capacity(config.total_records());
        for date in window_dates(config.end_date, config.days) {
            for _ in 0..config.records_per_day {
                records.push(self.synthesize(date, rng));
            }
        }
        log::info!(
            "synthesized {} records over {} days ending {}",
            records.len(),
            config.days,
            config.end_date
        );
        records
    }

    /// Build one record for `date`.
    pub fn synthesize<R: UniformSource>(&self, date: NaiveDate, rng: &mut R) -> InventoryRecord {
        let product_id = rng.pick(&self.products).clone();
        let store_id = rng.pick(&self.stores).clone();
        let category = *rng.pick(&Category::ALL);
        let region = *rng.pick(&Region::ALL);

        let base_units = 30 + rng.below(200) as i64;
        let units_sold = floor_at_least_one(base_units as f64 + rng.noise(25.0));
        let predicted_units_sold = floor_at_least_one(units_sold as f64 + rng.noise(10.0));

        let price = record::round_cents(rng.span(5.0, 150.0));
        let discount = if rng.chance(DISCOUNT_PROBABILITY) {
            record::round_cents(rng.span(0.0, MAX_DISCOUNT))
        } else {
            0.0
        };

        let inventory_level = 50 + rng.below(800) as u32;
        let units_ordered = (units_sold as f64 * rng.span(0.8, 0.6)).floor() as u32;
        let competitor_pricing = record::round_cents(price * rng.span(0.85, 0.25));

        let weather_condition = *rng.pick(&WeatherCondition::ALL);
        let holiday_promotion = rng.chance(HOLIDAY_PROBABILITY);

        InventoryRecord {
            product_id,
            store_id,
            date,
            inventory_level,
            units_sold,
            units_ordered,
            demand_forecast: record::demand_forecast(predicted_units_sold),
            predicted_units_sold,
            price,
            discount,
            competitor_pricing,
            revenue: record::revenue(units_sold, price, discount),
            stock_movement: record::stock_movement(units_ordered, units_sold),
            inventory_turnover: record::inventory_turnover(units_sold, inventory_level),
            category,
            region,
            weather_condition,
            seasonality: Season::for_date(date),
            holiday_promotion,
            reorder_alert: record::reorder_alert(inventory_level),
        }
    }
}

/// `days` consecutive dates ending at `end` inclusive, oldest first.
pub fn window_dates(end: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    (0..days as i64)
        .rev()
        .map(move |offset| end - Duration::days(offset))
}

fn floor_at_least_one(value: f64) -> u32 {
    value.floor().max(1.0) as u32
}
