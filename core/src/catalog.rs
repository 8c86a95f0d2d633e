//! Fixed enumerations the synthesizer draws from.
//!
//! Labels are the exact strings stored in the backend; the dashboard
//! filters on them, so they must not change.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PRODUCT_COUNT: usize = 50;
pub const STORE_COUNT: usize = 40;

/// `P0001`..`P0050`.
pub fn product_codes() -> Vec<String> {
    (1..=PRODUCT_COUNT).map(|i| format!("P{i:04}")).collect()
}

/// `S001`..`S040`.
pub fn store_codes() -> Vec<String> {
    (1..=STORE_COUNT).map(|i| format!("S{i:03}")).collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Groceries,
    Toys,
    Electronics,
    Furniture,
    Clothing,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Groceries,
        Category::Toys,
        Category::Electronics,
        Category::Furniture,
        Category::Clothing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Groceries   => "Groceries",
            Self::Toys        => "Toys",
            Self::Electronics => "Electronics",
            Self::Furniture   => "Furniture",
            Self::Clothing    => "Clothing",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    North,
    South,
    East,
    West,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::North, Region::South, Region::East, Region::West];

    pub fn label(&self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East  => "East",
            Self::West  => "West",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    Sunny,
    Rainy,
    Cloudy,
    Snowy,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 4] = [
        WeatherCondition::Sunny,
        WeatherCondition::Rainy,
        WeatherCondition::Cloudy,
        WeatherCondition::Snowy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sunny  => "Sunny",
            Self::Rainy  => "Rainy",
            Self::Cloudy => "Cloudy",
            Self::Snowy  => "Snowy",
        }
    }
}

/// Quarter-of-year bucket. Month 0–2 is `Spring`, 3–5 `Summer`,
/// 6–8 `Autumn`, 9–11 `Winter`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// Bucket a zero-based month (0 = January).
    pub fn from_month0(month0: u32) -> Self {
        Self::ALL[(month0 / 3).min(3) as usize]
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self::from_month0(date.month0())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Autumn => "Autumn",
            Self::Winter => "Winter",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_via_label!(Category, Region, WeatherCondition, Season);

/// Parse a stored label back into its enum. Used by the SQLite reader.
pub fn parse_label<T: Copy + fmt::Display>(all: &[T], label: &str) -> Option<T> {
    all.iter().copied().find(|v| v.to_string() == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_and_store_codes_are_zero_padded() {
        let products = product_codes();
        let stores = store_codes();
        assert_eq!(products.len(), 50);
        assert_eq!(stores.len(), 40);
        assert_eq!(products[0], "P0001");
        assert_eq!(products[49], "P0050");
        assert_eq!(stores[0], "S001");
        assert_eq!(stores[39], "S040");
    }

    #[test]
    fn season_buckets_follow_quarters() {
        let expected = [
            Season::Spring, Season::Spring, Season::Spring,
            Season::Summer, Season::Summer, Season::Summer,
            Season::Autumn, Season::Autumn, Season::Autumn,
            Season::Winter, Season::Winter, Season::Winter,
        ];
        for (month0, season) in expected.iter().enumerate() {
            assert_eq!(Season::from_month0(month0 as u32), *season, "month0={month0}");
        }
    }

    #[test]
    fn labels_round_trip_through_parse() {
        for c in Category::ALL {
            assert_eq!(parse_label(&Category::ALL, c.label()), Some(c));
        }
        assert_eq!(parse_label(&Region::ALL, "Central"), None);
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&WeatherCondition::Snowy).unwrap();
        assert_eq!(json, "\"Snowy\"");
    }
}
