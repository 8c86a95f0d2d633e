//! Shared primitive types used across the seeder.

/// Product code, `P0001`..`P0050`.
pub type ProductId = String;

/// Store code, `S001`..`S040`.
pub type StoreId = String;
