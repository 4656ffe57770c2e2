//! Room grid: field storage and cell classification

pub mod field;
pub mod smoke_grid;

// Re-export main types
pub use field::{GridDims, ScalarField};
pub use smoke_grid::{constants, CellFlags, SmokeGrid};
