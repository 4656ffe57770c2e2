//! Mass limiting for density advection
//!
//! Semi-Lagrangian sampling is not conservative: tracing back through a
//! diverging velocity field samples the same smoke more than once. The
//! density that originates in source cells is advected on its own so that
//! emission is never limited, and the remainder is scaled down whenever it
//! would carry more mass than entered the pass.

use crate::grid::{CellFlags, ScalarField};

/// Density summed over every non-source cell
pub(crate) fn non_source_total(density: &ScalarField, flags: &[CellFlags]) -> f32 {
    density
        .as_slice()
        .iter()
        .zip(flags)
        .filter(|(_, cell)| !cell.source)
        .map(|(value, _)| *value)
        .sum()
}

/// Copy the source cells of `density` into `emitted` and zero the rest
pub(crate) fn isolate_sources(
    emitted: &mut ScalarField,
    density: &ScalarField,
    flags: &[CellFlags],
) {
    for ((out, value), cell) in emitted
        .as_mut_slice()
        .iter_mut()
        .zip(density.as_slice())
        .zip(flags)
    {
        *out = if cell.source { *value } else { 0.0 };
    }
}

/// Cap the mass carried out of non-source cells at `budget`
///
/// `emitted` is the advected source-only field. Every non-source cell is
/// split into its emitted part, which is kept, and its carried part, which is
/// scaled by `budget / carried` when the carried total exceeds `budget`.
/// Source cells are never touched.
pub(crate) fn limit_growth(
    density: &mut ScalarField,
    emitted: &ScalarField,
    flags: &[CellFlags],
    budget: f32,
) {
    let carried: f32 = density
        .as_slice()
        .iter()
        .zip(emitted.as_slice())
        .zip(flags)
        .filter(|(_, cell)| !cell.source)
        .map(|((value, from_sources), _)| (value - from_sources).max(0.0))
        .sum();

    if carried <= budget || carried <= 0.0 {
        return;
    }

    let ratio = budget.max(0.0) / carried;
    for ((value, from_sources), cell) in density
        .as_mut_slice()
        .iter_mut()
        .zip(emitted.as_slice())
        .zip(flags)
    {
        if !cell.source {
            *value = from_sources + (*value - from_sources).max(0.0) * ratio;
        }
    }
}
