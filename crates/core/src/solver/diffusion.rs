//! Implicit diffusion by Gauss-Seidel relaxation
//!
//! Solves `(1 + 6a) x - a Σ x_neighbours = x_prev` with a fixed number of
//! sweeps, where `a = dt * diff * (nx - 2) * (ny - 2)`. Being implicit, the
//! scheme stays stable for any rate; fewer sweeps only mean a blurrier
//! approximation of true diffusion.

use super::boundary::{enforce_boundary_conditions, BoundaryKind};
use super::sweep::{red_black_sweep, Relaxation, Sweep};
use crate::grid::{CellFlags, ScalarField};

/// Diffuse `current` from `previous`
///
/// Non-free cells are left untouched; boundary conditions for `kind` are
/// re-applied after each sweep.
pub(crate) fn diffuse(
    kind: BoundaryKind,
    sweep: Sweep,
    current: &mut ScalarField,
    previous: &ScalarField,
    flags: &[CellFlags],
    diffusion_rate: f32,
    time_step: f32,
    iterations: usize,
    snapshot: &mut ScalarField,
) {
    let dims = sweep.dims;
    let a = time_step * diffusion_rate * (dims.nx - 2) as f32 * (dims.ny - 2) as f32;
    let coeffs = Relaxation { a, c: 1.0 + 6.0 * a };

    for _ in 0..iterations {
        red_black_sweep(sweep, current, previous, flags, coeffs, snapshot);
        enforce_boundary_conditions(kind, current, flags);
    }
}
