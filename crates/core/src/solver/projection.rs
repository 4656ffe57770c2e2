//! Pressure projection
//!
//! Removes the divergent part of the velocity field so the smoke behaves as
//! a nearly incompressible gas (Helmholtz-Hodge decomposition):
//!
//! ```text
//! div  = -0.5 * (Δu/nx + Δv/ny + Δw/nz)        central differences
//! ∇²p  = div                                   Gauss-Seidel, `iterations` sweeps
//! u   -= 0.5 * nx * Δp,  v -= 0.5 * ny * Δp,  w -= 0.5 * nz * Δp
//! ```
//!
//! Source, wind and barrier cells contribute no divergence and receive no
//! correction; their pressure is held at zero during the solve.

use super::boundary::{enforce_boundary_conditions, BoundaryKind};
use super::sweep::{red_black_sweep, Relaxation, Sweep};
use crate::grid::{CellFlags, ScalarField};

/// Scratch buffers owned by the solver and reused every tick
#[derive(Debug, Clone)]
pub(crate) struct ProjectionScratch {
    pub divergence: ScalarField,
    /// Poisson solution of the most recent projection
    pub pressure: ScalarField,
    pub snapshot: ScalarField,
}

/// Make `(vx, vy, vz)` approximately divergence-free in place
pub(crate) fn project(
    sweep: Sweep,
    vx: &mut ScalarField,
    vy: &mut ScalarField,
    vz: &mut ScalarField,
    flags: &[CellFlags],
    iterations: usize,
    scratch: &mut ProjectionScratch,
) {
    let dims = sweep.dims;
    let (nx, ny, nz) = (dims.nx, dims.ny, dims.nz);
    let layer_len = dims.layer_len();
    let (inv_nx, inv_ny, inv_nz) = (1.0 / nx as f32, 1.0 / ny as f32, 1.0 / nz as f32);

    scratch.divergence.fill(0.0);
    scratch.pressure.fill(0.0);

    {
        let (vx, vy, vz) = (vx.as_slice(), vy.as_slice(), vz.as_slice());
        sweep.interior_layers(scratch.divergence.as_mut_slice(), |z, layer| {
            for y in 1..ny - 1 {
                for x in 1..nx - 1 {
                    let local = y * nx + x;
                    let idx = z * layer_len + local;
                    if !flags[idx].is_free() {
                        continue;
                    }
                    layer[local] = -0.5
                        * ((vx[idx + 1] - vx[idx - 1]) * inv_nx
                            + (vy[idx + nx] - vy[idx - nx]) * inv_ny
                            + (vz[idx + layer_len] - vz[idx - layer_len]) * inv_nz);
                }
            }
        });
    }

    enforce_boundary_conditions(BoundaryKind::Scalar, &mut scratch.divergence, flags);
    enforce_boundary_conditions(BoundaryKind::Scalar, &mut scratch.pressure, flags);

    let coeffs = Relaxation { a: 1.0, c: 6.0 };
    for _ in 0..iterations {
        red_black_sweep(
            sweep,
            &mut scratch.pressure,
            &scratch.divergence,
            flags,
            coeffs,
            &mut scratch.snapshot,
        );
        enforce_boundary_conditions(BoundaryKind::Scalar, &mut scratch.pressure, flags);
    }

    let pressure = &scratch.pressure;
    subtract_gradient(sweep, vx, pressure, flags, 1, nx as f32);
    subtract_gradient(sweep, vy, pressure, flags, nx, ny as f32);
    subtract_gradient(sweep, vz, pressure, flags, layer_len, nz as f32);

    enforce_boundary_conditions(BoundaryKind::VelocityX, vx, flags);
    enforce_boundary_conditions(BoundaryKind::VelocityY, vy, flags);
    enforce_boundary_conditions(BoundaryKind::VelocityZ, vz, flags);
}

/// `component -= 0.5 * scale * (p[+stride] - p[-stride])` on free interior cells
fn subtract_gradient(
    sweep: Sweep,
    component: &mut ScalarField,
    pressure: &ScalarField,
    flags: &[CellFlags],
    stride: usize,
    scale: f32,
) {
    let dims = sweep.dims;
    let (nx, ny) = (dims.nx, dims.ny);
    let layer_len = dims.layer_len();
    let p = pressure.as_slice();

    sweep.interior_layers(component.as_mut_slice(), |z, layer| {
        for y in 1..ny - 1 {
            for x in 1..nx - 1 {
                let local = y * nx + x;
                let idx = z * layer_len + local;
                if flags[idx].is_free() {
                    layer[local] -= 0.5 * (p[idx + stride] - p[idx - stride]) * scale;
                }
            }
        }
    });
}
