//! Layer-partitioned sweeps shared by every kernel
//!
//! A sweep hands each z-layer of the output buffer to a kernel closure. In
//! parallel mode the layers are forked onto the current rayon pool with
//! `par_chunks_mut` and joined before the caller continues, so boundary
//! conditions always see a finished sweep. Each task writes only its own
//! layer; everything it reads comes from buffers that are not written during
//! the same sweep. A panicking task propagates out of the join and aborts the
//! tick.

use crate::grid::{CellFlags, GridDims, ScalarField};
use rayon::prelude::*;

/// Scheduling for one sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Sweep {
    pub dims: GridDims,
    pub parallel: bool,
}

impl Sweep {
    /// Run `kernel(z, layer)` for every interior layer of `out`
    ///
    /// The shell layers `z = 0` and `z = nz - 1` are never handed out.
    pub fn interior_layers<F>(&self, out: &mut [f32], kernel: F)
    where
        F: Fn(usize, &mut [f32]) + Send + Sync,
    {
        let nz = self.dims.nz;
        let run = |(z, layer): (usize, &mut [f32])| {
            if z > 0 && z < nz - 1 {
                kernel(z, layer);
            }
        };

        if self.parallel {
            out.par_chunks_mut(self.dims.layer_len()).enumerate().for_each(run);
        } else {
            out.chunks_mut(self.dims.layer_len()).enumerate().for_each(run);
        }
    }
}

/// Coefficients of the implicit update `x = (rhs + a * Σ neighbours) / c`
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Relaxation {
    pub a: f32,
    pub c: f32,
}

/// One red-black Gauss-Seidel sweep over the free interior cells of `field`
///
/// Cells with `(x + y + z)` even are updated first, then the odd ones. All six
/// neighbours of a cell have the opposite parity, so each half-sweep reads a
/// snapshot taken just before it without changing the result, and layers can
/// be relaxed concurrently. `snapshot` is scratch space of the same size.
pub(crate) fn red_black_sweep(
    sweep: Sweep,
    field: &mut ScalarField,
    rhs: &ScalarField,
    flags: &[CellFlags],
    coeffs: Relaxation,
    snapshot: &mut ScalarField,
) {
    let dims = sweep.dims;
    let (nx, ny) = (dims.nx, dims.ny);
    let layer_len = dims.layer_len();
    let inv_c = 1.0 / coeffs.c;

    for parity in [0, 1] {
        snapshot.copy_from(field);
        let snap = snapshot.as_slice();
        let rhs_data = rhs.as_slice();

        sweep.interior_layers(field.as_mut_slice(), |z, layer| {
            let base = z * layer_len;
            for y in 1..ny - 1 {
                // First x in this row with the requested parity
                let x0 = 1 + (1 + y + z + parity) % 2;
                for x in (x0..nx - 1).step_by(2) {
                    let local = y * nx + x;
                    let idx = base + local;
                    if !flags[idx].is_free() {
                        continue;
                    }
                    let neighbours = snap[idx - 1]
                        + snap[idx + 1]
                        + snap[idx - nx]
                        + snap[idx + nx]
                        + snap[idx - layer_len]
                        + snap[idx + layer_len];
                    layer[local] = (rhs_data[idx] + coeffs.a * neighbours) * inv_c;
                }
            }
        });
    }
}
