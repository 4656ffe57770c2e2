//! Velocity response at barrier cells
//!
//! Barriers are excluded from every relaxation sweep, so whatever velocity
//! they hold is what neighbouring cells see. After each velocity sub-step the
//! velocity stored in an interior barrier cell is reflected and damped by the
//! coefficient of restitution, which turns flow into the obstacle back out of it.

use crate::grid::{CellFlags, GridDims, ScalarField};

/// Reflect the velocity of every interior barrier cell
///
/// Each component is negated and scaled by `restitution` (0 absorbs, 1 is a
/// perfectly elastic reflection).
pub(crate) fn bounce_barriers(
    dims: GridDims,
    vx: &mut ScalarField,
    vy: &mut ScalarField,
    vz: &mut ScalarField,
    flags: &[CellFlags],
    restitution: f32,
) {
    let factor = -restitution;
    let (vx, vy, vz) = (vx.as_mut_slice(), vy.as_mut_slice(), vz.as_mut_slice());

    for (idx, cell) in flags.iter().enumerate() {
        if !cell.barrier {
            continue;
        }
        let (x, y, z) = dims.coords(idx);
        if !dims.is_interior(x, y, z) {
            continue;
        }
        vx[idx] *= factor;
        vy[idx] *= factor;
        vz[idx] *= factor;
    }
}
