//! Semi-Lagrangian advection
//!
//! Every free interior cell traces backward along the velocity field for one
//! timestep and takes the trilinear interpolation of the previous field at
//! the departure point. Departure points are clamped to `[0.5, N + 0.5]` per
//! axis (`N` = interior extent), so fast flow can never sample outside the
//! grid; the interpolation stencil then always lands on valid cells.

use super::boundary::{enforce_boundary_conditions, BoundaryKind};
use super::sweep::Sweep;
use crate::grid::{CellFlags, ScalarField};

/// Velocity components used to trace departure points
#[derive(Clone, Copy)]
pub(crate) struct VelocityView<'a> {
    pub x: &'a ScalarField,
    pub y: &'a ScalarField,
    pub z: &'a ScalarField,
}

/// Advect `previous` through `velocity` into `current`
pub(crate) fn advect(
    kind: BoundaryKind,
    sweep: Sweep,
    current: &mut ScalarField,
    previous: &ScalarField,
    velocity: VelocityView<'_>,
    flags: &[CellFlags],
    time_step: f32,
) {
    let dims = sweep.dims;
    let (nx, ny, nz) = (dims.nx, dims.ny, dims.nz);
    let layer_len = dims.layer_len();

    let extent_x = (nx - 2) as f32;
    let extent_y = (ny - 2) as f32;
    let extent_z = (nz - 2) as f32;
    let dt_x = time_step * extent_x;
    let dt_y = time_step * extent_y;
    let dt_z = time_step * extent_z;

    let prev = previous.as_slice();
    let (vx, vy, vz) = (
        velocity.x.as_slice(),
        velocity.y.as_slice(),
        velocity.z.as_slice(),
    );

    sweep.interior_layers(current.as_mut_slice(), |z, layer| {
        for y in 1..ny - 1 {
            for x in 1..nx - 1 {
                let local = y * nx + x;
                let idx = z * layer_len + local;
                if !flags[idx].is_free() {
                    continue;
                }

                let px = (x as f32 - dt_x * vx[idx]).clamp(0.5, extent_x + 0.5);
                let py = (y as f32 - dt_y * vy[idx]).clamp(0.5, extent_y + 0.5);
                let pz = (z as f32 - dt_z * vz[idx]).clamp(0.5, extent_z + 0.5);

                let i0 = px.floor() as usize;
                let j0 = py.floor() as usize;
                let k0 = pz.floor() as usize;

                let s1 = px - i0 as f32;
                let t1 = py - j0 as f32;
                let u1 = pz - k0 as f32;
                let (s0, t0, u0) = (1.0 - s1, 1.0 - t1, 1.0 - u1);

                let c000 = dims.index(i0, j0, k0);
                let c100 = c000 + 1;
                let c010 = c000 + nx;
                let c110 = c010 + 1;
                let c001 = c000 + layer_len;
                let c101 = c001 + 1;
                let c011 = c001 + nx;
                let c111 = c011 + 1;

                layer[local] = s0 * (t0 * (u0 * prev[c000] + u1 * prev[c001])
                    + t1 * (u0 * prev[c010] + u1 * prev[c011]))
                    + s1 * (t0 * (u0 * prev[c100] + u1 * prev[c101])
                        + t1 * (u0 * prev[c110] + u1 * prev[c111]));
            }
        }
    });

    enforce_boundary_conditions(kind, current, flags);
}
