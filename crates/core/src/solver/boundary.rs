//! Domain boundary conditions for the one-cell shell around the interior
//!
//! After every sweep the shell is rebuilt from the interior:
//!
//! ```text
//! face   : shell = ±interior neighbour   (− for the velocity component normal to the face)
//! edge   : mean of the two adjacent face cells
//! corner : mean of the three adjacent edge cells
//! ```
//!
//! Negating the normal component gives a no-penetration wall; scalar fields
//! (density, pressure, divergence) are copied unchanged. Authored cells
//! (barrier, source, wind) that sit in the shell keep their values.

use crate::grid::{CellFlags, ScalarField};

/// Which quantity a field holds, selecting the face where the sign flips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// Density, pressure, divergence: never negated
    Scalar,
    /// x velocity: negated on the x = 0 and x = nx-1 faces
    VelocityX,
    /// y velocity: negated on the y faces
    VelocityY,
    /// z velocity: negated on the z faces
    VelocityZ,
}

impl BoundaryKind {
    #[inline]
    fn sign(self, normal: Self) -> f32 {
        if self == normal {
            -1.0
        } else {
            1.0
        }
    }
}

#[inline]
fn inward(coord: usize, n: usize) -> usize {
    if coord == 0 {
        1
    } else {
        n - 2
    }
}

#[inline]
fn assign(data: &mut [f32], flags: &[CellFlags], idx: usize, value: f32) {
    if flags[idx].is_free() {
        data[idx] = value;
    }
}

/// Rebuild the boundary shell of `field` from its interior
///
/// `flags` must be the classification of the same grid, in field order.
pub fn enforce_boundary_conditions(
    kind: BoundaryKind,
    field: &mut ScalarField,
    flags: &[CellFlags],
) {
    let dims = field.dims();
    let (nx, ny, nz) = (dims.nx, dims.ny, dims.nz);
    debug_assert_eq!(flags.len(), dims.len());
    let data = field.as_mut_slice();

    let sign_x = kind.sign(BoundaryKind::VelocityX);
    let sign_y = kind.sign(BoundaryKind::VelocityY);
    let sign_z = kind.sign(BoundaryKind::VelocityZ);

    // Faces
    for y in 1..ny - 1 {
        for x in 1..nx - 1 {
            for z in [0, nz - 1] {
                let value = sign_z * data[dims.index(x, y, inward(z, nz))];
                assign(data, flags, dims.index(x, y, z), value);
            }
        }
    }
    for z in 1..nz - 1 {
        for x in 1..nx - 1 {
            for y in [0, ny - 1] {
                let value = sign_y * data[dims.index(x, inward(y, ny), z)];
                assign(data, flags, dims.index(x, y, z), value);
            }
        }
    }
    for z in 1..nz - 1 {
        for y in 1..ny - 1 {
            for x in [0, nx - 1] {
                let value = sign_x * data[dims.index(inward(x, nx), y, z)];
                assign(data, flags, dims.index(x, y, z), value);
            }
        }
    }

    // Edges
    for y in [0, ny - 1] {
        for z in [0, nz - 1] {
            for x in 1..nx - 1 {
                let value = 0.5
                    * (data[dims.index(x, inward(y, ny), z)]
                        + data[dims.index(x, y, inward(z, nz))]);
                assign(data, flags, dims.index(x, y, z), value);
            }
        }
    }
    for x in [0, nx - 1] {
        for z in [0, nz - 1] {
            for y in 1..ny - 1 {
                let value = 0.5
                    * (data[dims.index(inward(x, nx), y, z)]
                        + data[dims.index(x, y, inward(z, nz))]);
                assign(data, flags, dims.index(x, y, z), value);
            }
        }
    }
    for x in [0, nx - 1] {
        for y in [0, ny - 1] {
            for z in 1..nz - 1 {
                let value = 0.5
                    * (data[dims.index(inward(x, nx), y, z)]
                        + data[dims.index(x, inward(y, ny), z)]);
                assign(data, flags, dims.index(x, y, z), value);
            }
        }
    }

    // Corners
    for x in [0, nx - 1] {
        for y in [0, ny - 1] {
            for z in [0, nz - 1] {
                let value = (data[dims.index(inward(x, nx), y, z)]
                    + data[dims.index(x, inward(y, ny), z)]
                    + data[dims.index(x, y, inward(z, nz))])
                    / 3.0;
                assign(data, flags, dims.index(x, y, z), value);
            }
        }
    }
}
