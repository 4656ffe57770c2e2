//! Room grid holding every smoke field and the cell classification
//!
//! The grid is pure storage: allocation, physically sensible defaults and
//! flag bookkeeping. All numerical behaviour lives in [`crate::solver`].

use super::field::{GridDims, ScalarField};
use crate::core_types::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Baseline values the grid is initialized to
pub mod constants {
    /// Standard atmospheric pressure (Pa)
    pub const ATMOSPHERIC_PRESSURE: f32 = 101_325.0;

    /// Room ambient temperature (K), 20°C
    pub const AMBIENT_TEMPERATURE: f32 = 293.15;

    /// Smallest dimension the relaxation kernels accept: one interior ring
    /// plus the boundary shell on each face
    pub const MIN_DIMENSION: usize = 3;
}

/// Classification of a single cell
///
/// The flags are independent; when a cell carries more than one the solver
/// gives the barrier precedence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellFlags {
    /// Impassable obstacle
    pub barrier: bool,
    /// Smoke emitter with pinned density and vertical velocity
    pub source: bool,
    /// Directional flow injector with pinned velocity and zero density
    pub wind_source: bool,
}

impl CellFlags {
    /// True when the cell takes part in diffusion, advection and projection
    #[inline]
    #[must_use]
    pub const fn is_free(&self) -> bool {
        !(self.barrier || self.source || self.wind_source)
    }

    /// True when the cell's values are owned by scene authoring
    #[inline]
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.source || self.wind_source
    }
}

/// Fixed-size 3D room with struct-of-arrays field storage
///
/// Every quantity has a current and a previous buffer. The solver reads one
/// generation and writes the other, then copies current into previous at the
/// end of each tick.
#[derive(Debug, Clone)]
pub struct SmokeGrid {
    pub(crate) dims: GridDims,

    pub(crate) velocity_x: ScalarField,
    pub(crate) velocity_y: ScalarField,
    pub(crate) velocity_z: ScalarField,
    pub(crate) prev_velocity_x: ScalarField,
    pub(crate) prev_velocity_y: ScalarField,
    pub(crate) prev_velocity_z: ScalarField,

    pub(crate) pressure: ScalarField,
    pub(crate) prev_pressure: ScalarField,

    pub(crate) temperature: ScalarField,
    pub(crate) prev_temperature: ScalarField,

    pub(crate) density: ScalarField,
    pub(crate) prev_density: ScalarField,

    pub(crate) flags: Vec<CellFlags>,
}

impl SmokeGrid {
    /// Allocate a room of `nx * ny * nz` cells
    ///
    /// Pressure starts at [`constants::ATMOSPHERIC_PRESSURE`], temperature at
    /// [`constants::AMBIENT_TEMPERATURE`], everything else at zero and every
    /// cell is free.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is smaller than [`constants::MIN_DIMENSION`].
    #[must_use]
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        assert!(
            nx >= constants::MIN_DIMENSION
                && ny >= constants::MIN_DIMENSION
                && nz >= constants::MIN_DIMENSION,
            "Grid dimensions must be at least {} on every axis, got {}x{}x{}",
            constants::MIN_DIMENSION,
            nx,
            ny,
            nz
        );

        let dims = GridDims::new(nx, ny, nz);
        let zeros = ScalarField::new(dims);
        let pressure = ScalarField::with_value(dims, constants::ATMOSPHERIC_PRESSURE);
        let temperature = ScalarField::with_value(dims, constants::AMBIENT_TEMPERATURE);

        Self {
            dims,
            velocity_x: zeros.clone(),
            velocity_y: zeros.clone(),
            velocity_z: zeros.clone(),
            prev_velocity_x: zeros.clone(),
            prev_velocity_y: zeros.clone(),
            prev_velocity_z: zeros.clone(),
            prev_pressure: pressure.clone(),
            pressure,
            prev_temperature: temperature.clone(),
            temperature,
            prev_density: zeros.clone(),
            density: zeros,
            flags: vec![CellFlags::default(); dims.len()],
        }
    }

    /// Grid dimensions
    #[inline]
    #[must_use]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Flat index of `(x, y, z)`
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the room
    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        assert!(
            x < self.dims.nx && y < self.dims.ny && z < self.dims.nz,
            "Coordinates out of bounds"
        );
        self.dims.index(x, y, z)
    }

    /// Smoke density at a cell
    #[must_use]
    pub fn density(&self, x: usize, y: usize, z: usize) -> f32 {
        self.density.get(x, y, z)
    }

    /// Whole density field, for renderers that shade every cell
    #[must_use]
    pub fn density_field(&self) -> &ScalarField {
        &self.density
    }

    /// Velocity vector at a cell
    #[must_use]
    pub fn velocity(&self, x: usize, y: usize, z: usize) -> Vec3 {
        Vec3::new(
            self.velocity_x.get(x, y, z),
            self.velocity_y.get(x, y, z),
            self.velocity_z.get(x, y, z),
        )
    }

    /// Pressure at a cell (atmospheric baseline plus the last projection offset)
    #[must_use]
    pub fn pressure(&self, x: usize, y: usize, z: usize) -> f32 {
        self.pressure.get(x, y, z)
    }

    /// Temperature at a cell (K)
    #[must_use]
    pub fn temperature(&self, x: usize, y: usize, z: usize) -> f32 {
        self.temperature.get(x, y, z)
    }

    /// Classification flags of a cell
    #[must_use]
    pub fn flags(&self, x: usize, y: usize, z: usize) -> CellFlags {
        self.flags[self.index(x, y, z)]
    }

    /// Classification flags of every cell, in field order
    #[must_use]
    pub fn flags_slice(&self) -> &[CellFlags] {
        &self.flags
    }

    /// Whether the cell is an obstacle
    #[must_use]
    pub fn is_barrier(&self, x: usize, y: usize, z: usize) -> bool {
        self.flags(x, y, z).barrier
    }

    /// Whether the cell is a smoke emitter
    #[must_use]
    pub fn is_source(&self, x: usize, y: usize, z: usize) -> bool {
        self.flags(x, y, z).source
    }

    /// Whether the cell is a wind injector
    #[must_use]
    pub fn is_wind_source(&self, x: usize, y: usize, z: usize) -> bool {
        self.flags(x, y, z).wind_source
    }

    /// Set density in both buffers, for initial conditions
    ///
    /// Source and wind cells keep their pinned values; writes to them are
    /// ignored.
    pub fn set_density(&mut self, x: usize, y: usize, z: usize, value: f32) {
        if !self.flags(x, y, z).is_pinned() {
            self.pin_density(x, y, z, value);
        }
    }

    /// Set velocity in both buffers, for initial conditions
    ///
    /// Source and wind cells keep their pinned values; writes to them are
    /// ignored.
    pub fn set_velocity(&mut self, x: usize, y: usize, z: usize, velocity: Vec3) {
        if !self.flags(x, y, z).is_pinned() {
            self.pin_velocity(x, y, z, velocity);
        }
    }

    pub(crate) fn pin_density(&mut self, x: usize, y: usize, z: usize, value: f32) {
        self.density.set(x, y, z, value);
        self.prev_density.set(x, y, z, value);
    }

    pub(crate) fn pin_velocity(&mut self, x: usize, y: usize, z: usize, velocity: Vec3) {
        self.velocity_x.set(x, y, z, velocity.x);
        self.velocity_y.set(x, y, z, velocity.y);
        self.velocity_z.set(x, y, z, velocity.z);
        self.prev_velocity_x.set(x, y, z, velocity.x);
        self.prev_velocity_y.set(x, y, z, velocity.y);
        self.prev_velocity_z.set(x, y, z, velocity.z);
    }

    pub(crate) fn flags_mut(&mut self, x: usize, y: usize, z: usize) -> &mut CellFlags {
        let idx = self.index(x, y, z);
        &mut self.flags[idx]
    }

    /// Total smoke density over every cell
    #[must_use]
    pub fn total_density(&self) -> f32 {
        self.density.sum()
    }

    /// Text cross-section of the classification at depth `z`
    ///
    /// One row per x, one column per y: `X` barrier, `S` source, `W` wind
    /// source, `O` anything else.
    #[must_use]
    pub fn render_slice(&self, z: usize) -> String {
        let mut out = String::with_capacity(self.dims.nx * (self.dims.ny * 2 + 1));
        for x in 0..self.dims.nx {
            for y in 0..self.dims.ny {
                let flags = self.flags(x, y, z);
                let symbol = if flags.barrier {
                    'X'
                } else if flags.source {
                    'S'
                } else if flags.wind_source {
                    'W'
                } else {
                    'O'
                };
                let _ = write!(out, "{symbol} ");
            }
            out.push('\n');
        }
        out
    }
}
