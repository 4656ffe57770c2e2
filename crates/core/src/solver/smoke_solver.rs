//! Stable-fluids smoke solver
//!
//! Owns a [`SmokeGrid`] and advances it one fixed timestep at a time:
//!
//! 1. Diffuse each velocity component, bounce barriers
//! 2. Project, bounce barriers
//! 3. Advect velocity along itself, bounce barriers
//! 4. Project again, bounce barriers, publish the pressure offset
//! 5. Diffuse density, then advect it along the new velocity without
//!    letting the non-source total grow
//! 6. Decay density outside sources
//! 7. Copy every current buffer into its previous generation

use super::advection::{advect, VelocityView};
use super::boundary::BoundaryKind;
use super::config::{ExecutionMode, SolverConfig};
use super::conservation::{isolate_sources, limit_growth, non_source_total};
use super::diffusion::diffuse;
use super::error::SolverError;
use super::obstacle::bounce_barriers;
use super::projection::{project, ProjectionScratch};
use super::sweep::Sweep;
use crate::core_types::Vec3;
use crate::grid::{constants, CellFlags, ScalarField, SmokeGrid};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Snapshot of solver state for drivers and logging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverStats {
    /// Completed `advance()` calls
    pub tick: u64,
    /// `tick * time_step` (s)
    pub simulated_time: f32,
    /// Density summed over the whole grid
    pub total_density: f32,
    /// Largest density of any cell
    pub peak_density: f32,
    /// Largest velocity magnitude of any cell
    pub max_speed: f32,
    /// Cells marked as obstacles
    pub barrier_cells: usize,
    /// Cells emitting smoke
    pub source_cells: usize,
    /// Cells with pinned wind velocity
    pub wind_cells: usize,
}

/// Smoke simulation over a closed room
pub struct SmokeSolver {
    grid: SmokeGrid,
    config: SolverConfig,
    scratch: ProjectionScratch,
    /// Dedicated workers for `ExecutionMode::Parallel`
    pool: Option<Arc<ThreadPool>>,
    tick: u64,
}

impl SmokeSolver {
    /// Create a solver with an empty room
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the worker pool
    /// cannot be started.
    pub fn new(config: SolverConfig) -> Result<Self, SolverError> {
        config.validate()?;

        let pool = match config.execution {
            ExecutionMode::Sequential => None,
            ExecutionMode::Parallel { threads } => Some(Arc::new(build_pool(threads)?)),
        };

        let grid = SmokeGrid::new(config.nx, config.ny, config.nz);
        let dims = grid.dims();
        let scratch = ProjectionScratch {
            divergence: ScalarField::new(dims),
            pressure: ScalarField::new(dims),
            snapshot: ScalarField::new(dims),
        };

        info!(
            "Smoke solver initialized: {}x{}x{} cells, dt={}s, {} relaxation sweeps, workers={}",
            dims.nx,
            dims.ny,
            dims.nz,
            config.time_step,
            config.relaxation_iterations,
            pool.as_ref().map_or(1, |p| p.current_num_threads())
        );

        Ok(Self {
            grid,
            config,
            scratch,
            pool,
            tick: 0,
        })
    }

    /// Read access to every field
    #[must_use]
    pub fn grid(&self) -> &SmokeGrid {
        &self.grid
    }

    /// Write access for initial conditions
    ///
    /// Cell classification can only be changed through the authoring
    /// methods on the solver. The setters skip source and wind cells, whose
    /// pinned values only the authoring methods may change.
    pub fn grid_mut(&mut self) -> &mut SmokeGrid {
        &mut self.grid
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Number of completed ticks
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Mark a cell as a smoke source
    ///
    /// Density is pinned to `source_density` and vertical velocity to
    /// `-source_velocity` in both buffers.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the room
    pub fn add_source(&mut self, x: usize, y: usize, z: usize) {
        self.grid.flags_mut(x, y, z).source = true;
        self.grid.pin_density(x, y, z, self.config.source_density);
        self.pin_vertical_velocity(x, y, z, -self.config.source_velocity);
        debug!("Added smoke source at ({}, {}, {})", x, y, z);
    }

    /// Stop emitting from a cell and zero its density and vertical velocity
    ///
    /// Barrier and wind flags on the cell are left as they are.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the room
    pub fn remove_source(&mut self, x: usize, y: usize, z: usize) {
        self.grid.flags_mut(x, y, z).source = false;
        self.grid.pin_density(x, y, z, 0.0);
        self.pin_vertical_velocity(x, y, z, 0.0);
        debug!("Removed smoke source at ({}, {}, {})", x, y, z);
    }

    /// Mark a cell as a wind injector blowing with `velocity`
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the room
    pub fn add_wind(&mut self, x: usize, y: usize, z: usize, velocity: Vec3) {
        self.grid.flags_mut(x, y, z).wind_source = true;
        self.grid.pin_velocity(x, y, z, velocity);
        self.grid.pin_density(x, y, z, 0.0);
        debug!(
            "Added wind source at ({}, {}, {}) blowing ({:.2}, {:.2}, {:.2})",
            x, y, z, velocity.x, velocity.y, velocity.z
        );
    }

    /// Mark a single cell as an obstacle
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the room
    pub fn add_barrier(&mut self, x: usize, y: usize, z: usize) {
        self.grid.flags_mut(x, y, z).barrier = true;
    }

    /// Mark every cell of an inclusive box as an obstacle
    ///
    /// Empty ranges mark nothing.
    ///
    /// # Panics
    ///
    /// Panics if any cell of the box is outside the room
    pub fn add_barrier_range(
        &mut self,
        xs: RangeInclusive<usize>,
        ys: RangeInclusive<usize>,
        zs: RangeInclusive<usize>,
    ) {
        let (x0, x1) = xs.into_inner();
        let (y0, y1) = ys.into_inner();
        let (z0, z1) = zs.into_inner();

        let mut marked = 0usize;
        for x in x0..=x1 {
            for y in y0..=y1 {
                for z in z0..=z1 {
                    self.add_barrier(x, y, z);
                    marked += 1;
                }
            }
        }
        debug!(
            "Added barrier box x={}..={} y={}..={} z={}..={} ({} cells)",
            x0, x1, y0, y1, z0, z1, marked
        );
    }

    /// Advance the simulation by one `time_step`
    ///
    /// In parallel mode the tick runs inside the solver's pool; a panic in
    /// any worker propagates out of this call.
    pub fn advance(&mut self) {
        match self.pool.clone() {
            Some(pool) => pool.install(|| self.step(true)),
            None => self.step(false),
        }
        self.tick += 1;

        trace!(
            "Tick {}: total density {:.3}",
            self.tick,
            self.grid.total_density()
        );
    }

    /// Aggregate figures over the current state
    #[must_use]
    pub fn stats(&self) -> SolverStats {
        let grid = &self.grid;
        let density = grid.density.as_slice();
        let (vx, vy, vz) = (
            grid.velocity_x.as_slice(),
            grid.velocity_y.as_slice(),
            grid.velocity_z.as_slice(),
        );

        let peak_density = density.iter().copied().fold(0.0_f32, f32::max);
        let max_speed = vx
            .iter()
            .zip(vy)
            .zip(vz)
            .map(|((x, y), z)| Vec3::new(*x, *y, *z).norm())
            .fold(0.0_f32, f32::max);

        let count = |pick: fn(&CellFlags) -> bool| {
            grid.flags.iter().filter(|cell| pick(cell)).count()
        };

        let simulated_time = self.tick as f32 * self.config.time_step;

        SolverStats {
            tick: self.tick,
            simulated_time,
            total_density: grid.total_density(),
            peak_density,
            max_speed,
            barrier_cells: count(|cell| cell.barrier),
            source_cells: count(|cell| cell.source),
            wind_cells: count(|cell| cell.wind_source),
        }
    }

    fn pin_vertical_velocity(&mut self, x: usize, y: usize, z: usize, value: f32) {
        self.grid.velocity_y.set(x, y, z, value);
        self.grid.prev_velocity_y.set(x, y, z, value);
    }

    fn step(&mut self, parallel: bool) {
        let SmokeGrid {
            dims,
            velocity_x: vx,
            velocity_y: vy,
            velocity_z: vz,
            prev_velocity_x: vx0,
            prev_velocity_y: vy0,
            prev_velocity_z: vz0,
            pressure,
            prev_pressure,
            temperature,
            prev_temperature,
            density,
            prev_density,
            flags,
        } = &mut self.grid;
        let dims = *dims;
        let flags: &[CellFlags] = flags;
        let config = &self.config;
        let scratch = &mut self.scratch;

        let sweep = Sweep { dims, parallel };
        let dt = config.time_step;
        let iterations = config.relaxation_iterations;
        let restitution = config.restitution;

        // 1. Velocity diffusion
        for (kind, current, previous) in [
            (BoundaryKind::VelocityX, &mut *vx, &*vx0),
            (BoundaryKind::VelocityY, &mut *vy, &*vy0),
            (BoundaryKind::VelocityZ, &mut *vz, &*vz0),
        ] {
            diffuse(
                kind,
                sweep,
                current,
                previous,
                flags,
                config.diffusion_rate,
                dt,
                iterations,
                &mut scratch.snapshot,
            );
        }
        bounce_barriers(dims, vx, vy, vz, flags, restitution);

        // 2. Projection
        project(sweep, vx, vy, vz, flags, iterations, scratch);
        bounce_barriers(dims, vx, vy, vz, flags, restitution);

        // 3. Self-advection along the diffused, projected field
        vx0.copy_from(vx);
        vy0.copy_from(vy);
        vz0.copy_from(vz);
        let basis = VelocityView {
            x: &*vx0,
            y: &*vy0,
            z: &*vz0,
        };
        advect(BoundaryKind::VelocityX, sweep, vx, vx0, basis, flags, dt);
        advect(BoundaryKind::VelocityY, sweep, vy, vy0, basis, flags, dt);
        advect(BoundaryKind::VelocityZ, sweep, vz, vz0, basis, flags, dt);
        bounce_barriers(dims, vx, vy, vz, flags, restitution);

        // 4. Second projection
        project(sweep, vx, vy, vz, flags, iterations, scratch);
        bounce_barriers(dims, vx, vy, vz, flags, restitution);

        for (p, offset) in pressure
            .as_mut_slice()
            .iter_mut()
            .zip(scratch.pressure.as_slice())
        {
            *p = constants::ATMOSPHERIC_PRESSURE + offset;
        }

        // 5. Density diffusion and advection
        diffuse(
            BoundaryKind::Scalar,
            sweep,
            density,
            prev_density,
            flags,
            config.diffusion_rate,
            dt,
            iterations,
            &mut scratch.snapshot,
        );
        prev_density.copy_from(density);
        let budget = non_source_total(prev_density, flags);
        let carrier = VelocityView {
            x: &*vx,
            y: &*vy,
            z: &*vz,
        };
        // Projection scratch is free here; it carries the source-only field
        isolate_sources(&mut scratch.divergence, prev_density, flags);
        scratch.snapshot.copy_from(&scratch.divergence);
        advect(
            BoundaryKind::Scalar,
            sweep,
            &mut scratch.snapshot,
            &scratch.divergence,
            carrier,
            flags,
            dt,
        );
        advect(
            BoundaryKind::Scalar,
            sweep,
            density,
            prev_density,
            carrier,
            flags,
            dt,
        );
        limit_growth(density, &scratch.snapshot, flags, budget);

        // 6. Decay
        decay_density(density, flags, config.decay_rate);

        // 7. Rotate generations
        vx0.copy_from(vx);
        vy0.copy_from(vy);
        vz0.copy_from(vz);
        prev_density.copy_from(density);
        prev_pressure.copy_from(pressure);
        prev_temperature.copy_from(temperature);
    }
}

/// Subtract `rate` from every non-source cell, clamping at zero
fn decay_density(density: &mut ScalarField, flags: &[CellFlags], rate: f32) {
    for (value, cell) in density.as_mut_slice().iter_mut().zip(flags) {
        if !cell.source {
            *value = (*value - rate).max(0.0);
        }
    }
}

fn build_pool(threads: usize) -> Result<ThreadPool, SolverError> {
    let threads = if threads == 0 {
        std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
    } else {
        threads
    };

    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("smoke-sweep-{i}"))
        .build()
        .map_err(|e| SolverError::ThreadPool(e.to_string()))?;

    info!("Started smoke solver pool with {} workers", threads);
    Ok(pool)
}
