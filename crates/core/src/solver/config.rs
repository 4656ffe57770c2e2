//! Solver configuration and validation

use super::error::SolverError;
use crate::grid::constants::MIN_DIMENSION;
use serde::{Deserialize, Serialize};

/// How the relaxation and advection sweeps are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Every sweep runs on the calling thread
    #[default]
    Sequential,
    /// Sweeps fork one task per z-layer onto a dedicated rayon pool and join
    /// before boundary conditions are applied. Results are identical to
    /// `Sequential`.
    Parallel {
        /// Worker count; 0 uses the available hardware parallelism
        threads: usize,
    },
}

/// Configuration for the smoke solver
///
/// Defaults describe a 50³ room stepped at 0.1 s with a gentle source and
/// slow decay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Room width in cells (x)
    pub nx: usize,
    /// Room height in cells (y)
    pub ny: usize,
    /// Room depth in cells (z)
    pub nz: usize,

    /// Fixed timestep per `advance()` call (s)
    pub time_step: f32,

    /// Speed of smoke leaving a source. Applied along -y, which points up in
    /// the room's screen-space convention.
    pub source_velocity: f32,

    /// Density pinned at every source cell
    pub source_density: f32,

    /// Diffusion coefficient shared by velocity and density; 0 disables it
    pub diffusion_rate: f32,

    /// Density removed from every non-source cell per tick; 0 disables it
    pub decay_rate: f32,

    /// Gauss-Seidel sweeps per diffusion and pressure solve
    pub relaxation_iterations: usize,

    /// Velocity retained when flow bounces off a barrier (0..=1)
    pub restitution: f32,

    /// Sweep scheduling
    pub execution: ExecutionMode,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            nx: 50,
            ny: 50,
            nz: 50,
            time_step: 0.1,
            source_velocity: 3.0,
            source_density: 100.0,
            diffusion_rate: 0.00001,
            decay_rate: 0.02,
            relaxation_iterations: 4, // Enough for a visually stable room at interactive rates
            restitution: 0.9,
            execution: ExecutionMode::Sequential,
        }
    }
}

impl SolverConfig {
    /// Positional constructor matching the driver-facing parameter list
    ///
    /// Remaining fields take their defaults.
    #[must_use]
    pub fn new(
        width: usize,
        height: usize,
        depth: usize,
        time_step: f32,
        source_velocity: f32,
        source_density: f32,
        diffusion_rate: f32,
        decay_rate: f32,
    ) -> Self {
        Self {
            nx: width,
            ny: height,
            nz: depth,
            time_step,
            source_velocity,
            source_density,
            diffusion_rate,
            decay_rate,
            ..Default::default()
        }
    }

    /// Check every parameter the numerical kernels rely on
    ///
    /// # Errors
    ///
    /// Returns the first offending parameter as a [`SolverError`].
    pub fn validate(&self) -> Result<(), SolverError> {
        for (axis, value) in [("nx", self.nx), ("ny", self.ny), ("nz", self.nz)] {
            if value < MIN_DIMENSION {
                return Err(SolverError::InvalidDimension { axis, value });
            }
        }

        check_positive("time_step", self.time_step)?;
        check_positive("source_velocity", self.source_velocity)?;
        check_positive("source_density", self.source_density)?;
        check_non_negative("diffusion_rate", self.diffusion_rate)?;
        check_non_negative("decay_rate", self.decay_rate)?;

        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(SolverError::InvalidParameter {
                name: "restitution",
                message: format!("must be within [0, 1], got {}", self.restitution),
            });
        }

        if self.relaxation_iterations == 0 {
            return Err(SolverError::InvalidParameter {
                name: "relaxation_iterations",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), SolverError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SolverError::InvalidParameter {
            name,
            message: format!("must be finite and positive, got {value}"),
        })
    }
}

fn check_non_negative(name: &'static str, value: f32) -> Result<(), SolverError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SolverError::InvalidParameter {
            name,
            message: format!("must be finite and non-negative, got {value}"),
        })
    }
}
