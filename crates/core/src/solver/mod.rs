//! Stable-fluids smoke solver module
//!
//! The numerical core advancing a [`crate::grid::SmokeGrid`] by one fixed
//! timestep. Each pass is a free function over flat [`crate::grid::ScalarField`]
//! buffers; [`SmokeSolver`] owns the grid and chains them.
//!
//! # Execution
//!
//! Every sweep partitions the grid into z-layers. In
//! [`ExecutionMode::Parallel`] the layers of one sweep run concurrently on a
//! dedicated rayon pool and are joined before boundary conditions are
//! applied. Red-black ordering makes the parallel result identical to the
//! sequential one.
//!
//! # Example
//!
//! ```rust
//! use smoke_sim_core::solver::{SmokeSolver, SolverConfig};
//!
//! let config = SolverConfig::new(10, 10, 10, 0.05, 0.3, 1000.0, 0.00001, 0.02);
//! let mut solver = SmokeSolver::new(config).expect("valid configuration");
//! solver.add_source(2, 8, 0);
//! solver.advance();
//! assert_eq!(solver.grid().density(2, 8, 0), 1000.0);
//! ```

mod advection;
pub mod boundary;
mod config;
mod conservation;
mod diffusion;
mod error;
mod obstacle;
mod projection;
#[allow(clippy::module_name_repetitions)]
mod smoke_solver;
mod sweep;

// Re-exports
pub use boundary::{enforce_boundary_conditions, BoundaryKind};
pub use config::{ExecutionMode, SolverConfig};
pub use error::SolverError;
pub use smoke_solver::{SmokeSolver, SolverStats};
