//! Smoke Simulation Core Library
//!
//! Grid-based smoke and gas transport in a closed 3D room, following Stam's
//! stable fluids: implicit diffusion, semi-Lagrangian advection and pressure
//! projection on a uniform grid with a one-cell boundary shell.
//!
//! ## Layout
//!
//! - [`grid`]: field storage, defaults and cell classification
//! - [`solver`]: the per-tick numerical passes and scene authoring
//!
//! A driver constructs a [`SmokeSolver`] once, authors barriers, sources and
//! wind, then calls [`SmokeSolver::advance`] once per frame and reads the
//! grid afterwards.

// Core types and utilities
pub mod core_types;

pub mod grid;
pub mod solver;

// Re-export core types
pub use core_types::Vec3;

// Re-export grid and solver types
pub use grid::{CellFlags, GridDims, ScalarField, SmokeGrid};
pub use solver::{ExecutionMode, SmokeSolver, SolverConfig, SolverError, SolverStats};
