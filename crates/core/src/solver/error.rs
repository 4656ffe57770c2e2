//! Errors surfaced while building a solver
//!
//! Only construction can fail. Once a solver exists, `advance()` and the
//! scene mutators have no recoverable error paths: out-of-range coordinates
//! are a caller bug and panic on the index.

use std::fmt;

/// Reasons a [`super::SmokeSolver`] could not be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// A grid dimension is below the minimum the kernels support
    InvalidDimension {
        /// Axis name (`"nx"`, `"ny"` or `"nz"`)
        axis: &'static str,
        /// Rejected value
        value: usize,
    },

    /// A scalar parameter is out of range or not finite
    InvalidParameter {
        /// Parameter name as it appears in `SolverConfig`
        name: &'static str,
        /// Description of the violated constraint
        message: String,
    },

    /// The worker pool for parallel execution could not be started
    ThreadPool(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { axis, value } => write!(
                f,
                "Grid dimension {axis} must be at least {}, got {value}",
                crate::grid::constants::MIN_DIMENSION
            ),
            Self::InvalidParameter { name, message } => {
                write!(f, "Solver parameter {name}: {message}")
            }
            Self::ThreadPool(reason) => write!(f, "Failed to start solver thread pool: {reason}"),
        }
    }
}

impl std::error::Error for SolverError {}
