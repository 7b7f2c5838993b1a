//! Error types for dispgrid

use thiserror::Error;

/// Main error type for dispgrid operations
///
/// Node-local kinds (`DegenerateGeometry`, `EmptyNeighborhood`, `NoEstimate`) are
/// caught by the node resolver and stored on the node; the remaining kinds are
/// fatal to the run that raised them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Degenerate geometry: {reason}")]
    DegenerateGeometry { reason: String },

    #[error("Depth {depth} is not a key of the vertical step table")]
    LookupFailure { depth: f64 },

    #[error("No sample points in the search box of node ({x}, {z})")]
    EmptyNeighborhood { x: f64, z: f64 },

    #[error("No estimate could be derived for node ({x}, {z})")]
    NoEstimate { x: f64, z: f64 },

    #[error("Index out of bounds: ({row}, {col}) in grid of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Error::DegenerateGeometry {
            reason: reason.into(),
        }
    }

    /// Whether the error only concerns a single node and must not abort a run
    pub fn is_node_local(&self) -> bool {
        matches!(
            self,
            Error::DegenerateGeometry { .. }
                | Error::EmptyNeighborhood { .. }
                | Error::NoEstimate { .. }
        )
    }
}

/// Result type alias for dispgrid operations
pub type Result<T> = std::result::Result<T, Error>;
