//! # dispgrid Algorithms
//!
//! Interpolation of scattered displacement measurements onto a regular grid.
//!
//! ## Available Algorithms
//!
//! - **interpolation**: quadrant search, position classification, linear and
//!   plane interpolation, per-node resolution and whole-grid runs

pub mod interpolation;
pub(crate) mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::interpolation::{
        interpolate_displacements, resolve_grid, resolve_node, DisplacementGrid,
        DisplacementGridParams, InterpolationRun, ResolveParams,
    };
    pub use dispgrid_core::prelude::*;
}
