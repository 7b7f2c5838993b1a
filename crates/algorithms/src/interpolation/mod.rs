//! Displacement interpolation onto a regular grid
//!
//! Each grid node is resolved from the scattered samples around it:
//! - geometry: distances, cross-product signs and the plane solve
//! - quadrant: nearest sample in each of the four quadrants around a node
//! - classify: coincident / collinear / on-edge / inside / outside decisions
//! - estimate: linear interpolation on a segment, plane intersection on a triangle
//! - resolve: per-node orchestration, mean of estimates, whole-grid runs

pub mod classify;
pub mod estimate;
pub mod geometry;
pub mod quadrant;
mod resolve;

pub use classify::{classify_pair, classify_triangle, match_point, triples};
pub use estimate::{interpolate_linear, interpolate_plane};
pub use geometry::{cross_sign, distance, plane_intersect};
pub use quadrant::{quadrant_search, Neighborhood};
pub use resolve::{
    interpolate_displacements, resolve_grid, resolve_node, DisplacementGrid,
    DisplacementGridParams, InterpolationRun, NodeOutcome, ResolveParams,
};
