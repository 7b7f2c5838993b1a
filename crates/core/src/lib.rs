//! # dispgrid Core
//!
//! Core types for interpolating measured displacements onto a regular grid.
//!
//! This crate provides:
//! - `SamplePoint`: a measured (x, z, displacement) triple
//! - `Grid`: the regular output grid with its nodes and operation logs
//! - `RunSummary`: per-run resolved/unresolved counters
//! - `InterpolationConfig`: step tables, search radii and tolerances
//! - The `Algorithm` trait for a consistent API

pub mod config;
pub mod error;
pub mod grid;
pub mod point;
pub mod summary;

pub use config::{DepthStep, HorizontalStepRule, InterpolationConfig, StepTable};
pub use error::{Error, Result};
pub use grid::{Case, Grid, GridExtent, GridNode, GridStatistics, LogEntry, OperationLog};
pub use point::{prepare_samples, SamplePoint};
pub use summary::RunSummary;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::InterpolationConfig;
    pub use crate::error::{Error, Result};
    pub use crate::grid::{Case, Grid, GridExtent, GridNode, LogEntry};
    pub use crate::point::SamplePoint;
    pub use crate::summary::RunSummary;
    pub use crate::Algorithm;
}

/// A grid-producing computation: consumes an input (typically the sample
/// set) under a parameter set and returns a finished run.
///
/// `execute_default` runs with `Params::default()`, which for the
/// displacement grid means the built-in step tables and an extent derived
/// from the samples.
pub trait Algorithm {
    type Input;
    type Output;
    type Params: Default;
    type Error: std::error::Error;

    /// Short identifier, used in logs
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
