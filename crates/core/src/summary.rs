//! Per-run counters

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counters for one run.
///
/// `resolved + unresolved == total` once every node has been recorded.
/// `empty_neighborhood` and `degenerate` break the unresolved count down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub empty_neighborhood: usize,
    pub degenerate: usize,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Count one node outcome
    pub fn record(&mut self, outcome: &Result<f64>) {
        match outcome {
            Ok(_) => self.resolved += 1,
            Err(e) => {
                self.unresolved += 1;
                match e {
                    Error::EmptyNeighborhood { .. } => self.empty_neighborhood += 1,
                    Error::DegenerateGeometry { .. } => self.degenerate += 1,
                    _ => {}
                }
            }
        }
    }

    /// Fold counters accumulated elsewhere into this one
    pub fn merge(&mut self, other: &RunSummary) {
        self.resolved += other.resolved;
        self.unresolved += other.unresolved;
        self.empty_neighborhood += other.empty_neighborhood;
        self.degenerate += other.degenerate;
    }

    /// Whether every node has been counted
    pub fn is_complete(&self) -> bool {
        self.resolved + self.unresolved == self.total
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Points: {}\tSuccess: {}\tErrors: {}",
            self.total, self.resolved, self.unresolved
        )
    }
}
