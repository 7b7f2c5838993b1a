//! Grid nodes and their operation logs

use crate::error::Error;
use crate::point::SamplePoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of the output grid.
///
/// `displacement` is `None` until the node is resolved, and stays `None`
/// when no estimate could be derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridNode {
    pub x: f64,
    pub z: f64,
    pub displacement: Option<f64>,
}

impl GridNode {
    pub fn new(x: f64, z: f64) -> Self {
        Self {
            x,
            z,
            displacement: None,
        }
    }

    #[inline]
    pub fn xz(&self) -> (f64, f64) {
        (self.x, self.z)
    }
}

/// Geometric case decided by the position classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Case {
    /// Nearest candidate lies within the match tolerance
    Coincident,
    /// Nearest candidate is farther than the match tolerance
    NotCoincident,
    /// Node lies on the line through two candidates
    Collinear,
    /// Node lies on an edge of a candidate triangle
    OnEdge,
    /// Node lies strictly inside a candidate triangle
    Inside,
    /// No estimate derivable from the pair or triangle
    Outside,
}

impl Case {
    pub fn as_str(&self) -> &'static str {
        match self {
            Case::Coincident => "coincident",
            Case::NotCoincident => "not_coincident",
            Case::Collinear => "collinear",
            Case::OnEdge => "on_edge",
            Case::Inside => "inside",
            Case::Outside => "outside",
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classifier decision: the case and the points it was decided on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub case: Case,
    pub points: Vec<SamplePoint>,
}

impl LogEntry {
    pub fn new(case: Case, points: Vec<SamplePoint>) -> Self {
        Self { case, points }
    }
}

/// Append-only record of every decision taken while resolving one node,
/// plus the error that left it unresolved, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationLog {
    entries: Vec<LogEntry>,
    failure: Option<Error>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    pub fn set_failure(&mut self, error: Error) {
        self.failure = Some(error);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cases in decision order
    pub fn cases(&self) -> impl Iterator<Item = Case> + '_ {
        self.entries.iter().map(|e| e.case)
    }
}

impl Extend<LogEntry> for OperationLog {
    fn extend<I: IntoIterator<Item = LogEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}
