//! Run configuration: grid step rules, search radii and tolerances

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One row of the vertical step table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthStep {
    pub depth: f64,
    pub step: f64,
}

/// Exact depth → vertical step lookup.
///
/// Depths are matched exactly; the table is never interpolated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepTable(Vec<DepthStep>);

impl StepTable {
    pub fn new(entries: Vec<DepthStep>) -> Self {
        Self(entries)
    }

    /// Vertical step for `depth`, or [`Error::LookupFailure`] when the depth is not a key
    pub fn lookup(&self, depth: f64) -> Result<f64> {
        self.0
            .iter()
            .find(|entry| entry.depth == depth)
            .map(|entry| entry.step)
            .ok_or(Error::LookupFailure { depth })
    }

    pub fn entries(&self) -> &[DepthStep] {
        &self.0
    }
}

impl Default for StepTable {
    fn default() -> Self {
        Self(vec![
            DepthStep { depth: -10.0, step: -0.5 },
            DepthStep { depth: -15.0, step: -1.0 },
            DepthStep { depth: -22.0, step: -1.5 },
            DepthStep { depth: -30.0, step: -2.0 },
        ])
    }
}

impl FromIterator<(f64, f64)> for StepTable {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(depth, step)| DepthStep { depth, step })
                .collect(),
        )
    }
}

/// Horizontal step selection: `fine` below `threshold`, `coarse` from it on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizontalStepRule {
    pub threshold: f64,
    pub fine: f64,
    pub coarse: f64,
}

impl HorizontalStepRule {
    pub fn step_for(&self, length: f64) -> f64 {
        if length < self.threshold {
            self.fine
        } else {
            self.coarse
        }
    }
}

impl Default for HorizontalStepRule {
    fn default() -> Self {
        Self {
            threshold: 60.0,
            fine: 1.0,
            coarse: 5.0,
        }
    }
}

/// Everything a run needs besides the samples themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Exact depth → vertical step table
    pub step_table: StepTable,
    /// Horizontal step rule
    pub horizontal: HorizontalStepRule,
    /// Distance at or below which a sample counts as coincident with a node
    pub eps_match: f64,
    /// Horizontal search radius. `None` uses the horizontal grid step.
    pub eps_x: Option<f64>,
    /// Vertical search radius. `None` uses the magnitude of the vertical grid step.
    pub eps_z: Option<f64>,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            step_table: StepTable::default(),
            horizontal: HorizontalStepRule::default(),
            eps_match: 0.0,
            eps_x: None,
            eps_z: None,
        }
    }
}

impl InterpolationConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if !(self.eps_match >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "eps_match",
                value: self.eps_match.to_string(),
                reason: "must be a non-negative number".into(),
            });
        }
        for (name, eps) in [("eps_x", self.eps_x), ("eps_z", self.eps_z)] {
            if let Some(v) = eps {
                if !(v >= 0.0) {
                    return Err(Error::InvalidParameter {
                        name,
                        value: v.to_string(),
                        reason: "search radius must be non-negative".into(),
                    });
                }
            }
        }
        let h = &self.horizontal;
        if !(h.fine > 0.0 && h.coarse > 0.0) {
            return Err(Error::InvalidParameter {
                name: "horizontal",
                value: format!("fine={}, coarse={}", h.fine, h.coarse),
                reason: "horizontal steps must be positive".into(),
            });
        }
        Ok(())
    }
}
