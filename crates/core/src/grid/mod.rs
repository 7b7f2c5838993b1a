//! Regular output grid: coordinate sequences, node map and operation logs

mod node;

pub use node::{Case, GridNode, LogEntry, OperationLog};

use crate::config::InterpolationConfig;
use crate::error::{Error, Result};
use crate::point::SamplePoint;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Section size the grid is built over.
///
/// `length` is the horizontal span centered on 0, `depth` the signed
/// vertical extent measured from 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridExtent {
    pub length: f64,
    pub depth: f64,
}

impl GridExtent {
    pub fn new(length: f64, depth: f64) -> Self {
        Self { length, depth }
    }

    /// Extent covering a sample set: `length = |max x| + |min x|`, `depth = min z`.
    ///
    /// The top of the section is always at 0.
    pub fn from_samples(samples: &[SamplePoint]) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::InvalidParameter {
                name: "samples",
                value: "[]".into(),
                reason: "cannot derive a grid extent from no samples".into(),
            });
        }

        let mut min_x = f64::MAX;
        let mut max_x = f64::MIN;
        let mut min_z = f64::MAX;
        for p in samples {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_z = min_z.min(p.z);
        }

        Ok(Self {
            length: max_x.abs() + min_x.abs(),
            depth: min_z,
        })
    }
}

/// Half-open range `[start, stop)` with `ceil((stop - start) / step)` elements
fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = ((stop - start) / step).ceil();
    if !(n > 0.0) {
        return Vec::new();
    }
    (0..n as usize).map(|i| start + i as f64 * step).collect()
}

/// The regular grid a run resolves.
///
/// Rows follow the vertical sequence, columns the horizontal one. Each cell
/// holds a [`GridNode`] and the [`OperationLog`] written while resolving it.
#[derive(Debug, Clone)]
pub struct Grid {
    extent: GridExtent,
    step_x: f64,
    step_z: f64,
    xs: Vec<f64>,
    zs: Vec<f64>,
    nodes: Array2<GridNode>,
    logs: Array2<OperationLog>,
}

impl Grid {
    /// Build the grid for `length` x `depth`.
    ///
    /// The horizontal step comes from the length rule, the vertical one from
    /// the exact depth lookup. Fails with [`Error::LookupFailure`] when the
    /// depth has no step.
    pub fn build(length: f64, depth: f64, config: &InterpolationConfig) -> Result<Self> {
        if !(length.is_finite() && length > 0.0) {
            return Err(Error::InvalidParameter {
                name: "length",
                value: length.to_string(),
                reason: "must be a positive finite number".into(),
            });
        }
        if !depth.is_finite() {
            return Err(Error::InvalidParameter {
                name: "depth",
                value: depth.to_string(),
                reason: "must be finite".into(),
            });
        }

        let step_x = horizontal_step(length, config);
        let step_z = config.step_table.lookup(depth)?;

        if !step_z.is_finite() || step_z == 0.0 || depth * step_z < 0.0 {
            return Err(Error::InvalidParameter {
                name: "step_z",
                value: step_z.to_string(),
                reason: format!("must be non-zero and signed like depth {depth}"),
            });
        }

        let xs = arange(-length / 2.0, length / 2.0 + 1.0, step_x);
        let mut zs = arange(0.0, depth + step_z, step_z);
        if let Some(last) = zs.last_mut() {
            *last = depth;
        }

        let dim = (zs.len(), xs.len());
        let nodes = Array2::from_shape_fn(dim, |(row, col)| GridNode::new(xs[col], zs[row]));
        let logs = Array2::from_elem(dim, OperationLog::new());

        Ok(Self {
            extent: GridExtent::new(length, depth),
            step_x,
            step_z,
            xs,
            zs,
            nodes,
            logs,
        })
    }

    /// Build the grid for an extent
    pub fn from_extent(extent: GridExtent, config: &InterpolationConfig) -> Result<Self> {
        Self::build(extent.length, extent.depth, config)
    }

    // Dimensions

    pub fn extent(&self) -> GridExtent {
        self.extent
    }

    /// Horizontal step
    pub fn step_x(&self) -> f64 {
        self.step_x
    }

    /// Vertical step, signed like the depth
    pub fn step_z(&self) -> f64 {
        self.step_z
    }

    /// Horizontal coordinates, one per column
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Vertical coordinates, one per row
    pub fn zs(&self) -> &[f64] {
        &self.zs
    }

    pub fn rows(&self) -> usize {
        self.nodes.nrows()
    }

    pub fn cols(&self) -> usize {
        self.nodes.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.nodes.dim()
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // Node access

    fn out_of_bounds(&self, row: usize, col: usize) -> Error {
        Error::IndexOutOfBounds {
            row,
            col,
            rows: self.rows(),
            cols: self.cols(),
        }
    }

    /// Node at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<&GridNode> {
        self.nodes
            .get((row, col))
            .ok_or_else(|| self.out_of_bounds(row, col))
    }

    /// Operation log of the node at (row, col)
    pub fn log(&self, row: usize, col: usize) -> Result<&OperationLog> {
        self.logs
            .get((row, col))
            .ok_or_else(|| self.out_of_bounds(row, col))
    }

    pub fn logs(&self) -> &Array2<OperationLog> {
        &self.logs
    }

    /// Nodes in row-major order with their (row, col) index
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &GridNode)> {
        self.nodes.indexed_iter()
    }

    /// Store the resolution of a node: its value (or the error that left it
    /// unresolved) and the decisions that led there.
    pub fn record(
        &mut self,
        row: usize,
        col: usize,
        outcome: Result<f64>,
        entries: Vec<LogEntry>,
    ) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(self.out_of_bounds(row, col));
        }

        let log = &mut self.logs[(row, col)];
        log.extend(entries);

        let node = &mut self.nodes[(row, col)];
        match outcome {
            Ok(value) => node.displacement = Some(value),
            Err(e) => {
                node.displacement = None;
                log.set_failure(e);
            }
        }
        Ok(())
    }

    // Export

    /// Dense displacement array, NaN where the node is unresolved
    pub fn displacements(&self) -> Array2<f64> {
        self.nodes.map(|n| n.displacement.unwrap_or(f64::NAN))
    }

    /// Basic statistics over resolved nodes
    pub fn statistics(&self) -> GridStatistics {
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        let mut sum = 0.0;
        let mut count = 0usize;

        for value in self.nodes.iter().filter_map(|n| n.displacement) {
            min = Some(min.map_or(value, |m| m.min(value)));
            max = Some(max.map_or(value, |m| m.max(value)));
            sum += value;
            count += 1;
        }

        GridStatistics {
            min,
            max,
            mean: (count > 0).then(|| sum / count as f64),
            resolved_count: count,
            unresolved_count: self.len() - count,
        }
    }
}

/// Horizontal grid step for a section length
pub fn horizontal_step(length: f64, config: &InterpolationConfig) -> f64 {
    config.horizontal.step_for(length)
}

/// Basic statistics for a resolved grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridStatistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub resolved_count: usize,
    pub unresolved_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> InterpolationConfig {
        InterpolationConfig::default()
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::build(10.0, -10.0, &config()).unwrap();
        assert_eq!(grid.step_x(), 1.0);
        assert_eq!(grid.step_z(), -0.5);
        assert_eq!(grid.cols(), 11);
        assert_eq!(grid.rows(), 21);
        assert_eq!(grid.xs().first(), Some(&-5.0));
        assert_eq!(grid.xs().last(), Some(&5.0));
        assert_eq!(grid.zs().first(), Some(&0.0));
        assert_eq!(grid.zs().last(), Some(&-10.0));
        assert_eq!(grid.len(), 11 * 21);
    }

    #[test]
    fn test_last_vertical_value_snaps_to_depth() {
        // 0, -1.5, ..., -22.5 is generated; the last one is forced to -22
        let grid = Grid::build(20.0, -22.0, &config()).unwrap();
        assert_eq!(grid.rows(), 16);
        assert_eq!(grid.zs()[14], -21.0);
        assert_eq!(grid.zs()[15], -22.0);
    }

    #[test]
    fn test_horizontal_step_selection() {
        assert_eq!(horizontal_step(59.0, &config()), 1.0);
        assert_eq!(horizontal_step(60.0, &config()), 5.0);

        let grid = Grid::build(100.0, -30.0, &config()).unwrap();
        assert_eq!(grid.step_x(), 5.0);
        assert_eq!(grid.xs().len(), 21);
        assert_eq!(grid.xs()[0], -50.0);
        assert_eq!(grid.xs()[20], 50.0);
    }

    #[test]
    fn test_odd_length_is_half_open() {
        let grid = Grid::build(59.0, -15.0, &config()).unwrap();
        assert_eq!(grid.xs().len(), 60);
        assert_eq!(grid.xs()[0], -29.5);
        assert_eq!(grid.xs()[59], 29.5);
    }

    #[test]
    fn test_unknown_depth_is_lookup_failure() {
        let err = Grid::build(10.0, -12.0, &config()).unwrap_err();
        assert_eq!(err, Error::LookupFailure { depth: -12.0 });
    }

    #[test]
    fn test_invalid_length() {
        assert!(matches!(
            Grid::build(0.0, -10.0, &config()),
            Err(Error::InvalidParameter { name: "length", .. })
        ));
    }

    #[test]
    fn test_mismatched_step_sign() {
        let mut cfg = config();
        cfg.step_table = [(-10.0, 0.5)].into_iter().collect();
        assert!(matches!(
            Grid::build(10.0, -10.0, &cfg),
            Err(Error::InvalidParameter { name: "step_z", .. })
        ));
    }

    #[test]
    fn test_nodes_start_unresolved() {
        let grid = Grid::build(4.0, -10.0, &config()).unwrap();
        for ((row, col), node) in grid.iter() {
            assert_eq!(node.x, grid.xs()[col]);
            assert_eq!(node.z, grid.zs()[row]);
            assert!(node.displacement.is_none());
            assert!(grid.log(row, col).unwrap().is_empty());
        }
    }

    #[test]
    fn test_record_and_statistics() {
        let mut grid = Grid::build(2.0, -10.0, &config()).unwrap();
        let p = SamplePoint::new(-1.0, 0.0, 4.0);

        grid.record(0, 0, Ok(4.0), vec![LogEntry::new(Case::Coincident, vec![p])])
            .unwrap();
        grid.record(0, 1, Ok(2.0), Vec::new()).unwrap();
        grid.record(1, 0, Err(Error::EmptyNeighborhood { x: -1.0, z: -0.5 }), Vec::new())
            .unwrap();

        assert_eq!(grid.get(0, 0).unwrap().displacement, Some(4.0));
        assert_eq!(grid.log(0, 0).unwrap().len(), 1);
        assert!(grid.log(1, 0).unwrap().failure().is_some());

        let stats = grid.statistics();
        assert_eq!(stats.min, Some(2.0));
        assert_eq!(stats.max, Some(4.0));
        assert_eq!(stats.mean, Some(3.0));
        assert_eq!(stats.resolved_count, 2);
        assert_eq!(stats.unresolved_count, grid.len() - 2);

        let dense = grid.displacements();
        assert_eq!(dense[(0, 0)], 4.0);
        assert!(dense[(1, 0)].is_nan());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = Grid::build(2.0, -10.0, &config()).unwrap();
        assert!(matches!(
            grid.get(100, 0),
            Err(Error::IndexOutOfBounds { row: 100, .. })
        ));
        assert!(grid.record(0, 99, Ok(1.0), Vec::new()).is_err());
    }

    #[test]
    fn test_extent_from_samples() {
        let samples = vec![
            SamplePoint::new(-40.0, 0.0, 0.0),
            SamplePoint::new(60.0, -5.0, 0.0),
            SamplePoint::new(10.0, -30.0, 0.0),
        ];
        let extent = GridExtent::from_samples(&samples).unwrap();
        assert_eq!(extent, GridExtent::new(100.0, -30.0));
        assert!(GridExtent::from_samples(&[]).is_err());
    }
}
