//! Per-node resolution and whole-grid runs
//!
//! A node is resolved by a quadrant search, classification of the selected
//! candidates, and the mean of every estimate the classification yields.
//! Errors stay local to the node: it is left unresolved and the run goes on.

use crate::maybe_rayon::*;
use dispgrid_core::{
    prepare_samples, Algorithm, Case, Error, Grid, GridExtent, InterpolationConfig, LogEntry,
    Result, RunSummary, SamplePoint,
};
use tracing::{debug, info, warn};

use super::classify::{classify_pair, classify_triangle, match_point, triples};
use super::estimate::{as_pair, interpolate_linear, interpolate_plane};
use super::quadrant::{quadrant_search, Neighborhood};

/// Search radii and coincidence tolerance used for every node of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveParams {
    /// Horizontal search radius
    pub eps_x: f64,
    /// Vertical search radius
    pub eps_z: f64,
    /// Coincidence tolerance
    pub eps_match: f64,
}

impl ResolveParams {
    /// Radii from the grid steps unless the configuration overrides them
    pub fn for_grid(grid: &Grid, config: &InterpolationConfig) -> Self {
        Self {
            eps_x: config.eps_x.unwrap_or(grid.step_x()),
            eps_z: config.eps_z.unwrap_or(grid.step_z().abs()),
            eps_match: config.eps_match,
        }
    }
}

/// What resolving one node produced
#[derive(Debug, Clone, PartialEq)]
pub struct NodeOutcome {
    /// Mean of all estimates, or the reason the node stays unresolved
    pub displacement: Result<f64>,
    /// Every classifier decision, in order
    pub log: Vec<LogEntry>,
}

/// Resolve the displacement at `node` from `samples`.
pub fn resolve_node(node: (f64, f64), samples: &[SamplePoint], params: &ResolveParams) -> NodeOutcome {
    let neighborhood = quadrant_search(node, samples, params.eps_x, params.eps_z);

    let mut log = Vec::new();
    let displacement = estimate(node, &neighborhood, params.eps_match, &mut log);

    NodeOutcome { displacement, log }
}

fn estimate(
    node: (f64, f64),
    neighborhood: &Neighborhood,
    eps_match: f64,
    log: &mut Vec<LogEntry>,
) -> Result<f64> {
    let matched = match_point(node, neighborhood, eps_match)?;
    let case = matched.case;
    let nearest = matched.points[0];
    log.push(matched);

    let mut estimates = Vec::new();

    if case == Case::Coincident {
        estimates.push(nearest.displacement);
    } else if let &[a, b] = neighborhood.points.as_slice() {
        let entry = classify_pair(node, &[a, b]);
        let collinear = entry.case == Case::Collinear;
        log.push(entry);
        if collinear {
            estimates.push(interpolate_linear(node, &[a, b])?);
        }
    } else if neighborhood.len() > 2 {
        // First on-edge triple ends the scan; inside triples all contribute.
        for triangle in triples(&neighborhood.points) {
            let entry = classify_triangle(node, &triangle);
            let case = entry.case;
            let edge = entry.points.clone();
            log.push(entry);

            match case {
                Case::OnEdge => {
                    estimates.push(interpolate_linear(node, &as_pair(&edge)?)?);
                    break;
                }
                Case::Inside => estimates.push(interpolate_plane(node, &triangle)?),
                _ => {}
            }
        }
    }

    if estimates.is_empty() {
        return Err(Error::NoEstimate {
            x: node.0,
            z: node.1,
        });
    }
    Ok(estimates.iter().sum::<f64>() / estimates.len() as f64)
}

/// Outcomes of one grid row, with the counters of that row
struct RowOutcome {
    row: usize,
    outcomes: Vec<NodeOutcome>,
    summary: RunSummary,
}

/// Resolve every node of `grid` and return the run counters.
///
/// Rows are resolved independently (in parallel with the `parallel`
/// feature), each with its own counters. Row counters are then merged and
/// the outcomes written to the grid in one sequential pass.
pub fn resolve_grid(grid: &mut Grid, samples: &[SamplePoint], params: &ResolveParams) -> RunSummary {
    let rows: Vec<RowOutcome> = {
        let (xs, zs) = (grid.xs(), grid.zs());
        (0..zs.len())
            .into_par_iter()
            .map(|row| {
                let mut summary = RunSummary::default();
                let outcomes = xs
                    .iter()
                    .map(|&x| {
                        let outcome = resolve_node((x, zs[row]), samples, params);
                        summary.record(&outcome.displacement);
                        outcome
                    })
                    .collect();
                RowOutcome {
                    row,
                    outcomes,
                    summary,
                }
            })
            .collect()
    };

    let mut summary = RunSummary::new(grid.len());
    for RowOutcome {
        row,
        outcomes,
        summary: counts,
    } in rows
    {
        summary.merge(&counts);

        for (col, outcome) in outcomes.into_iter().enumerate() {
            if let Err(e) = &outcome.displacement {
                match e {
                    Error::DegenerateGeometry { .. } => {
                        warn!("Node ({}, {}) left unresolved: {}", row, col, e)
                    }
                    _ if e.is_node_local() => debug!("Node ({}, {}) left unresolved: {}", row, col, e),
                    _ => warn!("Node ({}, {}) failed: {}", row, col, e),
                }
            }

            if let Err(e) = grid.record(row, col, outcome.displacement, outcome.log) {
                warn!("Dropped outcome for node ({}, {}): {}", row, col, e);
            }
        }
    }

    info!("{}", summary);
    summary
}

/// A finished run: the resolved grid and its counters
#[derive(Debug, Clone)]
pub struct InterpolationRun {
    pub grid: Grid,
    pub summary: RunSummary,
}

/// Parameters for a complete displacement grid run
#[derive(Debug, Clone, Default)]
pub struct DisplacementGridParams {
    /// Step tables, radii and tolerances
    pub config: InterpolationConfig,
    /// Section size. `None` derives it from the samples.
    pub extent: Option<GridExtent>,
}

/// Interpolate scattered displacement samples onto a regular grid.
///
/// 1. Sorts and deduplicates the samples
/// 2. Builds the grid (fails if the depth has no vertical step)
/// 3. Resolves every node; unresolved nodes never abort the run
pub fn interpolate_displacements(
    samples: Vec<SamplePoint>,
    params: DisplacementGridParams,
) -> Result<InterpolationRun> {
    let samples = prepare_samples(samples)?;

    let extent = match params.extent {
        Some(extent) => extent,
        None => GridExtent::from_samples(&samples)?,
    };

    let mut grid = Grid::from_extent(extent, &params.config)?;
    debug!(
        "Grid {} x {} (step_x = {}, step_z = {}) over {} samples",
        grid.cols(),
        grid.rows(),
        grid.step_x(),
        grid.step_z(),
        samples.len()
    );

    let resolve = ResolveParams::for_grid(&grid, &params.config);
    let summary = resolve_grid(&mut grid, &samples, &resolve);

    Ok(InterpolationRun { grid, summary })
}

/// Displacement grid algorithm
#[derive(Debug, Clone, Default)]
pub struct DisplacementGrid;

impl Algorithm for DisplacementGrid {
    type Input = Vec<SamplePoint>;
    type Output = InterpolationRun;
    type Params = DisplacementGridParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "DisplacementGrid"
    }

    fn description(&self) -> &'static str {
        "Interpolate scattered displacement samples onto a regular grid by quadrant search"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        debug!("{}: {} samples", self.name(), input.len());
        interpolate_displacements(input, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, z: f64, u: f64) -> SamplePoint {
        SamplePoint::new(x, z, u)
    }

    fn params() -> ResolveParams {
        ResolveParams {
            eps_x: 1.0,
            eps_z: 1.0,
            eps_match: 0.0,
        }
    }

    fn cases(outcome: &NodeOutcome) -> Vec<Case> {
        outcome.log.iter().map(|e| e.case).collect()
    }

    #[test]
    fn test_coincident_short_circuits() {
        let samples = vec![p(0.0, 0.0, 7.5), p(1.0, 0.0, 100.0), p(0.0, -1.0, -100.0)];
        let outcome = resolve_node((0.0, 0.0), &samples, &params());
        assert_eq!(outcome.displacement, Ok(7.5));
        assert_eq!(cases(&outcome), vec![Case::Coincident]);
    }

    #[test]
    fn test_collinear_pair() {
        let samples = vec![p(0.0, 0.0, 2.0), p(2.0, 0.0, 4.0)];
        let outcome = resolve_node((1.0, 0.0), &samples, &params());
        assert_eq!(outcome.displacement, Ok(3.0));
        assert_eq!(cases(&outcome), vec![Case::NotCoincident, Case::Collinear]);
    }

    #[test]
    fn test_pair_off_line_is_unresolved() {
        let samples = vec![p(0.0, 0.5, 2.0), p(1.0, -0.5, 4.0)];
        let outcome = resolve_node((0.0, 0.0), &samples, &params());
        assert_eq!(outcome.displacement, Err(Error::NoEstimate { x: 0.0, z: 0.0 }));
        assert_eq!(cases(&outcome), vec![Case::NotCoincident, Case::Outside]);
    }

    #[test]
    fn test_single_distant_candidate_is_unresolved() {
        let samples = vec![p(0.5, 0.5, 2.0)];
        let outcome = resolve_node((0.0, 0.0), &samples, &params());
        assert!(matches!(outcome.displacement, Err(Error::NoEstimate { .. })));
        assert_eq!(cases(&outcome), vec![Case::NotCoincident]);
    }

    #[test]
    fn test_empty_neighborhood() {
        let outcome = resolve_node((0.0, 0.0), &[p(5.0, 5.0, 1.0)], &params());
        assert_eq!(
            outcome.displacement,
            Err(Error::EmptyNeighborhood { x: 0.0, z: 0.0 })
        );
        assert!(outcome.log.is_empty());
    }

    #[test]
    fn test_inside_triangle_plane() {
        // u = x + z on a triangle around the node
        let samples = vec![p(-0.5, 0.5, 0.0), p(-0.5, -0.5, -1.0), p(0.8, 0.0, 0.8)];
        let outcome = resolve_node((0.0, 0.0), &samples, &params());
        assert_eq!(cases(&outcome), vec![Case::NotCoincident, Case::Inside]);
        let u = outcome.displacement.unwrap();
        assert!(u.abs() < 1e-12, "got {u}");
    }

    #[test]
    fn test_grid_run_counts_every_node() {
        let config = InterpolationConfig::default();
        let mut grid = Grid::build(2.0, -10.0, &config).unwrap();
        let samples = vec![p(-1.0, 0.0, 1.0), p(0.0, 0.0, 2.0), p(1.0, 0.0, 3.0)];
        let resolve = ResolveParams::for_grid(&grid, &config);
        assert_eq!(resolve.eps_z, 0.5);

        let summary = resolve_grid(&mut grid, &samples, &resolve);
        assert_eq!(summary.total, grid.len());
        assert!(summary.is_complete());
        assert_eq!(summary.resolved, 3);
        assert_eq!(grid.get(0, 1).unwrap().displacement, Some(2.0));
        assert_eq!(grid.log(0, 1).unwrap().cases().collect::<Vec<_>>(), vec![Case::Coincident]);
        assert!(grid.get(5, 1).unwrap().displacement.is_none());
    }

    #[test]
    fn test_row_counters_match_grid() {
        let config = InterpolationConfig::default();
        let mut grid = Grid::build(4.0, -10.0, &config).unwrap();
        let samples = vec![
            p(-2.0, 0.0, 1.0),
            p(2.0, 0.0, 3.0),
            p(0.0, -0.5, 2.0),
            p(1.0, -0.5, 2.5),
        ];
        let resolve = ResolveParams::for_grid(&grid, &config);
        let summary = resolve_grid(&mut grid, &samples, &resolve);

        let resolved = grid.iter().filter(|(_, n)| n.displacement.is_some()).count();
        let empty = grid
            .logs()
            .iter()
            .filter(|log| matches!(log.failure(), Some(Error::EmptyNeighborhood { .. })))
            .count();

        assert!(summary.is_complete());
        assert_eq!(summary.resolved, resolved);
        assert_eq!(summary.unresolved, grid.len() - resolved);
        assert_eq!(summary.empty_neighborhood, empty);
        assert!(empty > 0);
    }

    #[test]
    fn test_algorithm_trait() {
        let samples = vec![
            p(-2.0, 0.0, 0.0),
            p(2.0, 0.0, 4.0),
            p(0.0, -10.0, 0.0),
            p(2.0, 0.0, 4.0),
        ];
        assert_eq!(DisplacementGrid.name(), "DisplacementGrid");
        let run = DisplacementGrid.execute_default(samples).unwrap();
        assert_eq!(run.grid.extent(), GridExtent::new(4.0, -10.0));
        assert_eq!(run.summary.total, 5 * 21);
        assert_eq!(run.grid.get(0, 4).unwrap().displacement, Some(4.0));
    }

    #[test]
    fn test_unknown_depth_is_fatal() {
        let samples = vec![p(-2.0, 0.0, 0.0), p(2.0, -11.0, 1.0)];
        let err = DisplacementGrid.execute_default(samples).unwrap_err();
        assert_eq!(err, Error::LookupFailure { depth: -11.0 });
    }
}
