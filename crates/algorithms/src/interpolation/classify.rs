//! Position of a node relative to its quadrant candidates
//!
//! Every classifier returns the decision as a [`LogEntry`]; the resolver
//! appends it to the node's operation log.

use dispgrid_core::{Case, Error, LogEntry, Result, SamplePoint};

use super::geometry::cross_sign;
use super::quadrant::Neighborhood;

/// Coincidence test against the nearest candidate.
///
/// `Coincident` when its distance is at most `eps_match`, `NotCoincident`
/// otherwise; either way the entry carries that nearest candidate.
pub fn match_point(node: (f64, f64), neighborhood: &Neighborhood, eps_match: f64) -> Result<LogEntry> {
    let idx = neighborhood.nearest().ok_or(Error::EmptyNeighborhood {
        x: node.0,
        z: node.1,
    })?;

    let case = if neighborhood.distances[idx] <= eps_match {
        Case::Coincident
    } else {
        Case::NotCoincident
    };
    Ok(LogEntry::new(case, vec![neighborhood.points[idx]]))
}

/// `Collinear` when the node lies on the line through the pair, `Outside` otherwise
pub fn classify_pair(node: (f64, f64), pair: &[SamplePoint; 2]) -> LogEntry {
    let sign = cross_sign(&pair[0], &pair[1..], node)[0];
    let case = if sign == 0 { Case::Collinear } else { Case::Outside };
    LogEntry::new(case, pair.to_vec())
}

/// Position of the node relative to a triangle.
///
/// The triangle is tested from two rotations: as given, then shifted by one
/// (`[c, a, b]`). For each rotation the node is compared against the two
/// edges leaving the first vertex:
/// - a zero sign puts the node on that edge: `OnEdge` with the edge's two points;
/// - equal signs put it outside the fan, hence outside the triangle: `Outside`;
/// - opposite signs in both rotations put it inside: `Inside`.
pub fn classify_triangle(node: (f64, f64), triangle: &[SamplePoint; 3]) -> LogEntry {
    let [a, b, c] = *triangle;

    for rotation in [[a, b, c], [c, a, b]] {
        let signs = cross_sign(&rotation[0], &rotation[1..], node);

        if let Some(k) = signs.iter().position(|&s| s == 0) {
            return LogEntry::new(Case::OnEdge, vec![rotation[0], rotation[1 + k]]);
        }
        if signs.iter().all(|&s| s == signs[0]) {
            return LogEntry::new(Case::Outside, triangle.to_vec());
        }
    }

    LogEntry::new(Case::Inside, triangle.to_vec())
}

/// Every unordered 3-combination of `points`, in lexicographic index order
pub fn triples(points: &[SamplePoint]) -> Vec<[SamplePoint; 3]> {
    let n = points.len();
    let mut out = Vec::new();
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                out.push([points[i], points[j], points[k]]);
            }
        }
    }
    out
}
