//! Quadrant neighborhood search
//!
//! Selects up to four candidates around a node, at most one per quadrant,
//! from the samples inside an axis-aligned search box.

use dispgrid_core::SamplePoint;

use super::geometry::distance;

/// Result of a quadrant search: the selected candidates and their distances
/// to the node, in matching order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighborhood {
    pub points: Vec<SamplePoint>,
    pub distances: Vec<f64>,
}

impl Neighborhood {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the nearest candidate; the first one on ties
    pub fn nearest(&self) -> Option<usize> {
        argmin(&self.distances)
    }
}

fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some(b) if values[b] <= v => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Split `points` on `key(p) <= pivot` (or `>=` when `upper` is set).
///
/// When the inclusive test captures every point, the strict test is used
/// instead so ties on the pivot line are not all swallowed by one side.
fn split_side<F>(points: Vec<SamplePoint>, key: F, pivot: f64, upper: bool) -> (Vec<SamplePoint>, Vec<SamplePoint>)
where
    F: Fn(&SamplePoint) -> f64,
{
    let inclusive = |p: &SamplePoint| {
        if upper {
            key(p) >= pivot
        } else {
            key(p) <= pivot
        }
    };
    let strict = |p: &SamplePoint| {
        if upper {
            key(p) > pivot
        } else {
            key(p) < pivot
        }
    };

    if points.iter().all(|p| inclusive(p)) {
        points.into_iter().partition(|p| strict(p))
    } else {
        points.into_iter().partition(|p| inclusive(p))
    }
}

/// Find the nearest sample in each quadrant around `node`.
///
/// 1. Keep samples inside `[x ± eps_x] × [z ± eps_z]` (bounds inclusive).
/// 2. Split on `x <= node.x` / `x > node.x`, falling back to `<` when `<=` takes everything.
/// 3. Split each side on `z >= node.z` / `z < node.z` with the same fallback to `>`.
/// 4. Keep the closest sample of every non-empty bucket.
///
/// Quadrants are reported in the order (x-low, z-high), (x-low, z-low),
/// (x-high, z-high), (x-high, z-low).
pub fn quadrant_search(node: (f64, f64), samples: &[SamplePoint], eps_x: f64, eps_z: f64) -> Neighborhood {
    let (nx, nz) = node;

    let in_box: Vec<SamplePoint> = samples
        .iter()
        .filter(|p| {
            p.x <= nx + eps_x && p.x >= nx - eps_x && p.z <= nz + eps_z && p.z >= nz - eps_z
        })
        .copied()
        .collect();

    let (low_x, high_x) = split_side(in_box, |p| p.x, nx, false);
    let (low_x_up, low_x_down) = split_side(low_x, |p| p.z, nz, true);
    let (high_x_up, high_x_down) = split_side(high_x, |p| p.z, nz, true);

    let mut neighborhood = Neighborhood::default();
    for bucket in [low_x_up, low_x_down, high_x_up, high_x_down] {
        let dist = distance(node, &bucket);
        if let Some(i) = argmin(&dist) {
            neighborhood.points.push(bucket[i]);
            neighborhood.distances.push(dist[i]);
        }
    }
    neighborhood
}
