//! Plan-view geometry primitives
//!
//! Locations are `(x, z)` pairs in the plane of the section; sample points
//! carry their displacement as a third coordinate for the plane solve.

use dispgrid_core::{Error, Result, SamplePoint};

/// Euclidean distance from `point` to each of `points`, in order
pub fn distance(point: (f64, f64), points: &[SamplePoint]) -> Vec<f64> {
    points.iter().map(|p| p.dist(point.0, point.1)).collect()
}

/// Sign of the 2-D cross product `edge × (probe - vertex)` for each edge
/// of the fan from `vertex` to `edge_points`.
///
/// `0` means the probe lies exactly on the infinite line through the edge.
pub fn cross_sign(vertex: &SamplePoint, edge_points: &[SamplePoint], probe: (f64, f64)) -> Vec<i8> {
    let (px, pz) = (probe.0 - vertex.x, probe.1 - vertex.z);
    edge_points
        .iter()
        .map(|end| {
            let (ex, ez) = (end.x - vertex.x, end.z - vertex.z);
            sign(ex * pz - ez * px)
        })
        .collect()
}

#[inline]
fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Displacement where the line through `probe`, perpendicular to the section
/// plane, meets the plane through the three points of `triangle`.
///
/// With `v1 = p2 - p1` and `v2 = p3 - p1` the plane normal is `(a, b, c)`:
///
/// ```text
/// a =   v1.z * v2.u - v1.u * v2.z
/// b = -(v1.x * v2.u - v1.u * v2.x)
/// c =   v1.x * v2.z - v1.z * v2.x
/// u = -(a * (qx - p1.x) + b * (qz - p1.z) - c * p1.u) / c
/// ```
///
/// Fails when `c == 0`: the triangle is a line in plan view.
pub fn plane_intersect(probe: (f64, f64), triangle: &[SamplePoint; 3]) -> Result<f64> {
    let [p1, p2, p3] = triangle;

    let v1 = (p2.x - p1.x, p2.z - p1.z, p2.displacement - p1.displacement);
    let v2 = (p3.x - p1.x, p3.z - p1.z, p3.displacement - p1.displacement);

    let a = v1.1 * v2.2 - v1.2 * v2.1;
    let b = -(v1.0 * v2.2 - v1.2 * v2.0);
    let c = v1.0 * v2.1 - v1.1 * v2.0;

    if c == 0.0 {
        return Err(Error::degenerate(format!(
            "triangle ({}, {}), ({}, {}), ({}, {}) is collinear in plan view",
            p1.x, p1.z, p2.x, p2.z, p3.x, p3.z
        )));
    }

    let ax = a * (probe.0 - p1.x);
    let bz = b * (probe.1 - p1.z);
    let cu = c * p1.displacement;

    Ok(-(ax + bz - cu) / c)
}
