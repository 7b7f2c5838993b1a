//! Displacement estimates for a classified node

use dispgrid_core::{Error, Result, SamplePoint};

use super::geometry::plane_intersect;

/// Linear interpolation along the segment `pair` at `probe`.
///
/// The probe is expected on the line through the pair. The abscissa is the
/// axis that varies between the two points: `z` when they share `x`, `x`
/// when they share `z`, otherwise the distance from the first point.
///
/// ```text
/// u = (u1 - u2) * (t - t2) / (t1 - t2) + u2
/// ```
pub fn interpolate_linear(probe: (f64, f64), pair: &[SamplePoint; 2]) -> Result<f64> {
    let [p1, p2] = pair;

    let (t1, t2, t) = if p1.x == p2.x && p1.z == p2.z {
        return Err(Error::degenerate(format!(
            "segment endpoints share location ({}, {})",
            p1.x, p1.z
        )));
    } else if p1.x == p2.x {
        (p1.z, p2.z, probe.1)
    } else if p1.z == p2.z {
        (p1.x, p2.x, probe.0)
    } else {
        (0.0, p2.dist(p1.x, p1.z), p1.dist(probe.0, probe.1))
    };

    Ok((p1.displacement - p2.displacement) * (t - t2) / (t1 - t2) + p2.displacement)
}

/// Interpolation over the plane through `triangle` at `probe`
pub fn interpolate_plane(probe: (f64, f64), triangle: &[SamplePoint; 3]) -> Result<f64> {
    plane_intersect(probe, triangle)
}

/// Slice to pair, for log entries that carry an edge
pub(crate) fn as_pair(points: &[SamplePoint]) -> Result<[SamplePoint; 2]> {
    match points {
        [a, b] => Ok([*a, *b]),
        _ => Err(Error::degenerate(format!(
            "expected 2 points for a segment, got {}",
            points.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, z: f64, u: f64) -> SamplePoint {
        SamplePoint::new(x, z, u)
    }

    #[test]
    fn test_horizontal_segment() {
        let pair = [p(0.0, 0.0, 2.0), p(2.0, 0.0, 4.0)];
        assert_eq!(interpolate_linear((1.0, 0.0), &pair).unwrap(), 3.0);
    }

    #[test]
    fn test_vertical_segment() {
        let pair = [p(1.0, 0.0, 10.0), p(1.0, -4.0, 2.0)];
        assert_eq!(interpolate_linear((1.0, -1.0), &pair).unwrap(), 8.0);
    }

    #[test]
    fn test_oblique_segment() {
        let pair = [p(0.0, 0.0, 0.0), p(3.0, -4.0, 10.0)];
        let u = interpolate_linear((1.5, -2.0), &pair).unwrap();
        assert!((u - 5.0).abs() < 1e-12, "got {u}");
    }

    #[test]
    fn test_endpoint_values() {
        let pair = [p(0.0, 0.0, 2.0), p(2.0, 0.0, 4.0)];
        assert_eq!(interpolate_linear((0.0, 0.0), &pair).unwrap(), 2.0);
        assert_eq!(interpolate_linear((2.0, 0.0), &pair).unwrap(), 4.0);
    }

    #[test]
    fn test_duplicate_location_is_degenerate() {
        let pair = [p(1.0, 1.0, 2.0), p(1.0, 1.0, 4.0)];
        assert!(matches!(
            interpolate_linear((1.0, 1.0), &pair),
            Err(Error::DegenerateGeometry { .. })
        ));
    }

    #[test]
    fn test_plane() {
        // u = 2x - z
        let tri = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 2.0), p(0.0, -1.0, 1.0)];
        let u = interpolate_plane((0.25, -0.25), &tri).unwrap();
        assert!((u - 0.75).abs() < 1e-12, "got {u}");
    }

    #[test]
    fn test_as_pair() {
        let a = p(0.0, 0.0, 1.0);
        assert!(as_pair(&[a, a]).is_ok());
        assert!(as_pair(&[a]).is_err());
    }
}
