//! Measured sample points

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A measured sample: horizontal coordinate `x`, vertical coordinate `z`
/// and the displacement measured there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub z: f64,
    pub displacement: f64,
}

impl SamplePoint {
    pub fn new(x: f64, z: f64, displacement: f64) -> Self {
        Self { x, z, displacement }
    }

    /// Plan-view location `(x, z)`
    #[inline]
    pub fn xz(&self) -> (f64, f64) {
        (self.x, self.z)
    }

    /// Squared Euclidean distance to a location
    #[inline]
    pub fn dist_sq(&self, other_x: f64, other_z: f64) -> f64 {
        let dx = self.x - other_x;
        let dz = self.z - other_z;
        dx * dx + dz * dz
    }

    /// Euclidean distance to a location
    #[inline]
    pub fn dist(&self, other_x: f64, other_z: f64) -> f64 {
        self.dist_sq(other_x, other_z).sqrt()
    }

    /// Lexicographic order on (x, z, displacement)
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then(self.z.total_cmp(&other.z))
            .then(self.displacement.total_cmp(&other.displacement))
    }
}

impl From<[f64; 3]> for SamplePoint {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Sort samples and drop exact duplicate triples.
///
/// Every query reaching the resolver must see a deduplicated collection.
/// Samples with a non-finite component are rejected.
pub fn prepare_samples(mut samples: Vec<SamplePoint>) -> Result<Vec<SamplePoint>> {
    if let Some(bad) = samples
        .iter()
        .find(|p| !(p.x.is_finite() && p.z.is_finite() && p.displacement.is_finite()))
    {
        return Err(Error::InvalidParameter {
            name: "sample",
            value: format!("({}, {}, {})", bad.x, bad.z, bad.displacement),
            reason: "coordinates and displacement must be finite".into(),
        });
    }

    samples.sort_by(SamplePoint::total_cmp);
    samples.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);
    Ok(samples)
}
