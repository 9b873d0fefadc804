use std::fmt;

use ndarray::{array, Array1, Array2};
use rand::Rng;
use serde::Serialize;

/// A 3D point in homogeneous coordinates (`w` fixed at 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Uniform random point with every coordinate drawn from `[lower, upper]`.
    pub fn random_in<R: Rng + ?Sized>(lower: f64, upper: f64, rng: &mut R) -> Self {
        let x = lower + (upper - lower) * rng.random::<f64>();
        let y = lower + (upper - lower) * rng.random::<f64>();
        let z = lower + (upper - lower) * rng.random::<f64>();
        Self::new(x, y, z)
    }

    /// Homogeneous column form `[x, y, z, 1]`.
    pub fn as_column(&self) -> Array1<f64> {
        array![self.x, self.y, self.z, 1.0]
    }

    /// Apply a 4x4 homogeneous transform.
    pub fn transform(&self, matrix: &Array2<f64>) -> Self {
        let t = matrix.dot(&self.as_column());
        Self::new(t[0], t[1], t[2])
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Vector3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5},{:.5}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn identity_transform_returns_the_same_point() {
        let v = Vector3::new(1.0, -2.0, 3.5);
        assert_eq!(v.transform(&Array2::eye(4)), v);
    }

    #[test]
    fn translation_moves_the_point() {
        let m = array![
            [1.0, 0.0, 0.0, 10.0],
            [0.0, 1.0, 0.0, -1.0],
            [0.0, 0.0, 1.0, 0.5],
            [0.0, 0.0, 0.0, 1.0]
        ];
        let v = Vector3::new(1.0, 2.0, 3.0).transform(&m);
        assert_abs_diff_eq!(v.x, 11.0);
        assert_abs_diff_eq!(v.y, 1.0);
        assert_abs_diff_eq!(v.z, 3.5);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(3.0, 4.0, 0.0);
        assert_abs_diff_eq!(a.distance(&b), 5.0);
        assert_abs_diff_eq!(b.distance(&a), 5.0);
    }

    #[test]
    fn random_point_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let v = Vector3::random_in(-0.2, 0.2, &mut rng);
            for c in [v.x, v.y, v.z] {
                assert!((-0.2..=0.2).contains(&c));
            }
        }
    }

    #[test]
    fn display_uses_five_decimals() {
        let v = Vector3::new(1.0, -0.5, 0.125);
        assert_eq!(v.to_string(), "1.00000,-0.50000,0.12500");
    }
}
