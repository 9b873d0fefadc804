//! Forward kinematics of a chained-link manipulator described by
//! Denavit-Hartenberg parameters.
//!
//! The engine sees none of this directly; [`distance_fitness`] wraps a
//! manipulator and a target point into the plain fitness closure the
//! engine minimizes.

use ndarray::{array, Array1, Array2};

use crate::vector3::Vector3;

/// Denavit-Hartenberg parameters of one rigid link.
///
/// <https://en.wikipedia.org/wiki/Denavit%E2%80%93Hartenberg_parameters>
#[derive(Debug, Clone, Copy, Default)]
pub struct DhParameters {
    /// Rotation angle about the previous z axis.
    pub theta: f64,
    /// Offset along the previous z axis.
    pub d: f64,
    /// Link length along the rotated x axis (`a` in the alternate notation).
    pub r: f64,
    /// Twist angle about the rotated x axis.
    pub alpha: f64,
}

impl DhParameters {
    /// The 4x4 homogeneous transform for this link.
    pub fn transformation_matrix(&self) -> Array2<f64> {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_alpha, cos_alpha) = self.alpha.sin_cos();
        array![
            [
                cos_theta,
                -sin_theta * cos_alpha,
                sin_theta * sin_alpha,
                self.r * cos_theta
            ],
            [
                sin_theta,
                cos_theta * cos_alpha,
                -cos_theta * sin_alpha,
                self.r * sin_theta
            ],
            [0.0, sin_alpha, cos_alpha, self.d],
            [0.0, 0.0, 0.0, 1.0]
        ]
    }
}

/// One link: fixed DH geometry plus the joint-angle range the solver may
/// explore for it.
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub dh: DhParameters,
    pub theta_bounds: (f64, f64),
}

/// A chained-link manipulator anchored at a base position.
#[derive(Debug, Clone)]
pub struct Manipulator {
    base: Vector3,
    links: Vec<Link>,
}

impl Manipulator {
    pub fn new(base: Vector3) -> Self {
        Self { base, links: Vec::new() }
    }

    /// Append a link with its joint-angle bounds.
    pub fn add_link(&mut self, dh: DhParameters, theta_bounds: (f64, f64)) {
        self.links.push(Link { dh, theta_bounds });
    }

    /// Number of links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn base(&self) -> Vector3 {
        self.base
    }

    /// Joint-angle bounds, one pair per link, in link order. This is the
    /// search space for the inverse-kinematics problem.
    pub fn theta_bounds(&self) -> Vec<(f64, f64)> {
        self.links.iter().map(|l| l.theta_bounds).collect()
    }

    /// Set every joint angle from `thetas`, one value per link.
    pub fn set_thetas(&mut self, thetas: &Array1<f64>) {
        for (link, &theta) in self.links.iter_mut().zip(thetas.iter()) {
            link.dh.theta = theta;
        }
    }

    /// Product `T1 * T2 * ... * Tn` of the link transforms.
    fn chain_transform(&self) -> Array2<f64> {
        let mut m = Array2::<f64>::eye(4);
        for link in &self.links {
            m = m.dot(&link.dh.transformation_matrix());
        }
        m
    }

    /// End-effector position for the currently stored joint angles.
    pub fn effector_position(&self) -> Vector3 {
        Vector3::new(0.0, 0.0, 0.0).transform(&self.chain_transform())
    }

    /// End-effector position with `thetas` substituted for the stored
    /// joint angles, leaving the manipulator unchanged.
    pub fn effector_position_for(&self, thetas: &Array1<f64>) -> Vector3 {
        let mut m = Array2::<f64>::eye(4);
        for (link, &theta) in self.links.iter().zip(thetas.iter()) {
            let dh = DhParameters { theta, ..link.dh };
            m = m.dot(&dh.transformation_matrix());
        }
        Vector3::new(0.0, 0.0, 0.0).transform(&m)
    }

    /// Positions of every joint, base first, effector last. The i-th joint
    /// sits at `T1 * ... * Ti` applied to the base.
    pub fn link_positions(&self) -> Vec<Vector3> {
        let mut positions = Vec::with_capacity(self.links.len() + 1);
        positions.push(self.base);
        let mut m = Array2::<f64>::eye(4);
        for link in &self.links {
            m = m.dot(&link.dh.transformation_matrix());
            positions.push(self.base.transform(&m));
        }
        positions
    }
}

/// Fitness for inverse kinematics: the Euclidean distance from the
/// end-effector position under the candidate joint angles to `target`.
///
/// The returned closure is a pure function of the agent vector, as the
/// engine's fitness contract requires.
pub fn distance_fitness(
    manipulator: Manipulator,
    target: Vector3,
) -> impl Fn(&Array1<f64>) -> f64 {
    move |thetas| manipulator.effector_position_for(thetas).distance(&target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn assert_matrix_eq(a: &Array2<f64>, b: &Array2<f64>) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn zero_parameters_give_the_identity_transform() {
        let dh = DhParameters::default();
        assert_matrix_eq(&dh.transformation_matrix(), &Array2::eye(4));
    }

    #[test]
    fn chain_of_zero_links_reduces_to_the_identity() {
        let mut arm = Manipulator::new(Vector3::new(0.0, 0.0, 0.0));
        for _ in 0..3 {
            arm.add_link(DhParameters::default(), (-PI, PI));
        }
        assert_eq!(arm.effector_position(), Vector3::new(0.0, 0.0, 0.0));
        for p in arm.link_positions() {
            assert_eq!(p, Vector3::new(0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn single_link_reaches_along_its_rotated_x_axis() {
        let mut arm = Manipulator::new(Vector3::new(0.0, 0.0, 0.0));
        arm.add_link(DhParameters { theta: 0.0, d: 0.0, r: 1.0, alpha: 0.0 }, (-PI, PI));

        let p = arm.effector_position();
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-12);

        arm.set_thetas(&ndarray::array![PI / 2.0]);
        let p = arm.effector_position();
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn effector_position_for_matches_set_thetas_and_does_not_mutate() {
        let mut arm = Manipulator::new(Vector3::new(0.0, 0.0, 0.0));
        arm.add_link(DhParameters { theta: 0.0, d: 0.03, r: 0.0, alpha: PI / 2.0 }, (0.0, PI));
        arm.add_link(DhParameters { theta: 0.0, d: 0.0, r: 0.1, alpha: 0.0 }, (0.0, PI));

        let thetas = ndarray::array![0.7, -0.3];
        let before = arm.effector_position();
        let probed = arm.effector_position_for(&thetas);
        assert_eq!(arm.effector_position(), before);

        arm.set_thetas(&thetas);
        let posed = arm.effector_position();
        assert_abs_diff_eq!(probed.x, posed.x, epsilon = 1e-12);
        assert_abs_diff_eq!(probed.y, posed.y, epsilon = 1e-12);
        assert_abs_diff_eq!(probed.z, posed.z, epsilon = 1e-12);
    }

    #[test]
    fn distance_fitness_is_zero_at_the_target() {
        let mut arm = Manipulator::new(Vector3::new(0.0, 0.0, 0.0));
        arm.add_link(DhParameters { theta: 0.0, d: 0.0, r: 0.5, alpha: 0.0 }, (-PI, PI));
        let thetas = ndarray::array![0.4];
        let target = arm.effector_position_for(&thetas);
        let fitness = distance_fitness(arm, target);
        assert_abs_diff_eq!(fitness(&thetas), 0.0, epsilon = 1e-12);
        assert!(fitness(&ndarray::array![1.4]) > 0.0);
    }
}
