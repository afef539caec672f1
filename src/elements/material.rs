//! Constitutive laws for incompressible hyperelastic membranes
//!
//! The strain energy density `W(lambda_1, lambda_2)` is written in terms of the
//! meridional stretch `lambda_1` and the circumferential stretch `lambda_2`.
//! The thickness stretch follows from incompressibility,
//! `lambda_1 * lambda_2 * lambda_3 = 1`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MembraneError;
use crate::math::{Mat2, Vec2};

/// Principal stretches at a membrane material point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stretches {
    /// Meridional stretch `ds / dS`
    pub lambda1: f64,
    /// Circumferential stretch `r / R`
    pub lambda2: f64,
}

impl Stretches {
    pub fn new(lambda1: f64, lambda2: f64) -> Self {
        Self { lambda1, lambda2 }
    }

    /// Undeformed state
    pub fn reference() -> Self {
        Self::new(1.0, 1.0)
    }

    /// Thickness stretch `t / T`
    pub fn lambda3(&self) -> f64 {
        1.0 / (self.lambda1 * self.lambda2)
    }
}

/// Stress conjugates and tangent moduli at a material point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressResponse {
    /// `dW / dlambda_1`
    pub p1: f64,
    /// `dW / dlambda_2`
    pub p2: f64,
    /// Geometric part of the stretch-space tangent
    pub d_geom: Mat2,
    /// Material tangent, the Hessian of `W` in stretch space
    pub d_mat: Mat2,
}

impl StressResponse {
    /// `[P1, P2]`
    pub fn stress(&self) -> Vec2 {
        Vec2::new(self.p1, self.p2)
    }

    /// `D_geom + D_mat`
    pub fn tangent(&self) -> Mat2 {
        self.d_geom + self.d_mat
    }
}

/// Supported membrane constitutive laws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MembraneLaw {
    /// `W = (I1 - 3) + alpha (I2 - 3)`
    #[default]
    MooneyRivlin,
}

impl MembraneLaw {
    /// Stress conjugates and tangents for the given stretches and material parameter
    pub fn response(&self, stretches: Stretches, alpha: f64) -> StressResponse {
        match self {
            MembraneLaw::MooneyRivlin => mooney_rivlin_response(stretches, alpha),
        }
    }

    /// Strain energy density
    pub fn strain_energy(&self, stretches: Stretches, alpha: f64) -> f64 {
        match self {
            MembraneLaw::MooneyRivlin => {
                let Stretches { lambda1: l1, lambda2: l2 } = stretches;
                let l3 = stretches.lambda3();
                let i1 = l1 * l1 + l2 * l2 + l3 * l3;
                let i2 = l1 * l1 * l2 * l2 + 1.0 / (l1 * l1) + 1.0 / (l2 * l2);
                (i1 - 3.0) + alpha * (i2 - 3.0)
            }
        }
    }

    /// Tag used by model descriptions
    pub fn tag(&self) -> &'static str {
        match self {
            MembraneLaw::MooneyRivlin => "Mooney_Rivlin_Hyperelastic",
        }
    }
}

impl FromStr for MembraneLaw {
    type Err = MembraneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mooney_Rivlin_Hyperelastic" | "MooneyRivlin" => Ok(MembraneLaw::MooneyRivlin),
            other => Err(MembraneError::UnsupportedElementType(other.to_string())),
        }
    }
}

fn mooney_rivlin_response(stretches: Stretches, alpha: f64) -> StressResponse {
    let Stretches { lambda1: l1, lambda2: l2 } = stretches;
    let l3 = stretches.lambda3();

    let p1 = 2.0 / l1 * (1.0 + alpha * l2 * l2) * (l1 + l3) * (l1 - l3);
    let p2 = 2.0 / l2 * (1.0 + alpha * l1 * l1) * (l2 + l3) * (l2 - l3);

    let w11 = -3.0 * p1 / l1 + 8.0 * (1.0 + alpha * l2 * l2);
    let w22 = -3.0 * p2 / l2 + 8.0 * (1.0 + alpha * l1 * l1);
    let w12 = 4.0 * alpha / l3 + 4.0 * l3.powi(3);

    StressResponse {
        p1,
        p2,
        d_geom: Mat2::new(-p1 / l1, 0.0, 0.0, 0.0),
        d_mat: Mat2::new(w11, w12, w12, w22),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_state() {
        for alpha in [0.0, 0.1, 0.2, 1.5] {
            let r = MembraneLaw::MooneyRivlin.response(Stretches::reference(), alpha);

            assert_relative_eq!(r.p1, 0.0, epsilon = 1e-14);
            assert_relative_eq!(r.p2, 0.0, epsilon = 1e-14);
            assert_relative_eq!(r.d_mat[(0, 0)], 8.0 * (1.0 + alpha), epsilon = 1e-12);
            assert_relative_eq!(r.d_mat[(1, 1)], 8.0 * (1.0 + alpha), epsilon = 1e-12);
            assert_relative_eq!(r.d_mat[(0, 1)], 4.0 * (1.0 + alpha), epsilon = 1e-12);
            assert_relative_eq!(r.d_mat[(1, 0)], r.d_mat[(0, 1)]);
            assert_eq!(r.d_geom, Mat2::zeros());
            assert_relative_eq!(
                MembraneLaw::MooneyRivlin.strain_energy(Stretches::reference(), alpha),
                0.0,
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn test_thickness_stretch() {
        let s = Stretches::new(2.0, 1.25);
        assert_relative_eq!(s.lambda3(), 0.4, epsilon = 1e-14);
    }

    #[test]
    fn test_stress_is_energy_gradient() {
        let law = MembraneLaw::MooneyRivlin;
        let alpha = 0.15;
        let h = 1e-6;

        for (l1, l2) in [(1.2, 0.9), (1.5, 1.3), (0.95, 1.1)] {
            let r = law.response(Stretches::new(l1, l2), alpha);
            let w = |a: f64, b: f64| law.strain_energy(Stretches::new(a, b), alpha);

            let dw1 = (w(l1 + h, l2) - w(l1 - h, l2)) / (2.0 * h);
            let dw2 = (w(l1, l2 + h) - w(l1, l2 - h)) / (2.0 * h);
            assert_relative_eq!(r.p1, dw1, epsilon = 1e-6, max_relative = 1e-6);
            assert_relative_eq!(r.p2, dw2, epsilon = 1e-6, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_material_tangent_is_stress_derivative() {
        let law = MembraneLaw::MooneyRivlin;
        let alpha = 0.2;
        let h = 1e-6;

        for (l1, l2) in [(1.1, 1.05), (1.4, 1.2), (0.9, 1.3)] {
            let r = law.response(Stretches::new(l1, l2), alpha);
            let p = |a: f64, b: f64| law.response(Stretches::new(a, b), alpha);

            let dp1_dl1 = (p(l1 + h, l2).p1 - p(l1 - h, l2).p1) / (2.0 * h);
            let dp1_dl2 = (p(l1, l2 + h).p1 - p(l1, l2 - h).p1) / (2.0 * h);
            let dp2_dl1 = (p(l1 + h, l2).p2 - p(l1 - h, l2).p2) / (2.0 * h);
            let dp2_dl2 = (p(l1, l2 + h).p2 - p(l1, l2 - h).p2) / (2.0 * h);

            assert_relative_eq!(r.d_mat[(0, 0)], dp1_dl1, epsilon = 1e-5, max_relative = 1e-6);
            assert_relative_eq!(r.d_mat[(0, 1)], dp1_dl2, epsilon = 1e-5, max_relative = 1e-6);
            assert_relative_eq!(r.d_mat[(1, 0)], dp2_dl1, epsilon = 1e-5, max_relative = 1e-6);
            assert_relative_eq!(r.d_mat[(1, 1)], dp2_dl2, epsilon = 1e-5, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_geometric_tangent() {
        let r = MembraneLaw::MooneyRivlin.response(Stretches::new(1.3, 1.1), 0.1);
        assert_relative_eq!(r.d_geom[(0, 0)], -r.p1 / 1.3, epsilon = 1e-14);
        assert_eq!(r.d_geom[(0, 1)], 0.0);
        assert_eq!(r.d_geom[(1, 1)], 0.0);
        assert_relative_eq!(r.tangent()[(0, 0)], r.d_mat[(0, 0)] + r.d_geom[(0, 0)], epsilon = 1e-14);
    }

    #[test]
    fn test_law_tags() {
        assert_eq!(
            "Mooney_Rivlin_Hyperelastic".parse::<MembraneLaw>().unwrap(),
            MembraneLaw::MooneyRivlin
        );
        assert_eq!(MembraneLaw::MooneyRivlin.tag(), "Mooney_Rivlin_Hyperelastic");
        assert!(matches!(
            "Neo_Hookean".parse::<MembraneLaw>(),
            Err(MembraneError::UnsupportedElementType(_))
        ));
    }
}
