//! Uniform pressure on the membrane surface

use serde::{Deserialize, Serialize};

use crate::elements::ShapeSample;
use crate::math::{Mat4, Vec2, Vec4};

/// How the pressure direction is defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PressureLoad {
    /// Normal to the undeformed surface; the load does not depend on displacement
    Conservative,
    /// Normal to the deformed surface (follower load)
    #[default]
    Follower,
}

impl PressureLoad {
    /// Load vector density at a quadrature point, before the quadrature weight
    pub fn force(&self, s: &ShapeSample, pressure: f64) -> Vec4 {
        match self {
            PressureLoad::Conservative => {
                let normal = Vec2::new(-s.x_xi[1], s.x_xi[0]);
                s.na.transpose() * normal * (pressure * s.radius)
            }
            PressureLoad::Follower => {
                let normal = Vec2::new(-s.ue_xi[1], s.ue_xi[0]);
                s.na.transpose() * normal * (pressure * s.ue[0])
            }
        }
    }

    /// Load stiffness `-df/du` at a quadrature point, before the quadrature weight.
    ///
    /// Returns `None` when the load does not depend on the displacement.
    pub fn stiffness(&self, s: &ShapeSample, pressure: f64) -> Option<Mat4> {
        match self {
            PressureLoad::Conservative => None,
            PressureLoad::Follower => {
                let r = s.ue[0];
                let r_xi = s.ue_xi[0];
                let z_xi = s.ue_xi[1];

                let mut k = Mat4::zeros();
                for a in 0..2 {
                    for b in 0..2 {
                        let (na, nb, dnb) = (s.n(a), s.n(b), s.dn(b));
                        k[(2 * a, 2 * b)] = pressure * na * z_xi * nb;
                        k[(2 * a, 2 * b + 1)] = pressure * na * r * dnb;
                        k[(2 * a + 1, 2 * b)] = -pressure * (na * r * dnb + na * r_xi * nb);
                    }
                }
                Some(k)
            }
        }
    }
}
