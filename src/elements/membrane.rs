//! Two-node axisymmetric membrane element
//!
//! The element integrates over the parent domain `-1 <= xi <= 1`:
//!
//! ```text
//! int_e W(lambda_1, lambda_2) R dS = int_{-1}^{1} W(lambda_1, lambda_2) R(xi) M(xi) dxi
//! ```
//!
//! with `M = |dX/dxi|`. The first variation of `W` is `P1 dlambda_1 + P2 dlambda_2`,
//! which becomes `Ba^T [P1, P2]` in nodal freedoms; the second variation adds the
//! material term `Ba^T D_mat Ba` and the geometric terms coming from the
//! curvature of `lambda_1` in the nodal freedoms.

use serde::{Deserialize, Serialize};

use super::material::{MembraneLaw, Stretches};
use crate::loads::PressureLoad;
use crate::math::{Mat2x4, Mat4, QuadratureRule, Vec2, Vec4};

/// Kinematic quantities at one quadrature point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSample {
    /// Shape function matrix `Na` mapping `[ur_0, uz_0, ur_1, uz_1]` to `[r, z]`
    pub na: Mat2x4,
    /// Parametric derivative `dNa / dxi`
    pub na_xi: Mat2x4,
    /// Stretch sensitivities, rows `dlambda_1 / du` and `dlambda_2 / du`
    pub ba: Mat2x4,
    /// Deformed position
    pub ue: Vec2,
    /// Deformed tangent `due / dxi`
    pub ue_xi: Vec2,
    /// Reference tangent `dX / dxi`
    pub x_xi: Vec2,
    /// Reference radius `R`
    pub radius: f64,
    /// Reference Jacobian `M = |dX / dxi|`
    pub jacobian: f64,
    /// Meridional and circumferential stretches
    pub stretches: Stretches,
}

impl ShapeSample {
    /// Value of node `a`'s shape function
    pub fn n(&self, a: usize) -> f64 {
        self.na[(0, 2 * a)]
    }

    /// Parametric derivative of node `a`'s shape function
    pub fn dn(&self, a: usize) -> f64 {
        self.na_xi[(0, 2 * a)]
    }
}

/// Linear shape functions `Na` and `dNa / dxi` at `xi`
pub fn shape_functions(xi: f64) -> (Mat2x4, Mat2x4) {
    let h0 = 0.5 * (1.0 - xi);
    let h1 = 0.5 * (1.0 + xi);

    #[rustfmt::skip]
    let na = Mat2x4::new(
        h0, 0.0, h1, 0.0,
        0.0, h0, 0.0, h1,
    );
    #[rustfmt::skip]
    let na_xi = Mat2x4::new(
        -0.5, 0.0, 0.5, 0.0,
        0.0, -0.5, 0.0, 0.5,
    );

    (na, na_xi)
}

/// Evaluate the element kinematics at `xi`.
///
/// `x0` holds the reference nodal coordinates `[R0, Z0, R1, Z1]` and `d_e` the
/// nodal displacements `[ur_0, uz_0, ur_1, uz_1]`.
pub fn sample_shape_functions(xi: f64, x0: &Vec4, d_e: &Vec4) -> ShapeSample {
    let (na, na_xi) = shape_functions(xi);

    let radius = (na * x0)[0];
    let x_xi = na_xi * x0;
    let jacobian = x_xi.norm();

    let current = x0 + d_e;
    let ue = na * current;
    let ue_xi = na_xi * current;

    let lambda1 = ue_xi.norm() / jacobian;
    let lambda2 = ue[0] / radius;

    let c = 1.0 / (lambda1 * jacobian * jacobian);
    let mut ba = Mat2x4::zeros();
    for j in 0..4 {
        ba[(0, j)] = c * (ue_xi[0] * na_xi[(0, j)] + ue_xi[1] * na_xi[(1, j)]);
        ba[(1, j)] = na[(0, j)] / radius;
    }

    ShapeSample {
        na,
        na_xi,
        ba,
        ue,
        ue_xi,
        x_xi,
        radius,
        jacobian,
        stretches: Stretches::new(lambda1, lambda2),
    }
}

/// Material and load data shared by every element during one assembly
#[derive(Debug, Clone, Copy)]
pub struct ElementContext<'a> {
    pub law: MembraneLaw,
    pub density: f64,
    /// Current pressure magnitude
    pub pressure: f64,
    pub pressure_load: PressureLoad,
    pub rule: &'a QuadratureRule,
}

/// Element mass, stiffness and force contributions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementMatrices {
    /// `m_e`
    pub mass: Mat4,
    /// `k_e`, including the pressure load stiffness
    pub stiffness: Mat4,
    /// `p_e`
    pub internal_force: Vec4,
    /// `f_e`
    pub external_force: Vec4,
}

impl ElementMatrices {
    pub fn zeros() -> Self {
        Self {
            mass: Mat4::zeros(),
            stiffness: Mat4::zeros(),
            internal_force: Vec4::zeros(),
            external_force: Vec4::zeros(),
        }
    }
}

/// A 2-node membrane element with its material parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MembraneElement {
    /// Global node ids
    pub nodes: [usize; 2],
    /// Reference coordinates `[R0, Z0, R1, Z1]`
    pub x0: Vec4,
    /// Mooney-Rivlin parameter
    pub alpha: f64,
}

impl MembraneElement {
    pub fn new(nodes: [usize; 2], x0: Vec4, alpha: f64) -> Self {
        Self { nodes, x0, alpha }
    }

    /// Kinematics at `xi` for element displacements `d_e`
    pub fn sample(&self, xi: f64, d_e: &Vec4) -> ShapeSample {
        sample_shape_functions(xi, &self.x0, d_e)
    }

    /// Integrate the element contributions for element displacements `d_e`
    pub fn matrices(&self, d_e: &Vec4, ctx: &ElementContext) -> ElementMatrices {
        let mut out = ElementMatrices::zeros();

        for (xi, w) in ctx.rule.iter() {
            let s = self.sample(xi, d_e);
            let response = ctx.law.response(s.stretches, self.alpha);
            let lambda1 = s.stretches.lambda1;
            let rmw = s.radius * s.jacobian * w;

            out.mass += s.na.transpose() * s.na * (ctx.density * rmw);
            out.internal_force += s.ba.transpose() * response.stress() * rmw;

            let material = s.ba.transpose() * response.tangent() * s.ba;
            let geometric = s.na_xi.transpose() * s.na_xi
                * (response.p1 / (lambda1 * s.jacobian * s.jacobian));
            out.stiffness += (material + geometric) * rmw;

            out.external_force += ctx.pressure_load.force(&s, ctx.pressure) * w;
            if let Some(k_press) = ctx.pressure_load.stiffness(&s, ctx.pressure) {
                out.stiffness += k_press * w;
            }
        }

        out
    }
}
