//! Mathematical utilities for membrane FEA calculations

pub mod quadrature;

use nalgebra::{DMatrix, DVector, Matrix2, Matrix2x4, Matrix4, Vector2, Vector4};

pub use quadrature::{gauss, QuadratureRule};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat2 = Matrix2<f64>;
pub type Vec2 = Vector2<f64>;

/// 4x4 matrix for element quantities (2 nodes x 2 DOFs)
pub type Mat4 = Matrix4<f64>;
/// 4-element vector for element forces/displacements
pub type Vec4 = Vector4<f64>;
/// 2x4 matrix for shape functions and stretch sensitivities
pub type Mat2x4 = Matrix2x4<f64>;

/// Solve a linear system using LU decomposition
///
/// Returns `None` when the matrix is singular or the solution is not finite.
pub fn solve_linear_system(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone()
        .lu()
        .solve(b)
        .filter(|x| x.iter().all(|value| value.is_finite()))
}

/// Check whether a square matrix is symmetric within an absolute tolerance
pub fn is_symmetric(a: &Mat, tol: f64) -> bool {
    if a.nrows() != a.ncols() {
        return false;
    }
    (0..a.nrows()).all(|i| (0..i).all(|j| (a[(i, j)] - a[(j, i)]).abs() <= tol))
}
