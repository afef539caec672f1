//! Gauss-Legendre quadrature on the reference interval `[-1, 1]`

/// Largest rule available from [`gauss`]
pub const MAX_GAUSS_POINTS: usize = 4;

/// Abscissae and weights of a one-dimensional quadrature rule
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule {
    /// Abscissae in ascending order
    pub points: Vec<f64>,
    /// Weights paired with `points`
    pub weights: Vec<f64>,
}

impl QuadratureRule {
    /// Number of quadrature points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over `(xi, weight)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().copied().zip(self.weights.iter().copied())
    }

    /// Integrate a function over `[-1, 1]`
    pub fn integrate(&self, f: impl Fn(f64) -> f64) -> f64 {
        self.iter().map(|(xi, w)| w * f(xi)).sum()
    }
}

/// Gauss rule with `num_points` points on `[-1, 1]`.
///
/// Integrates polynomials of degree up to `2 * num_points - 1` exactly.
///
/// # Panics
///
/// Panics unless `1 <= num_points <= MAX_GAUSS_POINTS`.
pub fn gauss(num_points: usize) -> QuadratureRule {
    let (points, weights) = match num_points {
        1 => (vec![0.0], vec![2.0]),
        2 => {
            let gp = 1.0 / 3.0_f64.sqrt(); // Gauss point location
            (vec![-gp, gp], vec![1.0, 1.0])
        }
        3 => {
            let gp = (3.0_f64 / 5.0).sqrt();
            (vec![-gp, 0.0, gp], vec![5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0])
        }
        4 => {
            let s = 2.0 / 7.0 * (6.0_f64 / 5.0).sqrt();
            let inner = (3.0 / 7.0 - s).sqrt();
            let outer = (3.0 / 7.0 + s).sqrt();
            let w_inner = (18.0 + 30.0_f64.sqrt()) / 36.0;
            let w_outer = (18.0 - 30.0_f64.sqrt()) / 36.0;
            (
                vec![-outer, -inner, inner, outer],
                vec![w_outer, w_inner, w_inner, w_outer],
            )
        }
        n => panic!("no {n}-point Gauss rule, expected 1 to {MAX_GAUSS_POINTS} points"),
    };

    QuadratureRule { points, weights }
}
