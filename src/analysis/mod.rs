//! Analysis types and options

pub mod generalized_alpha;
pub mod steady;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MembraneError, MembraneResult};
use crate::math::{self, Mat, Vec as FEVec};

pub use generalized_alpha::{DynamicState, GeneralizedAlpha};
pub use steady::steady_step_count;

/// Type of membrane analysis to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProblemType {
    /// Quasi-static pressure ramp
    #[default]
    Steady,
    /// Implicit dynamics at constant pressure
    Unsteady,
}

impl ProblemType {
    pub fn tag(&self) -> &'static str {
        match self {
            ProblemType::Steady => "Steady",
            ProblemType::Unsteady => "Unsteady",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ProblemType {
    type Err = MembraneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Steady" => Ok(ProblemType::Steady),
            "Unsteady" => Ok(ProblemType::Unsteady),
            other => Err(MembraneError::UnsupportedProblemType(other.to_string())),
        }
    }
}

/// Options for a membrane solve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Type of analysis
    pub problem_type: ProblemType,
    /// Number of load steps (steady) or time steps (unsteady)
    pub total_steps: usize,
    /// Physical duration of an unsteady solve
    pub total_time: f64,
    /// Largest pressure increment allowed between steady load steps
    pub pressure_increment: f64,
    /// Spectral radius at infinite frequency for generalized-alpha
    pub spectral_radius: f64,
    /// Maximum Newton updates per step
    pub max_iterations: usize,
    /// Residual norm tolerance
    pub tolerance: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            problem_type: ProblemType::Steady,
            total_steps: 1,
            total_time: 1.0,
            pressure_increment: 0.05,
            spectral_radius: 0.0,
            max_iterations: 100,
            tolerance: 1e-8,
        }
    }
}

impl SolveOptions {
    /// Create options for a steady pressure ramp
    pub fn steady(total_steps: usize) -> Self {
        Self {
            total_steps,
            ..Self::default()
        }
    }

    /// Create options for an unsteady solve over `total_time`
    pub fn unsteady(total_steps: usize, total_time: f64) -> Self {
        Self {
            problem_type: ProblemType::Unsteady,
            total_steps,
            total_time,
            max_iterations: 10,
            ..Self::default()
        }
    }

    /// Create options from a problem type tag (`"Steady"` or `"Unsteady"`)
    pub fn from_tag(tag: &str, total_steps: usize, total_time: f64) -> MembraneResult<Self> {
        match tag.parse::<ProblemType>()? {
            ProblemType::Steady => Ok(Self::steady(total_steps)),
            ProblemType::Unsteady => Ok(Self::unsteady(total_steps, total_time)),
        }
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Set the generalized-alpha spectral radius
    pub fn with_spectral_radius(mut self, rho: f64) -> Self {
        self.spectral_radius = rho;
        self
    }

    /// Set the largest steady pressure increment
    pub fn with_pressure_increment(mut self, increment: f64) -> Self {
        self.pressure_increment = increment;
        self
    }

    /// Time step size of an unsteady solve
    pub fn time_step(&self) -> f64 {
        self.total_time / self.total_steps as f64
    }

    pub fn validate(&self) -> MembraneResult<()> {
        if self.total_steps == 0 {
            return Err(MembraneError::InvalidInput(
                "Total step count must be positive".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(MembraneError::InvalidInput(
                "Maximum iteration count must be positive".to_string(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(MembraneError::InvalidInput(format!(
                "Tolerance must be positive, got {}",
                self.tolerance
            )));
        }

        match self.problem_type {
            ProblemType::Steady => {
                if !(self.pressure_increment.is_finite() && self.pressure_increment > 0.0) {
                    return Err(MembraneError::InvalidInput(format!(
                        "Pressure increment must be positive, got {}",
                        self.pressure_increment
                    )));
                }
            }
            ProblemType::Unsteady => {
                if !(self.total_time.is_finite() && self.total_time > 0.0) {
                    return Err(MembraneError::InvalidInput(format!(
                        "Total time must be positive, got {}",
                        self.total_time
                    )));
                }
                if !(0.0..=1.0).contains(&self.spectral_radius) {
                    return Err(MembraneError::InvalidInput(format!(
                        "Spectral radius must lie in [0, 1], got {}",
                        self.spectral_radius
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Solve a Newton system, mapping a failed factorization to `SingularMatrix`
pub(crate) fn solve_increment(
    a: &Mat,
    b: &FEVec,
    step: usize,
    iteration: usize,
) -> MembraneResult<FEVec> {
    math::solve_linear_system(a, b).ok_or(MembraneError::SingularMatrix { step, iteration })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_problem_type_tags() {
        assert_eq!("Steady".parse::<ProblemType>().unwrap(), ProblemType::Steady);
        assert_eq!("Unsteady".parse::<ProblemType>().unwrap(), ProblemType::Unsteady);
        assert!(matches!(
            "Transient".parse::<ProblemType>(),
            Err(MembraneError::UnsupportedProblemType(_))
        ));
        assert_eq!(ProblemType::Unsteady.to_string(), "Unsteady");
    }

    #[test]
    fn test_default_iteration_caps() {
        let steady = SolveOptions::steady(20);
        assert_eq!(steady.problem_type, ProblemType::Steady);
        assert_eq!(steady.max_iterations, 100);
        assert_relative_eq!(steady.pressure_increment, 0.05);

        let unsteady = SolveOptions::unsteady(100, 5.0);
        assert_eq!(unsteady.problem_type, ProblemType::Unsteady);
        assert_eq!(unsteady.max_iterations, 10);
        assert_relative_eq!(unsteady.time_step(), 0.05);
        assert_relative_eq!(unsteady.spectral_radius, 0.0);
        assert_relative_eq!(unsteady.tolerance, 1e-8);
    }

    #[test]
    fn test_from_tag() {
        let opts = SolveOptions::from_tag("Unsteady", 10, 2.0).unwrap();
        assert_eq!(opts.problem_type, ProblemType::Unsteady);
        assert!(SolveOptions::from_tag("Modal", 10, 2.0).is_err());
    }

    #[test]
    fn test_builders() {
        let opts = SolveOptions::unsteady(4, 1.0)
            .with_max_iter(25)
            .with_tolerance(1e-6)
            .with_spectral_radius(0.5)
            .with_pressure_increment(0.1);

        assert_eq!(opts.max_iterations, 25);
        assert_relative_eq!(opts.tolerance, 1e-6);
        assert_relative_eq!(opts.spectral_radius, 0.5);
        assert_relative_eq!(opts.pressure_increment, 0.1);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_options() {
        assert!(SolveOptions::steady(0).validate().is_err());
        assert!(SolveOptions::steady(5).with_tolerance(0.0).validate().is_err());
        assert!(SolveOptions::steady(5).with_max_iter(0).validate().is_err());
        assert!(SolveOptions::steady(5).with_pressure_increment(-1.0).validate().is_err());
        assert!(SolveOptions::unsteady(5, 0.0).validate().is_err());
        assert!(SolveOptions::unsteady(5, 1.0).with_spectral_radius(1.5).validate().is_err());
    }
}
