//! Membrane Solver - nonlinear finite elements for axisymmetric membranes
//!
//! This library inflates incompressible hyperelastic membranes of revolution
//! under pressure, supporting:
//! - 2-node axisymmetric membrane elements with 3-point Gauss quadrature
//! - Mooney-Rivlin strain energy `W = (I1 - 3) + alpha (I2 - 3)`
//! - Follower and conservative pressure loads
//! - Steady solves by Newton-Raphson over a pressure ramp
//! - Unsteady solves by generalized-alpha implicit time integration
//!
//! ## Example
//! ```rust
//! use membrane_solver::prelude::*;
//!
//! let mesh = Mesh::line([0.2, 0.2], [1.0, 0.0], 50).unwrap();
//! let properties = MembraneProperties {
//!     end_displacement_r: 0.0,
//!     density: 1.0,
//!     alpha: (0..50).map(|e| if e < 25 { 0.1 } else { 0.2 }).collect(),
//!     pressure_load: 1.0,
//! };
//! let model = MembraneModel::new(MembraneLaw::MooneyRivlin, mesh, properties).unwrap();
//!
//! // Fine pressure ramps stay on one equilibrium branch
//! let solution = model.solve(&SolveOptions::steady(500)).unwrap();
//! assert!(solution.all_converged());
//! let top = solution.final_nodal_displacement().unwrap()[0];
//! assert!(top.uz > 0.0);
//! ```

pub mod analysis;
pub mod assembly;
pub mod config;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod mesh;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{DynamicState, GeneralizedAlpha, ProblemType, SolveOptions};
    pub use crate::assembly::{Assembler, GlobalSystem};
    pub use crate::config::{LineMesh, ModelConfig};
    pub use crate::elements::{MembraneElement, MembraneLaw, Stretches};
    pub use crate::error::{MembraneError, MembraneResult};
    pub use crate::loads::PressureLoad;
    pub use crate::mesh::{Dof, EquationNumbering, EssentialBc, Mesh};
    pub use crate::model::{MembraneModel, MembraneProperties};
    pub use crate::results::{NodeDisplacement, Solution, SolveSummary, StepReport, StepStatus};
}
