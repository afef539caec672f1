//! Result types for membrane analysis

use serde::{Deserialize, Serialize};

use crate::analysis::ProblemType;
use crate::math::Vec as FEVec;

/// Displacement results at a node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Radial displacement
    pub ur: f64,
    /// Axial displacement
    pub uz: f64,
}

impl NodeDisplacement {
    /// Create from array [UR, UZ]
    pub fn from_array(arr: [f64; 2]) -> Self {
        Self {
            ur: arr[0],
            uz: arr[1],
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.ur.hypot(self.uz)
    }
}

/// Outcome of the Newton iteration of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Converged,
    /// Iteration cap reached; the last iterate was accepted
    NotConverged,
}

/// Newton statistics of one load or time step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Step number, starting at 1
    pub step: usize,
    /// Pressure held during the step
    pub pressure: f64,
    /// Physical time at the end of the step (load factor for steady solves)
    pub time: f64,
    /// Newton updates applied
    pub iterations: usize,
    /// Residual norm of the accepted iterate
    pub residual_norm: f64,
    pub status: StepStatus,
}

impl StepReport {
    pub fn is_converged(&self) -> bool {
        self.status == StepStatus::Converged
    }
}

/// Full history of a solve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub problem_type: ProblemType,
    /// Equation-space displacement, one entry per step plus the initial state
    pub displacement: Vec<FEVec>,
    /// Equation-space velocity (unsteady only)
    pub velocity: Vec<FEVec>,
    /// Equation-space acceleration (unsteady only)
    pub acceleration: Vec<FEVec>,
    /// Per-node displacement, boundary values included, one entry per history entry
    pub nodal_displacement: Vec<Vec<NodeDisplacement>>,
    /// One report per step
    pub steps: Vec<StepReport>,
}

impl Solution {
    /// Number of steps taken
    pub fn n_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn final_displacement(&self) -> Option<&FEVec> {
        self.displacement.last()
    }

    pub fn final_nodal_displacement(&self) -> Option<&[NodeDisplacement]> {
        self.nodal_displacement.last().map(Vec::as_slice)
    }

    /// True when every step converged
    pub fn all_converged(&self) -> bool {
        self.steps.iter().all(StepReport::is_converged)
    }

    /// Node with the largest final displacement and its magnitude
    pub fn max_displacement(&self) -> Option<(usize, f64)> {
        self.final_nodal_displacement()?
            .iter()
            .map(NodeDisplacement::magnitude)
            .enumerate()
            .fold(None, |best, (node, mag)| match best {
                Some((_, m)) if m >= mag => best,
                _ => Some((node, mag)),
            })
    }

    pub fn summary(&self) -> SolveSummary {
        let (max_disp_node, max_displacement) = self.max_displacement().unwrap_or((0, 0.0));
        let last = self.steps.last();

        SolveSummary {
            problem_type: self.problem_type,
            num_nodes: self.final_nodal_displacement().map_or(0, <[_]>::len),
            free_dofs: self.final_displacement().map_or(0, |d| d.len()),
            num_steps: self.n_steps(),
            non_converged_steps: self.steps.iter().filter(|s| !s.is_converged()).count(),
            max_displacement,
            max_disp_node,
            final_pressure: last.map_or(0.0, |s| s.pressure),
            final_residual: last.map_or(0.0, |s| s.residual_norm),
        }
    }
}

/// Summary of solve results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveSummary {
    pub problem_type: ProblemType,
    /// Total number of nodes
    pub num_nodes: usize,
    /// Free DOFs (unknown)
    pub free_dofs: usize,
    pub num_steps: usize,
    /// Steps accepted without meeting the tolerance
    pub non_converged_steps: usize,
    /// Maximum final displacement magnitude
    pub max_displacement: f64,
    /// Node with maximum displacement
    pub max_disp_node: usize,
    pub final_pressure: f64,
    pub final_residual: f64,
}
