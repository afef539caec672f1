//! Quasi-static pressure ramp
//!
//! The pressure is raised from zero to the target in equal increments. Each
//! load step runs a full Newton-Raphson iteration on `K * du = F - P`, starting
//! from the converged displacement of the previous step.

use log::{debug, info, warn};

use super::{solve_increment, ProblemType, SolveOptions};
use crate::assembly::Assembler;
use crate::error::{MembraneError, MembraneResult};
use crate::math::Vec as FEVec;
use crate::model::MembraneModel;
use crate::results::{Solution, StepReport, StepStatus};

/// Number of load steps for a ramp to `pressure_load`.
///
/// At least `total_steps`, and enough that no increment exceeds
/// `pressure_increment`.
pub fn steady_step_count(pressure_load: f64, pressure_increment: f64, total_steps: usize) -> usize {
    let ramp = (pressure_load.abs() / pressure_increment).ceil() as usize + 1;
    ramp.max(total_steps)
}

/// Ramp the model's pressure from zero to its full value
pub fn solve(model: &MembraneModel, options: &SolveOptions) -> MembraneResult<Solution> {
    let pressure_load = model.properties().pressure_load;
    let n_steps = steady_step_count(pressure_load, options.pressure_increment, options.total_steps);
    info!(
        "steady solve: {} load steps to pressure {}, {} equations",
        n_steps,
        pressure_load,
        model.n_equations()
    );

    let assembler = Assembler::new(model);
    let mut d = model.initial_displacement();
    let mut displacement = Vec::with_capacity(n_steps + 1);
    let mut steps = Vec::with_capacity(n_steps);
    displacement.push(d.clone());

    for step in 1..=n_steps {
        let load_factor = step as f64 / n_steps as f64;
        let pressure = load_factor * pressure_load;

        let report = newton(&assembler, &mut d, pressure, step, options)?;
        steps.push(StepReport {
            time: load_factor,
            ..report
        });
        displacement.push(d.clone());
    }

    let not_converged = steps.iter().filter(|s| !s.is_converged()).count();
    info!(
        "steady solve finished: {} steps, {} not converged",
        n_steps, not_converged
    );

    Ok(Solution {
        problem_type: ProblemType::Steady,
        nodal_displacement: displacement.iter().map(|d| model.expand(d)).collect(),
        displacement,
        velocity: Vec::new(),
        acceleration: Vec::new(),
        steps,
    })
}

/// Newton-Raphson at fixed pressure, updating `d` in place.
///
/// Convergence is checked before each update, so an already balanced state
/// is accepted without a linear solve.
fn newton(
    assembler: &Assembler,
    d: &mut FEVec,
    pressure: f64,
    step: usize,
    options: &SolveOptions,
) -> MembraneResult<StepReport> {
    let mut iterations = 0;

    loop {
        let system = assembler.assemble(d, pressure);
        let residual = system.static_residual();
        let norm = residual.norm();

        if !norm.is_finite() {
            return Err(MembraneError::Diverged { step });
        }
        debug!(
            "step {} (p = {:.4}) iteration {}: |F - P| = {:.3e}",
            step, pressure, iterations, norm
        );

        let status = if norm < options.tolerance {
            Some(StepStatus::Converged)
        } else if iterations >= options.max_iterations {
            warn!(
                "step {} did not converge in {} iterations (|F - P| = {:.3e}), accepting iterate",
                step, iterations, norm
            );
            Some(StepStatus::NotConverged)
        } else {
            None
        };

        if let Some(status) = status {
            return Ok(StepReport {
                step,
                pressure,
                time: 0.0,
                iterations,
                residual_norm: norm,
                status,
            });
        }

        let delta = solve_increment(&system.stiffness, &residual, step, iterations)?;
        *d += delta;
        iterations += 1;
    }
}
