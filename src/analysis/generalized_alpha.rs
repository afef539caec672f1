//! Generalized-alpha implicit dynamics
//!
//! Chung-Hulbert generalized-alpha scheme written in terms of the end-of-step
//! acceleration `an`. Equilibrium is enforced at the interpolated instant
//!
//! ```text
//! M a_{1-alpha_m} + P(d_{1-alpha_f}) - F(d_{1-alpha_f}) = 0
//! ```
//!
//! and solved for `an` with a damped Newton iteration. The spectral radius
//! `rho` in `[0, 1]` sets the high-frequency dissipation; `rho = 0` annihilates
//! the highest modes in one step.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{solve_increment, ProblemType, SolveOptions};
use crate::assembly::Assembler;
use crate::error::{MembraneError, MembraneResult};
use crate::math::{Mat, Vec as FEVec};
use crate::model::MembraneModel;
use crate::results::{Solution, StepReport, StepStatus};

/// Smallest damping factor applied to a Newton update
const MIN_ETA: f64 = 1.0 / 1024.0;

/// Integration parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneralizedAlpha {
    pub alpha_m: f64,
    pub alpha_f: f64,
    pub beta2: f64,
    pub gamma: f64,
}

impl GeneralizedAlpha {
    /// Second-order accurate parameters for spectral radius `rho`
    pub fn from_spectral_radius(rho: f64) -> Self {
        let alpha_m = (2.0 * rho - 1.0) / (1.0 + rho);
        let alpha_f = rho / (1.0 + rho);
        Self {
            alpha_m,
            alpha_f,
            beta2: 0.5 * (1.0 - alpha_m + alpha_f).powi(2),
            gamma: 0.5 - alpha_m + alpha_f,
        }
    }

    /// End-of-step displacement for acceleration `an`
    pub fn displacement(&self, state: &DynamicState, an: &FEVec, dt: f64) -> FEVec {
        let accel = &state.a * (1.0 - self.beta2) + an * self.beta2;
        &state.d + &state.v * dt + accel * (0.5 * dt * dt)
    }

    /// End-of-step velocity for acceleration `an`
    pub fn velocity(&self, state: &DynamicState, an: &FEVec, dt: f64) -> FEVec {
        let accel = &state.a * (1.0 - self.gamma) + an * self.gamma;
        &state.v + accel * dt
    }

    /// Displacement at the `1 - alpha_f` instant
    pub fn mid_displacement(&self, state: &DynamicState, an: &FEVec, dt: f64) -> FEVec {
        self.displacement(state, an, dt) * (1.0 - self.alpha_f) + &state.d * self.alpha_f
    }

    /// Velocity at the `1 - alpha_f` instant.
    ///
    /// The membrane residual has no velocity-dependent forces, so the time
    /// loop never evaluates this; it completes the interpolation for callers
    /// that add damping terms to the residual.
    pub fn mid_velocity(&self, state: &DynamicState, an: &FEVec, dt: f64) -> FEVec {
        self.velocity(state, an, dt) * (1.0 - self.alpha_f) + &state.v * self.alpha_f
    }

    /// Acceleration at the `1 - alpha_m` instant
    pub fn mid_acceleration(&self, state: &DynamicState, an: &FEVec) -> FEVec {
        an * (1.0 - self.alpha_m) + &state.a * self.alpha_m
    }

    /// Jacobian of the dynamic residual with respect to `an`
    pub fn effective_matrix(&self, mass: &Mat, stiffness: &Mat, dt: f64) -> Mat {
        mass * (1.0 - self.alpha_m) + stiffness * ((1.0 - self.alpha_f) * 0.5 * self.beta2 * dt * dt)
    }

    /// State at the end of the step
    pub fn finalize(&self, state: &DynamicState, an: FEVec, dt: f64) -> DynamicState {
        DynamicState {
            d: self.displacement(state, &an, dt),
            v: self.velocity(state, &an, dt),
            a: an,
        }
    }
}

impl Default for GeneralizedAlpha {
    fn default() -> Self {
        Self::from_spectral_radius(0.0)
    }
}

/// Equation-space displacement, velocity and acceleration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicState {
    pub d: FEVec,
    pub v: FEVec,
    pub a: FEVec,
}

impl DynamicState {
    /// State at rest in displacement `d`
    pub fn at_rest(d: FEVec) -> Self {
        let n = d.len();
        Self {
            d,
            v: FEVec::zeros(n),
            a: FEVec::zeros(n),
        }
    }
}

/// Step-length control for the acceleration Newton iteration.
///
/// An update whose scaled norm would exceed the previous update norm is
/// halved until it does not (down to `MIN_ETA`); after every update the
/// factor relaxes back toward 1.
#[derive(Debug, Clone)]
struct StepDamping {
    eta: f64,
    previous_norm: Option<f64>,
}

impl StepDamping {
    fn new() -> Self {
        Self {
            eta: 1.0,
            previous_norm: None,
        }
    }

    /// Damping factor for an update of norm `norm`
    fn scale(&mut self, norm: f64) -> f64 {
        if let Some(previous) = self.previous_norm {
            while self.eta * norm > previous && self.eta > MIN_ETA {
                self.eta *= 0.5;
            }
        }
        let eta = self.eta;
        self.previous_norm = Some(norm);
        self.eta = (2.0 * eta).min(1.0);
        eta
    }
}

/// Integrate from rest at the model's initial displacement under constant pressure
pub fn solve(model: &MembraneModel, options: &SolveOptions) -> MembraneResult<Solution> {
    let scheme = GeneralizedAlpha::from_spectral_radius(options.spectral_radius);
    let dt = options.time_step();
    let pressure = model.properties().pressure_load;
    info!(
        "unsteady solve: {} steps of dt = {}, pressure {}, rho = {}",
        options.total_steps, dt, pressure, options.spectral_radius
    );

    let assembler = Assembler::new(model);
    let mut state = DynamicState::at_rest(model.initial_displacement());

    let n = options.total_steps;
    let mut displacement = Vec::with_capacity(n + 1);
    let mut velocity = Vec::with_capacity(n + 1);
    let mut acceleration = Vec::with_capacity(n + 1);
    let mut steps = Vec::with_capacity(n);
    displacement.push(state.d.clone());
    velocity.push(state.v.clone());
    acceleration.push(state.a.clone());

    for step in 1..=n {
        let (next, report) = advance(&assembler, &scheme, &state, pressure, dt, step, options)?;
        state = next;
        steps.push(StepReport {
            time: step as f64 * dt,
            ..report
        });
        displacement.push(state.d.clone());
        velocity.push(state.v.clone());
        acceleration.push(state.a.clone());
    }

    let not_converged = steps.iter().filter(|s| !s.is_converged()).count();
    info!(
        "unsteady solve finished: {} steps, {} not converged",
        n, not_converged
    );

    Ok(Solution {
        problem_type: ProblemType::Unsteady,
        nodal_displacement: displacement.iter().map(|d| model.expand(d)).collect(),
        displacement,
        velocity,
        acceleration,
        steps,
    })
}

/// One time step: solve for the end-of-step acceleration, then update `d` and `v`
fn advance(
    assembler: &Assembler,
    scheme: &GeneralizedAlpha,
    state: &DynamicState,
    pressure: f64,
    dt: f64,
    step: usize,
    options: &SolveOptions,
) -> MembraneResult<(DynamicState, StepReport)> {
    let mut an = state.a.clone();
    let mut damping = StepDamping::new();
    let mut initial_norm = None;
    let mut iterations = 0;

    let (status, norm) = loop {
        let dn = scheme.mid_displacement(state, &an, dt);
        let system = assembler.assemble(&dn, pressure);
        let residual = system.dynamic_residual(&scheme.mid_acceleration(state, &an));
        let norm = residual.norm();

        if !norm.is_finite() {
            return Err(MembraneError::Diverged { step });
        }
        let norm0 = *initial_norm.get_or_insert(norm);
        debug!("step {} iteration {}: |res| = {:.3e}", step, iterations, norm);

        if norm < options.tolerance || norm < options.tolerance * norm0 {
            break (StepStatus::Converged, norm);
        }
        if iterations >= options.max_iterations {
            warn!(
                "step {} did not converge in {} iterations (|res| = {:.3e}), accepting iterate",
                step, iterations, norm
            );
            break (StepStatus::NotConverged, norm);
        }

        let a_eff = scheme.effective_matrix(&system.mass, &system.stiffness, dt);
        let delta = solve_increment(&a_eff, &residual, step, iterations)?;
        let eta = damping.scale(delta.norm());
        if eta < 1.0 {
            debug!("step {} iteration {}: damped update, eta = {}", step, iterations, eta);
        }
        an.axpy(-eta, &delta, 1.0);
        iterations += 1;
    };

    let report = StepReport {
        step,
        pressure,
        time: 0.0,
        iterations,
        residual_norm: norm,
        status,
    };
    Ok((scheme.finalize(state, an, dt), report))
}
