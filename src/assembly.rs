//! Global assembly of mass, stiffness and force arrays
//!
//! Element arrays are scattered into equation space through the LM array. Rows
//! and columns of constrained freedoms have no equation number and are skipped,
//! which eliminates the essential boundary conditions without a separate
//! partitioning step.

use crate::elements::{ElementContext, ElementMatrices, MembraneElement};
use crate::math::{Mat, Vec as FEVec, Vec4};
use crate::mesh::numbering::{Dof, DOFS_PER_ELEMENT, DOFS_PER_NODE};
use crate::model::MembraneModel;

/// Global system arrays in equation space
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSystem {
    /// Mass matrix `M`
    pub mass: Mat,
    /// Tangent stiffness `K`, including the pressure load stiffness
    pub stiffness: Mat,
    /// Internal force `P`
    pub internal_force: FEVec,
    /// External pressure force `F`
    pub external_force: FEVec,
}

impl GlobalSystem {
    pub fn zeros(n_equations: usize) -> Self {
        Self {
            mass: Mat::zeros(n_equations, n_equations),
            stiffness: Mat::zeros(n_equations, n_equations),
            internal_force: FEVec::zeros(n_equations),
            external_force: FEVec::zeros(n_equations),
        }
    }

    pub fn n_equations(&self) -> usize {
        self.internal_force.len()
    }

    /// Out-of-balance force `F - P`
    pub fn static_residual(&self) -> FEVec {
        &self.external_force - &self.internal_force
    }

    /// Dynamic residual `M * inertia + P - F`
    pub fn dynamic_residual(&self, inertia: &FEVec) -> FEVec {
        &self.mass * inertia + &self.internal_force - &self.external_force
    }

    /// Scatter-add element arrays using the element's equation numbers
    fn scatter(&mut self, lm: &[Option<usize>; DOFS_PER_ELEMENT], element: &ElementMatrices) {
        for (i, eq_i) in lm.iter().enumerate() {
            let Some(p) = *eq_i else { continue };

            self.internal_force[p] += element.internal_force[i];
            self.external_force[p] += element.external_force[i];

            for (j, eq_j) in lm.iter().enumerate() {
                let Some(q) = *eq_j else { continue };
                self.mass[(p, q)] += element.mass[(i, j)];
                self.stiffness[(p, q)] += element.stiffness[(i, j)];
            }
        }
    }
}

/// Residual and Jacobian oracle for the nonlinear solvers
pub struct Assembler<'a> {
    model: &'a MembraneModel,
}

impl<'a> Assembler<'a> {
    pub fn new(model: &'a MembraneModel) -> Self {
        Self { model }
    }

    /// Local displacement `[ur_0, uz_0, ur_1, uz_1]` of element `e`.
    ///
    /// Constrained freedoms take their prescribed value, free freedoms are
    /// gathered from `d`.
    pub fn element_displacement(&self, e: usize, d: &FEVec) -> Vec4 {
        let numbering = self.model.numbering();
        let bc = self.model.boundary_conditions();
        let nodes = self.model.mesh().element_nodes(e);
        let lm = numbering.element_equations(e);

        let mut d_e = Vec4::zeros();
        for (a, &node) in nodes.iter().enumerate() {
            for dof in Dof::ALL {
                let i = a * DOFS_PER_NODE + dof.index();
                d_e[i] = match lm[i] {
                    Some(eq) => d[eq],
                    None => bc.prescribed(node, dof).unwrap_or(0.0),
                };
            }
        }
        d_e
    }

    /// Element arrays of element `e` at displacement `d` and the given pressure
    pub fn element_matrices(&self, e: usize, d: &FEVec, pressure: f64) -> ElementMatrices {
        let element: &MembraneElement = &self.model.elements()[e];
        let d_e = self.element_displacement(e, d);
        element.matrices(&d_e, &self.context(pressure))
    }

    /// Assemble `(M, K, P, F)` at displacement `d` and the given pressure
    pub fn assemble(&self, d: &FEVec, pressure: f64) -> GlobalSystem {
        let numbering = self.model.numbering();
        debug_assert_eq!(d.len(), numbering.n_equations());

        let ctx = self.context(pressure);
        let mut system = GlobalSystem::zeros(numbering.n_equations());

        for (e, element) in self.model.elements().iter().enumerate() {
            let d_e = self.element_displacement(e, d);
            let matrices = element.matrices(&d_e, &ctx);
            system.scatter(numbering.element_equations(e), &matrices);
        }

        system
    }

    fn context(&self, pressure: f64) -> ElementContext<'_> {
        ElementContext {
            law: self.model.law(),
            density: self.model.properties().density,
            pressure,
            pressure_load: self.model.pressure_policy(),
            rule: self.model.quadrature(),
        }
    }
}
