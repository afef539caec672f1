//! Membrane model - mesh, material, boundary conditions and solve entry point

use log::info;
use serde::{Deserialize, Serialize};

use crate::analysis::{generalized_alpha, steady, ProblemType, SolveOptions};
use crate::assembly::{Assembler, GlobalSystem};
use crate::elements::{MembraneElement, MembraneLaw};
use crate::error::{MembraneError, MembraneResult};
use crate::loads::PressureLoad;
use crate::math::{gauss, QuadratureRule, Vec as FEVec};
use crate::mesh::{Dof, EquationNumbering, EssentialBc, Mesh};
use crate::results::{NodeDisplacement, Solution};

/// Quadrature points per element
const QUADRATURE_POINTS: usize = 3;

/// Material, load and boundary data of a membrane problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembraneProperties {
    /// Prescribed radial displacement of the right boundary node
    pub end_displacement_r: f64,
    /// Mass per unit reference area
    pub density: f64,
    /// Mooney-Rivlin parameter of each element
    pub alpha: Vec<f64>,
    /// Target pressure
    pub pressure_load: f64,
}

/// An axisymmetric membrane model.
///
/// Immutable once built; solvers borrow it and thread their own state.
#[derive(Debug, Clone)]
pub struct MembraneModel {
    law: MembraneLaw,
    mesh: Mesh,
    bc: EssentialBc,
    numbering: EquationNumbering,
    elements: Vec<MembraneElement>,
    properties: MembraneProperties,
    pressure_policy: PressureLoad,
    rule: QuadratureRule,
}

impl MembraneModel {
    /// Build boundary conditions, equation numbering and elements for `mesh`
    pub fn new(law: MembraneLaw, mesh: Mesh, properties: MembraneProperties) -> MembraneResult<Self> {
        if properties.alpha.len() != mesh.n_elements() {
            return Err(MembraneError::InvalidInput(format!(
                "Expected {} element alpha values, got {}",
                mesh.n_elements(),
                properties.alpha.len()
            )));
        }
        if let Some(e) = properties.alpha.iter().position(|a| !a.is_finite()) {
            return Err(MembraneError::InvalidInput(format!(
                "Element {} has non-finite alpha",
                e
            )));
        }
        if !(properties.density.is_finite() && properties.density > 0.0) {
            return Err(MembraneError::InvalidInput(format!(
                "Density must be positive, got {}",
                properties.density
            )));
        }
        if !properties.pressure_load.is_finite() || !properties.end_displacement_r.is_finite() {
            return Err(MembraneError::InvalidInput(
                "Pressure and end displacement must be finite".to_string(),
            ));
        }

        let bc = EssentialBc::membrane_ends(mesh.n_nodes(), properties.end_displacement_r);
        let numbering = EquationNumbering::new(&mesh, &bc);
        let elements = (0..mesh.n_elements())
            .map(|e| MembraneElement::new(mesh.element_nodes(e), mesh.element_coords(e), properties.alpha[e]))
            .collect();

        info!(
            "membrane model: {} nodes, {} elements, {} equations",
            mesh.n_nodes(),
            mesh.n_elements(),
            numbering.n_equations()
        );

        Ok(Self {
            law,
            mesh,
            bc,
            numbering,
            elements,
            properties,
            pressure_policy: PressureLoad::default(),
            rule: gauss(QUADRATURE_POINTS),
        })
    }

    /// Choose how the pressure direction follows the deformation
    pub fn with_pressure_load(mut self, policy: PressureLoad) -> Self {
        self.pressure_policy = policy;
        self
    }

    pub fn law(&self) -> MembraneLaw {
        self.law
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn boundary_conditions(&self) -> &EssentialBc {
        &self.bc
    }

    pub fn numbering(&self) -> &EquationNumbering {
        &self.numbering
    }

    pub fn elements(&self) -> &[MembraneElement] {
        &self.elements
    }

    pub fn properties(&self) -> &MembraneProperties {
        &self.properties
    }

    pub fn pressure_policy(&self) -> PressureLoad {
        self.pressure_policy
    }

    pub fn quadrature(&self) -> &QuadratureRule {
        &self.rule
    }

    pub fn n_equations(&self) -> usize {
        self.numbering.n_equations()
    }

    /// Assemble the global arrays at displacement `d` and the given pressure
    pub fn assemble(&self, d: &FEVec, pressure: f64) -> GlobalSystem {
        Assembler::new(self).assemble(d, pressure)
    }

    /// Starting guess: free radial freedoms on the straight line from the left
    /// boundary value (0) to the right boundary value, all others zero
    pub fn initial_displacement(&self) -> FEVec {
        let mut d = FEVec::zeros(self.n_equations());
        let end = self.properties.end_displacement_r;
        if end == 0.0 {
            return d;
        }

        let (x_l, x_r) = self.mesh.radial_extent();
        let last = self.mesh.right_node() as f64;
        for (node, coord) in self.mesh.coords().iter().enumerate() {
            if let Some(eq) = self.numbering.equation(node, Dof::Radial) {
                let t = if (x_r - x_l).abs() > f64::EPSILON {
                    (coord[0] - x_l) / (x_r - x_l)
                } else {
                    node as f64 / last
                };
                d[eq] = t * end;
            }
        }
        d
    }

    /// Per-node displacement, boundary values included
    pub fn expand(&self, d: &FEVec) -> Vec<NodeDisplacement> {
        self.numbering
            .expand(&self.bc, d)
            .into_iter()
            .map(NodeDisplacement::from_array)
            .collect()
    }

    /// Deformed nodal positions `X + u`
    pub fn deformed_coordinates(&self, u: &[NodeDisplacement]) -> Vec<[f64; 2]> {
        self.mesh
            .coords()
            .iter()
            .zip(u)
            .map(|(x, u)| [x[0] + u.ur, x[1] + u.uz])
            .collect()
    }

    /// Run the analysis described by `options`
    pub fn solve(&self, options: &SolveOptions) -> MembraneResult<Solution> {
        options.validate()?;

        match options.problem_type {
            ProblemType::Steady => steady::solve(self, options),
            ProblemType::Unsteady => generalized_alpha::solve(self, options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn properties(n_elements: usize, pressure: f64, end_disp: f64) -> MembraneProperties {
        MembraneProperties {
            end_displacement_r: end_disp,
            density: 1.0,
            alpha: vec![0.1; n_elements],
            pressure_load: pressure,
        }
    }

    fn model(n_elements: usize, pressure: f64, end_disp: f64) -> MembraneModel {
        let mesh = Mesh::line([0.2, 0.2], [1.0, 0.0], n_elements).unwrap();
        MembraneModel::new(MembraneLaw::MooneyRivlin, mesh, properties(n_elements, pressure, end_disp)).unwrap()
    }

    #[test]
    fn test_model_construction() {
        let m = model(6, 0.5, 0.0);
        assert_eq!(m.elements().len(), 6);
        assert_eq!(m.n_equations(), 2 * 7 - 3);
        assert_eq!(m.quadrature().len(), 3);
        assert_eq!(m.pressure_policy(), PressureLoad::Follower);
        assert_relative_eq!(m.elements()[2].x0, m.mesh().element_coords(2));

        let m = m.with_pressure_load(PressureLoad::Conservative);
        assert_eq!(m.pressure_policy(), PressureLoad::Conservative);
    }

    #[test]
    fn test_rejects_inconsistent_properties() {
        let mesh = Mesh::line([0.2, 0.2], [1.0, 0.0], 4).unwrap();
        let law = MembraneLaw::MooneyRivlin;

        assert!(MembraneModel::new(law, mesh.clone(), properties(3, 1.0, 0.0)).is_err());

        let mut bad_density = properties(4, 1.0, 0.0);
        bad_density.density = 0.0;
        assert!(MembraneModel::new(law, mesh.clone(), bad_density).is_err());

        let mut bad_alpha = properties(4, 1.0, 0.0);
        bad_alpha.alpha[1] = f64::NAN;
        assert!(MembraneModel::new(law, mesh, bad_alpha).is_err());
    }

    #[test]
    fn test_initial_displacement_ramp() {
        let m = model(4, 0.0, 0.4);
        let u = m.expand(&m.initial_displacement());

        // Radial extent 0.2..1.0, nodes at r = 0.2, 0.4, 0.6, 0.8, 1.0
        let expected = [0.0, 0.1, 0.2, 0.3, 0.4];
        for (node, ur) in expected.iter().enumerate() {
            assert_relative_eq!(u[node].ur, *ur, epsilon = 1e-14);
            assert_relative_eq!(u[node].uz, 0.0);
        }
    }

    #[test]
    fn test_deformed_coordinates() {
        let m = model(2, 0.0, 0.0);
        let u = vec![
            NodeDisplacement::from_array([0.0, 0.1]),
            NodeDisplacement::from_array([0.2, 0.3]),
            NodeDisplacement::from_array([0.0, 0.0]),
        ];
        let x = m.deformed_coordinates(&u);

        assert_relative_eq!(x[0][1], 0.3, epsilon = 1e-14);
        assert_relative_eq!(x[1][0], 0.8, epsilon = 1e-14);
        assert_relative_eq!(x[1][1], 0.4, epsilon = 1e-14);
        assert_relative_eq!(x[2][0], 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_zero_load_steady_solve_is_trivial() {
        let m = model(8, 0.0, 0.0);
        let solution = m.solve(&SolveOptions::steady(3)).unwrap();

        assert_eq!(solution.n_steps(), 3);
        assert_eq!(solution.displacement.len(), 4);
        assert!(solution.all_converged());
        for d in &solution.displacement {
            assert_eq!(d.amax(), 0.0);
        }
        for report in &solution.steps {
            assert_eq!(report.iterations, 0);
        }
    }

    #[test]
    fn test_zero_load_unsteady_solve_is_trivial() {
        let m = model(8, 0.0, 0.0);
        let solution = m.solve(&SolveOptions::unsteady(5, 1.0)).unwrap();

        assert_eq!(solution.displacement.len(), 6);
        assert_eq!(solution.velocity.len(), 6);
        assert_eq!(solution.acceleration.len(), 6);
        for ((d, v), a) in solution
            .displacement
            .iter()
            .zip(&solution.velocity)
            .zip(&solution.acceleration)
        {
            assert_eq!(d.amax(), 0.0);
            assert_eq!(v.amax(), 0.0);
            assert_eq!(a.amax(), 0.0);
        }
    }

    #[test]
    fn test_solve_rejects_invalid_options() {
        let m = model(4, 0.1, 0.0);
        assert!(matches!(
            m.solve(&SolveOptions::steady(0)),
            Err(MembraneError::InvalidInput(_))
        ));
    }
}
