//! Essential boundary conditions and destination arrays (ID / LM)
//!
//! Global equations are numbered `ur_0, uz_0, ur_1, uz_1, ...`, skipping every
//! freedom that carries an essential boundary condition. A constrained freedom
//! has no equation number (`None`), so it never becomes a scatter target during
//! assembly.

use log::info;
use serde::{Deserialize, Serialize};

use super::{Mesh, NODES_PER_ELEMENT};
use crate::math::Vec as FEVec;

/// Number of DOFs per node
pub const DOFS_PER_NODE: usize = 2;
/// Number of DOFs per element
pub const DOFS_PER_ELEMENT: usize = NODES_PER_ELEMENT * DOFS_PER_NODE;

/// Nodal degree of freedom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dof {
    /// Radial displacement `ur`
    Radial,
    /// Axial displacement `uz`
    Axial,
}

impl Dof {
    pub const ALL: [Dof; DOFS_PER_NODE] = [Dof::Radial, Dof::Axial];

    /// Position of this DOF within a node
    pub fn index(self) -> usize {
        match self {
            Dof::Radial => 0,
            Dof::Axial => 1,
        }
    }
}

/// Essential (Dirichlet) boundary condition table: EBC flags and values `g`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssentialBc {
    constrained: Vec<[bool; DOFS_PER_NODE]>,
    values: Vec<[f64; DOFS_PER_NODE]>,
}

impl EssentialBc {
    /// Unconstrained table for `n_nodes` nodes
    pub fn free(n_nodes: usize) -> Self {
        Self {
            constrained: vec![[false; DOFS_PER_NODE]; n_nodes],
            values: vec![[0.0; DOFS_PER_NODE]; n_nodes],
        }
    }

    /// Membrane end conditions.
    ///
    /// The left node has `ur = 0`; the right node has `ur = end_displacement_r`
    /// and `uz = 0`.
    pub fn membrane_ends(n_nodes: usize, end_displacement_r: f64) -> Self {
        let mut bc = Self::free(n_nodes);
        let left = 0;
        let right = n_nodes - 1;

        info!("set left boundary condition: node {}", left);
        bc.prescribe(left, Dof::Radial, 0.0);

        info!("set right boundary condition: node {}", right);
        bc.prescribe(right, Dof::Radial, end_displacement_r);
        bc.prescribe(right, Dof::Axial, 0.0);

        bc
    }

    /// Constrain a freedom to a prescribed value
    pub fn prescribe(&mut self, node: usize, dof: Dof, value: f64) {
        self.constrained[node][dof.index()] = true;
        self.values[node][dof.index()] = value;
    }

    pub fn is_constrained(&self, node: usize, dof: Dof) -> bool {
        self.constrained[node][dof.index()]
    }

    /// Prescribed value, if the freedom is constrained
    pub fn prescribed(&self, node: usize, dof: Dof) -> Option<f64> {
        self.is_constrained(node, dof)
            .then(|| self.values[node][dof.index()])
    }

    /// Number of constrained freedoms
    pub fn n_constrained(&self) -> usize {
        self.constrained.iter().flatten().filter(|&&c| c).count()
    }
}

/// Destination arrays mapping nodal and element freedoms to global equations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquationNumbering {
    /// ID(n, d): equation number of node n's freedom d
    id: Vec<[Option<usize>; DOFS_PER_NODE]>,
    /// LM(e, i): equation number of element e's local freedom i
    lm: Vec<[Option<usize>; DOFS_PER_ELEMENT]>,
    n_equations: usize,
}

impl EquationNumbering {
    /// Number free freedoms in row-major (node, then DOF) order
    pub fn new(mesh: &Mesh, bc: &EssentialBc) -> Self {
        let mut id = vec![[None; DOFS_PER_NODE]; mesh.n_nodes()];
        let mut n_equations = 0;
        for (node, slots) in id.iter_mut().enumerate() {
            for dof in Dof::ALL {
                if !bc.is_constrained(node, dof) {
                    slots[dof.index()] = Some(n_equations);
                    n_equations += 1;
                }
            }
        }

        let lm = mesh
            .ien()
            .iter()
            .map(|nodes| {
                let mut eqs = [None; DOFS_PER_ELEMENT];
                for (a, &node) in nodes.iter().enumerate() {
                    for dof in Dof::ALL {
                        eqs[a * DOFS_PER_NODE + dof.index()] = id[node][dof.index()];
                    }
                }
                eqs
            })
            .collect();

        Self { id, lm, n_equations }
    }

    pub fn n_equations(&self) -> usize {
        self.n_equations
    }

    /// Equation number of a nodal freedom, `None` if constrained
    pub fn equation(&self, node: usize, dof: Dof) -> Option<usize> {
        self.id[node][dof.index()]
    }

    /// Equation numbers of an element's local freedoms `[ur_0, uz_0, ur_1, uz_1]`
    pub fn element_equations(&self, e: usize) -> &[Option<usize>; DOFS_PER_ELEMENT] {
        &self.lm[e]
    }

    /// Recover the full per-node field `[ur, uz]` from an equation-space vector
    pub fn expand(&self, bc: &EssentialBc, d: &FEVec) -> Vec<[f64; DOFS_PER_NODE]> {
        self.id
            .iter()
            .enumerate()
            .map(|(node, slots)| {
                let mut u = [0.0; DOFS_PER_NODE];
                for dof in Dof::ALL {
                    u[dof.index()] = match slots[dof.index()] {
                        Some(eq) => d[eq],
                        None => bc.prescribed(node, dof).unwrap_or(0.0),
                    };
                }
                u
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n_elements: usize, end_disp: f64) -> (Mesh, EssentialBc, EquationNumbering) {
        let mesh = Mesh::line([0.2, 0.2], [1.0, 0.0], n_elements).unwrap();
        let bc = EssentialBc::membrane_ends(mesh.n_nodes(), end_disp);
        let numbering = EquationNumbering::new(&mesh, &bc);
        (mesh, bc, numbering)
    }

    #[test]
    fn test_membrane_end_conditions() {
        let (mesh, bc, _) = numbered(4, 0.3);
        let right = mesh.right_node();

        assert_eq!(bc.prescribed(0, Dof::Radial), Some(0.0));
        assert_eq!(bc.prescribed(0, Dof::Axial), None);
        assert_eq!(bc.prescribed(right, Dof::Radial), Some(0.3));
        assert_eq!(bc.prescribed(right, Dof::Axial), Some(0.0));
        assert_eq!(bc.n_constrained(), 3);
        for node in 1..right {
            assert!(!bc.is_constrained(node, Dof::Radial));
            assert!(!bc.is_constrained(node, Dof::Axial));
        }
    }

    #[test]
    fn test_id_numbering_order() {
        let (mesh, _, numbering) = numbered(3, 0.0);

        assert_eq!(numbering.n_equations(), 2 * mesh.n_nodes() - 3);
        assert_eq!(numbering.equation(0, Dof::Radial), None);
        assert_eq!(numbering.equation(0, Dof::Axial), Some(0));
        assert_eq!(numbering.equation(1, Dof::Radial), Some(1));
        assert_eq!(numbering.equation(1, Dof::Axial), Some(2));
        assert_eq!(numbering.equation(2, Dof::Radial), Some(3));
        assert_eq!(numbering.equation(2, Dof::Axial), Some(4));
        assert_eq!(numbering.equation(3, Dof::Radial), None);
        assert_eq!(numbering.equation(3, Dof::Axial), None);
    }

    #[test]
    fn test_free_equations_are_a_permutation() {
        let (mesh, bc, numbering) = numbered(10, 0.1);
        let mut seen = vec![false; numbering.n_equations()];

        for node in 0..mesh.n_nodes() {
            for dof in Dof::ALL {
                match numbering.equation(node, dof) {
                    Some(eq) => {
                        assert!(!bc.is_constrained(node, dof));
                        assert!(!seen[eq], "equation {} assigned twice", eq);
                        seen[eq] = true;
                    }
                    None => assert!(bc.is_constrained(node, dof)),
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_lm_composes_id_with_ien() {
        let (mesh, _, numbering) = numbered(5, 0.0);

        for e in 0..mesh.n_elements() {
            let nodes = mesh.element_nodes(e);
            let lm = numbering.element_equations(e);
            for (a, &node) in nodes.iter().enumerate() {
                for dof in Dof::ALL {
                    assert_eq!(lm[a * DOFS_PER_NODE + dof.index()], numbering.equation(node, dof));
                }
            }
        }
        assert_eq!(numbering.element_equations(0), &[None, Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_expand_uses_prescribed_values() {
        let (mesh, bc, numbering) = numbered(2, 0.25);
        let d = FEVec::from_vec(vec![1.0, 2.0, 3.0]);
        let u = numbering.expand(&bc, &d);

        assert_eq!(u.len(), mesh.n_nodes());
        assert_eq!(u[0], [0.0, 1.0]);
        assert_eq!(u[1], [2.0, 3.0]);
        assert_eq!(u[2], [0.25, 0.0]);
    }
}
