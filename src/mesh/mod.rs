//! Meridian mesh of an axisymmetric membrane
//!
//! The membrane generator curve is discretized into a chain of 2-node line
//! elements. Nodes are numbered from bottom to top and from left to right; the
//! first node is the left boundary and the last node is the right boundary.

pub mod numbering;

use serde::Serialize;

use crate::error::{MembraneError, MembraneResult};
use crate::math::Vec4;

pub use numbering::{Dof, EquationNumbering, EssentialBc};

/// Number of nodes per element
pub const NODES_PER_ELEMENT: usize = 2;

/// A chain of 2-node elements along the membrane generator
#[derive(Debug, Clone, Serialize)]
pub struct Mesh {
    /// Reference (r, z) position of each node
    coords: Vec<[f64; 2]>,
    /// Global node ids of each element (IEN)
    ien: Vec<[usize; NODES_PER_ELEMENT]>,
}

impl Mesh {
    /// Build the element chain connecting consecutive nodes
    pub fn new(coords: Vec<[f64; 2]>) -> MembraneResult<Self> {
        if coords.len() < 2 {
            return Err(MembraneError::InvalidGeometry(format!(
                "Mesh needs at least 2 nodes, got {}",
                coords.len()
            )));
        }
        if let Some(i) = coords
            .iter()
            .position(|c| !c[0].is_finite() || !c[1].is_finite())
        {
            return Err(MembraneError::InvalidGeometry(format!(
                "Node {} has non-finite coordinates",
                i
            )));
        }

        let ien: Vec<[usize; NODES_PER_ELEMENT]> = (0..coords.len() - 1).map(|e| [e, e + 1]).collect();

        for (e, nodes) in ien.iter().enumerate() {
            let a = coords[nodes[0]];
            let b = coords[nodes[1]];
            let length = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
            if length < 1e-12 {
                return Err(MembraneError::InvalidGeometry(format!(
                    "Element {} has zero length: nodes {} and {}",
                    e, nodes[0], nodes[1]
                )));
            }
        }

        Ok(Self { coords, ien })
    }

    /// Evenly spaced straight generator from `start` to `end`
    pub fn line(start: [f64; 2], end: [f64; 2], n_elements: usize) -> MembraneResult<Self> {
        if n_elements == 0 {
            return Err(MembraneError::InvalidInput(
                "Number of elements must be positive".to_string(),
            ));
        }

        let coords = (0..=n_elements)
            .map(|i| {
                let t = i as f64 / n_elements as f64;
                [
                    start[0] + t * (end[0] - start[0]),
                    start[1] + t * (end[1] - start[1]),
                ]
            })
            .collect();

        Self::new(coords)
    }

    pub fn n_nodes(&self) -> usize {
        self.coords.len()
    }

    pub fn n_elements(&self) -> usize {
        self.ien.len()
    }

    /// Reference coordinates of all nodes
    pub fn coords(&self) -> &[[f64; 2]] {
        &self.coords
    }

    /// Element connectivity (IEN)
    pub fn ien(&self) -> &[[usize; NODES_PER_ELEMENT]] {
        &self.ien
    }

    pub fn element_nodes(&self, e: usize) -> [usize; NODES_PER_ELEMENT] {
        self.ien[e]
    }

    /// Reference coordinates of an element as `[R0, Z0, R1, Z1]`
    pub fn element_coords(&self, e: usize) -> Vec4 {
        let [a, b] = self.ien[e];
        Vec4::new(
            self.coords[a][0],
            self.coords[a][1],
            self.coords[b][0],
            self.coords[b][1],
        )
    }

    /// Node on the left boundary
    pub fn left_node(&self) -> usize {
        0
    }

    /// Node on the right boundary
    pub fn right_node(&self) -> usize {
        self.coords.len() - 1
    }

    /// Radial extent `(X_l, X_r)` of the membrane
    pub fn radial_extent(&self) -> (f64, f64) {
        (self.coords[self.left_node()][0], self.coords[self.right_node()][0])
    }
}
