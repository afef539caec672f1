//! JSON model descriptions
//!
//! A [`ModelConfig`] describes a straight membrane generator, its material and
//! loading, and the analysis to run. Missing fields fall back to the default
//! inflation problem: 50 elements from `(0.2, 0.2)` to `(1.0, 0.0)` with the
//! inner half at `alpha = 0.1` and the outer half at `alpha = 0.2`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::SolveOptions;
use crate::elements::MembraneLaw;
use crate::error::{MembraneError, MembraneResult};
use crate::loads::PressureLoad;
use crate::mesh::Mesh;
use crate::model::{MembraneModel, MembraneProperties};

/// Straight generator discretized into equal elements
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineMesh {
    /// Left boundary `(r, z)`
    pub start: [f64; 2],
    /// Right boundary `(r, z)`
    pub end: [f64; 2],
    pub n_elements: usize,
}

impl Default for LineMesh {
    fn default() -> Self {
        Self {
            start: [0.2, 0.2],
            end: [1.0, 0.0],
            n_elements: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Constitutive law tag
    pub element_type: String,
    pub mesh: LineMesh,
    /// Mooney-Rivlin parameters, one per element or one per equal block of elements
    pub alpha: Vec<f64>,
    pub density: f64,
    pub end_displacement_r: f64,
    pub pressure_load: f64,
    pub pressure_policy: PressureLoad,
    pub analysis: SolveOptions,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            element_type: MembraneLaw::MooneyRivlin.tag().to_string(),
            mesh: LineMesh::default(),
            alpha: vec![0.1, 0.2],
            density: 1.0,
            end_displacement_r: 0.0,
            pressure_load: 1.0,
            pressure_policy: PressureLoad::Follower,
            analysis: SolveOptions::unsteady(1000, 10.0),
        }
    }
}

impl ModelConfig {
    pub fn from_json_str(json: &str) -> MembraneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> MembraneResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> MembraneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Per-element alpha values.
    ///
    /// `k` listed values split the elements into `k` contiguous blocks of
    /// (nearly) equal size.
    pub fn element_alpha(&self) -> MembraneResult<Vec<f64>> {
        let n = self.mesh.n_elements;
        let k = self.alpha.len();
        if k == 0 || k > n {
            return Err(MembraneError::InvalidInput(format!(
                "Expected between 1 and {} alpha values, got {}",
                n, k
            )));
        }

        Ok((0..n).map(|e| self.alpha[e * k / n]).collect())
    }

    /// Build the model described by this configuration
    pub fn build(&self) -> MembraneResult<MembraneModel> {
        let law: MembraneLaw = self.element_type.parse()?;
        let mesh = Mesh::line(self.mesh.start, self.mesh.end, self.mesh.n_elements)?;
        let properties = MembraneProperties {
            end_displacement_r: self.end_displacement_r,
            density: self.density,
            alpha: self.element_alpha()?,
            pressure_load: self.pressure_load,
        };

        Ok(MembraneModel::new(law, mesh, properties)?.with_pressure_load(self.pressure_policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ProblemType;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_problem() {
        let config = ModelConfig::default();
        let alpha = config.element_alpha().unwrap();

        assert_eq!(alpha.len(), 50);
        assert_relative_eq!(alpha[0], 0.1);
        assert_relative_eq!(alpha[24], 0.1);
        assert_relative_eq!(alpha[25], 0.2);
        assert_relative_eq!(alpha[49], 0.2);
        assert_eq!(config.analysis.problem_type, ProblemType::Unsteady);

        let model = config.build().unwrap();
        assert_eq!(model.mesh().n_nodes(), 51);
        assert_eq!(model.n_equations(), 99);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "mesh": { "start": [0.3, 0.1], "end": [0.9, 0.0], "n_elements": 6 },
            "alpha": [0.15],
            "pressure_load": 0.5,
            "pressure_policy": "Conservative"
        }"#;
        let config = ModelConfig::from_json_str(json).unwrap();

        assert_eq!(config.mesh.n_elements, 6);
        assert_relative_eq!(config.density, 1.0);
        assert_eq!(config.element_alpha().unwrap(), vec![0.15; 6]);

        let model = config.build().unwrap();
        assert_eq!(model.pressure_policy(), PressureLoad::Conservative);
        assert_relative_eq!(model.properties().pressure_load, 0.5);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ModelConfig::default();
        let parsed = ModelConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed.alpha, config.alpha);
        assert_eq!(parsed.analysis.total_steps, 1000);
    }

    #[test]
    fn test_rejects_unknown_element_type() {
        let config = ModelConfig {
            element_type: "Ogden".to_string(),
            ..ModelConfig::default()
        };
        assert!(matches!(
            config.build(),
            Err(MembraneError::UnsupportedElementType(_))
        ));
    }

    #[test]
    fn test_rejects_too_many_alpha_blocks() {
        let config = ModelConfig {
            mesh: LineMesh {
                n_elements: 2,
                ..LineMesh::default()
            },
            alpha: vec![0.1, 0.2, 0.3],
            ..ModelConfig::default()
        };
        assert!(config.element_alpha().is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ModelConfig::from_json_file("/nonexistent/membrane.json"),
            Err(MembraneError::IoError(_))
        ));
    }
}
