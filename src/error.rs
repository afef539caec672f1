//! Error types for the membrane solver

use thiserror::Error;

/// Main error type for membrane FEA operations
#[derive(Error, Debug)]
pub enum MembraneError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Element type '{0}' is not supported")]
    UnsupportedElementType(String),

    #[error("Problem type '{0}' has not been implemented")]
    UnsupportedProblemType(String),

    #[error("Singular tangent matrix at step {step}, Newton iteration {iteration}")]
    SingularMatrix { step: usize, iteration: usize },

    #[error("Newton iteration diverged at step {step}: residual is not finite")]
    Diverged { step: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for membrane FEA operations
pub type MembraneResult<T> = Result<T, MembraneError>;
