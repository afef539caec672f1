//! Membrane elements and constitutive laws

mod material;
mod membrane;

pub use material::{MembraneLaw, Stretches, StressResponse};
pub use membrane::{
    sample_shape_functions, shape_functions, ElementContext, ElementMatrices, MembraneElement,
    ShapeSample,
};
