//! Load types

mod pressure;

pub use pressure::PressureLoad;
