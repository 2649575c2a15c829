//! Ammunition types, categories and weapon compatibility

pub mod category;
pub mod matrix;
pub mod registry;

pub use category::AmmoCategory;
pub use matrix::{CompatibilityMatrix, MatrixState};
pub use registry::{AmmoRegistry, AmmoType};
