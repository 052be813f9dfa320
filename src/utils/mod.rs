//! Utility modules

pub mod memory_storage;
pub mod numeric;
pub mod similarity;
pub mod validation;

pub use memory_storage::*;
pub use numeric::*;
pub use similarity::*;
pub use validation::*;
