pub mod keys;
pub mod normalizer;

pub use normalizer::{normalize, NormalizeOutcome};
