pub mod artifacts;
pub mod engine;
pub mod processing;

pub use engine::{BatchOutcome, ValidationEngine, ValidationSummary};
