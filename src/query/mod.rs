//! Comparison orchestration.

mod compare;

pub use compare::CompareService;
