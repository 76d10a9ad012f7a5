//! Application layer: the shared expense workflow, the two execution
//! strategies it runs under, and the harness that compares them.

pub mod comparison;
pub mod service;
pub mod strategy;
