pub mod collector;
pub mod constraint;
pub mod constraints;
pub mod domain;
pub mod engine;
pub mod heuristics;
pub mod queue;
pub mod stats;
pub mod store;
