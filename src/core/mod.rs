// LogExc - core/mod.rs
//
// Core business logic layer: extraction, the scan state machine and the
// event sinks.
// Must NOT depend on: platform or app.

pub mod comment;
pub mod export;
pub mod model;
pub mod processor;
pub mod restart;
pub mod signature;
pub mod timestamp;
