// LogExc - app/mod.rs
//
// Application layer: orchestrates a run from source file to sinks.
// Dependencies: core and platform layers.

pub mod run;
