// LogExc - platform/mod.rs
//
// Platform abstraction layer: filesystem and configuration.
// Dependencies: standard library, directories, encoding_rs, toml.

pub mod config;
pub mod fs;
