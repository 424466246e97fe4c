//! Core data types for Grove.
//!
//! Versions and their ordering, the bytecode compatibility matrix, task
//! descriptions, and the global configuration file.

pub mod compat;
pub mod config;
pub mod task;
pub mod version;
