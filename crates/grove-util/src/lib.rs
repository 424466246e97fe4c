//! Shared utilities for Grove.
//!
//! This crate provides cross-cutting concerns used by all other Grove crates:
//! the unified error type, filesystem and classpath helpers, process spawning,
//! and cargo-style status lines.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;
