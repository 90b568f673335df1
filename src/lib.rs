//! Pubcheck - verification harness for build-toolchain publish output
//!
//! This library provides functionality to:
//! - Describe ephemeral buildable projects and materialize them on disk
//! - Publish them through an external toolchain with configuration variants
//! - Parse the generated runtime configuration and native response artifacts
//! - Evaluate declarative expectations and aggregate pass/fail results

pub mod artifact;
pub mod assertion;
pub mod cli;
pub mod config;
pub mod project;
pub mod scenario;
pub mod telemetry;
