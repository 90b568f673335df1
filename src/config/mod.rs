//! Configuration module for the pubcheck harness
//!
//! Provides types and parsing for `pubcheck.toml` harness configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
