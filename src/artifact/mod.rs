//! Output artifact parsing.
//!
//! The harness inspects two artifact kinds produced by a publish:
//! - the runtime configuration document (nested JSON), modeled as a
//!   [`ConfigValue`] tree with explicit path lookup
//! - the native response file, modeled as an ordered directive sequence
//!
//! Reading is split from modeling so assertions can run against synthetic
//! in-memory artifacts in tests.

pub mod reader;
pub mod response;
pub mod value;

pub use reader::*;
pub use response::*;
pub use value::*;
