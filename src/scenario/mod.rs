//! Scenario execution module for pubcheck
//!
//! Composes the harness pieces into verification runs: a scenario owns an
//! ephemeral project, one publish-mode variant, and the expectations checked
//! against the resulting artifact.
//!
//! # Overview
//!
//! One scenario moves through a linear pipeline:
//! - **Materialize**: write the project spec into an isolated scratch tree
//! - **Invoke**: run the external publish tool, capturing exit and output
//! - **Verify**: read the output artifact and evaluate every expectation
//!
//! # Example
//!
//! ```ignore
//! use pubcheck::config::load_config;
//! use pubcheck::scenario::{
//!     standard_matrix, DiskMaterializer, DotnetInvoker, ParallelRun,
//!     ScenarioContext, ScenarioRunner,
//! };
//!
//! let config = load_config(None)?;
//! let scenarios = standard_matrix(&config);
//! let invoker = DotnetInvoker::new(config.toolchain.command.clone());
//! let context = ScenarioContext::new(config, work_root);
//! let runner = ScenarioRunner::new(context, DiskMaterializer::new(), invoker);
//!
//! let result = ParallelRun::new(runner).run(&scenarios)?;
//! println!("{}", result.summary());
//! ```

pub mod context;
pub mod invoke;
pub mod materialize;
pub mod matrix;
pub mod parallel;
pub mod result;
pub mod runner;

pub use context::*;
pub use invoke::*;
pub use materialize::*;
pub use matrix::*;
pub use parallel::*;
pub use result::*;
pub use runner::*;
