//! Bounded subprocess runner for the Infer static analyzer.
//!
//! # Architecture
//!
//! - `config.rs` - Immutable per-run configuration
//! - `discover.rs` - Recursive source-file enumeration
//! - `argfile.rs` - Argument-indirection file (command-line length limits)
//! - `invocation.rs` - Command vector assembly
//! - `runner.rs` - Spawn, drain output, enforce timeout, classify exit
//! - `outcome.rs` - Exit-code classification

pub use argfile::write_argfile;
pub use config::RunConfig;
pub use discover::discover_sources;
pub use error::{Result, RunError};
pub use invocation::{Invocation, build_invocation};
pub use outcome::{ExitClassification, ProcessOutcome};
pub use runner::run;

pub mod argfile;
mod config;
pub mod discover;
mod error;
mod invocation;
mod outcome;
mod runner;
