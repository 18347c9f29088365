//! # CLI Layer
//!
//! The only place that knows about stdout, stderr and process exits.
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: per-command handlers that call the library and print JSON

mod commands;
pub mod setup;

pub use commands::run;
