//! # attrkit CLI
//!
//! A thin command-line client for the `attrkit` library: it reads a JSON
//! document, runs one lookup against it and prints the result as JSON.
//!
//! The binary only invokes `cli::run()` and handles process termination.
//! Everything that touches the terminal (argument parsing, logging setup,
//! file I/O, exit codes) lives in `src/cli/`; the lookups themselves are
//! plain library calls.
//!
//! ## Exit codes
//!
//! - `0`: the lookup produced a value.
//! - `1`: nothing resolved and no default was given, or the input could not
//!   be read or parsed.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
