//! Command-line front-end for the canonical LR(0)/LR(1) table generator.
//!
//! Loads a grammar file and an input file, builds the requested table, and
//! reports a per-line accept/reject verdict.
//!
//! # Author
//! Juan Manuel Young Hoyos
//!
//! # References
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools" (2nd
//! Edition). Addison-Wesley, 2006.

use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    ExitCode::from(cfg_parser::cli::run())
}
