//! `stockledger` command line front end.
//!
//! Thin layer over `stockledger-inventory`: every subcommand loads the JSON
//! ledger, applies one operation, and saves when something changed.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command};
pub use commands::{run, run_demo};
