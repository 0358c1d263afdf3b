//! CLI module for the ADO Assistant command-line interface.

mod commands;
mod output;

pub use commands::*;
