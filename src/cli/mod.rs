//! CLI module for sheet2issue - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
