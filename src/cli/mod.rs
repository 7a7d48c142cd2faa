//! CLI module for toolpick - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for the interactive agent,
//! one-shot requests, and running the built-in tool servers.

pub mod commands;

pub use commands::{Cli, Commands};
