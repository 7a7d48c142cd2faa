//! CLI command definitions using clap.
//!
//! - (none) / chat: interactive agent session
//! - ask: one-shot request
//! - serve / serve-all: run built-in tool servers
//! - check: probe configured tool servers

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tools::ToolSet;

/// Toolpick - lets an LLM pick a tool server and tool for each request
#[derive(Parser, Debug)]
#[command(name = "toolpick")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Interactive session (the default)
    Chat,

    /// Run a single request and print the result
    Ask {
        /// Natural-language request
        #[arg(required = true, num_args = 1..)]
        request: Vec<String>,
    },

    /// Run one built-in tool server
    Serve {
        /// Which tool set to serve
        #[arg(value_enum)]
        toolset: ToolSet,

        /// Port to listen on (defaults to the tool set's port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// TOML manifest selecting tools; re-read on /reload_tools
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Run every built-in tool server on its default port
    ServeAll {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// Check which configured tool servers are reachable
    Check,
}

impl Commands {
    /// Request text for `ask`, words joined with spaces
    pub fn request_text(&self) -> Option<String> {
        match self {
            Self::Ask { request } => Some(request.join(" ")),
            _ => None,
        }
    }
}
