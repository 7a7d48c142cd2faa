//! Toolpick - LLM-driven tool selection and dispatch
//!
//! An agent asks an LLM to pick one tool on one of several HTTP tool servers
//! for each natural-language request, calls it, and reports the result. The
//! crate also contains the tool servers themselves.

pub mod agent;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::{AgentError, Result, ToolError};
