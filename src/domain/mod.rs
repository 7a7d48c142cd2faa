//! Domain types for Toolpick
//!
//! This module contains the data exchanged across the dispatch protocol:
//! - ToolServerInfo / Catalog: what servers exist and what they advertise
//! - Decision: the action chosen for one user request
//! - ExecutionResult: the uniform outcome of running (or not running) a tool
//! - ParamValue / Parameters: scalar tool arguments

pub mod catalog;
pub mod decision;
pub mod params;
pub mod result;

pub use catalog::{Catalog, CatalogEntry, ToolServerInfo};
pub use decision::{Decision, SELECTION_ERROR_RATIONALE};
pub use params::{ParamValue, Parameters, parameters_from_json, parameters_to_json};
pub use result::{ExecutionResult, NO_TOOL_MESSAGE};
pub(crate) use params::json_type_name;
