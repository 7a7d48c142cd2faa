//! Prompt System - Handlebars rendering and the tool-selection prompt

mod render;
mod selection;

pub use render::PromptRenderer;
pub use selection::{SELECTION_TEMPLATE, SelectionPrompt};
