//! The tool-selection prompt

use serde::Serialize;

use super::PromptRenderer;
use crate::domain::Catalog;
use crate::error::Result;

/// Name the selection template is registered under
pub const SELECTION_TEMPLATE_NAME: &str = "selection";

/// Instruction prompt sent to the LLM for every request
pub const SELECTION_TEMPLATE: &str = r#"You are an AI agent that needs to select the appropriate MCP (Model Context Protocol) server and tool based on a user's request.

Available MCP servers and their tools:

{{catalog}}

Your task is to:
1. Analyze the user's request
2. Select the most appropriate MCP server
3. Select the most appropriate tool from that MCP
4. Extract any relevant parameters from the user's request

Respond with a JSON object in this exact format:
{
    "mcp_server": "server_name",
    "tool_name": "tool_name",
    "parameters": {"param1": "value1", "param2": "value2"},
    "reasoning": "Brief explanation of why you chose this MCP and tool"
}

If no appropriate MCP or tool is found, respond with:
{
    "mcp_server": null,
    "tool_name": null,
    "parameters": {},
    "reasoning": "Explanation of why no suitable MCP/tool was found"
}

User request: {{request}}
"#;

#[derive(Serialize)]
struct SelectionContext<'a> {
    catalog: String,
    request: &'a str,
}

/// Builds selection prompts from a catalog and a user request
pub struct SelectionPrompt {
    renderer: PromptRenderer,
}

impl SelectionPrompt {
    pub fn new() -> Result<Self> {
        Self::with_template(SELECTION_TEMPLATE)
    }

    /// Use a custom template; it sees `{{catalog}}` and `{{request}}`
    pub fn with_template(template: &str) -> Result<Self> {
        let mut renderer = PromptRenderer::new();
        renderer.register_template(SELECTION_TEMPLATE_NAME, template)?;
        Ok(Self { renderer })
    }

    pub fn render(&self, catalog: &Catalog, request: &str) -> Result<String> {
        let context = SelectionContext {
            catalog: catalog.to_prompt_json()?,
            request,
        };
        self.renderer.render_named(SELECTION_TEMPLATE_NAME, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolSet;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        let registry = ToolSet::Calculator.builtin_registry();
        catalog.insert(ToolSet::Calculator.default_server_info(), registry.list());
        catalog
    }

    #[test]
    fn test_prompt_contains_catalog_and_request() {
        let prompt = SelectionPrompt::new()
            .unwrap()
            .render(&catalog(), "add 2 and 3")
            .unwrap();

        assert!(prompt.contains("\"calculator_mcp\""));
        assert!(prompt.contains("\"addNumber\""));
        assert!(prompt.contains("Add two numbers together"));
        assert!(prompt.trim_end().ends_with("User request: add 2 and 3"));
    }

    #[test]
    fn test_prompt_keeps_reply_shape_literal() {
        let prompt = SelectionPrompt::new().unwrap().render(&Catalog::new(), "hi").unwrap();
        assert!(prompt.contains("\"mcp_server\": null"));
        assert!(prompt.contains("\"parameters\": {}"));
        assert!(prompt.contains("{\"param1\": \"value1\", \"param2\": \"value2\"}"));
    }

    #[test]
    fn test_request_is_not_escaped() {
        let prompt = SelectionPrompt::new()
            .unwrap()
            .render(&Catalog::new(), "what's 5 < 7 & \"why\"?")
            .unwrap();
        assert!(prompt.contains("what's 5 < 7 & \"why\"?"));
    }

    #[test]
    fn test_custom_template() {
        let prompt = SelectionPrompt::with_template("{{request}}|{{catalog}}")
            .unwrap()
            .render(&Catalog::new(), "q")
            .unwrap();
        assert_eq!(prompt, "q|{}");
    }
}
