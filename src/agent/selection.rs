//! Selection engine - one LLM round-trip per request

use std::sync::Arc;

use super::parser::{ParseMode, parse_decision};
use crate::domain::{Catalog, Decision};
use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompt::SelectionPrompt;

pub struct SelectionEngine {
    llm: Arc<dyn LlmClient>,
    prompt: SelectionPrompt,
    mode: ParseMode,
}

impl SelectionEngine {
    pub fn new(llm: Arc<dyn LlmClient>, mode: ParseMode) -> Result<Self> {
        Ok(Self {
            llm,
            prompt: SelectionPrompt::new()?,
            mode,
        })
    }

    /// Render, complete, parse; errors are surfaced for callers that want them
    pub async fn try_select(&self, catalog: &Catalog, request: &str) -> Result<Decision> {
        let prompt = self.prompt.render(catalog, request)?;
        let response = self.llm.complete(CompletionRequest::new(prompt)).await?;
        log::debug!("LLM reply ({} tokens): {}", response.usage.total(), response.content);
        parse_decision(&response.content, self.mode)
    }

    /// Pick a server and tool; any failure degrades to the no-tool decision
    pub async fn select(&self, catalog: &Catalog, request: &str) -> Decision {
        match self.try_select(catalog, request).await {
            Ok(decision) => decision,
            Err(e) => {
                log::warn!("Error in AI selection: {}", e);
                Decision::selection_error()
            }
        }
    }
}
