//! LLM client trait and a scripted mock

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::types::{CompletionRequest, CompletionResponse};
use crate::error::{AgentError, Result};

/// Stateless text-completion client; each call is independent
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

enum Scripted {
    Reply(String),
    Fail(String),
}

/// Replays scripted replies in order and records every prompt it saw
pub struct MockLlmClient {
    script: Mutex<VecDeque<Scripted>>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Mock that answers once with `reply`
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::new().then_reply(reply)
    }

    pub fn then_reply(self, reply: impl Into<String>) -> Self {
        self.push(Scripted::Reply(reply.into()));
        self
    }

    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.push(Scripted::Fail(message.into()));
        self
    }

    fn push(&self, item: Scripted) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(item);
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.prompt);

        let next = self.script.lock().unwrap_or_else(|e| e.into_inner()).pop_front();
        match next {
            Some(Scripted::Reply(text)) => Ok(CompletionResponse::text(text)),
            Some(Scripted::Fail(message)) => Err(AgentError::Llm(message)),
            None => Err(AgentError::Llm("mock script exhausted".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let mock = MockLlmClient::with_reply("first").then_fail("quota").then_reply("third");

        assert_eq!(mock.complete(CompletionRequest::new("a")).await.unwrap().content, "first");
        assert!(matches!(
            mock.complete(CompletionRequest::new("b")).await,
            Err(AgentError::Llm(msg)) if msg == "quota"
        ));
        assert_eq!(mock.complete(CompletionRequest::new("c")).await.unwrap().content, "third");
        assert!(mock.complete(CompletionRequest::new("d")).await.is_err());

        assert_eq!(mock.prompts(), vec!["a", "b", "c", "d"]);
    }
}
