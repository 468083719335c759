//! LM Studio provider (local inference server, no auth).
//!
//! LM Studio exposes the OpenAI-compatible `/v1/chat/completions` endpoint,
//! so it shares the wire format with OpenRouter.

use async_trait::async_trait;

use super::chat::{ChatRequest, send_chat};
use crate::tutor::{CompletionRequest, TutorError, TutorProvider};

pub const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";

pub struct LmStudioProvider {
    base_url: String,
    client: reqwest::Client,
}

impl LmStudioProvider {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TutorProvider for LmStudioProvider {
    fn name(&self) -> &str {
        "lmstudio"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, TutorError> {
        let chat = ChatRequest::from_completion(&request);
        send_chat(&self.client, self.name(), &self.base_url, None, &chat).await
    }
}
