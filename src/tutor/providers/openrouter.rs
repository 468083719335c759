//! OpenRouter provider (hosted, needs an API key).

use async_trait::async_trait;

use super::chat::{ChatRequest, send_chat};
use crate::tutor::{CompletionRequest, TutorError, TutorProvider};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub struct OpenRouterProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    /// Creates a new OpenRouter provider.
    ///
    /// # Arguments
    /// * `api_key` - OpenRouter API key
    /// * `base_url` - Optional custom base URL (defaults to OpenRouter's API)
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TutorProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, TutorError> {
        if self.api_key.trim().is_empty() {
            return Err(TutorError::Config("OpenRouter API key is empty".to_string()));
        }
        let chat = ChatRequest::from_completion(&request);
        send_chat(
            &self.client,
            self.name(),
            &self.base_url,
            Some(&self.api_key),
            &chat,
        )
        .await
    }
}
