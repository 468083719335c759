//! OpenAI-compatible chat-completions wire format, shared by both providers.
//!
//! One request, one non-streamed reply: explanations are short, and the UI
//! shows a spinner until the whole text is in.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::tutor::{CompletionRequest, TutorError};

/// Nucleus sampling cutoff sent with every request.
const TOP_P: f32 = 0.95;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(super) enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(super) struct ChatMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Serialize, Debug)]
pub(super) struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub stream: bool,
}

#[derive(Deserialize, Debug)]
pub(super) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
pub(super) struct Choice {
    pub message: ChatMessage,
}

impl ChatRequest {
    pub fn from_completion(request: &CompletionRequest<'_>) -> Self {
        Self {
            model: request.model.to_string(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: Some(request.system_prompt.to_string()),
                },
                ChatMessage {
                    role: Role::User,
                    content: Some(request.user_prompt.to_string()),
                },
            ],
            temperature: request.temperature,
            top_p: TOP_P,
            stream: false,
        }
    }
}

/// Pulls the assistant text out of a response body. A reply without choices
/// or without content yields an empty string (the gateway maps that to its
/// "no explanation" message).
pub(super) fn reply_text(body: &str) -> Result<String, TutorError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| TutorError::Parse(e.to_string()))?;
    Ok(response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default())
}

/// POSTs a chat request to `{base_url}/chat/completions`.
pub(super) async fn send_chat(
    client: &reqwest::Client,
    provider: &str,
    base_url: &str,
    api_key: Option<&str>,
    request: &ChatRequest,
) -> Result<String, TutorError> {
    info!(
        "{} chat request: model={}, messages={}",
        provider,
        request.model,
        request.messages.len()
    );

    let mut builder = client
        .post(format!("{}/chat/completions", base_url.trim_end_matches('/')))
        .json(request);
    if let Some(key) = api_key {
        builder = builder.header("Authorization", format!("Bearer {key}"));
    }

    let response = builder
        .send()
        .await
        .map_err(|e| TutorError::Network(e.to_string()))?;

    debug!("{} response status: {}", provider, response.status());

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let err_body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("{} API error: {} - {}", provider, status, err_body);
        return Err(TutorError::Api {
            status,
            message: err_body,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| TutorError::Network(e.to_string()))?;
    let text = reply_text(&body)?;
    info!("{} reply: {} bytes", provider, text.len());
    Ok(text)
}
