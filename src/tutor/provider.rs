use std::fmt;

use async_trait::async_trait;

/// Errors that can occur while asking a provider for an explanation.
/// None of these reach the UI; the gateway turns them into fallback text.
#[derive(Debug)]
pub enum TutorError {
    /// Provider misconfigured (missing API key, bad URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned an error response.
    Api { status: u16, message: String },
    /// Failed to parse the provider's response.
    Parse(String),
}

impl fmt::Display for TutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TutorError::Config(msg) => write!(f, "config error: {msg}"),
            TutorError::Network(msg) => write!(f, "network error: {msg}"),
            TutorError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            TutorError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for TutorError {}

/// Everything a provider needs for one explanation.
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
    pub temperature: f32,
}

#[async_trait]
pub trait TutorProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Sends one prompt and returns the model's full reply.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, TutorError>;
}
