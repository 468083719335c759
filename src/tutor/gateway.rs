//! # Tutor Gateway
//!
//! Builds the explanation prompt for a question and applies the fallback
//! policy: the caller always gets text it can show.
//!
//! ```text
//! explain(question)
//!   ├── no provider configured → MISSING_CREDENTIAL_MESSAGE (no network call)
//!   ├── provider error         → SERVICE_ERROR_MESSAGE (logged)
//!   ├── empty reply            → EMPTY_EXPLANATION_MESSAGE
//!   └── reply text
//! ```
//!
//! The gateway is stateless per call. Deciding whether a reply is still
//! wanted is the caller's job (see `RequestId` in `core::state`).

use std::sync::Arc;

use log::{info, warn};

use crate::core::bank::{Question, option_label};
use crate::tutor::{CompletionRequest, TutorError, TutorProvider};

pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "No API key found for the tutor. Set OPENROUTER_API_KEY or add one to ~/.quizdeck/config.toml.";
pub const SERVICE_ERROR_MESSAGE: &str =
    "The explanation service is unreachable right now. Please try again later.";
pub const EMPTY_EXPLANATION_MESSAGE: &str = "No explanation available for this question.";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a rigorous exam tutor. Explain in a plain, \
    direct and concise tone. Format your answer in three parts: \
    **Key point:** the principle or rule being tested. \
    **Reasoning:** why the correct option is right and how the other options differ. \
    **Memory hook:** a short keyword or mnemonic to remember it.";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// What the tutor needs to know about a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainRequest {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl From<&Question> for ExplainRequest {
    fn from(question: &Question) -> Self {
        Self {
            question_text: question.text.clone(),
            options: question.options.clone(),
            correct_index: question.correct_index,
        }
    }
}

/// The user prompt: question, the correct answer, and every labelled option.
pub fn build_user_prompt(request: &ExplainRequest) -> String {
    let correct = request
        .options
        .get(request.correct_index)
        .map(String::as_str)
        .unwrap_or("?");
    let options = request
        .options
        .iter()
        .enumerate()
        .map(|(i, opt)| format!("({}) {}", option_label(i), opt))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Question: {}\nCorrect answer: ({}) {}\nOptions: {}",
        request.question_text,
        option_label(request.correct_index),
        correct,
        options
    )
}

pub struct TutorGateway {
    provider: Option<Arc<dyn TutorProvider>>,
    model: String,
    system_prompt: String,
    temperature: f32,
}

impl TutorGateway {
    /// `provider` is `None` when no credential is available.
    pub fn new(
        provider: Option<Arc<dyn TutorProvider>>,
        model: String,
        system_prompt: String,
        temperature: f32,
    ) -> Self {
        Self {
            provider,
            model,
            system_prompt,
            temperature,
        }
    }

    /// A gateway with no provider; every call returns the missing-credential text.
    pub fn unconfigured() -> Self {
        Self::new(
            None,
            String::new(),
            DEFAULT_SYSTEM_PROMPT.to_string(),
            DEFAULT_TEMPERATURE,
        )
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.as_deref().map(|p| p.name()).unwrap_or("none")
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The raw call, without the fallback policy.
    pub async fn try_explain(&self, request: &ExplainRequest) -> Result<String, TutorError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| TutorError::Config("no tutor provider configured".to_string()))?;
        let user_prompt = build_user_prompt(request);
        provider
            .complete(CompletionRequest {
                model: &self.model,
                system_prompt: &self.system_prompt,
                user_prompt: &user_prompt,
                temperature: self.temperature,
            })
            .await
    }

    /// Always returns displayable text.
    pub async fn explain(&self, request: &ExplainRequest) -> String {
        match self.try_explain(request).await {
            Ok(text) if text.trim().is_empty() => EMPTY_EXPLANATION_MESSAGE.to_string(),
            Ok(text) => {
                info!("Explanation received ({} bytes)", text.len());
                text
            }
            Err(TutorError::Config(msg)) => {
                warn!("Tutor not configured: {}", msg);
                MISSING_CREDENTIAL_MESSAGE.to_string()
            }
            Err(e) => {
                warn!("Tutor request failed: {}", e);
                SERVICE_ERROR_MESSAGE.to_string()
            }
        }
    }
}
