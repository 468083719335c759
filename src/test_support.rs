//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::core::bank::QuestionBank;
use crate::core::state::App;
use crate::core::store::BankStore;
use crate::tutor::{CompletionRequest, TutorError, TutorGateway, TutorProvider};

/// A provider that replies with canned text (or an error) and records prompts.
pub struct ScriptedProvider {
    reply: Option<String>,
    failure: Mutex<Option<TutorError>>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            failure: Mutex::new(None),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fails the first call with `error`, later calls with a network error.
    pub fn failing(error: TutorError) -> Self {
        Self {
            reply: None,
            failure: Mutex::new(Some(error)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// User prompts received so far.
    pub fn seen_prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.seen)
    }
}

#[async_trait]
impl TutorProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, TutorError> {
        self.seen
            .lock()
            .unwrap()
            .push(request.user_prompt.to_string());
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(self
                .failure
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| TutorError::Network("scripted failure".to_string()))),
        }
    }
}

/// Creates a test App backed by a fresh store (built-in bank) and no tutor.
pub fn test_app() -> (App, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = BankStore::open(dir.path().join("bank.json"));
    let app = App::new(store, Arc::new(TutorGateway::unconfigured()));
    (app, dir)
}

/// Creates a test App whose store already holds `bank`.
pub fn test_app_with_bank(bank: QuestionBank) -> (App, TempDir) {
    let (mut app, dir) = test_app();
    app.store.save(bank).expect("save test bank");
    (app, dir)
}
