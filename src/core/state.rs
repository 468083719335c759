//! # Application State
//!
//! Core business state for quizdeck. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── store: BankStore              // canonical bank + its file
//! ├── gateway: Arc<TutorGateway>    // explanation service
//! ├── view: ViewState               // mode × overlay
//! ├── session: Option<Session>      // active quiz run
//! ├── randomize: bool               // shuffle on next start
//! ├── import_policy: ImportPolicy   // strict or permissive import
//! ├── export_dir: PathBuf           // where exports are written
//! ├── tutor: TutorPanel             // pending / shown explanation
//! ├── tutor_timeout: Duration       // per-request deadline
//! └── status_message: String        // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::core::config::ResolvedConfig;
use crate::core::session::Session;
use crate::core::store::{BankStore, ImportPolicy};
use crate::core::view::ViewState;
use crate::tutor::TutorGateway;

/// Identifies one explanation request so a late reply can be matched or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The explanation panel under the current question.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TutorPanel {
    #[default]
    Hidden,
    Loading {
        request_id: RequestId,
        question_index: usize,
    },
    Ready {
        question_index: usize,
        text: String,
    },
}

impl TutorPanel {
    pub fn is_loading(&self) -> bool {
        matches!(self, TutorPanel::Loading { .. })
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        match self {
            TutorPanel::Loading { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }
}

pub struct App {
    pub store: BankStore,
    pub gateway: Arc<TutorGateway>,
    pub view: ViewState,
    pub session: Option<Session>,
    pub randomize: bool,
    pub import_policy: ImportPolicy,
    pub export_dir: PathBuf,
    pub tutor: TutorPanel,
    pub tutor_timeout: Duration,
    pub status_message: String,
}

impl App {
    pub fn new(store: BankStore, gateway: Arc<TutorGateway>) -> Self {
        Self {
            store,
            gateway,
            view: ViewState::default(),
            session: None,
            randomize: false,
            import_policy: ImportPolicy::default(),
            export_dir: PathBuf::from("."),
            tutor: TutorPanel::Hidden,
            tutor_timeout: Duration::from_secs(crate::core::config::DEFAULT_TUTOR_TIMEOUT_SECS),
            status_message: String::from("Welcome to quizdeck!"),
        }
    }

    pub fn from_config(store: BankStore, gateway: Arc<TutorGateway>, config: &ResolvedConfig) -> Self {
        Self {
            randomize: config.randomize,
            import_policy: config.import_policy,
            export_dir: config.export_dir.clone(),
            tutor_timeout: Duration::from_secs(config.tutor_timeout_secs),
            ..Self::new(store, gateway)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view::Mode;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let (app, _dir) = test_app();
        assert_eq!(app.status_message, "Welcome to quizdeck!");
        assert_eq!(app.view.mode, Mode::Menu);
        assert!(app.session.is_none());
        assert!(!app.randomize);
        assert_eq!(app.tutor, TutorPanel::Hidden);
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn test_tutor_panel_pending_request() {
        let id = RequestId::new();
        let panel = TutorPanel::Loading {
            request_id: id,
            question_index: 0,
        };
        assert!(panel.is_loading());
        assert_eq!(panel.pending_request(), Some(id));
        assert_eq!(TutorPanel::Hidden.pending_request(), None);
    }
}
