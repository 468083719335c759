//! # Actions
//!
//! Everything that can happen in quizdeck becomes an `Action`.
//! User picks option B? That's `Action::SubmitAnswer(1)`.
//! The tutor replies? That's `Action::ExplanationReady { .. }`.
//!
//! `update()` takes the current state and an action, mutates the state, and
//! returns an `Effect` describing the I/O the adapter must perform. The
//! adapter reports the outcome of that I/O as another action.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//!                                                │
//!            adapter runs it, dispatches ◄───────┘
//!            BankSaved / PersistFailed / ExportWritten / ExplanationReady
//! ```
//!
//! While an overlay is open only overlay actions and background results are
//! accepted. Everything else is ignored.

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::core::bank::QuestionBank;
use crate::core::session::{AnswerOutcome, Session};
use crate::core::state::{App, RequestId, TutorPanel};
use crate::core::store::parse_import_payload;
use crate::core::view::{ConfirmPurpose, Mode, Overlay};
use crate::tutor::ExplainRequest;

/// Which persisted change just landed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankChange {
    Imported { categories: usize },
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Menu
    ToggleRandom,
    StartQuiz(String),
    RequestDeleteAll,
    OpenImport,
    OpenExport,

    // Quiz
    SubmitAnswer(usize),
    Next,
    Previous,
    RequestEndEarly,
    RequestExplanation,
    Restart,

    // Import / export
    SubmitImport(String),
    ExportToFile,

    // Overlays
    Confirm,
    Cancel,
    DismissAlert,

    // Any screen
    BackToMenu,
    Quit,

    // Background results
    ExplanationReady { request_id: RequestId, text: String },
    BankSaved(BankChange),
    PersistFailed(String),
    ExportWritten(PathBuf),
}

/// I/O the adapter performs after `update()` returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Save this bank through the store, then report `BankSaved(Imported)`.
    PersistBank {
        bank: QuestionBank,
        imported_categories: usize,
    },
    /// Delete the saved bank, then report `BankSaved(Reset)`.
    ResetBank,
    /// Write the current bank to the export directory.
    WriteExport,
    SpawnExplanation {
        request_id: RequestId,
        request: ExplainRequest,
    },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Quit => Effect::Quit,

        Action::ExplanationReady { request_id, text } => {
            accept_explanation(app, request_id, text);
            Effect::None
        }
        Action::BankSaved(change) => {
            match change {
                BankChange::Imported { categories } => {
                    app.view.enter(Mode::Menu);
                    app.view.alert(format!(
                        "Import complete: {} categor{} merged into your bank.",
                        categories,
                        if categories == 1 { "y" } else { "ies" }
                    ));
                    app.status_message = "Bank saved".to_string();
                }
                BankChange::Reset => {
                    app.status_message = "Local question bank cleared".to_string();
                }
            }
            Effect::None
        }
        Action::PersistFailed(message) => {
            warn!("Persist failed: {}", message);
            app.view.alert(format!("Could not save: {}", message));
            app.status_message = "Save failed".to_string();
            Effect::None
        }
        Action::ExportWritten(path) => {
            app.view.alert(format!("Exported to {}", path.display()));
            app.status_message = "Export written".to_string();
            Effect::None
        }

        Action::Confirm => confirm(app),
        Action::Cancel => {
            if app.view.pending_confirm().is_some() {
                app.view.close_overlay();
            }
            Effect::None
        }
        Action::DismissAlert => {
            if matches!(app.view.overlay, Some(Overlay::Alert(_))) {
                app.view.close_overlay();
            }
            Effect::None
        }
        Action::Restart => {
            if app.view.overlay == Some(Overlay::Summary)
                && let Some(session) = app.session.as_mut()
            {
                session.restart();
                app.tutor = TutorPanel::Hidden;
                app.view.close_overlay();
                app.status_message = format!("Restarted {}", session.category());
            }
            Effect::None
        }
        Action::BackToMenu => {
            // Summary offers this too; alerts and confirms must be answered first.
            if matches!(
                app.view.overlay,
                Some(Overlay::Alert(_)) | Some(Overlay::Confirm(_))
            ) {
                return Effect::None;
            }
            back_to_menu(app);
            Effect::None
        }

        // Everything below needs a bare screen.
        _ if app.view.has_overlay() => {
            debug!("Ignoring {:?} while an overlay is open", action);
            Effect::None
        }

        Action::ToggleRandom => {
            if app.view.mode == Mode::Menu {
                app.randomize = !app.randomize;
                app.status_message = if app.randomize {
                    "Random order on".to_string()
                } else {
                    "Random order off".to_string()
                };
            }
            Effect::None
        }
        Action::StartQuiz(category) => {
            if app.view.mode == Mode::Menu {
                start_quiz(app, &category);
            }
            Effect::None
        }
        Action::RequestDeleteAll => {
            if app.view.mode == Mode::Menu {
                app.view.open(Overlay::Confirm(ConfirmPurpose::DeleteAll));
            }
            Effect::None
        }
        Action::OpenImport => {
            if app.view.mode == Mode::Menu {
                app.view.enter(Mode::Import);
                app.status_message = "Paste a JSON bank, Ctrl+S to import".to_string();
            }
            Effect::None
        }
        Action::OpenExport => {
            if app.view.mode == Mode::Menu {
                app.view.enter(Mode::Export);
                app.status_message = "Current bank as JSON".to_string();
            }
            Effect::None
        }

        Action::SubmitAnswer(option) => {
            if app.view.mode == Mode::Quiz {
                submit_answer(app, option);
            }
            Effect::None
        }
        Action::Next => {
            if app.view.mode != Mode::Quiz {
                return Effect::None;
            }
            let Some(session) = app.session.as_mut() else {
                return Effect::None;
            };
            if session.is_last() {
                app.view.open(Overlay::Summary);
            } else if session.advance() {
                app.tutor = TutorPanel::Hidden;
            }
            Effect::None
        }
        Action::Previous => {
            if app.view.mode == Mode::Quiz
                && let Some(session) = app.session.as_mut()
                && session.retreat()
            {
                app.tutor = TutorPanel::Hidden;
            }
            Effect::None
        }
        Action::RequestEndEarly => {
            if app.view.mode == Mode::Quiz && app.session.is_some() {
                app.view.open(Overlay::Confirm(ConfirmPurpose::EndEarly));
            }
            Effect::None
        }
        Action::RequestExplanation => {
            if app.view.mode == Mode::Quiz {
                request_explanation(app)
            } else {
                Effect::None
            }
        }

        Action::SubmitImport(raw) => {
            if app.view.mode == Mode::Import {
                submit_import(app, &raw)
            } else {
                Effect::None
            }
        }
        Action::ExportToFile => {
            if app.view.mode == Mode::Export {
                Effect::WriteExport
            } else {
                Effect::None
            }
        }
    }
}

fn confirm(app: &mut App) -> Effect {
    match app.view.pending_confirm() {
        Some(ConfirmPurpose::DeleteAll) => {
            app.view.close_overlay();
            app.status_message = "Clearing saved bank...".to_string();
            Effect::ResetBank
        }
        Some(ConfirmPurpose::EndEarly) => {
            app.view.open(Overlay::Summary);
            app.tutor = TutorPanel::Hidden;
            Effect::None
        }
        None => Effect::None,
    }
}

fn back_to_menu(app: &mut App) {
    app.session = None;
    app.tutor = TutorPanel::Hidden;
    app.view.enter(Mode::Menu);
    app.status_message = "Choose a category".to_string();
}

fn start_quiz(app: &mut App, category: &str) {
    app.tutor = TutorPanel::Hidden;
    match Session::start(category, app.store.bank(), app.randomize) {
        Ok(session) => {
            info!(
                "Starting {} ({} questions, random={})",
                category,
                session.len(),
                app.randomize
            );
            app.status_message = format!("{} · {} questions", category, session.len());
            app.session = Some(session);
            app.view.enter(Mode::Quiz);
        }
        Err(e) => {
            warn!("Cannot start quiz: {}", e);
            app.session = Some(Session::empty(category));
            app.view.enter(Mode::Quiz);
            app.view.alert(format!("Nothing to practise: {}.", e));
        }
    }
}

fn submit_answer(app: &mut App, option: usize) {
    let Some(session) = app.session.as_mut() else {
        return;
    };
    let index = session.current_index();
    let Some(question) = session.current_question() else {
        return;
    };
    if let Err(defect) = question.validate() {
        app.view.alert(format!(
            "Question {} is malformed ({}). Skip it with Next.",
            index + 1,
            defect
        ));
        return;
    }
    match session.submit_answer(index, option) {
        Ok(AnswerOutcome::Recorded { correct }) => {
            debug!("Question {} answered, correct={}", index + 1, correct);
            app.status_message = if correct {
                "Correct!".to_string()
            } else {
                "Not quite".to_string()
            };
        }
        Ok(AnswerOutcome::AlreadyAnswered) => {}
        Err(e) => debug!("Answer rejected: {}", e),
    }
}

fn request_explanation(app: &mut App) -> Effect {
    let Some(session) = app.session.as_ref() else {
        return Effect::None;
    };
    let index = session.current_index();
    let Some(question) = session.current_question() else {
        return Effect::None;
    };
    if session.current_answer().is_none() || question.validate().is_err() {
        return Effect::None;
    }
    if let TutorPanel::Loading { question_index, .. } = app.tutor
        && question_index == index
    {
        return Effect::None;
    }

    let request_id = RequestId::new();
    info!("Requesting explanation {} for question {}", request_id, index + 1);
    app.tutor = TutorPanel::Loading {
        request_id,
        question_index: index,
    };
    Effect::SpawnExplanation {
        request_id,
        request: ExplainRequest::from(question),
    }
}

fn accept_explanation(app: &mut App, request_id: RequestId, text: String) {
    match app.tutor {
        TutorPanel::Loading {
            request_id: pending,
            question_index,
        } if pending == request_id && app.view.mode == Mode::Quiz => {
            app.tutor = TutorPanel::Ready {
                question_index,
                text,
            };
        }
        _ => debug!("Discarding stale explanation {}", request_id),
    }
}

fn submit_import(app: &mut App, raw: &str) -> Effect {
    match parse_import_payload(raw, app.import_policy) {
        Ok(incoming) => {
            let imported_categories = incoming.category_count();
            let bank = app.store.bank().merge(&incoming);
            info!(
                "Import parsed: {} categories, {} questions",
                imported_categories,
                incoming.question_count()
            );
            app.status_message = "Saving...".to_string();
            Effect::PersistBank {
                bank,
                imported_categories,
            }
        }
        Err(e) => {
            warn!("Import rejected: {}", e);
            app.view.alert(format!("Import failed: {}", e));
            Effect::None
        }
    }
}
