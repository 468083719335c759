use std::path::PathBuf;
use std::sync::Arc;

use quizdeck::core::action::{Action, BankChange, Effect, update};
use quizdeck::core::bank::QuestionBank;
use quizdeck::core::state::App;
use quizdeck::core::store::{BankStore, ImportPolicy, export_payload, parse_import_payload};
use quizdeck::core::view::{Mode, Overlay};
use quizdeck::tutor::TutorGateway;
use tempfile::{TempDir, tempdir};

// ============================================================================
// Helper Functions
// ============================================================================

const GEOGRAPHY: &str = r#"Sure! Here is your quiz:
{
  "Geography": [
    {"q": "Capital of France?", "a": ["Berlin", "Paris", "Rome"], "c": 1},
    {"q": "Largest ocean?", "a": ["Pacific", "Atlantic"], "c": 0},
    {"q": "Longest river?", "a": ["Nile", "Danube"], "c": 0}
  ]
}
Good luck!"#;

/// Runs an action and performs store effects inline, the way the terminal
/// loop does.
fn drive(app: &mut App, action: Action) {
    let mut next = Some(action);
    while let Some(action) = next.take() {
        next = match update(app, action) {
            Effect::PersistBank {
                bank,
                imported_categories,
            } => Some(match app.store.save(bank) {
                Ok(()) => Action::BankSaved(BankChange::Imported {
                    categories: imported_categories,
                }),
                Err(e) => Action::PersistFailed(e.to_string()),
            }),
            Effect::ResetBank => Some(match app.store.reset() {
                Ok(_) => Action::BankSaved(BankChange::Reset),
                Err(e) => Action::PersistFailed(e.to_string()),
            }),
            _ => None,
        };
    }
}

fn bank_path(dir: &TempDir) -> PathBuf {
    dir.path().join("bank.json")
}

fn fresh_app(dir: &TempDir) -> App {
    App::new(
        BankStore::open(bank_path(dir)),
        Arc::new(TutorGateway::unconfigured()),
    )
}

// ============================================================================
// Flow Tests
// ============================================================================

#[test]
fn test_import_then_play_then_score() {
    let dir = tempdir().unwrap();
    let mut app = fresh_app(&dir);

    drive(&mut app, Action::OpenImport);
    drive(&mut app, Action::SubmitImport(GEOGRAPHY.to_string()));
    assert_eq!(app.view.mode, Mode::Menu);
    drive(&mut app, Action::DismissAlert);

    let categories: Vec<&str> = app.store.bank().categories().collect();
    assert_eq!(categories, vec!["Getting Started", "Geography"]);

    drive(&mut app, Action::StartQuiz("Geography".to_string()));
    assert!(app.view.is_bare(Mode::Quiz));

    drive(&mut app, Action::SubmitAnswer(1)); // correct
    drive(&mut app, Action::Next);
    drive(&mut app, Action::SubmitAnswer(1)); // wrong
    drive(&mut app, Action::Next);
    drive(&mut app, Action::SubmitAnswer(0)); // correct
    drive(&mut app, Action::Next);

    assert_eq!(app.view.overlay, Some(Overlay::Summary));
    let score = app.session.as_ref().unwrap().score();
    assert_eq!(score.correct_count, 2);
    assert_eq!(score.answered_count, 3);
    assert_eq!(score.total_count, 3);
    assert_eq!(score.accuracy_percent, 67);
}

#[test]
fn test_end_early_scores_answered_only() {
    let dir = tempdir().unwrap();
    let mut app = fresh_app(&dir);
    drive(&mut app, Action::OpenImport);
    drive(&mut app, Action::SubmitImport(GEOGRAPHY.to_string()));
    drive(&mut app, Action::DismissAlert);

    drive(&mut app, Action::StartQuiz("Geography".to_string()));
    drive(&mut app, Action::SubmitAnswer(0)); // wrong
    drive(&mut app, Action::RequestEndEarly);
    drive(&mut app, Action::Confirm);

    assert_eq!(app.view.overlay, Some(Overlay::Summary));
    let score = app.session.as_ref().unwrap().score();
    assert_eq!((score.correct_count, score.answered_count), (0, 1));
    assert_eq!(score.accuracy_percent, 0);

    drive(&mut app, Action::Restart);
    assert!(app.view.is_bare(Mode::Quiz));
    assert_eq!(app.session.as_ref().unwrap().score().answered_count, 0);
}

#[test]
fn test_imported_bank_survives_restart_and_delete_all_clears_it() {
    let dir = tempdir().unwrap();
    {
        let mut app = fresh_app(&dir);
        drive(&mut app, Action::OpenImport);
        drive(&mut app, Action::SubmitImport(GEOGRAPHY.to_string()));
    }

    let mut app = fresh_app(&dir);
    assert!(app.store.bank().contains("Geography"));

    drive(&mut app, Action::RequestDeleteAll);
    drive(&mut app, Action::Confirm);
    assert_eq!(app.store.bank(), &QuestionBank::builtin());
    assert!(!bank_path(&dir).exists());
}

#[test]
fn test_permissive_import_survives_restart() {
    let dir = tempdir().unwrap();
    {
        let mut app = fresh_app(&dir);
        app.import_policy = ImportPolicy::Permissive;
        drive(&mut app, Action::OpenImport);
        drive(&mut app, Action::SubmitImport(GEOGRAPHY.to_string()));
        drive(&mut app, Action::DismissAlert);
        drive(&mut app, Action::OpenImport);
        drive(
            &mut app,
            Action::SubmitImport(r#"{"Bad": [{"q": "?", "a": ["x", "y"], "c": 5}]}"#.to_string()),
        );
        let categories: Vec<&str> = app.store.bank().categories().collect();
        assert_eq!(categories, vec!["Getting Started", "Geography", "Bad"]);
    }

    let mut app = fresh_app(&dir);
    let categories: Vec<&str> = app.store.bank().categories().collect();
    assert_eq!(categories, vec!["Getting Started", "Geography", "Bad"]);

    // The malformed question is refused when played, the rest still works.
    drive(&mut app, Action::StartQuiz("Bad".to_string()));
    drive(&mut app, Action::SubmitAnswer(0));
    assert!(matches!(app.view.overlay, Some(Overlay::Alert(_))));
    assert_eq!(app.session.as_ref().unwrap().score().answered_count, 0);
}

#[test]
fn test_strict_import_rejects_bad_question_and_keeps_bank() {
    let dir = tempdir().unwrap();
    let mut app = fresh_app(&dir);
    drive(&mut app, Action::OpenImport);
    drive(
        &mut app,
        Action::SubmitImport(r#"{"Bad": [{"q": "?", "a": ["only"], "c": 0}]}"#.to_string()),
    );

    assert_eq!(app.view.mode, Mode::Import);
    let Some(Overlay::Alert(message)) = &app.view.overlay else {
        panic!("expected an alert");
    };
    assert!(message.starts_with("Import failed"));
    assert!(!app.store.bank().contains("Bad"));
    assert!(!bank_path(&dir).exists());
}

#[test]
fn test_export_payload_imports_back_to_same_bank() {
    let bank = parse_import_payload(GEOGRAPHY, ImportPolicy::Strict).unwrap();
    let merged = QuestionBank::builtin().merge(&bank);
    let again = parse_import_payload(&export_payload(&merged), ImportPolicy::Strict).unwrap();
    assert_eq!(again, merged);
}
