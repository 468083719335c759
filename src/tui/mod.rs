//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into core `Action` values, and performs the
//! `Effect`s that `update()` returns.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Effects
//!
//! ```text
//! key ─► route_event ─► Action ─► update ─► Effect
//!                                              │
//!   PersistBank / ResetBank / WriteExport ─────┤ run here, result fed back
//!   SpawnExplanation ──────── tokio task ──────┘ as Action over mpsc
//! ```
//!
//! Store effects run synchronously on the UI thread; they are single small
//! files. Explanations run on tokio with a deadline and report back through
//! the channel, tagged with their `RequestId`.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (tutor request in flight): draws every ~80ms for the spinner.
//! - **Idle**: sleeps up to 500ms, only redraws on events or background results.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;

use crate::core::action::{Action, BankChange, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, RequestId};
use crate::core::store::BankStore;
use crate::core::view::{Mode, Overlay};
use crate::tutor::{
    ExplainRequest, LmStudioProvider, OpenRouterProvider, SERVICE_ERROR_MESSAGE, TutorGateway,
    TutorProvider,
};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    EditorEvent, ExportEvent, ExportViewState, ImportEditor, MenuEvent, MenuState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub menu: MenuState,
    /// Highlighted option on the current question
    pub option_cursor: usize,
    pub import_editor: ImportEditor,
    pub export_view: ExportViewState,
    /// (mode, question index) at the last sync, to reset per-screen state on change
    last_seen: (Mode, Option<usize>),
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            menu: MenuState::new(),
            option_cursor: 0,
            import_editor: ImportEditor::new(),
            export_view: ExportViewState::new(),
            last_seen: (Mode::Menu, None),
        }
    }

    /// Resets per-screen presentation state when the screen or question changed.
    pub fn sync(&mut self, app: &App) {
        let now = (
            app.view.mode,
            app.session.as_ref().map(|s| s.current_index()),
        );
        if now == self.last_seen {
            return;
        }
        if now.0 != self.last_seen.0 {
            match now.0 {
                Mode::Import => self.import_editor.clear(),
                Mode::Export => self.export_view = ExportViewState::new(),
                Mode::Menu | Mode::Quiz => {}
            }
        }
        self.option_cursor = 0;
        self.last_seen = now;
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,                        // Show cursor for the import editor
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste, Hide);
    }
}

/// Build the tutor gateway from a resolved config. A missing OpenRouter key
/// yields a gateway with no provider, which answers with the missing-credential
/// text instead of calling out.
pub fn build_gateway(config: &ResolvedConfig) -> TutorGateway {
    let provider: Option<Arc<dyn TutorProvider>> = match config.provider.as_str() {
        "lmstudio" => Some(Arc::new(LmStudioProvider::new(Some(
            config.lmstudio_base_url.clone(),
        )))),
        other => {
            if other != "openrouter" {
                warn!("Unknown provider '{}', falling back to openrouter", other);
            }
            match config.openrouter_api_key.clone() {
                Some(key) => Some(Arc::new(OpenRouterProvider::new(
                    key,
                    Some(config.openrouter_base_url.clone()),
                ))),
                None => {
                    info!("No OpenRouter API key; tutor disabled");
                    None
                }
            }
        }
    };
    TutorGateway::new(
        provider,
        config.model_name.clone(),
        config.system_prompt.clone(),
        config.temperature,
    )
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let store = BankStore::open(config.bank_path.clone());
    let gateway = Arc::new(build_gateway(&config));
    let mut app = App::from_config(store, gateway, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // The in-flight explanation task, aborted once its reply is no longer wanted
    let mut active_request: Option<(RequestId, tokio::task::JoinHandle<()>)> = None;

    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        tui.sync(&app);
        let animating = app.tutor.is_loading();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = route_event(&app, &mut tui, &event)
                && dispatch(&mut app, action, &tx, &mut active_request)
            {
                should_quit = true;
                break;
            }
            tui.sync(&app);
        }

        if should_quit {
            break;
        }

        // Handle background task actions (explanations)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, action, &tx, &mut active_request) {
                should_quit = true;
            }
        }
        if should_quit {
            break;
        }

        // Navigation or a newer request made the running task's reply moot.
        if let Some((id, handle)) = active_request.take() {
            if app.tutor.pending_request() == Some(id) && !handle.is_finished() {
                active_request = Some((id, handle));
            } else if !handle.is_finished() {
                debug!("Aborting explanation {}", id);
                handle.abort();
            }
        }
    }

    if let Some((_, handle)) = active_request {
        handle.abort();
    }
    info!("quizdeck shutting down");
    ratatui::restore();
    Ok(())
}

/// Runs `action` through `update` and performs the resulting effects until
/// none remain. Returns `true` when the app should quit.
fn dispatch(
    app: &mut App,
    action: Action,
    tx: &mpsc::Sender<Action>,
    active_request: &mut Option<(RequestId, tokio::task::JoinHandle<()>)>,
) -> bool {
    let mut next = Some(action);
    while let Some(action) = next.take() {
        match update(app, action) {
            Effect::None => {}
            Effect::Quit => return true,
            Effect::SpawnExplanation {
                request_id,
                request,
            } => {
                if let Some((_, old)) = active_request.take() {
                    old.abort();
                }
                let handle = spawn_explanation(
                    Arc::clone(&app.gateway),
                    app.tutor_timeout,
                    request_id,
                    request,
                    tx.clone(),
                );
                *active_request = Some((request_id, handle));
            }
            effect => next = perform_store_effect(app, effect),
        }
    }
    false
}

/// Performs an effect that touches the store or the filesystem and returns
/// the action reporting its outcome.
fn perform_store_effect(app: &mut App, effect: Effect) -> Option<Action> {
    match effect {
        Effect::PersistBank {
            bank,
            imported_categories,
        } => Some(match app.store.save(bank) {
            Ok(()) => Action::BankSaved(BankChange::Imported {
                categories: imported_categories,
            }),
            Err(e) => {
                warn!("Failed to save bank: {}", e);
                Action::PersistFailed(e.to_string())
            }
        }),
        Effect::ResetBank => Some(match app.store.reset() {
            Ok(_) => Action::BankSaved(BankChange::Reset),
            Err(e) => {
                warn!("Failed to reset bank: {}", e);
                Action::PersistFailed(e.to_string())
            }
        }),
        Effect::WriteExport => Some(match app.store.export_to_file(&app.export_dir) {
            Ok(path) => Action::ExportWritten(path),
            Err(e) => {
                warn!("Failed to write export: {}", e);
                Action::PersistFailed(e.to_string())
            }
        }),
        Effect::None | Effect::Quit | Effect::SpawnExplanation { .. } => None,
    }
}

fn spawn_explanation(
    gateway: Arc<TutorGateway>,
    deadline: Duration,
    request_id: RequestId,
    request: ExplainRequest,
    tx: mpsc::Sender<Action>,
) -> tokio::task::JoinHandle<()> {
    info!(
        "Spawning explanation {} via {} ({})",
        request_id,
        gateway.provider_name(),
        gateway.model()
    );
    tokio::spawn(async move {
        let text = match tokio::time::timeout(deadline, gateway.explain(&request)).await {
            Ok(text) => text,
            Err(_) => {
                warn!(
                    "Explanation {} timed out after {}s",
                    request_id,
                    deadline.as_secs()
                );
                SERVICE_ERROR_MESSAGE.to_string()
            }
        };
        if tx
            .send(Action::ExplanationReady { request_id, text })
            .is_err()
        {
            warn!(
                "Failed to deliver explanation {}: receiver dropped",
                request_id
            );
        }
    })
}

/// Maps a terminal event to an action for the current screen and overlay.
/// Presentation-only keys (cursor moves, editing) are handled here and
/// return `None`.
fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }
    if matches!(event, TuiEvent::Resize) {
        return None;
    }

    if let Some(overlay) = &app.view.overlay {
        return match (overlay, event) {
            (Overlay::Confirm(_), TuiEvent::InputChar('y' | 'Y') | TuiEvent::Submit) => {
                Some(Action::Confirm)
            }
            (Overlay::Confirm(_), TuiEvent::InputChar('n' | 'N') | TuiEvent::Escape) => {
                Some(Action::Cancel)
            }
            (Overlay::Alert(_), TuiEvent::Submit | TuiEvent::Escape | TuiEvent::InputChar(_)) => {
                Some(Action::DismissAlert)
            }
            (Overlay::Summary, TuiEvent::InputChar('r')) => Some(Action::Restart),
            (Overlay::Summary, TuiEvent::InputChar('m') | TuiEvent::Escape | TuiEvent::Submit) => {
                Some(Action::BackToMenu)
            }
            _ => None,
        };
    }

    match app.view.mode {
        Mode::Menu => match tui.menu.handle_event(event, app.store.bank())? {
            MenuEvent::Start(category) => Some(Action::StartQuiz(category)),
            MenuEvent::ToggleRandom => Some(Action::ToggleRandom),
            MenuEvent::Import => Some(Action::OpenImport),
            MenuEvent::Export => Some(Action::OpenExport),
            MenuEvent::DeleteAll => Some(Action::RequestDeleteAll),
            MenuEvent::Quit => Some(Action::Quit),
        },
        Mode::Quiz => route_quiz_event(app, tui, event),
        Mode::Import => match tui.import_editor.handle_event(event)? {
            EditorEvent::Submit(text) => Some(Action::SubmitImport(text)),
            EditorEvent::Cancel => Some(Action::BackToMenu),
            EditorEvent::Changed => None,
        },
        Mode::Export => match tui.export_view.handle_event(event)? {
            ExportEvent::WriteFile => Some(Action::ExportToFile),
            ExportEvent::Back => Some(Action::BackToMenu),
        },
    }
}

fn route_quiz_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    let session = app.session.as_ref()?;
    let option_count = session
        .current_question()
        .map(|q| q.options.len())
        .unwrap_or(0);
    let answered = session.current_answer().is_some();
    match event {
        TuiEvent::Escape => Some(Action::BackToMenu),
        TuiEvent::CursorUp => {
            tui.option_cursor = tui.option_cursor.saturating_sub(1);
            None
        }
        TuiEvent::CursorDown => {
            if tui.option_cursor + 1 < option_count {
                tui.option_cursor += 1;
            }
            None
        }
        TuiEvent::Submit if !answered && option_count > 0 => {
            Some(Action::SubmitAnswer(tui.option_cursor))
        }
        TuiEvent::Submit | TuiEvent::CursorRight | TuiEvent::InputChar('n') => Some(Action::Next),
        TuiEvent::CursorLeft | TuiEvent::InputChar('p') => Some(Action::Previous),
        TuiEvent::InputChar('t') => Some(Action::RequestExplanation),
        TuiEvent::InputChar('e') => Some(Action::RequestEndEarly),
        TuiEvent::InputChar(c @ '1'..='9') => {
            let index = (*c as usize) - ('1' as usize);
            (index < option_count).then_some(Action::SubmitAnswer(index))
        }
        _ => None,
    }
}
