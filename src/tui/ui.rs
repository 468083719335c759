//! Frame layout: title line, the current screen, then any overlay on top.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::core::store::export_payload;
use crate::core::view::{Mode, Overlay};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{ExportView, Menu, QuizView, TitleBar, dialogs};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let [title_area, main_area] = Layout::vertical([Length(1), Min(0)]).areas(frame.area());

    let tutor_model = app
        .gateway
        .is_configured()
        .then(|| app.gateway.model().to_string());
    TitleBar::new(app.view.mode.label(), tutor_model, app.status_message.clone())
        .render(frame, title_area);

    match app.view.mode {
        Mode::Menu => {
            Menu::new(&mut tui.menu, app.store.bank(), app.randomize).render(frame, main_area)
        }
        Mode::Quiz => {
            if let Some(session) = app.session.as_ref() {
                QuizView {
                    session,
                    tutor: &app.tutor,
                    option_cursor: tui.option_cursor,
                    tutor_available: app.gateway.is_configured(),
                    spinner_frame,
                }
                .render(frame, main_area);
            }
        }
        Mode::Import => tui.import_editor.render(frame, main_area),
        Mode::Export => {
            let payload = export_payload(app.store.bank());
            ExportView::new(&mut tui.export_view, &payload).render(frame, main_area);
        }
    }

    match &app.view.overlay {
        None => {}
        Some(Overlay::Confirm(purpose)) => dialogs::render_confirm(frame, main_area, *purpose),
        Some(Overlay::Alert(message)) => dialogs::render_alert(frame, main_area, message),
        Some(Overlay::Summary) => {
            if let Some(session) = app.session.as_ref() {
                dialogs::render_summary(frame, main_area, session.category(), &session.score());
            }
        }
    }
}
