//! # Export View
//!
//! Read-only, scrollable JSON of the current bank. The same text is what
//! Ctrl+S writes to the export directory, and it imports back unchanged.

use ratatui::Frame;
use ratatui::layout::{Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::tui::event::TuiEvent;

/// Scroll position, kept in `TuiState` across frames.
#[derive(Default)]
pub struct ExportViewState {
    pub scroll_state: ScrollViewState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent {
    WriteFile,
    Back,
}

impl ExportViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<ExportEvent> {
        match event {
            TuiEvent::CursorUp => self.scroll_state.scroll_up(),
            TuiEvent::CursorDown => self.scroll_state.scroll_down(),
            TuiEvent::PageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::PageDown => self.scroll_state.scroll_page_down(),
            TuiEvent::CursorHome => self.scroll_state.scroll_to_top(),
            TuiEvent::CursorEnd => self.scroll_state.scroll_to_bottom(),
            TuiEvent::Save | TuiEvent::InputChar('w') => return Some(ExportEvent::WriteFile),
            TuiEvent::Escape | TuiEvent::InputChar('q') => return Some(ExportEvent::Back),
            _ => {}
        }
        None
    }
}

pub struct ExportView<'a> {
    state: &'a mut ExportViewState,
    payload: &'a str,
}

impl<'a> ExportView<'a> {
    pub fn new(state: &'a mut ExportViewState, payload: &'a str) -> Self {
        Self { state, payload }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(" Export ")
            .title_bottom(Line::from(" ↑/↓ Scroll  Ctrl+S Write file  Esc Back ").centered());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = self.payload.lines().map(Line::from).collect();
        let width = inner.width.saturating_sub(1);
        let height = lines.len() as u16;

        let mut scroll_view = ScrollView::new(Size::new(width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            Paragraph::new(lines).style(Style::default().fg(Color::Green)),
            Rect::new(0, 0, width, height),
        );
        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}
