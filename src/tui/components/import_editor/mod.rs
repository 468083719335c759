//! # ImportEditor Component
//!
//! Full-height text area for pasting a question bank.
//!
//! Enter inserts a newline (pasted JSON is multi-line). Ctrl+S emits
//! `EditorEvent::Submit` with the whole buffer; the buffer is kept so a
//! rejected import can be fixed in place. Esc emits `Cancel`.
//!
//! Paste arrives as one bracketed-paste event, so large payloads don't go
//! through the per-character path.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::EditorCursor;
use text_wrap::{
    inner_width, next_char_boundary, next_word_boundary, prev_char_boundary, prev_word_boundary,
    visible_rows, wrap_line_count, wrap_options,
};

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Submit(String),
    Cancel,
    Changed,
}

pub struct ImportEditor {
    pub buffer: String,
    cursor: EditorCursor,
}

impl Default for ImportEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportEditor {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: EditorCursor::new(),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor.reset();
    }

    fn insert(&mut self, text: &str) {
        // Terminals deliver pasted newlines as \r\n or \r.
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        self.buffer.insert_str(self.cursor.pos, &text);
        self.cursor.pos += text.len();
    }

    fn visible_lines(&self, area: Rect) -> Vec<Line<'static>> {
        let width = inner_width(area.width);
        if width == 0 {
            return Vec::new();
        }
        textwrap::wrap(&self.buffer, wrap_options(width))
            .into_iter()
            .skip(self.cursor.scroll_offset as usize)
            .take(visible_rows(area.height) as usize)
            .map(|l| Line::from(l.into_owned()))
            .collect()
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        let total = wrap_line_count(&self.buffer, inner_width(area.width));
        let rows = visible_rows(area.height);
        if total <= rows {
            return;
        }
        let mut state = ScrollbarState::default()
            .content_length(total.saturating_sub(rows) as usize)
            .position(self.cursor.scroll_offset as usize);
        let track = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            track,
            &mut state,
        );
    }
}

impl Component for ImportEditor {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_area = area;
        self.cursor.follow(&self.buffer, area);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(" Import: paste JSON ")
            .title_bottom(Line::from(" Ctrl+S Import  Esc Back ").centered());

        let body = if self.buffer.is_empty() {
            Paragraph::new(Line::from(
                r#"{"Category": [{"q": "Question?", "a": ["A", "B"], "c": 0}]}"#,
            ))
            .style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.visible_lines(area)).style(Style::default().fg(Color::Green))
        };
        frame.render_widget(body.block(block), area);
        self.render_scrollbar(frame, area);

        frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
    }
}

impl EventHandler for ImportEditor {
    type Event = EditorEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let pos = self.cursor.pos;
        let moved = |editor: &mut Self, to: usize| {
            (to != pos).then(|| {
                editor.cursor.pos = to;
                EditorEvent::Changed
            })
        };
        match event {
            TuiEvent::Save => Some(EditorEvent::Submit(self.buffer.clone())),
            TuiEvent::Escape => Some(EditorEvent::Cancel),
            TuiEvent::InputChar(c) => {
                self.insert(c.encode_utf8(&mut [0; 4]));
                Some(EditorEvent::Changed)
            }
            TuiEvent::Submit => {
                self.insert("\n");
                Some(EditorEvent::Changed)
            }
            TuiEvent::Paste(text) => {
                self.insert(text);
                Some(EditorEvent::Changed)
            }
            TuiEvent::Backspace if pos > 0 => {
                let prev = prev_char_boundary(&self.buffer, pos);
                self.buffer.drain(prev..pos);
                self.cursor.pos = prev;
                Some(EditorEvent::Changed)
            }
            TuiEvent::Delete if pos < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, pos);
                self.buffer.drain(pos..next);
                Some(EditorEvent::Changed)
            }
            TuiEvent::CursorLeft if pos > 0 => {
                let to = prev_char_boundary(&self.buffer, pos);
                moved(self, to)
            }
            TuiEvent::CursorRight if pos < self.buffer.len() => {
                let to = next_char_boundary(&self.buffer, pos);
                moved(self, to)
            }
            TuiEvent::WordLeft => {
                let to = prev_word_boundary(&self.buffer, pos);
                moved(self, to)
            }
            TuiEvent::WordRight => {
                let to = next_word_boundary(&self.buffer, pos);
                moved(self, to)
            }
            TuiEvent::CursorHome => {
                let to = self.buffer[..pos].rfind('\n').map_or(0, |i| i + 1);
                moved(self, to)
            }
            TuiEvent::CursorEnd => {
                let to = self.buffer[pos..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| pos + i);
                moved(self, to)
            }
            TuiEvent::CursorUp => self
                .cursor
                .move_rows(&self.buffer, -1)
                .then_some(EditorEvent::Changed),
            TuiEvent::CursorDown => self
                .cursor
                .move_rows(&self.buffer, 1)
                .then_some(EditorEvent::Changed),
            TuiEvent::PageUp => {
                let page = visible_rows(self.cursor.last_area.height) as i32;
                self.cursor
                    .move_rows(&self.buffer, -page)
                    .then_some(EditorEvent::Changed)
            }
            TuiEvent::PageDown => {
                let page = visible_rows(self.cursor.last_area.height) as i32;
                self.cursor
                    .move_rows(&self.buffer, page)
                    .then_some(EditorEvent::Changed)
            }
            _ => None,
        }
    }
}
