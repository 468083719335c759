//! # TitleBar Component
//!
//! Top line: app name, current screen, tutor model, and the status message.
//!
//! ```text
//! quizdeck · Quiz · tutor: google/gemini-2.5-flash | Correct!
//! quizdeck · Menu · tutor: off | Random order on
//! ```
//!
//! Stateless. All fields are props. Text wider than the area is cut on a
//! display-width boundary and ends with `…`, so CJK question categories in the
//! status message don't spill past the edge.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;

use crate::tui::component::Component;

pub struct TitleBar {
    pub screen: &'static str,
    /// `None` when no tutor provider is configured
    pub tutor_model: Option<String>,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(screen: &'static str, tutor_model: Option<String>, status_message: String) -> Self {
        Self {
            screen,
            tutor_model,
            status_message,
        }
    }

    fn text(&self) -> String {
        let tutor = self.tutor_model.as_deref().unwrap_or("off");
        if self.status_message.is_empty() {
            format!("quizdeck · {} · tutor: {}", self.screen, tutor)
        } else {
            format!(
                "quizdeck · {} · tutor: {} | {}",
                self.screen, tutor, self.status_message
            )
        }
    }
}

/// Cuts `s` to at most `max` display columns, marking the cut with `…`.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    let total: usize = s.chars().filter_map(|c| c.width()).sum();
    if total <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text = truncate_to_width(&self.text(), area.width as usize);
        frame.render_widget(
            Span::styled(text, Style::default().fg(Color::Gray)),
            area,
        );
    }
}
