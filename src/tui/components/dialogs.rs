//! # Dialogs
//!
//! The three overlays drawn on top of the current screen: confirm, alert,
//! and the end-of-run summary. All stateless.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

use crate::core::session::ScoreResult;
use crate::core::view::ConfirmPurpose;

pub fn render_confirm(frame: &mut Frame, area: Rect, purpose: ConfirmPurpose) {
    let body = vec![
        Line::from(purpose.prompt()),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes    "),
            Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]),
    ];
    let color = match purpose {
        ConfirmPurpose::DeleteAll => Color::Red,
        ConfirmPurpose::EndEarly => Color::Yellow,
    };
    render_box(frame, area, " Confirm ", color, body);
}

pub fn render_alert(frame: &mut Frame, area: Rect, message: &str) {
    let mut body: Vec<Line> = message.lines().map(Line::from).collect();
    body.push(Line::from(""));
    body.push(Line::styled("Enter OK", Style::default().fg(Color::DarkGray)));
    render_box(frame, area, " Notice ", Color::Cyan, body);
}

pub fn render_summary(frame: &mut Frame, area: Rect, category: &str, score: &ScoreResult) {
    let verdict = match score.accuracy_percent {
        _ if score.answered_count == 0 => "No answers yet.",
        90.. => "Excellent!",
        70..=89 => "Good work.",
        _ => "Keep practising.",
    };
    let body = vec![
        Line::styled(
            category.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!(
            "Correct: {} / {} answered",
            score.correct_count, score.answered_count
        )),
        Line::from(format!("Answered: {} of {}", score.answered_count, score.total_count)),
        Line::styled(
            format!("Accuracy: {}%", score.accuracy_percent),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(verdict),
        Line::from(""),
        Line::styled("r Restart    m Menu", Style::default().fg(Color::DarkGray)),
    ];
    render_box(frame, area, " Results ", Color::Green, body);
}

fn render_box(frame: &mut Frame, area: Rect, title: &str, color: Color, body: Vec<Line>) {
    let height = (body.len() as u16 + 4).min(area.height);
    let overlay = centered_rect(60, height, area);
    frame.render_widget(Clear, overlay);
    let paragraph = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .title(title.to_string()),
        );
    frame.render_widget(paragraph, overlay);
}

/// A rect `percent_x` wide and `height` rows tall, centered in `outer`.
pub fn centered_rect(percent_x: u16, height: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(f: impl FnOnce(&mut Frame)) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(f).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let r = centered_rect(60, 10, outer);
        assert_eq!(r.height, 10);
        assert_eq!(r.width, 60);
        assert_eq!(r.y, 15);
    }

    #[test]
    fn test_summary_shows_score() {
        let score = ScoreResult {
            correct_count: 2,
            answered_count: 3,
            total_count: 5,
            accuracy_percent: 67,
        };
        let text = draw(|f| render_summary(f, f.area(), "Math", &score));
        assert!(text.contains("Correct: 2 / 3 answered"));
        assert!(text.contains("Answered: 3 of 5"));
        assert!(text.contains("Accuracy: 67%"));
        assert!(text.contains("Keep practising."));
    }

    #[test]
    fn test_summary_with_no_answers() {
        let score = ScoreResult {
            total_count: 4,
            ..ScoreResult::default()
        };
        let text = draw(|f| render_summary(f, f.area(), "Math", &score));
        assert!(text.contains("Accuracy: 0%"));
        assert!(text.contains("No answers yet."));
    }

    #[test]
    fn test_confirm_shows_prompt() {
        let text = draw(|f| render_confirm(f, f.area(), ConfirmPurpose::EndEarly));
        assert!(text.contains("End this practice run now"));
        assert!(text.contains("y Yes"));
    }

    #[test]
    fn test_alert_shows_message() {
        let text = draw(|f| render_alert(f, f.area(), "Exported to /tmp/x.json"));
        assert!(text.contains("Exported to /tmp/x.json"));
    }
}
