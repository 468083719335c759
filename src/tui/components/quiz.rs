//! # Quiz Component
//!
//! One question at a time: progress gauge, question card, lettered options,
//! and the tutor panel below.
//!
//! ```text
//! ┌ Math · 2/10 ─────────────────────── 20% ┐
//! │ What is 7 × 8?                           │
//! │  (A) 54                                  │
//! │ ▸(B) 56  ✓                               │
//! │  (C) 58                                  │
//! ├ Tutor ───────────────────────────────────┤
//! │ **Key point:** ...                       │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Stateless; the option cursor lives in `TuiState`.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Gauge, Paragraph, Wrap};

use crate::core::bank::option_label;
use crate::core::session::Session;
use crate::core::state::TutorPanel;
use crate::tui::component::Component;
use crate::tui::markdown;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub struct QuizView<'a> {
    pub session: &'a Session,
    pub tutor: &'a TutorPanel,
    pub option_cursor: usize,
    pub tutor_available: bool,
    pub spinner_frame: usize,
}

impl QuizView<'_> {
    fn option_lines(&self) -> Vec<Line<'static>> {
        let Some(question) = self.session.current_question() else {
            return Vec::new();
        };
        let answer = self.session.current_answer();
        question
            .options
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let label = format!("({}) ", option_label(i));
                let pointer = if answer.is_none() && i == self.option_cursor {
                    "▸"
                } else {
                    " "
                };
                let (style, mark) = match answer {
                    None if i == self.option_cursor => (
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
                        "",
                    ),
                    None => (Style::default().fg(Color::Gray), ""),
                    Some(_) if question.is_correct(i) => {
                        (Style::default().fg(Color::Green).add_modifier(Modifier::BOLD), "  ✓")
                    }
                    Some(chosen) if chosen == i => {
                        (Style::default().fg(Color::Red).add_modifier(Modifier::BOLD), "  ✗")
                    }
                    Some(_) => (Style::default().fg(Color::DarkGray), ""),
                };
                Line::from(vec![
                    Span::raw(pointer),
                    Span::styled(format!("{label}{text}"), style),
                    Span::styled(mark, style),
                ])
            })
            .collect()
    }

    fn tutor_text(&self) -> Text<'static> {
        let index = self.session.current_index();
        match self.tutor {
            TutorPanel::Loading { question_index, .. } if *question_index == index => {
                let frame = SPINNER[self.spinner_frame % SPINNER.len()];
                Text::from(Line::styled(
                    format!("{frame} Asking the tutor..."),
                    Style::default().fg(Color::Yellow),
                ))
            }
            TutorPanel::Ready {
                question_index,
                text,
            } if *question_index == index => markdown::render(text, Color::Cyan),
            _ if self.session.current_answer().is_some() => {
                let hint = if self.tutor_available {
                    "Press t for an explanation."
                } else {
                    "Tutor is off. Set OPENROUTER_API_KEY or use --provider lmstudio."
                };
                Text::from(Line::styled(hint, Style::default().fg(Color::DarkGray)))
            }
            _ => Text::from(Line::styled(
                "Answer to unlock the tutor.",
                Style::default().fg(Color::DarkGray),
            )),
        }
    }
}

/// Rows for the options box: one per option plus borders, saturating.
fn options_height(option_count: usize) -> u16 {
    u16::try_from(option_count)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
}

impl Component for QuizView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let session = self.session;
        if session.is_empty() {
            let empty = Paragraph::new(format!(
                "\"{}\" has no questions.\n\nEsc to go back to the menu.",
                session.category()
            ))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::bordered().border_type(BorderType::Rounded));
            frame.render_widget(empty, area);
            return;
        }

        let Some(question) = session.current_question() else {
            return;
        };
        let options = self.option_lines();
        let [gauge_area, question_area, options_area, tutor_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(options_height(options.len())),
            Constraint::Percentage(40),
        ])
        .areas(area);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Blue).bg(Color::Black))
            .percent(u16::from(session.progress_percent()))
            .label(format!(
                "{} · {}/{}",
                session.category(),
                session.current_index() + 1,
                session.len()
            ));
        frame.render_widget(gauge, gauge_area);

        let card = match question.validate() {
            Ok(()) => Paragraph::new(question.text.as_str())
                .style(Style::default().add_modifier(Modifier::BOLD)),
            Err(defect) => Paragraph::new(vec![
                Line::from(question.text.as_str()),
                Line::from(""),
                Line::styled(
                    format!("This question is malformed ({defect}). Press n to skip it."),
                    Style::default().fg(Color::Red),
                ),
            ]),
        };
        frame.render_widget(
            card.wrap(Wrap { trim: true }).block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(format!(" Question {} ", session.current_index() + 1)),
            ),
            question_area,
        );

        frame.render_widget(
            Paragraph::new(options).block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(" Options ")
                    .title_bottom(
                        Line::from(format!(
                            " 1-9/Enter Answer  {}  t Explain  e End  Esc Menu ",
                            if session.is_last() { "← Back  → Finish" } else { "←/→ Move" }
                        ))
                        .centered(),
                    ),
            ),
            options_area,
        );

        frame.render_widget(
            Paragraph::new(self.tutor_text())
                .wrap(Wrap { trim: false })
                .block(
                    Block::bordered()
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(Color::DarkGray))
                        .title(" Tutor "),
                ),
            tutor_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bank::{Question, QuestionBank};
    use crate::core::state::RequestId;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn session() -> Session {
        let mut bank = QuestionBank::new();
        bank.insert(
            "Math",
            vec![
                Question::new("What is 7 x 8?", vec!["54".into(), "56".into()], 1),
                Question::new("What is 2 + 2?", vec!["4".into(), "5".into()], 0),
            ],
        );
        Session::start("Math", &bank, false).unwrap()
    }

    fn draw(view: &mut QuizView) -> String {
        let backend = TestBackend::new(70, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| view.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_renders_question_and_options() {
        let session = session();
        let mut view = QuizView {
            session: &session,
            tutor: &TutorPanel::Hidden,
            option_cursor: 0,
            tutor_available: true,
            spinner_frame: 0,
        };
        let text = draw(&mut view);
        assert!(text.contains("What is 7 x 8?"));
        assert!(text.contains("(A) 54"));
        assert!(text.contains("(B) 56"));
        assert!(text.contains("Math · 1/2"));
        assert!(text.contains("Answer to unlock the tutor."));
    }

    #[test]
    fn test_answered_question_marks_correct_and_wrong() {
        let mut session = session();
        session.submit_answer(0, 0).unwrap();
        let mut view = QuizView {
            session: &session,
            tutor: &TutorPanel::Hidden,
            option_cursor: 0,
            tutor_available: false,
            spinner_frame: 0,
        };
        let text = draw(&mut view);
        assert!(text.contains("(A) 54  ✗"));
        assert!(text.contains("(B) 56  ✓"));
        assert!(text.contains("Tutor is off."));
    }

    #[test]
    fn test_tutor_loading_and_ready() {
        let mut session = session();
        session.submit_answer(0, 1).unwrap();
        let loading = TutorPanel::Loading {
            request_id: RequestId::new(),
            question_index: 0,
        };
        let mut view = QuizView {
            session: &session,
            tutor: &loading,
            option_cursor: 0,
            tutor_available: true,
            spinner_frame: 3,
        };
        assert!(draw(&mut view).contains("Asking the tutor..."));

        let ready = TutorPanel::Ready {
            question_index: 0,
            text: "**Key point:** multiplication".into(),
        };
        view.tutor = &ready;
        let text = draw(&mut view);
        assert!(text.contains("Key point:"));
        assert!(!text.contains("**"));
    }

    #[test]
    fn test_empty_session_message() {
        let session = Session::empty("Nothing");
        let mut view = QuizView {
            session: &session,
            tutor: &TutorPanel::Hidden,
            option_cursor: 0,
            tutor_available: true,
            spinner_frame: 0,
        };
        assert!(draw(&mut view).contains("\"Nothing\" has no questions."));
    }

    #[test]
    fn test_options_height_saturates() {
        assert_eq!(options_height(2), 4);
        assert_eq!(options_height(65_533), u16::MAX);
        assert_eq!(options_height(70_000), u16::MAX);
    }

    #[test]
    fn test_malformed_question_warning() {
        let mut bank = QuestionBank::new();
        bank.insert("Bad", vec![Question::new("Broken?", vec!["x".into(), "y".into()], 4)]);
        let session = Session::start("Bad", &bank, false).unwrap();
        let mut view = QuizView {
            session: &session,
            tutor: &TutorPanel::Hidden,
            option_cursor: 0,
            tutor_available: true,
            spinner_frame: 0,
        };
        assert!(draw(&mut view).contains("This question is malformed"));
    }
}
