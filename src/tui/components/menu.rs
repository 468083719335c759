//! # Menu Component
//!
//! Category picker plus the bank commands (random order, import, export,
//! delete all).
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `MenuState` lives in `TuiState` (selection survives redraws)
//! - `Menu` is created each frame with borrowed state and bank props

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};

use crate::core::bank::QuestionBank;
use crate::tui::event::TuiEvent;

/// Persistent selection state for the category list.
#[derive(Default)]
pub struct MenuState {
    pub selected: usize,
    pub list_state: ListState,
}

/// What a key press on the menu asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    Start(String),
    ToggleRandom,
    Import,
    Export,
    DeleteAll,
    Quit,
}

impl MenuState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the selection inside the list after the bank changed size.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    pub fn handle_event(&mut self, event: &TuiEvent, bank: &QuestionBank) -> Option<MenuEvent> {
        let len = bank.category_count();
        match event {
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                self.clamp(len);
                None
            }
            TuiEvent::CursorDown => {
                self.selected += 1;
                self.clamp(len);
                None
            }
            TuiEvent::Submit => bank
                .categories()
                .nth(self.selected)
                .map(|c| MenuEvent::Start(c.to_string())),
            TuiEvent::InputChar('r') => Some(MenuEvent::ToggleRandom),
            TuiEvent::InputChar('i') => Some(MenuEvent::Import),
            TuiEvent::InputChar('e') => Some(MenuEvent::Export),
            TuiEvent::InputChar('d') => Some(MenuEvent::DeleteAll),
            TuiEvent::InputChar('q') | TuiEvent::Escape => Some(MenuEvent::Quit),
            _ => None,
        }
    }
}

/// Transient render wrapper for the menu.
pub struct Menu<'a> {
    state: &'a mut MenuState,
    bank: &'a QuestionBank,
    randomize: bool,
}

impl<'a> Menu<'a> {
    pub fn new(state: &'a mut MenuState, bank: &'a QuestionBank, randomize: bool) -> Self {
        Self {
            state,
            bank,
            randomize,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.clamp(self.bank.category_count());

        let [list_area, options_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Categories ")
            .title_alignment(Alignment::Left)
            .title_bottom(
                Line::from(" Enter Start  r Random  i Import  e Export  d Delete all  q Quit ")
                    .centered(),
            )
            .padding(Padding::horizontal(1));

        if self.bank.is_empty() {
            let empty = Paragraph::new("No questions yet. Press i to import a bank.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, list_area);
        } else {
            let inner_width = list_area.width.saturating_sub(4) as usize;
            let items: Vec<ListItem> = self
                .bank
                .iter()
                .enumerate()
                .map(|(i, (category, questions))| {
                    let count = format!("{} q", questions.len());
                    let name_width = inner_width.saturating_sub(count.len() + 2);
                    let name = super::truncate_to_width(category, name_width);
                    let pad = name_width.saturating_sub(unicode_width::UnicodeWidthStr::width(
                        name.as_str(),
                    ));
                    let style = if i == self.state.selected {
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(name, style),
                        Span::styled(" ".repeat(pad + 2), style),
                        Span::styled(count, style),
                    ]))
                })
                .collect();
            frame.render_stateful_widget(
                List::new(items).block(block),
                list_area,
                &mut self.state.list_state,
            );
        }

        let (marker, color) = if self.randomize {
            ("[x]", Color::Green)
        } else {
            ("[ ]", Color::DarkGray)
        };
        let options = Paragraph::new(Line::from(vec![
            Span::styled(marker, Style::default().fg(color)),
            Span::raw(" Random question order"),
        ]))
        .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray)));
        frame.render_widget(options, options_area);
    }
}
