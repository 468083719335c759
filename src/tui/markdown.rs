//! Markdown → ratatui `Text` for tutor explanations.
//!
//! Tutor replies use a small subset: paragraphs, `**bold**` section labels,
//! emphasis, inline code, lists, the odd heading or fenced block. Anything else
//! (tables, HTML, images) is dropped.

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

/// Parse markdown into owned `Text`, with `base_fg` as the body color.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut w = Writer::new(base_fg);
    for event in Parser::new_ext(content, Options::ENABLE_STRIKETHROUGH) {
        w.handle(event);
    }
    w.text
}

struct Writer {
    text: Text<'static>,
    base_fg: Color,
    /// Inline styles compose via `patch`, so bold inside a heading stays bold.
    styles: Vec<Style>,
    /// None = bullet list, Some(n) = numbered list at n
    lists: Vec<Option<u64>>,
    /// Fenced block content, flushed on close
    code: Option<String>,
    /// A blank line is owed before the next block.
    pending_gap: bool,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            styles: Vec::new(),
            lists: Vec::new(),
            code: None,
            pending_gap: false,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn start_block(&mut self) {
        if self.pending_gap && !self.text.lines.is_empty() {
            self.text.lines.push(Line::default());
        }
        self.pending_gap = false;
        self.text.lines.push(Line::default());
    }

    fn push_span(&mut self, span: Span<'static>) {
        match self.text.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.text.lines.push(Line::from(span)),
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(code) => self.push_span(Span::styled(
                code.into_string(),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            )),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.text.lines.push(Line::default()),
            Event::Rule => {
                self.start_block();
                self.push_span(Span::styled(
                    "─".repeat(30),
                    Style::default().fg(Color::DarkGray),
                ));
                self.pending_gap = true;
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                // A paragraph inside a list item continues the item's line.
                if self.lists.is_empty() {
                    self.start_block();
                }
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                let style = match level {
                    HeadingLevel::H1 => Style::default()
                        .fg(self.base_fg)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    _ => Style::default().fg(self.base_fg).add_modifier(Modifier::BOLD),
                };
                self.push_style(style);
            }
            Tag::CodeBlock(_) => self.code = Some(String::new()),
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.pending_gap = !self.text.lines.is_empty();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                if self.pending_gap {
                    self.start_block();
                } else {
                    self.text.lines.push(Line::default());
                }
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{indent}{n}. ");
                        *n += 1;
                        m
                    }
                    _ => format!("{indent}• "),
                };
                self.push_span(Span::styled(marker, Style::default().fg(Color::DarkGray)));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.pending_gap = true,
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.pending_gap = true;
            }
            TagEnd::CodeBlock => {
                let code = self.code.take().unwrap_or_default();
                if self.pending_gap && !self.text.lines.is_empty() {
                    self.text.lines.push(Line::default());
                }
                let style = Style::default().fg(Color::White);
                for line in code.lines() {
                    self.text
                        .lines
                        .push(Line::from(Span::styled(format!("  {line}"), style)));
                }
                self.pending_gap = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                self.pending_gap = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            _ => {}
        }
    }

    fn text(&mut self, cow: CowStr<'_>) {
        // ratatui renders \t as zero-width
        let text = cow.replace('\t', "    ");
        if let Some(code) = self.code.as_mut() {
            code.push_str(&text);
            return;
        }
        let style = self.style();
        self.push_span(Span::styled(text, style));
    }
}
