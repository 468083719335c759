use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::warn;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    /// Ctrl+C, quits from any screen
    ForceQuit,
    /// Ctrl+S, submits the import editor / writes the export file
    Save,
    Escape,
    Submit,

    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    WordLeft,
    WordRight,
    PageUp,
    PageDown,
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(event) => translate(event),
        Err(e) => {
            warn!("Event read failed: {}", e);
            None
        }
    }
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            if key_event.kind == KeyEventKind::Release {
                return None;
            }
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
            match key_event.code {
                KeyCode::Char('c') if ctrl => Some(TuiEvent::ForceQuit),
                KeyCode::Char('s') if ctrl => Some(TuiEvent::Save),
                // Ctrl+J inserts newline (ASCII LF)
                KeyCode::Char('j') if ctrl => Some(TuiEvent::InputChar('\n')),
                KeyCode::Char(_) if ctrl => None,
                KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
                KeyCode::Backspace => Some(TuiEvent::Backspace),
                KeyCode::Delete => Some(TuiEvent::Delete),
                KeyCode::Enter => Some(TuiEvent::Submit),
                KeyCode::Esc => Some(TuiEvent::Escape),
                KeyCode::Up => Some(TuiEvent::CursorUp),
                KeyCode::Down => Some(TuiEvent::CursorDown),
                KeyCode::Left if ctrl => Some(TuiEvent::WordLeft),
                KeyCode::Right if ctrl => Some(TuiEvent::WordRight),
                KeyCode::Left => Some(TuiEvent::CursorLeft),
                KeyCode::Right => Some(TuiEvent::CursorRight),
                KeyCode::Home => Some(TuiEvent::CursorHome),
                KeyCode::End => Some(TuiEvent::CursorEnd),
                KeyCode::PageUp => Some(TuiEvent::PageUp),
                KeyCode::PageDown => Some(TuiEvent::PageDown),
                KeyCode::Tab => Some(TuiEvent::InputChar(' ')),
                _ => None,
            }
        }
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_ctrl_shortcuts() {
        assert_eq!(
            translate(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(TuiEvent::ForceQuit)
        );
        assert_eq!(
            translate(key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(TuiEvent::Save)
        );
        assert_eq!(
            translate(key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(
            translate(key(KeyCode::Char('y'), KeyModifiers::NONE)),
            Some(TuiEvent::InputChar('y'))
        );
        assert_eq!(
            translate(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(TuiEvent::Submit)
        );
        assert_eq!(
            translate(key(KeyCode::Left, KeyModifiers::CONTROL)),
            Some(TuiEvent::WordLeft)
        );
    }

    #[test]
    fn test_paste_and_resize() {
        assert_eq!(
            translate(Event::Paste("{\n}".into())),
            Some(TuiEvent::Paste("{\n}".into()))
        );
        assert_eq!(translate(Event::Resize(80, 24)), Some(TuiEvent::Resize));
    }
}
