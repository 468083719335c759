//! # View State
//!
//! Which screen is showing, as one value instead of a handful of flags.
//!
//! ```text
//! ViewState
//! ├── mode: Menu | Quiz | Import | Export
//! └── overlay: None
//!            | Confirm(DeleteAll | EndEarly)
//!            | Alert(message)
//!            | Summary
//! ```
//!
//! At most one overlay is open. While it is, input goes to the overlay.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Menu,
    Quiz,
    Import,
    Export,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Menu => "Menu",
            Mode::Quiz => "Quiz",
            Mode::Import => "Import",
            Mode::Export => "Export",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPurpose {
    /// Wipe the saved bank (menu).
    DeleteAll,
    /// Stop the quiz and show the score so far.
    EndEarly,
}

impl ConfirmPurpose {
    pub fn prompt(self) -> &'static str {
        match self {
            ConfirmPurpose::DeleteAll => {
                "Delete every question bank saved on this machine? This cannot be undone."
            }
            ConfirmPurpose::EndEarly => "End this practice run now and score the answers so far?",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Confirm(ConfirmPurpose),
    Alert(String),
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub mode: Mode,
    pub overlay: Option<Overlay>,
}

impl ViewState {
    /// Switches the base screen and closes any overlay.
    pub fn enter(&mut self, mode: Mode) {
        self.mode = mode;
        self.overlay = None;
    }

    pub fn open(&mut self, overlay: Overlay) {
        self.overlay = Some(overlay);
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.overlay = Some(Overlay::Alert(message.into()));
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// The base screen with nothing on top of it.
    pub fn is_bare(&self, mode: Mode) -> bool {
        self.mode == mode && self.overlay.is_none()
    }

    pub fn pending_confirm(&self) -> Option<ConfirmPurpose> {
        match self.overlay {
            Some(Overlay::Confirm(purpose)) => Some(purpose),
            _ => None,
        }
    }
}
