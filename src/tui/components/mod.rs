//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields or parameters:
//! - `TitleBar`: top line with screen, tutor model and status
//! - `QuizView`: question card, options and tutor panel
//! - `dialogs`: confirm / alert / summary overlays
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep presentation state in `TuiState` and emit events:
//! - `MenuState` / `Menu`: category list and bank commands
//! - `ImportEditor`: multi-line paste area
//! - `ExportViewState` / `ExportView`: scrollable JSON
//!
//! Each component file holds its state type, event type, rendering, event
//! handling, and tests.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── title_bar.rs      (top status line)
//! ├── menu.rs           (category picker)
//! ├── quiz.rs           (one question + tutor panel)
//! ├── import_editor/    (paste area with cursor and wrapping)
//! ├── export_view.rs    (scrollable JSON)
//! └── dialogs.rs        (overlays)
//! ```

pub mod dialogs;
pub mod export_view;
pub mod import_editor;
pub mod menu;
pub mod quiz;
mod title_bar;

pub use export_view::{ExportEvent, ExportView, ExportViewState};
pub use import_editor::{EditorEvent, ImportEditor};
pub use menu::{Menu, MenuEvent, MenuState};
pub use quiz::QuizView;
pub use title_bar::{TitleBar, truncate_to_width};
