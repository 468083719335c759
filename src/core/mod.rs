//! # Core Application Logic
//!
//! This module contains quizdeck's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • bank / store (data)  │
//!                    │  • session (scoring)    │
//!                    │  • state + view         │
//!                    │  • action: update()     │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │   tutor    │
//!     │  Adapter   │ ───── spawns ──────────► │  gateway   │
//!     │ (ratatui)  │                          │ (reqwest)  │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`bank`]: `Question` and `QuestionBank`, validation and merge
//! - [`store`]: the persisted bank, import parsing and export
//! - [`session`]: one quiz run over a category, with scoring
//! - [`view`]: which screen and overlay are showing
//! - [`state`]: the `App` struct, all application state in one place
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`config`]: `~/.quizdeck/config.toml` and override resolution

pub mod action;
pub mod bank;
pub mod config;
pub mod session;
pub mod state;
pub mod store;
pub mod view;
