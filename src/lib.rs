// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::BufferError)
    clippy::module_name_repetitions
)]

//! # Lined
//!
//! A modal terminal line editor.
//!
//! Lined keeps the file being edited in a doubly linked list of lines,
//! each holding a linked list of codepoints, with:
//! - A logical cursor and a render cursor that accounts for wide glyphs
//! - Vi-style normal, insert and append modes
//! - A line-number gutter and status bar
//!
//! ## Architecture
//!
//! Lined uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`editor`]: Text buffer, cursor and file I/O
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved command-line defaults

pub mod app;
pub mod config;
pub mod editor;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::TextBuffer;
    pub use crate::ui::viewport::Viewport;
}
