//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete editor state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Mode, Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

/// Default number of spaces inserted for Tab.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: PathBuf,
    tab_width: usize,
    line_numbers: bool,
}

impl App {
    /// Create a new application for the given file.
    pub const fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            tab_width: DEFAULT_TAB_WIDTH,
            line_numbers: true,
        }
    }

    /// Set how many spaces Tab inserts (clamped to 1..=16).
    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width.clamp(1, 16);
        self
    }

    /// Show or hide the line-number gutter.
    pub const fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }
}
