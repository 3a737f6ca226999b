//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Screen geometry and cursor placement
//! - [`style`]: Colors for the gutter and status bar

pub mod style;
pub mod viewport;

mod render;
mod status;

pub use render::{display_char, display_text, render};
