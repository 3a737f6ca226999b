//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's color palette.

use ratatui::style::{Color, Modifier, Style};

use crate::app::{Mode, ToastLevel};

/// Line-number gutter.
pub fn gutter_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Mode badge at the left of the status bar.
pub fn mode_style(mode: Mode) -> Style {
    let bg = match mode {
        Mode::Normal => Color::Blue,
        Mode::Insert => Color::Green,
        Mode::Append => Color::Cyan,
        Mode::Visual => Color::Magenta,
        Mode::Search => Color::Yellow,
    };
    Style::default()
        .bg(bg)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

/// Body of the status bar.
pub fn status_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

pub fn toast_style(level: ToastLevel) -> Style {
    match level {
        ToastLevel::Info => status_style(),
        ToastLevel::Warning => Style::default().bg(Color::Yellow).fg(Color::Black),
        ToastLevel::Error => Style::default().bg(Color::Red).fg(Color::White),
    }
}
