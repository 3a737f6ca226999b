use std::time::{Duration, Instant};

use crate::app::DEFAULT_TAB_WIDTH;
use crate::editor::TextBuffer;
use crate::ui::viewport::Viewport;

/// Editing mode, shown in the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Append,
    Visual,
    Search,
}

impl Mode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Append => "APPEND",
            Self::Visual => "VISUAL",
            Self::Search => "SEARCH",
        }
    }

    /// Whether typed characters go into the buffer.
    pub const fn is_editing(self) -> bool {
        matches!(self, Self::Insert | Self::Append)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete editor state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug)]
pub struct Model {
    pub buffer: TextBuffer,
    pub viewport: Viewport,
    pub mode: Mode,
    pub tab_width: usize,
    pub should_quit: bool,
    pub(super) quit_confirmed: bool,
    toast: Option<Toast>,
}

impl Model {
    /// Create a model around a loaded buffer for a terminal of `size` (width, height).
    pub fn new(buffer: TextBuffer, size: (u16, u16)) -> Self {
        Self {
            buffer,
            viewport: Viewport::new(size.0, size.1),
            ..Self::default()
        }
    }

    /// Index of the last visible text row, as the buffer's scroll logic expects it.
    pub const fn max_y(&self) -> usize {
        self.viewport.max_y()
    }

    /// File name for the status bar.
    pub fn file_name(&self) -> String {
        self.buffer
            .path()
            .and_then(|p| p.file_name())
            .map_or_else(|| "[No Name]".to_string(), |s| s.to_string_lossy().to_string())
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            buffer: TextBuffer::empty(),
            viewport: Viewport::new(80, 24),
            mode: Mode::Normal,
            tab_width: DEFAULT_TAB_WIDTH,
            should_quit: false,
            quit_confirmed: false,
            toast: None,
        }
    }
}
