//! Viewport geometry for the editing area.
//!
//! The [`Viewport`] struct tracks the terminal size and the line-number
//! gutter, and maps the buffer cursor onto screen cells. Scrolling itself
//! is owned by the buffer cursor; the viewport only reads it.

use std::ops::Range;

use crate::editor::Cursor;

/// Rows reserved below the text area for the status bar.
pub const STATUS_ROWS: u16 = 1;

/// Maps buffer rows and columns onto the terminal.
///
/// # Example
///
/// ```
/// use lined::ui::viewport::Viewport;
///
/// let vp = Viewport::new(80, 24);
/// assert_eq!(vp.text_height(), 23);
/// assert_eq!(vp.max_y(), 22);
/// assert_eq!(vp.gutter_width(100), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    line_numbers: bool,
}

impl Viewport {
    /// Create a new viewport.
    ///
    /// # Arguments
    ///
    /// * `width` - Terminal width in columns
    /// * `height` - Terminal height in rows, status bar included
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            line_numbers: true,
        }
    }

    /// Get the viewport width.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the viewport height.
    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn line_numbers(&self) -> bool {
        self.line_numbers
    }

    pub const fn set_line_numbers(&mut self, enabled: bool) {
        self.line_numbers = enabled;
    }

    /// Rows available for text (never less than one).
    pub const fn text_height(&self) -> u16 {
        let rows = self.height.saturating_sub(STATUS_ROWS);
        if rows == 0 { 1 } else { rows }
    }

    /// Index of the last visible text row.
    pub const fn max_y(&self) -> usize {
        self.text_height() as usize - 1
    }

    /// Width of the line-number gutter, separator included.
    pub const fn gutter_width(&self, total_lines: usize) -> u16 {
        if !self.line_numbers {
            return 0;
        }
        let digits = line_number_digits(total_lines);
        (if digits < 2 { 2 } else { digits }) + 1
    }

    /// First buffer row shown on screen.
    ///
    /// Normally the cursor's scroll offset; pulled toward the cursor when
    /// the offset would leave the cursor row outside the text area.
    pub const fn top_row(&self, cursor: Cursor) -> usize {
        let top = cursor.scroll_y();
        let y = cursor.y();
        if y < top {
            y
        } else if y > top + self.max_y() {
            y - self.max_y()
        } else {
            top
        }
    }

    /// Buffer rows visible on screen, clamped to the buffer length.
    pub fn visible_range(&self, cursor: Cursor, total_lines: usize) -> Range<usize> {
        let start = self.top_row(cursor).min(total_lines);
        let end = (start + self.text_height() as usize).min(total_lines);
        start..end
    }

    /// Screen cell for the cursor, relative to the text area's origin.
    pub fn cursor_position(&self, cursor: Cursor, total_lines: usize) -> (u16, u16) {
        let column = usize::from(self.gutter_width(total_lines)) + cursor.render_x();
        let column = u16::try_from(column)
            .unwrap_or(u16::MAX)
            .min(self.width.saturating_sub(1));
        let row = u16::try_from(cursor.y() - self.top_row(cursor)).unwrap_or(u16::MAX);
        (column, row)
    }

    /// Vim-style position label: `All`, `Top`, `Bot` or a percentage.
    pub fn position_label(&self, cursor: Cursor, total_lines: usize) -> String {
        let range = self.visible_range(cursor, total_lines);
        match (range.start == 0, range.end >= total_lines) {
            (true, true) => "All".to_string(),
            (true, false) => "Top".to_string(),
            (false, true) => "Bot".to_string(),
            (false, false) => {
                let hidden = total_lines.saturating_sub(range.len()).max(1);
                format!("{}%", (range.start * 100 / hidden).min(99))
            }
        }
    }

    /// Resize the viewport.
    pub const fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }
}

const fn line_number_digits(total_lines: usize) -> u16 {
    let mut n = total_lines;
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}
