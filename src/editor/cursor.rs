//! Cursor and viewport bookkeeping, plus the navigation operations.
//!
//! The logical column `x` indexes codepoints; the render column
//! `render_x` indexes terminal cells. Every operation that moves the
//! cursor updates both together so `render_x` always equals the display
//! width of the codepoints strictly before `x`.

use tracing::trace;

use super::buffer::{MAX_LINE_SIZE, TextBuffer};

/// Widest render column a line can reach (every codepoint at most two cells).
pub const MAX_RENDER_WIDTH: usize = MAX_LINE_SIZE * 2;

/// Cursor position in the buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub(crate) x: usize,
    pub(crate) y: usize,
    pub(crate) render_x: usize,
    pub(crate) scroll_y: usize,
    pub(crate) high_water: usize,
}

impl Cursor {
    /// Create a cursor at row 0, column 0 with no scrolling.
    pub const fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            render_x: 0,
            scroll_y: 0,
            high_water: 0,
        }
    }

    /// Logical column (codepoint index on the current line).
    pub const fn x(&self) -> usize {
        self.x
    }

    /// Logical row (line index).
    pub const fn y(&self) -> usize {
        self.y
    }

    /// Render column (terminal cells before the cursor).
    pub const fn render_x(&self) -> usize {
        self.render_x
    }

    /// First visible row.
    pub const fn scroll_y(&self) -> usize {
        self.scroll_y
    }

    /// Scroll high-water mark.
    pub const fn high_water(&self) -> usize {
        self.high_water
    }

    const fn reset_columns(&mut self) {
        self.x = 0;
        self.render_x = 0;
    }

    /// Forward scroll trigger shared by cursor-down and open-line.
    pub(crate) const fn advance_high_water(&mut self, max_y: usize) {
        if self.y > max_y && self.y > self.high_water {
            self.high_water += 1;
            self.scroll_y = self.high_water;
        }
    }

    /// Backward scroll trigger. Compares against `scroll_y`, not the
    /// viewport height.
    pub(crate) const fn retreat_high_water(&mut self) {
        self.high_water = self.high_water.saturating_sub(1);
        self.scroll_y = self.high_water;
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Sign applied to a codepoint width when adjusting the render column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Backward,
    Forward,
}

impl TextBuffer {
    /// Move the cursor one step; out-of-range moves are ignored.
    ///
    /// `max_y` is the index of the last visible row and only matters for
    /// [`Direction::Down`].
    pub fn move_cursor(&mut self, direction: Direction, max_y: usize) {
        match direction {
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(max_y),
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
        }
    }

    /// Move to the next row, back at column zero.
    pub const fn move_down(&mut self, max_y: usize) {
        if self.cursor.y + 1 >= self.size {
            return;
        }
        self.cursor.y += 1;
        self.cursor.reset_columns();
        self.cursor.advance_high_water(max_y);
    }

    /// Move to the previous row, back at column zero.
    pub const fn move_up(&mut self) {
        if self.cursor.y == 0 {
            return;
        }
        self.cursor.y -= 1;
        self.cursor.reset_columns();
        if self.cursor.y <= self.cursor.scroll_y {
            self.cursor.retreat_high_water();
        }
    }

    /// Move one codepoint right, stopping on the last codepoint of the line.
    pub fn move_right(&mut self) {
        let Some(line) = self.find_line(self.cursor.y) else {
            return;
        };
        let size = line.size();
        if size == 0 || self.cursor.x + 1 >= size || self.cursor.render_x >= MAX_RENDER_WIDTH {
            return;
        }
        if self.render_cursor_recalc(self.cursor.x, Step::Forward) {
            self.cursor.x += 1;
        }
    }

    /// Move one codepoint left.
    pub fn move_left(&mut self) {
        if self.cursor.x == 0 || self.cursor.render_x == 0 {
            return;
        }
        if self.render_cursor_recalc(self.cursor.x - 1, Step::Backward) {
            self.cursor.x -= 1;
        }
    }

    /// Adjust the render column by the width of the codepoint at column
    /// `x` of the current row.
    ///
    /// Returns `false`, leaving the cursor untouched, if there is no
    /// codepoint at `x`.
    pub fn render_cursor_recalc(&mut self, x: usize, step: Step) -> bool {
        let Some(ch) = self
            .find_line(self.cursor.y)
            .and_then(|line| line.find_char(x))
        else {
            trace!(x, y = self.cursor.y, "no codepoint for render recalc");
            return false;
        };
        let width = ch.width();
        self.cursor.render_x = match step {
            Step::Forward => self.cursor.render_x + width,
            Step::Backward => self.cursor.render_x.saturating_sub(width),
        };
        true
    }

    /// Move to column zero.
    pub const fn move_to_line_start(&mut self) {
        self.cursor.reset_columns();
    }

    /// Move onto the last codepoint of the line (column zero when empty).
    pub fn move_to_line_end(&mut self) {
        let size = self.line_len(self.cursor.y);
        self.set_column(size.saturating_sub(1));
    }

    /// Move one past the last codepoint, where typed text appends.
    pub fn move_past_end(&mut self) {
        let size = self.line_len(self.cursor.y);
        self.set_column(size);
    }

    /// Step one column right without the last-codepoint stop, for append mode.
    pub fn step_into_append(&mut self) {
        let size = self.line_len(self.cursor.y);
        if self.cursor.x < size {
            self.set_column(self.cursor.x + 1);
        }
    }

    /// Place the cursor at `(y, x)`, clamped to the buffer.
    ///
    /// Scroll bookkeeping is left alone.
    pub fn move_to(&mut self, y: usize, x: usize) {
        self.cursor.y = y.min(self.size - 1);
        let size = self.line_len(self.cursor.y);
        self.set_column(x.min(size));
    }

    /// Set the logical column on the current row and recompute the render
    /// column from scratch.
    pub(crate) fn set_column(&mut self, x: usize) {
        self.cursor.x = x;
        self.cursor.render_x = self.prefix_width(self.cursor.y, x);
    }
}
