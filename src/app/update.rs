use tracing::trace;

use crate::app::{Mode, Model, ToastLevel};
use crate::editor::{Direction, MAX_LINE_SIZE};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    /// Move cursor one step
    MoveCursor(Direction),
    /// Move cursor to column zero
    MoveLineStart,
    /// Move cursor onto the last character of the line
    MoveLineEnd,

    // Modes
    /// Start inserting at the cursor
    EnterInsert,
    /// Start inserting after the character under the cursor
    EnterAppend,
    /// Start inserting at the end of the line
    AppendAtLineEnd,
    /// Enter visual mode
    EnterVisual,
    /// Enter search mode
    EnterSearch,
    /// Return to normal mode
    ExitToNormal,

    // Editing
    /// Insert a character at the cursor
    InsertChar(char),
    /// Insert spaces up to the configured tab width
    InsertTab,
    /// Delete character before cursor, or an empty line at column zero
    Backspace,
    /// Delete character under cursor
    DeleteChar,
    /// Open an empty line below the cursor and move onto it
    OpenLineBelow,
    /// Delete the line under the cursor
    DeleteLine,

    // File
    /// Write the buffer to its file
    Save,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// File writes happen afterwards, in the event loop's side-effect step.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Save keeps a pending quit confirmation so Ctrl+S can precede the second Ctrl+Q.
    if !matches!(msg, Message::Quit | Message::Save) {
        model.quit_confirmed = false;
    }

    let max_y = model.max_y();
    match msg {
        Message::MoveCursor(direction) => {
            model.buffer.move_cursor(direction, max_y);
        }
        Message::MoveLineStart => model.buffer.move_to_line_start(),
        Message::MoveLineEnd => model.buffer.move_to_line_end(),

        Message::EnterInsert => model.mode = Mode::Insert,
        Message::EnterAppend => {
            model.mode = Mode::Append;
            model.buffer.step_into_append();
        }
        Message::AppendAtLineEnd => {
            model.mode = Mode::Append;
            model.buffer.move_past_end();
        }
        Message::EnterVisual => model.mode = Mode::Visual,
        Message::EnterSearch => model.mode = Mode::Search,
        Message::ExitToNormal => model.mode = Mode::Normal,

        Message::InsertChar(ch) => {
            if model.mode.is_editing() {
                insert_or_warn(&mut model, ch);
            }
        }
        Message::InsertTab => {
            if model.mode.is_editing() {
                for _ in 0..model.tab_width {
                    if !insert_or_warn(&mut model, ' ') {
                        break;
                    }
                }
            }
        }
        Message::Backspace => {
            model.buffer.backspace();
        }
        Message::DeleteChar => {
            model.buffer.delete_char_at_cursor();
        }
        Message::OpenLineBelow => {
            if model.buffer.insert_line_at_cursor(max_y) {
                if model.mode == Mode::Normal {
                    model.mode = Mode::Insert;
                }
            } else {
                model.show_toast(ToastLevel::Error, "Could not open a new line");
            }
        }
        Message::DeleteLine => {
            let y = model.buffer.cursor().y();
            if !model.buffer.delete_line_at(y) {
                model.show_toast(ToastLevel::Warning, "The last line cannot be deleted");
            }
        }

        Message::Resize(width, height) => model.viewport.resize(width, height),
        Message::Save | Message::Redraw => {}

        Message::Quit => {
            if model.buffer.is_dirty() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+Q again to discard, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }
    model
}

/// Insert `ch`, telling the user when the line has hit its length limit.
fn insert_or_warn(model: &mut Model, ch: char) -> bool {
    if model.buffer.insert_char(ch) {
        return true;
    }
    let y = model.buffer.cursor().y();
    if model.buffer.line_len(y) >= MAX_LINE_SIZE {
        trace!(y, "insert rejected at line limit");
        model.show_toast(
            ToastLevel::Warning,
            format!("Line is full ({MAX_LINE_SIZE} characters)"),
        );
    }
    false
}
