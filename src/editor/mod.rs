//! The text buffer and cursor engine.
//!
//! Lines and codepoints are kept as doubly-linked lists in slotmap arenas.
//! Edits splice nodes in and out around the cursor, which tracks both a
//! codepoint column and a terminal-cell column.

mod buffer;
mod cursor;
mod error;
mod io;
mod node;
mod width;

pub use buffer::{FreeStats, Lines, MAX_LINE_SIZE, TextBuffer};
pub use cursor::{Cursor, Direction, MAX_RENDER_WIDTH, Step};
pub use error::BufferError;
pub use node::{CharKey, Chars, Codepoint, LineKey, LineRef, NODE_LIMIT};
pub use width::{char_width, chars_width};
