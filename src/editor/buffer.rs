use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use super::cursor::Cursor;
use super::error::BufferError;
use super::node::{CharKey, CharNode, LineKey, LineNode, LineRef, NODE_LIMIT};
use super::width::{char_width, chars_width};

/// Most codepoints a single line may hold.
pub const MAX_LINE_SIZE: usize = 512;

/// Counts reported by [`TextBuffer::free`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreeStats {
    pub lines: usize,
    pub chars: usize,
}

/// The text of an open file as a doubly-linked list of lines, each a
/// doubly-linked list of codepoints.
///
/// A buffer always holds at least one line. Lookups by index walk the
/// lists from the front; splices and unlinks are constant time once the
/// node is found. The cursor tracks both the logical column and the
/// render column so wide glyphs land on the right terminal cell.
pub struct TextBuffer {
    pub(super) lines: SlotMap<LineKey, LineNode>,
    pub(super) chars: SlotMap<CharKey, CharNode>,
    pub(super) first_line: LineKey,
    pub(super) last_line: LineKey,
    pub(super) size: usize,
    pub(super) path: Option<std::path::PathBuf>,
    pub(super) cursor: Cursor,
    pub(super) dirty: bool,
}

impl TextBuffer {
    /// A buffer holding one empty line.
    pub fn empty() -> Self {
        let mut lines = SlotMap::with_key();
        let first = lines.insert(LineNode::default());
        Self {
            lines,
            chars: SlotMap::with_key(),
            first_line: first,
            last_line: first,
            size: 1,
            path: None,
            cursor: Cursor::new(),
            dirty: false,
        }
    }

    /// Build a buffer from in-memory text, split on line feeds the same
    /// way [`TextBuffer::load`] splits a file.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Allocation`] if the node arenas are exhausted.
    pub fn from_text(text: &str) -> Result<Self, BufferError> {
        let mut buf = Self::empty();
        let mut loaded = 0;
        for segment in text.split_inclusive('\n') {
            buf.push_segment(&mut loaded, segment)?;
        }
        Ok(buf)
    }

    /// The current cursor state.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Number of lines; never zero.
    pub const fn line_count(&self) -> usize {
        self.size
    }

    /// File this buffer was loaded from.
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Whether the buffer has been modified since load or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    // --- Lookup ---

    /// Line at zero-based row `index`, scanning from the first line.
    pub fn find_line(&self, index: usize) -> Option<LineRef<'_>> {
        let key = self.find_line_key(index)?;
        self.line_ref(key)
    }

    /// Line by key, if it is still part of the buffer.
    pub fn line_ref(&self, key: LineKey) -> Option<LineRef<'_>> {
        self.lines
            .get(key)
            .map(|node| LineRef::new(key, node, &self.chars))
    }

    pub(super) fn find_line_key(&self, index: usize) -> Option<LineKey> {
        if index >= self.size {
            return None;
        }
        let mut cursor = Some(self.first_line);
        for _ in 0..index {
            cursor = self.lines.get(cursor?)?.next;
        }
        cursor
    }

    fn find_char_key(&self, line: LineKey, index: usize) -> Option<CharKey> {
        self.line_ref(line)?.find_char(index).map(|c| c.key())
    }

    /// Codepoint count of row `y`, or 0 when there is no such row.
    pub fn line_len(&self, y: usize) -> usize {
        self.find_line(y).map_or(0, |line| line.size())
    }

    /// Content of row `y`.
    pub fn line_text(&self, y: usize) -> Option<String> {
        self.find_line(y).map(|line| line.text())
    }

    /// Lines from first to last.
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            buffer: self,
            next: Some(self.first_line),
            remaining: self.size,
        }
    }

    /// The whole buffer, each line followed by a line feed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.extend(line.chars());
            out.push('\n');
        }
        out
    }

    /// Display width of the first `x` codepoints of row `y`.
    pub(super) fn prefix_width(&self, y: usize, x: usize) -> usize {
        self.find_line(y)
            .map_or(0, |line| chars_width(line.chars().take(x)))
    }

    // --- Node lifecycle ---

    fn alloc_char(&mut self, value: char) -> Result<CharKey, BufferError> {
        if self.chars.len() >= NODE_LIMIT {
            return Err(BufferError::Allocation { limit: NODE_LIMIT });
        }
        Ok(self.chars.insert(CharNode::new(value)))
    }

    fn alloc_line(&mut self) -> Result<LineKey, BufferError> {
        if self.lines.len() >= NODE_LIMIT {
            return Err(BufferError::Allocation { limit: NODE_LIMIT });
        }
        Ok(self.lines.insert(LineNode::default()))
    }

    /// Splice `new` into `line` right after `prev`, or at the front when
    /// `prev` is `None`.
    fn link_char_after(&mut self, line: LineKey, prev: Option<CharKey>, new: CharKey) {
        let next = match prev {
            Some(p) => self.chars[p].next,
            None => self.lines[line].first_char,
        };
        {
            let node = &mut self.chars[new];
            node.prev = prev;
            node.next = next;
        }
        match prev {
            Some(p) => self.chars[p].next = Some(new),
            None => self.lines[line].first_char = Some(new),
        }
        match next {
            Some(n) => self.chars[n].prev = Some(new),
            None => self.lines[line].last_char = Some(new),
        }
        self.lines[line].size += 1;
    }

    /// Detach `key` from `line` and release it.
    fn unlink_char(&mut self, line: LineKey, key: CharKey) -> Option<CharNode> {
        let node = self.chars.remove(key)?;
        match node.prev {
            Some(p) => self.chars[p].next = node.next,
            None => self.lines[line].first_char = node.next,
        }
        match node.next {
            Some(n) => self.chars[n].prev = node.prev,
            None => self.lines[line].last_char = node.prev,
        }
        self.lines[line].size -= 1;
        Some(node)
    }

    /// Release every codepoint owned by `line`, returning how many went.
    fn release_chars(&mut self, line: &LineNode) -> usize {
        let mut released = 0;
        let mut cursor = line.first_char;
        while let Some(key) = cursor {
            cursor = self.chars.remove(key).and_then(|node| node.next);
            released += 1;
        }
        released
    }

    /// Append a fresh line after the last one.
    fn push_line(&mut self) -> Result<LineKey, BufferError> {
        let key = self.alloc_line()?;
        let last = self.last_line;
        self.lines[key].prev = Some(last);
        self.lines[last].next = Some(key);
        self.last_line = key;
        self.size += 1;
        Ok(key)
    }

    /// Append one input line (terminator included or not), splitting it
    /// into chunks of at most [`MAX_LINE_SIZE`] codepoints.
    ///
    /// `loaded` counts lines filled so far; the buffer's initial empty
    /// line is reused for the first one.
    pub(super) fn push_segment(
        &mut self,
        loaded: &mut usize,
        segment: &str,
    ) -> Result<(), BufferError> {
        let segment = segment.strip_suffix('\n').unwrap_or(segment);
        let segment = segment.strip_suffix('\r').unwrap_or(segment);
        let mut chars = segment.chars().peekable();
        loop {
            let line = if *loaded == 0 {
                self.first_line
            } else {
                self.push_line()?
            };
            *loaded += 1;
            for value in chars.by_ref().take(MAX_LINE_SIZE) {
                let key = self.alloc_char(value)?;
                let last = self.lines[line].last_char;
                self.link_char_after(line, last, key);
            }
            if chars.peek().is_none() {
                return Ok(());
            }
        }
    }

    // --- Mutation ---

    /// Insert `value` at the cursor on the current row and step past it.
    ///
    /// Returns `false`, changing nothing, when the cursor is out of range,
    /// the line is already [`MAX_LINE_SIZE`] long, or no node can be
    /// allocated.
    pub fn insert_char(&mut self, value: char) -> bool {
        let Cursor { x, y, .. } = self.cursor;
        if y >= self.size || x > MAX_LINE_SIZE {
            return false;
        }
        let Some(line) = self.find_line_key(y) else {
            return false;
        };
        let size = self.lines[line].size;
        if size >= MAX_LINE_SIZE {
            trace!(y, size, "line full, insert rejected");
            return false;
        }
        let prev = if x == 0 {
            None
        } else if x >= size {
            self.lines[line].last_char
        } else {
            self.find_char_key(line, x - 1)
        };
        let key = match self.alloc_char(value) {
            Ok(key) => key,
            Err(err) => {
                warn!(%err, "insert failed");
                return false;
            }
        };
        self.link_char_after(line, prev, key);
        self.cursor.x = x.min(size) + 1;
        self.cursor.render_x += char_width(value);
        self.dirty = true;
        true
    }

    /// Delete the codepoint at column `x` of row `y`.
    ///
    /// When the deleted codepoint was the last one on the cursor's row,
    /// the cursor steps back one column with it. Returns `false` if the
    /// row is missing or empty or has no codepoint at `x`.
    pub fn delete_char_at(&mut self, x: usize, y: usize) -> bool {
        let Some(line) = self.find_line_key(y) else {
            return false;
        };
        if self.lines[line].size == 0 {
            return false;
        }
        let Some(key) = self.find_char_key(line, x) else {
            return false;
        };
        let was_last = self.lines[line].last_char == Some(key);
        if self.unlink_char(line, key).is_none() {
            return false;
        }
        if y == self.cursor.y {
            if was_last {
                self.cursor.x = self.cursor.x.saturating_sub(1);
            }
            let size = self.lines[line].size;
            self.set_column(self.cursor.x.min(size));
        }
        self.dirty = true;
        true
    }

    /// Delete the codepoint at column `x` of the cursor's row.
    pub fn delete_char_in_row(&mut self, x: usize) -> bool {
        self.delete_char_at(x, self.cursor.y)
    }

    /// Delete the codepoint under the cursor.
    pub fn delete_char_at_cursor(&mut self) -> bool {
        self.delete_char_at(self.cursor.x, self.cursor.y)
    }

    /// Delete the codepoint before the cursor, or at column zero of an
    /// empty line, the line itself, landing at the end of the line above.
    pub fn backspace(&mut self) -> bool {
        let Cursor { x, y, .. } = self.cursor;
        if x > 0 {
            let Some(line) = self.find_line_key(y) else {
                return false;
            };
            let was_last = x == self.lines[line].size;
            if !self.delete_char_at(x - 1, y) {
                return false;
            }
            // Deleting the last codepoint already pulled the cursor back.
            if !was_last {
                self.set_column(x - 1);
            }
            return true;
        }

        if y == 0 || self.line_len(y) != 0 {
            return false;
        }
        let Some(line) = self.find_line_key(y) else {
            return false;
        };
        if !self.delete_line(line) {
            return false;
        }
        self.cursor.y = y - 1;
        self.move_past_end();
        true
    }

    /// Unlink `line` from the buffer and release it with its codepoints.
    ///
    /// The last line and the sole remaining line cannot be removed this
    /// way; the first line is handled by re-pointing the head of the list.
    /// Afterwards the cursor is clamped to the buffer and returned to
    /// column zero.
    pub fn delete_line(&mut self, line: LineKey) -> bool {
        let Some(node) = self.lines.get(line) else {
            return false;
        };
        if self.size <= 1 {
            return false;
        }
        match (node.prev, node.next) {
            (Some(prev), Some(next)) => {
                self.lines[prev].next = Some(next);
                self.lines[next].prev = Some(prev);
            }
            (None, Some(next)) => {
                self.first_line = next;
                self.lines[next].prev = None;
            }
            _ => return false,
        }
        let Some(node) = self.lines.remove(line) else {
            return false;
        };
        let released = self.release_chars(&node);
        self.size -= 1;
        debug!(released, lines = self.size, "line deleted");

        if self.cursor.y >= self.cursor.scroll_y {
            self.cursor.retreat_high_water();
        }
        self.cursor.y = self.cursor.y.min(self.size - 1);
        self.cursor.x = 0;
        self.cursor.render_x = 0;
        self.dirty = true;
        true
    }

    /// Delete the line at row `y`.
    pub fn delete_line_at(&mut self, y: usize) -> bool {
        self.find_line_key(y)
            .is_some_and(|line| self.delete_line(line))
    }

    /// Insert an empty line after row `y`.
    pub fn insert_line_at(&mut self, y: usize) -> bool {
        let Some(at) = self.find_line_key(y) else {
            return false;
        };
        let new = match self.alloc_line() {
            Ok(key) => key,
            Err(err) => {
                warn!(%err, "line insert failed");
                return false;
            }
        };
        let next = self.lines[at].next;
        {
            let node = &mut self.lines[new];
            node.prev = Some(at);
            node.next = next;
        }
        self.lines[at].next = Some(new);
        match next {
            Some(n) => self.lines[n].prev = Some(new),
            None => self.last_line = new,
        }
        self.size += 1;
        if y < self.cursor.y {
            self.cursor.y += 1;
        }
        self.dirty = true;
        trace!(after = y, lines = self.size, "line inserted");
        true
    }

    /// Open an empty line below the cursor and move onto it, scrolling the
    /// same way [`TextBuffer::move_down`] does.
    pub fn insert_line_at_cursor(&mut self, max_y: usize) -> bool {
        if !self.insert_line_at(self.cursor.y) {
            return false;
        }
        self.cursor.y += 1;
        self.cursor.x = 0;
        self.cursor.render_x = 0;
        self.cursor.advance_high_water(max_y);
        true
    }

    // --- Teardown and checks ---

    /// Release every line and codepoint, walking the lists front to back.
    pub fn free(mut self) -> FreeStats {
        let mut stats = FreeStats::default();
        let mut cursor = Some(self.first_line);
        while let Some(key) = cursor {
            let Some(node) = self.lines.remove(key) else {
                break;
            };
            stats.chars += self.release_chars(&node);
            stats.lines += 1;
            cursor = node.next;
        }
        debug!(lines = stats.lines, chars = stats.chars, "buffer freed");
        stats
    }

    /// Walk every list in both directions and check sizes, boundary
    /// links, neighbour back-links and the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Integrity`] describing the first violation.
    pub fn validate(&self) -> Result<(), BufferError> {
        let fail = |msg: String| -> Result<(), BufferError> { Err(BufferError::Integrity(msg)) };

        let mut forward = Vec::with_capacity(self.size);
        let mut cursor = Some(self.first_line);
        let mut prev: Option<LineKey> = None;
        while let Some(key) = cursor {
            let Some(node) = self.lines.get(key) else {
                return fail(format!("dangling line link at row {}", forward.len()));
            };
            if node.prev != prev {
                return fail(format!("line {} has a wrong prev link", forward.len()));
            }
            self.validate_chars(forward.len(), node)?;
            forward.push(key);
            if forward.len() > self.lines.len() {
                return fail("line list is cyclic".to_string());
            }
            prev = Some(key);
            cursor = node.next;
        }
        if forward.len() != self.size || self.size == 0 {
            return fail(format!("size {} but {} lines reachable", self.size, forward.len()));
        }
        if prev != Some(self.last_line) {
            return fail("last_line is not the tail of the list".to_string());
        }

        let mut backward = Vec::with_capacity(self.size);
        let mut cursor = Some(self.last_line);
        while let Some(key) = cursor {
            backward.push(key);
            if backward.len() > forward.len() {
                return fail("backward walk is longer than forward walk".to_string());
            }
            cursor = self.lines.get(key).and_then(|node| node.prev);
        }
        backward.reverse();
        if backward != forward {
            return fail("backward walk does not mirror forward walk".to_string());
        }

        let Cursor { x, y, render_x, .. } = self.cursor;
        if y >= self.size {
            return fail(format!("cursor row {y} outside {} lines", self.size));
        }
        let size = self.line_len(y);
        if x > size {
            return fail(format!("cursor column {x} past line size {size}"));
        }
        let expected = self.prefix_width(y, x);
        if render_x != expected {
            return fail(format!("render column {render_x}, expected {expected}"));
        }
        Ok(())
    }

    fn validate_chars(&self, row: usize, line: &LineNode) -> Result<(), BufferError> {
        let fail = |msg: String| -> Result<(), BufferError> {
            Err(BufferError::Integrity(format!("row {row}: {msg}")))
        };
        if (line.size == 0) != line.first_char.is_none()
            || line.first_char.is_none() != line.last_char.is_none()
        {
            return fail("boundary links disagree with size".to_string());
        }
        let mut count = 0;
        let mut prev: Option<CharKey> = None;
        let mut cursor = line.first_char;
        while let Some(key) = cursor {
            let Some(node) = self.chars.get(key) else {
                return fail(format!("dangling char link at column {count}"));
            };
            if node.prev != prev {
                return fail(format!("char {count} has a wrong prev link"));
            }
            count += 1;
            if count > line.size {
                return fail(format!("more than {} chars reachable", line.size));
            }
            prev = Some(key);
            cursor = node.next;
        }
        if count != line.size {
            return fail(format!("size {} but {count} chars reachable", line.size));
        }
        if prev != line.last_char {
            return fail("last_char is not the tail of the list".to_string());
        }
        Ok(())
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBuffer")
            .field("lines", &self.size)
            .field("chars", &self.chars.len())
            .field("path", &self.path)
            .field("cursor", &self.cursor)
            .field("dirty", &self.dirty)
            .finish()
    }
}

/// Iterator over the lines of a buffer.
pub struct Lines<'a> {
    buffer: &'a TextBuffer,
    next: Option<LineKey>,
    remaining: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = LineRef<'a>;

    fn next(&mut self) -> Option<LineRef<'a>> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.next?;
        let line = self.buffer.line_ref(key)?;
        self.next = self.buffer.lines[key].next;
        self.remaining -= 1;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> TextBuffer {
        TextBuffer::from_text(text).unwrap()
    }

    fn rows(buf: &TextBuffer) -> Vec<String> {
        buf.lines().map(|line| line.text()).collect()
    }

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_empty_line() {
        let buf = TextBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_len(0), 0);
        assert!(buf.find_line(0).unwrap().is_empty());
        buf.validate().unwrap();
    }

    #[test]
    fn test_from_text_splits_on_line_feed() {
        let buf = buffer("ab\ncd\n");
        assert_eq!(rows(&buf), vec!["ab", "cd"]);
        assert_eq!(buf.line_len(0), 2);
        assert_eq!(buf.line_len(1), 2);
        buf.validate().unwrap();
    }

    #[test]
    fn test_from_text_keeps_unterminated_last_line() {
        let buf = buffer("ab\ncd");
        assert_eq!(rows(&buf), vec!["ab", "cd"]);
    }

    #[test]
    fn test_from_text_strips_carriage_return() {
        let buf = buffer("ab\r\ncd\r\n");
        assert_eq!(rows(&buf), vec!["ab", "cd"]);
    }

    #[test]
    fn test_from_text_blank_lines() {
        let buf = buffer("\n\nx\n");
        assert_eq!(rows(&buf), vec!["", "", "x"]);
    }

    #[test]
    fn test_from_text_splits_overlong_lines() {
        let long = "a".repeat(MAX_LINE_SIZE * 2 + 3);
        let buf = buffer(&long);
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_len(0), MAX_LINE_SIZE);
        assert_eq!(buf.line_len(1), MAX_LINE_SIZE);
        assert_eq!(buf.line_len(2), 3);
        buf.validate().unwrap();
    }

    #[test]
    fn test_line_exactly_at_limit_is_not_split() {
        let exact = "b".repeat(MAX_LINE_SIZE);
        let buf = buffer(&exact);
        assert_eq!(buf.line_count(), 1);
    }

    #[test]
    fn test_text_terminates_every_line() {
        let buf = buffer("ab\ncd");
        assert_eq!(buf.text(), "ab\ncd\n");
    }

    // --- Lookup ---

    #[test]
    fn test_find_line_out_of_bounds_is_none() {
        let buf = buffer("ab\ncd");
        assert!(buf.find_line(2).is_none());
        assert!(buf.line_text(7).is_none());
    }

    #[test]
    fn test_find_char_returns_written_values() {
        let text = "héllo\n中文\n\nz";
        let buf = buffer(text);
        for (y, expected) in text.split('\n').enumerate() {
            let line = buf.find_line(y).unwrap();
            for (x, ch) in expected.chars().enumerate() {
                assert_eq!(line.find_char(x).map(|c| c.value()), Some(ch));
            }
            assert!(line.find_char(expected.chars().count()).is_none());
        }
    }

    #[test]
    fn test_codepoint_width() {
        let buf = buffer("a中");
        let line = buf.find_line(0).unwrap();
        assert_eq!(line.find_char(0).unwrap().width(), 1);
        assert_eq!(line.find_char(1).unwrap().width(), 2);
        assert_eq!(line.width(), 3);
    }

    // --- Character insertion ---

    #[test]
    fn test_insert_into_empty_line() {
        let mut buf = TextBuffer::empty();
        assert!(buf.insert_char('x'));
        assert_eq!(buf.line_text(0).as_deref(), Some("x"));
        assert_eq!((buf.cursor().x(), buf.cursor().render_x()), (1, 1));
        assert!(buf.is_dirty());
        buf.validate().unwrap();
    }

    #[test]
    fn test_insert_in_middle() {
        let mut buf = buffer("ab\ncd\n");
        buf.move_to(0, 1);
        assert!(buf.insert_char('x'));
        assert_eq!(buf.line_text(0).as_deref(), Some("axb"));
        assert_eq!(buf.cursor().x(), 2);
        buf.validate().unwrap();
    }

    #[test]
    fn test_insert_at_start_and_end() {
        let mut buf = buffer("bc");
        buf.insert_char('a');
        buf.move_past_end();
        buf.insert_char('d');
        assert_eq!(buf.line_text(0).as_deref(), Some("abcd"));
        assert_eq!(buf.cursor().x(), 4);
        buf.validate().unwrap();
    }

    #[test]
    fn test_typing_sequence() {
        let mut buf = TextBuffer::empty();
        for ch in "hello".chars() {
            buf.insert_char(ch);
        }
        assert_eq!(buf.line_text(0).as_deref(), Some("hello"));
        assert_eq!(buf.cursor().x(), 5);
    }

    #[test]
    fn test_insert_wide_char_advances_render_by_two() {
        let mut buf = TextBuffer::empty();
        buf.insert_char('a');
        buf.insert_char('中');
        assert_eq!((buf.cursor().x(), buf.cursor().render_x()), (2, 3));
        buf.move_left();
        assert_eq!((buf.cursor().x(), buf.cursor().render_x()), (1, 1));
        buf.validate().unwrap();
    }

    #[test]
    fn test_insert_rejected_when_line_full() {
        let full = "a".repeat(MAX_LINE_SIZE);
        let mut buf = buffer(&full);
        buf.move_past_end();
        let before = buf.cursor();
        assert!(!buf.insert_char('b'));
        assert_eq!(buf.line_len(0), MAX_LINE_SIZE);
        assert_eq!(buf.cursor(), before);
        assert!(!buf.is_dirty());
    }

    // --- Character deletion ---

    #[test]
    fn test_delete_char_on_empty_line_is_false() {
        let mut buf = buffer("\nab");
        assert!(!buf.delete_char_at(0, 0));
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_delete_char_missing_row_or_column_is_false() {
        let mut buf = buffer("ab");
        assert!(!buf.delete_char_at(0, 3));
        assert!(!buf.delete_char_at(2, 0));
    }

    #[test]
    fn test_delete_first_middle_last() {
        let mut buf = buffer("abcde");
        assert!(buf.delete_char_at(0, 0));
        assert_eq!(buf.line_text(0).as_deref(), Some("bcde"));
        assert!(buf.delete_char_at(1, 0));
        assert_eq!(buf.line_text(0).as_deref(), Some("bde"));
        assert!(buf.delete_char_at(2, 0));
        assert_eq!(buf.line_text(0).as_deref(), Some("bd"));
        buf.validate().unwrap();
    }

    #[test]
    fn test_delete_last_char_pulls_cursor_back() {
        let mut buf = buffer("a中b");
        buf.move_to_line_end();
        assert_eq!((buf.cursor().x(), buf.cursor().render_x()), (2, 3));
        assert!(buf.delete_char_at_cursor());
        assert_eq!(buf.line_text(0).as_deref(), Some("a中"));
        assert_eq!((buf.cursor().x(), buf.cursor().render_x()), (1, 1));
        buf.validate().unwrap();
    }

    #[test]
    fn test_delete_middle_char_leaves_cursor() {
        let mut buf = buffer("abc");
        buf.move_right();
        assert!(buf.delete_char_at_cursor());
        assert_eq!(buf.line_text(0).as_deref(), Some("ac"));
        assert_eq!(buf.cursor().x(), 1);
    }

    #[test]
    fn test_delete_on_other_row_leaves_cursor() {
        let mut buf = buffer("abc\nxyz");
        buf.move_to(1, 2);
        assert!(buf.delete_char_at(2, 0));
        assert_eq!(buf.line_text(0).as_deref(), Some("ab"));
        assert_eq!((buf.cursor().x(), buf.cursor().y()), (2, 1));
    }

    #[test]
    fn test_delete_char_in_row() {
        let mut buf = buffer("abc\nxyz");
        buf.move_down(10);
        assert!(buf.delete_char_in_row(1));
        assert_eq!(buf.line_text(1).as_deref(), Some("xz"));
    }

    #[test]
    fn test_delete_only_char_empties_line() {
        let mut buf = buffer("x");
        assert!(buf.delete_char_at_cursor());
        let line = buf.find_line(0).unwrap();
        assert!(line.is_empty());
        assert_eq!(buf.cursor().x(), 0);
        buf.validate().unwrap();
    }

    // --- Backspace ---

    #[test]
    fn test_backspace_at_end_of_line() {
        let mut buf = buffer("ab中");
        buf.move_past_end();
        assert!(buf.backspace());
        assert_eq!(buf.line_text(0).as_deref(), Some("ab"));
        assert_eq!((buf.cursor().x(), buf.cursor().render_x()), (2, 2));
        buf.validate().unwrap();
    }

    #[test]
    fn test_backspace_in_middle_of_line() {
        let mut buf = buffer("a中b");
        buf.move_to(0, 2);
        assert!(buf.backspace());
        assert_eq!(buf.line_text(0).as_deref(), Some("ab"));
        assert_eq!((buf.cursor().x(), buf.cursor().render_x()), (1, 1));
        buf.validate().unwrap();
    }

    #[test]
    fn test_backspace_at_origin_is_noop() {
        let mut buf = buffer("ab");
        assert!(!buf.backspace());
        assert_eq!(buf.line_text(0).as_deref(), Some("ab"));
    }

    #[test]
    fn test_backspace_at_column_zero_of_nonempty_line_is_noop() {
        let mut buf = buffer("ab\ncd");
        buf.move_down(10);
        assert!(!buf.backspace());
        assert_eq!(buf.line_count(), 2);
    }

    #[test]
    fn test_backspace_removes_emptied_middle_line() {
        let mut buf = buffer("one\nx\nthree");
        buf.move_to(1, 1);
        assert!(buf.backspace());
        assert_eq!(buf.line_len(1), 0);
        assert_eq!(buf.cursor().x(), 0);

        assert!(buf.backspace());
        assert_eq!(buf.line_count(), 2);
        assert_eq!(rows(&buf), vec!["one", "three"]);
        assert_eq!((buf.cursor().y(), buf.cursor().x()), (0, 3));
        assert_eq!(buf.cursor().render_x(), 3);
        buf.validate().unwrap();
    }

    #[test]
    fn test_backspace_on_empty_last_line_keeps_it() {
        let mut buf = buffer("ab\n\n");
        buf.move_down(10);
        assert_eq!(buf.line_count(), 2);
        assert!(!buf.backspace());
        assert_eq!(buf.line_count(), 2);
    }

    // --- Line deletion ---

    #[test]
    fn test_delete_middle_line_relinks_neighbours() {
        let mut buf = buffer("a\nb\nc");
        assert!(buf.delete_line_at(1));
        assert_eq!(rows(&buf), vec!["a", "c"]);
        buf.validate().unwrap();
    }

    #[test]
    fn test_delete_first_line_moves_head() {
        let mut buf = buffer("a\nb\nc");
        assert!(buf.delete_line_at(0));
        assert_eq!(rows(&buf), vec!["b", "c"]);
        assert_eq!(buf.find_line(0).unwrap().text(), "b");
        buf.validate().unwrap();
    }

    #[test]
    fn test_delete_last_line_is_rejected() {
        let mut buf = buffer("a\nb");
        assert!(!buf.delete_line_at(1));
        assert_eq!(buf.line_count(), 2);
    }

    #[test]
    fn test_delete_sole_line_is_rejected() {
        let mut buf = buffer("abc");
        assert!(!buf.delete_line_at(0));
        assert_eq!(buf.line_count(), 1);
    }

    #[test]
    fn test_delete_stale_key_is_rejected() {
        let mut buf = buffer("a\nb\nc");
        let key = buf.find_line(1).unwrap().key();
        assert!(buf.delete_line(key));
        assert!(!buf.delete_line(key));
        assert_eq!(buf.line_count(), 2);
    }

    #[test]
    fn test_delete_line_releases_its_chars() {
        let mut buf = buffer("abc\ndefg\nh");
        assert!(buf.delete_line_at(1));
        assert_eq!(buf.chars.len(), 4);
    }

    #[test]
    fn test_delete_line_clamps_cursor_and_lowers_high_water() {
        let text: Vec<String> = (0..8).map(|i| i.to_string()).collect();
        let mut buf = buffer(&text.join("\n"));
        for _ in 0..6 {
            buf.move_down(3);
        }
        assert_eq!(buf.cursor().high_water(), 3);
        assert!(buf.delete_line_at(2));
        assert_eq!(buf.cursor().high_water(), 2);
        assert_eq!(buf.cursor().y(), 6);
        assert_eq!(buf.cursor().x(), 0);
        buf.validate().unwrap();
    }

    // --- Line insertion ---

    #[test]
    fn test_insert_line_in_middle() {
        let mut buf = buffer("a\nb");
        assert!(buf.insert_line_at(0));
        assert_eq!(rows(&buf), vec!["a", "", "b"]);
        buf.validate().unwrap();
    }

    #[test]
    fn test_insert_line_at_end_moves_tail() {
        let mut buf = buffer("a\nb");
        assert!(buf.insert_line_at(1));
        assert_eq!(rows(&buf), vec!["a", "b", ""]);
        buf.validate().unwrap();
    }

    #[test]
    fn test_insert_line_missing_row_is_false() {
        let mut buf = buffer("a");
        assert!(!buf.insert_line_at(1));
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_insert_line_at_cursor_moves_down() {
        let mut buf = buffer("abc\ndef");
        buf.move_right();
        assert!(buf.insert_line_at_cursor(10));
        assert_eq!(rows(&buf), vec!["abc", "", "def"]);
        assert_eq!((buf.cursor().y(), buf.cursor().x(), buf.cursor().render_x()), (1, 0, 0));
        buf.validate().unwrap();
    }

    #[test]
    fn test_insert_line_at_cursor_scrolls_like_move_down() {
        let mut buf = buffer("a");
        for _ in 0..5 {
            buf.insert_line_at_cursor(2);
        }
        assert_eq!(buf.cursor().y(), 5);
        assert_eq!(buf.cursor().high_water(), 3);
        assert_eq!(buf.cursor().scroll_y(), 3);
    }

    // --- Teardown ---

    #[test]
    fn test_free_reports_every_node() {
        let buf = buffer("ab\n\ncde");
        let stats = buf.free();
        assert_eq!(stats, FreeStats { lines: 3, chars: 5 });
    }

    // --- Dirty tracking ---

    #[test]
    fn test_new_buffer_is_clean() {
        assert!(!buffer("abc").is_dirty());
    }

    #[test]
    fn test_mark_clean_resets_dirty() {
        let mut buf = buffer("abc");
        buf.insert_char('!');
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(char),
            Delete(usize, usize),
            Backspace,
            InsertLine(usize),
            OpenLine,
            DeleteLine(usize),
            Move(u8),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                prop::sample::select(vec!['a', 'z', ' ', '中', 'é', '\u{301}', '\t'])
                    .prop_map(Op::Insert),
                (0..8usize, 0..8usize).prop_map(|(x, y)| Op::Delete(x, y)),
                Just(Op::Backspace),
                (0..8usize).prop_map(Op::InsertLine),
                Just(Op::OpenLine),
                (0..8usize).prop_map(Op::DeleteLine),
                (0..4u8).prop_map(Op::Move),
            ]
        }

        fn apply(buf: &mut TextBuffer, op: &Op) {
            match *op {
                Op::Insert(c) => {
                    buf.insert_char(c);
                }
                Op::Delete(x, y) => {
                    buf.delete_char_at(x, y);
                }
                Op::Backspace => {
                    buf.backspace();
                }
                Op::InsertLine(y) => {
                    buf.insert_line_at(y);
                }
                Op::OpenLine => {
                    buf.insert_line_at_cursor(4);
                }
                Op::DeleteLine(y) => {
                    buf.delete_line_at(y);
                }
                Op::Move(d) => {
                    let direction = match d {
                        0 => crate::editor::Direction::Up,
                        1 => crate::editor::Direction::Down,
                        2 => crate::editor::Direction::Left,
                        _ => crate::editor::Direction::Right,
                    };
                    buf.move_cursor(direction, 4);
                }
            }
        }

        proptest! {
            #[test]
            fn links_and_sizes_hold_after_any_ops(
                text in "[a-c\n]{0,24}",
                ops in prop::collection::vec(op(), 0..64),
            ) {
                let mut buf = TextBuffer::from_text(&text).unwrap();
                for op in &ops {
                    apply(&mut buf, op);
                    prop_assert!(buf.validate().is_ok(), "{:?} after {:?}", buf.validate(), op);
                }
                let walked: usize = buf.lines().map(|l| l.chars().count()).sum();
                prop_assert_eq!(walked, buf.chars.len());
                prop_assert!(buf.line_count() >= 1);
            }

            #[test]
            fn find_char_matches_loaded_text(lines in prop::collection::vec("[a-z中é]{0,12}", 1..10)) {
                let buf = TextBuffer::from_text(&(lines.join("\n") + "\n")).unwrap();
                prop_assert_eq!(buf.line_count(), lines.len());
                for (y, expected) in lines.iter().enumerate() {
                    let line = buf.find_line(y).unwrap();
                    for (x, ch) in expected.chars().enumerate() {
                        prop_assert_eq!(line.find_char(x).map(|c| c.value()), Some(ch));
                    }
                }
            }
        }
    }
}
