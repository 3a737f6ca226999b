//! Arena records for lines and codepoints.
//!
//! Nodes live in [`SlotMap`]s owned by the buffer and refer to their
//! neighbours by key, so splicing is key rewiring and a removed node can
//! never be reached through a stale link.

use slotmap::{SlotMap, new_key_type};

use super::width::char_width;

new_key_type! {
    /// Stable handle to a line node.
    pub struct LineKey;
    /// Stable handle to a codepoint node.
    pub struct CharKey;
}

/// Most nodes a single arena will hold; slotmap's own ceiling is `u32::MAX - 1`.
pub const NODE_LIMIT: usize = u32::MAX as usize - 1;

#[derive(Debug, Clone)]
pub(crate) struct CharNode {
    pub(crate) value: char,
    pub(crate) prev: Option<CharKey>,
    pub(crate) next: Option<CharKey>,
}

impl CharNode {
    pub(crate) const fn new(value: char) -> Self {
        Self {
            value,
            prev: None,
            next: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct LineNode {
    pub(crate) size: usize,
    pub(crate) first_char: Option<CharKey>,
    pub(crate) last_char: Option<CharKey>,
    pub(crate) prev: Option<LineKey>,
    pub(crate) next: Option<LineKey>,
}

/// A codepoint looked up by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codepoint {
    key: CharKey,
    value: char,
}

impl Codepoint {
    pub(crate) const fn new(key: CharKey, value: char) -> Self {
        Self { key, value }
    }

    pub const fn key(&self) -> CharKey {
        self.key
    }

    pub const fn value(&self) -> char {
        self.value
    }

    /// Display width in terminal cells.
    pub fn width(&self) -> usize {
        char_width(self.value)
    }
}

/// Borrowed view of one line.
#[derive(Clone, Copy)]
pub struct LineRef<'a> {
    key: LineKey,
    node: &'a LineNode,
    chars: &'a SlotMap<CharKey, CharNode>,
}

impl<'a> LineRef<'a> {
    pub(crate) const fn new(
        key: LineKey,
        node: &'a LineNode,
        chars: &'a SlotMap<CharKey, CharNode>,
    ) -> Self {
        Self { key, node, chars }
    }

    pub const fn key(&self) -> LineKey {
        self.key
    }

    /// Number of codepoints on the line.
    pub const fn size(&self) -> usize {
        self.node.size
    }

    pub const fn is_empty(&self) -> bool {
        self.node.size == 0
    }

    /// Codepoints from `first_char` to `last_char`.
    pub fn chars(&self) -> Chars<'a> {
        Chars {
            next: self.node.first_char,
            remaining: self.node.size,
            chars: self.chars,
        }
    }

    /// Codepoint at zero-based `index`, scanning from the start of the line.
    pub fn find_char(&self, index: usize) -> Option<Codepoint> {
        if index >= self.node.size {
            return None;
        }
        let mut cursor = self.node.first_char;
        for _ in 0..index {
            cursor = self.chars.get(cursor?)?.next;
        }
        let key = cursor?;
        self.chars.get(key).map(|node| Codepoint::new(key, node.value))
    }

    /// The line's content as a string.
    pub fn text(&self) -> String {
        self.chars().collect()
    }

    /// Display width of the whole line.
    pub fn width(&self) -> usize {
        self.chars().map(char_width).sum()
    }
}

impl std::fmt::Debug for LineRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineRef")
            .field("size", &self.node.size)
            .field("text", &self.text())
            .finish()
    }
}

/// Iterator over the codepoints of a line.
pub struct Chars<'a> {
    next: Option<CharKey>,
    remaining: usize,
    chars: &'a SlotMap<CharKey, CharNode>,
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.chars.get(self.next?)?;
        self.next = node.next;
        self.remaining -= 1;
        Some(node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
