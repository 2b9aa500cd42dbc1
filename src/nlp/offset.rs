//! Byte/character offset conversion.
//!
//! All spans in the public API are character (Unicode scalar value) ranges,
//! while the `regex` crate reports byte offsets. A per-document offset map
//! converts between the two without rescanning the text.

/// Offset map for one document.
///
/// Built once per request; lookups are O(1) for char -> byte and
/// O(log n) for byte -> char.
#[derive(Debug, Clone)]
pub struct CharOffsets {
    byte_of_char: Vec<usize>,
    byte_len: usize,
}

impl CharOffsets {
    /// Build the offset map for `text`.
    pub fn new(text: &str) -> Self {
        Self {
            byte_of_char: text.char_indices().map(|(b, _)| b).collect(),
            byte_len: text.len(),
        }
    }

    /// Number of characters in the document.
    pub fn char_len(&self) -> usize {
        self.byte_of_char.len()
    }

    /// Byte offset of the character at `char_idx`. `char_len` maps to the
    /// end of the text.
    pub fn byte_at_char(&self, char_idx: usize) -> usize {
        if char_idx >= self.byte_of_char.len() {
            self.byte_len
        } else {
            self.byte_of_char[char_idx]
        }
    }

    /// Character index of the byte offset `byte_idx`, which must lie on a
    /// character boundary. `byte_len` maps to `char_len`.
    pub fn char_at_byte(&self, byte_idx: usize) -> usize {
        match self.byte_of_char.binary_search(&byte_idx) {
            Ok(i) => i,
            Err(i) => i,
        }
    }

    /// Convert a byte range to a character range.
    pub fn char_range(&self, byte_start: usize, byte_end: usize) -> (usize, usize) {
        (self.char_at_byte(byte_start), self.char_at_byte(byte_end))
    }

    /// Slice `text` by a character range.
    pub fn slice<'t>(&self, text: &'t str, char_start: usize, char_end: usize) -> &'t str {
        &text[self.byte_at_char(char_start)..self.byte_at_char(char_end)]
    }
}
