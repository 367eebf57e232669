// selection module for text selection data structures
//
// Offsets are char indices into the document text, matching what the
// editor widget reports for its cursor.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TextPosition {
    pub line: usize,
    pub column: usize,
}

impl TextPosition {
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let mut line = 0;
        let mut column = 0;
        for c in text.chars().take(offset) {
            if c == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        Self { line, column }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: usize, // Where selection started
    pub cursor: usize, // Current cursor position
}

impl Selection {
    pub fn new(pos: usize) -> Self {
        Self {
            anchor: pos,
            cursor: pos,
        }
    }

    pub fn range(start: usize, end: usize) -> Self {
        Self {
            anchor: start,
            cursor: end,
        }
    }

    pub fn is_active(&self) -> bool {
        self.anchor != self.cursor
    }

    // Ordered start and end (anchor might be after cursor)
    pub fn get_range(&self) -> (usize, usize) {
        if self.anchor <= self.cursor {
            (self.anchor, self.cursor)
        } else {
            (self.cursor, self.anchor)
        }
    }

    pub fn clamp(self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            cursor: self.cursor.min(len),
        }
    }

    pub fn selected_text(&self, text: &str) -> String {
        let (start, end) = self.get_range();
        text.chars().skip(start).take(end - start).collect()
    }
}

/// Byte offset of the char at `char_index`, or the text length past the end.
pub fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Char offset where the line containing `offset` starts.
pub fn line_start(text: &str, offset: usize) -> usize {
    let byte = byte_offset(text, offset);
    match text[..byte].rfind('\n') {
        Some(i) => char_count(&text[..i]) + 1,
        None => 0,
    }
}

/// Char offset of the end of the line containing `offset` (before `\n`).
pub fn line_end(text: &str, offset: usize) -> usize {
    let byte = byte_offset(text, offset);
    match text[byte..].find('\n') {
        Some(i) => offset + char_count(&text[byte..byte + i]),
        None => char_count(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_ordered() {
        let selection = Selection::range(8, 3);
        assert!(selection.is_active());
        assert_eq!(selection.get_range(), (3, 8));
        assert!(!Selection::new(4).is_active());
    }

    #[test]
    fn position_from_offset() {
        let text = "one\ntwo\nthree";
        assert_eq!(TextPosition::from_offset(text, 0), TextPosition { line: 0, column: 0 });
        assert_eq!(TextPosition::from_offset(text, 5), TextPosition { line: 1, column: 1 });
        assert_eq!(TextPosition::from_offset(text, 100), TextPosition { line: 2, column: 5 });
    }

    #[test]
    fn multibyte_offsets() {
        let text = "héllo\nwörld";
        assert_eq!(byte_offset(text, 2), 3);
        assert_eq!(byte_offset(text, 99), text.len());
        assert_eq!(Selection::range(6, 11).selected_text(text), "wörld");
    }

    #[test]
    fn line_bounds() {
        let text = "first\nsecond\nthird";
        assert_eq!(line_start(text, 8), 6);
        assert_eq!(line_end(text, 8), 12);
        assert_eq!(line_start(text, 2), 0);
        assert_eq!(line_end(text, 15), 18);
    }
}
