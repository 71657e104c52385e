// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

/// A byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A span covering both `self` and `other`.
    pub fn join(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Precomputed line-start offsets for O(log n) byte-offset → line:col lookup.
///
/// The formatter leans on this for blank-line decisions (gaps between
/// member end/start lines) and the CLI uses it for error excerpts.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offset of the start of each line. line_starts[0] is always 0.
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map by scanning source for newlines. O(n).
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        LineMap { line_starts }
    }

    /// Convert byte offset to (line, col), both 1-based. O(log n).
    pub fn offset_to_line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset as u32;
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line = (line_idx + 1) as u32;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// 1-based line number containing the byte offset.
    pub fn line_of(&self, offset: usize) -> u32 {
        self.offset_to_line_col(offset).0
    }

    /// Get the source text of a 1-based line number. O(1).
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> Option<&'a str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| (s as usize).saturating_sub(1)) // exclude the \n
            .unwrap_or(source.len());
        source.get(start..end)
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source() {
        let lm = LineMap::new("");
        assert_eq!(lm.offset_to_line_col(0), (1, 1));
        assert_eq!(lm.line_count(), 1);
    }

    #[test]
    fn single_line() {
        let lm = LineMap::new("T: untyped");
        assert_eq!(lm.offset_to_line_col(0), (1, 1));
        assert_eq!(lm.offset_to_line_col(3), (1, 4));
        assert_eq!(lm.line_text("T: untyped", 1), Some("T: untyped"));
        assert_eq!(lm.line_text("T: untyped", 2), None);
    }

    #[test]
    fn multi_line() {
        let src = "class Foo\n  A: 1\nend";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_count(), 3);
        assert_eq!(lm.offset_to_line_col(0), (1, 1)); // 'c'
        assert_eq!(lm.offset_to_line_col(8), (1, 9)); // 'o'
        assert_eq!(lm.offset_to_line_col(12), (2, 3)); // 'A'
        assert_eq!(lm.offset_to_line_col(17), (3, 1)); // 'e'
        assert_eq!(lm.line_of(12), 2);

        assert_eq!(lm.line_text(src, 1), Some("class Foo"));
        assert_eq!(lm.line_text(src, 2), Some("  A: 1"));
        assert_eq!(lm.line_text(src, 3), Some("end"));
    }

    #[test]
    fn offset_at_newline() {
        let src = "A: 1\nB: 2\n";
        let lm = LineMap::new(src);
        // Offset 4 is the '\n' — belongs to line 1
        assert_eq!(lm.offset_to_line_col(4), (1, 5));
        // Offset 5 is 'B' — line 2
        assert_eq!(lm.offset_to_line_col(5), (2, 1));
    }

    #[test]
    fn trailing_newline() {
        let src = "A: 1\n";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_count(), 2);
        assert_eq!(lm.line_text(src, 1), Some("A: 1"));
        // Line 2 is empty (after trailing newline)
        assert_eq!(lm.line_text(src, 2), Some(""));
    }

    #[test]
    fn span_join() {
        let a = Span::new(3, 7);
        let b = Span::new(5, 12);
        assert_eq!(a.join(b), Span::new(3, 12));
        assert_eq!(b.join(a), Span::new(3, 12));
    }
}
