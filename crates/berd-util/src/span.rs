//! Source location tracking.
//!
//! A [`Span`] is a half-open byte range into the original source text. The
//! lexer stamps every token with one, the parser derives whitespace widths
//! from the gaps between them, and runtime errors carry them back to the
//! driver for rendering.

use std::fmt;

/// A half-open byte range `[start, end)` into the source text.
///
/// # Examples
///
/// ```
/// use berd_util::Span;
///
/// let span = Span::new(4, 9);
/// assert_eq!(span.len(), 5);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start byte offset in source.
    pub start: usize,
    /// End byte offset in source (exclusive).
    pub end: usize,
}

impl Span {
    /// A span that points nowhere, for synthesized nodes and tests.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    /// Creates a new span.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates a zero-width span at a single offset.
    #[inline]
    pub const fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span covers no bytes.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the smallest span covering both `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use berd_util::Span;
    ///
    /// let merged = Span::new(2, 5).to(Span::new(9, 12));
    /// assert_eq!(merged, Span::new(2, 12));
    /// ```
    #[inline]
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Maps byte offsets back to human-readable positions in one source file.
///
/// Line starts are collected once up front; lookups binary-search them.
///
/// # Examples
///
/// ```
/// use berd_util::SourceMap;
///
/// let map = SourceMap::new("print 1!\nprint 2!\n");
/// assert_eq!(map.line_col(0), (1, 1));
/// assert_eq!(map.line_col(9), (2, 1));
/// ```
pub struct SourceMap<'a> {
    source: &'a str,
    /// Byte offset of the first character of each line.
    line_starts: Vec<usize>,
}

impl<'a> SourceMap<'a> {
    /// Builds the line table for `source`.
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// The source text this map was built from.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Translates a byte offset into a 1-based `(line, column)` pair.
    ///
    /// Columns are counted in characters, not bytes, so multi-byte
    /// identifiers report sensible positions. Offsets past the end of the
    /// source clamp to the final position.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.source.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_idx];
        let column = self.source[line_start..offset].chars().count() as u32 + 1;
        (line_idx as u32 + 1, column)
    }

    /// Returns the text of a 1-based line, without its trailing newline.
    pub fn line_text(&self, line: u32) -> Option<&'a str> {
        let idx = line.checked_sub(1)? as usize;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        let text = &self.source[start..end.max(start)];
        Some(text.strip_suffix('\r').unwrap_or(text))
    }
}
