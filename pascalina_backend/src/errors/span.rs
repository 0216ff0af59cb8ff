use std::{
    cmp::{max, min},
    ops::Range,
};

/// Represents a highlighted span in a source listing.
///
/// `start` and `length` count characters, not bytes.
/// `line` and `column` are 1-based and refer to the first
/// character of the span; they are 0 for spans that don't
/// come from source text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Span {
    pub start: usize,
    pub length: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub const fn new(start: usize, length: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            length,
            line,
            column,
        }
    }

    /// Create an empty span that highlights nothing.
    pub const fn empty() -> Self {
        Self {
            start: 0,
            length: 0,
            line: 0,
            column: 0,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub const fn end(&self) -> usize {
        self.start + self.length
    }

    /// Adjust this span so that it contains `other`.
    /// For instance, if we have two spans:
    /// ```text
    /// while x > 0 do write(x);
    /// ^^^^^          ^^^^^
    /// span_a         span_b
    /// ```
    ///
    /// ...then `span_a.grow_to_contain(&span_b)` would make `span_a` look like
    /// this:
    /// ```text
    /// while x > 0 do write(x);
    /// ^^^^^^^^^^^^^^^^^^^^
    /// span_a
    /// ```
    ///
    /// `span_b.grow_to_contain(&span_a)` would produce the same result.
    /// The line and column always follow whichever span starts first.
    pub fn grow_to_contain(&mut self, other: &Span) {
        if other.is_empty() {
            // x + 0 = x,
            // so we don't need to do anything
        } else if self.is_empty() {
            // 0 + x = x,
            // so we must take on the value of other
            *self = *other;
        } else {
            let end = max(self.end(), other.end());

            if other.start < self.start {
                self.line = other.line;
                self.column = other.column;
            }

            self.start = min(self.start, other.start);
            self.length = end - self.start;
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end()
    }
}
