//! Contains the [`Scanner`] that skips the input carrying no meaning.

use std::sync::Arc;

use derive_more::{Deref, DerefMut};
use soop_base::source_file::{Cursor, SourceFile, Span};

/// Is a [`Cursor`] that knows which characters are insignificant.
///
/// Spaces, tabs, carriage returns and newlines are whitespace. A `#` starts a comment that runs
/// up to, but not including, the next newline.
#[derive(Debug, Clone, Deref, DerefMut)]
pub struct Scanner<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the start of the given source file.
    #[must_use]
    pub fn new(source_file: &'a Arc<SourceFile>) -> Self {
        Self {
            cursor: source_file.cursor(),
        }
    }

    /// Checks whether the given character is skipped as whitespace.
    #[must_use]
    pub fn is_whitespace(character: char) -> bool {
        matches!(character, ' ' | '\t' | '\r' | '\n')
    }

    /// Skips whitespace and comments, leaving the cursor at the first character of the next
    /// lexeme or at the end of the source.
    ///
    /// Returns the span that was skipped, which is empty when nothing was.
    pub fn skip_insignificant(&mut self) -> Span {
        let start = self.cursor.position();

        while let Some(character) = self.cursor.peek() {
            if Self::is_whitespace(character) {
                self.cursor.advance();
            } else if character == '#' {
                while self.cursor.peek().map_or(false, |character| character != '\n') {
                    self.cursor.advance();
                }
            } else {
                break;
            }
        }

        self.cursor.span_from(start)
    }
}
