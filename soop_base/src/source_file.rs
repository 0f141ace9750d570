#![allow(clippy::future_not_send)]

//! Contains the source buffer that the lexical analyzer reads from.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    fs::File,
    hash::{Hash, Hasher},
    ops::Range,
    path::PathBuf,
    sync::Arc,
};

use getset::{CopyGetters, Getters};
use memmap::{Mmap, MmapOptions};
use ouroboros::self_referencing;
use thiserror::Error;

/// Is an error raised while reading a source file from disk.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Utf8Error(#[from] std::str::Utf8Error),
}

/// Represents an immutable SOOP source text, either mapped from a file or received in memory.
#[derive(Getters)]
pub struct SourceFile {
    text: Text,

    /// Gets the path (or the display name for in-memory sources) of the source file.
    #[get = "pub"]
    path: PathBuf,

    /// Byte ranges of every line, including their terminators.
    lines: Vec<Range<usize>>,
}

impl Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SourceFile({}, {} lines)", self.path.display(), self.lines.len())
    }
}

enum Text {
    Mapped(MappedText),
    Owned(String),
}

impl Text {
    fn as_str(&self) -> &str {
        match self {
            Self::Mapped(mapped) => mapped.borrow_text(),
            Self::Owned(text) => text,
        }
    }
}

/// A memory-mapped file together with its validated UTF-8 view.
#[self_referencing]
struct MappedText {
    file: File,

    // empty files cannot be mapped
    map: Option<Mmap>,

    #[borrows(map)]
    text: &'this str,
}

impl MappedText {
    fn map(file: File) -> Result<Self, Error> {
        let map = if file.metadata()?.len() == 0 {
            None
        } else {
            Some(unsafe { MmapOptions::new().map(&file)? })
        };

        MappedTextTryBuilder {
            file,
            map,
            text_builder: |map| match map {
                Some(bytes) => std::str::from_utf8(bytes).map_err(Error::from),
                None => Ok(""),
            },
        }
        .try_build()
    }
}

impl SourceFile {
    fn new(path: PathBuf, text: Text) -> Arc<Self> {
        let lines = line_ranges(text.as_str());
        Arc::new(Self { text, path, lines })
    }

    /// Gets the whole source text.
    #[must_use]
    pub fn content(&self) -> &str { self.text.as_str() }

    /// Gets the text of the given line (starting at 1), terminator included.
    #[must_use]
    pub fn get_line(&self, line: usize) -> Option<&str> {
        let range = self.lines.get(line.checked_sub(1)?)?;
        Some(&self.content()[range.clone()])
    }

    /// Gets a [`Cursor`] positioned at the first character of the source file.
    #[must_use]
    pub fn cursor<'a>(self: &'a Arc<Self>) -> Cursor<'a> {
        Cursor {
            source_file: self,
            content: self.content(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Gets the number of lines in the source file. An empty source has one empty line.
    #[must_use]
    pub fn line_number(&self) -> usize { self.lines.len() }

    /// Maps the given file into memory.
    ///
    /// # Errors
    /// - [`Error::IoError`]: the file could not be inspected or mapped.
    /// - [`Error::Utf8Error`]: the file is not valid UTF-8.
    pub fn load(file: File, path: PathBuf) -> Result<Arc<Self>, Error> {
        Ok(Self::new(path, Text::Mapped(MappedText::map(file)?)))
    }

    /// Wraps a source text that was received in memory, e.g. the body of an analysis request.
    ///
    /// The `name` is only used when rendering diagnostics.
    #[must_use]
    pub fn in_memory(name: impl Into<PathBuf>, content: impl Into<String>) -> Arc<Self> {
        Self::new(name.into(), Text::Owned(content.into()))
    }

    /// Writes `content` to a fresh `.soop` temporary file and loads it.
    ///
    /// # Errors
    /// See [`SourceFile::load`]; writing the temporary file may also fail with
    /// [`Error::IoError`].
    pub fn temp(content: impl Display) -> Result<Arc<Self>, Error> {
        use std::io::Write;

        let mut file = tempfile::Builder::new()
            .prefix("soop")
            .suffix(".soop")
            .tempfile()?;
        write!(file.as_file_mut(), "{content}")?;

        let path = file.path().to_path_buf();
        Self::load(file.into_file(), path)
    }

    /// Gets the [`Location`] just after the last character of the source file.
    #[must_use]
    pub fn end_location(&self) -> Location {
        let line = self.line_number();
        let column = self
            .get_line(line)
            .map_or(1, |last_line| last_line.chars().count() + 1);

        Location { line, column }
    }

    /// Gets the [`Location`] of the character starting at the given byte index.
    ///
    /// Returns [`None`] for the end of the text and for indices inside a character.
    #[must_use]
    pub fn get_location(&self, byte_index: ByteIndex) -> Option<Location> {
        if !self.content().is_char_boundary(byte_index) {
            return None;
        }

        let index = self.lines.partition_point(|range| range.end <= byte_index);
        let range = self.lines.get(index)?;

        Some(Location {
            line: index + 1,
            column: self.content()[range.start..byte_index].chars().count() + 1,
        })
    }
}

/// Is an unsigned integer that represents a byte index in the source code.
pub type ByteIndex = usize;

/// Represents a range of characters in a source file.
///
/// Two spans are equal only when they cover the same bytes of the same [`SourceFile`] instance.
#[derive(Clone, Getters, CopyGetters)]
pub struct Span {
    /// Gets the byte index of the first character.
    #[get_copy = "pub"]
    start: ByteIndex,

    /// Gets the byte index just past the last character.
    #[get_copy = "pub"]
    end: ByteIndex,

    /// Gets the source file the span points into.
    #[get = "pub"]
    source_file: Arc<SourceFile>,
}

impl Span {
    fn key(&self) -> (*const SourceFile, ByteIndex, ByteIndex) {
        (Arc::as_ptr(&self.source_file), self.start, self.end)
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Span({}..{}, {:?})", self.start, self.end, self.str())
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool { self.key() == other.key() }
}

impl Eq for Span {}

impl PartialOrd for Span {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Span {
    fn cmp(&self, other: &Self) -> Ordering { self.key().cmp(&other.key()) }
}

impl Hash for Span {
    fn hash<H: Hasher>(&self, state: &mut H) { self.key().hash(state) }
}

/// Is a line and column pair, both starting at 1. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[allow(missing_docs)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Span {
    /// Gets the text covered by the span.
    #[must_use]
    pub fn str(&self) -> &str { &self.source_file.content()[self.start..self.end] }

    /// Checks whether the span covers no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.start == self.end }

    /// Gets the [`Location`] of the first character.
    ///
    /// An empty span at the end of the source file is located just after its last character.
    #[must_use]
    pub fn start_location(&self) -> Location {
        self.source_file
            .get_location(self.start)
            .unwrap_or_else(|| self.source_file.end_location())
    }
}

/// Is implemented by everything that occupies a [`Span`] of a source file.
pub trait SourceElement {
    /// Gets the span of the element.
    fn span(&self) -> Span;
}

/// Is a cursor over the characters of a source file that keeps track of the current line.
///
/// Reading past the end of the source never fails; it yields [`None`] instead.
#[derive(Debug, Clone, CopyGetters)]
pub struct Cursor<'a> {
    /// Gets the source file that the cursor is reading.
    #[get_copy = "pub"]
    source_file: &'a Arc<SourceFile>,

    content: &'a str,

    /// Gets the byte index of the character under the cursor.
    #[get_copy = "pub"]
    position: ByteIndex,

    /// Gets the line (starting at 1) of the character under the cursor.
    #[get_copy = "pub"]
    line: usize,

    /// Gets the column (starting at 1, counted in characters) of the character under the cursor.
    #[get_copy = "pub"]
    column: usize,
}

impl<'a> Cursor<'a> {
    /// Peeks at the character under the cursor.
    #[must_use]
    pub fn peek(&self) -> Option<char> { self.content[self.position..].chars().next() }

    /// Peeks at the character `offset` characters after the cursor; `peek_at(0)` is
    /// [`Self::peek`].
    #[must_use]
    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.content[self.position..].chars().nth(offset)
    }

    /// Consumes the character under the cursor, moving to the next line after a `\n`.
    pub fn advance(&mut self) -> Option<char> {
        let character = self.peek()?;
        self.position += character.len_utf8();

        if character == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(character)
    }

    /// Checks whether every character has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool { self.position >= self.content.len() }

    /// Creates a span from the given start byte index up to the cursor (exclusive).
    ///
    /// `start` must be a position this cursor has previously been at.
    #[must_use]
    pub fn span_from(&self, start: ByteIndex) -> Span {
        debug_assert!(start <= self.position);

        Span {
            start,
            end: self.position,
            source_file: self.source_file.clone(),
        }
    }
}

/// Splits the text into line ranges. Only `\n` ends a line; a trailing one opens an empty line.
fn line_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;

    for line in text.split_inclusive('\n') {
        ranges.push(start..start + line.len());
        start += line.len();
    }

    if text.is_empty() || text.ends_with('\n') {
        ranges.push(start..start);
    }

    ranges
}
