//! Contains all kinds of lexical errors that can occur while tokenizing the source code.

use std::fmt::Display;

use derive_more::From;
use enum_as_inner::EnumAsInner;
use serde::Serialize;
use soop_base::{
    log::{Message, Severity, SourceCodeDisplay},
    source_file::Span,
};

/// A string literal reached a newline or the end of the source before its closing quote.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnterminatedStringLiteral {
    /// The span from the opening quote to the end of the abandoned text.
    pub span: Span,

    /// The line the literal was opened on.
    pub line: usize,

    /// The column of the opening quote.
    pub column: usize,
}

impl Display for UnterminatedStringLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(Severity::Error, "found an unterminated string literal"),
            SourceCodeDisplay::new(
                &self.span,
                Some("string literals must be closed on the line they start")
            )
        )
    }
}

/// A character that cannot start any token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnexpectedCharacter {
    /// The span of the character.
    pub span: Span,

    /// The character itself.
    pub character: char,

    /// The line the character is on.
    pub line: usize,

    /// The column the character is at.
    pub column: usize,
}

impl Display for UnexpectedCharacter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(
                Severity::Error,
                format!("found an unexpected character `{}`", self.character.escape_debug())
            ),
            SourceCodeDisplay::new(&self.span, Option::<i32>::None)
        )
    }
}

/// Is an enumeration containing all kinds of lexical errors that can occur while tokenizing the
/// source code.
///
/// Every lexical error is recoverable: the analyzer keeps scanning after reporting it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner, From)]
#[allow(missing_docs)]
pub enum Error {
    UnterminatedStringLiteral(UnterminatedStringLiteral),
    UnexpectedCharacter(UnexpectedCharacter),
}

impl Error {
    /// Gets the span of the source code the error covers.
    #[must_use]
    pub fn span(&self) -> &Span {
        match self {
            Self::UnterminatedStringLiteral(err) => &err.span,
            Self::UnexpectedCharacter(err) => &err.span,
        }
    }

    /// Gets the line the error is reported on.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::UnterminatedStringLiteral(err) => err.line,
            Self::UnexpectedCharacter(err) => err.line,
        }
    }

    /// Gets the column (starting at 1, counted in characters) the error starts at.
    #[must_use]
    pub fn column(&self) -> usize {
        match self {
            Self::UnterminatedStringLiteral(err) => err.column,
            Self::UnexpectedCharacter(err) => err.column,
        }
    }

    /// Gets the plain, uncolored message describing the error.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::UnterminatedStringLiteral(..) => "unterminated string literal".to_string(),
            Self::UnexpectedCharacter(err) => {
                format!("unexpected character `{}`", err.character.escape_debug())
            }
        }
    }

    /// Creates the [`ErrorRecord`] summarizing this error.
    #[must_use]
    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord {
            message: self.message(),
            line: self.line(),
            column: self.column(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedStringLiteral(err) => write!(f, "{err}"),
            Self::UnexpectedCharacter(err) => write!(f, "{err}"),
        }
    }
}

/// Is the structured, source independent summary of a lexical error.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ErrorRecord {
    /// What went wrong.
    pub message: String,

    /// The line (starting at 1) the error is reported on.
    pub line: usize,

    /// The column (starting at 1, counted in characters) the error starts at.
    pub column: usize,
}
