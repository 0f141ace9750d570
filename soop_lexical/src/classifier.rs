//! Contains the [`Classifier`] which turns the lexeme under a cursor into a [`Token`].

use derive_new::new;
use getset::CopyGetters;
use soop_base::source_file::{ByteIndex, Cursor};
use thiserror::Error;

use crate::{
    error::{self, UnexpectedCharacter, UnterminatedStringLiteral},
    token::{ReservedWords, Token, TokenKind},
};

/// Operators ordered from the longest to the shortest, so the first match is the longest one.
const OPERATORS: [&str; 25] = [
    "//=", "++", "--", "+=", "-=", "*=", "/=", "%=", ">=", "<=", "==", "!=", "||", "&&", "//",
    "+", "-", "*", "/", "%", "^", ">", "<", "!", "=",
];

const PUNCTUATIONS: [char; 10] = ['(', ')', '{', '}', '[', ']', ':', ';', ',', '.'];

/// Is an error that can occur when invoking [`Classifier::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Error)]
pub enum Error {
    /// The cursor argument has no character left to classify.
    #[error("the cursor argument is at the end of the source code.")]
    EndOfSourceCode,
}

/// Is the outcome of classifying one lexeme.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Classification {
    /// The produced token, of kind [`TokenKind::Error`] when the lexeme is malformed.
    pub token: Token,

    /// The lexical error explaining an [`TokenKind::Error`] token.
    pub error: Option<error::Error>,
}

impl From<Token> for Classification {
    fn from(token: Token) -> Self { Self { token, error: None } }
}

/// The states a string literal goes through while it is being consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringState {
    Start,
    InString,
    Escape,
    Closed,
}

/// Decides the category of the lexeme under a cursor and consumes exactly its characters.
#[derive(Debug, Clone, Copy, CopyGetters, new)]
pub struct Classifier<'a> {
    /// Gets the table deciding which words are keywords.
    #[get_copy = "pub"]
    reserved_words: &'a ReservedWords,
}

impl<'a> Classifier<'a> {
    /// Increments the cursor while the predicate holds for the character under it.
    fn walk(cursor: &mut Cursor, predicate: impl Fn(char) -> bool) {
        while cursor.peek().map_or(false, &predicate) {
            cursor.advance();
        }
    }

    /// Checks if the given character is a valid first character of an identifier.
    fn is_first_identifier_character(character: char) -> bool {
        character == '_' || character.is_alphabetic()
    }

    /// Checks if the given character is a valid character of an identifier.
    fn is_identifier_character(character: char) -> bool {
        character == '_' || character.is_alphanumeric()
    }

    /// Checks if the cursor stands before a line break.
    fn is_at_line_break(cursor: &Cursor) -> bool {
        match cursor.peek() {
            Some('\n') => true,
            Some('\r') => cursor.peek_at(1) == Some('\n'),
            _ => false,
        }
    }

    fn handle_numeric_literal(cursor: &mut Cursor, start: ByteIndex, line: usize) -> Token {
        Self::walk(cursor, |character| character.is_ascii_digit());

        // a dot only belongs to the literal when a digit follows it
        let kind = if cursor.peek() == Some('.')
            && cursor.peek_at(1).map_or(false, |character| character.is_ascii_digit())
        {
            cursor.advance();
            Self::walk(cursor, |character| character.is_ascii_digit());

            TokenKind::Float
        } else {
            TokenKind::Integer
        };

        Token::new(cursor.span_from(start), kind, line)
    }

    fn handle_identifier_and_keyword(
        &self,
        cursor: &mut Cursor,
        start: ByteIndex,
        line: usize,
    ) -> Token {
        Self::walk(cursor, Self::is_identifier_character);

        let span = cursor.span_from(start);
        let kind = if self.reserved_words.contains(span.str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        Token::new(span, kind, line)
    }

    fn handle_string_literal(
        cursor: &mut Cursor,
        start: ByteIndex,
        line: usize,
        column: usize,
        quote: char,
    ) -> Classification {
        let mut state = StringState::Start;

        while state != StringState::Closed {
            if state != StringState::Start
                && (cursor.is_at_end() || Self::is_at_line_break(cursor))
            {
                let span = cursor.span_from(start);

                return Classification {
                    token: Token::new(span.clone(), TokenKind::Error, line),
                    error: Some(
                        UnterminatedStringLiteral {
                            span,
                            line,
                            column,
                        }
                        .into(),
                    ),
                };
            }

            let Some(character) = cursor.advance() else {
                break;
            };

            state = match state {
                StringState::Start | StringState::Escape => StringState::InString,
                StringState::InString if character == '\\' => StringState::Escape,
                StringState::InString if character == quote => StringState::Closed,
                StringState::InString | StringState::Closed => state,
            };
        }

        Token::new(cursor.span_from(start), TokenKind::String, line).into()
    }

    fn handle_operator_and_punctuation(
        cursor: &mut Cursor,
        start: ByteIndex,
        line: usize,
    ) -> Option<Token> {
        let operator = OPERATORS.iter().find(|operator| {
            operator
                .chars()
                .enumerate()
                .all(|(offset, character)| cursor.peek_at(offset) == Some(character))
        });

        let kind = if let Some(operator) = operator {
            for _ in 0..operator.chars().count() {
                cursor.advance();
            }

            TokenKind::Operator
        } else if cursor
            .peek()
            .map_or(false, |character| PUNCTUATIONS.contains(&character))
        {
            cursor.advance();

            TokenKind::Punctuation
        } else {
            return None;
        };

        Some(Token::new(cursor.span_from(start), kind, line))
    }

    /// Classifies the lexeme starting under the cursor.
    ///
    /// The cursor must stand on the first character of a lexeme (see
    /// [`crate::scanner::Scanner::skip_insignificant`]). The function consumes the longest run of
    /// characters forming a token of the dispatched category and leaves the cursor on the first
    /// character after it. A character that cannot start any token is consumed alone and
    /// reported as an [`UnexpectedCharacter`].
    ///
    /// # Errors
    /// - [`Error::EndOfSourceCode`] - The cursor argument is at the end of the source code.
    pub fn classify(&self, cursor: &mut Cursor) -> Result<Classification, Error> {
        let character = cursor.peek().ok_or(Error::EndOfSourceCode)?;
        let start = cursor.position();
        let line = cursor.line();
        let column = cursor.column();

        // Found numeric literal
        if character.is_ascii_digit() {
            Ok(Self::handle_numeric_literal(cursor, start, line).into())
        }
        // Found identifier/keyword
        else if Self::is_first_identifier_character(character) {
            Ok(self
                .handle_identifier_and_keyword(cursor, start, line)
                .into())
        }
        // Found string literal
        else if character == '"' || character == '\'' {
            Ok(Self::handle_string_literal(
                cursor, start, line, column, character,
            ))
        }
        // Found operator/punctuation
        else if let Some(token) = Self::handle_operator_and_punctuation(cursor, start, line) {
            Ok(token.into())
        }
        // Found a character that cannot start any token
        else {
            cursor.advance();
            let span = cursor.span_from(start);

            Ok(Classification {
                token: Token::new(span.clone(), TokenKind::Error, line),
                error: Some(
                    UnexpectedCharacter {
                        span,
                        character,
                        line,
                        column,
                    }
                    .into(),
                ),
            })
        }
    }
}
