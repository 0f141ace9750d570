//! Contains the [`Analyzer`] that drives the scanner and the classifier over a whole source file.

use std::{ops::Index, sync::Arc};

use derive_more::Deref;
use derive_new::new;
use getset::Getters;
use soop_base::{
    diagnostic::{Dummy, Handler},
    source_file::SourceFile,
};

use crate::{
    classifier::{self, Classifier},
    error::{self, ErrorRecord},
    scanner::Scanner,
    token::{ReservedWords, Token, TokenKind},
};

/// Is the configuration of an [`Analyzer`].
#[derive(Debug, Clone, PartialEq, Eq, Default, new)]
pub struct Options {
    /// The words classified as keywords.
    pub reserved_words: ReservedWords,
}

/// Is the ordered list of tokens of a source file, always terminated by a single
/// [`TokenKind::End`] token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref)]
pub struct TokenStream {
    #[deref]
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Gets the tokens without the trailing [`TokenKind::End`] marker.
    #[must_use]
    pub fn without_end(&self) -> &[Token] {
        match self.tokens.split_last() {
            Some((last, rest)) if last.kind() == TokenKind::End => rest,
            _ => &self.tokens,
        }
    }

    /// Dissolves this struct into its list of tokens.
    #[must_use]
    pub fn dissolve(self) -> Vec<Token> { self.tokens }
}

impl Index<usize> for TokenStream {
    type Output = Token;

    fn index(&self, index: usize) -> &Self::Output { &self.tokens[index] }
}

/// Is the result of analyzing one source file.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct AnalysisResult {
    /// Gets the tokens in source order.
    #[get = "pub"]
    tokens: TokenStream,

    /// Gets the lexical errors in source order.
    #[get = "pub"]
    errors: Vec<ErrorRecord>,
}

impl AnalysisResult {
    /// Checks whether any lexical error was found.
    #[must_use]
    pub fn has_errors(&self) -> bool { !self.errors.is_empty() }

    /// Dissolves this struct into a tuple of its components.
    #[must_use]
    pub fn dissolve(self) -> (TokenStream, Vec<ErrorRecord>) { (self.tokens, self.errors) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    Done,
}

/// Tokenizes SOOP source files.
///
/// The analyzer only holds its [`Options`]; each call to [`Analyzer::analyze`] is independent,
/// so one analyzer can serve any number of threads at once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters, new)]
pub struct Analyzer {
    /// Gets the configuration of the analyzer.
    #[get = "pub"]
    options: Options,
}

impl Analyzer {
    /// Tokenizes the given source file.
    ///
    /// Lexical errors never stop the analysis: each one becomes an [`TokenKind::Error`] token in
    /// the stream and an [`ErrorRecord`] in the result, and is sent to the `handler`.
    #[must_use]
    pub fn analyze(
        &self,
        source_file: &Arc<SourceFile>,
        handler: &dyn Handler<error::Error>,
    ) -> AnalysisResult {
        let classifier = Classifier::new(&self.options.reserved_words);
        let mut scanner = Scanner::new(source_file);

        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        let mut state = State::Scanning;

        while state == State::Scanning {
            scanner.skip_insignificant();

            match classifier.classify(&mut scanner) {
                Ok(classification) => {
                    if let Some(error) = classification.error {
                        errors.push(error.to_record());
                        handler.receive(error);
                    }

                    tokens.push(classification.token);
                }
                Err(classifier::Error::EndOfSourceCode) => {
                    let end = scanner.span_from(scanner.position());
                    tokens.push(Token::new(end, TokenKind::End, scanner.line()));

                    state = State::Done;
                }
            }
        }

        AnalysisResult {
            tokens: TokenStream { tokens },
            errors,
        }
    }
}

/// Tokenizes the given source text with the default [`Options`].
#[must_use]
pub fn analyze(source: &str) -> AnalysisResult {
    let source_file = SourceFile::in_memory("<input>", source);
    Analyzer::default().analyze(&source_file, &Dummy)
}

#[cfg(test)]
pub(crate) mod tests;
