use std::fmt::{Display, Write};

use proptest::{
    prelude::Arbitrary,
    prop_assert, prop_assert_eq, prop_oneof, proptest,
    strategy::{BoxedStrategy, Strategy},
    test_runner::TestCaseResult,
};
use soop_base::{
    diagnostic::{Counter, Storage},
    source_file::SourceFile,
};
use soop_test::input::Input;

use super::{analyze, AnalysisResult, Analyzer, Options};
use crate::{
    classifier,
    error,
    scanner::Scanner,
    token::{KeywordKind, Token, TokenKind},
};

/// Represents an input for the text skipped between two tokens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Trivia {
    Spaces(u8),
    Tabs(u8),
    NewLines(u8),
    Comment(String),
}

impl Trivia {
    fn new_lines(&self) -> usize {
        match self {
            Self::NewLines(count) => usize::from(*count),
            Self::Comment(..) => 1,
            Self::Spaces(..) | Self::Tabs(..) => 0,
        }
    }
}

impl Arbitrary for Trivia {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            (1u8..4).prop_map(Self::Spaces),
            (1u8..4).prop_map(Self::Tabs),
            (1u8..4).prop_map(Self::NewLines),
            "[^\\n\\r]*".prop_map(Self::Comment),
        ]
        .boxed()
    }
}

impl Display for Trivia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (character, count) = match self {
            Self::Spaces(count) => (' ', *count),
            Self::Tabs(count) => ('\t', *count),
            Self::NewLines(count) => ('\n', *count),
            Self::Comment(body) => {
                f.write_char('#')?;
                f.write_str(body)?;
                return f.write_char('\n');
            }
        };

        for _ in 0..count {
            f.write_char(character)?;
        }

        Ok(())
    }
}

/// Represents an input of tokens separated by trivia.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenStream {
    /// The trivia before the first token.
    pub leading: Option<Trivia>,

    /// Each token with the trivia following it.
    pub tokens: Vec<(classifier::tests::Token, Trivia)>,
}

impl Arbitrary for TokenStream {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            proptest::option::of(Trivia::arbitrary()),
            proptest::collection::vec(
                (classifier::tests::Token::arbitrary(), Trivia::arbitrary()),
                0..16,
            ),
        )
            .prop_map(|(leading, tokens)| Self { leading, tokens })
            .boxed()
    }
}

impl Display for TokenStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(leading) = &self.leading {
            Display::fmt(leading, f)?;
        }

        for (token, trivia) in &self.tokens {
            Display::fmt(token, f)?;
            Display::fmt(trivia, f)?;
        }

        Ok(())
    }
}

impl Input<&AnalysisResult> for &TokenStream {
    fn assert(self, output: &AnalysisResult) -> TestCaseResult {
        let tokens = output.tokens();
        prop_assert_eq!(tokens.len(), self.tokens.len() + 1);

        let mut line = 1 + self.leading.as_ref().map_or(0, Trivia::new_lines);

        for ((input, trivia), token) in self.tokens.iter().zip(tokens.iter()) {
            prop_assert_eq!(token.kind(), input.expected_kind());
            prop_assert_eq!(token.value(), input.to_string());
            prop_assert_eq!(token.line(), line);

            line += trivia.new_lines();
        }

        let end = &tokens[tokens.len() - 1];
        prop_assert_eq!(end.kind(), TokenKind::End);
        prop_assert_eq!(end.line(), line);

        let unexpected = self
            .tokens
            .iter()
            .filter(|(input, _)| matches!(input, classifier::tests::Token::Unexpected(..)))
            .count();
        prop_assert_eq!(output.errors().len(), unexpected);

        Ok(())
    }
}

/// Checks the properties every analysis result holds, whatever the source.
fn assert_invariants(source: &str, result: &AnalysisResult) -> TestCaseResult {
    let tokens = result.tokens();

    // exactly one end marker, and it comes last
    let last = tokens.last().expect("at least the end marker");
    prop_assert_eq!(last.kind(), TokenKind::End);
    prop_assert_eq!(last.value(), "");
    prop_assert_eq!(
        tokens.iter().filter(|token| token.kind() == TokenKind::End).count(),
        1
    );

    // lines start at 1 and never decrease
    prop_assert!(tokens.iter().all(|token| token.line() >= 1));
    prop_assert!(tokens.windows(2).all(|pair| pair[0].line() <= pair[1].line()));

    // tokens and the skipped gaps between them rebuild the source
    let mut rebuilt = String::new();
    let mut previous_end = 0;
    for token in tokens.iter() {
        let gap = &source[previous_end..token.span().start()];
        let gap_file = SourceFile::in_memory("<gap>", gap);
        let mut scanner = Scanner::new(&gap_file);
        let skipped = scanner.skip_insignificant();
        prop_assert_eq!(skipped.str(), gap);

        rebuilt.push_str(gap);
        rebuilt.push_str(token.value());
        previous_end = token.span().end();
    }
    prop_assert_eq!(previous_end, source.len());
    prop_assert_eq!(rebuilt.as_str(), source);

    // every error has its error token
    prop_assert_eq!(
        tokens
            .iter()
            .filter(|token| token.kind() == TokenKind::Error)
            .count(),
        result.errors().len()
    );
    prop_assert!(result.errors().len() <= source.chars().count());

    Ok(())
}

proptest! {
    #[test]
    fn analyze_token_stream(
        input in TokenStream::arbitrary()
    ) {
        let source = input.to_string();
        let source_file = SourceFile::temp(&source)?;
        let storage: Storage<error::Error> = Storage::new();

        let result = Analyzer::default().analyze(&source_file, &storage);

        input.assert(&result)?;
        assert_invariants(&source, &result)?;
        prop_assert_eq!(storage.as_vec().len(), result.errors().len());
    }

    #[test]
    fn analyze_any_text(
        source in "(.|\\n|\\r|\\t|[\"'#\\\\.0-9])*"
    ) {
        let result = analyze(&source);

        assert_invariants(&source, &result)?;
    }

    #[test]
    fn analysis_is_idempotent(
        source in "(.|\\n)*"
    ) {
        let first = analyze(&source).dissolve();
        let second = analyze(&source).dissolve();

        prop_assert_eq!(first.1, second.1);
        prop_assert!(first
            .0
            .iter()
            .zip(second.0.iter())
            .all(|(a, b)| a.kind() == b.kind() && a.value() == b.value() && a.line() == b.line()));
        prop_assert_eq!(first.0.len(), second.0.len());
    }

    #[test]
    fn error_columns_match_their_spans(
        source in "(.|\\n|\\r|\\t|[\"'$@])*"
    ) {
        let source_file = SourceFile::in_memory("<test>", source.as_str());
        let storage: Storage<error::Error> = Storage::new();

        let result = Analyzer::default().analyze(&source_file, &storage);
        let errors = storage.into_vec();

        prop_assert_eq!(errors.len(), result.errors().len());
        for (error, record) in errors.iter().zip(result.errors()) {
            let location = error.span().start_location();

            prop_assert_eq!(error.column(), location.column);
            prop_assert_eq!(record.column, location.column);
            prop_assert_eq!(record.line, location.line);
        }
    }
}

fn summarize(tokens: &[Token]) -> Vec<(TokenKind, &str, usize)> {
    tokens
        .iter()
        .map(|token| (token.kind(), token.value(), token.line()))
        .collect()
}

#[test]
fn empty_input() {
    let result = analyze("");

    assert!(!result.has_errors());
    assert_eq!(summarize(result.tokens()), [(TokenKind::End, "", 1)]);
}

#[test]
fn only_trivia() {
    let result = analyze("  # nothing here\n\t\n");

    assert!(!result.has_errors());
    assert_eq!(summarize(result.tokens()), [(TokenKind::End, "", 3)]);
}

#[test]
fn comment_lines_are_skipped() {
    let result = analyze("x = 10\n# comment\ny = x + 1");

    assert!(!result.has_errors());
    assert_eq!(summarize(result.tokens()), [
        (TokenKind::Identifier, "x", 1),
        (TokenKind::Operator, "=", 1),
        (TokenKind::Integer, "10", 1),
        (TokenKind::Identifier, "y", 3),
        (TokenKind::Operator, "=", 3),
        (TokenKind::Identifier, "x", 3),
        (TokenKind::Operator, "+", 3),
        (TokenKind::Integer, "1", 3),
        (TokenKind::End, "", 3),
    ]);
}

#[test]
fn unterminated_string_literal() {
    let result = analyze("print(\"hi)");

    assert_eq!(summarize(result.tokens()), [
        (TokenKind::Identifier, "print", 1),
        (TokenKind::Punctuation, "(", 1),
        (TokenKind::Error, "\"hi)", 1),
        (TokenKind::End, "", 1),
    ]);
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].message, "unterminated string literal");
    assert_eq!(result.errors()[0].line, 1);
    assert_eq!(result.errors()[0].column, 7);
}

#[test]
fn unterminated_string_with_print_reserved() {
    let source_file = SourceFile::in_memory("<test>", "print(\"hi)");
    let options = Options::new([KeywordKind::Print].into_iter().collect());

    let result = Analyzer::new(options).analyze(&source_file, &Counter::default());

    assert_eq!(summarize(result.tokens()), [
        (TokenKind::Keyword, "print", 1),
        (TokenKind::Punctuation, "(", 1),
        (TokenKind::Error, "\"hi)", 1),
        (TokenKind::End, "", 1),
    ]);
}

#[test]
fn scanning_resumes_after_unterminated_string() {
    let result = analyze("a = 'oops\nb = 2");

    assert_eq!(summarize(result.tokens()), [
        (TokenKind::Identifier, "a", 1),
        (TokenKind::Operator, "=", 1),
        (TokenKind::Error, "'oops", 1),
        (TokenKind::Identifier, "b", 2),
        (TokenKind::Operator, "=", 2),
        (TokenKind::Integer, "2", 2),
        (TokenKind::End, "", 2),
    ]);
}

#[test]
fn unexpected_characters_are_reported_and_skipped() {
    let source_file = SourceFile::in_memory("<test>", "total = $price @ 2");
    let counter = Counter::default();

    let result = Analyzer::default().analyze(&source_file, &counter);

    assert_eq!(summarize(result.tokens()), [
        (TokenKind::Identifier, "total", 1),
        (TokenKind::Operator, "=", 1),
        (TokenKind::Error, "$", 1),
        (TokenKind::Identifier, "price", 1),
        (TokenKind::Error, "@", 1),
        (TokenKind::Integer, "2", 1),
        (TokenKind::End, "", 1),
    ]);
    assert_eq!(counter.count(), 2);
    assert_eq!(
        result
            .errors()
            .iter()
            .map(|record| (record.message.as_str(), record.column))
            .collect::<Vec<_>>(),
        [("unexpected character `$`", 9), ("unexpected character `@`", 16)]
    );
}

#[test]
fn errors_on_a_long_line() {
    let source = "$".repeat(50_000);
    let result = analyze(&source);

    assert_eq!(result.errors().len(), 50_000);
    assert!(result
        .errors()
        .iter()
        .enumerate()
        .all(|(index, record)| record.line == 1 && record.column == index + 1));
}

#[test]
fn keyword_precision() {
    let result = analyze("if ifx xif");

    assert_eq!(summarize(result.tokens().without_end()), [
        (TokenKind::Keyword, "if", 1),
        (TokenKind::Identifier, "ifx", 1),
        (TokenKind::Identifier, "xif", 1),
    ]);
    assert_eq!(result.tokens()[0].keyword(), Some(KeywordKind::If));
}

#[test]
fn class_definition() {
    let source = "class Dog inherits Animal {\n\tsetup(name: string) {\n\t\tthis.name = name\n\t}\n}\n";
    let result = analyze(source);

    assert!(!result.has_errors());
    assert_eq!(summarize(&result.tokens().without_end()[..6]), [
        (TokenKind::Keyword, "class", 1),
        (TokenKind::Identifier, "Dog", 1),
        (TokenKind::Keyword, "inherits", 1),
        (TokenKind::Identifier, "Animal", 1),
        (TokenKind::Punctuation, "{", 1),
        (TokenKind::Keyword, "setup", 2),
    ]);

    let end = result.tokens().last().unwrap();
    assert_eq!((end.kind(), end.line()), (TokenKind::End, 6));
}

#[test]
fn without_end_trims_only_the_marker() {
    let result = analyze("x");

    assert_eq!(result.tokens().len(), 2);
    assert_eq!(summarize(result.tokens().without_end()), [(TokenKind::Identifier, "x", 1)]);
}

#[test]
fn concurrent_analyses_agree() {
    let analyzer = Analyzer::default();
    let source = "for i in list { print(i * 2.5) } # loop\n'unterminated";

    let expected = analyze(source);
    let expected = summarize(expected.tokens())
        .into_iter()
        .map(|(kind, value, line)| (kind, value.to_string(), line))
        .collect::<Vec<_>>();

    std::thread::scope(|scope| {
        let handles = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let source_file = SourceFile::in_memory("<thread>", source);
                    let result = analyzer.analyze(&source_file, &Counter::default());

                    summarize(result.tokens())
                        .into_iter()
                        .map(|(kind, value, line)| (kind, value.to_string(), line))
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn trivia_rendering() {
    assert_eq!(Trivia::Comment("note".to_string()).to_string(), "#note\n");
    assert_eq!(Trivia::Tabs(2).to_string(), "\t\t");
    assert_eq!(Trivia::NewLines(3).new_lines(), 3);
}
