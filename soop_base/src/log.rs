//! Provides the functions related to logging/printing messages to the console.

use std::fmt::Display;

use derive_new::new;
use formatting::{Color, Style};

use crate::source_file::Span;

pub mod formatting;

/// Represents the severity of a log message to be printed to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Severity {
    Error,
    Info,
    Warning,
}

/// Is a struct implementing [`Display`] that represents a log message to be displayed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct Message<T> {
    /// The severity of the log message.
    pub severity: Severity,

    /// The message to be displayed.
    pub display: T,
}

impl<T: Display> Display for Message<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let log_header = Style::Bold.with(match self.severity {
            Severity::Error => Color::Red.with("[error]:"),
            Severity::Info => Color::Green.with("[info]:"),
            Severity::Warning => Color::Yellow.with("[warning]:"),
        });

        let message_part = Style::Bold.with(&self.display);

        write!(f, "{log_header} {message_part}")
    }
}

fn get_digit(mut number: usize) -> usize {
    let mut digit = 0;

    while number > 0 {
        number /= 10;
        digit += 1;
    }

    digit
}

/// Structure implementing [`Display`] that prints the source line a span starts on, with the
/// span's characters highlighted and an optional help message under them.
///
/// Only the first line of a span is shown; lexical spans never cross a line boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct SourceCodeDisplay<'a, T> {
    /// The span of the source code to be printed.
    pub span: &'a Span,

    /// The help message to be displayed.
    pub help_display: Option<T>,
}

impl<'a, T: Display> Display for SourceCodeDisplay<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let location = self.span.start_location();
        let source_file = self.span.source_file();
        let line = source_file
            .get_line(location.line)
            .unwrap_or_default()
            .trim_end_matches(|character| character == '\n' || character == '\r');
        let highlighted = self
            .span
            .str()
            .chars()
            .take_while(|character| *character != '\n' && *character != '\r')
            .count();
        let padding = " ".repeat(get_digit(location.line));
        let pipe = Style::Bold.with(Color::Cyan.with("┃"));

        writeln!(
            f,
            "{padding}{} {}:{}:{}",
            Style::Bold.with(Color::Cyan.with("-->")),
            source_file.path().display(),
            location.line,
            location.column
        )?;
        writeln!(f, "{padding} {pipe}")?;

        // the source line, tabs are expanded to 4 spaces
        write!(
            f,
            "{} {pipe} ",
            Style::Bold.with(Color::Cyan.with(location.line))
        )?;
        for (index, character) in line.chars().enumerate() {
            let column = index + 1;
            let is_in_span =
                column >= location.column && column < location.column + highlighted;

            if character == '\t' {
                write!(f, "    ")?;
            } else if is_in_span {
                write!(
                    f,
                    "{}",
                    Style::Underline.with(Style::Bold.with(Color::Red.with(character)))
                )?;
            } else {
                write!(f, "{character}")?;
            }
        }
        writeln!(f)?;

        // the markers under the span
        write!(f, "{padding} {pipe} ")?;
        for character in line.chars().take(location.column.saturating_sub(1)) {
            write!(f, "{}", if character == '\t' { "    " } else { " " })?;
        }
        write!(
            f,
            "{}",
            Style::Bold.with(Color::Red.with("^".repeat(highlighted.max(1))))
        )?;
        if let Some(help) = &self.help_display {
            write!(f, " {}: {help}", Style::Bold.with("help"))?;
        }
        writeln!(f)?;

        writeln!(f, "{padding} {pipe}")
    }
}
