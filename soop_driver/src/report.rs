//! Renders the tokens of an analysis as a plain-text table.

use std::fmt::{Display, Write};

use derive_new::new;
use soop_lexical::token::{Token, TokenKind};

const HEADERS: [&str; 4] = ["Value", "Type", "Line", "Category"];

/// Escapes the control characters and column separators of a lexeme so every row stays on one
/// line and keeps its columns.
fn printable(value: &str) -> String {
    value.chars().fold(String::new(), |mut result, character| {
        if character.is_control() {
            result.extend(character.escape_debug());
        } else if character == '|' {
            result.push_str("\\|");
        } else {
            result.push(character);
        }
        result
    })
}

/// Is a struct implementing [`Display`] that prints the tokens in source order, one per row, with
/// the columns `Value`, `Type`, `Line` and `Category`.
///
/// The end marker is not listed. The category column is empty for anything but keywords and
/// built-in method names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct TokenTable<'a> {
    /// The tokens to be printed.
    pub tokens: &'a [Token],
}

impl<'a> TokenTable<'a> {
    fn rows(&self) -> Vec<[String; 4]> {
        self.tokens
            .iter()
            .filter(|token| token.kind() != TokenKind::End)
            .map(|token| {
                [
                    printable(token.value()),
                    token.kind().to_string(),
                    token.line().to_string(),
                    token
                        .category()
                        .map(|category| category.to_string())
                        .unwrap_or_default(),
                ]
            })
            .collect()
    }
}

impl<'a> Display for TokenTable<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows = self.rows();

        let mut widths = HEADERS.map(|header| header.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut write_row = |cells: [&str; 4]| -> std::fmt::Result {
            // trailing empty cells are left out along with their separators
            let used = cells
                .iter()
                .rposition(|cell| !cell.is_empty())
                .map_or(0, |index| index + 1);

            let mut line = String::new();
            for (index, (cell, width)) in cells.iter().zip(widths).take(used).enumerate() {
                if index > 0 {
                    line.push_str(" | ");
                }
                write!(line, "{cell:<width$}")?;
            }

            writeln!(f, "{}", line.trim_end())
        };

        write_row(HEADERS)?;

        let [value, kind, line, category] = widths.map(|width| "-".repeat(width));
        write_row([value.as_str(), kind.as_str(), line.as_str(), category.as_str()])?;

        for [value, kind, line, category] in &rows {
            write_row([value.as_str(), kind.as_str(), line.as_str(), category.as_str()])?;
        }

        Ok(())
    }
}
