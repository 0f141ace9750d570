//! Is a module containing the [`Token`] type and all of its related types.

use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
    str::FromStr,
};

use derive_new::new;
use getset::{CopyGetters, Getters};
use lazy_static::lazy_static;
use serde::Serialize;
use soop_base::source_file::{SourceElement, Span};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

/// Is an enumeration of the groups the reserved words of SOOP are organized in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[allow(missing_docs)]
pub enum KeywordCategory {
    BuiltInMethod,
    NoiseWord,
    ObjectOriented,
    ControlFlow,
    ExceptionHandling,
    Functionality,
    MemoryManagement,
    AccessModifier,
    ReservedForFuture,
    DataType,
    Literal,
}

impl KeywordCategory {
    /// Gets the human readable name of the category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BuiltInMethod => "built-in method",
            Self::NoiseWord => "noise word",
            Self::ObjectOriented => "object oriented",
            Self::ControlFlow => "control flow",
            Self::ExceptionHandling => "exception handling",
            Self::Functionality => "functionality",
            Self::MemoryManagement => "memory management",
            Self::AccessModifier => "access modifier",
            Self::ReservedForFuture => "reserved for future",
            Self::DataType => "data type",
            Self::Literal => "literal",
        }
    }
}

impl Display for KeywordCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Is an enumeration representing keywords in the SOOP programming language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[allow(missing_docs)]
pub enum KeywordKind {
    Print,
    Input,
    In,
    Def,
    Class,
    Template,
    New,
    Setup,
    Action,
    Static,
    Inherits,
    Parent,
    Override,
    This,
    If,
    Else,
    For,
    While,
    Break,
    Continue,
    Return,
    Switch,
    Try,
    Catch,
    Finally,
    Raise,
    Define,
    Import,
    Create,
    Delete,
    Public,
    Restricted,
    Private,
    Async,
    Await,
    Concurrent,
    Immutable,
    Delegate,
    Yield,
    Thread,
    Int,
    Double,
    Float,
    Bool,
    List,
    Dict,
    String,
    True,
    False,
    Null,
}

impl Display for KeywordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Is an error that is returned when a string cannot be parsed into a [`KeywordKind`] in
/// [`FromStr`] trait implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Error)]
#[error("invalid string representation of keyword.")]
pub struct KeywordParseError;

impl FromStr for KeywordKind {
    type Err = KeywordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref STRING_KEYWORD_MAP: HashMap<&'static str, KeywordKind> = {
                let mut map = HashMap::new();

                for keyword in KeywordKind::iter() {
                    map.insert(keyword.as_str(), keyword);
                }

                map
            };
        }
        STRING_KEYWORD_MAP.get(s).copied().ok_or(KeywordParseError)
    }
}

impl KeywordKind {
    /// Gets the string representation of the keyword as a `&str`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Input => "input",
            Self::In => "in",
            Self::Def => "def",
            Self::Class => "class",
            Self::Template => "template",
            Self::New => "new",
            Self::Setup => "setup",
            Self::Action => "action",
            Self::Static => "static",
            Self::Inherits => "inherits",
            Self::Parent => "parent",
            Self::Override => "override",
            Self::This => "this",
            Self::If => "if",
            Self::Else => "else",
            Self::For => "for",
            Self::While => "while",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Return => "return",
            Self::Switch => "switch",
            Self::Try => "try",
            Self::Catch => "catch",
            Self::Finally => "finally",
            Self::Raise => "raise",
            Self::Define => "define",
            Self::Import => "import",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Public => "public",
            Self::Restricted => "restricted",
            Self::Private => "private",
            Self::Async => "async",
            Self::Await => "await",
            Self::Concurrent => "concurrent",
            Self::Immutable => "immutable",
            Self::Delegate => "delegate",
            Self::Yield => "yield",
            Self::Thread => "thread",
            Self::Int => "int",
            Self::Double => "double",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::List => "list",
            Self::Dict => "dict",
            Self::String => "string",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
        }
    }

    /// Gets the [`KeywordCategory`] the keyword belongs to.
    #[must_use]
    pub fn category(self) -> KeywordCategory {
        match self {
            Self::Print | Self::Input => KeywordCategory::BuiltInMethod,
            Self::In | Self::Def => KeywordCategory::NoiseWord,
            Self::Class
            | Self::Template
            | Self::New
            | Self::Setup
            | Self::Action
            | Self::Static
            | Self::Inherits
            | Self::Parent
            | Self::Override
            | Self::This => KeywordCategory::ObjectOriented,
            Self::If
            | Self::Else
            | Self::For
            | Self::While
            | Self::Break
            | Self::Continue
            | Self::Return
            | Self::Switch => KeywordCategory::ControlFlow,
            Self::Try | Self::Catch | Self::Finally | Self::Raise => {
                KeywordCategory::ExceptionHandling
            }
            Self::Define | Self::Import => KeywordCategory::Functionality,
            Self::Create | Self::Delete => KeywordCategory::MemoryManagement,
            Self::Public | Self::Restricted | Self::Private => KeywordCategory::AccessModifier,
            Self::Async
            | Self::Await
            | Self::Concurrent
            | Self::Immutable
            | Self::Delegate
            | Self::Yield
            | Self::Thread => KeywordCategory::ReservedForFuture,
            Self::Int
            | Self::Double
            | Self::Float
            | Self::Bool
            | Self::List
            | Self::Dict
            | Self::String => KeywordCategory::DataType,
            Self::True | Self::False | Self::Null => KeywordCategory::Literal,
        }
    }
}

/// Is the table of words that are classified as [`TokenKind::Keyword`] instead of
/// [`TokenKind::Identifier`].
///
/// The lookup is exact and case-sensitive. [`Default`] reserves every [`KeywordKind`] except the
/// [`KeywordCategory::BuiltInMethod`] names, which stay ordinary identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedWords {
    words: HashSet<String>,
}

impl ReservedWords {
    /// Creates a table reserving exactly the given words.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Checks whether the given word is reserved.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool { self.words.contains(word) }

    /// Gets the number of reserved words.
    #[must_use]
    pub fn len(&self) -> usize { self.words.len() }

    /// Checks whether no word is reserved.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}

impl Default for ReservedWords {
    fn default() -> Self {
        KeywordKind::iter()
            .filter(|keyword| keyword.category() != KeywordCategory::BuiltInMethod)
            .collect()
    }
}

impl FromIterator<KeywordKind> for ReservedWords {
    fn from_iter<T: IntoIterator<Item = KeywordKind>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(KeywordKind::as_str))
    }
}

/// Is the closed set of categories a [`Token`] can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Integer,
    Float,
    String,
    Operator,
    Punctuation,
    Error,
    End,
}

impl TokenKind {
    /// Gets the name of the kind as it appears on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "KEYWORD",
            Self::Identifier => "IDENTIFIER",
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::String => "STRING",
            Self::Operator => "OPERATOR",
            Self::Punctuation => "PUNCTUATION",
            Self::Error => "ERROR",
            Self::End => "END",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Represents a classified lexeme of the source code.
///
/// The token's value is the exact slice of source text its span covers; string literals keep
/// their quotes and the [`TokenKind::End`] marker has an empty value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters, CopyGetters, new)]
pub struct Token {
    /// Gets the span that makes up the token.
    #[get = "pub"]
    span: Span,

    /// Gets the category of the token.
    #[get_copy = "pub"]
    kind: TokenKind,

    /// Gets the line (starting at 1) the token starts on.
    #[get_copy = "pub"]
    line: usize,
}

impl Token {
    /// Gets the lexeme of the token.
    #[must_use]
    pub fn value(&self) -> &str { self.span.str() }

    /// Gets the [`KeywordKind`] of a keyword token.
    ///
    /// Returns [`None`] for other kinds, and for words reserved by a custom [`ReservedWords`] table
    /// that are not part of the SOOP keyword set.
    #[must_use]
    pub fn keyword(&self) -> Option<KeywordKind> {
        if self.kind == TokenKind::Keyword {
            KeywordKind::from_str(self.value()).ok()
        } else {
            None
        }
    }

    /// Gets the [`KeywordCategory`] shown next to the token.
    ///
    /// Keyword tokens report the category of their keyword. Identifier tokens naming a built-in
    /// method (`print`, `input`) report [`KeywordCategory::BuiltInMethod`].
    #[must_use]
    pub fn category(&self) -> Option<KeywordCategory> {
        match self.kind {
            TokenKind::Keyword => self.keyword().map(KeywordKind::category),
            TokenKind::Identifier => KeywordKind::from_str(self.value())
                .ok()
                .map(KeywordKind::category)
                .filter(|category| *category == KeywordCategory::BuiltInMethod),
            _ => None,
        }
    }
}

impl SourceElement for Token {
    fn span(&self) -> Span { self.span.clone() }
}
