//! Contains the request/response boundary through which clients ask for an analysis.
//!
//! A request is a JSON object `{"code": "..."}`. A successful response is the JSON array of the
//! analyzed tokens, each as `{"value", "type", "line"}`, without the end marker.

use std::fmt::Display;

use derive_new::new;
use getset::{CopyGetters, Getters};
use serde::Serialize;
use serde_json::json;
use soop_base::{diagnostic::Handler, source_file::SourceFile};
use soop_lexical::{
    error,
    token::{Token, TokenKind},
    Analyzer,
};
use thiserror::Error;

/// The default value of [`TransportConfig::max_input_length`].
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 100_000;

/// Is the configuration of a [`Transport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct TransportConfig {
    /// The longest code, in characters, a request may carry.
    pub max_input_length: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
        }
    }
}

/// Is an enumeration of the reasons a request is rejected before any analysis.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Error)]
#[allow(missing_docs)]
pub enum ValidationError {
    #[error("the request body is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("the request body must be a JSON object")]
    NotAnObject,

    #[error("the request has no `code` field")]
    MissingCode,

    #[error("the `code` field must be a string")]
    CodeNotAString,

    #[error("the code is {length} characters long, the limit is {limit}")]
    InputTooLong { length: usize, limit: usize },
}

/// Is the status of a [`Response`], mirroring the HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    /// The analysis succeeded, even if the code has lexical errors.
    Ok,

    /// The request was rejected by validation.
    BadRequest,

    /// The analysis could not be delivered.
    InternalError,
}

impl Status {
    /// Gets the HTTP status code.
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::InternalError => 500,
        }
    }

    /// Checks whether the status reports a success.
    #[must_use]
    pub fn is_success(self) -> bool { self == Self::Ok }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::Ok => "OK",
            Self::BadRequest => "Bad Request",
            Self::InternalError => "Internal Server Error",
        };

        write!(f, "{} {reason}", self.code())
    }
}

/// Is the wire representation of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WireToken<'a> {
    /// The lexeme.
    pub value: &'a str,

    /// The category.
    #[serde(rename = "type")]
    pub kind: TokenKind,

    /// The line the token starts on.
    pub line: usize,
}

impl<'a> From<&'a Token> for WireToken<'a> {
    fn from(token: &'a Token) -> Self {
        Self {
            value: token.value(),
            kind: token.kind(),
            line: token.line(),
        }
    }
}

/// Converts the tokens to their wire representation, dropping the end marker.
#[must_use]
pub fn to_wire(tokens: &[Token]) -> Vec<WireToken> {
    tokens
        .iter()
        .filter(|token| token.kind() != TokenKind::End)
        .map(WireToken::from)
        .collect()
}

/// Is the answer to a request.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Response {
    /// Gets the status of the response.
    #[get_copy = "pub"]
    status: Status,

    /// Gets the JSON body of the response.
    #[get = "pub"]
    body: String,
}

impl Response {
    fn failure(status: Status, message: impl Display) -> Self {
        Self {
            status,
            body: json!({ "error": message.to_string() }).to_string(),
        }
    }
}

/// Answers analysis requests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters, new)]
pub struct Transport {
    /// Gets the configuration of the transport.
    #[get = "pub"]
    config: TransportConfig,

    /// Gets the analyzer answering the requests.
    #[get = "pub"]
    analyzer: Analyzer,
}

impl Transport {
    /// Extracts the code from a request body.
    ///
    /// # Errors
    /// Returns the [`ValidationError`] describing why the body is not a valid request.
    pub fn validate(&self, body: &str) -> Result<String, ValidationError> {
        let request: serde_json::Value = serde_json::from_str(body)
            .map_err(|error| ValidationError::MalformedJson(error.to_string()))?;

        let code = request
            .as_object()
            .ok_or(ValidationError::NotAnObject)?
            .get("code")
            .ok_or(ValidationError::MissingCode)?
            .as_str()
            .ok_or(ValidationError::CodeNotAString)?;

        let length = code.chars().count();
        if length > self.config.max_input_length {
            return Err(ValidationError::InputTooLong {
                length,
                limit: self.config.max_input_length,
            });
        }

        Ok(code.to_string())
    }

    /// Answers the request with the given body.
    ///
    /// Lexical errors found in the code are sent to the `handler`; they do not make the request
    /// fail.
    #[must_use]
    pub fn handle(&self, body: &str, handler: &dyn Handler<error::Error>) -> Response {
        let code = match self.validate(body) {
            Ok(code) => code,
            Err(error) => return Response::failure(Status::BadRequest, error),
        };

        let source_file = SourceFile::in_memory("<request>", code);
        let result = self.analyzer.analyze(&source_file, handler);

        match serde_json::to_string(&to_wire(result.tokens())) {
            Ok(body) => Response {
                status: Status::Ok,
                body,
            },
            Err(_) => Response::failure(Status::InternalError, "internal error"),
        }
    }
}
