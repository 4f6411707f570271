//! Error types for the query pipeline.
//!
//! Every failure is one of three kinds, all wrapped by [`DataviewError`]:
//!
//! - [`SyntaxError`] - lexer or parser failure with a source position
//! - [`ParseError`] - structural grammar failure, usually wrapping a [`SyntaxError`]
//! - [`ExecutionError`] - evaluator or function misuse at run time

use thiserror::Error;

/// A lexical or grammatical error at a known position (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        SyntaxError {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Errors raised while turning tokens into a [`crate::Query`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Grammar failure at a specific token
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// Structural failure detected after the token stream was consumed
    #[error("Parse error: {0}")]
    Grammar(String),
}

impl ParseError {
    /// Source position of the failure, when one is known.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            ParseError::Syntax(e) => Some((e.line, e.column)),
            ParseError::Grammar(_) => None,
        }
    }
}

/// Errors raised while evaluating an expression against a note.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// A field reference with no name
    #[error("Execution error: field reference has an empty name")]
    EmptyFieldName,

    /// Call to a function outside the built-in library
    #[error("Execution error: unknown function '{0}'")]
    UnknownFunction(String),

    /// Call with the wrong number of arguments
    #[error("Execution error: {name}() takes {expected} argument(s), got {actual}")]
    ArgumentCount {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Umbrella error for the whole engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataviewError {
    /// Lexer failure
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, DataviewError>;
