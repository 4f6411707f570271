//! A Dataview-style query language over markdown notes.
//!
//! ```text
//! raw note text -> detector -> lexer -> parser -> executor -> output
//! ```
//!
//! # Examples
//!
//! ```
//! use dataview_lang::{EngineConfig, Note, run_query};
//!
//! let corpus = vec![
//!     Note::new("A").with_frontmatter("status", "active"),
//!     Note::new("B").with_frontmatter("status", "done"),
//! ];
//! let config = EngineConfig::default();
//!
//! let list = run_query(r#"LIST WHERE status = "active""#, &corpus, &config).unwrap();
//! assert_eq!(list, "- A");
//!
//! let table = run_query("TABLE title, status SORT title DESC LIMIT 1", &corpus, &config).unwrap();
//! assert_eq!(table, "| title | status |\n| --- | --- |\n| B | done |");
//! ```
pub mod ast;
pub mod cli;
pub mod config;
pub mod detector;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod fields;
pub mod lexer;
pub mod note;
pub mod output;
pub mod parser;
pub mod tasks;
pub mod value;

pub use ast::{BinOp, Expr, Query, QueryType, Token, TokenKind};
pub use config::EngineConfig;
pub use detector::{BlockKind, DataviewBlock, detect};
pub use document::{BlockOutcome, BlockStatus, process_document, render_document};
pub use error::{DataviewError, ExecutionError, ParseError, Result, SyntaxError};
pub use evaluator::Evaluator;
pub use executor::{Executor, ResultSet, Row};
pub use fields::{FieldResolver, FileField};
pub use lexer::{Lexer, tokenize};
pub use note::Note;
pub use parser::Parser;
pub use tasks::Task;
pub use value::Value;

/// Tokenize and parse a complete query.
pub fn parse(text: &str) -> Result<Query> {
    let tokens = tokenize(text)?;
    Ok(Parser::new(tokens).parse_query()?)
}

/// Tokenize and parse a standalone expression, as found in inline spans.
pub fn parse_expression(text: &str) -> Result<Expr> {
    let tokens = tokenize(text)?;
    Ok(Parser::new(tokens).parse()?)
}

/// Parse and execute a query, returning the structured result.
pub fn execute_query(text: &str, corpus: &[Note], config: &EngineConfig) -> Result<ResultSet> {
    let query = parse(text)?;
    Executor::new(config).execute(&query, corpus)
}

/// Parse, execute, and render a query to markdown.
pub fn run_query(text: &str, corpus: &[Note], config: &EngineConfig) -> Result<String> {
    execute_query(text, corpus, config).map(|result| output::render(&result))
}
