//! CLI support for dataview-lang
//!
//! Provides programmatic access to the `dataview` command implementations so
//! other tools can embed them without going through the binary.

mod check;
mod convert;
mod docs;
mod render;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use convert::{load_corpus, parse_alias};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use render::{RenderOptions, RenderResult, execute_render, execute_tasks};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Query failed to tokenize, parse, or run
    #[error("{0}")]
    Query(#[from] crate::DataviewError),

    /// Note corpus is not valid JSON
    #[error("Invalid note corpus: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid command-line setting
    #[error("Invalid option: {0}")]
    Config(String),

    /// Unknown documentation category
    #[error("Unknown category: '{0}'\nRun 'dataview docs' to see available categories.")]
    UnknownCategory(String),
}
