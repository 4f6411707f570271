//! Process markdown documents: substitute their blocks or list their tasks

use super::{CliError, load_corpus};
use crate::{EngineConfig, Note, output, process_document, render_document, tasks};

/// Options for the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Markdown text of the note being rendered
    pub markdown: String,
    /// Title of the note; looked up in the corpus for inline spans
    pub title: String,
    /// Note corpus as a JSON array
    pub notes: Option<String>,
    /// Emit block outcomes as JSON instead of the rendered document
    pub json: bool,
    pub config: EngineConfig,
}

#[derive(Debug)]
pub enum RenderResult {
    Document(String),
    Structured(serde_json::Value),
}

impl RenderResult {
    /// Text written to stdout; always newline-terminated.
    pub fn to_output(&self, pretty: bool) -> Result<String, CliError> {
        let mut text = match self {
            RenderResult::Document(text) => text.clone(),
            RenderResult::Structured(value) if pretty => serde_json::to_string_pretty(value)?,
            RenderResult::Structured(value) => serde_json::to_string(value)?,
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }
}

/// Execute a render operation
pub fn execute_render(options: &RenderOptions) -> Result<RenderResult, CliError> {
    let corpus = match &options.notes {
        Some(json) => load_corpus(json)?,
        None => Vec::new(),
    };

    // Inline spans see the corpus record for this note when one exists
    let host = corpus
        .iter()
        .find(|note| note.title == options.title)
        .cloned()
        .unwrap_or_else(|| Note::new(&options.title).with_content(&options.markdown));

    if options.json {
        let outcomes = process_document(&options.markdown, &host, &corpus, &options.config);
        return Ok(RenderResult::Structured(serde_json::to_value(&outcomes)?));
    }

    Ok(RenderResult::Document(render_document(
        &options.markdown,
        &host,
        &corpus,
        &options.config,
    )))
}

/// Extract the tasks of a markdown document.
pub fn execute_tasks(markdown: &str, json: bool) -> Result<RenderResult, CliError> {
    let tasks = tasks::extract(markdown);
    if json {
        Ok(RenderResult::Structured(serde_json::to_value(&tasks)?))
    } else {
        Ok(RenderResult::Document(output::format_task_list(&tasks)))
    }
}
