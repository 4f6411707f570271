//! Whole-document processing: detect, run, and substitute every block.
//!
//! Each block runs in isolation; a failing block yields an error outcome and
//! an error annotation in the rendered document, and never stops its siblings.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    config::EngineConfig,
    detector::{self, BlockKind, DataviewBlock},
    evaluator::Evaluator,
    note::Note,
    output, parse_expression, run_query,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BlockStatus {
    Ok { output: String },
    Error { error: String },
}

/// A detected block together with what it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockOutcome {
    #[serde(flatten)]
    pub block: DataviewBlock,
    #[serde(flatten)]
    pub status: BlockStatus,
}

impl BlockOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self.status, BlockStatus::Ok { .. })
    }

    /// Markdown that replaces the block: its output, or an error annotation.
    pub fn rendered(&self) -> String {
        match (&self.status, self.block.kind) {
            (BlockStatus::Ok { output }, _) => output.clone(),
            (BlockStatus::Error { error }, BlockKind::Codeblock) => output::format_block_error(error),
            (BlockStatus::Error { error }, BlockKind::Inline) => output::format_inline_error(error),
        }
    }
}

/// Run one block. Codeblocks query the corpus; inline spans evaluate a
/// single expression against `host`, the note containing them.
pub fn process_block(
    block: &DataviewBlock,
    host: &Note,
    corpus: &[Note],
    config: &EngineConfig,
) -> BlockOutcome {
    let result = match block.kind {
        BlockKind::Codeblock => run_query(&block.raw_query_text, corpus, config),
        BlockKind::Inline => parse_expression(&block.raw_query_text).and_then(|expr| {
            let resolver = config.resolver();
            let value = Evaluator::new(&resolver).evaluate(&expr, host)?;
            Ok(output::format_inline(&value))
        }),
    };

    let status = match result {
        Ok(output) => BlockStatus::Ok { output },
        Err(e) => {
            warn!(
                line = block.start_line,
                kind = ?block.kind,
                error = %e,
                "dataview block failed"
            );
            BlockStatus::Error {
                error: e.to_string(),
            }
        }
    };

    BlockOutcome {
        block: block.clone(),
        status,
    }
}

/// Run every block of `markdown`, in detection order.
pub fn process_document(
    markdown: &str,
    host: &Note,
    corpus: &[Note],
    config: &EngineConfig,
) -> Vec<BlockOutcome> {
    let outcomes: Vec<BlockOutcome> = detector::detect(markdown)
        .iter()
        .map(|block| process_block(block, host, corpus, config))
        .collect();
    debug!(
        blocks = outcomes.len(),
        failed = outcomes.iter().filter(|o| !o.is_ok()).count(),
        "processed document"
    );
    outcomes
}

/// Substitute every block of `markdown` with its rendering.
///
/// Codeblocks replace their whole line range, fences included; inline spans
/// are replaced within their line. Other text is kept as is.
///
/// # Examples
///
/// ```
/// use dataview_lang::{EngineConfig, Note, render_document};
///
/// let host = Note::new("Home").with_frontmatter("status", "active");
/// let corpus = vec![host.clone()];
/// let doc = "Status: `= upper(status)`\n```dataview\nLIST\n```\n";
///
/// let rendered = render_document(doc, &host, &corpus, &EngineConfig::default());
/// assert_eq!(rendered, "Status: ACTIVE\n- Home\n");
/// ```
pub fn render_document(
    markdown: &str,
    host: &Note,
    corpus: &[Note],
    config: &EngineConfig,
) -> String {
    let outcomes = process_document(markdown, host, corpus, config);

    let mut codeblocks: BTreeMap<usize, &BlockOutcome> = BTreeMap::new();
    let mut inline: BTreeMap<usize, Vec<&BlockOutcome>> = BTreeMap::new();
    for outcome in &outcomes {
        match outcome.block.kind {
            BlockKind::Codeblock => {
                codeblocks.insert(outcome.block.start_line, outcome);
            }
            BlockKind::Inline => inline.entry(outcome.block.start_line).or_default().push(outcome),
        }
    }

    let lines: Vec<&str> = markdown.lines().collect();
    let mut rendered: Vec<String> = Vec::with_capacity(lines.len());
    let mut index = 0;
    while index < lines.len() {
        let line_number = index + 1;
        if let Some(outcome) = codeblocks.get(&line_number) {
            rendered.push(outcome.rendered());
            index = outcome.block.end_line;
            continue;
        }

        let line = lines[index];
        rendered.push(match inline.get(&line_number) {
            Some(spans) => substitute_inline(line, spans),
            None => line.to_string(),
        });
        index += 1;
    }

    let mut document = rendered.join("\n");
    if markdown.ends_with('\n') {
        document.push('\n');
    }
    document
}

fn substitute_inline(line: &str, spans: &[&BlockOutcome]) -> String {
    let mut result = line.to_string();
    // Right to left, so earlier byte ranges stay valid
    for outcome in spans.iter().rev() {
        if let Some(span) = &outcome.block.span {
            result.replace_range(span.clone(), &outcome.rendered());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Note> {
        vec![
            Note::new("A").with_frontmatter("status", "active"),
            Note::new("B").with_frontmatter("status", "done"),
        ]
    }

    #[test]
    fn failing_block_does_not_stop_siblings() {
        let doc = "```dataview\nLIST WHERE\n```\n```dataview\nLIST WHERE status = \"done\"\n```";
        let corpus = corpus();
        let outcomes = process_document(doc, &corpus[0], &corpus, &EngineConfig::default());
        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].is_ok());
        assert_eq!(
            outcomes[1].status,
            BlockStatus::Ok {
                output: "- B".into()
            }
        );
    }

    #[test]
    fn error_outcome_serializes_with_status() {
        let corpus = corpus();
        let outcomes = process_document("`= nope(1)`", &corpus[0], &corpus, &EngineConfig::default());
        let json = serde_json::to_value(&outcomes[0]).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["kind"], "inline");
        assert_eq!(json["error"], "Execution error: unknown function 'nope'");
    }

    #[test]
    fn render_replaces_blocks_in_place() {
        let doc = "# Notes\n\n```dataview\nTABLE status\nSORT title DESC\n```\nB is `= length(\"xyz\")` long, `= bad(` here\n";
        let corpus = corpus();
        let rendered = render_document(doc, &corpus[0], &corpus, &EngineConfig::default());
        let expected = "# Notes\n\n| status |\n| --- |\n| done |\n| active |\nB is 3 long, `Dataview error: Syntax error: Expected expression, found end of input at line 1, column 5` here\n";
        assert_eq!(rendered, expected);
    }
}
