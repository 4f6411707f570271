//! Locates query blocks inside markdown.
//!
//! Fenced blocks are found by a small state machine over lines, inline
//! `` `= expr` `` spans by a per-line pattern. Detection is line based and
//! does not understand nested fences or escaped backticks. A fence that is
//! never closed is dropped silently.

use std::{ops::Range, sync::LazyLock};

use regex::Regex;
use serde::Serialize;
use tracing::debug;

static INLINE_QUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`=([^`]*)`").expect("inline query pattern is valid"));

const FENCE_OPEN: &str = "```dataview";
const FENCE_CLOSE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Codeblock,
    Inline,
}

/// Position of one embedded query. Lines are 1-based and inclusive; a
/// codeblock spans its opening and closing fence lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataviewBlock {
    pub raw_query_text: String,
    pub start_line: usize,
    pub end_line: usize,
    pub kind: BlockKind,
    /// Byte range of an inline span within its line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Range<usize>>,
}

enum FenceState {
    Outside,
    Inside { start_line: usize, body: Vec<String> },
}

/// Find every block: all codeblocks in source order, then all inline
/// queries in source order.
///
/// # Examples
///
/// ```
/// use dataview_lang::detector::{detect, BlockKind};
///
/// let doc = "Count: `= length(tags)`\n\n```dataview\nLIST\n```\n";
/// let blocks = detect(doc);
/// assert_eq!(blocks[0].kind, BlockKind::Codeblock);
/// assert_eq!((blocks[0].start_line, blocks[0].end_line), (3, 5));
/// assert_eq!(blocks[1].raw_query_text, "length(tags)");
/// ```
pub fn detect(markdown: &str) -> Vec<DataviewBlock> {
    let mut codeblocks = Vec::new();
    let mut inline = Vec::new();
    let mut state = FenceState::Outside;

    for (index, line) in markdown.lines().enumerate() {
        let line_number = index + 1;

        state = match state {
            FenceState::Outside if line.trim_end() == FENCE_OPEN => FenceState::Inside {
                start_line: line_number,
                body: Vec::new(),
            },
            FenceState::Inside { start_line, body } if line.trim_end() == FENCE_CLOSE => {
                codeblocks.push(DataviewBlock {
                    raw_query_text: body.join("\n"),
                    start_line,
                    end_line: line_number,
                    kind: BlockKind::Codeblock,
                    span: None,
                });
                FenceState::Outside
            }
            FenceState::Inside { start_line, mut body } => {
                body.push(line.to_string());
                FenceState::Inside { start_line, body }
            }
            outside => outside,
        };

        inline.extend(detect_inline(line, line_number));
    }

    if let FenceState::Inside { start_line, .. } = state {
        debug!(start_line, "dropping unclosed dataview fence");
    }

    debug!(codeblocks = codeblocks.len(), inline = inline.len(), "detected blocks");
    codeblocks.extend(inline);
    codeblocks
}

fn detect_inline(line: &str, line_number: usize) -> impl Iterator<Item = DataviewBlock> + '_ {
    INLINE_QUERY.captures_iter(line).filter_map(move |caps| {
        let whole = caps.get(0)?;
        let expr = caps.get(1)?.as_str().trim();
        if expr.is_empty() {
            return None;
        }
        Some(DataviewBlock {
            raw_query_text: expr.to_string(),
            start_line: line_number,
            end_line: line_number,
            kind: BlockKind::Inline,
            span: Some(whole.range()),
        })
    })
}
