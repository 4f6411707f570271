// tests/detector_tests.rs

use dataview_lang::{BlockKind, detect};

#[test]
fn test_document_without_queries() {
    assert!(detect("# Title\n\nPlain `code` and ```rust fences```.\n").is_empty());
}

#[test]
fn test_codeblock_positions_and_body() {
    let doc = "intro\n```dataview\nTABLE title\nWHERE done = false\n```\noutro";
    let blocks = detect(doc);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockKind::Codeblock);
    assert_eq!(blocks[0].raw_query_text, "TABLE title\nWHERE done = false");
    assert_eq!((blocks[0].start_line, blocks[0].end_line), (2, 5));
    assert_eq!(blocks[0].span, None);
}

#[test]
fn test_other_fences_are_ignored() {
    let doc = "```rust\nlet x = 1;\n```\n```dataviewjs\nLIST\n```\n```dataview\nLIST\n```";
    let blocks = detect(doc);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].start_line, 7);
}

#[test]
fn test_multiple_codeblocks_in_order() {
    let doc = "```dataview\nLIST\n```\ntext\n```dataview\nTASK\n```";
    let texts: Vec<String> = detect(doc).into_iter().map(|b| b.raw_query_text).collect();
    assert_eq!(texts, vec!["LIST", "TASK"]);
}

#[test]
fn test_empty_codeblock() {
    let blocks = detect("```dataview\n```");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].raw_query_text, "");
}

#[test]
fn test_unclosed_fence_after_closed_one() {
    let blocks = detect("```dataview\nLIST\n```\n```dataview\nTASK");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].raw_query_text, "LIST");
}

#[test]
fn test_inline_spans() {
    let doc = "Status: `= status`\nNone here\nCount `=length(tags)` of `= upper(title)`";
    let blocks = detect(doc);
    let found: Vec<(&str, usize)> = blocks
        .iter()
        .map(|b| (b.raw_query_text.as_str(), b.start_line))
        .collect();
    assert_eq!(
        found,
        vec![("status", 1), ("length(tags)", 3), ("upper(title)", 3)]
    );
    assert!(blocks.iter().all(|b| b.kind == BlockKind::Inline));
    assert!(blocks.iter().all(|b| b.start_line == b.end_line));
    assert_eq!(blocks[0].span, Some(8..18));
}

#[test]
fn test_codeblocks_come_before_inline() {
    let doc = "`= a`\n```dataview\nLIST\n```\n`= b`";
    let kinds: Vec<BlockKind> = detect(doc).into_iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![BlockKind::Codeblock, BlockKind::Inline, BlockKind::Inline]
    );
}

#[test]
fn test_crlf_line_endings() {
    let blocks = detect("```dataview\r\nLIST\r\n```\r\n");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].raw_query_text, "LIST");
}
