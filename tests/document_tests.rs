// tests/document_tests.rs

use dataview_lang::document::process_block;
use dataview_lang::{
    BlockKind, BlockStatus, EngineConfig, Note, detect, process_document, render_document,
};

fn corpus() -> Vec<Note> {
    vec![
        Note::new("A")
            .with_frontmatter("status", "active")
            .with_content("- [ ] call\n- [x] mail"),
        Note::new("B").with_frontmatter("status", "done"),
    ]
}

#[test]
fn test_outcomes_follow_detection_order() {
    let corpus = corpus();
    let doc = "Inline `= status`\n```dataview\nLIST\n```";
    let outcomes = process_document(doc, &corpus[0], &corpus, &EngineConfig::default());
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].block.kind, BlockKind::Codeblock);
    assert_eq!(
        outcomes[0].status,
        BlockStatus::Ok {
            output: "- A\n- B".into()
        }
    );
    assert_eq!(outcomes[1].rendered(), "active");
}

#[test]
fn test_each_error_kind_is_contained() {
    let corpus = corpus();
    let doc = "```dataview\nLIST WHERE status = \"x\n```\n```dataview\nSORT title\n```\n```dataview\nLIST WHERE nope()\n```\n```dataview\nTASK\n```";
    let outcomes = process_document(doc, &corpus[0], &corpus, &EngineConfig::default());
    assert_eq!(outcomes.len(), 4);
    let failed: Vec<bool> = outcomes.iter().map(|o| !o.is_ok()).collect();
    assert_eq!(failed, vec![true, true, true, false]);
    assert!(outcomes[0].rendered().starts_with("> [!error] Dataview: Syntax error: Unterminated string literal"));
    assert!(outcomes[1].rendered().contains("Expected query type"));
    assert_eq!(
        outcomes[2].rendered(),
        "> [!error] Dataview: Execution error: unknown function 'nope'"
    );
    assert_eq!(outcomes[3].rendered(), "- [ ] call\n- [x] mail");
}

#[test]
fn test_outcome_json_shape() {
    let corpus = corpus();
    let outcomes = process_document(
        "```dataview\nLIST\n```",
        &corpus[0],
        &corpus,
        &EngineConfig::default(),
    );
    let json = serde_json::to_value(&outcomes).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "raw_query_text": "LIST",
            "start_line": 1,
            "end_line": 3,
            "kind": "codeblock",
            "status": "ok",
            "output": "- A\n- B"
        }])
    );
}

#[test]
fn test_inline_block_uses_host_note() {
    let corpus = corpus();
    let block = &detect("`= upper(status)`")[0];
    let outcome = process_block(block, &corpus[1], &corpus, &EngineConfig::default());
    assert_eq!(outcome.rendered(), "DONE");
}

#[test]
fn test_render_keeps_surrounding_text() {
    let corpus = corpus();
    let doc = "# Daily\n\n```dataview\nLIST WHERE status = \"done\"\n```\n\nTasks: `= length(file.tags)` tags, `= 1 < 2`.\n";
    assert_eq!(
        render_document(doc, &corpus[0], &corpus, &EngineConfig::default()),
        "# Daily\n\n- B\n\nTasks: 0 tags, ✓.\n"
    );
}

#[test]
fn test_render_error_annotations() {
    let corpus = corpus();
    let doc = "```dataview\nLIST LIMIT -1\n```\nx `= a ! b` y";
    let rendered = render_document(doc, &corpus[0], &corpus, &EngineConfig::default());
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("> [!error] Dataview: "));
    assert!(lines[1].starts_with("x `Dataview error: Syntax error: Unexpected '!'"));
    assert!(lines[1].ends_with("` y"));
}

#[test]
fn test_unclosed_fence_left_as_is() {
    let corpus = corpus();
    let doc = "```dataview\nLIST";
    assert_eq!(
        render_document(doc, &corpus[0], &corpus, &EngineConfig::default()),
        doc
    );
}
