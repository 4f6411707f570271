//! Parse and run a single query against a note corpus

use super::{CliError, load_corpus};
use crate::{EngineConfig, Executor, output, parse};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query to run
    pub query: String,
    /// Note corpus as a JSON array; an absent corpus is treated as empty
    pub notes: Option<String>,
    /// Emit the structured result instead of markdown
    pub json: bool,
    /// Only validate syntax, don't execute
    pub syntax_only: bool,
    pub config: EngineConfig,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Query executed, rendered as markdown
    Rendered(String),
    /// Query executed, as a JSON result set
    Structured(serde_json::Value),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let query = parse(&options.query)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let corpus = match &options.notes {
        Some(json) => load_corpus(json)?,
        None => Vec::new(),
    };

    let result = Executor::new(&options.config).execute(&query, &corpus)?;
    if options.json {
        Ok(CheckResult::Structured(serde_json::to_value(&result)?))
    } else {
        Ok(CheckResult::Rendered(output::render(&result)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: &str = r#"[
        {"title": "A", "frontmatter": {"status": "active"}},
        {"title": "B", "frontmatter": {"status": "done"}}
    ]"#;

    fn options(query: &str) -> CheckOptions {
        CheckOptions {
            query: query.to_string(),
            notes: Some(NOTES.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn renders_markdown() {
        match execute_check(&options(r#"LIST WHERE status = "done""#)).unwrap() {
            CheckResult::Rendered(text) => assert_eq!(text, "- B"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn structured_output() {
        let mut opts = options("TABLE status SORT title");
        opts.json = true;
        match execute_check(&opts).unwrap() {
            CheckResult::Structured(value) => {
                assert_eq!(value["query_type"], "TABLE");
                assert_eq!(value["groups"][0]["rows"][1]["status"], "done");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn syntax_only_skips_corpus() {
        let opts = CheckOptions {
            query: "LIST FROM \"#project\"".to_string(),
            notes: Some("not json".to_string()),
            syntax_only: true,
            ..Default::default()
        };
        assert!(matches!(execute_check(&opts).unwrap(), CheckResult::SyntaxValid));
        assert!(execute_check(&CheckOptions {
            query: "LIST WHERE".to_string(),
            syntax_only: true,
            ..Default::default()
        })
        .is_err());
    }
}
