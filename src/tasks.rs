//! Checkbox task extraction.
//!
//! Line-oriented: every line shaped like `<indent>- [ ] text` or
//! `<indent>* [x] text` is a task. Indentation depth is the raw count of
//! leading whitespace characters; tabs and spaces both count as one, so depths
//! are not comparable across files that mix them.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static TASK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)[-*] \[([ xX])\]\s+(.*?)\s*$").expect("task pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub text: String,
    pub completed: bool,
    /// 1-based line of the task within the note content
    pub line_number: usize,
    pub indentation_depth: usize,
    /// Reserved for nesting; the extractor never fills it
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Task>,
}

/// Extract every checkbox task in document order.
///
/// # Examples
///
/// ```
/// use dataview_lang::tasks::extract;
///
/// let tasks = extract("# Todo\n- [ ] write\n  - [x] read\n");
/// assert_eq!(tasks.len(), 2);
/// assert!(tasks[1].completed);
/// assert_eq!(tasks[1].indentation_depth, 2);
/// ```
pub fn extract(content: &str) -> Vec<Task> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let caps = TASK_LINE.captures(line)?;
            Some(Task {
                text: caps[3].to_string(),
                completed: caps[2].eq_ignore_ascii_case("x"),
                line_number: index + 1,
                indentation_depth: caps[1].chars().count(),
                subtasks: Vec::new(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_both_bullets_and_marks() {
        let tasks = extract("* [X] done\n- [ ] open\n- [y] not a task\n-[ ] nope\n");
        let summary: Vec<(&str, bool)> = tasks.iter().map(|t| (t.text.as_str(), t.completed)).collect();
        assert_eq!(summary, vec![("done", true), ("open", false)]);
    }

    #[test]
    fn tabs_count_as_single_characters() {
        let tasks = extract("\t- [ ] tab\n    - [ ] spaces");
        assert_eq!(tasks[0].indentation_depth, 1);
        assert_eq!(tasks[1].indentation_depth, 4);
        assert_eq!(tasks[1].line_number, 2);
    }

    #[test]
    fn windows_line_endings() {
        let tasks = extract("- [ ] one\r\n- [x] two\r\n");
        assert_eq!(tasks[0].text, "one");
        assert_eq!(tasks[1].text, "two");
    }
}
