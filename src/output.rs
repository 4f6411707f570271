//! Markdown rendering of query results.
//!
//! Every formatter is a pure function. Empty input renders a literal
//! placeholder (`_No results_` / `_No tasks_`), never an empty string.
//!
//! # Examples
//!
//! ```
//! use dataview_lang::Value;
//! use dataview_lang::executor::Row;
//! use dataview_lang::output::{format_list, format_table};
//!
//! let rows = vec![Row::new(vec![
//!     ("title".to_string(), Value::from("B")),
//!     ("done".to_string(), Value::Boolean(true)),
//! ])];
//! let names = vec!["title".to_string(), "done".to_string()];
//!
//! assert_eq!(
//!     format_table(&rows, &names),
//!     "| title | done |\n| --- | --- |\n| B | ✓ |"
//! );
//! assert_eq!(format_list(&rows, "title"), "- B");
//! assert_eq!(format_table(&[], &names), "_No results_");
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    ast::QueryType,
    executor::{ResultSet, Row},
    tasks::Task,
    value::{Value, format_date},
};

pub const NO_RESULTS: &str = "_No results_";
pub const NO_TASKS: &str = "_No tasks_";
/// Heading text for a group whose key is null
pub const NULL_GROUP: &str = "(none)";

/// Human-readable text of a value: booleans as ✓/✗, null as empty,
/// arrays comma-joined, dates as `YYYY-MM-DD[ HH:MM]`.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Boolean(true) => "✓".to_string(),
        Value::Boolean(false) => "✗".to_string(),
        Value::Date(d) => format_date(d),
        Value::Array(items) => items.iter().map(display_text).collect::<Vec<_>>().join(", "),
        other => other.as_string(),
    }
}

/// Table cell text: [`display_text`] with pipes escaped and newlines flattened.
pub fn format_cell(value: &Value) -> String {
    display_text(value)
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace('\n', " ")
}

pub fn format_table(rows: &[Row], field_names: &[String]) -> String {
    if rows.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(table_line(field_names.iter().map(|name| name.replace('|', "\\|"))));
    lines.push(table_line(field_names.iter().map(|_| "---".to_string())));
    // Cells are matched to headers by position, so repeated headers stay distinct
    for row in rows {
        lines.push(table_line((0..field_names.len()).map(|i| {
            row.cells()
                .get(i)
                .map(|(_, value)| format_cell(value))
                .unwrap_or_default()
        })));
    }
    lines.join("\n")
}

fn table_line(cells: impl Iterator<Item = String>) -> String {
    let mut line = String::from("|");
    for cell in cells {
        line.push(' ');
        line.push_str(&cell);
        line.push_str(" |");
    }
    line
}

pub fn format_list(rows: &[Row], display_field: &str) -> String {
    if rows.is_empty() {
        return NO_RESULTS.to_string();
    }

    rows.iter()
        .map(|row| {
            let text = row.get(display_field).map(display_text).unwrap_or_default();
            format!("- {}", text.replace('\n', " "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return NO_TASKS.to_string();
    }

    tasks
        .iter()
        .map(|task| {
            format!(
                "{}- [{}] {}",
                " ".repeat(task.indentation_depth),
                if task.completed { 'x' } else { ' ' },
                task.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rows bucketed by the day of `date_field`, days ascending; rows without a
/// date are left out.
pub fn format_calendar(rows: &[Row], date_field: &str, display_field: &str) -> String {
    let mut days: BTreeMap<NaiveDate, Vec<&Row>> = BTreeMap::new();
    for row in rows {
        if let Some(date) = row.get(date_field).and_then(Value::as_date) {
            days.entry(date.date_naive()).or_default().push(row);
        }
    }

    if days.is_empty() {
        return NO_RESULTS.to_string();
    }

    days.into_iter()
        .map(|(day, rows)| {
            let items: Vec<Row> = rows.into_iter().cloned().collect();
            format!("### {}\n\n{}", day.format("%Y-%m-%d"), format_list(&items, display_field))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render a complete result set, with a `### key` heading per group when grouped.
pub fn render(result: &ResultSet) -> String {
    if !result.grouped {
        return result
            .groups
            .first()
            .map(|group| render_body(result, &group.rows, &group.tasks))
            .unwrap_or_else(|| placeholder(result.query_type).to_string());
    }

    if result.groups.is_empty() {
        return placeholder(result.query_type).to_string();
    }

    result
        .groups
        .iter()
        .map(|group| {
            let heading = match &group.key {
                Some(key) if !key.is_null() => display_text(key),
                _ => NULL_GROUP.to_string(),
            };
            format!("### {}\n\n{}", heading, render_body(result, &group.rows, &group.tasks))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_body(result: &ResultSet, rows: &[Row], tasks: &[Task]) -> String {
    let column = |index: usize| result.columns.get(index).map(String::as_str).unwrap_or_default();
    match result.query_type {
        QueryType::Table => format_table(rows, &result.columns),
        QueryType::List => format_list(rows, column(0)),
        QueryType::Task => format_task_list(tasks),
        QueryType::Calendar => format_calendar(rows, column(1), column(0)),
    }
}

fn placeholder(query_type: QueryType) -> &'static str {
    match query_type {
        QueryType::Task => NO_TASKS,
        _ => NO_RESULTS,
    }
}

/// Result of an inline `= expr` span.
pub fn format_inline(value: &Value) -> String {
    display_text(value).replace('\n', " ")
}

/// Error annotation shown in place of a failing codeblock.
pub fn format_block_error(message: &str) -> String {
    format!("> [!error] Dataview: {}", message.replace('\n', " "))
}

/// Error annotation shown in place of a failing inline span.
pub fn format_inline_error(message: &str) -> String {
    format!("`Dataview error: {}`", message.replace(['`', '\n'], " "))
}

/// Compact JSON of a result set.
pub fn to_json(result: &ResultSet) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}

/// Pretty-printed JSON of a result set.
pub fn to_json_pretty(result: &ResultSet) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}
