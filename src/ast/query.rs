use std::fmt;

use serde::Serialize;

use crate::ast::Expr;

/// Retrieval mode of a query; decides which fields are allowed and how results render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryType {
    Table,
    List,
    Task,
    Calendar,
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryType::Table => "TABLE",
            QueryType::List => "LIST",
            QueryType::Task => "TASK",
            QueryType::Calendar => "CALENDAR",
        };
        f.write_str(name)
    }
}

/// One TABLE column.
#[derive(Debug, Clone, PartialEq)]
pub struct TableField {
    pub expression: Expr,
    pub alias: Option<String>,
}

impl TableField {
    /// Column header: the alias when given, else the expression as written.
    pub fn header(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => self.expression.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// One SORT key; clauses are applied left to right, the first is primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub field: String,
    pub direction: Direction,
}

/// The FROM clause: folders, tags, and AND/OR combinations of them.
///
/// # Examples
/// ```text
/// FROM "projects"                 // Folder("projects")
/// FROM "#urgent"                  // Tag("urgent")
/// FROM "projects" AND "#urgent"   // And(Folder, Tag)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Folder prefix, without surrounding slashes
    Folder(String),
    /// Tag name, without the leading `#`
    Tag(String),
    And(Box<Source>, Box<Source>),
    Or(Box<Source>, Box<Source>),
}

impl Source {
    /// Classify a FROM string literal: `#name` is a tag, anything else a folder.
    pub fn from_literal(text: &str) -> Self {
        let text = text.trim();
        match text.strip_prefix('#') {
            Some(tag) => Source::Tag(tag.to_string()),
            None => Source::Folder(text.trim_matches('/').to_string()),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Folder(path) => write!(f, "\"{}\"", path),
            Source::Tag(tag) => write!(f, "\"#{}\"", tag),
            Source::And(left, right) => {
                match left.as_ref() {
                    Source::Or(..) => write!(f, "({})", left)?,
                    _ => write!(f, "{}", left)?,
                }
                match right.as_ref() {
                    Source::Or(..) | Source::And(..) => write!(f, " AND ({})", right),
                    _ => write!(f, " AND {}", right),
                }
            }
            Source::Or(left, right) => match right.as_ref() {
                Source::Or(..) => write!(f, "{} OR ({})", left, right),
                _ => write!(f, "{} OR {}", left, right),
            },
        }
    }
}

/// A complete parsed query. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub query_type: QueryType,

    /// TABLE columns; always empty for other query types
    pub fields: Vec<TableField>,

    /// Absent means the whole corpus
    pub from_source: Option<Source>,

    /// Absent means no filtering
    pub where_clause: Option<Expr>,

    pub group_by: Option<String>,

    /// Expand multi-valued cells into one row per element
    pub flatten: bool,

    pub sort: Vec<SortClause>,

    pub limit: Option<usize>,
}

impl Query {
    pub fn new(query_type: QueryType) -> Self {
        Query {
            query_type,
            fields: Vec::new(),
            from_source: None,
            where_clause: None,
            group_by: None,
            flatten: false,
            sort: Vec::new(),
            limit: None,
        }
    }
}
