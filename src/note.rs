//! The read-only note record the engine queries.
//!
//! Notes are handed over already materialized (deserialized from JSON by the
//! CLI, or built by the host application); the engine never mutates them.

use std::{collections::BTreeMap, sync::LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::Value;

static INLINE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)#([\p{L}\p{N}_/-]+)").expect("inline tag pattern is valid")
});

/// One note of the corpus.
///
/// # Examples
///
/// ```
/// use dataview_lang::{Note, Value};
///
/// let note = Note::new("Roadmap")
///     .with_folder("projects/2024")
///     .with_frontmatter("status", Value::from("active"));
/// assert!(note.in_folder("projects"));
/// assert!(!note.in_folder("proj"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    #[serde(alias = "identifier")]
    pub id: String,
    pub title: String,
    pub path: String,
    pub folder: String,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub frontmatter: BTreeMap<String, Value>,
}

impl Note {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Note {
            id: title.clone(),
            path: format!("{}.md", title),
            title,
            ..Default::default()
        }
    }

    /// Set the folder, and move the path under it.
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        let file_name = self.path.rsplit('/').next().unwrap_or_default().to_string();
        self.path = if self.folder.is_empty() {
            file_name
        } else {
            format!("{}/{}", self.folder.trim_end_matches('/'), file_name)
        };
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_frontmatter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.frontmatter.insert(key.into(), value.into());
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn with_updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Frontmatter `tags` followed by inline `#tags` from the body, without
    /// the leading `#`, de-duplicated in first-seen order.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        let mut push = |tag: &str| {
            let tag = tag.trim().trim_start_matches('#');
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        };

        match self.frontmatter.get("tags") {
            Some(Value::String(s)) => s
                .split(|c: char| c == ',' || c.is_whitespace())
                .for_each(&mut push),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.as_str()),
                    _ => None,
                })
                .for_each(&mut push),
            _ => {}
        }

        for cap in INLINE_TAG.captures_iter(&self.content) {
            let tag = &cap[1];
            // `#123` is an issue reference, not a tag
            if !tag.chars().all(|c| c.is_ascii_digit()) {
                push(tag);
            }
        }
        tags
    }

    /// True when the note carries `tag` or a nested `tag/child`.
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim_start_matches('#');
        self.tags().iter().any(|t| {
            t == tag
                || t
                    .strip_prefix(tag)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// True when the note lives in `folder` or one of its subfolders.
    /// An empty folder (or `/`) matches every note.
    pub fn in_folder(&self, folder: &str) -> bool {
        let folder = folder.trim_matches('/');
        if folder.is_empty() {
            return true;
        }
        let own = self.folder.trim_matches('/');
        own == folder
            || own
                .strip_prefix(folder)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}
