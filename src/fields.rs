//! Field resolution.
//!
//! A field name resolves against a note with a fixed precedence, first match wins:
//!
//! 1. Reserved `file.*` fields, computed from note metadata and never read
//!    from frontmatter, even when frontmatter defines the same key
//! 2. Frontmatter, by exact key
//! 3. Nested frontmatter objects, for dotted names (`project.owner`)
//! 4. Note attributes (`title`, `content`, `path`, ...)
//! 5. Otherwise `null`; an unknown field is never an error

use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::{note::Note, value::Value};

/// A computed, reserved field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileField {
    /// The note title, empty when absent
    Name,
    /// `[[title]]`
    Link,
    Path,
    Folder,
    /// Content length in bytes
    Size,
    /// Creation timestamp, null when unknown
    Ctime,
    /// Modification timestamp, null when unknown
    Mtime,
    /// Frontmatter and inline tags, each with a leading `#`
    Tags,
}

impl FileField {
    pub const ALL: [FileField; 8] = [
        FileField::Name,
        FileField::Link,
        FileField::Path,
        FileField::Folder,
        FileField::Size,
        FileField::Ctime,
        FileField::Mtime,
        FileField::Tags,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FileField::Name => "file.name",
            FileField::Link => "file.link",
            FileField::Path => "file.path",
            FileField::Folder => "file.folder",
            FileField::Size => "file.size",
            FileField::Ctime => "file.ctime",
            FileField::Mtime => "file.mtime",
            FileField::Tags => "file.tags",
        }
    }

    fn compute(self, note: &Note) -> Value {
        match self {
            FileField::Name => Value::String(note.title.clone()),
            FileField::Link => Value::String(format!("[[{}]]", note.title)),
            FileField::Path => Value::String(note.path.clone()),
            FileField::Folder => Value::String(note.folder.clone()),
            FileField::Size => Value::Integer(i64::try_from(note.content.len()).unwrap_or(i64::MAX)),
            FileField::Ctime => note.created_at.map(Value::Date).unwrap_or(Value::Null),
            FileField::Mtime => note.updated_at.map(Value::Date).unwrap_or(Value::Null),
            FileField::Tags => Value::Array(
                note.tags()
                    .into_iter()
                    .map(|t| Value::String(format!("#{}", t)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for FileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FileField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| format!("unknown file field '{}'", s))
    }
}

/// Resolves field names against notes using an explicit reserved-field table.
///
/// The table is owned by the resolver, so differently configured resolvers
/// can run side by side.
///
/// # Examples
///
/// ```
/// use dataview_lang::{FieldResolver, Note, Value};
///
/// let note = Note::new("y").with_frontmatter("file.name", "x");
/// let resolver = FieldResolver::default();
/// assert_eq!(resolver.resolve(&note, "file.name"), Value::from("y"));
/// assert_eq!(resolver.resolve(&note, "missing"), Value::Null);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldResolver {
    file_fields: BTreeMap<String, FileField>,
}

impl Default for FieldResolver {
    fn default() -> Self {
        FieldResolver {
            file_fields: FileField::ALL
                .into_iter()
                .map(|field| (field.name().to_string(), field))
                .collect(),
        }
    }
}

impl FieldResolver {
    /// Register an extra name for a reserved field (`created` -> `file.ctime`).
    pub fn with_alias(mut self, name: impl Into<String>, field: FileField) -> Self {
        self.file_fields.insert(name.into(), field);
        self
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.file_fields.contains_key(name)
    }

    pub fn resolve(&self, note: &Note, name: &str) -> Value {
        if let Some(field) = self.file_fields.get(name) {
            return field.compute(note);
        }

        if let Some(value) = note.frontmatter.get(name) {
            return value.clone();
        }

        if let Some(value) = resolve_nested(note, name) {
            return value;
        }

        attribute(note, name).unwrap_or(Value::Null)
    }
}

fn resolve_nested(note: &Note, name: &str) -> Option<Value> {
    let mut segments = name.split('.');
    let mut current = note.frontmatter.get(segments.next()?)?;
    let mut walked = false;
    for segment in segments {
        match current {
            Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
        walked = true;
    }
    walked.then(|| current.clone())
}

fn attribute(note: &Note, name: &str) -> Option<Value> {
    let value = match name {
        "id" | "identifier" => Value::String(note.id.clone()),
        "title" => Value::String(note.title.clone()),
        "path" => Value::String(note.path.clone()),
        "folder" => Value::String(note.folder.clone()),
        "content" => Value::String(note.content.clone()),
        "created_at" => note.created_at.map(Value::Date).unwrap_or(Value::Null),
        "updated_at" => note.updated_at.map(Value::Date).unwrap_or(Value::Null),
        _ => return None,
    };
    Some(value)
}
