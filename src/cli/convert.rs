//! Corpus loading and option parsing

use super::CliError;
use crate::{FileField, Note};

/// Parse a note corpus: a JSON array of note records.
///
/// ```
/// use dataview_lang::cli::load_corpus;
///
/// let notes = load_corpus(r#"[{"title": "A", "frontmatter": {"status": "active"}}]"#).unwrap();
/// assert_eq!(notes[0].title, "A");
/// ```
pub fn load_corpus(json: &str) -> Result<Vec<Note>, CliError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(json)?)
}

/// Parse a `name=file.field` alias option.
pub fn parse_alias(option: &str) -> Result<(String, FileField), CliError> {
    let (name, field) = option
        .split_once('=')
        .ok_or_else(|| CliError::Config(format!("alias '{}' must look like name=file.field", option)))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::Config(format!("alias '{}' has an empty name", option)));
    }
    let field = field.trim().parse::<FileField>().map_err(CliError::Config)?;
    Ok((name.to_string(), field))
}
