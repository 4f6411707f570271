//! Engine configuration, passed explicitly to every entry point.

use std::collections::BTreeMap;

use crate::fields::{FieldResolver, FileField};

pub const DEFAULT_DISPLAY_FIELD: &str = "file.name";
pub const DEFAULT_CALENDAR_FIELD: &str = "file.ctime";

/// Rendering and resolution settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Field shown for each LIST item (and each CALENDAR entry)
    pub list_display_field: String,
    /// Field whose date buckets CALENDAR results
    pub calendar_field: String,
    /// Extra names for reserved `file.*` fields
    pub field_aliases: BTreeMap<String, FileField>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            list_display_field: DEFAULT_DISPLAY_FIELD.to_string(),
            calendar_field: DEFAULT_CALENDAR_FIELD.to_string(),
            field_aliases: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn resolver(&self) -> FieldResolver {
        self.field_aliases
            .iter()
            .fold(FieldResolver::default(), |resolver, (name, field)| {
                resolver.with_alias(name.clone(), *field)
            })
    }
}
