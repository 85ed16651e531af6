//! # Name resolution
//!
//! Builds the table mapping candidate column names to field paths for a
//! record type. Embedded records are flattened into the parent's namespace.

use std::collections::HashMap;

use crate::record::{FieldDef, FieldType, Record};
use crate::value::Kind;

/// Structural tags consulted for a field's column name, highest priority
/// first.
pub const TAGS: [&str; 5] = ["rowscan", "db", "gorm", "sql", "json"];

/// Embedded records nested deeper than this are ignored.
pub const MAX_EMBED_DEPTH: usize = 32;

/// Indices locating a (possibly nested) field within a record type.
pub type FieldPath = Vec<usize>;

/// Candidate column names mapped to field paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    names: HashMap<String, FieldPath>,
}

impl NameTable {
    /// Build the name table for record type `T`.
    #[must_use]
    pub fn resolve<T: Record>() -> Self {
        Self::from_fields(&T::fields())
    }

    /// Build a name table from a field list.
    #[must_use]
    pub fn from_fields(fields: &[FieldDef]) -> Self {
        let mut table = Self::default();
        table.register(fields, &mut Vec::new());
        table
    }

    fn register(&mut self, fields: &[FieldDef], prefix: &mut FieldPath) {
        for (index, field) in fields.iter().enumerate() {
            if !field.exported {
                continue;
            }
            prefix.push(index);

            match field.ty {
                FieldType::Embedded(embedded) => {
                    if prefix.len() < MAX_EMBED_DEPTH {
                        self.register(&embedded(), prefix);
                    }
                }
                FieldType::Value(_) => {
                    self.names.insert(field.name.to_string(), prefix.clone());
                    self.names.insert(column_name(field), prefix.clone());
                }
            }

            prefix.pop();
        }
    }

    /// Path registered under exactly `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[usize]> {
        self.names.get(name).map(Vec::as_slice)
    }

    /// Path for a column identity: an exact match, else the lower-cased name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&[usize]> {
        self.get(name).or_else(|| self.get(&name.to_lowercase()))
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no names are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate registered names and their paths, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.names.iter().map(|(name, path)| (name.as_str(), path.as_slice()))
    }
}

/// The column name a field answers to, from its highest-priority tag.
///
/// A `column:` directive in a `;`-separated tag wins; otherwise the text
/// before the first `,`; otherwise the whole tag. Untagged fields use their
/// lower-cased name.
#[must_use]
pub fn column_name(field: &FieldDef) -> String {
    let Some(tag) = TAGS.iter().find_map(|name| field.tag(name)) else {
        return field.name.to_lowercase();
    };

    if let Some(piece) = tag.split(';').find(|piece| piece.starts_with("column")) {
        return piece.split_once(':').map_or(piece, |(_, column)| column).to_string();
    }

    tag.split_once(',').map_or(tag, |(column, _)| column).to_string()
}

/// The holder kind of the field at `path`.
#[must_use]
pub fn field_kind(fields: &[FieldDef], path: &[usize]) -> Option<Kind> {
    let (&index, rest) = path.split_first()?;
    match fields.get(index)?.ty {
        FieldType::Value(kind) if rest.is_empty() => Some(kind),
        FieldType::Embedded(embedded) => field_kind(&embedded(), rest),
        FieldType::Value(_) => None,
    }
}
