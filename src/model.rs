//! Data model for extracted documentation: format-agnostic.

use serde::Serialize;
use std::collections::BTreeMap;

/// A contiguous run of help lines that starts at a pattern match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Tag set in effect when the chunk started
    pub tags: Vec<String>,
    /// Visible lines joined with `\n`, tags already stripped
    pub text: String,
    /// Capture groups 1..n of the boundary match
    pub captures: Vec<Option<String>>,
    /// 1-indexed line the chunk starts on
    pub start_line: usize,
}

impl Chunk {
    /// Capture group `index` (1-based, like [`regex::Captures`]).
    pub fn capture(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.captures.get(i))
            .and_then(|c| c.as_deref())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// One parameter from a `{name}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub optional: bool,
}

/// Result of parsing the leading `name({a}, [{b}])` of a chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub params: Vec<Param>,
    /// Free text after the closing parenthesis
    pub doc: String,
}

/// Final record handed to the catalog consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub params: Vec<Param>,
    pub doc: String,
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

/// Entries keyed by name. Later inserts replace earlier ones.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn insert(&mut self, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(entry.name.clone(), entry)
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&CatalogEntry) -> bool) {
        self.entries.retain(|_, entry| keep(entry));
    }
}
