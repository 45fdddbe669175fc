//! Per-document extraction profiles.
//!
//! Defaults target the `builtin.txt` layout: a function-list section
//! (`name({args})  Type  summary`) followed by the detailed reference where
//! every entry starts with its signature and a `*name()*` tag. Any field can
//! be overridden from a TOML file.

use crate::error::{Error, Result};
use crate::segment::{Segmenter, DEFAULT_CONTINUATION, DEFAULT_TAG_DELIMITER};
use crate::types::ReturnTypes;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_LIST_PATTERN: &str = r"^([^\W\d][\w.#:]*\([^)]*\))\s+(\w+(?:/\w+)*)";
pub const DEFAULT_REFERENCE_PATTERN: &str = r"^([^\W\d][\w.#:]*)\(";
pub const DEFAULT_LIST_TAG: &str = "builtin-function-list";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tag_delimiter: char,
    pub list: ListProfile,
    pub reference: ReferenceProfile,
    /// Extra return-type spellings on top of the built-in vocabulary
    pub return_types: BTreeMap<String, String>,
}

/// Function-list section: one line (or a wrapped pair) per function with
/// its return type in a column after the signature.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListProfile {
    pub pattern: String,
    pub continuation: String,
    pub depth: usize,
    /// Only chunks carrying this tag are list entries
    pub section_tag: String,
    /// Capture group of `pattern` holding the return-type spelling
    pub return_group: usize,
}

/// Detailed reference entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceProfile {
    pub pattern: String,
    pub continuation: String,
    pub depth: usize,
    /// Chunks carrying any of these tags are ignored
    pub skip_tags: Vec<String>,
    /// Prefix for names without a dot; empty for none
    pub namespace: String,
    /// Use a `*ns.name()*` tag as the entry name when it ends in the parsed name
    pub qualify_from_tags: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_delimiter: DEFAULT_TAG_DELIMITER,
            list: ListProfile::default(),
            reference: ReferenceProfile::default(),
            return_types: BTreeMap::new(),
        }
    }
}

impl Default for ListProfile {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_LIST_PATTERN.to_string(),
            continuation: DEFAULT_CONTINUATION.to_string(),
            depth: 2,
            section_tag: DEFAULT_LIST_TAG.to_string(),
            return_group: 2,
        }
    }
}

impl Default for ReferenceProfile {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_REFERENCE_PATTERN.to_string(),
            continuation: DEFAULT_CONTINUATION.to_string(),
            depth: 1,
            skip_tags: vec![DEFAULT_LIST_TAG.to_string()],
            namespace: String::new(),
            qualify_from_tags: true,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml(&text)
    }

    /// Compile patterns into ready-to-run [`Profiles`].
    pub fn compile(&self) -> Result<Profiles> {
        let list = ListRules {
            segmenter: segmenter(
                ("list.pattern", &self.list.pattern),
                ("list.continuation", &self.list.continuation),
                self.list.depth,
                self.tag_delimiter,
            )?,
            section_tag: self.list.section_tag.clone(),
            return_group: self.list.return_group,
        };

        let namespace = self.reference.namespace.trim_end_matches('.');
        let reference = ReferenceRules {
            segmenter: segmenter(
                ("reference.pattern", &self.reference.pattern),
                ("reference.continuation", &self.reference.continuation),
                self.reference.depth,
                self.tag_delimiter,
            )?,
            skip_tags: self.reference.skip_tags.clone(),
            namespace: (!namespace.is_empty()).then(|| namespace.to_string()),
            qualify_from_tags: self.reference.qualify_from_tags,
        };

        let mut return_types = ReturnTypes::default();
        return_types.extend(self.return_types.iter().map(|(k, v)| (k, v.clone())));

        Ok(Profiles {
            list,
            reference,
            return_types,
        })
    }
}

fn segmenter(
    pattern: (&'static str, &str),
    continuation: (&'static str, &str),
    depth: usize,
    tag_delimiter: char,
) -> Result<Segmenter> {
    let compile = |(field, text): (&'static str, &str)| {
        Regex::new(text).map_err(|source| Error::Pattern { field, source })
    };
    Segmenter::new(compile(pattern)?, compile(continuation)?, depth)
        .with_tag_delimiter(tag_delimiter)
}

/// Compiled configuration.
#[derive(Debug, Clone)]
pub struct Profiles {
    pub list: ListRules,
    pub reference: ReferenceRules,
    pub return_types: ReturnTypes,
}

#[derive(Debug, Clone)]
pub struct ListRules {
    pub segmenter: Segmenter,
    pub section_tag: String,
    pub return_group: usize,
}

#[derive(Debug, Clone)]
pub struct ReferenceRules {
    pub segmenter: Segmenter,
    pub skip_tags: Vec<String>,
    pub namespace: Option<String>,
    pub qualify_from_tags: bool,
}
