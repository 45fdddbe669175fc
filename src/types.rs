//! Return-type vocabulary: help-file spellings to annotation type names.

use std::collections::HashMap;

/// Built-in spellings. `None` means "returns nothing".
const BUILTIN: &[(&str, Option<&str>)] = &[
    ("number", Some("integer")),
    ("string", Some("string")),
    ("list", Some("any[]")),
    ("dict", Some("table<string,any>")),
    ("none", None),
    ("set", Some("table<any,true>")),
    ("boolean", Some("boolean")),
    ("float", Some("number")),
    ("funcref", Some("function")),
    ("any", Some("any")),
];

/// Outcome of looking up one spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Type(String),
    Nothing,
    Unknown,
}

/// Outcome of resolving a possibly compound spelling like `List/Blob`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Every part was known; `None` when all parts were `none`
    Known(Option<String>),
    /// Tokens that are not in the vocabulary, in order of appearance
    Unknown(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct ReturnTypes {
    map: HashMap<String, Option<String>>,
}

impl Default for ReturnTypes {
    fn default() -> Self {
        Self {
            map: BUILTIN
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
        }
    }
}

impl ReturnTypes {
    /// Add or replace spellings. Keys are matched case-insensitively.
    pub fn extend<K, V>(&mut self, extra: impl IntoIterator<Item = (K, V)>)
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        for (k, v) in extra {
            self.map.insert(k.as_ref().to_lowercase(), Some(v.into()));
        }
    }

    pub fn lookup(&self, spelling: &str) -> Lookup {
        match self.map.get(&spelling.trim().to_lowercase()) {
            Some(Some(ty)) => Lookup::Type(ty.clone()),
            Some(None) => Lookup::Nothing,
            None => Lookup::Unknown,
        }
    }

    /// Resolve `/`-separated alternatives, joining known types with `|`.
    pub fn resolve(&self, spelling: &str) -> Resolved {
        let mut types: Vec<String> = Vec::new();
        let mut unknown = Vec::new();
        for part in spelling.split('/').filter(|p| !p.trim().is_empty()) {
            match self.lookup(part) {
                Lookup::Type(ty) => {
                    if !types.contains(&ty) {
                        types.push(ty);
                    }
                }
                Lookup::Nothing => {}
                Lookup::Unknown => unknown.push(part.trim().to_string()),
            }
        }

        if !unknown.is_empty() {
            return Resolved::Unknown(unknown);
        }
        if types.is_empty() {
            Resolved::Known(None)
        } else {
            Resolved::Known(Some(types.join("|")))
        }
    }
}
