//! Catalog builder. Runs the segmenter and signature parser over the
//! function-list and reference passes and merges the results.

use crate::config::Profiles;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{Catalog, CatalogEntry, Chunk};
use crate::signature::parse_signature;
use crate::types::Resolved;
use std::collections::{HashMap, HashSet};

/// Answers whether a name already exists natively.
pub trait SymbolOracle {
    fn is_known(&self, name: &str) -> bool;
}

/// Oracle that knows nothing; keeps every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSymbols;

impl SymbolOracle for NoSymbols {
    fn is_known(&self, _name: &str) -> bool {
        false
    }
}

impl SymbolOracle for HashSet<String> {
    fn is_known(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<F: Fn(&str) -> bool> SymbolOracle for F {
    fn is_known(&self, name: &str) -> bool {
        self(name)
    }
}

impl Catalog {
    /// Drop entries the oracle already knows about.
    pub fn retain_unknown(
        &mut self,
        oracle: &dyn SymbolOracle,
        diagnostics: &mut dyn Diagnostics,
    ) {
        self.retain(|entry| {
            if oracle.is_known(&entry.name) {
                diagnostics.report(Diagnostic::KnownSymbol {
                    name: entry.name.clone(),
                });
                return false;
            }
            true
        });
    }
}

/// Accumulates a catalog across documents.
///
/// Feed function lists first so their return types are available to the
/// reference entries that follow.
pub struct CatalogBuilder<'p> {
    profiles: &'p Profiles,
    /// Unqualified name → resolved return type
    returns: HashMap<String, String>,
    catalog: Catalog,
}

impl<'p> CatalogBuilder<'p> {
    pub fn new(profiles: &'p Profiles) -> Self {
        Self {
            profiles,
            returns: HashMap::new(),
            catalog: Catalog::default(),
        }
    }

    /// Collect return types from the function-list section of a document.
    /// Returns the number of list entries parsed.
    pub fn function_list<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        diagnostics: &mut dyn Diagnostics,
    ) -> usize {
        let rules = &self.profiles.list;
        let mut parsed = 0;

        for chunk in rules.segmenter.segment(lines) {
            if !chunk.has_tag(&rules.section_tag) {
                continue;
            }
            let Some(sig) = parse_signature(&chunk.text) else {
                diagnostics.report(Diagnostic::UnparseableListEntry {
                    line: chunk.start_line,
                    chunk: chunk.text,
                });
                continue;
            };
            parsed += 1;

            let Some(spelling) = chunk.capture(rules.return_group) else {
                self.returns.remove(&sig.name);
                continue;
            };
            match self.profiles.return_types.resolve(spelling) {
                Resolved::Known(Some(ty)) => {
                    self.returns.insert(sig.name, ty);
                }
                Resolved::Known(None) => {
                    self.returns.remove(&sig.name);
                }
                Resolved::Unknown(tokens) => {
                    self.returns.remove(&sig.name);
                    for token in tokens {
                        diagnostics.report(Diagnostic::UnknownReturnType {
                            name: sig.name.clone(),
                            spelling: token,
                        });
                    }
                }
            }
        }

        log::debug!("function list: {parsed} entries, {} typed", self.returns.len());
        parsed
    }

    /// Add the reference entries of a document to the catalog.
    /// Returns the number of entries inserted.
    pub fn reference<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        diagnostics: &mut dyn Diagnostics,
    ) -> usize {
        let rules = &self.profiles.reference;
        let mut inserted = 0;

        for chunk in rules.segmenter.segment(lines) {
            if rules.skip_tags.iter().any(|t| chunk.has_tag(t)) {
                continue;
            }
            let Some(sig) = parse_signature(&chunk.text) else {
                diagnostics.report(Diagnostic::NoSignature {
                    line: chunk.start_line,
                });
                continue;
            };

            let return_type = self.returns.get(&sig.name).cloned();
            let name = self.qualify(&sig.name, &chunk);
            if let Some(previous) = self.catalog.insert(CatalogEntry {
                name,
                params: sig.params,
                doc: dedent(&sig.doc),
                return_type,
            }) {
                log::debug!("{}: replaced earlier entry", previous.name);
            }
            inserted += 1;
        }

        inserted
    }

    pub fn finish(self) -> Catalog {
        self.catalog
    }

    fn qualify(&self, name: &str, chunk: &Chunk) -> String {
        let rules = &self.profiles.reference;
        if rules.qualify_from_tags {
            let suffix = format!(".{name}");
            let qualified = chunk
                .tags
                .iter()
                .filter_map(|t| t.strip_suffix("()"))
                .find(|stem| stem.ends_with(&suffix));
            if let Some(stem) = qualified {
                return stem.to_string();
            }
        }
        match &rules.namespace {
            Some(ns) if !name.contains('.') => format!("{ns}.{name}"),
            _ => name.to_string(),
        }
    }
}

/// Normalize a signature doc. The first line is the rest of the signature
/// line and is kept only when non-empty. The indentation shared by the body
/// lines after it is removed. Example end markers (`<` in column 0) do not
/// count toward the shared indent.
fn dedent(doc: &str) -> String {
    let mut lines = doc.lines();
    let first = lines.next().unwrap_or("").trim();
    let body: Vec<&str> = lines.collect();
    let indent = body
        .iter()
        .filter(|l| !l.trim().is_empty() && !l.starts_with('<'))
        .map(|l| leading_blanks(l))
        .min()
        .unwrap_or(0);

    let body = body.iter().map(|l| {
        let cut = leading_blanks(l).min(indent);
        l[cut..].trim_end()
    });
    std::iter::once(first)
        .filter(|l| !l.is_empty())
        .chain(body)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

fn leading_blanks(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}
