//! Diagnostics raised while building a catalog.
//!
//! Extraction never aborts on bad documentation. Problems are reported
//! through a [`Diagnostics`] sink and the offending chunk is skipped.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Chunk text does not start with a signature
    NoSignature { line: usize },
    /// Return-type spelling missing from the vocabulary
    UnknownReturnType { name: String, spelling: String },
    /// Entry in the function-list section without a signature
    UnparseableListEntry { line: usize, chunk: String },
    /// Entry dropped because the symbol already exists natively
    KnownSymbol { name: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Self::NoSignature { .. } | Self::KnownSymbol { .. } => Severity::Debug,
            Self::UnknownReturnType { .. } => Severity::Warning,
            Self::UnparseableListEntry { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSignature { line } => write!(f, "line {line}: no signature, skipped"),
            Self::UnknownReturnType { name, spelling } => {
                write!(f, "{name}: unknown return type {spelling:?}")
            }
            Self::UnparseableListEntry { line, chunk } => {
                write!(f, "line {line}: failed to parse function list entry:\n{chunk}")
            }
            Self::KnownSymbol { name } => write!(f, "{name}: already known, dropped"),
        }
    }
}

/// Sink for [`Diagnostic`]s.
pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects everything, for callers that inspect diagnostics afterwards.
impl Diagnostics for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards to the `log` facade at the diagnostic's severity.
#[derive(Debug, Default)]
pub struct LogDiagnostics {
    errors: usize,
    warnings: usize,
}

impl LogDiagnostics {
    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }
}

impl Diagnostics for LogDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Debug => log::debug!("{diagnostic}"),
            Severity::Warning => {
                self.warnings += 1;
                log::warn!("{diagnostic}");
            }
            Severity::Error => {
                self.errors += 1;
                log::error!("{diagnostic}");
            }
        }
    }
}
