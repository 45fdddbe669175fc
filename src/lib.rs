//! helpcat: extract a typed API catalog from tagged plain-text help files.
//!
//! The engine has two stages:
//!
//! - [`segment`] splits document lines into tagged [`Chunk`]s using a
//!   boundary pattern with lookahead and a continuation rule.
//! - [`signature`] parses a chunk's leading `name({a}, [{b}])` into a
//!   [`Signature`].
//!
//! [`CatalogBuilder`] drives both over a function-list pass (return types)
//! and a reference pass (entries), producing a [`Catalog`].

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod segment;
pub mod signature;
pub mod types;

pub use catalog::{CatalogBuilder, NoSymbols, SymbolOracle};
pub use config::{Config, Profiles};
pub use diagnostics::{Diagnostic, Diagnostics, LogDiagnostics, Severity};
pub use error::{Error, Result};
pub use model::{Catalog, CatalogEntry, Chunk, Param, Signature};
pub use segment::Segmenter;
pub use signature::parse_signature;
