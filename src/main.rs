//! helpcat: build a JSON API catalog from help-manual text files.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `helpcat < builtin.txt`
//! - **file mode**: `helpcat -o catalog.json -k known.txt runtime/doc/builtin.txt`

use anyhow::{Context, Result};
use clap::Parser;
use helpcat::{CatalogBuilder, Config, LogDiagnostics};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "helpcat",
    about = "Extract a typed API catalog from tagged plain-text help files"
)]
struct Cli {
    /// Reference documents (files, directories or glob patterns). If omitted, reads from stdin.
    files: Vec<String>,

    /// Document holding the function-list section (repeatable).
    /// Defaults to the reference documents.
    #[arg(short = 'l', long)]
    list: Vec<String>,

    /// TOML file overriding the extraction profiles
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Newline-separated names that already exist natively; matching entries are dropped
    #[arg(short = 'k', long)]
    known: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Exit with an error if any function-list entry failed to parse
    #[arg(long)]
    strict: bool,
}

/// A named document split into lines.
struct Document {
    name: String,
    lines: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let profiles = config.compile()?;

    let references = if cli.files.is_empty() {
        // stdin mode
        vec![read_stdin()?]
    } else {
        read_documents(&resolve_inputs(&cli.files)?)?
    };
    let lists = if cli.list.is_empty() {
        None
    } else {
        Some(read_documents(&resolve_inputs(&cli.list)?)?)
    };

    let mut diagnostics = LogDiagnostics::default();
    let mut builder = CatalogBuilder::new(&profiles);

    for doc in lists.as_ref().unwrap_or(&references) {
        let n = builder.function_list(&doc.lines, &mut diagnostics);
        log::info!("{}: {} function list entries", doc.name, n);
    }
    for doc in &references {
        let n = builder.reference(&doc.lines, &mut diagnostics);
        log::info!("{}: {} reference entries", doc.name, n);
    }

    let mut catalog = builder.finish();
    if let Some(path) = cli.known.as_deref() {
        let known = read_known(path)?;
        catalog.retain_unknown(&known, &mut diagnostics);
    }
    log::info!(
        "catalog: {} entries, {} warnings, {} errors",
        catalog.len(),
        diagnostics.warnings(),
        diagnostics.errors()
    );

    let mut json =
        serde_json::to_string_pretty(&catalog).context("failed to serialize catalog")?;
    json.push('\n');
    match cli.output.as_deref() {
        Some(path) => fs::write(path, &json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{json}"),
    }

    if cli.strict && diagnostics.errors() > 0 {
        anyhow::bail!(
            "{} function list entries could not be parsed",
            diagnostics.errors()
        );
    }
    Ok(())
}

fn read_stdin() -> Result<Document> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    Ok(Document {
        name: "<stdin>".to_string(),
        lines: input.lines().map(str::to_string).collect(),
    })
}

fn read_documents(paths: &[PathBuf]) -> Result<Vec<Document>> {
    paths
        .iter()
        .map(|path| {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(Document {
                name: path.display().to_string(),
                lines: content.lines().map(str::to_string).collect(),
            })
        })
        .collect()
}

/// One name per line; blank lines and `#` comments are ignored.
fn read_known(path: &Path) -> Result<HashSet<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read known symbols: {}", path.display()))?;
    Ok(parse_known(&content))
}

fn parse_known(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Help documents found inside a directory input.
fn is_help_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "txt")
}

/// Resolve CLI inputs to help files, sorted and without duplicates.
/// An input is a file (taken as is), a directory (its `.txt` files, not
/// recursive) or a glob pattern.
fn resolve_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();
    for input in inputs {
        let path = Path::new(input);
        let found: Vec<PathBuf> = if path.is_file() {
            vec![path.to_path_buf()]
        } else if path.is_dir() {
            fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?
                .flatten()
                .map(|entry| entry.path())
                .filter(|p| is_help_file(p))
                .collect()
        } else {
            glob::glob(input)
                .with_context(|| format!("invalid glob pattern: {input}"))?
                .flatten()
                .filter(|p| p.is_file())
                .collect()
        };
        if found.is_empty() {
            log::warn!("{input}: no help files found");
        }
        files.extend(found);
    }
    Ok(files.into_iter().collect())
}
