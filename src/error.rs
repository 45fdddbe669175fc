use std::path::PathBuf;
use thiserror::Error;

/// Result type for catalog extraction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or feeding the extractor.
///
/// Segmentation and signature parsing never fail; these cover the setup
/// around them.
#[derive(Error, Debug)]
pub enum Error {
    /// A configured pattern did not compile
    #[error("invalid pattern for `{field}`: {source}")]
    Pattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::Config`]
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
