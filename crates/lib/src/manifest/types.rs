use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::grammar::GrammarError;

/// Errors raised while loading or writing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// The manifest file does not exist.
  #[error("manifest not found: {0}")]
  NotFound(PathBuf),

  /// A project manifest's item groups are not properly closed.
  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: GrammarError,
  },

  /// A solution manifest's project blocks are not properly closed.
  #[error("invalid solution {path} at line {line}: {message}")]
  InvalidSolution { path: PathBuf, line: usize, message: String },

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The scoped write could not complete; the original file is unchanged.
  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl ManifestError {
  /// Map a read failure, turning a missing file into [`ManifestError::NotFound`].
  pub(crate) fn from_read(path: PathBuf, source: io::Error) -> Self {
    if source.kind() == io::ErrorKind::NotFound {
      ManifestError::NotFound(path)
    } else {
      ManifestError::Read { path, source }
    }
  }

  /// Whether this error means the structure could not be recovered.
  pub fn is_parse_error(&self) -> bool {
    matches!(self, ManifestError::Parse { .. } | ManifestError::InvalidSolution { .. })
  }
}
