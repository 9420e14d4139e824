//! Strip profiles and file lists.
//!
//! A profile names one build variant: the solution to strip and the files
//! that variant does without.
//!
//! ```toml
//! solution = "../bee.sln"
//! disk_root = ".."
//! files = [
//!   "include\\ai\\navmesh.hpp",
//!   "source/ai/navmesh.cpp",
//! ]
//! ```
//!
//! `solution` and `disk_root` are relative to the profile file. When
//! `disk_root` is omitted, files are deleted relative to the solution's
//! directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::util::path::{parent_dir, resolve_relative};

#[derive(Debug, Error)]
pub enum ProfileError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse profile {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("profile {0} lists no files")]
  Empty(PathBuf),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProfile {
  solution: String,
  #[serde(default)]
  disk_root: Option<String>,
  #[serde(default)]
  files: Vec<String>,
}

/// A loaded profile with paths resolved against the profile's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripProfile {
  pub solution: PathBuf,
  pub disk_root: PathBuf,
  pub files: Vec<String>,
}

impl StripProfile {
  pub fn load(path: &Path) -> Result<Self, ProfileError> {
    let content = fs::read_to_string(path).map_err(|source| ProfileError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_toml(path, &content)
  }

  /// Parse profile content as if it had been read from `path`.
  pub fn from_toml(path: &Path, content: &str) -> Result<Self, ProfileError> {
    let raw: RawProfile = toml::from_str(content).map_err(|source| ProfileError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    let files: Vec<String> = raw
      .files
      .iter()
      .map(|f| f.trim())
      .filter(|f| !f.is_empty())
      .map(str::to_string)
      .collect();
    if files.is_empty() {
      return Err(ProfileError::Empty(path.to_path_buf()));
    }

    let base = parent_dir(path);
    let solution = resolve_relative(&base, &raw.solution);
    let disk_root = match raw.disk_root {
      Some(root) => resolve_relative(&base, &root),
      None => parent_dir(&solution),
    };

    debug!(profile = %path.display(), solution = %solution.display(), files = files.len(), "loaded strip profile");
    Ok(Self {
      solution,
      disk_root,
      files,
    })
  }
}

/// Read a plain list of files: one path per line, `#` starts a comment line,
/// blank lines are ignored and surrounding whitespace is trimmed.
pub fn read_file_list(path: &Path) -> Result<Vec<String>, ProfileError> {
  let content = fs::read_to_string(path).map_err(|source| ProfileError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(parse_file_list(&content))
}

pub fn parse_file_list(content: &str) -> Vec<String> {
  content
    .lines()
    .map(|line| line.trim_start_matches('\u{feff}').trim())
    .filter(|line| !line.is_empty() && !line.starts_with('#'))
    .map(str::to_string)
    .collect()
}
