//! Deleting stripped files from disk.
//!
//! Runs independently of manifest mutation: a file is deleted whether or not
//! any project referenced it, and a failed deletion never rolls back manifest
//! edits. Callers inspect both result lists. A request that climbs out of
//! the root is refused.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::util::path::{escapes_base, normalize_key, resolve_relative};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum DiskStatus {
  Deleted,
  /// Nothing at that path; not a failure.
  NotFound,
  /// Dry run: the file exists and would be deleted.
  Pending,
  Failed { message: String },
}

/// Result of deleting one requested file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskOutcome {
  pub request: String,
  pub path: PathBuf,
  #[serde(flatten)]
  pub status: DiskStatus,
}

impl DiskOutcome {
  pub fn is_failure(&self) -> bool {
    matches!(self.status, DiskStatus::Failed { .. })
  }
}

/// Delete each request, resolved under `root`.
///
/// Requests may use either separator style and are trimmed of surrounding
/// whitespace. Directories are never removed; a request naming one is
/// reported as a failure.
pub fn delete_files(root: &Path, requests: &[String], dry_run: bool) -> Vec<DiskOutcome> {
  let mut seen = HashSet::new();
  let outcomes: Vec<DiskOutcome> = requests
    .iter()
    .map(|request| request.trim())
    .filter(|request| !request.is_empty() && seen.insert(normalize_key(request)))
    .map(|request| delete_one(root, request, dry_run))
    .collect();

  info!(
    root = %root.display(),
    deleted = outcomes.iter().filter(|o| o.status == DiskStatus::Deleted).count(),
    failed = outcomes.iter().filter(|o| o.is_failure()).count(),
    dry_run,
    "disk sync complete"
  );
  outcomes
}

fn delete_one(root: &Path, request: &str, dry_run: bool) -> DiskOutcome {
  let path = resolve_relative(root, request);
  let status = if escapes_base(request) {
    DiskStatus::Failed {
      message: format!("outside of {}", root.display()),
    }
  } else {
    delete_path(&path, dry_run)
  };

  match &status {
    DiskStatus::Failed { message } => warn!(path = %path.display(), error = %message, "failed to delete file"),
    other => debug!(path = %path.display(), status = ?other, "disk sync"),
  }

  DiskOutcome {
    request: request.to_string(),
    path,
    status,
  }
}

fn delete_path(path: &Path, dry_run: bool) -> DiskStatus {
  match fs::symlink_metadata(path) {
    Err(e) if e.kind() == io::ErrorKind::NotFound => DiskStatus::NotFound,
    Err(e) => DiskStatus::Failed { message: e.to_string() },
    Ok(metadata) if metadata.is_dir() => DiskStatus::Failed {
      message: "is a directory".to_string(),
    },
    Ok(_) if dry_run => DiskStatus::Pending,
    Ok(_) => match fs::remove_file(path) {
      Ok(()) => DiskStatus::Deleted,
      Err(e) if e.kind() == io::ErrorKind::NotFound => DiskStatus::NotFound,
      Err(e) => DiskStatus::Failed { message: e.to_string() },
    },
  }
}
