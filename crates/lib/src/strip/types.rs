//! Types for solution stripping.
//!
//! This module defines the options, per-request outcome records and
//! per-project reports produced by [`strip`](super::strip).

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::grammar::ItemKind;
use crate::manifest::ManifestError;

/// Which list a removal request matched in a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchCategory {
  Compile,
  Include,
  None,
}

impl From<ItemKind> for MatchCategory {
  fn from(kind: ItemKind) -> Self {
    match kind {
      ItemKind::Compile => MatchCategory::Compile,
      ItemKind::Include => MatchCategory::Include,
    }
  }
}

impl std::fmt::Display for MatchCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      MatchCategory::Compile => write!(f, "compile"),
      MatchCategory::Include => write!(f, "include"),
      MatchCategory::None => write!(f, "none"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalResult {
  Removed,
  NotFound,
}

/// Result of applying one removal request to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
  /// The request as the caller supplied it.
  pub request: String,
  /// Project manifest the request was evaluated against.
  pub project: PathBuf,
  pub category: MatchCategory,
  pub result: RemovalResult,
}

impl OutcomeRecord {
  pub fn removed(request: &str, project: &Path, kind: ItemKind) -> Self {
    Self {
      request: request.to_string(),
      project: project.to_path_buf(),
      category: kind.into(),
      result: RemovalResult::Removed,
    }
  }

  pub fn not_found(request: &str, project: &Path) -> Self {
    Self {
      request: request.to_string(),
      project: project.to_path_buf(),
      category: MatchCategory::None,
      result: RemovalResult::NotFound,
    }
  }

  pub fn is_removed(&self) -> bool {
    self.result == RemovalResult::Removed
  }
}

/// What happened to a manifest file during a strip run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum ProjectState {
  /// Nothing matched; the file was not touched.
  Unchanged,
  /// At least one entry was removed and the file was rewritten.
  Written,
  /// Dry run: the file would have been rewritten.
  WouldWrite,
  /// The manifest could not be loaded; every request reports not-found.
  LoadFailed { message: String },
  /// Entries were removed in memory but the scoped write failed; the file on
  /// disk is unchanged.
  WriteFailed { message: String },
}

impl ProjectState {
  pub fn is_failure(&self) -> bool {
    matches!(self, ProjectState::LoadFailed { .. } | ProjectState::WriteFailed { .. })
  }
}

/// Per-project summary of a strip run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectReport {
  pub manifest: PathBuf,
  pub state: ProjectState,
  /// State of the accompanying `.filters` file, if one exists and filters
  /// stripping was requested.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub filters: Option<ProjectState>,
}

impl ProjectReport {
  pub fn is_failure(&self) -> bool {
    self.state.is_failure() || self.filters.as_ref().is_some_and(ProjectState::is_failure)
  }
}

/// Options for [`strip`](super::strip).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripOptions {
  /// Compute outcomes without writing any manifest.
  pub dry_run: bool,
  /// Also strip each project's `.vcxproj.filters` file.
  pub filters: bool,
  /// Number of worker threads for project processing. `1` runs inline.
  pub jobs: usize,
}

impl Default for StripOptions {
  fn default() -> Self {
    Self {
      dry_run: false,
      filters: true,
      jobs: 1,
    }
  }
}

/// Everything a strip run produced.
#[derive(Debug, Clone, Serialize)]
pub struct StripReport {
  pub solution: PathBuf,
  pub dry_run: bool,
  /// One record per (request × project) pair, two when a request matched
  /// both lists of a project. Ordered by project, then request.
  pub outcomes: Vec<OutcomeRecord>,
  pub projects: Vec<ProjectReport>,
}

impl StripReport {
  pub fn removed_count(&self) -> usize {
    self.outcomes.iter().filter(|o| o.is_removed()).count()
  }

  pub fn not_found_count(&self) -> usize {
    self.outcomes.iter().filter(|o| !o.is_removed()).count()
  }

  pub fn failed_projects(&self) -> impl Iterator<Item = &ProjectReport> {
    self.projects.iter().filter(|p| p.is_failure())
  }

  pub fn has_failures(&self) -> bool {
    self.failed_projects().next().is_some()
  }

  /// Outcomes recorded against one project.
  pub fn outcomes_for<'a>(&'a self, project: &Path) -> impl Iterator<Item = &'a OutcomeRecord> + use<'a> {
    let project = project.to_path_buf();
    self.outcomes.iter().filter(move |o| o.project == project)
  }
}

/// Errors that abort a whole strip run.
#[derive(Debug, Error)]
pub enum StripError {
  /// The solution could not be loaded; nothing was changed.
  #[error(transparent)]
  Solution(#[from] ManifestError),

  #[error("failed to start worker pool: {0}")]
  WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
