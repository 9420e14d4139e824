//! Solution manifest model.
//!
//! Reads the `Project(...)` entries of a `.sln` file:
//!
//! ```text
//! Project("{8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942}") = "engine", "engine\engine.vcxproj", "{0C5F...}"
//! EndProject
//! ```
//!
//! All other lines are ignored. The model is read-only.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::manifest::ManifestError;
use crate::util::path::{parent_dir, resolve_relative};

/// Project type identifier Visual Studio uses for solution folders.
pub const SOLUTION_FOLDER_TYPE: &str = "2150E333-8FDC-42A3-9474-1A3956D46DE8";

/// One `Project(...)` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectEntry {
  /// Project type identifier (first quoted value).
  pub type_id: String,
  /// Display name.
  pub name: String,
  /// Manifest path relative to the solution directory, as written.
  pub path: String,
  /// Unique project identifier.
  pub id: String,
}

impl ProjectEntry {
  /// Solution folders group projects in the IDE and have no manifest.
  pub fn is_solution_folder(&self) -> bool {
    self
      .type_id
      .trim_matches(|c| c == '{' || c == '}')
      .eq_ignore_ascii_case(SOLUTION_FOLDER_TYPE)
  }
}

#[derive(Debug, Clone)]
pub struct SolutionManifest {
  path: PathBuf,
  projects: Vec<ProjectEntry>,
}

impl SolutionManifest {
  /// Read and parse the solution at `path`.
  pub fn load(path: impl Into<PathBuf>) -> Result<Self, ManifestError> {
    let path = path.into();
    let text = fs::read_to_string(&path).map_err(|e| ManifestError::from_read(path.clone(), e))?;
    Self::from_text(path, &text)
  }

  /// Parse already-read solution text.
  ///
  /// Unrecognized `Project(` lines are skipped with a warning. A project block
  /// that is not closed by `EndProject` before the next one starts (or before
  /// end of input) is an error.
  pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Result<Self, ManifestError> {
    let path = path.into();
    let mut projects = Vec::new();
    let mut open_block: Option<usize> = None;

    for (index, line) in text.lines().enumerate() {
      let line_no = index + 1;
      let trimmed = line.trim_start_matches('\u{feff}').trim();

      if trimmed.starts_with("Project(") {
        if let Some(open_line) = open_block {
          return Err(unclosed_block(&path, open_line));
        }
        open_block = Some(line_no);
        match parse_project_line(trimmed) {
          Some(entry) => projects.push(entry),
          None => warn!(path = %path.display(), line = line_no, "skipping unrecognized project line"),
        }
      } else if trimmed == "EndProject" {
        if open_block.take().is_none() {
          warn!(path = %path.display(), line = line_no, "EndProject without a matching Project");
        }
      }
    }

    if let Some(open_line) = open_block {
      return Err(unclosed_block(&path, open_line));
    }

    debug!(path = %path.display(), projects = projects.len(), "loaded solution manifest");
    Ok(Self { path, projects })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Directory that project paths are relative to.
  pub fn dir(&self) -> PathBuf {
    parent_dir(&self.path)
  }

  /// Every declared entry, solution folders included, in declaration order.
  pub fn projects(&self) -> &[ProjectEntry] {
    &self.projects
  }

  /// Member project manifest paths resolved against the solution directory.
  ///
  /// Declaration order is kept and duplicates are preserved. Solution folders
  /// are left out.
  pub fn project_paths(&self) -> Vec<PathBuf> {
    let dir = self.dir();
    self
      .projects
      .iter()
      .filter(|entry| {
        if entry.is_solution_folder() {
          debug!(name = %entry.name, "skipping solution folder");
          return false;
        }
        true
      })
      .map(|entry| resolve_relative(&dir, &entry.path))
      .collect()
  }
}

fn unclosed_block(path: &Path, line: usize) -> ManifestError {
  ManifestError::InvalidSolution {
    path: path.to_path_buf(),
    line,
    message: "Project is not closed by EndProject".to_string(),
  }
}

/// Parse `Project("{TYPE}") = "Name", "Path", "{ID}"`.
fn parse_project_line(line: &str) -> Option<ProjectEntry> {
  let rest = line.strip_prefix("Project(")?;
  let (type_part, values) = rest.split_once(')')?;
  let values = values.trim_start().strip_prefix('=')?;

  let fields: Vec<&str> = values.split(',').map(str::trim).collect();
  let [name, path, id] = fields.as_slice() else {
    return None;
  };

  Some(ProjectEntry {
    type_id: unquote(type_part.trim())?.to_string(),
    name: unquote(name)?.to_string(),
    path: unquote(path)?.to_string(),
    id: unquote(id)?.to_string(),
  })
}

fn unquote(value: &str) -> Option<&str> {
  value.strip_prefix('"')?.strip_suffix('"')
}
