//! Project manifest model.
//!
//! A [`ProjectManifest`] holds the element sequence of one `.vcxproj` (or
//! `.vcxproj.filters`) file and exposes its compile and include lists. Removals
//! drop whole elements; everything else is written back exactly as it was
//! read.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::grammar::{self, Element, ItemKind};
use crate::manifest::ManifestError;
use crate::util::fs::write_atomic;
use crate::util::path::{keys_match, normalize_key};

/// Extension appended to a project path to find its filters file.
const FILTERS_SUFFIX: &str = ".filters";

/// One parsed project manifest.
#[derive(Debug, Clone)]
pub struct ProjectManifest {
  path: PathBuf,
  elements: Vec<Element>,
  modified: bool,
}

impl ProjectManifest {
  /// Read and parse the manifest at `path`.
  pub fn load(path: impl Into<PathBuf>) -> Result<Self, ManifestError> {
    let path = path.into();
    let text = fs::read_to_string(&path).map_err(|e| ManifestError::from_read(path.clone(), e))?;
    Self::from_text(path, &text)
  }

  /// Parse already-read manifest text. `path` is where [`write`](Self::write)
  /// will put it.
  pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Result<Self, ManifestError> {
    let path = path.into();
    let elements = grammar::parse(text).map_err(|source| ManifestError::Parse {
      path: path.clone(),
      source,
    })?;

    let manifest = Self {
      path,
      elements,
      modified: false,
    };
    manifest.warn_duplicates();
    debug!(
      path = %manifest.path.display(),
      compile = manifest.compile_items().len(),
      include = manifest.include_items().len(),
      "loaded project manifest"
    );
    Ok(manifest)
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn elements(&self) -> &[Element] {
    &self.elements
  }

  /// Keys of every item of `kind`, in declaration order.
  pub fn items(&self, kind: ItemKind) -> Vec<&str> {
    self
      .elements
      .iter()
      .filter_map(|element| match element {
        Element::Item { kind: k, key, .. } if *k == kind => Some(key.as_str()),
        _ => None,
      })
      .collect()
  }

  pub fn compile_items(&self) -> Vec<&str> {
    self.items(ItemKind::Compile)
  }

  pub fn include_items(&self) -> Vec<&str> {
    self.items(ItemKind::Include)
  }

  /// Whether an item of `kind` with this key exists (separator-insensitive).
  pub fn contains(&self, kind: ItemKind, key: &str) -> bool {
    self.position(kind, key).is_some()
  }

  /// Remove the first item of `kind` whose key matches `key`.
  ///
  /// Returns `true` if an item was removed. A missing key is not an error.
  pub fn remove_item(&mut self, kind: ItemKind, key: &str) -> bool {
    match self.position(kind, key) {
      Some(index) => {
        self.elements.remove(index);
        self.modified = true;
        debug!(path = %self.path.display(), %kind, key, "removed item");
        true
      }
      None => false,
    }
  }

  pub fn remove_compile_item(&mut self, key: &str) -> bool {
    self.remove_item(ItemKind::Compile, key)
  }

  pub fn remove_include_item(&mut self, key: &str) -> bool {
    self.remove_item(ItemKind::Include, key)
  }

  /// Whether any removal happened since this manifest was loaded.
  pub fn is_modified(&self) -> bool {
    self.modified
  }

  /// Serialize the current elements.
  pub fn to_text(&self) -> String {
    grammar::serialize(&self.elements)
  }

  /// Write the manifest back to the path it was loaded from.
  pub fn write(&self) -> Result<(), ManifestError> {
    self.write_to(&self.path)
  }

  /// Write the manifest to `path` with a scoped atomic replace.
  pub fn write_to(&self, path: &Path) -> Result<(), ManifestError> {
    write_atomic(path, self.to_text().as_bytes()).map_err(|source| ManifestError::Write {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "wrote project manifest");
    Ok(())
  }

  fn position(&self, kind: ItemKind, key: &str) -> Option<usize> {
    self.elements.iter().position(|element| match element {
      Element::Item { kind: k, key: existing, .. } => *k == kind && keys_match(existing, key),
      _ => false,
    })
  }

  fn warn_duplicates(&self) {
    for kind in ItemKind::ALL {
      let mut seen = HashSet::new();
      for key in self.items(kind) {
        if !seen.insert(normalize_key(key)) {
          warn!(path = %self.path.display(), %kind, key, "duplicate item key");
        }
      }
    }
  }
}

/// Path of the `.filters` file that accompanies a project manifest.
pub fn filters_path(project: &Path) -> PathBuf {
  let mut name = OsString::from(project.as_os_str());
  name.push(FILTERS_SUFFIX);
  PathBuf::from(name)
}
