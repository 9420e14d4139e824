//! Manifest path keys.
//!
//! Manifests written on Windows use `\` as the separator while hand-written
//! removal lists often use `/`. Keys are compared after folding both to `/`.

use std::path::{Component, Path, PathBuf};

/// Fold every `\` in a manifest key to `/`.
pub fn normalize_key(key: &str) -> String {
  key.replace('\\', "/")
}

/// Whether two manifest keys name the same entry.
pub fn keys_match(a: &str, b: &str) -> bool {
  a.len() == b.len() && normalize_key(a) == normalize_key(b)
}

/// Resolve a manifest-relative path (either separator style) under `base`
/// into a native path.
pub fn resolve_relative(base: &Path, relative: &str) -> PathBuf {
  let mut path = base.to_path_buf();
  for component in relative.split(['\\', '/']).filter(|c| !c.is_empty()) {
    match component {
      "." => {}
      ".." => match path.components().next_back() {
        Some(Component::Normal(_)) => {
          path.pop();
        }
        _ => path.push(".."),
      },
      other => path.push(other),
    }
  }
  path
}

/// Whether `relative` would resolve outside the directory it is joined to:
/// a `..` climbing above the start, or a drive prefix such as `C:`.
pub fn escapes_base(relative: &str) -> bool {
  let mut depth = 0usize;
  for component in relative.split(['\\', '/']).filter(|c| !c.is_empty()) {
    match component {
      "." => {}
      ".." => match depth.checked_sub(1) {
        Some(up) => depth = up,
        None => return true,
      },
      other if other.contains(':') => return true,
      _ => depth += 1,
    }
  }
  false
}

/// Directory containing `file`, or `.` for a bare file name.
pub fn parent_dir(file: &Path) -> PathBuf {
  match file.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  }
}
