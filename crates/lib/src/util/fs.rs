//! Scoped file replacement.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::trace;

use super::path::parent_dir;

/// Replace the contents of `path` with `content` atomically.
///
/// The content is written to a temporary file in the same directory and then
/// renamed over `path`, so readers see either the old or the new file, never
/// a truncated one. If anything fails before the rename, the temporary file is
/// dropped (and deleted) and `path` is left untouched.
///
/// When `path` already exists its permissions are carried over to the new
/// file.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
  let dir = parent_dir(path);
  let mut temp = NamedTempFile::new_in(&dir)?;
  trace!(temp = %temp.path().display(), target = %path.display(), "writing temporary file");

  temp.write_all(content)?;
  temp.as_file().sync_all()?;

  if let Ok(metadata) = fs::metadata(path) {
    fs::set_permissions(temp.path(), metadata.permissions())?;
  }

  temp.persist(path).map_err(|e| e.error)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn write_atomic_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("engine.vcxproj");
    fs::write(&path, "old content that is longer than the new one").unwrap();

    write_atomic(&path, b"new").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "new");
  }

  #[test]
  fn write_atomic_creates_missing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("fresh.vcxproj");

    write_atomic(&path, b"<Project />").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "<Project />");
  }

  #[test]
  fn write_atomic_leaves_no_temporary_files() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("engine.vcxproj");
    fs::write(&path, "a").unwrap();

    write_atomic(&path, b"b").unwrap();

    let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().flatten().collect();
    assert_eq!(entries.len(), 1);
  }

  #[test]
  fn write_atomic_fails_when_directory_missing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing").join("engine.vcxproj");

    assert!(write_atomic(&path, b"content").is_err());
    assert!(!path.exists());
  }

  #[test]
  fn write_atomic_failure_keeps_original() {
    let temp = TempDir::new().unwrap();
    // A directory cannot be replaced by a file rename.
    let path = temp.path().join("engine.vcxproj");
    fs::create_dir(&path).unwrap();
    fs::write(path.join("inner.txt"), "keep").unwrap();

    assert!(write_atomic(&path, b"content").is_err());
    assert_eq!(fs::read_to_string(path.join("inner.txt")).unwrap(), "keep");

    let leftovers: Vec<_> = fs::read_dir(temp.path()).unwrap().flatten().collect();
    assert_eq!(leftovers.len(), 1, "temporary file should be cleaned up");
  }
}
