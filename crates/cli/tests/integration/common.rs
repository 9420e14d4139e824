//! Shared test helpers for CLI integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Get path to a fixture directory or file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Isolated test environment.
///
/// Each test gets its own copy of a fixture tree, so stripping can rewrite
/// projects and delete files freely.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Copy the fixture directory `name` into a fresh temporary directory.
  pub fn from_fixture(name: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let source = fixture_path(name);
    for entry in WalkDir::new(&source) {
      let entry = entry.unwrap_or_else(|e| panic!("Failed to walk fixture {}: {}", name, e));
      let relative = entry.path().strip_prefix(&source).unwrap();
      let target = temp.path().join(relative);
      if entry.file_type().is_dir() {
        fs::create_dir_all(&target).unwrap();
      } else {
        fs::copy(entry.path(), &target).unwrap();
      }
    }
    Self { temp }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  /// Absolute path of a fixture file inside the environment.
  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.temp.path().join(relative_path)
  }

  pub fn solution(&self) -> PathBuf {
    self.path("bee.sln")
  }

  pub fn read(&self, relative_path: &str) -> String {
    fs::read_to_string(self.path(relative_path)).unwrap_or_else(|e| panic!("Failed to read {}: {}", relative_path, e))
  }

  pub fn exists(&self, relative_path: &str) -> bool {
    self.path(relative_path).exists()
  }

  /// Get a Command for the slnstrip binary, run from the environment root.
  pub fn slnstrip_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("slnstrip");
    cmd.current_dir(self.root());
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
