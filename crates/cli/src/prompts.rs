//! Interactive confirmation before files are deleted from disk.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use anyhow::{Result, bail};

/// Ask whether `count` files under `root` may be deleted.
///
/// `force` skips the question. Without a terminal to ask on, deletion is
/// refused rather than assumed.
pub fn confirm_deletion(count: usize, root: &Path, force: bool) -> Result<bool> {
  if force {
    return Ok(true);
  }

  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    bail!(
      "Refusing to delete {} file(s) without confirmation. Pass --force to delete them, or --no-disk to only edit the projects.",
      count
    );
  }

  let mut stderr = io::stderr().lock();
  write!(stderr, "Delete {} file(s) under {} once the projects are stripped? [y/N] ", count, root.display())?;
  stderr.flush()?;

  let mut answer = String::new();
  io::stdin().lock().read_line(&mut answer)?;
  Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
  matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
