//! Terminal output for slnstrip.
//!
//! Status lines go to stdout, problems to stderr. Colors are applied only when
//! the target stream supports them, so piped and JSON output stays plain.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// Line markers.
pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  /// An entry dropped from a project manifest.
  pub const ENTRY_REMOVED: &str = "-";
  /// A file deleted (or about to be) from disk.
  pub const FILE_DELETED: &str = "✂";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

/// `path` relative to `base` when it lies underneath it, otherwise as given.
pub fn display_relative(path: &Path, base: &Path) -> String {
  path.strip_prefix(base).unwrap_or(path).display().to_string()
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

/// One project entry that a strip run dropped.
pub fn print_removed(entry: &str) {
  println!(
    "  {} {}",
    symbols::ENTRY_REMOVED.if_supports_color(Stream::Stdout, |s| s.red()),
    entry
  );
}

/// One file deleted from disk.
pub fn print_deleted(path: &str) {
  println!(
    "  {} {}",
    symbols::FILE_DELETED.if_supports_color(Stream::Stdout, |s| s.magenta()),
    path.if_supports_color(Stream::Stdout, |s| s.dimmed())
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
