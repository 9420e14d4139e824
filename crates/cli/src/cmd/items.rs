//! Implementation of the `slnstrip items` command.

use std::path::Path;

use anyhow::{Context, Result};

use slnstrip_lib::grammar::ItemKind;
use slnstrip_lib::project::ProjectManifest;

use crate::output::{OutputFormat, print_json, symbols};

pub fn cmd_items(project_path: &Path, output: OutputFormat) -> Result<()> {
  let project = ProjectManifest::load(project_path).context("Failed to load project")?;

  if output.is_json() {
    let json = serde_json::json!({
      "manifest": project.path(),
      "compile": project.compile_items(),
      "include": project.include_items(),
    });
    return print_json(&json);
  }

  for kind in ItemKind::ALL {
    let items = project.items(kind);
    println!("{} ({}):", kind.tag(), items.len());
    for item in items {
      println!("  {} {}", symbols::INFO, item);
    }
  }

  Ok(())
}
