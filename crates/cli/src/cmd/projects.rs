//! Implementation of the `slnstrip projects` command.
//!
//! Lists the member projects of a solution with their item counts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use slnstrip_lib::project::ProjectManifest;
use slnstrip_lib::solution::SolutionManifest;

use crate::output::{OutputFormat, display_relative, print_error, print_info, print_json, print_stat, print_warning};

#[derive(Serialize)]
struct ProjectSummary {
  name: String,
  id: String,
  manifest: PathBuf,
  #[serde(skip_serializing_if = "Option::is_none")]
  compile: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  include: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  error: Option<String>,
}

pub fn cmd_projects(solution_path: &Path, output: OutputFormat) -> Result<()> {
  let solution = SolutionManifest::load(solution_path).context("Failed to load solution")?;
  let dir = solution.dir();

  let summaries: Vec<ProjectSummary> = solution
    .projects()
    .iter()
    .filter(|entry| !entry.is_solution_folder())
    .zip(solution.project_paths())
    .map(|(entry, manifest)| {
      let (compile, include, error) = match ProjectManifest::load(&manifest) {
        Ok(project) => (
          Some(project.compile_items().len()),
          Some(project.include_items().len()),
          None,
        ),
        Err(e) => (None, None, Some(e.to_string())),
      };
      ProjectSummary {
        name: entry.name.clone(),
        id: entry.id.clone(),
        manifest,
        compile,
        include,
        error,
      }
    })
    .collect();

  if output.is_json() {
    return print_json(&summaries);
  }

  if summaries.is_empty() {
    print_warning("Solution declares no projects.");
    return Ok(());
  }

  for summary in &summaries {
    println!();
    print_info(&format!("{} {}", summary.name, summary.id));
    print_stat("Manifest", &display_relative(&summary.manifest, &dir));
    match (&summary.error, summary.compile, summary.include) {
      (Some(error), _, _) => print_error(error),
      (None, Some(compile), Some(include)) => {
        print_stat("Compile items", &compile.to_string());
        print_stat("Include items", &include.to_string());
      }
      _ => {}
    }
  }

  Ok(())
}
