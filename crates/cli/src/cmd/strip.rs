//! Implementation of the `slnstrip strip` command.
//!
//! Removes a set of files from every project of a solution, then deletes the
//! same files from disk.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;
use tracing::info;

use slnstrip_lib::disk::{DiskOutcome, DiskStatus, delete_files};
use slnstrip_lib::profile::{StripProfile, read_file_list};
use slnstrip_lib::strip::{ProjectState, StripOptions, StripReport, strip};
use slnstrip_lib::util::path::{keys_match, parent_dir};

use crate::output::{
  OutputFormat, display_relative, format_duration, print_deleted, print_error, print_info, print_json, print_removed,
  print_stat, print_success, print_warning,
};
use crate::prompts::confirm_deletion;

#[derive(Debug, Args)]
pub struct StripArgs {
  /// Path to the solution file (taken from the profile when omitted)
  pub solution: Option<PathBuf>,

  /// File to remove, as written in the project files (repeatable)
  #[arg(short, long = "file", value_name = "PATH")]
  pub files: Vec<String>,

  /// Read files to remove from a list, one per line
  #[arg(long, value_name = "LIST")]
  pub files_from: Option<PathBuf>,

  /// Strip profile (TOML) naming the solution and the files to remove
  #[arg(short, long)]
  pub profile: Option<PathBuf>,

  /// Directory that files are deleted relative to [default: the solution's directory]
  #[arg(long, value_name = "DIR")]
  pub disk_root: Option<PathBuf>,

  /// Only edit project files; leave files on disk
  #[arg(long)]
  pub no_disk: bool,

  /// Leave .vcxproj.filters files untouched
  #[arg(long)]
  pub no_filters: bool,

  /// Show what would change without writing or deleting anything
  #[arg(long)]
  pub dry_run: bool,

  /// Number of projects to process in parallel
  #[arg(short, long, default_value_t = 1)]
  pub jobs: usize,

  /// Delete files from disk without asking for confirmation
  #[arg(long)]
  pub force: bool,
}

/// What to strip, after merging the profile with command-line arguments.
struct Plan {
  solution: PathBuf,
  disk_root: PathBuf,
  files: Vec<String>,
}

impl StripArgs {
  fn plan(&self) -> Result<Plan> {
    let profile = match &self.profile {
      Some(path) => Some(StripProfile::load(path).context("Failed to load strip profile")?),
      None => None,
    };

    let solution = match (&self.solution, &profile) {
      (Some(solution), _) => solution.clone(),
      (None, Some(profile)) => profile.solution.clone(),
      (None, None) => bail!("No solution given. Pass a .sln path or --profile."),
    };
    let solution = dunce::canonicalize(&solution).unwrap_or(solution);

    let mut files = Vec::new();
    if let Some(profile) = &profile {
      files.extend(profile.files.iter().cloned());
    }
    files.extend(self.files.iter().map(|f| f.trim().to_string()));
    if let Some(list) = &self.files_from {
      files.extend(read_file_list(list).context("Failed to read file list")?);
    }
    files.retain(|f| !f.is_empty());
    if files.is_empty() {
      bail!("No files to remove. Use --file, --files-from or --profile.");
    }

    let disk_root = match (&self.disk_root, &profile) {
      (Some(root), _) => root.clone(),
      (None, Some(profile)) if self.solution.is_none() => profile.disk_root.clone(),
      _ => parent_dir(&solution),
    };

    Ok(Plan {
      solution,
      disk_root,
      files,
    })
  }

  fn options(&self) -> StripOptions {
    StripOptions {
      dry_run: self.dry_run,
      filters: !self.no_filters,
      jobs: self.jobs.max(1),
    }
  }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
  strip: &'a StripReport,
  disk: &'a [DiskOutcome],
}

/// Execute the strip command.
///
/// - Loads the solution and every member project
/// - Removes each file from the compile and include lists
/// - Rewrites the projects that changed (and their `.filters` files)
/// - Deletes the files from disk unless `--no-disk`
///
/// Fails if any project could not be loaded or written, or any file could not
/// be deleted, after reporting everything that did succeed.
pub fn cmd_strip(args: StripArgs, verbose: bool, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let plan = args.plan()?;
  let options = args.options();
  let delete_from_disk = !args.no_disk;

  if delete_from_disk && !args.dry_run && !confirm_deletion(plan.files.len(), &plan.disk_root, args.force)? {
    print_info("Aborted, nothing changed.");
    return Ok(());
  }

  let report = strip(&plan.solution, &plan.files, &options).context("Strip failed")?;

  let disk = if delete_from_disk {
    delete_files(&plan.disk_root, &plan.files, args.dry_run)
  } else {
    Vec::new()
  };

  let disk_failures = disk.iter().filter(|o| o.is_failure()).count();
  let project_failures = report.failed_projects().count();

  if output.is_json() {
    print_json(&JsonOutput {
      strip: &report,
      disk: &disk,
    })?;
  } else {
    print_text(&report, &disk, &plan, verbose);
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  info!(elapsed = ?start.elapsed(), "strip command finished");

  if project_failures + disk_failures > 0 {
    bail!(
      "Strip finished with {} project failure(s) and {} disk failure(s)",
      project_failures,
      disk_failures
    );
  }
  Ok(())
}

fn print_text(report: &StripReport, disk: &[DiskOutcome], plan: &Plan, verbose: bool) {
  let base = parent_dir(&plan.solution);

  for project in &report.projects {
    let name = display_relative(&project.manifest, &base);
    let removed: Vec<_> = report
      .outcomes_for(&project.manifest)
      .filter(|o| o.is_removed())
      .collect();

    match &project.state {
      ProjectState::LoadFailed { message } => {
        print_error(&format!("{}: {}", name, message));
        continue;
      }
      ProjectState::WriteFailed { message } => print_error(&format!("{}: {}", name, message)),
      ProjectState::Unchanged if !verbose => continue,
      _ => print_info(&format!("{} ({})", name, state_label(&project.state))),
    }

    for outcome in removed {
      print_removed(&format!("{} ({})", outcome.request, outcome.category));
    }

    match &project.filters {
      Some(ProjectState::LoadFailed { message } | ProjectState::WriteFailed { message }) => {
        print_error(&format!("{}.filters: {}", name, message))
      }
      Some(state @ (ProjectState::Written | ProjectState::WouldWrite)) if verbose => {
        print_info(&format!("{}.filters ({})", name, state_label(state)))
      }
      _ => {}
    }
  }

  if verbose {
    for file in unreferenced(report, &plan.files) {
      print_warning(&format!("{} is not referenced by any project", file));
    }
  }

  for outcome in disk {
    match &outcome.status {
      DiskStatus::Failed { message } => print_error(&format!("{}: {}", outcome.path.display(), message)),
      DiskStatus::Deleted | DiskStatus::Pending if verbose => print_deleted(&outcome.path.display().to_string()),
      _ => {}
    }
  }

  println!();
  if report.dry_run {
    print_info("Dry run - no changes made");
  } else if report.has_failures() {
    print_error("Strip completed with errors");
  } else {
    print_success("Strip complete!");
  }

  let written = report
    .projects
    .iter()
    .filter(|p| matches!(p.state, ProjectState::Written | ProjectState::WouldWrite))
    .count();
  print_stat("Entries removed", &report.removed_count().to_string());
  print_stat("Not found", &report.not_found_count().to_string());
  print_stat("Projects changed", &format!("{} of {}", written, report.projects.len()));
  print_stat("Failed projects", &report.failed_projects().count().to_string());
  if !disk.is_empty() {
    let deleted = disk
      .iter()
      .filter(|o| matches!(o.status, DiskStatus::Deleted | DiskStatus::Pending))
      .count();
    print_stat("Files deleted", &deleted.to_string());
  }
}

/// Requested files that no project entry matched, under any separator style.
fn unreferenced<'a>(report: &StripReport, files: &'a [String]) -> Vec<&'a str> {
  files
    .iter()
    .filter(|file| !report.outcomes.iter().any(|o| o.is_removed() && keys_match(&o.request, file)))
    .map(String::as_str)
    .collect()
}

fn state_label(state: &ProjectState) -> &'static str {
  match state {
    ProjectState::Unchanged => "unchanged",
    ProjectState::Written => "written",
    ProjectState::WouldWrite => "would write",
    ProjectState::LoadFailed { .. } => "load failed",
    ProjectState::WriteFailed { .. } => "write failed",
  }
}
