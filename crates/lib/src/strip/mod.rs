//! Removing files from every project of a solution.
//!
//! [`strip`] loads a solution, evaluates each removal request against the
//! compile and include lists of every member project, and rewrites the
//! projects that changed:
//!
//! - A solution that cannot be loaded aborts the run before anything changes.
//! - A project that cannot be loaded reports not-found for every request and
//!   the run continues with the next project.
//! - A project is written only if at least one entry was removed from it.
//! - A failed write affects only that project, whose file stays unchanged.

mod types;

pub use types::*;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::grammar::ItemKind;
use crate::manifest::ManifestError;
use crate::project::{ProjectManifest, filters_path};
use crate::solution::SolutionManifest;
use crate::util::path::normalize_key;

/// Remove `requests` from every project of the solution at `solution_path`.
///
/// Requests are evaluated in the order given; a request repeated with a
/// different separator style is evaluated once.
pub fn strip(solution_path: &Path, requests: &[String], options: &StripOptions) -> Result<StripReport, StripError> {
  let solution = SolutionManifest::load(solution_path)?;
  let requests = dedup_requests(requests);
  let project_paths = solution.project_paths();

  info!(
    solution = %solution_path.display(),
    projects = project_paths.len(),
    requests = requests.len(),
    dry_run = options.dry_run,
    "stripping solution"
  );

  let results: Vec<(Vec<OutcomeRecord>, ProjectReport)> = if options.jobs > 1 && project_paths.len() > 1 {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(options.jobs).build()?;
    let groups = group_by_path(&project_paths);
    let mut indexed: Vec<(usize, (Vec<OutcomeRecord>, ProjectReport))> = pool.install(|| {
      groups
        .par_iter()
        .flat_map_iter(|indices| {
          indices
            .iter()
            .map(|&index| (index, strip_project(&project_paths[index], &requests, options)))
            .collect::<Vec<_>>()
        })
        .collect()
    });
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, result)| result).collect()
  } else {
    project_paths
      .iter()
      .map(|path| strip_project(path, &requests, options))
      .collect()
  };

  let mut outcomes = Vec::with_capacity(project_paths.len() * requests.len());
  let mut projects = Vec::with_capacity(project_paths.len());
  for (project_outcomes, report) in results {
    outcomes.extend(project_outcomes);
    projects.push(report);
  }

  let report = StripReport {
    solution: solution_path.to_path_buf(),
    dry_run: options.dry_run,
    outcomes,
    projects,
  };

  info!(
    removed = report.removed_count(),
    not_found = report.not_found_count(),
    failed = report.failed_projects().count(),
    "strip complete"
  );

  Ok(report)
}

/// Apply `requests` to a single project manifest.
///
/// Never fails: load and write problems are reported in the returned
/// [`ProjectReport`].
pub fn strip_project(path: &Path, requests: &[String], options: &StripOptions) -> (Vec<OutcomeRecord>, ProjectReport) {
  let mut project = match ProjectManifest::load(path) {
    Ok(project) => project,
    Err(e) => {
      warn!(path = %path.display(), error = %e, "skipping project that failed to load");
      let outcomes = requests.iter().map(|r| OutcomeRecord::not_found(r, path)).collect();
      let report = ProjectReport {
        manifest: path.to_path_buf(),
        state: ProjectState::LoadFailed { message: e.to_string() },
        filters: None,
      };
      return (outcomes, report);
    }
  };

  let mut outcomes = Vec::with_capacity(requests.len());
  for request in requests {
    let mut matched = false;
    for kind in ItemKind::ALL {
      if project.remove_item(kind, request) {
        matched = true;
        outcomes.push(OutcomeRecord::removed(request, path, kind));
      }
    }
    if !matched {
      outcomes.push(OutcomeRecord::not_found(request, path));
    }
  }

  let state = persist(&project, options.dry_run);
  let filters = if options.filters {
    strip_filters(path, requests, options.dry_run)
  } else {
    None
  };

  let report = ProjectReport {
    manifest: path.to_path_buf(),
    state,
    filters,
  };
  (outcomes, report)
}

/// Strip the `.filters` companion of `project_path`. `None` if there is none.
fn strip_filters(project_path: &Path, requests: &[String], dry_run: bool) -> Option<ProjectState> {
  let path = filters_path(project_path);
  let mut filters = match ProjectManifest::load(&path) {
    Ok(filters) => filters,
    Err(ManifestError::NotFound(_)) => return None,
    Err(e) => {
      warn!(path = %path.display(), error = %e, "skipping filters file that failed to load");
      return Some(ProjectState::LoadFailed { message: e.to_string() });
    }
  };

  for request in requests {
    for kind in ItemKind::ALL {
      filters.remove_item(kind, request);
    }
  }

  Some(persist(&filters, dry_run))
}

fn persist(manifest: &ProjectManifest, dry_run: bool) -> ProjectState {
  if !manifest.is_modified() {
    return ProjectState::Unchanged;
  }
  if dry_run {
    return ProjectState::WouldWrite;
  }
  match manifest.write() {
    Ok(()) => ProjectState::Written,
    Err(e) => {
      error!(path = %manifest.path().display(), error = %e, "failed to write manifest");
      ProjectState::WriteFailed { message: e.to_string() }
    }
  }
}

/// Drop empty and repeated requests, keeping first occurrences in order.
/// Indices into `paths`, grouped by path. A manifest declared more than once
/// is handled by a single worker, in declaration order.
fn group_by_path(paths: &[PathBuf]) -> Vec<Vec<usize>> {
  let mut slots: HashMap<&Path, usize> = HashMap::new();
  let mut groups: Vec<Vec<usize>> = Vec::new();
  for (index, path) in paths.iter().enumerate() {
    match slots.get(path.as_path()) {
      Some(&slot) => groups[slot].push(index),
      None => {
        slots.insert(path.as_path(), groups.len());
        groups.push(vec![index]);
      }
    }
  }
  groups
}

fn dedup_requests(requests: &[String]) -> Vec<String> {
  let mut seen = HashSet::new();
  requests
    .iter()
    .filter(|r| !r.is_empty())
    .filter(|r| seen.insert(normalize_key(r)))
    .cloned()
    .collect()
}
