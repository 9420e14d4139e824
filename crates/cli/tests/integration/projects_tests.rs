//! Projects command integration tests.

use predicates::prelude::*;
use serde_json::Value;

use super::common::TestEnv;

#[test]
fn projects_lists_members_with_counts() {
  let env = TestEnv::from_fixture("variant");

  env
    .slnstrip_cmd()
    .arg("projects")
    .arg(env.solution())
    .assert()
    .success()
    .stdout(predicate::str::contains("engine"))
    .stdout(predicate::str::contains("Compile items: 3"))
    .stdout(predicate::str::contains("Include items: 2"))
    .stdout(predicate::str::contains("tools").not());
}

#[test]
fn projects_json_skips_solution_folders() {
  let env = TestEnv::from_fixture("variant");

  let output = env
    .slnstrip_cmd()
    .arg("projects")
    .arg(env.solution())
    .args(["--output", "json"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let json: Value = serde_json::from_slice(&output).unwrap();
  let projects = json.as_array().unwrap();
  let names: Vec<_> = projects.iter().map(|p| p["name"].as_str().unwrap()).collect();
  assert_eq!(names, vec!["engine", "game"]);
  assert_eq!(projects[1]["compile"], 2);
  assert_eq!(projects[1]["include"], 1);
}

#[test]
fn projects_reports_missing_project() {
  let env = TestEnv::from_fixture("variant");
  std::fs::remove_file(env.path("game/game.vcxproj")).unwrap();

  env
    .slnstrip_cmd()
    .arg("projects")
    .arg(env.solution())
    .assert()
    .success()
    .stderr(predicate::str::contains("not found"));
}
