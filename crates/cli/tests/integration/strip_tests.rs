//! Strip command integration tests.

use predicates::prelude::*;
use serde_json::Value;

use super::common::TestEnv;

const NAVMESH_CPP: &str = r"source\ai\navmesh.cpp";
const NAVMESH_HPP: &str = r"include\ai\navmesh.hpp";

#[test]
fn strip_removes_entries_and_files() {
  let env = TestEnv::from_fixture("variant");
  let engine_before = env.read("engine/engine.vcxproj");
  let game_before = env.read("game/game.vcxproj");

  env
    .slnstrip_cmd()
    .arg("strip")
    .arg(env.solution())
    .args(["--file", NAVMESH_CPP, "--file", NAVMESH_HPP, "--force"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Strip complete"))
    .stdout(predicate::str::contains("Entries removed: 3"))
    .stdout(predicate::str::contains("Not found: 1"));

  let engine_expected = engine_before
    .replace("    <ClCompile Include=\"source\\ai\\navmesh.cpp\" />\n", "")
    .replace("    <ClInclude Include=\"include\\ai\\navmesh.hpp\" />\n", "");
  assert_eq!(env.read("engine/engine.vcxproj"), engine_expected);

  let game_expected = game_before.replace("    <ClInclude Include=\"include\\ai\\navmesh.hpp\" />\n", "");
  assert_eq!(env.read("game/game.vcxproj"), game_expected);

  assert!(!env.exists("source/ai/navmesh.cpp"));
  assert!(!env.exists("include/ai/navmesh.hpp"));
  assert!(env.exists("source/ai/steering.cpp"));
}

#[test]
fn strip_removes_entries_from_filters() {
  let env = TestEnv::from_fixture("variant");

  env
    .slnstrip_cmd()
    .arg("strip")
    .arg(env.solution())
    .args(["--file", NAVMESH_CPP, "--no-disk"])
    .assert()
    .success();

  let filters = env.read("engine/engine.vcxproj.filters");
  assert!(!filters.contains("navmesh.cpp"));
  assert!(filters.contains(r#"<ClCompile Include="source\ai\steering.cpp">"#));
  assert!(filters.contains(r#"<Filter Include="ai" />"#));
}

#[test]
fn no_filters_leaves_filters_untouched() {
  let env = TestEnv::from_fixture("variant");
  let before = env.read("engine/engine.vcxproj.filters");

  env
    .slnstrip_cmd()
    .arg("strip")
    .arg(env.solution())
    .args(["--file", NAVMESH_CPP, "--no-disk", "--no-filters"])
    .assert()
    .success();

  assert_eq!(env.read("engine/engine.vcxproj.filters"), before);
  assert!(!env.read("engine/engine.vcxproj").contains("navmesh.cpp"));
}

#[test]
fn no_disk_keeps_files() {
  let env = TestEnv::from_fixture("variant");

  env
    .slnstrip_cmd()
    .arg("strip")
    .arg(env.solution())
    .args(["--file", NAVMESH_CPP, "--no-disk"])
    .write_stdin("")
    .assert()
    .success();

  assert!(env.exists("source/ai/navmesh.cpp"));
  assert!(!env.read("engine/engine.vcxproj").contains("navmesh.cpp"));
}

#[test]
fn dry_run_changes_nothing() {
  let env = TestEnv::from_fixture("variant");
  let engine_before = env.read("engine/engine.vcxproj");
  let filters_before = env.read("engine/engine.vcxproj.filters");

  env
    .slnstrip_cmd()
    .arg("strip")
    .arg(env.solution())
    .args(["--file", NAVMESH_CPP, "--dry-run", "--verbose"])
    .assert()
    .success()
    .stdout(predicate::str::contains("would write"))
    .stdout(predicate::str::contains("Dry run"));

  assert_eq!(env.read("engine/engine.vcxproj"), engine_before);
  assert_eq!(env.read("engine/engine.vcxproj.filters"), filters_before);
  assert!(env.exists("source/ai/navmesh.cpp"));
}

#[test]
fn strip_is_idempotent() {
  let env = TestEnv::from_fixture("variant");

  env
    .slnstrip_cmd()
    .arg("strip")
    .arg(env.solution())
    .args(["--file", NAVMESH_CPP, "--force"])
    .assert()
    .success();
  let engine_once = env.read("engine/engine.vcxproj");

  env
    .slnstrip_cmd()
    .arg("strip")
    .arg(env.solution())
    .args(["--file", NAVMESH_CPP, "--force"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Entries removed: 0"))
    .stdout(predicate::str::contains("Projects changed: 0 of 2"));

  assert_eq!(env.read("engine/engine.vcxproj"), engine_once);
}

#[test]
fn multi_line_item_is_removed_whole() {
  let env = TestEnv::from_fixture("variant");

  env
    .slnstrip_cmd()
    .arg("strip")
    .arg(env.solution())
    .args(["--file", r"source\render\image_gl.cpp", "--no-disk"])
    .assert()
    .success();

  let engine = env.read("engine/engine.vcxproj");
  assert!(!engine.contains("image_gl.cpp"));
  assert!(!engine.contains("ExcludedFromBuild"));
  assert!(engine.contains(r#"<ClInclude Include="include\render\image_gl.hpp" />"#));
}

#[test]
fn forward_slash_request_matches_backslash_entry() {
  let env = TestEnv::from_fixture("variant");

  env
    .slnstrip_cmd()
    .arg("strip")
    .arg(env.solution())
    .args(["--file", "source/ai/steering.cpp", "--force"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Entries removed: 2"));

  assert!(!env.read("engine/engine.vcxproj").contains("steering.cpp"));
  assert!(!env.read("game/game.vcxproj").contains("steering.cpp"));
  assert!(!env.exists("source/ai/steering.cpp"));
}

#[test]
fn strip_with_profile() {
  let env = TestEnv::from_fixture("variant");

  env
    .slnstrip_cmd()
    .arg("strip")
    .args(["--profile", "profiles/graphics.toml", "--force"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Entries removed: 2"));

  let engine = env.read("engine/engine.vcxproj");
  assert!(!engine.contains("image_gl"));
  assert!(!env.exists("source/render/image_gl.cpp"));
  assert!(!env.exists("include/render/image_gl.hpp"));
  assert!(env.exists("source/ai/navmesh.cpp"));
}

#[test]
fn strip_with_file_list() {
  let env = TestEnv::from_fixture("variant");

  env
    .slnstrip_cmd()
    .arg("strip")
    .arg(env.solution())
    .args(["--files-from", "files.txt", "--force"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Entries removed: 3"));

  assert!(!env.exists("source/ai/navmesh.cpp"));
  assert!(!env.exists("include/ai/navmesh.hpp"));
}

#[test]
fn unreferenced_file_is_still_deleted() {
  let env = TestEnv::from_fixture("variant");
  std::fs::write(env.path("source/orphan.cpp"), "// orphan\n").unwrap();

  env
    .slnstrip_cmd()
    .arg("strip")
    .arg(env.solution())
    .args(["--file", r"source\orphan.cpp", "--force", "--verbose"])
    .assert()
    .success()
    .stderr(predicate::str::contains("is not referenced by any project"));

  assert!(!env.exists("source/orphan.cpp"));
}

#[test]
fn json_output_reports_outcomes() {
  let env = TestEnv::from_fixture("variant");

  let output = env
    .slnstrip_cmd()
    .arg("strip")
    .arg(env.solution())
    .args(["--file", NAVMESH_HPP, "--no-disk", "--output", "json"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let json: Value = serde_json::from_slice(&output).unwrap();
  let outcomes = json["strip"]["outcomes"].as_array().unwrap();
  assert_eq!(outcomes.len(), 2);
  for outcome in outcomes {
    assert_eq!(outcome["request"], NAVMESH_HPP);
    assert_eq!(outcome["category"], "include");
    assert_eq!(outcome["result"], "removed");
  }

  let projects = json["strip"]["projects"].as_array().unwrap();
  assert_eq!(projects.len(), 2);
  assert_eq!(projects[0]["state"]["state"], "written");
  assert_eq!(projects[0]["filters"]["state"], "written");
  assert!(json["disk"].as_array().unwrap().is_empty());
}

#[test]
fn broken_project_is_reported_and_others_are_stripped() {
  let env = TestEnv::from_fixture("variant");
  std::fs::write(
    env.path("game/game.vcxproj"),
    "<Project>\n  <ItemGroup>\n    <ClCompile Include=\"source\\game.cpp\" />\n</Project>\n",
  )
  .unwrap();

  env
    .slnstrip_cmd()
    .arg("strip")
    .arg(env.solution())
    .args(["--file", NAVMESH_HPP, "--no-disk"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("1 project failure(s)"));

  assert!(!env.read("engine/engine.vcxproj").contains("navmesh.hpp"));
}

#[test]
fn parallel_jobs_give_same_result() {
  let sequential = TestEnv::from_fixture("variant");
  let parallel = TestEnv::from_fixture("variant");

  for (env, jobs) in [(&sequential, "1"), (&parallel, "4")] {
    env
      .slnstrip_cmd()
      .arg("strip")
      .arg(env.solution())
      .args(["--file", NAVMESH_CPP, "--file", NAVMESH_HPP, "--no-disk", "--jobs", jobs])
      .assert()
      .success();
  }

  for file in ["engine/engine.vcxproj", "engine/engine.vcxproj.filters", "game/game.vcxproj"] {
    assert_eq!(sequential.read(file), parallel.read(file));
  }
}
