//! Items command integration tests.

use predicates::prelude::*;
use serde_json::Value;

use super::common::TestEnv;

#[test]
fn items_lists_compile_and_include() {
  let env = TestEnv::from_fixture("variant");

  env
    .slnstrip_cmd()
    .arg("items")
    .arg(env.path("engine/engine.vcxproj"))
    .assert()
    .success()
    .stdout(predicate::str::contains("ClCompile (3):"))
    .stdout(predicate::str::contains("ClInclude (2):"))
    .stdout(predicate::str::contains(r"source\render\image_gl.cpp"));
}

#[test]
fn items_json_reads_filters_files() {
  let env = TestEnv::from_fixture("variant");

  let output = env
    .slnstrip_cmd()
    .arg("items")
    .arg(env.path("engine/engine.vcxproj.filters"))
    .args(["-o", "json"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let json: Value = serde_json::from_slice(&output).unwrap();
  let compile: Vec<_> = json["compile"].as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect();
  assert_eq!(
    compile,
    vec![r"source\ai\navmesh.cpp", r"source\ai\steering.cpp", r"source\render\image_gl.cpp"]
  );
  assert_eq!(json["include"].as_array().unwrap().len(), 2);
}
