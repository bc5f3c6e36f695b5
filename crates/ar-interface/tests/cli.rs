use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn scene_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../testdata/living_room.json")
}

fn bin() -> Command {
    Command::cargo_bin("ar-interface").expect("binary")
}

#[test]
fn replay_prints_events_per_frame() {
    bin()
        .args(["replay", "--scene"])
        .arg(scene_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("frame 0: 2 plane events"))
        .stdout(predicate::str::contains("frame 3: not tracking"))
        .stdout(predicate::str::contains("  removed "))
        .stdout(predicate::str::contains("planes tracked at end: 1"));
}

#[test]
fn replay_json_emits_one_record_per_frame() {
    let output = bin()
        .args(["replay", "--json", "--orientation", "landscape-left", "--scene"])
        .arg(scene_path())
        .output()
        .expect("run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(records.len(), 5);
    assert_eq!(records[0]["frame"], 0);
    assert_eq!(records[0]["plane_events"].as_array().map(Vec::len), Some(2));
    assert_eq!(records[0]["plane_events"][0]["event"], "added");
    assert_eq!(records[0]["display_transform"]["m00"], 1.0);
    assert!(records[1]["display_transform"].is_null());
    assert_eq!(records[3]["tracking"], false);
}

#[test]
fn settings_file_disables_plane_detection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = dir.path().join("settings.json");
    std::fs::write(&settings, r#"{ "enable_plane_detection": false }"#).expect("write");

    bin()
        .args(["replay", "--scene"])
        .arg(scene_path())
        .arg("--settings")
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("frame 0: 0 plane events"))
        .stdout(predicate::str::contains("planes tracked at end: 0"));
}

#[test]
fn display_transform_for_portrait() {
    let output = bin()
        .args(["display-transform", "portrait"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let t: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(t["m00"], 0.0);
    assert_eq!(t["m01"], -1.0);
    assert_eq!(t["m10"], -1.0);
}

#[test]
fn display_transform_rejects_unknown_orientation() {
    bin()
        .args(["display-transform", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sideways"));
}

#[test]
fn hit_test_at_screen_center() {
    let output = bin()
        .args(["hit-test", "--frame", "0", "--x", "540", "--y", "960", "--scene"])
        .arg(scene_path())
        .output()
        .expect("run");
    assert!(output.status.success());
    let hits: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let hits = hits.as_array().expect("array");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["kind"], "existing-plane-using-extent");
    assert!(hits[0]["plane_id"].is_string());
}

#[test]
fn hit_test_frame_out_of_range_fails() {
    bin()
        .args(["hit-test", "--frame", "9", "--x", "0", "--y", "0", "--scene"])
        .arg(scene_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("frame 9 out of range"));
}

#[test]
fn missing_scene_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.json");
    bin()
        .args(["replay", "--scene"])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.json"));
}
