use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tempfile::tempdir;

fn touch_frames(dir: &Path, prefix: &str, frames: impl IntoIterator<Item = u64>) {
    for frame in frames {
        File::create(dir.join(format!("{prefix}{frame:04}.exr"))).unwrap();
    }
}

#[test]
fn ls_summarises_sequences_on_disk() {
    let dir = tempdir().unwrap();
    touch_frames(dir.path(), "render_", 1..=24);
    File::create(dir.path().join("notes.txt")).unwrap();

    let pattern = dir.path().join("*").to_string_lossy().into_owned();
    let mut cmd = Command::cargo_bin("fseq").unwrap();
    cmd.args(["ls", &pattern]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("render_#.exr (1-24)"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn ls_json_reports_counts() {
    let dir = tempdir().unwrap();
    touch_frames(dir.path(), "f_", [1, 2, 3, 10]);

    let pattern = dir.path().join("f_#.exr").to_string_lossy().into_owned();
    let output = Command::cargo_bin("fseq")
        .unwrap()
        .args(["ls", "--json", &pattern])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["count"], 4);
    assert_eq!(json[0]["ranges"][0], "1-3,10");
    assert!(json[0]["template"].as_str().unwrap().ends_with("f_#.exr"));
}

#[test]
fn ls_reports_missing_sequences() {
    let dir = tempdir().unwrap();
    let pattern = dir.path().join("nothing_#.exr").to_string_lossy().into_owned();

    let mut cmd = Command::cargo_bin("fseq").unwrap();
    cmd.args(["ls", &pattern]);
    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No sequence"));
}

#[test]
fn group_reads_arguments_and_stdin() {
    let mut cmd = Command::cargo_bin("fseq").unwrap();
    cmd.args(["group", "a_02.png", "a_01.png", "a_03.png"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("a_@@.png (1-3)\n"));

    let mut cmd = Command::cargo_bin("fseq").unwrap();
    cmd.arg("group")
        .write_stdin("s1/f_1.tif\ns1/f_2.tif\n\ns2/f_1.tif\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("s@/f_@.tif (1-2; 1-2)\n"));

    let mut cmd = Command::cargo_bin("fseq").unwrap();
    cmd.args(["group", "--paths"])
        .write_stdin("s1/f_1.tif\ns1/f_2.tif\ns2/f_1.tif\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("s1/f_@.tif (1-2)\ns2/f_1.tif\n"));
}

#[test]
fn compact_and_expand() {
    let mut cmd = Command::cargo_bin("fseq").unwrap();
    cmd.args(["compact", "1", "2", "3", "5", "10", "20", "30"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("1-3,5,10-30x10\n"));

    let mut cmd = Command::cargo_bin("fseq").unwrap();
    cmd.args(["expand", "2-8x2,1"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("1\n2\n4\n6\n8\n"));
}

#[test]
fn expand_needs_a_limit_for_open_ranges() {
    let mut cmd = Command::cargo_bin("fseq").unwrap();
    cmd.args(["expand", "5-"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--limit"));

    let mut cmd = Command::cargo_bin("fseq").unwrap();
    cmd.args(["expand", "5-xx2", "--limit", "3"]);
    cmd.assert().failure();

    let mut cmd = Command::cargo_bin("fseq").unwrap();
    cmd.args(["expand", "5-x2", "--limit", "3"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("5\n7\n9\n"));
}

#[test]
fn plan_into_directory_renumbers() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    touch_frames(dir.path(), "f_", 1..=3);

    let pattern = dir.path().join("f_#.exr").to_string_lossy().into_owned();
    let mut cmd = Command::cargo_bin("fseq").unwrap();
    cmd.args(["plan", &pattern, out.to_str().unwrap(), "-d", "101-"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Move: "))
        .stdout(predicate::str::contains("f_#.exr (101-103)"))
        .stdout(predicate::str::contains("out/f_0103.exr"));

    // Nothing is moved.
    assert!(dir.path().join("f_0001.exr").exists());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn plan_json_lists_every_row() {
    let dir = tempdir().unwrap();
    touch_frames(dir.path(), "f_", 1..=4);

    let pattern = dir.path().join("f_#.exr").to_string_lossy().into_owned();
    let destination = dir.path().join("g_@@.exr").to_string_lossy().into_owned();
    let output = Command::cargo_bin("fseq")
        .unwrap()
        .args(["plan", "--json", &pattern, &destination, "-s", "2-3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[0]["source"].as_str().unwrap().ends_with("f_0002.exr"));
    assert!(rows[1]["destination"].as_str().unwrap().ends_with("g_03.exr"));
}

#[test]
fn plan_rejects_bad_destinations() {
    let dir = tempdir().unwrap();
    touch_frames(dir.path(), "f_", 1..=3);

    let pattern = dir.path().join("f_#.exr").to_string_lossy().into_owned();
    let destination = dir.path().join("g_#_#_#_#_#_#_#_#.exr").to_string_lossy().into_owned();
    let mut cmd = Command::cargo_bin("fseq").unwrap();
    cmd.args(["plan", &pattern, &destination]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("too many"));
}

#[test]
fn plan_numbers_several_sequences_consecutively() {
    let dir = tempdir().unwrap();
    touch_frames(dir.path(), "a_", 1..=2);
    touch_frames(dir.path(), "b_", 1..=2);

    let pattern = dir.path().join("*").to_string_lossy().into_owned();
    let destination = dir.path().join("out_#.exr").to_string_lossy().into_owned();
    let output = Command::cargo_bin("fseq")
        .unwrap()
        .args(["plan", "--json", &pattern, &destination, "-d", "1-"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let destinations: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["destination"].as_str().unwrap())
        .collect();
    assert_eq!(destinations.len(), 4);
    for (row, frame) in destinations.iter().zip(1..) {
        assert!(row.ends_with(&format!("out_{frame:04}.exr")), "{row}");
    }
}
