#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;
use threedo_testkit::{triangle_model, two_child_model};

#[test]
fn info_json_reports_counts_and_textures() {
	let (_dir, path) = fixture("tank.3do", &two_child_model());
	let json = run_json(&["info", &path_arg(&path), "--json"]);

	assert_eq!(json["root"], "base");
	assert_eq!(json["file_size"], 270);
	assert_eq!(json["objects"], 3);
	assert_eq!(json["vertices"], 2);
	assert_eq!(json["primitives"], 2);
	assert_eq!(json["textures"], serde_json::json!(["steel"]));
}

#[test]
fn tree_json_nests_children_with_offsets() {
	let (_dir, path) = fixture("tank.3do", &two_child_model());
	let json = run_json(&["tree", &path_arg(&path), "--json"]);

	assert_eq!(json["name"], "base");
	let children = json["children"].as_array().expect("children array");
	assert_eq!(children.len(), 2);
	assert_eq!(children[0]["name"], "left");
	assert_eq!(children[0]["offset"], serde_json::json!([5, 5, 5]));
	assert_eq!(children[1]["textures"], serde_json::json!(["steel"]));
}

#[test]
fn map_json_groups_cover_the_file() {
	let (_dir, path) = fixture("triangle.3do", &triangle_model());
	let json = run_json(&["map", &path_arg(&path), "--json", "--data"]);

	let groups = json["groups"].as_array().expect("groups array");
	let kinds: Vec<_> = groups.iter().map(|group| group["kind"].as_str().expect("kind label")).collect();
	assert_eq!(kinds, vec!["object", "vertexes", "primitive", "vindices", "texture-name", "object-name"]);
	assert_eq!(groups[0]["start"], 0);
	assert_eq!(groups[5]["end"], 136);

	assert_eq!(groups[3]["areas"][0]["data"]["indices"], serde_json::json!([0, 1, 2]));
	assert_eq!(groups[4]["areas"][0]["data"]["text"], "wall");
	let fields = groups[0]["areas"][0]["data"]["fields"].as_array().expect("object fields");
	assert_eq!(fields.len(), 13);
	assert_eq!(fields[0]["name"], "VersionSignature");
}

#[test]
fn map_reports_trailing_bytes_as_gap() {
	let mut bytes = triangle_model();
	bytes.extend_from_slice(&[0xEE; 4]);
	let (_dir, path) = fixture("padded.3do", &bytes);
	let json = run_json(&["map", &path_arg(&path), "--json"]);

	let last = json["groups"].as_array().and_then(|groups| groups.last()).expect("at least one group");
	assert_eq!(last["kind"], "unknown-gap");
	assert_eq!(last["start"], 136);
	assert_eq!(last["len"], 4);
}

#[test]
fn build_writes_decodable_output() {
	let (dir, path) = fixture("tank.3do", &two_child_model());
	let out = dir.path().join("flat.3do");
	let json = run_json(&["build", &path_arg(&path), "--out", &path_arg(&out), "--mode", "unifusion", "--json"]);

	assert_eq!(json["mode"], "unifusion");
	assert_eq!(json["content_type"], "application/x-binary");
	let written = fs::read(&out).expect("output written");
	assert_eq!(json["bytes"], written.len());

	let info = run_json(&["info", &path_arg(&out), "--json"]);
	assert_eq!(info["objects"], 1);
	assert_eq!(info["vertices"], 2);
}

#[test]
fn decode_failure_exits_with_error_message() {
	let (_dir, path) = fixture("empty.3do", &[]);
	let output = run(&["info", &path_arg(&path)]);

	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("error: expected exactly one root object"), "unexpected stderr: {stderr}");
}

fn fixture(name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
	let dir = tempfile::tempdir().expect("temp dir");
	let path = dir.path().join(name);
	fs::write(&path, bytes).expect("fixture written");
	(dir, path)
}

fn path_arg(path: &Path) -> String {
	path.display().to_string()
}

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_threedo")).args(args).output().expect("command executes")
}

fn run_json(args: &[&str]) -> Value {
	let output = run(args);
	assert!(
		output.status.success(),
		"threedo command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}
