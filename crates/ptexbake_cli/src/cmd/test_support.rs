use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use ptexbake_testkit::{fixture_path as shared_fixture_path, scratch_dir as shared_scratch_dir, target_dir as workspace_target_dir};

static PTEXBAKE_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_arg(name: &str) -> String {
	shared_fixture_path(name).to_string_lossy().into_owned()
}

pub(crate) fn scratch_dir(name: &str) -> PathBuf {
	shared_scratch_dir(&format!("cli_{name}"))
}

pub(crate) fn run_ptexbake(args: &[&str]) -> Output {
	Command::new(ptexbake_bin()).args(args).output().expect("ptexbake command executes")
}

pub(crate) fn run_ptexbake_ok(args: &[&str]) -> Output {
	let output = run_ptexbake(args);
	assert!(
		output.status.success(),
		"ptexbake command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	output
}

pub(crate) fn run_ptexbake_json(args: &[&str]) -> serde_json::Value {
	let output = run_ptexbake_ok(args);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn ptexbake_bin() -> &'static PathBuf {
	PTEXBAKE_BIN.get_or_init(resolve_ptexbake_bin)
}

fn resolve_ptexbake_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_ptexbake") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "ptexbake.exe" } else { "ptexbake" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "ptexbake"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build ptexbake binary at {}", bin.display());

	bin
}
