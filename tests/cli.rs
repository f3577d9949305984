// Copyright 2025 pyke.io
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Process-level checks of the shipped binary: exit codes, channel discipline, and a full replay
//! session driven through the real CLI surface.

use std::{env, fs, path::PathBuf, process::Command};

use anyhow::Result;
use tiktok_bridge::Record;

fn bridge() -> Command {
	let mut cmd = Command::new(env!("CARGO_BIN_EXE_tiktok-bridge"));
	cmd.env_remove("TIKTOK_UNIQUE_ID").env_remove("TIKTOK_BRIDGE_REPLAY");
	cmd
}

/// Replay script written to a temp path, removed on drop.
struct Script {
	path: PathBuf
}

impl Script {
	fn new(name: &str, contents: &str) -> Result<Self> {
		let path = env::temp_dir().join(format!("tiktok-bridge-{name}-{}.ndjson", std::process::id()));
		fs::write(&path, contents)?;
		Ok(Script { path })
	}
}

impl Drop for Script {
	fn drop(&mut self) {
		let _ = fs::remove_file(&self.path);
	}
}

#[test]
fn missing_identity_exits_with_the_configuration_code() -> Result<()> {
	let output = bridge().output()?;
	assert_eq!(output.status.code(), Some(2));
	assert!(output.stdout.is_empty());
	Ok(())
}

#[test]
fn whitespace_identity_exits_with_the_configuration_code() -> Result<()> {
	let output = bridge().args(["--uniqueId", "   "]).output()?;
	assert_eq!(output.status.code(), Some(2));
	assert!(output.stdout.is_empty());
	Ok(())
}

#[test]
fn identity_from_the_environment_is_accepted() -> Result<()> {
	// No connector is available, so resolution fails with the dependency code - but not with the
	// configuration code, and nothing is written to the data stream.
	let output = bridge().env("TIKTOK_UNIQUE_ID", "alice").output()?;
	assert_eq!(output.status.code(), Some(1));
	assert!(output.stdout.is_empty());
	Ok(())
}

#[test]
fn the_flag_takes_precedence_over_the_environment() -> Result<()> {
	// The env var alone would be a configuration error (exit 2); the flag's valid identity wins,
	// so the run gets as far as connector resolution (exit 1).
	let output = bridge().env("TIKTOK_UNIQUE_ID", "   ").args(["--uniqueId", "alice"]).output()?;
	assert_eq!(output.status.code(), Some(1));
	assert!(output.stdout.is_empty());
	Ok(())
}

#[test]
fn replayed_session_streams_the_documented_lines() -> Result<()> {
	let script = Script::new(
		"e2e",
		concat!(
			r#"{"connect":{"roomId":"123"}}"#,
			"\n",
			r#"{"chat":{"comment":"hi","uniqueId":"bob","nickname":"Bob"}}"#,
			"\n",
			r#"{"disconnected":{}}"#,
			"\n"
		)
	)?;
	let output = bridge().args(["--uniqueId", "alice"]).env("TIKTOK_BRIDGE_REPLAY", &script.path).output()?;
	assert_eq!(output.status.code(), Some(0));

	let stdout = String::from_utf8(output.stdout)?;
	let lines: Vec<&str> = stdout.lines().collect();
	assert_eq!(lines.len(), 3);
	assert_eq!(lines[0], r#"{"type":"status","status":"connected","roomId":"123"}"#);
	assert_eq!(lines[2], r#"{"type":"status","status":"disconnected"}"#);

	let mut raw = lines[1].as_bytes().to_vec();
	let Record::Comment { comment, user, timestamp, .. } = simd_json::from_slice(&mut raw)? else {
		panic!("expected a comment record, got {}", lines[1]);
	};
	assert_eq!(comment, "hi");
	assert_eq!(user.unique_id.as_deref(), Some("bob"));
	assert_eq!(user.nickname.as_deref(), Some("Bob"));
	assert!(timestamp > 0);
	Ok(())
}

#[test]
fn connect_rejection_exits_nonzero_after_one_error_record() -> Result<()> {
	let script = Script::new("rejected", r#"{"connect":{"error":"user is offline"}}"#)?;
	let output = bridge().args(["--uniqueId", "alice"]).env("TIKTOK_BRIDGE_REPLAY", &script.path).output()?;
	assert_eq!(output.status.code(), Some(1));

	let stdout = String::from_utf8(output.stdout)?;
	let lines: Vec<&str> = stdout.lines().collect();
	assert_eq!(lines.len(), 1);
	assert!(lines[0].contains(r#""status":"error""#));
	assert!(lines[0].contains("user is offline"));
	Ok(())
}

#[test]
fn unusable_replay_script_falls_through_to_the_dependency_error() -> Result<()> {
	let script = Script::new("broken", "not json at all")?;
	let output = bridge().args(["--uniqueId", "alice"]).env("TIKTOK_BRIDGE_REPLAY", &script.path).output()?;
	assert_eq!(output.status.code(), Some(1));
	assert!(output.stdout.is_empty());
	Ok(())
}
