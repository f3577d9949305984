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

//! Bridges one TikTok live chat session to NDJSON on stdout.
//!
//! stdout carries nothing but records, one JSON object per line; diagnostics go to stderr.
//! Exit codes: 2 for a missing identity, 1 for connector resolution or connect failure.

use std::{io, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tiktok_bridge::{Bridge, BridgeError, RecordWriter, Registry};

#[derive(Parser, Debug)]
#[command(name = "tiktok-bridge", version, about = "Bridge a TikTok live chat to newline-delimited JSON on stdout")]
struct Args {
	/// Unique ID (@handle) of the live channel to join
	#[arg(long = "uniqueId", env = "TIKTOK_UNIQUE_ID")]
	unique_id: String
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(io::stderr)
		.init();

	let args = Args::parse();
	let unique_id = args.unique_id.trim();
	if unique_id.is_empty() {
		let e = BridgeError::MissingIdentity;
		tracing::error!("{e}");
		return ExitCode::from(e.exit_code());
	}

	let client = match Registry::builtin().resolve(unique_id) {
		Ok(client) => client,
		Err(e) => {
			tracing::error!("{e}");
			return ExitCode::from(e.exit_code());
		}
	};

	let mut bridge = Bridge::new(RecordWriter::new(io::stdout()));
	match bridge.run(client).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			tracing::error!("{e}");
			ExitCode::from(e.exit_code())
		}
	}
}
