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

//! The file-replay connector convention.
//!
//! Replays a scripted session from an NDJSON file named by the [`REPLAY_ENV`] environment
//! variable: exactly one `connect` step (a room id, or an error message for a rejected connect)
//! plus any number of `chat` and `disconnected` steps, one JSON object per line:
//!
//! ```text
//! {"connect":{"roomId":"123"}}
//! {"chat":{"comment":"hi","uniqueId":"bob","nickname":"Bob"}}
//! {"disconnected":{}}
//! ```
//!
//! The factory declines when the variable is unset, so a bridge built without a live connector
//! registered fails resolution the same way the original fails when its connector package is
//! missing. Live connectors are registered by embedders ahead of this one.

use std::{
	collections::VecDeque,
	env, fs,
	path::Path,
	pin::Pin,
	task::{Context, Poll}
};

use futures_util::{future, FutureExt, Stream, StreamExt};
use pin_project_lite::pin_project;
use serde::Deserialize;
use thiserror::Error;

use super::{ChatClient, ClientEvent, ClientFactory, ConnectError, ConnectFuture, EventStream, RoomInfo};
use crate::payload::ChatPayload;

/// Environment variable naming the session script to replay.
pub const REPLAY_ENV: &str = "TIKTOK_BRIDGE_REPLAY";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum ScriptStep {
	Connect(ConnectOutcome),
	Chat(ChatPayload),
	Disconnected {}
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConnectOutcome {
	Rejected { error: String },
	Established(RoomInfo)
}

#[derive(Debug, Error)]
pub enum ReplayError {
	#[error("failed to read replay script: {0}")]
	Io(#[from] std::io::Error),
	#[error("invalid step on line {line}: {source}")]
	Parse { line: usize, source: simd_json::Error },
	#[error("script has no connect step")]
	MissingConnect,
	#[error("script has more than one connect step")]
	DuplicateConnect
}

/// A [`ChatClient`] that replays a scripted session.
pub struct ReplayClient {
	outcome: Result<RoomInfo, ConnectError>,
	events: VecDeque<ClientEvent>
}

impl ReplayClient {
	/// Parse a session script, one step per line. Blank lines are skipped.
	pub fn from_script(script: &str) -> Result<Self, ReplayError> {
		let mut connect = None;
		let mut events = VecDeque::new();
		for (i, line) in script.lines().enumerate() {
			let line = line.trim();
			if line.is_empty() {
				continue;
			}
			let mut raw = line.as_bytes().to_vec();
			let step: ScriptStep = simd_json::from_slice(&mut raw).map_err(|source| ReplayError::Parse { line: i + 1, source })?;
			match step {
				ScriptStep::Connect(_) if connect.is_some() => return Err(ReplayError::DuplicateConnect),
				ScriptStep::Connect(outcome) => connect = Some(outcome),
				ScriptStep::Chat(payload) => events.push_back(ClientEvent::Chat(payload)),
				ScriptStep::Disconnected {} => events.push_back(ClientEvent::Disconnected)
			}
		}
		let outcome = match connect.ok_or(ReplayError::MissingConnect)? {
			ConnectOutcome::Established(room) => Ok(room),
			ConnectOutcome::Rejected { error } => Err(ConnectError::new(error))
		};
		Ok(ReplayClient { outcome, events })
	}

	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
		Self::from_script(&fs::read_to_string(path)?)
	}
}

impl ChatClient for ReplayClient {
	fn start(self: Box<Self>) -> (ConnectFuture, EventStream) {
		(future::ready(self.outcome).boxed(), ReplayStream { events: self.events }.boxed())
	}
}

pin_project! {
	struct ReplayStream {
		events: VecDeque<ClientEvent>
	}
}

impl Stream for ReplayStream {
	type Item = ClientEvent;

	fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
		Poll::Ready(self.project().events.pop_front())
	}
}

/// Built-in convention replaying the session script named by [`REPLAY_ENV`].
pub struct ReplayFactory;

impl ClientFactory for ReplayFactory {
	fn name(&self) -> &'static str {
		"replay"
	}

	fn create(&self, _unique_id: &str) -> Option<Box<dyn ChatClient>> {
		let path = env::var_os(REPLAY_ENV)?;
		match ReplayClient::from_path(&path) {
			Ok(client) => Some(Box::new(client)),
			Err(e) => {
				tracing::warn!("replay script {path:?} is unusable: {e}");
				None
			}
		}
	}
}
