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

use std::io::Write;

use futures_util::StreamExt;

use crate::{
	connector::{ChatClient, ClientEvent},
	error::BridgeError,
	record::{Record, RecordWriter}
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Initializing,
	Streaming,
	Terminated
}

/// Drives one chat session, translating connector events into records on the output stream.
///
/// A bridge owns exactly one session. It makes one connect attempt: on success it streams until
/// the connector's event stream ends, surviving disconnect events along the way; on rejection it
/// emits one error status record and bails. Reconnect policy belongs to whatever supervises the
/// process, not here.
pub struct Bridge<W: Write> {
	out: RecordWriter<W>,
	state: State
}

impl<W: Write> Bridge<W> {
	pub fn new(out: RecordWriter<W>) -> Self {
		Bridge {
			out,
			state: State::Initializing
		}
	}

	/// Run the session to completion.
	///
	/// Returns `Err` only when the connect attempt is rejected; the error status record has
	/// already been emitted by then. Returns `Ok` once the event stream ends - a live connector's
	/// stream never ends on its own, so for live sessions this runs until the process is killed.
	pub async fn run(&mut self, client: Box<dyn ChatClient>) -> Result<(), BridgeError> {
		let (mut connect, mut events) = client.start();

		// The event stream is live while the connect future is still pending; both are polled
		// together so early events come through in arrival order. `biased` keeps the connected
		// status record ahead of any event that was already waiting.
		let mut events_done = false;
		let mut connecting = true;
		while connecting {
			tokio::select! {
				biased;
				result = &mut connect => {
					connecting = false;
					match result {
						Ok(room) => {
							tracing::info!(room_id = %room.room_id, "connected");
							self.transition(State::Streaming);
							self.out.emit(&Record::connected(room.room_id));
						}
						Err(e) => {
							tracing::error!("connect failed: {e}");
							self.transition(State::Terminated);
							self.out.emit(&Record::error(&e));
							return Err(BridgeError::Connect(e));
						}
					}
				}
				event = events.next(), if !events_done => match event {
					Some(event) => self.handle(event),
					None => events_done = true
				}
			}
		}

		while !events_done {
			match events.next().await {
				Some(event) => self.handle(event),
				None => events_done = true
			}
		}
		self.transition(State::Terminated);
		Ok(())
	}

	fn handle(&mut self, event: ClientEvent) {
		match event {
			ClientEvent::Chat(payload) => self.out.emit(&payload.to_record()),
			ClientEvent::Disconnected => {
				// The session stays alive; the connector may recover on its own.
				tracing::info!("upstream disconnected");
				self.out.emit(&Record::disconnected());
			}
		}
	}

	fn transition(&mut self, next: State) {
		tracing::debug!(from = ?self.state, to = ?next, "session state");
		self.state = next;
	}

	pub fn into_writer(self) -> RecordWriter<W> {
		self.out
	}
}
