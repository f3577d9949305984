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

use futures_util::{future::BoxFuture, stream::BoxStream};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_string_from_number;
use thiserror::Error;

use crate::{error::BridgeError, payload::ChatPayload};

pub mod replay;
pub use self::replay::{ReplayClient, ReplayFactory};

/// Reported by the connector once a session is established. Upstream reports room identifiers as
/// either strings or numbers; they are opaque to the bridge and normalized to strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
	#[serde(deserialize_with = "deserialize_string_from_number")]
	pub room_id: String
}

/// An event delivered by an established chat session.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
	/// One chat message.
	Chat(ChatPayload),
	/// The connector lost its connection. This does not end the session; the connector may recover
	/// and resume delivering events on its own.
	Disconnected
}

/// Rejection of the one connect attempt a session makes.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ConnectError {
	message: String
}

impl ConnectError {
	pub fn new(message: impl ToString) -> Self {
		ConnectError { message: message.to_string() }
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

pub type ConnectFuture = BoxFuture<'static, Result<RoomInfo, ConnectError>>;
pub type EventStream = BoxStream<'static, ClientEvent>;

/// A chat client scoped to one channel identity.
pub trait ChatClient: Send {
	/// Begin the session, handing back the connect future together with the event stream.
	///
	/// The stream exists before the connect result is awaited, so events delivered while the
	/// connect future is still pending are observed in arrival order rather than dropped.
	fn start(self: Box<Self>) -> (ConnectFuture, EventStream);
}

impl core::fmt::Debug for dyn ChatClient {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str("dyn ChatClient")
	}
}

/// One construction convention for obtaining a [`ChatClient`].
///
/// The connector has shipped under more than one packaging form, each exposing a differently-shaped
/// constructor. Each form is modelled as one factory; a factory declines when its convention is not
/// available in the current environment.
pub trait ClientFactory: Send + Sync {
	fn name(&self) -> &'static str;

	/// Construct a client for `unique_id`, or decline with `None`.
	fn create(&self, unique_id: &str) -> Option<Box<dyn ChatClient>>;
}

/// An ordered set of construction conventions, probed in registration order.
pub struct Registry {
	factories: Vec<Box<dyn ClientFactory>>
}

impl Registry {
	/// A registry holding only the built-in conventions.
	pub fn builtin() -> Self {
		Registry {
			factories: vec![Box::new(ReplayFactory)]
		}
	}

	pub fn empty() -> Self {
		Registry { factories: Vec::new() }
	}

	pub fn register(&mut self, factory: Box<dyn ClientFactory>) {
		self.factories.push(factory);
	}

	/// Probe each convention in sequence and return the first usable client.
	///
	/// Fails with [`BridgeError::NoConnector`] when no convention yields one; this is detected
	/// before any connection attempt is made.
	pub fn resolve(&self, unique_id: &str) -> Result<Box<dyn ChatClient>, BridgeError> {
		for factory in &self.factories {
			match factory.create(unique_id) {
				Some(client) => {
					tracing::debug!(convention = factory.name(), "resolved chat connector");
					return Ok(client);
				}
				None => tracing::debug!(convention = factory.name(), "connector convention unavailable")
			}
		}
		let tried = if self.factories.is_empty() {
			"none registered".to_string()
		} else {
			self.factories.iter().map(|factory| factory.name()).collect::<Vec<_>>().join(", ")
		};
		Err(BridgeError::NoConnector(tried))
	}
}
