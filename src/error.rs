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

use thiserror::Error;

use crate::connector::ConnectError;

/// Exit code for a connector resolution or connect failure.
pub const EXIT_FAILURE: u8 = 1;
/// Exit code for a missing or empty channel identity, detected before any connection attempt.
pub const EXIT_CONFIG: u8 = 2;

#[derive(Debug, Error)]
pub enum BridgeError {
	/// No channel identity was supplied, or it was empty after trimming.
	#[error("missing unique ID; pass --uniqueId or set TIKTOK_UNIQUE_ID")]
	MissingIdentity,
	/// No registered connector convention yielded a usable client.
	#[error("no usable chat connector (tried: {0})")]
	NoConnector(String),
	/// The connect attempt was rejected. Emitted as an error status record before this surfaces.
	#[error("failed to connect: {0}")]
	Connect(#[from] ConnectError)
}

impl BridgeError {
	pub fn exit_code(&self) -> u8 {
		match self {
			BridgeError::MissingIdentity => EXIT_CONFIG,
			BridgeError::NoConnector(_) | BridgeError::Connect(_) => EXIT_FAILURE
		}
	}
}
