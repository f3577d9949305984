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

use serde::{Deserialize, Deserializer};

use crate::record::{Record, User};

/// Accepts a JSON string or number, normalizing to a string. Upstream has emitted message and room
/// identifiers as both.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		String(String),
		Number(i64)
	}

	Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
		Raw::String(s) => s,
		Raw::Number(n) => n.to_string()
	}))
}

fn nonempty(value: Option<&String>) -> Option<&str> {
	value.map(String::as_str).filter(|s| !s.is_empty())
}

/// One chat event as delivered by the connector.
///
/// The connector has shipped this event under several shapes across its versions: flat properties,
/// message fields nested under `data`, and user identity nested under `user`. Every candidate field
/// is optional here; the accessors probe the candidates in fixed precedence order and take the
/// first non-empty one, matching the truthiness semantics downstream consumers already rely on.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
	pub comment: Option<String>,
	pub text: Option<String>,
	#[serde(default, deserialize_with = "string_or_number")]
	pub msg_id: Option<String>,
	#[serde(default, deserialize_with = "string_or_number")]
	pub event_id: Option<String>,
	pub unique_id: Option<String>,
	pub nickname: Option<String>,
	pub data: Option<NestedData>,
	pub user: Option<NestedUser>
}

/// Message fields as nested by older connector versions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedData {
	pub comment: Option<String>,
	#[serde(default, deserialize_with = "string_or_number")]
	pub msg_id: Option<String>
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedUser {
	pub unique_id: Option<String>,
	pub nickname: Option<String>
}

impl ChatPayload {
	/// Message text: `comment`, then `data.comment`, then `text`. Empty when no candidate is present.
	pub fn comment(&self) -> &str {
		nonempty(self.comment.as_ref())
			.or_else(|| nonempty(self.data.as_ref().and_then(|data| data.comment.as_ref())))
			.or_else(|| nonempty(self.text.as_ref()))
			.unwrap_or("")
	}

	/// Message identifier: `msgId`, then `eventId`, then `data.msgId`.
	pub fn msg_id(&self) -> Option<&str> {
		nonempty(self.msg_id.as_ref())
			.or_else(|| nonempty(self.event_id.as_ref()))
			.or_else(|| nonempty(self.data.as_ref().and_then(|data| data.msg_id.as_ref())))
	}

	/// Sender's unique ID: `uniqueId`, then `user.uniqueId`.
	pub fn unique_id(&self) -> Option<&str> {
		nonempty(self.unique_id.as_ref()).or_else(|| nonempty(self.user.as_ref().and_then(|user| user.unique_id.as_ref())))
	}

	/// Sender's nickname: `nickname`, then `user.nickname`.
	pub fn nickname(&self) -> Option<&str> {
		nonempty(self.nickname.as_ref()).or_else(|| nonempty(self.user.as_ref().and_then(|user| user.nickname.as_ref())))
	}

	/// Normalize into a comment record, stamped with the current time.
	pub fn to_record(&self) -> Record {
		Record::comment(self.comment(), self.msg_id().map(str::to_owned), User {
			unique_id: self.unique_id().map(str::to_owned),
			nickname: self.nickname().map(str::to_owned)
		})
	}
}
