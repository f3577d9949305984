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

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Connection lifecycle phase reported by a status record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
	Connected,
	Disconnected,
	Error
}

/// Identity of the user a comment record originated from. Either field may be absent depending on
/// which payload shape the connector delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	#[serde(rename = "uniqueId", skip_serializing_if = "Option::is_none")]
	pub unique_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub nickname: Option<String>
}

/// One line of the bridge's output stream.
///
/// Every record serializes to a single self-contained JSON object; the stream is append-only NDJSON
/// with no relational structure between records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
	Status {
		status: Status,
		/// Present only on [`Status::Connected`]; opaque identifier reported by the connector.
		#[serde(rename = "roomId", skip_serializing_if = "Option::is_none")]
		room_id: Option<String>,
		/// Present only on [`Status::Error`].
		#[serde(skip_serializing_if = "Option::is_none")]
		message: Option<String>
	},
	Comment {
		comment: String,
		#[serde(rename = "msgId", skip_serializing_if = "Option::is_none")]
		msg_id: Option<String>,
		user: User,
		/// Milliseconds since epoch, assigned by the bridge when the record is built - not taken
		/// from the upstream event.
		timestamp: i64
	}
}

impl Record {
	pub fn connected(room_id: impl Into<String>) -> Self {
		Record::Status {
			status: Status::Connected,
			room_id: Some(room_id.into()),
			message: None
		}
	}

	pub fn disconnected() -> Self {
		Record::Status {
			status: Status::Disconnected,
			room_id: None,
			message: None
		}
	}

	pub fn error(message: impl ToString) -> Self {
		Record::Status {
			status: Status::Error,
			room_id: None,
			message: Some(message.to_string())
		}
	}

	/// Build a comment record stamped with the current time.
	pub fn comment(comment: impl Into<String>, msg_id: Option<String>, user: User) -> Self {
		Record::Comment {
			comment: comment.into(),
			msg_id,
			user,
			timestamp: Utc::now().timestamp_millis()
		}
	}
}

/// Writes records to an output stream as NDJSON, one complete JSON object per line.
///
/// Emission never fails from the caller's perspective: a record that cannot be serialized or
/// written is dropped with a diagnostic, and the session carries on.
pub struct RecordWriter<W: Write> {
	out: W
}

impl<W: Write> RecordWriter<W> {
	pub fn new(out: W) -> Self {
		RecordWriter { out }
	}

	pub fn emit(&mut self, record: &Record) {
		let line = match simd_json::to_string(record) {
			Ok(line) => line,
			Err(e) => {
				tracing::warn!("dropping record that failed to serialize: {e}");
				return;
			}
		};
		if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
			tracing::warn!("dropping record that failed to write: {e}");
		}
	}

	pub fn into_inner(self) -> W {
		self.out
	}
}

#[cfg(test)]
mod tests {
	use super::{Record, RecordWriter, Status, User};

	fn to_json(record: &Record) -> String {
		simd_json::to_string(record).unwrap()
	}

	#[test]
	fn status_records_serialize_with_only_relevant_fields() {
		assert_eq!(to_json(&Record::connected("123")), r#"{"type":"status","status":"connected","roomId":"123"}"#);
		assert_eq!(to_json(&Record::disconnected()), r#"{"type":"status","status":"disconnected"}"#);
		assert_eq!(to_json(&Record::error("no stream")), r#"{"type":"status","status":"error","message":"no stream"}"#);
	}

	#[test]
	fn comment_record_omits_absent_msg_id_and_user_fields() {
		let record = Record::Comment {
			comment: "hi".to_string(),
			msg_id: None,
			user: User {
				unique_id: Some("bob".to_string()),
				nickname: None
			},
			timestamp: 1700000000000
		};
		assert_eq!(to_json(&record), r#"{"type":"comment","comment":"hi","user":{"uniqueId":"bob"},"timestamp":1700000000000}"#);
	}

	#[test]
	fn emitted_lines_parse_back_to_the_same_record() {
		let records = [
			Record::connected("7100"),
			Record::Comment {
				comment: String::new(),
				msg_id: Some("m-1".to_string()),
				user: User::default(),
				timestamp: 42
			},
			Record::disconnected(),
			Record::error("rejected")
		];
		for record in records {
			let mut line = to_json(&record).into_bytes();
			let parsed: Record = simd_json::from_slice(&mut line).unwrap();
			assert_eq!(parsed, record);
		}
	}

	#[test]
	fn writer_emits_newline_terminated_lines_in_order() {
		let mut writer = RecordWriter::new(Vec::new());
		writer.emit(&Record::connected("1"));
		writer.emit(&Record::disconnected());
		let out = String::from_utf8(writer.into_inner()).unwrap();
		let lines: Vec<&str> = out.lines().collect();
		assert!(out.ends_with('\n'));
		assert_eq!(lines.len(), 2);
		assert!(lines[0].contains(r#""status":"connected""#));
		assert!(lines[1].contains(r#""status":"disconnected""#));
	}

	#[test]
	fn comment_constructor_stamps_the_current_time() {
		let before = chrono::Utc::now().timestamp_millis();
		let Record::Comment { timestamp, .. } = Record::comment("hi", None, User::default()) else {
			panic!("expected a comment record");
		};
		assert!(timestamp >= before);
	}

	#[test]
	fn status_enum_uses_lowercase_wire_names() {
		assert_eq!(simd_json::to_string(&Status::Error).unwrap(), r#""error""#);
	}
}
