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

use std::io;

use tiktok_bridge::{connector::ReplayClient, Bridge, RecordWriter};

const SCRIPT: &str = r#"
{"connect":{"roomId":"123"}}
{"chat":{"comment":"hi","uniqueId":"bob","nickname":"Bob"}}
{"chat":{"data":{"comment":"legacy shape"},"user":{"uniqueId":"carol"}}}
{"disconnected":{}}
"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let client = Box::new(ReplayClient::from_script(SCRIPT)?);
	let mut bridge = Bridge::new(RecordWriter::new(io::stdout()));
	bridge.run(client).await?;
	Ok(())
}
