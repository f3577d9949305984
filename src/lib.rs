pub mod bridge;
pub mod connector;
pub mod error;
pub mod payload;
pub mod record;

pub use self::bridge::Bridge;
pub use self::connector::{ChatClient, ClientEvent, ClientFactory, ConnectError, Registry, RoomInfo};
pub use self::error::BridgeError;
pub use self::payload::ChatPayload;
pub use self::record::{Record, RecordWriter, Status, User};
