//! Live reload for the dev server.
//!
//! ```text
//! SessionActor --Reload--> WsActor --JSON--> Browser (hotreload.js)
//! ```
//!
//! - `message` - hot reload message types
//! - `server` - WebSocket acceptor feeding clients to the WsActor

pub mod message;
pub mod server;
