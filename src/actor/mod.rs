//! Actor system for serve mode.
//!
//! Message-passing concurrency around one sprite session:
//!
//! ```text
//! FsActor ──FileChanged──► SessionActor ──Reload──► WsActor ──► Browsers
//!                               ▲
//! HTTP workers ──LoadModule / TransformHtml / Transform (oneshot reply)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - message types for inter-actor communication
//! - `fs` - file system watcher with debouncing
//! - `session` - owner of the `SpriteSession` and the module graph
//! - `ws` - WebSocket broadcast
//! - `coordinator` - wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod session;
pub mod ws;

pub use coordinator::Coordinator;
pub use session::SessionHandle;
