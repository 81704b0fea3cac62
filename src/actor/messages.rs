//! Actor message definitions.
//!
//! ```text
//! FsActor --FileChanged--> SessionActor --Reload--> WsActor
//! ```

use std::net::TcpStream;
use std::path::PathBuf;

use tokio::sync::oneshot;

use crate::session::FileEvent;

// =============================================================================
// SessionActor Messages
// =============================================================================

/// Messages to the Session Actor
#[derive(Debug)]
pub enum SessionMsg {
    /// Debounced file events, in path order
    FileChanged(Vec<(PathBuf, FileEvent)>),
    /// Resolve and load an importable module id
    LoadModule {
        id: String,
        reply: oneshot::Sender<Option<String>>,
    },
    /// Run the HTML transform over an entry page
    TransformHtml {
        html: String,
        reply: oneshot::Sender<String>,
    },
    /// Run the source transform; `None` means "serve unchanged"
    Transform {
        code: String,
        id: String,
        reply: oneshot::Sender<Option<String>>,
    },
    /// Shutdown
    Shutdown,
}

// =============================================================================
// WsActor Messages
// =============================================================================

/// Messages to WebSocket Actor
#[derive(Debug)]
pub enum WsMsg {
    /// Reload every connected page
    Reload { reason: String },
    /// Add client
    AddClient(TcpStream),
    /// Shutdown
    Shutdown,
}
