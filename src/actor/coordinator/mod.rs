//! Actor Coordinator - wires up the serve-mode actor system.
//!
//! - creates communication channels
//! - starts the WebSocket acceptor when live reload is on
//! - runs the actors until shutdown

mod runtime;

use std::path::PathBuf;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::{SessionMsg, WsMsg};
use super::session::{SessionActor, SessionHandle};
use super::ws::WsActor;
use crate::session::SpriteSession;

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    session: SpriteSession,
    session_tx: mpsc::Sender<SessionMsg>,
    session_rx: mpsc::Receiver<SessionMsg>,
    root: PathBuf,
    watch_paths: Vec<PathBuf>,
    ws_port: Option<u16>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// Take ownership of a ready session; the returned handle talks to it
    /// once [`Coordinator::run`] is running.
    pub fn new(session: SpriteSession, root: PathBuf) -> (Self, SessionHandle) {
        let (session_tx, session_rx) = mpsc::channel(CHANNEL_BUFFER);
        let handle = SessionHandle::new(session_tx.clone());
        let coordinator = Self {
            session,
            session_tx,
            session_rx,
            root,
            watch_paths: Vec::new(),
            ws_port: None,
            shutdown_rx: None,
        };
        (coordinator, handle)
    }

    /// Enable the file watcher on these roots.
    pub fn with_watch_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.watch_paths = paths;
        self
    }

    /// Enable live reload on this base port.
    pub fn with_ws_port(mut self, port: u16) -> Self {
        self.ws_port = Some(port);
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(self) -> Result<()> {
        let Self {
            session,
            session_tx,
            session_rx,
            root,
            watch_paths,
            ws_port,
            shutdown_rx,
        } = self;

        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);

        let ws_actor = match ws_port {
            Some(port) => match crate::reload::server::start_ws_server_with_channel(port, ws_tx.clone()) {
                Ok(actual_port) => {
                    crate::cli::serve::set_actual_ws_port(actual_port);
                    crate::debug!("ws"; "ws://localhost:{}", actual_port);
                    Some(WsActor::new(ws_rx))
                }
                Err(e) => {
                    crate::log!("serve"; "live reload disabled: {}", e);
                    None
                }
            },
            None => None,
        };

        let fs_actor = if watch_paths.is_empty() {
            None
        } else {
            let actor = FsActor::new(watch_paths, session_tx.clone())
                .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;
            Some(actor)
        };

        let reload_tx = ws_actor.as_ref().map(|_| ws_tx.clone());
        let session_actor = SessionActor::new(session_rx, session, reload_tx, root);

        crate::debug!("actor"; "start");
        runtime::run_actors(
            fs_actor,
            session_actor,
            ws_actor,
            session_tx,
            ws_tx,
            shutdown_rx,
        )
        .await;
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}
