use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::fs::FsActor;
use crate::actor::messages::{SessionMsg, WsMsg};
use crate::actor::session::SessionActor;
use crate::actor::ws::WsActor;

/// Poll interval for the shutdown signal.
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Grace period for actors to drain after shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Run all actors concurrently until shutdown.
pub(super) async fn run_actors(
    fs: Option<FsActor>,
    session: SessionActor,
    ws: Option<WsActor>,
    session_tx: mpsc::Sender<SessionMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let session_handle = tokio::spawn(session.run());
    let fs_handle = fs.map(|fs| tokio::spawn(fs.run()));
    let ws_handle = ws.map(|ws| tokio::spawn(ws.run()));

    loop {
        let signalled = shutdown_rx.as_ref().is_some_and(|rx| rx.try_recv().is_ok());
        if signalled || crate::core::is_shutdown() {
            crate::debug!("actor"; "shutdown signal received");
            break;
        }
        tokio::time::sleep(SHUTDOWN_POLL).await;
    }

    let _ = session_tx.send(SessionMsg::Shutdown).await;
    let _ = tokio::time::timeout(SHUTDOWN_GRACE, session_handle).await;

    if let Some(handle) = ws_handle {
        let _ = ws_tx.send(WsMsg::Shutdown).await;
        let _ = tokio::time::timeout(SHUTDOWN_GRACE, handle).await;
    }
    if let Some(handle) = fs_handle {
        handle.abort();
    }
}
