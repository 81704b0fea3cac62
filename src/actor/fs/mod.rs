//! FileSystem Actor
//!
//! Watches the sprite's source directories and forwards debounced events to
//! the SessionActor.
//!
//! ```text
//! Watcher → Debouncer (pure timing) → SessionMsg::FileChanged
//! ```
//!
//! Filtering against include/exclude is left to the session; this actor only
//! drops editor artifacts and metadata noise.

use std::path::PathBuf;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use super::messages::SessionMsg;

// Pure timing and deduplication.
mod debouncer;
// notify → FileEvent mapping.
mod types;
// Watch root attach/re-attach lifecycle.
mod watch_roots;

#[cfg(test)]
mod tests;

use debouncer::Debouncer;
use watch_roots::WatchRoots;

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// Watch-root consistency layer (attach/re-attach root directories)
    watch_roots: WatchRoots,
    /// Channel to send messages to SessionActor
    session_tx: mpsc::Sender<SessionMsg>,
    debouncer: Debouncer,
}

impl FsActor {
    /// Create the watcher and attach every existing root immediately.
    ///
    /// Events buffer in the notify channel until [`FsActor::run`] starts.
    pub fn new(paths: Vec<PathBuf>, session_tx: mpsc::Sender<SessionMsg>) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        // Missing roots are re-attached once they appear
        let mut watch_roots = WatchRoots::new(paths);
        watch_roots.attach_existing(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            session_tx,
            debouncer: Debouncer::new(),
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let Self {
            notify_rx,
            mut watcher,
            mut watch_roots,
            session_tx,
            mut debouncer,
        } = self;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    watch_roots.maintain(&mut watcher);
                    let Some(events) = debouncer.take_if_ready() else {
                        continue;
                    };
                    if session_tx.send(SessionMsg::FileChanged(events)).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}
