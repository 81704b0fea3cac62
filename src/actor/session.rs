//! Session Actor - single owner of the sprite session.
//!
//! File events, module loads and HTML transforms arrive on one channel and
//! are handled strictly in arrival order, so a load never observes a sprite
//! that is being rebuilt.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tokio::sync::{mpsc, oneshot};

use super::messages::{SessionMsg, WsMsg};
use crate::logger::{status_error, status_success};
use crate::session::{DevServer, FileEvent, HostPlugin, SpriteSession};
use crate::utils::path::to_slash;

/// Modules served so far and whether a reload is pending.
///
/// Stands in for a bundler's module graph: only ids that were actually
/// loaded can be invalidated.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    loaded: FxHashSet<String>,
    /// Invalidations over the session, for diagnostics.
    invalidations: usize,
    reload_requested: bool,
}

impl ModuleGraph {
    fn mark_loaded(&mut self, id: &str) {
        self.loaded.insert(id.to_string());
    }

    /// Whether a full reload was requested since the last call.
    fn take_reload(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }
}

impl DevServer for ModuleGraph {
    fn has_module(&self, id: &str) -> bool {
        self.loaded.contains(id)
    }

    fn invalidate_module(&mut self, id: &str) {
        if self.loaded.remove(id) {
            self.invalidations += 1;
            crate::debug!("sprite"; "invalidated {} (#{})", id.escape_default(), self.invalidations);
        }
    }

    fn broadcast_full_reload(&mut self) {
        self.reload_requested = true;
    }
}

/// Session Actor - owns the `SpriteSession` in serve mode
pub struct SessionActor {
    rx: mpsc::Receiver<SessionMsg>,
    session: SpriteSession,
    graph: ModuleGraph,
    /// `None` when live reload is disabled
    ws_tx: Option<mpsc::Sender<WsMsg>>,
    root: PathBuf,
}

impl SessionActor {
    pub fn new(
        rx: mpsc::Receiver<SessionMsg>,
        session: SpriteSession,
        ws_tx: Option<mpsc::Sender<WsMsg>>,
        root: PathBuf,
    ) -> Self {
        Self {
            rx,
            session,
            graph: ModuleGraph::default(),
            ws_tx,
            root,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                SessionMsg::FileChanged(events) => self.handle_changes(events).await,
                SessionMsg::LoadModule { id, reply } => {
                    let _ = reply.send(self.load_module(&id));
                }
                SessionMsg::TransformHtml { html, reply } => {
                    let _ = reply.send(self.session.transform_index_html(&html).into_owned());
                }
                SessionMsg::Transform { code, id, reply } => {
                    let result = self
                        .session
                        .transform(&code, &id)
                        .map(std::borrow::Cow::into_owned);
                    let _ = reply.send(result);
                }
                SessionMsg::Shutdown => {
                    crate::debug!("sprite"; "session shutting down");
                    break;
                }
            }
        }
    }

    fn load_module(&mut self, id: &str) -> Option<String> {
        let resolved = self.session.resolve_id(id)?;
        let source = self.session.load(resolved)?;
        self.graph.mark_loaded(resolved);
        Some(source)
    }

    async fn handle_changes(&mut self, events: Vec<(PathBuf, FileEvent)>) {
        let mut rebuilt = Vec::new();

        for (path, event) in events {
            match self.session.handle_file_change(&path, event, &mut self.graph) {
                Ok(true) => rebuilt.push(self.display_path(&path)),
                Ok(false) => {
                    crate::debug!("watch"; "ignored {}: {}", event.label(), path.display());
                }
                Err(e) => {
                    status_error(
                        &format!("sprite rebuild failed: {}", self.display_path(&path)),
                        &e.to_string(),
                    );
                }
            }
        }

        if rebuilt.is_empty() {
            return;
        }

        status_success(&format!(
            "sprite rebuilt ({} symbols): {}",
            self.session.symbol_count(),
            rebuilt.join(", ")
        ));

        if self.graph.take_reload()
            && let Some(ws_tx) = &self.ws_tx
        {
            let _ = ws_tx
                .send(WsMsg::Reload {
                    reason: rebuilt.join(", "),
                })
                .await;
        }
    }

    fn display_path(&self, path: &Path) -> String {
        to_slash(path.strip_prefix(&self.root).unwrap_or(path)).into_owned()
    }
}

// =============================================================================
// Handle for HTTP worker threads
// =============================================================================

/// Blocking client of the SessionActor for non-async threads.
///
/// Every call is a request with a oneshot reply. If the actor is gone the
/// calls degrade to "no module" / "unchanged".
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionMsg>,
}

impl SessionHandle {
    pub fn new(tx: mpsc::Sender<SessionMsg>) -> Self {
        Self { tx }
    }

    /// Resolve and load an importable module.
    pub fn load_module(&self, id: &str) -> Option<String> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .blocking_send(SessionMsg::LoadModule {
                id: id.to_string(),
                reply,
            })
            .ok()?;
        rx.blocking_recv().ok().flatten()
    }

    /// Run the HTML transform over an entry page.
    pub fn transform_html(&self, html: String) -> String {
        let (reply, rx) = oneshot::channel();
        let original = html.clone();
        if self
            .tx
            .blocking_send(SessionMsg::TransformHtml { html, reply })
            .is_err()
        {
            return original;
        }
        rx.blocking_recv().unwrap_or(original)
    }

    /// Run the source transform; `None` means "serve unchanged".
    pub fn transform(&self, code: String, id: &str) -> Option<String> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .blocking_send(SessionMsg::Transform {
                code,
                id: id.to_string(),
                reply,
            })
            .ok()?;
        rx.blocking_recv().ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpriteConfig;
    use crate::optimize::OptimizeSetting;
    use crate::session::{
        BuildContext, EmittedAsset, HostCommand, RESOLVED_VIRTUAL_MODULE_ID, ResolvedConfig,
        VIRTUAL_MODULE_ID,
    };
    use std::fs;
    use tempfile::TempDir;

    const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="1" height="1"/></svg>"#;

    struct Discard;

    impl BuildContext for Discard {
        fn emit_asset(&mut self, _asset: EmittedAsset) {}
    }

    fn ready_session(temp: &TempDir) -> SpriteSession {
        let config = SpriteConfig {
            optimize: OptimizeSetting::Toggle(false),
            ..Default::default()
        };
        let mut session = SpriteSession::new(config);
        session
            .config_resolved(ResolvedConfig {
                root: temp.path().to_path_buf(),
                out_dir: temp.path().join("dist"),
                command: HostCommand::Serve,
            })
            .unwrap();
        session.build_start(&mut Discard).unwrap();
        session
    }

    #[test]
    fn test_module_graph_invalidates_only_loaded() {
        let mut graph = ModuleGraph::default();
        graph.invalidate_module(RESOLVED_VIRTUAL_MODULE_ID);
        assert_eq!(graph.invalidations, 0);

        graph.mark_loaded(RESOLVED_VIRTUAL_MODULE_ID);
        assert!(graph.has_module(RESOLVED_VIRTUAL_MODULE_ID));
        graph.invalidate_module(RESOLVED_VIRTUAL_MODULE_ID);
        assert!(!graph.has_module(RESOLVED_VIRTUAL_MODULE_ID));
        assert_eq!(graph.invalidations, 1);

        // Reloading the module makes it invalidatable again
        graph.mark_loaded(RESOLVED_VIRTUAL_MODULE_ID);
        graph.invalidate_module(RESOLVED_VIRTUAL_MODULE_ID);
        assert_eq!(graph.invalidations, 2);
        assert!(graph.loaded.is_empty());
    }

    #[test]
    fn test_module_graph_take_reload() {
        let mut graph = ModuleGraph::default();
        assert!(!graph.take_reload());
        graph.broadcast_full_reload();
        graph.broadcast_full_reload();
        assert!(graph.take_reload());
        assert!(!graph.take_reload());
    }

    #[tokio::test]
    async fn test_change_broadcasts_single_reload() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();

        let (_tx, rx) = mpsc::channel(4);
        let (ws_tx, mut ws_rx) = mpsc::channel(4);
        let mut actor = SessionActor::new(
            rx,
            ready_session(&temp),
            Some(ws_tx),
            temp.path().to_path_buf(),
        );

        assert!(actor.load_module(VIRTUAL_MODULE_ID).is_some());

        fs::write(temp.path().join("b.svg"), ICON).unwrap();
        fs::write(temp.path().join("c.svg"), ICON).unwrap();
        actor
            .handle_changes(vec![
                (temp.path().join("b.svg"), FileEvent::Add),
                (temp.path().join("c.svg"), FileEvent::Add),
                (temp.path().join("notes.txt"), FileEvent::Add),
            ])
            .await;

        match ws_rx.try_recv() {
            Ok(WsMsg::Reload { reason }) => assert_eq!(reason, "b.svg, c.svg"),
            other => panic!("expected reload, got {other:?}"),
        }
        assert!(ws_rx.try_recv().is_err());
        assert_eq!(actor.graph.invalidations, 1);
        assert_eq!(actor.session.symbol_count(), 3);
    }

    #[tokio::test]
    async fn test_unmatched_changes_do_not_reload() {
        let temp = TempDir::new().unwrap();
        let (_tx, rx) = mpsc::channel(4);
        let (ws_tx, mut ws_rx) = mpsc::channel(4);
        let mut actor = SessionActor::new(
            rx,
            ready_session(&temp),
            Some(ws_tx),
            temp.path().to_path_buf(),
        );

        actor
            .handle_changes(vec![(temp.path().join("main.js"), FileEvent::Change)])
            .await;
        assert!(ws_rx.try_recv().is_err());
    }

    #[test]
    fn test_handle_round_trip() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();

        let (tx, rx) = mpsc::channel(4);
        let actor = SessionActor::new(rx, ready_session(&temp), None, temp.path().to_path_buf());
        let task = runtime.spawn(actor.run());

        let handle = SessionHandle::new(tx);
        let module = handle.load_module(VIRTUAL_MODULE_ID).unwrap();
        assert!(module.contains(r#"id="a""#));
        assert!(handle.load_module("virtual:other").is_none());
        assert_eq!(handle.transform_html("<body></body>".into()), "<body></body>");
        assert_eq!(
            handle.transform("export {}".into(), "/app/main.js").as_deref(),
            Some("export {}")
        );

        handle.tx.blocking_send(SessionMsg::Shutdown).unwrap();
        runtime.block_on(task).unwrap();
    }
}
