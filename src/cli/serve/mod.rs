//! Development server with live reload support.
//!
//! ```text
//! GET /@id/virtual:svg-sprite-gen   → SessionActor LoadModule
//! GET /@spritegen/hotreload.js      → embedded client
//! GET /<path> under root            → HTML transform / source transform / raw
//! GET /<path> under output dir      → raw (sprite.svg)
//! ```

mod lifecycle;
mod modules;
mod path;
mod response;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

use anyhow::{Context, Result};
use crossbeam::channel;
use tiny_http::{Request, Server};

use crate::actor::{Coordinator, SessionHandle};
use crate::config::SpritegenConfig;
use crate::embed::serve::{HOTRELOAD_JS, HOTRELOAD_URL, HotreloadVars, hotreload_tag};
use crate::reload::server::DEFAULT_WS_PORT;
use crate::session::{
    BuildContext, EmittedAsset, HostCommand, HostPlugin, ResolvedConfig, SpriteSession,
    WatchRegistry,
};
use crate::utils::html::inject_before_body_end;
use crate::utils::mime::{self, types};
use crate::{debug, log};

pub use path::resolve_path;

/// Actual WebSocket port (may differ from DEFAULT_WS_PORT if port was in use)
static ACTUAL_WS_PORT: AtomicU16 = AtomicU16::new(DEFAULT_WS_PORT);

/// Update the actual WebSocket port (called by coordinator after binding)
pub fn set_actual_ws_port(port: u16) {
    ACTUAL_WS_PORT.store(port, Ordering::Relaxed);
}

fn get_actual_ws_port() -> u16 {
    ACTUAL_WS_PORT.load(Ordering::Relaxed)
}

/// Serve mode writes the sprite itself; nothing is emitted.
struct NoEmit;

impl BuildContext for NoEmit {
    fn emit_asset(&mut self, asset: EmittedAsset) {
        debug!("serve"; "ignored emitted asset {}", asset.file_name);
    }
}

/// Collects the session's extra watch roots.
#[derive(Debug, Default)]
struct WatchPaths(Vec<PathBuf>);

impl WatchRegistry for WatchPaths {
    fn add(&mut self, path: &Path) {
        self.0.push(path.to_path_buf());
    }
}

/// Shared state of request handlers.
struct ServeContext {
    root: PathBuf,
    out_dir: PathBuf,
    session: SessionHandle,
    live_reload: bool,
}

/// Run the dev server until Ctrl+C.
pub fn serve_project(config: &SpritegenConfig) -> Result<()> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    crate::core::register_server(Arc::clone(&server), shutdown_tx);

    let root = config.get_root().to_path_buf();
    let out_dir = config.build.output.clone();

    let mut session = SpriteSession::new(config.sprite.clone());
    session.config_resolved(ResolvedConfig {
        root: root.clone(),
        out_dir: out_dir.clone(),
        command: HostCommand::Serve,
    })?;

    // A failed first build still serves; the next matching change retries.
    match session.build_start(&mut NoEmit) {
        Ok(()) => log!("sprite"; "{} symbols → {}", session.symbol_count(), display(&config.sprite_output_path(), &root)),
        Err(e) => log!("error"; "initial sprite build failed: {}", e),
    }

    let live_reload = config.serve.watch;
    let watch_paths = live_reload.then(|| {
        let mut paths = WatchPaths::default();
        session.configure_server(&mut paths);
        paths.0
    });

    let (coordinator, handle) = Coordinator::new(session, root.clone());
    let actors = lifecycle::spawn_actors(
        coordinator,
        watch_paths,
        live_reload.then_some(DEFAULT_WS_PORT),
        shutdown_rx,
    );

    log!("serve"; "http://{}", display_addr(addr));

    let ctx = Arc::new(ServeContext {
        root,
        out_dir,
        session: handle,
        live_reload,
    });
    run_request_loop(&server, &ctx);

    lifecycle::wait_for_shutdown(actors);
    Ok(())
}

fn run_request_loop(server: &Server, ctx: &Arc<ServeContext>) {
    for request in server.incoming_requests() {
        let ctx = Arc::clone(ctx);
        std::thread::spawn(move || {
            if let Err(e) = handle_request(request, &ctx) {
                log!("serve"; "request error: {e}");
            }
        });
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, ctx: &ServeContext) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let url = request.url().to_string();
    debug!("serve"; "{} {}", request.method(), url);

    if ctx.live_reload && path::normalize_url(&url) == HOTRELOAD_URL.trim_start_matches('/') {
        let js = HOTRELOAD_JS.render(&HotreloadVars {
            ws_port: get_actual_ws_port(),
        });
        return response::respond_js(request, js);
    }

    if let Some(id) = url.strip_prefix(modules::MODULE_ROUTE) {
        let id = path::normalize_url(id);
        return match ctx.session.load_module(&id) {
            Some(source) => response::respond_js(request, source),
            None => response::respond_not_found(request),
        };
    }

    if let Some(file) = resolve_path(&url, &ctx.root) {
        return respond_source(request, &file, ctx);
    }

    if let Some(file) = resolve_path(&url, &ctx.out_dir) {
        return response::respond_file(request, &file);
    }

    response::respond_not_found(request)
}

/// Serve a project file through the session's transforms.
fn respond_source(request: Request, file: &Path, ctx: &ServeContext) -> Result<()> {
    let content_type = mime::from_path(file);

    if mime::is_html(content_type) {
        let html = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let mut html = ctx.session.transform_html(html);
        if ctx.live_reload {
            let tag = hotreload_tag();
            html = inject_before_body_end(&html, &tag).unwrap_or_else(|| html + &tag);
        }
        return response::respond_text(request, types::HTML, html);
    }

    if !modules::is_module_source(file) {
        return response::respond_file(request, file);
    }

    let Ok(code) = std::fs::read_to_string(file) else {
        return response::respond_file(request, file);
    };
    let code = if content_type == types::JAVASCRIPT {
        modules::rewrite_virtual_imports(&code).into_owned()
    } else {
        code
    };

    match ctx.session.transform(code, &file.to_string_lossy()) {
        Some(code) => response::respond_text(request, content_type, code),
        None => response::respond_file(request, file),
    }
}

fn display(path: &Path, root: &Path) -> String {
    crate::utils::path::to_slash(path.strip_prefix(root).unwrap_or(path)).into_owned()
}

/// `0.0.0.0` is not browsable; show localhost instead.
fn display_addr(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        format!("localhost:{}", addr.port())
    } else {
        addr.to_string()
    }
}
