//! Collaborator surface offered by the host build tool.
//!
//! The session only talks to its host through these traits, so the CLI's
//! build and serve commands and the test stubs are interchangeable.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::sprite::SpriteError;

/// Which host command is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Final build: assets go through the host's emission pipeline.
    Build,
    /// Dev server: assets are written straight to disk.
    Serve,
}

/// Resolved host configuration, delivered once before the build starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub root: PathBuf,
    pub out_dir: PathBuf,
    pub command: HostCommand,
}

/// An asset handed to the host during a final build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedAsset {
    pub file_name: String,
    pub source: String,
}

/// Final-build asset emission.
pub trait BuildContext {
    fn emit_asset(&mut self, asset: EmittedAsset);
}

/// Extra paths for the host's file watcher.
pub trait WatchRegistry {
    fn add(&mut self, path: &Path);
}

/// Dev-session services: the module graph and the reload channel.
pub trait DevServer {
    /// Whether a module with this resolved id has been loaded.
    fn has_module(&self, id: &str) -> bool;

    /// Drop the cached result for a module so the next import reloads it.
    fn invalidate_module(&mut self, id: &str);

    /// Tell every connected client to reload the page.
    fn broadcast_full_reload(&mut self);
}

/// Kind of file-system event reported by the host watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEvent {
    Add,
    Change,
    Unlink,
}

impl FileEvent {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Add => "created",
            Self::Change => "modified",
            Self::Unlink => "removed",
        }
    }
}

/// Lifecycle notifications a plugin receives from its host.
///
/// Hosts call them in this order: `config_resolved`, `build_start`, then
/// (serve only) `configure_server` and any number of `handle_file_change`,
/// interleaved with `resolve_id`/`load`/`transform`/`transform_index_html`.
pub trait HostPlugin {
    fn name(&self) -> &'static str;

    fn config_resolved(&mut self, config: ResolvedConfig) -> Result<(), SpriteError>;

    fn build_start(&mut self, ctx: &mut dyn BuildContext) -> Result<(), SpriteError>;

    fn configure_server(&mut self, watcher: &mut dyn WatchRegistry);

    /// Returns `Ok(true)` when the event triggered a rebuild.
    fn handle_file_change(
        &mut self,
        path: &Path,
        event: FileEvent,
        server: &mut dyn DevServer,
    ) -> Result<bool, SpriteError>;

    fn transform_index_html<'a>(&self, html: &'a str) -> Cow<'a, str>;

    fn resolve_id(&self, id: &str) -> Option<&'static str>;

    fn load(&self, id: &str) -> Option<String>;

    /// `None` leaves the module to the host's default handling.
    fn transform<'a>(&self, code: &'a str, id: &str) -> Option<Cow<'a, str>>;
}
