//! Long-lived sprite state and its delivery channels.
//!
//! # State machine
//!
//! ```text
//!                  build_start                file event (match)
//! Uninitialized ───────────────► Ready ◄──────────────────────────┐
//!                                  │                              │
//!                                  └──► Rebuilding ──(success)────┘
//!                                            │
//!                                            └──(failure)──► Ready (previous sprite)
//! ```
//!
//! The stored sprite is only replaced after a rebuild fully succeeds, so
//! readers never observe a half-built sprite.
//!
//! # Delivery
//!
//! - virtual module: `virtual:svg-sprite-gen` → `\0virtual:svg-sprite-gen`
//! - inline: the sprite is spliced before `</body>` of transformed HTML

mod host;
mod virtual_module;

pub use host::{
    BuildContext, DevServer, EmittedAsset, FileEvent, HostCommand, HostPlugin, ResolvedConfig,
    WatchRegistry,
};
pub use virtual_module::{RESOLVED_VIRTUAL_MODULE_ID, VIRTUAL_MODULE_ID, module_source};

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::config::SpriteConfig;
use crate::sprite::{FileMatcher, Sprite, SpriteBuilder, SpriteError};
use crate::utils::html::inject_before_body_end;
use crate::utils::path::to_slash;

/// Plugin name reported to hosts.
pub const PLUGIN_NAME: &str = "svg-sprite-gen";

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    Uninitialized,
    Ready(Sprite),
}

/// One sprite session: configuration, captured host paths and the current
/// sprite.
///
/// Sessions are plain values; several can coexist in one process.
#[derive(Debug)]
pub struct SpriteSession {
    config: SpriteConfig,
    resolved: Option<ResolvedConfig>,
    matcher: Option<FileMatcher>,
    state: SessionState,
}

impl SpriteSession {
    pub fn new(config: SpriteConfig) -> Self {
        Self {
            config,
            resolved: None,
            matcher: None,
            state: SessionState::Uninitialized,
        }
    }

    pub fn config(&self) -> &SpriteConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    /// Current sprite markup; empty before the first build.
    pub fn sprite(&self) -> &str {
        match &self.state {
            SessionState::Ready(sprite) => sprite.as_str(),
            SessionState::Uninitialized => "",
        }
    }

    /// Number of symbols in the current sprite.
    pub fn symbol_count(&self) -> usize {
        match &self.state {
            SessionState::Ready(sprite) => sprite.len(),
            SessionState::Uninitialized => 0,
        }
    }

    /// Whether `path` is consumed by the sprite pipeline.
    pub fn matches(&self, path: &Path) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(path))
    }

    fn resolved(&self) -> Result<&ResolvedConfig, SpriteError> {
        self.resolved.as_ref().ok_or(SpriteError::Unresolved)
    }

    /// Run a full build. The stored sprite is untouched on failure.
    /// Returns the new symbol count.
    fn rebuild(&mut self) -> Result<usize, SpriteError> {
        let sprite = SpriteBuilder::new(&self.config).build(&self.resolved()?.root)?;
        let count = sprite.len();
        self.state = SessionState::Ready(sprite);
        Ok(count)
    }

    fn write_sprite(&self, out_dir: &Path) -> Result<(), SpriteError> {
        let path = out_dir.join(&self.config.output);
        fs::create_dir_all(out_dir).map_err(|e| SpriteError::Write(out_dir.to_path_buf(), e))?;
        fs::write(&path, self.sprite()).map_err(|e| SpriteError::Write(path.clone(), e))?;
        crate::debug!("sprite"; "wrote {}", path.display());
        Ok(())
    }
}

impl HostPlugin for SpriteSession {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn config_resolved(&mut self, config: ResolvedConfig) -> Result<(), SpriteError> {
        // The output directory never feeds back into the sprite.
        if let Ok(rel) = config.out_dir.strip_prefix(&config.root)
            && !rel.as_os_str().is_empty()
        {
            let pattern = format!("{}/**", globset::escape(&to_slash(rel)));
            if !self.config.exclude.contains(&pattern) {
                self.config.exclude.push(pattern);
            }
        }

        self.matcher = Some(FileMatcher::new(
            &config.root,
            &self.config.include,
            &self.config.exclude,
        )?);
        self.resolved = Some(config);
        Ok(())
    }

    fn build_start(&mut self, ctx: &mut dyn BuildContext) -> Result<(), SpriteError> {
        let count = self.rebuild()?;
        crate::log!("sprite"; "{} symbols", count);

        let resolved = self.resolved()?;
        match resolved.command {
            HostCommand::Build => ctx.emit_asset(EmittedAsset {
                file_name: self.config.output.clone(),
                source: self.sprite().to_string(),
            }),
            HostCommand::Serve => self.write_sprite(&resolved.out_dir)?,
        }
        Ok(())
    }

    fn configure_server(&mut self, watcher: &mut dyn WatchRegistry) {
        if let Some(matcher) = &self.matcher {
            for base in matcher.static_bases() {
                watcher.add(&base);
            }
        }
    }

    fn handle_file_change(
        &mut self,
        path: &Path,
        event: FileEvent,
        server: &mut dyn DevServer,
    ) -> Result<bool, SpriteError> {
        if !self.matches(path) {
            return Ok(false);
        }

        crate::debug!("sprite"; "{}: {}", event.label(), path.display());
        let count = self.rebuild()?;
        crate::debug!("sprite"; "rebuilt, {} symbols", count);

        // The new sprite is live from here on; clients must hear about it
        // even if the disk copy cannot be refreshed.
        if server.has_module(RESOLVED_VIRTUAL_MODULE_ID) {
            server.invalidate_module(RESOLVED_VIRTUAL_MODULE_ID);
        }
        server.broadcast_full_reload();

        if let Some(resolved) = &self.resolved
            && resolved.command == HostCommand::Serve
            && let Err(e) = self.write_sprite(&resolved.out_dir)
        {
            crate::log!("error"; "{}", e);
        }
        Ok(true)
    }

    fn transform_index_html<'a>(&self, html: &'a str) -> Cow<'a, str> {
        if !self.config.is_inline() {
            return Cow::Borrowed(html);
        }
        match inject_before_body_end(html, self.sprite()) {
            Some(injected) => Cow::Owned(injected),
            None => Cow::Borrowed(html),
        }
    }

    fn resolve_id(&self, id: &str) -> Option<&'static str> {
        (id == VIRTUAL_MODULE_ID).then_some(RESOLVED_VIRTUAL_MODULE_ID)
    }

    fn load(&self, id: &str) -> Option<String> {
        (id == RESOLVED_VIRTUAL_MODULE_ID).then(|| module_source(self.sprite()))
    }

    fn transform<'a>(&self, code: &'a str, id: &str) -> Option<Cow<'a, str>> {
        if self.matches(Path::new(id)) {
            return None;
        }
        Some(Cow::Borrowed(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeliveryMode;
    use crate::optimize::OptimizeSetting;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><rect width="4" height="4"/></svg>"#;

    #[derive(Default)]
    struct StubBuild {
        assets: Vec<EmittedAsset>,
    }

    impl BuildContext for StubBuild {
        fn emit_asset(&mut self, asset: EmittedAsset) {
            self.assets.push(asset);
        }
    }

    #[derive(Default)]
    struct StubServer {
        modules: Vec<String>,
        invalidated: Vec<String>,
        reloads: usize,
    }

    impl DevServer for StubServer {
        fn has_module(&self, id: &str) -> bool {
            self.modules.iter().any(|m| m == id)
        }

        fn invalidate_module(&mut self, id: &str) {
            self.invalidated.push(id.to_string());
        }

        fn broadcast_full_reload(&mut self) {
            self.reloads += 1;
        }
    }

    #[derive(Default)]
    struct StubWatcher(Vec<PathBuf>);

    impl WatchRegistry for StubWatcher {
        fn add(&mut self, path: &Path) {
            self.0.push(path.to_path_buf());
        }
    }

    fn raw_config() -> SpriteConfig {
        SpriteConfig {
            optimize: OptimizeSetting::Toggle(false),
            ..Default::default()
        }
    }

    fn started(temp: &TempDir, config: SpriteConfig, command: HostCommand) -> SpriteSession {
        let mut session = SpriteSession::new(config);
        session
            .config_resolved(ResolvedConfig {
                root: temp.path().to_path_buf(),
                out_dir: temp.path().join("dist"),
                command,
            })
            .unwrap();
        session.build_start(&mut StubBuild::default()).unwrap();
        session
    }

    #[test]
    fn test_uninitialized_is_empty() {
        let mut session = SpriteSession::new(SpriteConfig::default());
        assert!(!session.is_ready());
        assert_eq!(session.sprite(), "");

        let result = session.build_start(&mut StubBuild::default());
        assert!(matches!(result, Err(SpriteError::Unresolved)));
    }

    #[test]
    fn test_build_mode_emits_asset() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();

        let mut session = SpriteSession::new(raw_config());
        session
            .config_resolved(ResolvedConfig {
                root: temp.path().to_path_buf(),
                out_dir: temp.path().join("dist"),
                command: HostCommand::Build,
            })
            .unwrap();

        let mut ctx = StubBuild::default();
        session.build_start(&mut ctx).unwrap();

        assert_eq!(ctx.assets.len(), 1);
        assert_eq!(ctx.assets[0].file_name, "sprite.svg");
        assert_eq!(ctx.assets[0].source, session.sprite());
        assert!(!temp.path().join("dist/sprite.svg").exists());
    }

    #[test]
    fn test_serve_mode_writes_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();

        let session = started(&temp, raw_config(), HostCommand::Serve);
        let written = fs::read_to_string(temp.path().join("dist/sprite.svg")).unwrap();
        assert_eq!(written, session.sprite());
    }

    #[test]
    fn test_output_dir_is_excluded() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();

        let mut session = SpriteSession::new(raw_config());
        session
            .config_resolved(ResolvedConfig {
                root: temp.path().to_path_buf(),
                out_dir: temp.path().join("public"),
                command: HostCommand::Serve,
            })
            .unwrap();
        session.build_start(&mut StubBuild::default()).unwrap();
        session.build_start(&mut StubBuild::default()).unwrap();

        assert_eq!(session.symbol_count(), 1);
        assert!(!session.matches(&temp.path().join("public/sprite.svg")));
        assert!(session.matches(&temp.path().join("a.svg")));
    }

    #[test]
    fn test_rebuild_on_add() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();
        let mut session = started(&temp, raw_config(), HostCommand::Serve);
        assert!(!session.sprite().contains(r#"id="b""#));

        let added = temp.path().join("b.svg");
        fs::write(&added, ICON).unwrap();

        let mut server = StubServer {
            modules: vec![RESOLVED_VIRTUAL_MODULE_ID.to_string()],
            ..Default::default()
        };
        let rebuilt = session
            .handle_file_change(&added, FileEvent::Add, &mut server)
            .unwrap();

        assert!(rebuilt);
        assert!(session.sprite().contains(r#"id="a""#));
        assert!(session.sprite().contains(r#"id="b""#));
        assert_eq!(server.invalidated, vec![RESOLVED_VIRTUAL_MODULE_ID]);
        assert_eq!(server.reloads, 1);
    }

    #[test]
    fn test_unwritable_output_still_reloads() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();
        let mut session = started(&temp, raw_config(), HostCommand::Serve);

        // A plain file where the output directory should be
        fs::remove_dir_all(temp.path().join("dist")).unwrap();
        fs::write(temp.path().join("dist"), "").unwrap();
        fs::write(temp.path().join("b.svg"), ICON).unwrap();

        let mut server = StubServer {
            modules: vec![RESOLVED_VIRTUAL_MODULE_ID.to_string()],
            ..Default::default()
        };
        let handled = session
            .handle_file_change(&temp.path().join("b.svg"), FileEvent::Add, &mut server)
            .unwrap();

        assert!(handled);
        assert!(session.sprite().contains(r#"id="b""#));
        assert_eq!(server.invalidated, vec![RESOLVED_VIRTUAL_MODULE_ID]);
        assert_eq!(server.reloads, 1);
    }

    #[test]
    fn test_rebuild_without_loaded_module() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();
        let mut session = started(&temp, raw_config(), HostCommand::Serve);

        let mut server = StubServer::default();
        let removed = temp.path().join("a.svg");
        fs::remove_file(&removed).unwrap();
        session
            .handle_file_change(&removed, FileEvent::Unlink, &mut server)
            .unwrap();

        assert!(server.invalidated.is_empty());
        assert_eq!(server.reloads, 1);
        assert!(!session.sprite().contains("<symbol"));
    }

    #[test]
    fn test_non_matching_event_is_noop() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();
        let mut session = started(&temp, raw_config(), HostCommand::Serve);
        let before = session.sprite().to_string();

        let mut server = StubServer::default();
        for path in ["notes.txt", "node_modules/x/icon.svg"] {
            let rebuilt = session
                .handle_file_change(&temp.path().join(path), FileEvent::Change, &mut server)
                .unwrap();
            assert!(!rebuilt);
        }

        assert_eq!(session.sprite(), before);
        assert_eq!(server.reloads, 0);
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_sprite() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();
        let mut session = started(&temp, SpriteConfig::default(), HostCommand::Serve);
        let before = session.sprite().to_string();
        assert!(before.contains(r#"id="a""#));

        let broken = temp.path().join("broken.svg");
        fs::write(&broken, "<svg><path").unwrap();

        let mut server = StubServer::default();
        let result = session.handle_file_change(&broken, FileEvent::Add, &mut server);

        assert!(matches!(result, Err(SpriteError::Optimize(..))));
        assert_eq!(session.sprite(), before);
        assert_eq!(server.reloads, 0);
    }

    #[test]
    fn test_inline_mode_injects() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();
        let config = SpriteConfig {
            mode: DeliveryMode::Inline,
            ..raw_config()
        };
        let session = started(&temp, config, HostCommand::Build);

        let html = session.transform_index_html("<body></body>");
        assert_eq!(html, format!("<body>{}</body>", session.sprite()));
        assert!(html.starts_with("<body><svg "));
    }

    #[test]
    fn test_inline_mode_without_body() {
        let temp = TempDir::new().unwrap();
        let config = SpriteConfig {
            mode: DeliveryMode::Inline,
            ..raw_config()
        };
        let session = started(&temp, config, HostCommand::Build);
        assert_eq!(session.transform_index_html("<p>hi</p>"), "<p>hi</p>");
    }

    #[test]
    fn test_virtual_mode_html_unchanged() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();
        let session = started(&temp, raw_config(), HostCommand::Build);

        assert!(matches!(
            session.transform_index_html("<body></body>"),
            Cow::Borrowed("<body></body>")
        ));
    }

    #[test]
    fn test_virtual_module_resolve_and_load() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();
        let session = started(&temp, raw_config(), HostCommand::Serve);

        assert_eq!(session.resolve_id(VIRTUAL_MODULE_ID), Some(RESOLVED_VIRTUAL_MODULE_ID));
        assert_eq!(session.resolve_id("./main.js"), None);
        assert_eq!(session.load(VIRTUAL_MODULE_ID), None);

        let source = session.load(RESOLVED_VIRTUAL_MODULE_ID).unwrap();
        assert!(source.contains(session.sprite()));
        assert!(source.contains("export default sprite"));
    }

    #[test]
    fn test_load_reflects_latest_sprite() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.svg"), ICON).unwrap();
        let mut session = started(&temp, raw_config(), HostCommand::Serve);

        let added = temp.path().join("zz.svg");
        fs::write(&added, ICON).unwrap();
        session
            .handle_file_change(&added, FileEvent::Add, &mut StubServer::default())
            .unwrap();

        let source = session.load(RESOLVED_VIRTUAL_MODULE_ID).unwrap();
        assert!(source.contains(r#"id="zz""#));
    }

    #[test]
    fn test_transform_passthrough() {
        let temp = TempDir::new().unwrap();
        let session = started(&temp, raw_config(), HostCommand::Serve);

        let icon = temp.path().join("icons/home.svg");
        assert!(session.transform("<svg/>", &icon.to_string_lossy()).is_none());

        let script = temp.path().join("main.js");
        assert_eq!(
            session.transform("export {}", &script.to_string_lossy()).as_deref(),
            Some("export {}")
        );
    }

    #[test]
    fn test_configure_server_watches_include_bases() {
        let temp = TempDir::new().unwrap();
        let config = SpriteConfig {
            include: vec!["icons/**/*.svg".into(), "logos/*.svg".into()],
            ..raw_config()
        };
        let mut session = started(&temp, config, HostCommand::Serve);

        let mut watcher = StubWatcher::default();
        session.configure_server(&mut watcher);
        assert_eq!(
            watcher.0,
            vec![temp.path().join("icons"), temp.path().join("logos")]
        );
    }

    #[test]
    fn test_independent_sessions() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("one.svg"), ICON).unwrap();
        fs::write(second.path().join("two.svg"), ICON).unwrap();

        let a = started(&first, raw_config(), HostCommand::Build);
        let b = started(&second, raw_config(), HostCommand::Build);

        assert!(a.sprite().contains(r#"id="one""#));
        assert!(!a.sprite().contains(r#"id="two""#));
        assert!(b.sprite().contains(r#"id="two""#));
    }
}
