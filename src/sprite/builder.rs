//! One-shot sprite assembly.
//!
//! ```text
//! resolve optimizer ──► discover files ──► read ──► optimize? ──► <symbol> ──► envelope
//! ```
//!
//! Every call rebuilds the whole sprite from disk; nothing is carried over
//! between calls.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use rustc_hash::FxHashSet;

use super::discover::{FileMatcher, discover_files};
use super::symbol::{ViewBox, render_symbol, symbol_id, wrap_sprite};
use super::SpriteError;
use crate::config::SpriteConfig;
use crate::optimize::{self, optimize_svg};

/// A generated sprite document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sprite {
    markup: String,
    ids: Vec<String>,
}

impl Sprite {
    /// The full `<svg>` document.
    pub fn as_str(&self) -> &str {
        &self.markup
    }

    /// Symbol ids in document order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn into_string(self) -> String {
        self.markup
    }
}

/// Builds sprites for one sprite configuration.
pub struct SpriteBuilder<'a> {
    config: &'a SpriteConfig,
    view_box: ViewBox,
}

impl<'a> SpriteBuilder<'a> {
    pub fn new(config: &'a SpriteConfig) -> Self {
        Self {
            config,
            view_box: ViewBox::parse(&config.view_box),
        }
    }

    /// Build the sprite for every matching file under `root`.
    pub fn build(&self, root: &Path) -> Result<Sprite, SpriteError> {
        let optimizer = optimize::resolve(root, &self.config.optimize)?;
        let matcher = FileMatcher::new(root, &self.config.include, &self.config.exclude)?;
        let files = discover_files(&matcher)?;

        let mut symbols = Vec::with_capacity(files.len());
        let mut ids = Vec::with_capacity(files.len());
        let mut seen = FxHashSet::default();

        for file in &files {
            let raw = fs::read_to_string(&file.path)
                .map_err(|e| SpriteError::Read(file.path.clone(), e))?;
            let body = match optimizer.as_ref() {
                Some(config) => Cow::Owned(
                    optimize_svg(&raw, config)
                        .map_err(|e| SpriteError::Optimize(file.path.clone(), e))?,
                ),
                None => Cow::Borrowed(raw.as_str()),
            };
            let id = symbol_id(&self.config.symbol_id, &file.path);

            if !seen.insert(id.clone()) {
                crate::log!("sprite"; "duplicate symbol id `{}` from {}", id, file.rel);
            }

            symbols.push(render_symbol(&id, &self.view_box.resolve(&raw), &body));
            ids.push(id);
        }

        crate::debug!("sprite"; "{} symbols from {} files", symbols.len(), files.len());

        Ok(Sprite {
            markup: wrap_sprite(&symbols),
            ids,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::OptimizeSetting;
    use tempfile::TempDir;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><rect width="10" height="10"/></svg>"#;
    const WIDE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="24" viewBox="0 0 48 24"><circle cx="5" cy="5" r="4"/></svg>"#;

    fn raw_config() -> SpriteConfig {
        SpriteConfig {
            optimize: OptimizeSetting::Toggle(false),
            ..Default::default()
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn symbol_count(sprite: &Sprite) -> usize {
        sprite.as_str().matches("<symbol ").count()
    }

    #[test]
    fn test_empty_sprite() {
        let temp = TempDir::new().unwrap();
        let sprite = SpriteBuilder::new(&SpriteConfig::default())
            .build(temp.path())
            .unwrap();

        assert!(sprite.is_empty());
        assert_eq!(
            sprite.as_str(),
            r#"<svg xmlns="http://www.w3.org/2000/svg" style="display:none;"></svg>"#
        );
    }

    #[test]
    fn test_symbols_in_discovery_order() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "icons/b.svg", SQUARE);
        write(temp.path(), "icons/a.svg", SQUARE);
        write(temp.path(), "logo.svg", WIDE);

        let config = raw_config();
        let sprite = SpriteBuilder::new(&config).build(temp.path()).unwrap();

        assert_eq!(symbol_count(&sprite), 3);
        assert_eq!(sprite.ids(), ["a", "b", "logo"]);
    }

    #[test]
    fn test_build_idempotent() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.svg", SQUARE);
        write(temp.path(), "b.svg", WIDE);

        let config = SpriteConfig::default();
        let builder = SpriteBuilder::new(&config);
        let first = builder.build(temp.path()).unwrap();
        let second = builder.build(temp.path()).unwrap();
        assert_eq!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_symbol_id_template() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "home.svg", SQUARE);

        let config = SpriteConfig {
            symbol_id: "icon-[name]".into(),
            ..raw_config()
        };
        let sprite = SpriteBuilder::new(&config).build(temp.path()).unwrap();
        assert!(sprite.as_str().contains(r#"<symbol id="icon-home" viewBox="0 0 24 24">"#));
    }

    #[test]
    fn test_optimize_disabled_keeps_raw_body() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "home.svg", SQUARE);

        let config = raw_config();
        let sprite = SpriteBuilder::new(&config).build(temp.path()).unwrap();
        assert!(sprite.as_str().contains(&format!(
            r#"<symbol id="home" viewBox="0 0 24 24">{SQUARE}</symbol>"#
        )));
    }

    #[test]
    fn test_optimize_enabled_keeps_view_box() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "wide.svg", WIDE);

        let config = SpriteConfig::default();
        let sprite = SpriteBuilder::new(&config).build(temp.path()).unwrap();
        assert!(sprite.as_str().contains(r#"viewBox="0 0 48 24""#));
        assert!(sprite.as_str().contains("<path"));
    }

    #[test]
    fn test_inherit_view_box() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "wide.svg", WIDE);

        let config = SpriteConfig {
            view_box: "inherit".into(),
            ..raw_config()
        };
        let sprite = SpriteBuilder::new(&config).build(temp.path()).unwrap();
        assert!(sprite.as_str().contains(r#"<symbol id="wide" viewBox="0 0 48 24">"#));
    }

    #[test]
    fn test_inherit_view_box_with_optimizer() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "wide.svg", WIDE);
        write(
            temp.path(),
            "bare.svg",
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><rect width="10" height="10"/></svg>"#,
        );

        let config = SpriteConfig {
            view_box: "inherit".into(),
            ..Default::default()
        };
        let sprite = SpriteBuilder::new(&config).build(temp.path()).unwrap();
        assert!(sprite.as_str().contains(r#"<symbol id="wide" viewBox="0 0 48 24">"#));
        assert!(sprite.as_str().contains(r#"<symbol id="bare" viewBox="0 0 24 24">"#));
    }

    #[test]
    fn test_malformed_svg_fails_build() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "good.svg", SQUARE);
        write(temp.path(), "bad.svg", "<svg><rect");

        let result = SpriteBuilder::new(&SpriteConfig::default()).build(temp.path());
        assert!(matches!(result, Err(SpriteError::Optimize(path, _)) if path.ends_with("bad.svg")));
    }

    #[test]
    fn test_duplicate_ids_kept() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a/home.svg", SQUARE);
        write(temp.path(), "b/home.svg", SQUARE);

        let config = raw_config();
        let sprite = SpriteBuilder::new(&config).build(temp.path()).unwrap();
        assert_eq!(sprite.ids(), ["home", "home"]);
    }
}
