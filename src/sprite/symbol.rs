//! Symbol ids, `<symbol>` elements and the sprite envelope.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::utils::html::escape_attr;

/// Placeholder replaced by the file stem in the symbol id template.
pub const NAME_PLACEHOLDER: &str = "[name]";

/// viewBox applied to every symbol unless configured otherwise.
pub const DEFAULT_VIEW_BOX: &str = "0 0 24 24";

/// `view_box` value that copies each source file's own viewBox.
pub const INHERIT_VIEW_BOX: &str = "inherit";

const SPRITE_OPEN: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" style="display:none;">"#;
const SPRITE_CLOSE: &str = "</svg>";

/// How a symbol's viewBox is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBox {
    /// Same value for every symbol.
    Fixed(String),
    /// The root `viewBox` of each icon, falling back to [`DEFAULT_VIEW_BOX`].
    Inherit,
}

impl ViewBox {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            INHERIT_VIEW_BOX => Self::Inherit,
            "" => Self::Fixed(DEFAULT_VIEW_BOX.to_string()),
            fixed => Self::Fixed(fixed.to_string()),
        }
    }

    /// viewBox for a symbol built from the unoptimized `source`.
    pub fn resolve(&self, source: &str) -> String {
        match self {
            Self::Fixed(value) => value.clone(),
            Self::Inherit => {
                source_view_box(source).unwrap_or_else(|| DEFAULT_VIEW_BOX.to_string())
            }
        }
    }
}

impl Default for ViewBox {
    fn default() -> Self {
        Self::Fixed(DEFAULT_VIEW_BOX.to_string())
    }
}

/// Instantiate `template` for `path`: the first `[name]` becomes the file
/// stem (extension stripped).
///
/// # Example
/// ```text
/// "icon-[name]" + icons/home.svg → "icon-home"
/// ```
pub fn symbol_id(template: &str, path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    template.replacen(NAME_PLACEHOLDER, &stem, 1)
}

/// The root element's `viewBox`, if the document declares one.
pub fn source_view_box(svg: &str) -> Option<String> {
    let mut reader = Reader::from_str(svg);
    loop {
        match reader.read_event().ok()? {
            Event::Start(tag) | Event::Empty(tag) => {
                let attr = tag.try_get_attribute("viewBox").ok()??;
                return Some(String::from_utf8_lossy(&attr.value).into_owned());
            }
            Event::Eof => return None,
            _ => {}
        }
    }
}

/// Wrap an icon body in a `<symbol>` element.
pub fn render_symbol(id: &str, view_box: &str, body: &str) -> String {
    format!(
        r#"<symbol id="{}" viewBox="{}">{}</symbol>"#,
        escape_attr(id),
        escape_attr(view_box),
        body
    )
}

/// Join symbols with newlines inside the hidden sprite envelope.
pub fn wrap_sprite(symbols: &[String]) -> String {
    let body = symbols.join("\n");
    let mut sprite = String::with_capacity(SPRITE_OPEN.len() + body.len() + SPRITE_CLOSE.len());
    sprite.push_str(SPRITE_OPEN);
    sprite.push_str(&body);
    sprite.push_str(SPRITE_CLOSE);
    sprite
}
