//! The importable sprite module.
//!
//! ```js
//! import sprite from "virtual:svg-sprite-gen";
//! ```
//!
//! Importing it appends the sprite to `document.body` as a side effect and
//! yields the sprite markup as the default export.

use crate::embed::{Template, TemplateVars};

/// Id applications import.
pub const VIRTUAL_MODULE_ID: &str = "virtual:svg-sprite-gen";

/// Resolved id; the `\0` prefix keeps other tooling from treating it as a file.
pub const RESOLVED_VIRTUAL_MODULE_ID: &str = "\0virtual:svg-sprite-gen";

/// Variables for the module template.
pub struct SpriteModuleVars<'a> {
    pub sprite: &'a str,
}

impl TemplateVars for SpriteModuleVars<'_> {
    fn apply(&self, content: &str) -> String {
        content.replace("__SPRITE__", &template_literal_body(self.sprite))
    }
}

/// Module source with the sprite as a template literal.
pub const SPRITE_MODULE_JS: Template<SpriteModuleVars<'static>> =
    Template::new(include_str!("../embed/sprite/module.js"));

/// Render the module body for the current sprite.
pub fn module_source(sprite: &str) -> String {
    let template: Template<SpriteModuleVars<'_>> = SPRITE_MODULE_JS;
    template.render(&SpriteModuleVars { sprite })
}

/// Escape text for use between backticks: `\`, `` ` `` and `${`.
fn template_literal_body(text: &str) -> std::borrow::Cow<'_, str> {
    if !text.contains(['\\', '`', '$']) {
        return std::borrow::Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            _ => out.push(c),
        }
    }
    std::borrow::Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_source_contains_sprite() {
        let sprite = r#"<svg xmlns="http://www.w3.org/2000/svg" style="display:none;"><symbol id="a" viewBox="0 0 24 24"></symbol></svg>"#;
        let source = module_source(sprite);

        assert!(source.contains(&format!("`{sprite}`")));
        assert!(source.contains("DOMParser"));
        assert!(source.contains("document.body.appendChild"));
        assert!(source.contains("export default"));
    }

    #[test]
    fn test_template_literal_escaping() {
        assert_eq!(template_literal_body("plain"), "plain");
        assert_eq!(template_literal_body("a`b"), "a\\`b");
        assert_eq!(template_literal_body("${x}"), "\\${x}");
        assert_eq!(template_literal_body("$5"), "$5");
        assert_eq!(template_literal_body("a\\b"), "a\\\\b");
    }
}
