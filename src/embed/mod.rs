//! Embedded static resources.
//!
//! - `template` - typed variable injection for embedded text
//! - `sprite` - the virtual module body
//! - `serve` - dev server client script
//!
//! ```ignore
//! use embed::serve::{HOTRELOAD_JS, HotreloadVars};
//!
//! let js = HOTRELOAD_JS.render(&HotreloadVars { ws_port: 35729 });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// URL the dev server answers with the hot reload client.
    pub const HOTRELOAD_URL: &str = "/@spritegen/hotreload.js";

    /// Variables for hotreload.js.
    pub struct HotreloadVars {
        pub ws_port: u16,
    }

    impl TemplateVars for HotreloadVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__SPRITEGEN_WS_PORT__", &self.ws_port.to_string())
        }
    }

    /// Hot reload client with WebSocket port injection.
    pub const HOTRELOAD_JS: Template<HotreloadVars> =
        Template::new(include_str!("serve/hotreload.js"));

    /// Script tag pointing at [`HOTRELOAD_URL`].
    pub fn hotreload_tag() -> String {
        format!(r#"<script type="module" src="{HOTRELOAD_URL}"></script>"#)
    }
}
