//! Dev-time module handling for files served from the project root.
//!
//! Browsers cannot resolve bare `virtual:` specifiers, so served scripts get
//! them rewritten to the dev server's module route.

use std::borrow::Cow;

use crate::session::VIRTUAL_MODULE_ID;

/// URL prefix under which importable module ids are served.
pub const MODULE_ROUTE: &str = "/@id/";

/// Dev server URL of an importable id.
pub fn module_url(id: &str) -> String {
    format!("{MODULE_ROUTE}{id}")
}

/// Whether a served file goes through the source transform.
pub fn is_module_source(path: &std::path::Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("js" | "mjs" | "svg")
    )
}

/// Point quoted `virtual:svg-sprite-gen` specifiers at [`MODULE_ROUTE`].
pub fn rewrite_virtual_imports(code: &str) -> Cow<'_, str> {
    if !code.contains(VIRTUAL_MODULE_ID) {
        return Cow::Borrowed(code);
    }

    let url = module_url(VIRTUAL_MODULE_ID);
    let mut out = code.to_string();
    for quote in ['"', '\''] {
        out = out.replace(
            &format!("{quote}{VIRTUAL_MODULE_ID}{quote}"),
            &format!("{quote}{url}{quote}"),
        );
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_rewrite_virtual_imports() {
        let code = "import sprite from \"virtual:svg-sprite-gen\";\nimport x from './x.js';";
        assert_eq!(
            rewrite_virtual_imports(code),
            "import sprite from \"/@id/virtual:svg-sprite-gen\";\nimport x from './x.js';"
        );
        assert_eq!(
            rewrite_virtual_imports("import 'virtual:svg-sprite-gen';"),
            "import '/@id/virtual:svg-sprite-gen';"
        );
    }

    #[test]
    fn test_rewrite_leaves_other_code() {
        let code = "const s = 'virtual:svg-sprite-gen-extra';";
        assert!(matches!(rewrite_virtual_imports("export {}"), Cow::Borrowed(_)));
        assert_eq!(rewrite_virtual_imports(code), code);
    }

    #[test]
    fn test_is_module_source() {
        assert!(is_module_source(Path::new("main.js")));
        assert!(is_module_source(Path::new("icons/home.svg")));
        assert!(!is_module_source(Path::new("index.html")));
    }
}
