//! SVG optimization using usvg.
//!
//! usvg parses the icon into a simplified tree (resolved styles, flattened
//! groups, shapes as paths) and writes it back as minimal markup.

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

use super::OptimizerConfig;

/// Errors raised while optimizing a single icon.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("invalid SVG: {0}")]
    Parse(#[from] usvg::Error),

    #[error("failed to rewrite optimized markup: {0}")]
    Rewrite(#[from] quick_xml::Error),
}

/// Optimize SVG text with the resolved configuration.
pub fn optimize_svg(content: &str, config: &OptimizerConfig) -> Result<String, OptimizeError> {
    let usvg_options = usvg::Options {
        dpi: config.dpi,
        ..Default::default()
    };

    let tree = usvg::Tree::from_str(content, &usvg_options)?;

    let write_options = usvg::WriteOptions {
        id_prefix: config.id_prefix.clone(),
        preserve_text: config.preserve_text,
        coordinates_precision: config.coordinates_precision,
        transforms_precision: config.transforms_precision,
        indent: indent(config.indent),
        ..Default::default()
    };

    let optimized = tree.to_string(&write_options);

    // usvg bakes the source viewBox into transforms and writes none back;
    // the tree size is the user space the written paths live in.
    if config.remove_view_box {
        return rewrite_root_attributes(&optimized, &["viewBox"], None);
    }
    let size = tree.size();
    let view_box = format!("0 0 {} {}", size.width(), size.height());
    rewrite_root_attributes(&optimized, &[], Some(("viewBox", &view_box)))
}

#[inline]
fn indent(width: u8) -> usvg::Indent {
    match width {
        0 => usvg::Indent::None,
        n => usvg::Indent::Spaces(n),
    }
}

/// Rewrite the root `<svg>` start tag: drop the `remove` attributes and
/// set `set`, replacing any existing value in place.
///
/// Everything outside the root start tag is kept byte for byte.
pub(crate) fn rewrite_root_attributes(
    svg: &str,
    remove: &[&str],
    set: Option<(&str, &str)>,
) -> Result<String, OptimizeError> {
    let mut reader = Reader::from_str(svg);

    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(tag) | Event::Empty(tag) if tag.local_name().as_ref() == b"svg" => {
                let end = reader.buffer_position() as usize;
                let self_closing = svg[start..end].ends_with("/>");

                let mut rebuilt = String::with_capacity(end - start + 32);
                rebuilt.push('<');
                rebuilt.push_str(&String::from_utf8_lossy(tag.name().as_ref()));

                let mut pending = set;
                for attr in tag.attributes() {
                    let attr = attr.map_err(quick_xml::Error::from)?;
                    let key = String::from_utf8_lossy(attr.key.as_ref());
                    if remove.contains(&key.as_ref()) {
                        continue;
                    }
                    match pending {
                        Some((name, value)) if name == key => {
                            push_attribute(&mut rebuilt, name, value);
                            pending = None;
                        }
                        _ => push_attribute(&mut rebuilt, &key, &String::from_utf8_lossy(&attr.value)),
                    }
                }
                if let Some((name, value)) = pending {
                    push_attribute(&mut rebuilt, name, value);
                }
                rebuilt.push_str(if self_closing { "/>" } else { ">" });

                return Ok(format!("{}{}{}", &svg[..start], rebuilt, &svg[end..]));
            }
            Event::Eof => return Ok(svg.to_string()),
            _ => {}
        }
    }
}

/// Append ` name="value"`; `value` is taken as already escaped.
fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(value);
    out.push('"');
}
