use std::fmt::Write;

use super::{NodeId, Scene, Tag};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Serializes the subtree rooted at `root` as SVG markup.
///
/// Output is deterministic: attributes appear in the order they were first
/// set, children in paint order. An `<svg>` root gets the SVG namespace unless
/// it already carries one.
pub fn write_svg(scene: &Scene, root: NodeId) -> String {
    let mut out = String::new();
    write_node(scene, root, &mut out, true);
    out
}

fn write_node(scene: &Scene, id: NodeId, out: &mut String, is_root: bool) {
    let Some(el) = scene.get(id) else { return };
    let name = el.tag().as_str();

    out.push('<');
    out.push_str(name);
    if is_root && el.tag() == Tag::Svg && el.attr("xmlns").is_none() {
        let _ = write!(out, " xmlns=\"{SVG_NS}\"");
    }
    for (key, value) in el.attrs() {
        let _ = write!(out, " {key}=\"{}\"", escape(value));
    }

    if el.children().is_empty() && el.text().is_none() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    if let Some(text) = el.text() {
        out.push_str(&escape(text));
    }
    for &child in el.children() {
        write_node(scene, child, out, false);
    }
    let _ = write!(out, "</{name}>");
}

fn escape(raw: &str) -> String {
    let mut s = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            c => s.push(c),
        }
    }
    s
}
