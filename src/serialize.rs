//! Plain text and markup projections of a [`Document`].

use crate::document::{Document, Element, ElementKind, Node};

/// Concatenated leaf text, one line per top-level block.
pub fn to_text(document: &Document) -> String {
    document
        .blocks
        .iter()
        .map(Node::text_content)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escaped markup with tag entities wrapped in `<span>`.
pub fn to_markup(document: &Document) -> String {
    let mut out = String::new();
    for block in &document.blocks {
        write_node(&mut out, block);
    }
    out
}

pub fn serialize_node(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => escape_into(out, text),
        Node::Element(element) => write_element(out, element),
    }
}

fn write_element(out: &mut String, element: &Element) {
    match &element.kind {
        ElementKind::Tag { .. } => {
            out.push_str("<span>");
            write_children(out, &element.children);
            out.push_str("</span>");
        }
        ElementKind::Paragraph | ElementKind::Other(_) => write_children(out, &element.children),
    }
}

fn write_children(out: &mut String, children: &[Node]) {
    for child in children {
        write_node(out, child);
    }
}

pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
