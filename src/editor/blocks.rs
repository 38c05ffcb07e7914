use std::mem;

use super::content::char_len;
use super::rules::ElementRules;
use crate::document::{Document, Element, Node, NodePath};

pub(crate) fn is_inline_node(node: &Node, rules: &dyn ElementRules) -> bool {
    match node {
        Node::Text(_) => true,
        Node::Element(element) => rules.is_inline(&element.kind),
    }
}

fn is_block_node(node: &Node, rules: &dyn ElementRules) -> bool {
    !is_inline_node(node, rules)
}

/// Paths of every text block in document order.
///
/// A text block is a non-inline element holding only text leaves and inline
/// elements. Void blocks are skipped because the caret can never enter them.
pub(crate) fn text_block_paths(document: &Document, rules: &dyn ElementRules) -> Vec<NodePath> {
    let mut result = Vec::new();
    collect_text_blocks(&document.blocks, &NodePath::root(), rules, &mut result);
    result
}

fn collect_text_blocks(
    nodes: &[Node],
    parent: &NodePath,
    rules: &dyn ElementRules,
    out: &mut Vec<NodePath>,
) {
    for (idx, node) in nodes.iter().enumerate() {
        let Node::Element(element) = node else {
            continue;
        };
        if rules.is_inline(&element.kind) || rules.is_void(&element.kind) {
            continue;
        }
        let path = parent.child(idx);
        if element
            .children
            .iter()
            .all(|child| is_inline_node(child, rules))
        {
            out.push(path);
        } else {
            collect_text_blocks(&element.children, &path, rules, out);
        }
    }
}

pub(crate) fn normalize_document(document: &mut Document, rules: &dyn ElementRules) {
    let blocks = mem::take(&mut document.blocks);
    document.blocks = wrap_inline_runs(blocks, rules);
    if document.blocks.is_empty() {
        document.blocks.push(Node::paragraph(Vec::new()));
    }
    for block in &mut document.blocks {
        normalize_block(block, rules);
    }
}

fn wrap_inline_runs(nodes: Vec<Node>, rules: &dyn ElementRules) -> Vec<Node> {
    let mut result = Vec::with_capacity(nodes.len());
    let mut run = Vec::new();
    for node in nodes {
        if is_inline_node(&node, rules) {
            run.push(node);
            continue;
        }
        if !run.is_empty() {
            result.push(Node::paragraph(mem::take(&mut run)));
        }
        result.push(node);
    }
    if !run.is_empty() {
        result.push(Node::paragraph(run));
    }
    result
}

pub(crate) fn normalize_block(node: &mut Node, rules: &dyn ElementRules) {
    let Node::Element(element) = node else {
        return;
    };
    if rules.is_inline(&element.kind) || rules.is_void(&element.kind) {
        return;
    }
    if element
        .children
        .iter()
        .any(|child| is_block_node(child, rules))
    {
        let children = mem::take(&mut element.children);
        element.children = wrap_inline_runs(children, rules);
        for child in &mut element.children {
            normalize_block(child, rules);
        }
    } else {
        normalize_inline_children(&mut element.children);
    }
}

/// Merges adjacent text leaves and makes sure a text leaf sits at both ends
/// of the block and between any two inline elements.
pub(crate) fn normalize_inline_children(children: &mut Vec<Node>) {
    let mut result: Vec<Node> = Vec::with_capacity(children.len() + 2);
    for child in mem::take(children) {
        match child {
            Node::Text(text) => {
                if let Some(Node::Text(last)) = result.last_mut() {
                    last.push_str(&text);
                } else {
                    result.push(Node::Text(text));
                }
            }
            element @ Node::Element(_) => {
                if !matches!(result.last(), Some(Node::Text(_))) {
                    result.push(Node::text(""));
                }
                result.push(element);
            }
        }
    }
    if !matches!(result.last(), Some(Node::Text(_))) {
        result.push(Node::text(""));
    }
    *children = result;
}

/// Width of a child in caret units. Inline elements are a single unit.
pub(crate) fn unit_len(node: &Node) -> usize {
    match node {
        Node::Text(text) => char_len(text),
        Node::Element(_) => 1,
    }
}

pub(crate) fn block_unit_len(children: &[Node]) -> usize {
    children.iter().map(unit_len).sum()
}

pub(crate) fn unit_offset(children: &[Node], child: usize, offset: usize) -> usize {
    children[..child.min(children.len())]
        .iter()
        .map(unit_len)
        .sum::<usize>()
        + offset
}

/// Maps a unit offset back to (child index, character offset). Positions on a
/// text boundary resolve to the end of the earlier text leaf.
pub(crate) fn resolve_unit(children: &[Node], unit: usize) -> Option<(usize, usize)> {
    let mut remaining = unit;
    for (idx, child) in children.iter().enumerate() {
        match child {
            Node::Text(text) => {
                let len = char_len(text);
                if remaining <= len {
                    return Some((idx, remaining));
                }
                remaining -= len;
            }
            Node::Element(_) => {
                remaining = remaining.checked_sub(1)?;
            }
        }
    }
    None
}

pub(crate) fn new_block_like(block: &Element, children: Vec<Node>) -> Node {
    let mut children = children;
    normalize_inline_children(&mut children);
    Node::Element(Element::new(block.kind.clone()).with_children(children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::rules::DefaultRules;
    use crate::document::ElementKind;

    struct InlineTags;

    impl ElementRules for InlineTags {
        fn is_inline(&self, kind: &ElementKind) -> bool {
            kind.is_tag()
        }

        fn is_void(&self, kind: &ElementKind) -> bool {
            kind.is_tag()
        }
    }

    #[test]
    fn normalization_pads_inline_elements_with_text() {
        let mut children = vec![Node::tag("a"), Node::tag("b")];
        normalize_inline_children(&mut children);
        assert_eq!(
            children,
            vec![
                Node::text(""),
                Node::tag("a"),
                Node::text(""),
                Node::tag("b"),
                Node::text(""),
            ]
        );
    }

    #[test]
    fn normalization_merges_adjacent_text() {
        let mut children = vec![Node::text("ab"), Node::text("cd")];
        normalize_inline_children(&mut children);
        assert_eq!(children, vec![Node::text("abcd")]);
    }

    #[test]
    fn top_level_inline_runs_are_wrapped_in_paragraphs() {
        let mut document = Document::empty().with_blocks(vec![
            Node::paragraph_text("See "),
            Node::tag("liver"),
            Node::text(" scan"),
        ]);
        normalize_document(&mut document, &InlineTags);
        assert_eq!(document.blocks.len(), 2);
        assert_eq!(
            document.blocks[1],
            Node::paragraph(vec![Node::text(""), Node::tag("liver"), Node::text(" scan")])
        );
    }

    #[test]
    fn empty_document_gains_a_paragraph() {
        let mut document = Document::empty();
        normalize_document(&mut document, &DefaultRules);
        assert_eq!(document.blocks, vec![Node::paragraph_text("")]);
    }

    #[test]
    fn text_blocks_descend_into_containers() {
        let quote = Node::Element(
            Element::new(ElementKind::Other("quote".into()))
                .with_children(vec![Node::paragraph_text("a"), Node::paragraph_text("b")]),
        );
        let document = Document::empty().with_blocks(vec![Node::paragraph_text("x"), quote]);
        let paths = text_block_paths(&document, &DefaultRules);
        assert_eq!(
            paths,
            vec![
                NodePath::new(vec![0]),
                NodePath::new(vec![1, 0]),
                NodePath::new(vec![1, 1]),
            ]
        );
    }

    #[test]
    fn unit_resolution_prefers_end_of_earlier_text() {
        let children = vec![Node::text("ab"), Node::tag("x"), Node::text("c")];
        assert_eq!(block_unit_len(&children), 4);
        assert_eq!(resolve_unit(&children, 2), Some((0, 2)));
        assert_eq!(resolve_unit(&children, 3), Some((2, 0)));
        assert_eq!(resolve_unit(&children, 4), Some((2, 1)));
        assert_eq!(resolve_unit(&children, 5), None);
        assert_eq!(unit_offset(&children, 2, 1), 4);
    }
}
