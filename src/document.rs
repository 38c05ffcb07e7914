use std::cmp::Ordering;
use std::fmt;

/// Character that opens a tag mention and prefixes a tag's display text.
pub const TRIGGER_CHAR: char = '#';

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Paragraph,
    /// Inline tag entity. `character` is the tag name without the trigger.
    Tag {
        character: String,
    },
    Other(String),
}

impl ElementKind {
    pub fn name(&self) -> &str {
        match self {
            ElementKind::Paragraph => "paragraph",
            ElementKind::Tag { .. } => "tag",
            ElementKind::Other(name) => name,
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, ElementKind::Tag { .. })
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn paragraph() -> Self {
        Self::new(ElementKind::Paragraph)
    }

    /// Builds a tag entity whose single text leaf is the trigger followed by `character`.
    pub fn tag(character: &str) -> Self {
        Self {
            kind: ElementKind::Tag {
                character: character.to_string(),
            },
            children: vec![Node::text(format!("{TRIGGER_CHAR}{character}"))],
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Element(Element::paragraph().with_children(children))
    }

    pub fn paragraph_text(text: &str) -> Self {
        Self::paragraph(vec![Node::text(text)])
    }

    pub fn tag(character: &str) -> Self {
        Node::Element(Element::tag(character))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Text(_) => None,
            Node::Element(element) => Some(element),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Text(_) => &[],
            Node::Element(element) => &element.children,
        }
    }

    /// In-order concatenation of every descendant text leaf.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Node>,
}

impl Document {
    /// A document holding one empty paragraph.
    pub fn new() -> Self {
        Self {
            blocks: vec![Node::paragraph_text("")],
        }
    }

    pub fn empty() -> Self {
        Self { blocks: Vec::new() }
    }

    pub fn with_blocks(mut self, blocks: Vec<Node>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn node(&self, path: &NodePath) -> Option<&Node> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.blocks.get(*first)?;
        for &idx in rest {
            node = node.as_element()?.children.get(idx)?;
        }
        Some(node)
    }

    pub fn node_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.blocks.get_mut(*first)?;
        for &idx in rest {
            node = match node {
                Node::Element(element) => element.children.get_mut(idx)?,
                Node::Text(_) => return None,
            };
        }
        Some(node)
    }

    pub fn text_at(&self, path: &NodePath) -> Option<&str> {
        self.node(path)?.as_text()
    }

    /// Children of the node at `path`, or the top-level blocks for the empty path.
    pub fn children_at(&self, path: &NodePath) -> Option<&[Node]> {
        if path.is_empty() {
            return Some(&self.blocks);
        }
        match self.node(path)? {
            Node::Element(element) => Some(&element.children),
            Node::Text(_) => None,
        }
    }

    pub fn children_at_mut(&mut self, path: &NodePath) -> Option<&mut Vec<Node>> {
        if path.is_empty() {
            return Some(&mut self.blocks);
        }
        match self.node_mut(path)? {
            Node::Element(element) => Some(&mut element.children),
            Node::Text(_) => None,
        }
    }

    /// Counts every tag entity in the tree, at any depth.
    pub fn tag_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    Node::Text(_) => 0,
                    Node::Element(element) => {
                        usize::from(element.kind.is_tag()) + count(&element.children)
                    }
                })
                .sum()
        }
        count(&self.blocks)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath {
    indices: Vec<usize>,
}

impl NodePath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn last(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    pub fn parent(&self) -> Option<NodePath> {
        let (_, prefix) = self.indices.split_last()?;
        Some(NodePath::new(prefix.to_vec()))
    }

    pub fn child(&self, idx: usize) -> NodePath {
        let mut indices = self.indices.clone();
        indices.push(idx);
        NodePath::new(indices)
    }

    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        self.indices.len() < other.indices.len() && other.indices.starts_with(&self.indices)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self::new(indices)
    }
}

/// Caret location: a text leaf and a character offset inside it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub path: NodePath,
    pub offset: usize,
}

impl Point {
    pub fn new(path: impl Into<NodePath>, offset: usize) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path
            .cmp(&other.path)
            .then(self.offset.cmp(&other.offset))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Range {
    pub anchor: Point,
    pub focus: Point,
}

impl Range {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Start and end of the range in document order.
    pub fn edges(&self) -> (&Point, &Point) {
        if self.anchor <= self.focus {
            (&self.anchor, &self.focus)
        } else {
            (&self.focus, &self.anchor)
        }
    }

    pub fn start(&self) -> &Point {
        self.edges().0
    }

    pub fn end(&self) -> &Point {
        self.edges().1
    }
}
