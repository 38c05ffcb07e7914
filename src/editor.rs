use std::fmt;

use crate::document::{Document, Node, NodePath, Point, Range};

mod blocks;
mod content;
mod positions;
mod rules;
mod transforms;

pub use content::{char_len, char_to_byte_idx, next_word_boundary, previous_word_boundary};
pub use rules::{DefaultRules, ElementRules};

use blocks::{normalize_document, text_block_paths};

/// Step size for caret queries and movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Character,
    Word,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// The point does not address a caret position in a text block.
    InvalidPoint(Point),
    InvalidRange(Range),
    NoSelection,
    /// The caret cannot move any further in the requested direction.
    NoPosition,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidPoint(point) => write!(
                f,
                "point {:?}@{} does not resolve to a caret position",
                point.path.indices(),
                point.offset
            ),
            EngineError::InvalidRange(range) => write!(
                f,
                "range {:?}@{}..{:?}@{} does not resolve",
                range.anchor.path.indices(),
                range.anchor.offset,
                range.focus.path.indices(),
                range.focus.offset
            ),
            EngineError::NoSelection => f.write_str("editor has no selection"),
            EngineError::NoPosition => f.write_str("no caret position in that direction"),
        }
    }
}

impl std::error::Error for EngineError {}

/// The document engine primitives the mention controller relies on.
pub trait DocumentEngine {
    type Checkpoint;

    fn document(&self) -> &Document;
    fn selection(&self) -> Option<&Range>;

    /// Caret position one `unit` before `point`, if any.
    fn before(&self, point: &Point, unit: Unit) -> Option<Point>;
    /// Caret position one `unit` after `point`, if any.
    fn after(&self, point: &Point, unit: Unit) -> Option<Point>;

    fn range(&self, start: &Point, end: &Point) -> Range {
        Range::new(start.clone(), end.clone())
    }

    /// Text covered by `range`. Void element text is skipped and text blocks
    /// are separated by a newline.
    fn string(&self, range: &Range) -> String;
    fn is_valid_range(&self, range: &Range) -> bool;

    fn select(&mut self, range: Range) -> Result<(), EngineError>;
    /// Replaces the selection with `node`. The caret ends up in front of an
    /// inserted inline element.
    fn insert_node(&mut self, node: Node) -> Result<(), EngineError>;
    fn insert_text(&mut self, text: &str) -> Result<(), EngineError>;
    fn move_caret(&mut self, direction: Direction, unit: Unit) -> Result<(), EngineError>;

    fn checkpoint(&self) -> Self::Checkpoint;
    fn restore(&mut self, checkpoint: Self::Checkpoint);
}

#[derive(Clone, Debug)]
pub struct EditorCheckpoint {
    document: Document,
    selection: Option<Range>,
}

pub struct DocumentEditor {
    document: Document,
    selection: Option<Range>,
    rules: Box<dyn ElementRules>,
}

impl DocumentEditor {
    pub fn new(document: Document) -> Self {
        Self::with_rules(document, DefaultRules)
    }

    pub fn with_rules(document: Document, rules: impl ElementRules + 'static) -> Self {
        let mut editor = Self {
            document,
            selection: None,
            rules: Box::new(rules),
        };
        editor.renormalize();
        editor
    }

    pub fn rules(&self) -> &dyn ElementRules {
        self.rules.as_ref()
    }

    pub fn caret(&self) -> Option<&Point> {
        self.selection
            .as_ref()
            .filter(|range| range.is_collapsed())
            .map(|range| &range.focus)
    }

    pub fn text_blocks(&self) -> Vec<NodePath> {
        text_block_paths(&self.document, self.rules.as_ref())
    }

    fn renormalize(&mut self) {
        normalize_document(&mut self.document, self.rules.as_ref());
        let keep = self
            .selection
            .as_ref()
            .is_some_and(|range| self.is_valid_range(range));
        if !keep {
            self.selection = self.document_start().map(Range::collapsed);
        }
    }

    pub fn set_caret(&mut self, point: Point) -> Result<(), EngineError> {
        self.select(Range::collapsed(point))
    }
}

impl DocumentEngine for DocumentEditor {
    type Checkpoint = EditorCheckpoint;

    fn document(&self) -> &Document {
        &self.document
    }

    fn selection(&self) -> Option<&Range> {
        self.selection.as_ref()
    }

    fn before(&self, point: &Point, unit: Unit) -> Option<Point> {
        self.step(point, Direction::Backward, unit)
    }

    fn after(&self, point: &Point, unit: Unit) -> Option<Point> {
        self.step(point, Direction::Forward, unit)
    }

    fn string(&self, range: &Range) -> String {
        self.text_in_range(range).unwrap_or_default()
    }

    fn is_valid_range(&self, range: &Range) -> bool {
        self.locate(&range.anchor).is_ok() && self.locate(&range.focus).is_ok()
    }

    fn select(&mut self, range: Range) -> Result<(), EngineError> {
        if !self.is_valid_range(&range) {
            return Err(EngineError::InvalidRange(range));
        }
        self.selection = Some(range);
        Ok(())
    }

    fn insert_node(&mut self, node: Node) -> Result<(), EngineError> {
        self.insert_node_at_selection(node)
    }

    fn insert_text(&mut self, text: &str) -> Result<(), EngineError> {
        self.insert_text_at_selection(text)
    }

    fn move_caret(&mut self, direction: Direction, unit: Unit) -> Result<(), EngineError> {
        let selection = self.selection.clone().ok_or(EngineError::NoSelection)?;
        if !selection.is_collapsed() {
            let (start, end) = selection.edges();
            let edge = match direction {
                Direction::Backward => start.clone(),
                Direction::Forward => end.clone(),
            };
            self.selection = Some(Range::collapsed(edge));
            return Ok(());
        }
        let target = self
            .step(&selection.focus, direction, unit)
            .ok_or(EngineError::NoPosition)?;
        self.selection = Some(Range::collapsed(target));
        Ok(())
    }

    fn checkpoint(&self) -> EditorCheckpoint {
        EditorCheckpoint {
            document: self.document.clone(),
            selection: self.selection.clone(),
        }
    }

    fn restore(&mut self, checkpoint: EditorCheckpoint) {
        self.document = checkpoint.document;
        self.selection = checkpoint.selection;
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod editor_tests;
