use super::blocks::{is_inline_node, new_block_like, normalize_block, normalize_inline_children};
use super::content::{char_len, insert_str_at, split_text};
use super::positions::Location;
use super::{Direction, DocumentEditor, DocumentEngine, EngineError, Unit};
use crate::document::{Document, Node, NodePath, Point, Range};

impl DocumentEditor {
    fn caret_location(&self) -> Result<Location, EngineError> {
        let selection = self.selection.as_ref().ok_or(EngineError::NoSelection)?;
        self.locate(&selection.focus)
    }

    /// Removes the selected content and leaves a collapsed caret in its place.
    fn collapse_selection(&mut self) -> Result<Location, EngineError> {
        let selection = self.selection.clone().ok_or(EngineError::NoSelection)?;
        if !selection.is_collapsed() {
            self.delete_range(&selection)?;
        }
        self.caret_location()
    }

    fn set_caret_at_unit(&mut self, block_path: &NodePath, unit: usize) {
        self.selection = self
            .point_at_unit(block_path, unit)
            .or_else(|| self.document_start())
            .map(Range::collapsed);
    }

    pub fn delete_range(&mut self, range: &Range) -> Result<(), EngineError> {
        let (start, end) = range.edges();
        let start = self.locate(start)?;
        let end = self.locate(end)?;
        let blocks = self.text_blocks();

        let start_children = self.block_children(&start.block_path).to_vec();
        let end_children = if start.block_index == end.block_index {
            start_children.clone()
        } else {
            self.block_children(&end.block_path).to_vec()
        };
        let left = leaf_text(&start_children, start.child);
        let right = leaf_text(&end_children, end.child);
        let (kept_left, _) = split_text(left, start.offset);
        let (_, kept_right) = split_text(right, end.offset);

        let mut merged: Vec<Node> = start_children[..start.child].to_vec();
        merged.push(Node::Text(kept_left + &kept_right));
        merged.extend_from_slice(&end_children[end.child + 1..]);
        normalize_inline_children(&mut merged);

        // Later blocks go first so earlier paths stay valid.
        for block_index in (start.block_index + 1..=end.block_index).rev() {
            remove_node(&mut self.document, &blocks[block_index]);
        }
        if let Some(children) = self.document.children_at_mut(&start.block_path) {
            *children = merged;
        }
        self.set_caret_at_unit(&start.block_path, start.unit);
        Ok(())
    }

    pub(crate) fn insert_text_at_selection(&mut self, text: &str) -> Result<(), EngineError> {
        let location = self.collapse_selection()?;
        if text.is_empty() {
            return Ok(());
        }
        let Some(Node::Text(leaf)) = self
            .document
            .children_at_mut(&location.block_path)
            .and_then(|children| children.get_mut(location.child))
        else {
            return Err(EngineError::InvalidPoint(Point::new(
                location.block_path.child(location.child),
                location.offset,
            )));
        };
        insert_str_at(leaf, location.offset, text);
        let caret = Point::new(
            location.block_path.child(location.child),
            location.offset + char_len(text),
        );
        self.selection = Some(Range::collapsed(caret));
        Ok(())
    }

    pub(crate) fn insert_node_at_selection(&mut self, node: Node) -> Result<(), EngineError> {
        if let Node::Text(text) = &node {
            return self.insert_text_at_selection(text);
        }
        let location = self.collapse_selection()?;

        if is_inline_node(&node, self.rules.as_ref()) {
            let children = self
                .document
                .children_at_mut(&location.block_path)
                .ok_or(EngineError::NoSelection)?;
            let leaf = leaf_text(children, location.child).to_string();
            let (left, right) = split_text(&leaf, location.offset);
            children.remove(location.child);
            children.insert(location.child, Node::Text(right));
            children.insert(location.child, node);
            children.insert(location.child, Node::Text(left));
            normalize_inline_children(children);
            self.set_caret_at_unit(&location.block_path, location.unit);
            return Ok(());
        }

        let mut node = node;
        normalize_block(&mut node, self.rules.as_ref());
        let parent = location.block_path.parent().unwrap_or_default();
        let index = location.block_path.last().unwrap_or(0) + 1;
        let siblings = self
            .document
            .children_at_mut(&parent)
            .ok_or(EngineError::NoSelection)?;
        siblings.insert(index.min(siblings.len()), node);
        let inserted = parent.child(index);
        let caret = self
            .text_blocks()
            .into_iter()
            .find(|path| *path == inserted || inserted.is_ancestor_of(path))
            .and_then(|path| self.point_at_unit(&path, 0));
        if let Some(caret) = caret {
            self.selection = Some(Range::collapsed(caret));
        }
        Ok(())
    }

    /// Splits the current text block at the caret.
    pub fn insert_break(&mut self) -> Result<(), EngineError> {
        let location = self.collapse_selection()?;
        let Some(Node::Element(block)) = self.document.node(&location.block_path).cloned() else {
            return Err(EngineError::NoSelection);
        };
        let leaf = leaf_text(&block.children, location.child);
        let (left, right) = split_text(leaf, location.offset);

        let mut head: Vec<Node> = block.children[..location.child].to_vec();
        head.push(Node::Text(left));
        let mut tail = vec![Node::Text(right)];
        tail.extend_from_slice(&block.children[location.child + 1..]);
        let new_block = new_block_like(&block, tail);

        if let Some(children) = self.document.children_at_mut(&location.block_path) {
            normalize_inline_children(&mut head);
            *children = head;
        }
        let parent = location.block_path.parent().unwrap_or_default();
        let index = location.block_path.last().unwrap_or(0) + 1;
        if let Some(siblings) = self.document.children_at_mut(&parent) {
            siblings.insert(index, new_block);
        }
        self.set_caret_at_unit(&parent.child(index), 0);
        Ok(())
    }

    pub fn delete(&mut self, direction: Direction, unit: Unit) -> Result<(), EngineError> {
        let selection = self.selection.clone().ok_or(EngineError::NoSelection)?;
        if !selection.is_collapsed() {
            return self.delete_range(&selection);
        }
        let target = self
            .step(&selection.focus, direction, unit)
            .ok_or(EngineError::NoPosition)?;
        self.delete_range(&Range::new(target, selection.focus))
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.insert_text(ch.encode_utf8(&mut buf)).is_ok()
    }

    pub fn backspace(&mut self) -> bool {
        self.delete(Direction::Backward, Unit::Character).is_ok()
    }

    pub fn delete_forward(&mut self) -> bool {
        self.delete(Direction::Forward, Unit::Character).is_ok()
    }

    pub fn move_left(&mut self) -> bool {
        self.move_caret(Direction::Backward, Unit::Character).is_ok()
    }

    pub fn move_right(&mut self) -> bool {
        self.move_caret(Direction::Forward, Unit::Character).is_ok()
    }

    pub fn move_word_left(&mut self) -> bool {
        self.move_caret(Direction::Backward, Unit::Word).is_ok()
    }

    pub fn move_word_right(&mut self) -> bool {
        self.move_caret(Direction::Forward, Unit::Word).is_ok()
    }

    pub fn move_to_block_start(&mut self) -> bool {
        self.move_to(|editor, caret| editor.block_boundary(caret, Direction::Backward))
    }

    pub fn move_to_block_end(&mut self) -> bool {
        self.move_to(|editor, caret| editor.block_boundary(caret, Direction::Forward))
    }

    pub fn move_up(&mut self) -> bool {
        self.move_to(|editor, caret| editor.vertical_neighbor(caret, Direction::Backward))
    }

    pub fn move_down(&mut self) -> bool {
        self.move_to(|editor, caret| editor.vertical_neighbor(caret, Direction::Forward))
    }

    fn move_to<F>(&mut self, target: F) -> bool
    where
        F: FnOnce(&Self, &Point) -> Option<Point>,
    {
        let Some(caret) = self.selection.as_ref().map(|range| range.focus.clone()) else {
            return false;
        };
        match target(self, &caret) {
            Some(point) if point != caret => {
                self.selection = Some(Range::collapsed(point));
                true
            }
            _ => false,
        }
    }
}

fn leaf_text(children: &[Node], idx: usize) -> &str {
    children.get(idx).and_then(Node::as_text).unwrap_or("")
}

fn remove_node(document: &mut Document, path: &NodePath) {
    let (Some(parent), Some(idx)) = (path.parent(), path.last()) else {
        return;
    };
    if let Some(siblings) = document.children_at_mut(&parent) {
        if idx < siblings.len() {
            siblings.remove(idx);
        }
    }
}
