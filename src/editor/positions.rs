use super::blocks::{block_unit_len, resolve_unit, text_block_paths, unit_offset};
use super::content::{char_len, char_slice, next_word_boundary, previous_word_boundary};
use super::{Direction, DocumentEditor, EngineError, Unit};
use crate::document::{Node, NodePath, Point, Range};

/// A point resolved against the current tree.
#[derive(Clone, Debug)]
pub(crate) struct Location {
    /// Index into the document's text block list.
    pub block_index: usize,
    pub block_path: NodePath,
    /// Child index of the text leaf inside the block.
    pub child: usize,
    pub offset: usize,
    /// Offset in caret units from the start of the block.
    pub unit: usize,
}

impl DocumentEditor {
    pub(crate) fn block_children(&self, block_path: &NodePath) -> &[Node] {
        self.document.children_at(block_path).unwrap_or(&[])
    }

    pub(crate) fn locate(&self, point: &Point) -> Result<Location, EngineError> {
        let invalid = || EngineError::InvalidPoint(point.clone());
        let block_path = point.path.parent().ok_or_else(invalid)?;
        let child = point.path.last().ok_or_else(invalid)?;
        let blocks = text_block_paths(&self.document, self.rules.as_ref());
        let block_index = blocks
            .iter()
            .position(|path| *path == block_path)
            .ok_or_else(invalid)?;
        let children = self.block_children(&block_path);
        let Some(Node::Text(text)) = children.get(child) else {
            return Err(invalid());
        };
        if point.offset > char_len(text) {
            return Err(invalid());
        }
        Ok(Location {
            block_index,
            unit: unit_offset(children, child, point.offset),
            block_path,
            child,
            offset: point.offset,
        })
    }

    pub(crate) fn point_at_unit(&self, block_path: &NodePath, unit: usize) -> Option<Point> {
        let (child, offset) = resolve_unit(self.block_children(block_path), unit)?;
        Some(Point::new(block_path.child(child), offset))
    }

    fn block_start(&self, block_path: &NodePath) -> Option<Point> {
        self.point_at_unit(block_path, 0)
    }

    fn block_end(&self, block_path: &NodePath) -> Option<Point> {
        let len = block_unit_len(self.block_children(block_path));
        self.point_at_unit(block_path, len)
    }

    pub fn document_start(&self) -> Option<Point> {
        let blocks = text_block_paths(&self.document, self.rules.as_ref());
        self.block_start(blocks.first()?)
    }

    pub fn document_end(&self) -> Option<Point> {
        let blocks = text_block_paths(&self.document, self.rules.as_ref());
        self.block_end(blocks.last()?)
    }

    pub(crate) fn block_boundary(&self, point: &Point, direction: Direction) -> Option<Point> {
        let location = self.locate(point).ok()?;
        match direction {
            Direction::Backward => self.block_start(&location.block_path),
            Direction::Forward => self.block_end(&location.block_path),
        }
    }

    /// Same unit offset in the neighbouring text block, clamped to its length.
    pub(crate) fn vertical_neighbor(&self, point: &Point, direction: Direction) -> Option<Point> {
        let location = self.locate(point).ok()?;
        let blocks = text_block_paths(&self.document, self.rules.as_ref());
        let target = match direction {
            Direction::Backward => blocks.get(location.block_index.checked_sub(1)?)?,
            Direction::Forward => blocks.get(location.block_index + 1)?,
        };
        let len = block_unit_len(self.block_children(target));
        self.point_at_unit(target, location.unit.min(len))
    }

    pub(crate) fn step(&self, point: &Point, direction: Direction, unit: Unit) -> Option<Point> {
        let location = self.locate(point).ok()?;
        let children = self.block_children(&location.block_path);
        let text = children.get(location.child)?.as_text()?;

        if unit == Unit::Word {
            let within_leaf = match direction {
                Direction::Backward if location.offset > 0 => {
                    Some(previous_word_boundary(text, location.offset))
                }
                Direction::Forward if location.offset < char_len(text) => {
                    Some(next_word_boundary(text, location.offset))
                }
                _ => None,
            };
            if let Some(offset) = within_leaf {
                return Some(Point::new(point.path.clone(), offset));
            }
        }

        let blocks = text_block_paths(&self.document, self.rules.as_ref());
        match direction {
            Direction::Backward => {
                if location.unit > 0 {
                    return self.point_at_unit(&location.block_path, location.unit - 1);
                }
                let previous = blocks.get(location.block_index.checked_sub(1)?)?;
                self.block_end(previous)
            }
            Direction::Forward => {
                if location.unit < block_unit_len(children) {
                    return self.point_at_unit(&location.block_path, location.unit + 1);
                }
                let next = blocks.get(location.block_index + 1)?;
                self.block_start(next)
            }
        }
    }

    pub(crate) fn text_in_range(&self, range: &Range) -> Result<String, EngineError> {
        let (start, end) = range.edges();
        let start = self.locate(start)?;
        let end = self.locate(end)?;
        let blocks = text_block_paths(&self.document, self.rules.as_ref());

        let mut pieces = Vec::new();
        for block_index in start.block_index..=end.block_index {
            let block_path = &blocks[block_index];
            let children = self.block_children(block_path);
            let from = if block_index == start.block_index {
                start.unit
            } else {
                0
            };
            let to = if block_index == end.block_index {
                end.unit
            } else {
                block_unit_len(children)
            };
            pieces.push(text_between_units(children, from, to));
        }
        Ok(pieces.join("\n"))
    }
}

fn text_between_units(children: &[Node], from: usize, to: usize) -> String {
    let mut out = String::new();
    let mut position = 0;
    for child in children {
        match child {
            Node::Text(text) => {
                let len = char_len(text);
                let start = from.max(position);
                let end = to.min(position + len);
                if start < end {
                    out.push_str(char_slice(text, start - position, end - position));
                }
                position += len;
            }
            Node::Element(_) => position += 1,
        }
    }
    out
}
