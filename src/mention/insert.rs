use std::fmt;

use crate::document::{Node, Range};
use crate::editor::{Direction, DocumentEngine, EngineError, Unit};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertError {
    EmptyTag,
    /// No mention is open, so there is nothing to accept.
    NoSession,
    /// The anchor no longer addresses text in the document.
    StaleAnchor(Range),
    Engine(EngineError),
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::EmptyTag => f.write_str("tag text is empty"),
            InsertError::NoSession => f.write_str("no mention is open"),
            InsertError::StaleAnchor(range) => write!(
                f,
                "mention anchor {:?}@{}..{:?}@{} is stale",
                range.anchor.path.indices(),
                range.anchor.offset,
                range.focus.path.indices(),
                range.focus.offset
            ),
            InsertError::Engine(err) => write!(f, "engine rejected the insertion: {err}"),
        }
    }
}

impl std::error::Error for InsertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InsertError::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EngineError> for InsertError {
    fn from(err: EngineError) -> Self {
        InsertError::Engine(err)
    }
}

/// Replaces `anchor` with a tag entity for `tag` followed by a space.
///
/// Either every step applies or the engine is left as it was.
pub fn insert_tag<E: DocumentEngine + ?Sized>(
    engine: &mut E,
    anchor: &Range,
    tag: &str,
) -> Result<(), InsertError> {
    if tag.is_empty() {
        return Err(InsertError::EmptyTag);
    }
    if !engine.is_valid_range(anchor) {
        return Err(InsertError::StaleAnchor(anchor.clone()));
    }

    let checkpoint = engine.checkpoint();
    if let Err(err) = apply_insertion(engine, anchor, tag) {
        engine.restore(checkpoint);
        return Err(err.into());
    }
    Ok(())
}

fn apply_insertion<E: DocumentEngine + ?Sized>(
    engine: &mut E,
    anchor: &Range,
    tag: &str,
) -> Result<(), EngineError> {
    engine.select(anchor.clone())?;
    engine.insert_node(Node::tag(tag))?;
    engine.move_caret(Direction::Forward, Unit::Character)?;
    engine.insert_text(" ")
}
