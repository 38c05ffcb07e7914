use crate::document::Range;

/// An open mention: the trigger text being typed and the highlighted suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MentionSession {
    anchor: Range,
    query: String,
    highlighted: usize,
}

impl MentionSession {
    pub fn new(anchor: Range, query: impl Into<String>) -> Self {
        Self {
            anchor,
            query: query.into(),
            highlighted: 0,
        }
    }

    /// Range covering the trigger character and the query.
    pub fn anchor(&self) -> &Range {
        &self.anchor
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Highlighted position clamped to a list of `count` candidates.
    pub fn highlighted_index(&self, count: usize) -> usize {
        if count == 0 { 0 } else { self.highlighted % count }
    }

    pub fn navigate_down(&mut self, count: usize) {
        if count == 0 {
            self.highlighted = 0;
            return;
        }
        self.highlighted = (self.highlighted_index(count) + 1) % count;
    }

    pub fn navigate_up(&mut self, count: usize) {
        if count == 0 {
            self.highlighted = 0;
            return;
        }
        self.highlighted = (self.highlighted_index(count) + count - 1) % count;
    }
}
