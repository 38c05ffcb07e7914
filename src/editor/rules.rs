use crate::document::ElementKind;

/// Structural predicates the engine consults for every element.
///
/// Inline elements never break a line. Void elements are atomic: the caret
/// cannot enter them and their text is not editable.
pub trait ElementRules {
    fn is_inline(&self, kind: &ElementKind) -> bool;
    fn is_void(&self, kind: &ElementKind) -> bool;
}

/// Every element is a non-void block.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultRules;

impl ElementRules for DefaultRules {
    fn is_inline(&self, _kind: &ElementKind) -> bool {
        false
    }

    fn is_void(&self, _kind: &ElementKind) -> bool {
        false
    }
}

impl ElementRules for Box<dyn ElementRules> {
    fn is_inline(&self, kind: &ElementKind) -> bool {
        self.as_ref().is_inline(kind)
    }

    fn is_void(&self, kind: &ElementKind) -> bool {
        self.as_ref().is_void(kind)
    }
}
