//! Inline tag mentions.
//!
//! Every document change runs the trigger scanner, which opens, updates or
//! closes the single [`MentionSession`]. While a session is open the
//! controller owns the navigation keys and, on acceptance, swaps the typed
//! trigger for a void inline tag entity.

use crossterm::event::KeyCode;
use log::{debug, warn};

use crate::document::{Document, ElementKind};
use crate::editor::{DefaultRules, DocumentEditor, DocumentEngine, ElementRules};

mod filter;
mod insert;
mod scanner;
mod session;
mod vocabulary;

pub use filter::{MAX_CANDIDATES, filter};
pub use insert::{InsertError, insert_tag};
pub use scanner::{ScanOutcome, scan};
pub use session::MentionSession;
pub use vocabulary::Vocabulary;

/// Marks tag entities as inline and void, delegating every other kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct TagRules<R> {
    inner: R,
}

impl<R: ElementRules> ElementRules for TagRules<R> {
    fn is_inline(&self, kind: &ElementKind) -> bool {
        kind.is_tag() || self.inner.is_inline(kind)
    }

    fn is_void(&self, kind: &ElementKind) -> bool {
        kind.is_tag() || self.inner.is_void(kind)
    }
}

pub fn with_tags<R: ElementRules>(rules: R) -> TagRules<R> {
    TagRules { inner: rules }
}

/// An editor that knows about tag entities.
pub fn tag_editor(document: Document) -> DocumentEditor {
    DocumentEditor::with_rules(document, with_tags(DefaultRules))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key is not ours; ordinary editing should handle it.
    Ignored,
    Handled,
    /// A tag was inserted into the document.
    Inserted(String),
}

impl KeyOutcome {
    pub fn is_consumed(&self) -> bool {
        !matches!(self, KeyOutcome::Ignored)
    }
}

pub type CommitHook = Box<dyn FnMut(Option<&MentionSession>)>;

pub struct MentionController {
    vocabulary: Vocabulary,
    session: Option<MentionSession>,
    hooks: Vec<CommitHook>,
}

impl MentionController {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            session: None,
            hooks: Vec::new(),
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn session(&self) -> Option<&MentionSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Registers a callback run after every committed session transition.
    pub fn on_commit(&mut self, hook: impl FnMut(Option<&MentionSession>) + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn candidates(&self) -> Vec<String> {
        self.session
            .as_ref()
            .map(|session| filter(&self.vocabulary, session.query()))
            .unwrap_or_default()
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        let session = self.session.as_ref()?;
        Some(session.highlighted_index(self.candidates().len()))
    }

    pub fn highlighted_candidate(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        let candidates = self.candidates();
        let idx = session.highlighted_index(candidates.len());
        candidates.into_iter().nth(idx)
    }

    /// Re-evaluates the trigger after a document change.
    pub fn on_change<E: DocumentEngine + ?Sized>(&mut self, engine: &E) {
        match scan(engine) {
            ScanOutcome::Open { anchor, query } => {
                debug!("mention open for query {query:?}");
                self.session = Some(MentionSession::new(anchor, query));
                self.commit();
            }
            ScanOutcome::Closed => {
                if self.session.take().is_some() {
                    debug!("mention closed by document change");
                    self.commit();
                }
            }
        }
    }

    pub fn navigate_down(&mut self) -> bool {
        let count = self.candidates().len();
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.navigate_down(count);
        self.commit();
        true
    }

    pub fn navigate_up(&mut self) -> bool {
        let count = self.candidates().len();
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.navigate_up(count);
        self.commit();
        true
    }

    pub fn cancel(&mut self) -> bool {
        if self.session.take().is_none() {
            return false;
        }
        debug!("mention cancelled");
        self.commit();
        true
    }

    /// Inserts the highlighted candidate. The session is closed whatever the outcome.
    pub fn accept<E: DocumentEngine + ?Sized>(
        &mut self,
        engine: &mut E,
    ) -> Result<String, InsertError> {
        let candidate = self.highlighted_candidate().unwrap_or_default();
        let Some(session) = self.session.take() else {
            return Err(InsertError::NoSession);
        };
        let result = insert_tag(engine, session.anchor(), &candidate);
        self.commit();
        match result {
            Ok(()) => {
                debug!("inserted tag {candidate:?}");
                Ok(candidate)
            }
            Err(err) => {
                warn!("tag insertion for {candidate:?} failed: {err}");
                Err(err)
            }
        }
    }

    /// Routes a key press while a mention is open.
    pub fn handle_key<E: DocumentEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        code: KeyCode,
    ) -> KeyOutcome {
        if !self.is_open() {
            return KeyOutcome::Ignored;
        }
        match code {
            KeyCode::Down => {
                self.navigate_down();
                KeyOutcome::Handled
            }
            KeyCode::Up => {
                self.navigate_up();
                KeyOutcome::Handled
            }
            KeyCode::Enter | KeyCode::Tab => match self.accept(engine) {
                Ok(tag) => KeyOutcome::Inserted(tag),
                Err(_) => KeyOutcome::Handled,
            },
            KeyCode::Esc => {
                self.cancel();
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn commit(&mut self) {
        let session = self.session.as_ref();
        for hook in &mut self.hooks {
            hook(session);
        }
    }
}

impl Default for MentionController {
    fn default() -> Self {
        Self::new(Vocabulary::default())
    }
}

#[cfg(test)]
#[path = "mention_tests.rs"]
mod mention_tests;
