use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Point, Range, TRIGGER_CHAR};
use crate::editor::{DocumentEngine, Unit};

/// Trigger followed by one or more word characters and nothing else.
static TRIGGER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let trigger = regex::escape(&TRIGGER_CHAR.to_string());
    Regex::new(&format!(r"^{trigger}(\w+)$")).expect("trigger pattern compiles")
});

/// The caret must not be followed by anything but whitespace.
static AFTER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s|$)").expect("after pattern compiles"));

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    Open { anchor: Range, query: String },
    Closed,
}

/// Decides whether the caret currently sits at the end of a trigger token.
pub fn scan<E: DocumentEngine + ?Sized>(engine: &E) -> ScanOutcome {
    let Some(selection) = engine.selection() else {
        return ScanOutcome::Closed;
    };
    if !selection.is_collapsed() {
        return ScanOutcome::Closed;
    }
    let (start, _) = selection.edges();
    match match_trigger(engine, start) {
        Some((anchor, query)) => ScanOutcome::Open { anchor, query },
        None => ScanOutcome::Closed,
    }
}

fn match_trigger<E: DocumentEngine + ?Sized>(engine: &E, start: &Point) -> Option<(Range, String)> {
    let word_before = engine.before(start, Unit::Word)?;
    let before = engine.before(&word_before, Unit::Character)?;
    let before_range = engine.range(&before, start);
    let before_text = engine.string(&before_range);
    let captures = TRIGGER_PATTERN.captures(&before_text)?;
    let query = captures.get(1)?.as_str().to_string();

    let after_text = match engine.after(start, Unit::Character) {
        Some(after) => engine.string(&engine.range(start, &after)),
        None => String::new(),
    };
    if !AFTER_PATTERN.is_match(&after_text) {
        return None;
    }
    Some((before_range, query))
}
