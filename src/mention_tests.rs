use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::KeyCode;

use super::*;
use crate::document::{Node, Point, Range};
use crate::serialize::to_text;

fn type_text(editor: &mut DocumentEditor, controller: &mut MentionController, text: &str) {
    for ch in text.chars() {
        assert!(editor.insert_char(ch), "typing {ch:?}");
        controller.on_change(editor);
    }
}

fn setup() -> (DocumentEditor, MentionController) {
    (tag_editor(Document::new()), MentionController::default())
}

#[test]
fn typing_a_trigger_opens_a_session() {
    let (mut editor, mut controller) = setup();
    type_text(&mut editor, &mut controller, "#liv");

    let session = controller.session().expect("session open");
    assert_eq!(session.query(), "liv");
    assert_eq!(
        session.anchor(),
        &Range::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 0], 4))
    );
    assert_eq!(controller.candidates(), vec!["liv", "liver"]);
    assert_eq!(controller.highlighted_index(), Some(0));
}

#[test]
fn exact_query_offers_the_vocabulary_entry_and_enter_inserts_it() {
    let (mut editor, mut controller) = setup();
    type_text(&mut editor, &mut controller, "#liver");
    assert_eq!(controller.candidates(), vec!["liver"]);
    assert_eq!(controller.highlighted_index(), Some(0));

    let outcome = controller.handle_key(&mut editor, KeyCode::Enter);
    assert_eq!(outcome, KeyOutcome::Inserted("liver".to_string()));
    assert!(!controller.is_open());
    assert_eq!(editor.document().tag_count(), 1);
    assert_eq!(to_text(editor.document()), "#liver ");

    controller.on_change(&editor);
    assert!(!controller.is_open());
}

#[test]
fn navigating_down_then_accepting_picks_the_vocabulary_entry() {
    let (mut editor, mut controller) = setup();
    type_text(&mut editor, &mut controller, "see #liv");
    assert_eq!(controller.handle_key(&mut editor, KeyCode::Down), KeyOutcome::Handled);
    assert_eq!(controller.highlighted_candidate().as_deref(), Some("liver"));

    assert_eq!(
        controller.handle_key(&mut editor, KeyCode::Tab),
        KeyOutcome::Inserted("liver".to_string())
    );
    let paragraph = editor.document().blocks[0].as_element().expect("paragraph");
    assert_eq!(
        paragraph.children,
        vec![Node::text("see "), Node::tag("liver"), Node::text(" ")]
    );
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 2], 1)));
}

#[test]
fn novel_query_inserts_a_new_tag() {
    let (mut editor, mut controller) = setup();
    type_text(&mut editor, &mut controller, "#zzz");
    assert_eq!(controller.candidates(), vec!["zzz"]);

    let tag = controller.accept(&mut editor).expect("accept inserts");
    assert_eq!(tag, "zzz");
    assert_eq!(to_text(editor.document()), "#zzz ");
}

#[test]
fn navigation_wraps_around_the_candidate_list() {
    let (mut editor, mut controller) = setup();
    type_text(&mut editor, &mut controller, "#ab");
    assert_eq!(controller.candidates(), vec!["ab", "abdomen", "abdominal"]);

    controller.handle_key(&mut editor, KeyCode::Up);
    assert_eq!(controller.highlighted_index(), Some(2));
    controller.handle_key(&mut editor, KeyCode::Down);
    assert_eq!(controller.highlighted_index(), Some(0));
}

#[test]
fn narrowing_the_query_resets_the_highlight() {
    let (mut editor, mut controller) = setup();
    type_text(&mut editor, &mut controller, "#ab");
    controller.navigate_down();
    controller.navigate_down();
    assert_eq!(controller.highlighted_index(), Some(2));

    type_text(&mut editor, &mut controller, "do");
    assert_eq!(controller.session().map(MentionSession::query), Some("abdo"));
    assert_eq!(controller.highlighted_index(), Some(0));
}

#[test]
fn escape_closes_without_touching_the_document() {
    let (mut editor, mut controller) = setup();
    type_text(&mut editor, &mut controller, "#kid");
    let before = editor.document().clone();

    assert_eq!(controller.handle_key(&mut editor, KeyCode::Esc), KeyOutcome::Handled);
    assert!(!controller.is_open());
    assert_eq!(editor.document(), &before);
}

#[test]
fn unmatched_keys_pass_through() {
    let (mut editor, mut controller) = setup();
    assert_eq!(controller.handle_key(&mut editor, KeyCode::Down), KeyOutcome::Ignored);

    type_text(&mut editor, &mut controller, "#kid");
    assert_eq!(
        controller.handle_key(&mut editor, KeyCode::Char('n')),
        KeyOutcome::Ignored
    );
    assert_eq!(controller.handle_key(&mut editor, KeyCode::Left), KeyOutcome::Ignored);
    assert!(controller.is_open());
    assert!(!KeyOutcome::Ignored.is_consumed());
    assert!(KeyOutcome::Handled.is_consumed());
}

#[test]
fn moving_away_or_adding_a_space_closes_the_session() {
    let (mut editor, mut controller) = setup();
    type_text(&mut editor, &mut controller, "#kid");
    assert!(editor.move_left());
    controller.on_change(&editor);
    assert!(!controller.is_open());

    assert!(editor.move_right());
    controller.on_change(&editor);
    assert!(controller.is_open());

    type_text(&mut editor, &mut controller, " ");
    assert!(!controller.is_open());
}

#[test]
fn deleting_back_to_the_bare_trigger_closes_the_session() {
    let (mut editor, mut controller) = setup();
    type_text(&mut editor, &mut controller, "#k");
    assert!(controller.is_open());
    assert!(editor.backspace());
    controller.on_change(&editor);
    assert!(!controller.is_open());
}

#[test]
fn stale_anchor_closes_the_session_without_mutation() {
    let (mut editor, mut controller) = setup();
    type_text(&mut editor, &mut controller, "#liv");
    for _ in 0..4 {
        assert!(editor.backspace());
    }
    let before = editor.document().clone();

    assert_eq!(controller.handle_key(&mut editor, KeyCode::Enter), KeyOutcome::Handled);
    assert!(!controller.is_open());
    assert_eq!(editor.document(), &before);
}

#[test]
fn accept_without_a_session_fails() {
    let (mut editor, mut controller) = setup();
    assert_eq!(controller.accept(&mut editor), Err(InsertError::NoSession));
    assert!(!controller.navigate_down());
    assert!(!controller.cancel());
}

#[test]
fn commit_hooks_observe_each_transition() {
    let (mut editor, mut controller) = setup();
    let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::default();
    let sink = Rc::clone(&seen);
    controller.on_commit(move |session| {
        sink.borrow_mut()
            .push(session.map(|session| session.query().to_string()));
    });

    type_text(&mut editor, &mut controller, "a #k");
    controller.handle_key(&mut editor, KeyCode::Down);
    controller.handle_key(&mut editor, KeyCode::Esc);

    assert_eq!(
        *seen.borrow(),
        vec![Some("k".to_string()), Some("k".to_string()), None]
    );
}

#[test]
fn tag_rules_mark_tags_inline_and_void() {
    let rules = with_tags(DefaultRules);
    let tag = ElementKind::Tag {
        character: "liver".into(),
    };
    assert!(rules.is_inline(&tag));
    assert!(rules.is_void(&tag));
    assert!(!rules.is_inline(&ElementKind::Paragraph));
    assert!(!rules.is_void(&ElementKind::Other("quote".into())));
}
