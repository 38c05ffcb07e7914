use super::*;
use crate::document::ElementKind;
use crate::mention::with_tags;

fn tagged(blocks: Vec<Node>) -> DocumentEditor {
    DocumentEditor::with_rules(Document::empty().with_blocks(blocks), with_tags(DefaultRules))
}

fn plain(texts: &[&str]) -> DocumentEditor {
    DocumentEditor::new(
        Document::empty().with_blocks(texts.iter().map(|text| Node::paragraph_text(text)).collect()),
    )
}

fn a_tag_b() -> DocumentEditor {
    tagged(vec![Node::paragraph(vec![
        Node::text("a"),
        Node::tag("liver"),
        Node::text("b"),
    ])])
}

fn block_texts(editor: &DocumentEditor) -> Vec<String> {
    editor
        .document()
        .blocks
        .iter()
        .map(Node::text_content)
        .collect()
}

#[test]
fn new_editor_places_caret_at_document_start() {
    let editor = DocumentEditor::new(Document::new());
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 0], 0)));
}

#[test]
fn normalization_wraps_loose_text_in_a_paragraph() {
    let editor = DocumentEditor::new(Document::empty().with_blocks(vec![Node::text("loose")]));
    let block = editor.document().blocks[0].as_element().expect("element");
    assert_eq!(block.kind, ElementKind::Paragraph);
    assert_eq!(block.children, vec![Node::text("loose")]);
}

#[test]
fn character_steps_cross_void_elements_in_one_unit() {
    let editor = a_tag_b();
    let before_tag = Point::new(vec![0, 0], 1);
    let after_tag = Point::new(vec![0, 2], 0);
    assert_eq!(editor.after(&before_tag, Unit::Character), Some(after_tag.clone()));
    assert_eq!(editor.before(&after_tag, Unit::Character), Some(before_tag));
}

#[test]
fn steps_stop_at_document_edges() {
    let editor = a_tag_b();
    assert_eq!(editor.before(&Point::new(vec![0, 0], 0), Unit::Character), None);
    assert_eq!(editor.after(&Point::new(vec![0, 2], 1), Unit::Character), None);
}

#[test]
fn points_inside_voids_do_not_resolve() {
    let editor = a_tag_b();
    let inside = Range::collapsed(Point::new(vec![0, 1, 0], 1));
    assert!(!editor.is_valid_range(&inside));
    assert_eq!(editor.before(&inside.focus, Unit::Character), None);
}

#[test]
fn word_steps_stay_within_a_leaf() {
    let editor = tagged(vec![Node::paragraph_text("see #liv")]);
    let end = Point::new(vec![0, 0], 8);
    assert_eq!(
        editor.before(&end, Unit::Word),
        Some(Point::new(vec![0, 0], 5))
    );
    assert_eq!(
        editor.after(&Point::new(vec![0, 0], 0), Unit::Word),
        Some(Point::new(vec![0, 0], 3))
    );
}

#[test]
fn word_step_at_leaf_start_falls_back_to_a_character() {
    let editor = a_tag_b();
    assert_eq!(
        editor.before(&Point::new(vec![0, 2], 0), Unit::Word),
        Some(Point::new(vec![0, 0], 1))
    );
}

#[test]
fn string_skips_void_text() {
    let editor = a_tag_b();
    let range = Range::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 2], 1));
    assert_eq!(editor.string(&range), "ab");
}

#[test]
fn string_joins_blocks_with_newlines() {
    let editor = plain(&["one", "two"]);
    let range = Range::new(Point::new(vec![1, 0], 2), Point::new(vec![0, 0], 1));
    assert_eq!(editor.string(&range), "ne\ntw");
}

#[test]
fn string_of_an_invalid_range_is_empty() {
    let editor = plain(&["one"]);
    let range = Range::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 0], 9));
    assert_eq!(editor.string(&range), "");
}

#[test]
fn select_rejects_unresolvable_ranges() {
    let mut editor = plain(&["one"]);
    let stale = Range::collapsed(Point::new(vec![3, 0], 0));
    assert_eq!(
        editor.select(stale.clone()),
        Err(EngineError::InvalidRange(stale))
    );
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 0], 0)));
}

#[test]
fn typing_advances_the_caret() {
    let mut editor = DocumentEditor::new(Document::new());
    for ch in "héllo".chars() {
        assert!(editor.insert_char(ch));
    }
    assert_eq!(block_texts(&editor), vec!["héllo"]);
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 0], 5)));
}

#[test]
fn inserting_text_replaces_an_expanded_selection() {
    let mut editor = plain(&["hello world"]);
    editor
        .select(Range::new(Point::new(vec![0, 0], 6), Point::new(vec![0, 0], 11)))
        .expect("range resolves");
    editor.insert_text("there").expect("insert applies");
    assert_eq!(block_texts(&editor), vec!["hello there"]);
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 0], 11)));
}

#[test]
fn inline_node_lands_before_the_caret() {
    let mut editor = tagged(vec![Node::paragraph_text("ab")]);
    editor
        .set_caret(Point::new(vec![0, 0], 1))
        .expect("caret resolves");
    editor.insert_node(Node::tag("pain")).expect("insert applies");

    let block = editor.document().blocks[0].as_element().expect("paragraph");
    assert_eq!(
        block.children,
        vec![Node::text("a"), Node::tag("pain"), Node::text("b")]
    );
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 0], 1)));
}

#[test]
fn block_node_is_inserted_after_the_current_block() {
    let mut editor = plain(&["first", "last"]);
    editor.insert_node(Node::paragraph_text("middle")).expect("insert applies");
    assert_eq!(block_texts(&editor), vec!["first", "middle", "last"]);
    assert_eq!(editor.caret(), Some(&Point::new(vec![1, 0], 0)));
}

#[test]
fn backspace_after_a_tag_removes_the_whole_tag() {
    let mut editor = a_tag_b();
    editor
        .set_caret(Point::new(vec![0, 2], 0))
        .expect("caret resolves");
    assert!(editor.backspace());

    let block = editor.document().blocks[0].as_element().expect("paragraph");
    assert_eq!(block.children, vec![Node::text("ab")]);
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 0], 1)));
    assert_eq!(editor.document().tag_count(), 0);
}

#[test]
fn delete_forward_before_a_tag_removes_it() {
    let mut editor = a_tag_b();
    editor
        .set_caret(Point::new(vec![0, 0], 1))
        .expect("caret resolves");
    assert!(editor.delete_forward());
    assert_eq!(block_texts(&editor), vec!["ab"]);
}

#[test]
fn break_splits_and_backspace_merges() {
    let mut editor = plain(&["hello"]);
    editor
        .set_caret(Point::new(vec![0, 0], 2))
        .expect("caret resolves");
    editor.insert_break().expect("break applies");
    assert_eq!(block_texts(&editor), vec!["he", "llo"]);
    assert_eq!(editor.caret(), Some(&Point::new(vec![1, 0], 0)));

    assert!(editor.backspace());
    assert_eq!(block_texts(&editor), vec!["hello"]);
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 0], 2)));
}

#[test]
fn break_keeps_tags_on_their_side() {
    let mut editor = a_tag_b();
    editor
        .set_caret(Point::new(vec![0, 0], 1))
        .expect("caret resolves");
    editor.insert_break().expect("break applies");
    assert_eq!(block_texts(&editor), vec!["a", "#liverb"]);
    assert_eq!(editor.document().tag_count(), 1);
}

#[test]
fn deleting_across_blocks_merges_the_edges() {
    let mut editor = plain(&["abc", "def", "ghi"]);
    editor
        .delete_range(&Range::new(
            Point::new(vec![0, 0], 1),
            Point::new(vec![2, 0], 1),
        ))
        .expect("delete applies");
    assert_eq!(block_texts(&editor), vec!["ahi"]);
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 0], 1)));
}

#[test]
fn moving_an_expanded_selection_collapses_to_an_edge() {
    let mut editor = plain(&["hello"]);
    let range = Range::new(Point::new(vec![0, 0], 4), Point::new(vec![0, 0], 1));
    editor.select(range.clone()).expect("range resolves");
    editor
        .move_caret(Direction::Backward, Unit::Character)
        .expect("move applies");
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 0], 1)));

    editor.select(range).expect("range resolves");
    editor
        .move_caret(Direction::Forward, Unit::Word)
        .expect("move applies");
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 0], 4)));
}

#[test]
fn moving_past_the_end_reports_no_position() {
    let mut editor = plain(&["x"]);
    assert_eq!(
        editor.move_caret(Direction::Backward, Unit::Character),
        Err(EngineError::NoPosition)
    );
    assert!(!editor.move_left());
}

#[test]
fn vertical_movement_clamps_to_the_shorter_block() {
    let mut editor = plain(&["long line", "ab"]);
    editor
        .set_caret(Point::new(vec![0, 0], 7))
        .expect("caret resolves");
    assert!(editor.move_down());
    assert_eq!(editor.caret(), Some(&Point::new(vec![1, 0], 2)));
    assert!(editor.move_up());
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 0], 2)));
    assert!(!editor.move_up());
}

#[test]
fn home_and_end_move_within_the_block() {
    let mut editor = a_tag_b();
    assert!(editor.move_to_block_end());
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 2], 1)));
    assert!(editor.move_to_block_start());
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 0], 0)));
}

#[test]
fn restore_rewinds_document_and_selection() {
    let mut editor = plain(&["keep"]);
    let checkpoint = editor.checkpoint();
    assert!(editor.insert_char('!'));
    editor.insert_break().expect("break applies");
    editor.restore(checkpoint);
    assert_eq!(block_texts(&editor), vec!["keep"]);
    assert_eq!(editor.caret(), Some(&Point::new(vec![0, 0], 0)));
}
