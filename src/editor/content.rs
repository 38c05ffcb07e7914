pub fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count == char_idx {
            return byte_idx;
        }
    }
    text.len()
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Offset reached by one word step backwards from `offset`.
///
/// Leading non-word characters are skipped first, then the run of word
/// characters in front of them.
pub fn previous_word_boundary(text: &str, offset: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut idx = offset.min(chars.len());

    while idx > 0 && !is_word_char(chars[idx - 1]) {
        idx -= 1;
    }
    while idx > 0 && is_word_char(chars[idx - 1]) {
        idx -= 1;
    }
    idx
}

/// Offset reached by one word step forwards from `offset`.
pub fn next_word_boundary(text: &str, offset: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut idx = offset.min(len);

    while idx < len && !is_word_char(chars[idx]) {
        idx += 1;
    }
    while idx < len && is_word_char(chars[idx]) {
        idx += 1;
    }
    idx
}

pub(crate) fn split_text(text: &str, offset: usize) -> (String, String) {
    let byte_idx = char_to_byte_idx(text, offset);
    (text[..byte_idx].to_string(), text[byte_idx..].to_string())
}

/// Characters `start..end` of `text`, clamped to its length.
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start_byte = char_to_byte_idx(text, start);
    let end_byte = char_to_byte_idx(text, end.max(start));
    &text[start_byte..end_byte]
}

pub(crate) fn insert_str_at(text: &mut String, offset: usize, value: &str) {
    let clamped_offset = offset.min(char_len(text));
    let byte_idx = char_to_byte_idx(text, clamped_offset);
    text.insert_str(byte_idx, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_word_boundary_stops_after_trigger() {
        assert_eq!(previous_word_boundary("#liv", 4), 1);
        assert_eq!(previous_word_boundary("see #liv", 8), 5);
    }

    #[test]
    fn previous_word_boundary_skips_trailing_separators() {
        assert_eq!(previous_word_boundary("foo bar ", 8), 4);
        assert_eq!(previous_word_boundary("foo, ", 5), 0);
        assert_eq!(previous_word_boundary("   ", 3), 0);
    }

    #[test]
    fn previous_word_boundary_keeps_underscores_inside_words() {
        assert_eq!(previous_word_boundary("#severe_pa", 10), 1);
    }

    #[test]
    fn next_word_boundary_moves_over_separator_then_word() {
        assert_eq!(next_word_boundary("foo bar baz", 0), 3);
        assert_eq!(next_word_boundary("foo bar baz", 3), 7);
        assert_eq!(next_word_boundary("foo", 3), 3);
    }

    #[test]
    fn char_helpers_respect_multibyte_text() {
        let text = "añb";
        assert_eq!(char_to_byte_idx(text, 2), 3);
        assert_eq!(char_slice(text, 1, 2), "ñ");
        assert_eq!(split_text(text, 1), ("a".to_string(), "ñb".to_string()));

        let mut owned = String::from("añb");
        insert_str_at(&mut owned, 2, "x");
        assert_eq!(owned, "añxb");
    }
}
