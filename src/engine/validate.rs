use crate::session::word::Word;

/// Keystroke as the session sees it. `Shift` is carried separately because a
/// bare modifier press must never be judged as a mistake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    Enter,
    Shift,
    Other,
}

pub fn chars_match(expected: char, typed: char) -> bool {
    expected == typed || expected.to_lowercase().eq(typed.to_lowercase())
}

/// Shared keystroke primitive: is `typed` the expected character at
/// `pos`? Case-insensitive. Used by every level by composition.
pub fn is_expected_char(word: &Word, pos: usize, typed: char) -> bool {
    word.text
        .chars()
        .nth(pos)
        .is_some_and(|expected| chars_match(expected, typed))
}

/// Case-insensitive full-buffer match against the target word.
pub fn text_matches(word: &Word, typed: &str) -> bool {
    word.text.to_lowercase() == typed.to_lowercase()
}
