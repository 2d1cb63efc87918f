use crate::engine::validate::chars_match;
use crate::sinks::{CharCell, CharStatus};

/// Placeholder shown for characters in the hidden region.
pub const MASK_CHAR: char = '\u{25cf}'; // ●

/// Compute per-character display cells from the target and the current
/// partial input. Pure function of its arguments, so re-running it with
/// unchanged state yields an identical sequence.
///
/// - `visible_count`: leading characters shown in clear (target length for
///   fully-visible modes, 0 for masked modes).
/// - `show_mask`: whether the hidden region renders placeholder dots at all.
///   When false (blind mode), untyped positions produce no cells, so not even
///   the character count leaks.
/// - `hint`: position currently flashing its correct character.
///
/// Characters typed past the target length render as incorrect rather than
/// being dropped.
pub fn compute_cells(
    target: &[char],
    typed: &[char],
    visible_count: usize,
    show_mask: bool,
    hint: Option<usize>,
) -> Vec<CharCell> {
    let mut cells = Vec::with_capacity(target.len().max(typed.len()));

    for (i, &expected) in target.iter().enumerate() {
        if let Some(&actual) = typed.get(i) {
            if chars_match(expected, actual) {
                cells.push(CharCell::new(expected, CharStatus::Correct));
            } else {
                cells.push(CharCell::new(actual, CharStatus::Incorrect));
            }
        } else if hint == Some(i) {
            cells.push(CharCell::new(expected, CharStatus::Pending));
        } else if i < visible_count {
            cells.push(CharCell::new(expected, CharStatus::Pending));
        } else if show_mask {
            cells.push(CharCell::new(MASK_CHAR, CharStatus::Hidden));
        }
        // !show_mask: untyped hidden positions yield nothing
    }

    for &extra in typed.iter().skip(target.len()) {
        cells.push(CharCell::new(extra, CharStatus::Incorrect));
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn statuses(cells: &[CharCell]) -> Vec<CharStatus> {
        cells.iter().map(|c| c.status).collect()
    }

    #[test]
    fn test_fully_visible_untyped() {
        let cells = compute_cells(&chars("cat"), &[], 3, true, None);
        assert_eq!(statuses(&cells), vec![CharStatus::Pending; 3]);
        assert_eq!(cells[0].ch, 'c');
    }

    #[test]
    fn test_correct_prefix_then_mask() {
        let cells = compute_cells(&chars("hello"), &chars("he"), 4, true, None);
        assert_eq!(
            statuses(&cells),
            vec![
                CharStatus::Correct,
                CharStatus::Correct,
                CharStatus::Pending,
                CharStatus::Pending,
                CharStatus::Hidden,
            ]
        );
        assert_eq!(cells[4].ch, MASK_CHAR);
    }

    #[test]
    fn test_case_insensitive_correct_shows_target_casing() {
        let cells = compute_cells(&chars("Hi"), &chars("hI"), 2, true, None);
        assert_eq!(statuses(&cells), vec![CharStatus::Correct; 2]);
        assert_eq!(cells[0].ch, 'H');
        assert_eq!(cells[1].ch, 'i');
    }

    #[test]
    fn test_incorrect_shows_typed_char() {
        let cells = compute_cells(&chars("cat"), &chars("cx"), 3, true, None);
        assert_eq!(cells[1].status, CharStatus::Incorrect);
        assert_eq!(cells[1].ch, 'x');
    }

    #[test]
    fn test_overflow_renders_as_incorrect() {
        let cells = compute_cells(&chars("hi"), &chars("hiya"), 2, true, None);
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[2].status, CharStatus::Incorrect);
        assert_eq!(cells[3].status, CharStatus::Incorrect);
        assert_eq!(cells[2].ch, 'y');
    }

    #[test]
    fn test_blind_mode_shows_nothing_untyped() {
        let cells = compute_cells(&chars("secret"), &[], 0, false, None);
        assert!(cells.is_empty());
        let cells = compute_cells(&chars("secret"), &chars("se"), 0, false, None);
        assert_eq!(cells.len(), 2);
        assert_eq!(statuses(&cells), vec![CharStatus::Correct; 2]);
    }

    #[test]
    fn test_hint_flashes_target_char() {
        let cells = compute_cells(&chars("cat"), &chars("c"), 0, true, Some(1));
        assert_eq!(cells[1].status, CharStatus::Pending);
        assert_eq!(cells[1].ch, 'a');
        assert_eq!(cells[2].status, CharStatus::Hidden);
    }

    #[test]
    fn test_idempotent_recompute() {
        let target = chars("hello");
        let typed = chars("heL");
        let first = compute_cells(&target, &typed, 2, true, None);
        let second = compute_cells(&target, &typed, 2, true, None);
        assert_eq!(first, second);
    }
}
