use std::time::Instant;

/// Per-round counters and the current word's typed buffer. Mutated by the
/// controller; levels touch mistake accounting only through `count_mistake`.
pub struct RoundState {
    pub current_index: usize,
    pub mistake_count: u32,
    pub word_had_mistake: bool,
    /// Correct characters accepted across the whole round (progressive
    /// retypes accumulate).
    pub chars_typed: usize,
    pub correct_words: usize,
    pub skipped_words: usize,
    pub typed: Vec<char>,
    pub active: bool,
    /// Set during the completion-to-advance window so a second completion
    /// signal cannot be produced.
    pub input_locked: bool,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            current_index: 0,
            mistake_count: 0,
            word_had_mistake: false,
            chars_typed: 0,
            correct_words: 0,
            skipped_words: 0,
            typed: Vec::new(),
            active: false,
            input_locked: false,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn begin(&mut self) {
        *self = Self::new();
        self.active = true;
    }

    /// Timing starts on the first keystroke, not at round start, so idle time
    /// before the user begins typing is not counted.
    pub fn touch(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub fn begin_word(&mut self) {
        self.typed.clear();
        self.word_had_mistake = false;
        self.input_locked = false;
    }

    /// The one narrow mutation levels are allowed.
    pub fn count_mistake(&mut self) {
        self.mistake_count += 1;
        self.word_had_mistake = true;
    }

    pub fn cursor(&self) -> usize {
        self.typed.len()
    }

    pub fn typed_text(&self) -> String {
        self.typed.iter().collect()
    }

    pub fn finish(&mut self) {
        self.active = false;
        self.input_locked = false;
        if self.started_at.is_some() && self.finished_at.is_none() {
            self.finished_at = Some(Instant::now());
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_millis() as u64,
            (Some(start), None) => start.elapsed().as_millis() as u64,
            _ => 0,
        }
    }

    /// Round accuracy: 100 for a clean round, otherwise the share of correct
    /// characters among all judged keystrokes, rounded.
    pub fn accuracy(&self) -> u32 {
        if self.mistake_count == 0 {
            return 100;
        }
        let typed = self.chars_typed as f64;
        let total = typed + self.mistake_count as f64;
        if total == 0.0 {
            return 100;
        }
        (typed / total * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_is_inactive() {
        let round = RoundState::new();
        assert!(!round.active);
        assert_eq!(round.cursor(), 0);
        assert_eq!(round.elapsed_ms(), 0);
    }

    #[test]
    fn test_clean_round_accuracy_is_100() {
        let mut round = RoundState::new();
        round.begin();
        round.chars_typed = 42;
        assert_eq!(round.accuracy(), 100);
    }

    #[test]
    fn test_accuracy_formula_with_mistakes() {
        let mut round = RoundState::new();
        round.begin();
        round.chars_typed = 3;
        round.mistake_count = 3;
        // round(3 / 6 * 100) == 50
        assert_eq!(round.accuracy(), 50);
    }

    #[test]
    fn test_accuracy_rounds_to_nearest() {
        let mut round = RoundState::new();
        round.begin();
        round.chars_typed = 2;
        round.mistake_count = 1;
        // round(2 / 3 * 100) == 67
        assert_eq!(round.accuracy(), 67);
    }

    #[test]
    fn test_count_mistake_sets_word_flag() {
        let mut round = RoundState::new();
        round.begin();
        round.count_mistake();
        assert_eq!(round.mistake_count, 1);
        assert!(round.word_had_mistake);
        round.begin_word();
        assert!(!round.word_had_mistake);
        assert_eq!(round.mistake_count, 1);
    }

    #[test]
    fn test_touch_starts_timer_once() {
        let mut round = RoundState::new();
        round.begin();
        assert!(round.started_at.is_none());
        round.touch();
        let first = round.started_at;
        round.touch();
        assert_eq!(first, round.started_at);
    }
}
