use crate::engine::display::compute_cells;
use crate::engine::level::{Level, LevelCtx, LevelKey, Signal, Tuning};
use crate::engine::validate::KeyInput;
use crate::session::word::Word;
use crate::sinks::Locale;

/// Listen-and-repeat mode. The word and its meaning are fully shown, typing
/// is disabled, and nothing is judged. Each Enter/Space press alternates
/// between speaking the meaning and the word; after a configured number of
/// completed pairs the word advances.
pub struct VocabularyLevel {
    max_pairs: u32,
    completed_pairs: u32,
    next_is_meaning: bool,
}

impl VocabularyLevel {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            max_pairs: tuning.vocabulary_toggle_count.max(1),
            completed_pairs: 0,
            next_is_meaning: true,
        }
    }

    pub fn completed_pairs(&self) -> u32 {
        self.completed_pairs
    }
}

impl Level for VocabularyLevel {
    fn key(&self) -> LevelKey {
        LevelKey::VocabularyLearning
    }

    fn begin_word(&mut self, ctx: &mut LevelCtx, word: &Word, play_audio: bool) {
        self.completed_pairs = 0;
        self.next_is_meaning = true;
        if play_audio {
            ctx.audio.speak(&word.text, Locale::English);
        }
        self.render_current(ctx, word);
    }

    fn validate_input(&mut self, _ctx: &mut LevelCtx, _key: KeyInput, _word: &Word) -> bool {
        // No typing in this mode; the input field is hidden.
        false
    }

    fn render_current(&self, ctx: &mut LevelCtx, word: &Word) {
        let target = word.letters();
        let cells = compute_cells(&target, &[], target.len(), true, None);
        ctx.renderer.set_character_statuses(&cells);
        ctx.renderer.set_hint_choices(&[]);
        ctx.renderer.set_meaning(Some(&word.meaning));
    }

    fn word_complete(&mut self, _ctx: &mut LevelCtx, _word: &Word) -> Signal {
        // Unreachable in practice: nothing is typed in this mode.
        Signal::NextWord
    }

    fn replay_audio(&mut self, ctx: &mut LevelCtx, word: &Word) {
        ctx.audio.speak(&word.text, Locale::English);
    }

    fn accepts_typing(&self) -> bool {
        false
    }

    fn advance_key(&mut self, ctx: &mut LevelCtx, word: &Word) -> Option<Signal> {
        if self.next_is_meaning {
            ctx.audio.speak(&word.meaning, Locale::Japanese);
            self.next_is_meaning = false;
            None
        } else {
            ctx.audio.speak(&word.text, Locale::English);
            self.next_is_meaning = true;
            self.completed_pairs += 1;
            if self.completed_pairs >= self.max_pairs {
                Some(Signal::NextWord)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::round::RoundState;
    use crate::sinks::{AudioSink, FrameBuffer, Tone};
    use crate::timer::Scheduler;

    #[derive(Default)]
    struct SpyAudio {
        spoken: Vec<(String, Locale)>,
    }

    impl AudioSink for SpyAudio {
        fn speak(&mut self, text: &str, locale: Locale) {
            self.spoken.push((text.to_string(), locale));
        }
        fn feedback(&mut self, _tone: Tone) {}
    }

    struct Fixture {
        audio: SpyAudio,
        frame: FrameBuffer,
        round: RoundState,
        timers: Scheduler,
    }

    impl Fixture {
        fn new() -> Self {
            let mut round = RoundState::new();
            round.begin();
            Self {
                audio: SpyAudio::default(),
                frame: FrameBuffer::default(),
                round,
                timers: Scheduler::new(),
            }
        }

        fn ctx(&mut self) -> LevelCtx<'_> {
            LevelCtx {
                audio: &mut self.audio,
                renderer: &mut self.frame,
                round: &mut self.round,
                timers: &mut self.timers,
            }
        }
    }

    #[test]
    fn test_five_pairs_then_advance() {
        let mut fx = Fixture::new();
        let mut level = VocabularyLevel::new(Tuning::default());
        let word = Word::new("apple", "りんご");
        level.begin_word(&mut fx.ctx(), &word, true);

        // 5 pairs = 10 presses; only the 10th returns a signal
        for press in 1..=10 {
            let signal = level.advance_key(&mut fx.ctx(), &word);
            if press < 10 {
                assert_eq!(signal, None, "press {press} should not advance");
            } else {
                assert_eq!(signal, Some(Signal::NextWord));
            }
        }
        assert_eq!(level.completed_pairs(), 5);
    }

    #[test]
    fn test_toggle_alternates_meaning_then_word() {
        let mut fx = Fixture::new();
        let mut level = VocabularyLevel::new(Tuning::default());
        let word = Word::new("apple", "りんご");
        level.begin_word(&mut fx.ctx(), &word, false);

        level.advance_key(&mut fx.ctx(), &word);
        level.advance_key(&mut fx.ctx(), &word);
        assert_eq!(
            fx.audio.spoken,
            vec![
                ("りんご".to_string(), Locale::Japanese),
                ("apple".to_string(), Locale::English),
            ]
        );
    }

    #[test]
    fn test_begin_word_speaks_and_shows_everything() {
        let mut fx = Fixture::new();
        let mut level = VocabularyLevel::new(Tuning::default());
        let word = Word::new("apple", "りんご");
        level.begin_word(&mut fx.ctx(), &word, true);

        assert_eq!(fx.audio.spoken.len(), 1);
        assert_eq!(fx.frame.cells.len(), 5);
        assert_eq!(fx.frame.meaning.as_deref(), Some("りんご"));
    }

    #[test]
    fn test_typing_is_rejected() {
        let mut fx = Fixture::new();
        let mut level = VocabularyLevel::new(Tuning::default());
        let word = Word::new("apple", "りんご");
        level.begin_word(&mut fx.ctx(), &word, false);

        assert!(!level.accepts_typing());
        assert!(!level.validate_input(&mut fx.ctx(), KeyInput::Char('a'), &word));
        assert_eq!(fx.round.mistake_count, 0);
    }
}
