use std::time::Duration;

use crate::engine::display::compute_cells;
use crate::engine::level::{Level, LevelCtx, LevelKey, Signal, Tuning};
use crate::engine::validate::{KeyInput, is_expected_char};
use crate::session::word::Word;
use crate::sinks::{Locale, Tone};
use crate::timer::{TimerEvent, TimerId};

/// What a masked dictation variant shows and how it reacts to mistakes.
#[derive(Clone, Copy, Debug)]
pub struct MaskedStyle {
    pub show_meaning: bool,
    pub speak_word: bool,
    /// Flash the correct character briefly after a mistype, then re-mask.
    pub flash_hint_on_mistake: bool,
    /// Briefly reveal the meaning after completing the word.
    pub reveal_meaning_after: bool,
    /// Render placeholder dots for untyped positions. Blind mode hides even
    /// the character count.
    pub show_mask: bool,
    /// Reveal the meaning as a timed hint once this many mistakes pile up on
    /// the current word.
    pub meaning_hint_after_mistakes: Option<u32>,
}

impl MaskedStyle {
    pub fn for_key(key: LevelKey) -> Self {
        match key {
            LevelKey::PronounceMeaning => Self {
                show_meaning: true,
                speak_word: true,
                flash_hint_on_mistake: false,
                reveal_meaning_after: false,
                show_mask: true,
                meaning_hint_after_mistakes: None,
            },
            LevelKey::PronounceOnly => Self {
                show_meaning: false,
                speak_word: true,
                flash_hint_on_mistake: true,
                reveal_meaning_after: true,
                show_mask: true,
                meaning_hint_after_mistakes: None,
            },
            // Kept hard: no audio, no hints, meaning is the only cue.
            LevelKey::MeaningOnly => Self {
                show_meaning: true,
                speak_word: false,
                flash_hint_on_mistake: false,
                reveal_meaning_after: false,
                show_mask: true,
                meaning_hint_after_mistakes: None,
            },
            LevelKey::PronounceBlind => Self {
                show_meaning: false,
                speak_word: true,
                flash_hint_on_mistake: false,
                reveal_meaning_after: false,
                show_mask: false,
                meaning_hint_after_mistakes: Some(3),
            },
            LevelKey::VocabularyLearning | LevelKey::Progressive => {
                unreachable!("not a masked mode")
            }
        }
    }
}

/// The four dictation modes share one implementation; `MaskedStyle` carries
/// everything that differs between them.
pub struct MaskedLevel {
    key: LevelKey,
    style: MaskedStyle,
    tuning: Tuning,
    word_mistakes: u32,
    hint_pos: Option<usize>,
    hint_timer: Option<TimerId>,
    meaning_revealed: bool,
    meaning_timer: Option<TimerId>,
}

impl MaskedLevel {
    pub fn new(key: LevelKey, style: MaskedStyle, tuning: Tuning) -> Self {
        Self {
            key,
            style,
            tuning,
            word_mistakes: 0,
            hint_pos: None,
            hint_timer: None,
            meaning_revealed: false,
            meaning_timer: None,
        }
    }

    fn meaning_visible(&self) -> bool {
        self.style.show_meaning || self.meaning_revealed
    }

    fn flash_hint(&mut self, ctx: &mut LevelCtx, pos: usize) {
        self.hint_pos = Some(pos);
        if let Some(id) = self.hint_timer.take() {
            ctx.timers.cancel(id);
        }
        self.hint_timer = Some(ctx.timers.schedule(
            Duration::from_millis(self.tuning.hint_flash_ms),
            TimerEvent::HintExpired,
        ));
    }

    fn reveal_meaning(&mut self, ctx: &mut LevelCtx) {
        self.meaning_revealed = true;
        if let Some(id) = self.meaning_timer.take() {
            ctx.timers.cancel(id);
        }
        self.meaning_timer = Some(ctx.timers.schedule(
            Duration::from_millis(self.tuning.meaning_reveal_ms),
            TimerEvent::MeaningRevealExpired,
        ));
    }
}

impl Level for MaskedLevel {
    fn key(&self) -> LevelKey {
        self.key
    }

    fn begin_word(&mut self, ctx: &mut LevelCtx, word: &Word, play_audio: bool) {
        self.cleanup(ctx);
        self.word_mistakes = 0;
        if self.style.speak_word && play_audio {
            ctx.audio.speak(&word.text, Locale::English);
        }
        self.render_current(ctx, word);
    }

    fn validate_input(&mut self, ctx: &mut LevelCtx, key: KeyInput, word: &Word) -> bool {
        let KeyInput::Char(ch) = key else {
            return false;
        };
        let pos = ctx.round.cursor();
        if pos >= word.len() {
            return false;
        }

        if is_expected_char(word, pos, ch) {
            return true;
        }

        // Every mismatch counts in the masked modes.
        ctx.round.count_mistake();
        self.word_mistakes += 1;
        ctx.audio.feedback(Tone::Mistype);

        if self.style.flash_hint_on_mistake {
            self.flash_hint(ctx, pos);
            self.render_current(ctx, word);
        }
        if let Some(limit) = self.style.meaning_hint_after_mistakes
            && self.word_mistakes >= limit
        {
            self.reveal_meaning(ctx);
            self.render_current(ctx, word);
        }
        false
    }

    fn render_current(&self, ctx: &mut LevelCtx, word: &Word) {
        let target = word.letters();
        let cells = compute_cells(
            &target,
            &ctx.round.typed,
            0,
            self.style.show_mask,
            self.hint_pos,
        );
        ctx.renderer.set_character_statuses(&cells);
        ctx.renderer.set_hint_choices(&[]);
        if self.meaning_visible() {
            ctx.renderer.set_meaning(Some(&word.meaning));
        } else {
            ctx.renderer.set_meaning(None);
        }
    }

    fn word_complete(&mut self, ctx: &mut LevelCtx, word: &Word) -> Signal {
        if self.style.reveal_meaning_after {
            self.reveal_meaning(ctx);
            self.render_current(ctx, word);
        }
        Signal::NextWord
    }

    fn replay_audio(&mut self, ctx: &mut LevelCtx, word: &Word) {
        if self.style.speak_word {
            ctx.audio.speak(&word.text, Locale::English);
        }
    }

    fn on_timer(&mut self, ctx: &mut LevelCtx, word: &Word, ev: TimerEvent) {
        match ev {
            TimerEvent::HintExpired => {
                self.hint_pos = None;
                self.hint_timer = None;
                self.render_current(ctx, word);
            }
            TimerEvent::MeaningRevealExpired => {
                self.meaning_revealed = false;
                self.meaning_timer = None;
                self.render_current(ctx, word);
            }
            _ => {}
        }
    }

    fn cleanup(&mut self, ctx: &mut LevelCtx) {
        if let Some(id) = self.hint_timer.take() {
            ctx.timers.cancel(id);
        }
        if let Some(id) = self.meaning_timer.take() {
            ctx.timers.cancel(id);
        }
        self.hint_pos = None;
        self.meaning_revealed = false;
    }
}
