use std::time::{Duration, Instant};

use log::warn;
use rand::rngs::SmallRng;

use crate::engine::level::{Level, LevelCtx, LevelKey, Signal, Tuning, make_level};
use crate::engine::validate::{KeyInput, text_matches};
use crate::error::EngineError;
use crate::session::result::RoundSummary;
use crate::session::round::RoundState;
use crate::session::word::{Word, WordSet};
use crate::sinks::{AudioSink, LessonSource, RecordSink, Renderer, Tone};
use crate::timer::{Scheduler, TimerEvent, TimerId};

/// Message shown in place of a word whose data is unusable.
pub const WORD_ERROR_MESSAGE: &str = "word data problem";
pub const NEW_RECORD_MESSAGE: &str = "New record!";

/// Round lifecycle. `Active` re-enters itself on each word advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Complete,
}

/// External collaborators, passed explicitly per call so ownership stays with
/// the host.
pub struct SessionContext<'a> {
    pub audio: &'a mut dyn AudioSink,
    pub renderer: &'a mut dyn Renderer,
    pub records: &'a mut dyn RecordSink,
}

/// Pacing delays between word completion and the next word, and for
/// transient banners.
#[derive(Clone, Copy, Debug)]
pub struct Pacing {
    pub advance_delay: Duration,
    pub banner: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            advance_delay: Duration::from_millis(700),
            banner: Duration::from_millis(2000),
        }
    }
}

/// Drives one round: draws the word set, routes keystrokes through the active
/// level, advances word to word, and finalizes against the record sink.
pub struct SessionController {
    level_key: LevelKey,
    level: Box<dyn Level>,
    words: WordSet,
    record_key: String,
    pacing: Pacing,
    pub round: RoundState,
    phase: Phase,
    scheduler: Scheduler,
    advance_timer: Option<TimerId>,
    banner_timer: Option<TimerId>,
    word_error: bool,
    summary: Option<RoundSummary>,
}

impl SessionController {
    pub fn new(
        level_key: LevelKey,
        source: &mut dyn LessonSource,
        tuning: Tuning,
        pacing: Pacing,
        rng: SmallRng,
    ) -> Result<Self, EngineError> {
        let words = source.draw_words();
        if words.is_empty() {
            return Err(EngineError::EmptyWordSet);
        }
        let record_key = source.record_key(level_key);
        Ok(Self {
            level_key,
            level: make_level(level_key, tuning, rng),
            words,
            record_key,
            pacing,
            round: RoundState::new(),
            phase: Phase::Idle,
            scheduler: Scheduler::new(),
            advance_timer: None,
            banner_timer: None,
            word_error: false,
            summary: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level_key(&self) -> LevelKey {
        self.level_key
    }

    pub fn record_key(&self) -> &str {
        &self.record_key
    }

    pub fn summary(&self) -> Option<&RoundSummary> {
        self.summary.as_ref()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.words.get(self.round.current_index)
    }

    pub fn word_error(&self) -> bool {
        self.word_error
    }

    pub fn start_round(&mut self, ctx: &mut SessionContext) -> Result<(), EngineError> {
        if self.phase == Phase::Active {
            return Err(EngineError::RoundInProgress);
        }
        self.scheduler.cancel_all();
        self.advance_timer = None;
        self.banner_timer = None;
        self.summary = None;
        self.round.begin();
        self.phase = Phase::Active;
        ctx.renderer.set_message(None);
        self.begin_current_word(ctx);
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyInput, ctx: &mut SessionContext) {
        if self.phase != Phase::Active || !self.round.active || self.round.input_locked {
            return;
        }
        if self.word_error {
            // Unplayable word: only an explicit skip moves on.
            return;
        }
        let Some(word) = self.words.get(self.round.current_index).cloned() else {
            return;
        };

        match key {
            KeyInput::Shift | KeyInput::Other => {}
            _ if !self.level.accepts_typing() => {
                if matches!(key, KeyInput::Enter | KeyInput::Char(' ')) {
                    let mut lctx = LevelCtx {
                        audio: ctx.audio,
                        renderer: ctx.renderer,
                        round: &mut self.round,
                        timers: &mut self.scheduler,
                    };
                    if self.level.advance_key(&mut lctx, &word) == Some(Signal::NextWord) {
                        self.finish_word(ctx);
                    }
                }
            }
            KeyInput::Backspace => {
                // Never judged and excluded from mistake accounting.
                self.round.typed.pop();
                self.render_level(ctx, &word);
            }
            KeyInput::Enter => {}
            KeyInput::Char(ch) => {
                self.round.touch();
                if self.round.cursor() >= word.len() {
                    // Word already complete; ignore extra keys.
                    return;
                }
                let accepted = {
                    let mut lctx = LevelCtx {
                        audio: ctx.audio,
                        renderer: ctx.renderer,
                        round: &mut self.round,
                        timers: &mut self.scheduler,
                    };
                    self.level.validate_input(&mut lctx, key, &word)
                };
                if accepted {
                    self.round.typed.push(ch);
                    self.round.chars_typed += 1;
                    ctx.audio.feedback(Tone::Type);
                    self.render_level(ctx, &word);
                    self.try_complete(&word, ctx);
                }
            }
        }
    }

    /// Realtime re-check after the input buffer was replaced wholesale
    /// (browser-style input events, paste). No mistake accounting; wrong and
    /// overflow characters simply render as incorrect.
    pub fn sync_buffer(&mut self, text: &str, ctx: &mut SessionContext) {
        if self.phase != Phase::Active
            || self.round.input_locked
            || self.word_error
            || !self.level.accepts_typing()
        {
            return;
        }
        let Some(word) = self.words.get(self.round.current_index).cloned() else {
            return;
        };
        self.round.typed = text.chars().collect();
        if !self.round.typed.is_empty() {
            self.round.touch();
        }
        self.render_level(ctx, &word);
        self.try_complete(&word, ctx);
    }

    /// Skip a word that failed to load. Counted separately in the summary.
    pub fn skip_word(&mut self, ctx: &mut SessionContext) {
        if self.phase != Phase::Active || !self.word_error {
            return;
        }
        self.round.skipped_words += 1;
        self.round.current_index += 1;
        if self.round.current_index >= self.words.len() {
            self.complete_round(ctx);
        } else {
            self.begin_current_word(ctx);
        }
    }

    pub fn replay_audio(&mut self, ctx: &mut SessionContext) {
        if self.phase != Phase::Active || self.word_error {
            return;
        }
        let Some(word) = self.words.get(self.round.current_index).cloned() else {
            return;
        };
        let mut lctx = LevelCtx {
            audio: ctx.audio,
            renderer: ctx.renderer,
            round: &mut self.round,
            timers: &mut self.scheduler,
        };
        self.level.replay_audio(&mut lctx, &word);
    }

    /// Pump due timers. Call from the host's tick loop.
    pub fn tick(&mut self, now: Instant, ctx: &mut SessionContext) {
        for (id, ev) in self.scheduler.poll(now) {
            match ev {
                TimerEvent::AdvanceWord => {
                    if self.advance_timer == Some(id) {
                        self.advance_timer = None;
                        self.advance_word(ctx);
                    }
                }
                TimerEvent::BannerExpired => {
                    if self.banner_timer == Some(id) {
                        self.banner_timer = None;
                        ctx.renderer.set_message(None);
                    }
                }
                TimerEvent::HintExpired | TimerEvent::MeaningRevealExpired => {
                    if let Some(word) = self.words.get(self.round.current_index).cloned() {
                        let mut lctx = LevelCtx {
                            audio: ctx.audio,
                            renderer: ctx.renderer,
                            round: &mut self.round,
                            timers: &mut self.scheduler,
                        };
                        self.level.on_timer(&mut lctx, &word, ev);
                    }
                }
            }
        }
    }

    /// Early exit back to selection: cancel everything pending so no stale
    /// callback can mutate a round that has moved on.
    pub fn abandon(&mut self, ctx: &mut SessionContext) {
        let mut lctx = LevelCtx {
            audio: ctx.audio,
            renderer: ctx.renderer,
            round: &mut self.round,
            timers: &mut self.scheduler,
        };
        self.level.cleanup(&mut lctx);
        self.scheduler.cancel_all();
        self.advance_timer = None;
        self.banner_timer = None;
        self.round.active = false;
        self.phase = Phase::Idle;
        ctx.renderer.set_message(None);
    }

    fn begin_current_word(&mut self, ctx: &mut SessionContext) {
        self.round.begin_word();
        let Some(word) = self.words.get(self.round.current_index).cloned() else {
            return;
        };
        if word.is_malformed() {
            warn!(
                "malformed word at index {} (missing text); rendering placeholder",
                self.round.current_index
            );
            self.word_error = true;
            ctx.renderer.set_character_statuses(&[]);
            ctx.renderer.set_hint_choices(&[]);
            ctx.renderer.set_meaning(None);
            ctx.renderer.set_message(Some(WORD_ERROR_MESSAGE));
            return;
        }
        self.word_error = false;
        ctx.renderer.set_message(None);
        let mut lctx = LevelCtx {
            audio: ctx.audio,
            renderer: ctx.renderer,
            round: &mut self.round,
            timers: &mut self.scheduler,
        };
        self.level.begin_word(&mut lctx, &word, true);
    }

    fn render_level(&mut self, ctx: &mut SessionContext, word: &Word) {
        let mut lctx = LevelCtx {
            audio: ctx.audio,
            renderer: ctx.renderer,
            round: &mut self.round,
            timers: &mut self.scheduler,
        };
        self.level.render_current(&mut lctx, word);
    }

    fn try_complete(&mut self, word: &Word, ctx: &mut SessionContext) {
        if !text_matches(word, &self.round.typed_text()) {
            return;
        }
        let signal = {
            let mut lctx = LevelCtx {
                audio: ctx.audio,
                renderer: ctx.renderer,
                round: &mut self.round,
                timers: &mut self.scheduler,
            };
            self.level.word_complete(&mut lctx, word)
        };
        match signal {
            Signal::ContinueWord => {
                self.round.typed.clear();
                self.render_level(ctx, word);
            }
            Signal::NextWord => self.finish_word(ctx),
        }
    }

    fn finish_word(&mut self, ctx: &mut SessionContext) {
        let tone = if self.round.word_had_mistake {
            Tone::Correct
        } else {
            Tone::Excellent
        };
        ctx.audio.feedback(tone);

        // Exactly one completion transition per advance: lock input and
        // replace any previously scheduled advance.
        self.round.input_locked = true;
        if let Some(id) = self.advance_timer.take() {
            self.scheduler.cancel(id);
        }
        self.advance_timer = Some(
            self.scheduler
                .schedule(self.pacing.advance_delay, TimerEvent::AdvanceWord),
        );
    }

    fn advance_word(&mut self, ctx: &mut SessionContext) {
        self.round.correct_words += 1;
        self.round.current_index += 1;
        if self.round.current_index >= self.words.len() {
            self.complete_round(ctx);
        } else {
            self.begin_current_word(ctx);
        }
    }

    fn complete_round(&mut self, ctx: &mut SessionContext) {
        self.round.finish();
        self.phase = Phase::Complete;

        let mut summary =
            RoundSummary::from_round(&self.round, self.level_key.as_str(), self.words.len());
        let record = summary.as_record();
        let new_record = match ctx.records.best_for(&self.record_key) {
            Some(best) => record.beats(&best),
            None => true,
        };
        if new_record {
            // A failed write is the sink's problem; the round still ends.
            ctx.records.put_if_better(&self.record_key, &record);
            summary.new_record = true;
            ctx.renderer.set_message(Some(NEW_RECORD_MESSAGE));
            if let Some(id) = self.banner_timer.take() {
                self.scheduler.cancel(id);
            }
            self.banner_timer = Some(
                self.scheduler
                    .schedule(self.pacing.banner, TimerEvent::BannerExpired),
            );
        }
        ctx.audio.feedback(Tone::Complete);
        self.summary = Some(summary);
    }
}
