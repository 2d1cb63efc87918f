use std::collections::HashMap;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::engine::display::compute_cells;
use crate::engine::level::{Level, LevelCtx, LevelKey, Signal, Tuning};
use crate::engine::validate::{KeyInput, chars_match, is_expected_char};
use crate::session::word::Word;
use crate::sinks::{HintChoice, Locale, Tone};

/// Shuffled palette of the currently-hidden letters, offered as a clickable
/// alternative to typing. Rebuilt whenever the reveal step changes.
///
/// Consumption is derived from the typed suffix each time rather than stored,
/// which keeps re-renders idempotent: only correct characters ever enter the
/// buffer, so the typed suffix is always a prefix-correct match against the
/// hidden letters.
pub struct ChoicePool {
    hidden: Vec<char>,
    shuffled: Vec<char>,
}

impl ChoicePool {
    pub fn build(target: &[char], visible_count: usize, rng: &mut SmallRng) -> Self {
        let hidden: Vec<char> = target.iter().skip(visible_count).copied().collect();
        let mut shuffled = hidden.clone();
        shuffled.shuffle(rng);
        Self { hidden, shuffled }
    }

    pub fn hidden_len(&self) -> usize {
        self.hidden.len()
    }

    /// Mark one still-available button per consumed letter, following the
    /// shuffled display order so repeated letters are disambiguated one
    /// instance at a time.
    pub fn choices(&self, player_seq: &[char]) -> Vec<HintChoice> {
        let mut consumed = vec![false; self.shuffled.len()];
        for &typed in player_seq {
            let slot = (0..self.shuffled.len())
                .find(|&i| !consumed[i] && chars_match(self.shuffled[i], typed));
            if let Some(slot) = slot {
                consumed[slot] = true;
            }
        }
        self.shuffled
            .iter()
            .zip(consumed)
            .map(|(&letter, consumed)| HintChoice { letter, consumed })
            .collect()
    }
}

/// Progressive reveal: the word starts fully visible and hides one more
/// trailing character after every full correct retype. Mistakes inside the
/// hidden region count; three consecutive ones revert the mask back through
/// the missed character.
pub struct ProgressiveLevel {
    tuning: Tuning,
    rng: SmallRng,
    reveal_step: usize,
    max_steps: usize,
    consecutive_mistakes: u32,
    position_mistakes: HashMap<usize, u32>,
    pool: ChoicePool,
}

impl ProgressiveLevel {
    pub fn new(tuning: Tuning, mut rng: SmallRng) -> Self {
        let pool = ChoicePool::build(&[], 0, &mut rng);
        Self {
            tuning,
            rng,
            reveal_step: 0,
            max_steps: 0,
            consecutive_mistakes: 0,
            position_mistakes: HashMap::new(),
            pool,
        }
    }

    pub fn reveal_step(&self) -> usize {
        self.reveal_step
    }

    pub fn consecutive_mistakes(&self) -> u32 {
        self.consecutive_mistakes
    }

    fn visible_count(&self, word: &Word) -> usize {
        word.len().saturating_sub(self.reveal_step)
    }

    fn rebuild_pool(&mut self, word: &Word) {
        debug_assert!(
            self.reveal_step <= self.max_steps,
            "reveal_step {} out of range (max {})",
            self.reveal_step,
            self.max_steps
        );
        let target = word.letters();
        let visible = self.visible_count(word);
        self.pool = ChoicePool::build(&target, visible, &mut self.rng);
    }
}

impl Level for ProgressiveLevel {
    fn key(&self) -> LevelKey {
        LevelKey::Progressive
    }

    fn begin_word(&mut self, ctx: &mut LevelCtx, word: &Word, play_audio: bool) {
        self.reveal_step = 0;
        self.max_steps = word.len();
        self.consecutive_mistakes = 0;
        self.position_mistakes.clear();
        self.rebuild_pool(word);
        if play_audio {
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
            self.consecutive_mistakes = 0;
            return true;
        }

        ctx.audio.feedback(Tone::Mistype);
        let visible = self.visible_count(word);
        if pos < visible {
            // Mistake in the already-revealed region: never counted.
            return false;
        }

        ctx.round.count_mistake();
        *self.position_mistakes.entry(pos).or_insert(0) += 1;
        self.consecutive_mistakes += 1;
        if self.consecutive_mistakes >= self.tuning.consecutive_mistake_limit {
            // Revert the mask back through the missed character.
            self.reveal_step = word.len() - (pos + 1);
            self.consecutive_mistakes = 0;
            self.rebuild_pool(word);
            self.render_current(ctx, word);
        }
        false
    }

    fn render_current(&self, ctx: &mut LevelCtx, word: &Word) {
        let target = word.letters();
        let visible = self.visible_count(word);
        let cells = compute_cells(&target, &ctx.round.typed, visible, true, None);
        ctx.renderer.set_character_statuses(&cells);

        let player_start = visible.min(ctx.round.typed.len());
        let choices = self.pool.choices(&ctx.round.typed[player_start..]);
        ctx.renderer.set_hint_choices(&choices);
        ctx.renderer.set_meaning(Some(&word.meaning));
    }

    fn word_complete(&mut self, ctx: &mut LevelCtx, word: &Word) -> Signal {
        if self.reveal_step < self.max_steps {
            self.reveal_step += 1;
            self.consecutive_mistakes = 0;
            self.rebuild_pool(word);
            ctx.audio.speak(&word.text, Locale::English);
            Signal::ContinueWord
        } else {
            Signal::NextWord
        }
    }

    fn replay_audio(&mut self, ctx: &mut LevelCtx, word: &Word) {
        ctx.audio.speak(&word.text, Locale::English);
    }
}
