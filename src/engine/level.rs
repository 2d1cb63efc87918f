use rand::rngs::SmallRng;

use crate::engine::masked::{MaskedLevel, MaskedStyle};
use crate::engine::progressive::ProgressiveLevel;
use crate::engine::validate::KeyInput;
use crate::engine::vocabulary::VocabularyLevel;
use crate::session::round::RoundState;
use crate::session::word::Word;
use crate::sinks::{AudioSink, Renderer};
use crate::timer::{Scheduler, TimerEvent};

/// The six practice modes. A closed set: records, config, and dispatch all go
/// through this enum, never through string lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelKey {
    VocabularyLearning,
    Progressive,
    PronounceMeaning,
    PronounceOnly,
    MeaningOnly,
    PronounceBlind,
}

impl LevelKey {
    pub const ALL: [LevelKey; 6] = [
        LevelKey::VocabularyLearning,
        LevelKey::Progressive,
        LevelKey::PronounceMeaning,
        LevelKey::PronounceOnly,
        LevelKey::MeaningOnly,
        LevelKey::PronounceBlind,
    ];

    /// Stable key used in record namespaces and config files.
    pub fn as_str(self) -> &'static str {
        match self {
            LevelKey::VocabularyLearning => "vocabulary-learning",
            LevelKey::Progressive => "progressive",
            LevelKey::PronounceMeaning => "pronounce-meaning",
            LevelKey::PronounceOnly => "pronounce-only",
            LevelKey::MeaningOnly => "meaning-only",
            LevelKey::PronounceBlind => "pronounce-blind",
        }
    }

    pub fn parse(s: &str) -> Option<LevelKey> {
        LevelKey::ALL.into_iter().find(|key| key.as_str() == s)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            LevelKey::VocabularyLearning => "Vocabulary learning",
            LevelKey::Progressive => "Progressive reveal",
            LevelKey::PronounceMeaning => "Pronunciation + meaning",
            LevelKey::PronounceOnly => "Pronunciation only",
            LevelKey::MeaningOnly => "Meaning only",
            LevelKey::PronounceBlind => "Blind dictation",
        }
    }

    pub fn index(self) -> usize {
        LevelKey::ALL
            .iter()
            .position(|key| *key == self)
            .unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LevelDescriptor {
    pub key: LevelKey,
    pub display_name: &'static str,
}

pub fn level_descriptors() -> [LevelDescriptor; 6] {
    LevelKey::ALL.map(|key| LevelDescriptor {
        key,
        display_name: key.display_name(),
    })
}

/// What the controller should do after a full correct match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    NextWord,
    /// Stay on the same word (progressive mode: another reveal step remains).
    ContinueWord,
}

/// Mode tunables lifted out of the config so the engine never reads config
/// files itself.
#[derive(Clone, Copy, Debug)]
pub struct Tuning {
    pub vocabulary_toggle_count: u32,
    pub consecutive_mistake_limit: u32,
    pub hint_flash_ms: u64,
    pub meaning_reveal_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            vocabulary_toggle_count: 5,
            consecutive_mistake_limit: 3,
            hint_flash_ms: 600,
            meaning_reveal_ms: 1500,
        }
    }
}

/// Collaborators a level may touch during one call. The controller owns the
/// round and the scheduler; the level owns only its mode-specific state.
pub struct LevelCtx<'a> {
    pub audio: &'a mut dyn AudioSink,
    pub renderer: &'a mut dyn Renderer,
    pub round: &'a mut RoundState,
    pub timers: &'a mut Scheduler,
}

/// The per-mode contract. Some operations are no-ops for a given mode.
pub trait Level {
    fn key(&self) -> LevelKey;

    /// Reset per-word state for this mode; speak the word's cue when
    /// `play_audio` is set.
    fn begin_word(&mut self, ctx: &mut LevelCtx, word: &Word, play_audio: bool);

    /// Judge the keystroke at the current cursor. Returns true when the
    /// character should be inserted into the typed buffer. Mistake accounting
    /// happens in here (mode-specific rules apply).
    fn validate_input(&mut self, ctx: &mut LevelCtx, key: KeyInput, word: &Word) -> bool;

    /// Recompute and push the current display state from the typed buffer.
    fn render_current(&self, ctx: &mut LevelCtx, word: &Word);

    /// Called once the buffer case-insensitively equals the target.
    fn word_complete(&mut self, ctx: &mut LevelCtx, word: &Word) -> Signal;

    /// Re-trigger the mode's canonical audio cue.
    fn replay_audio(&mut self, _ctx: &mut LevelCtx, _word: &Word) {}

    /// A timer owned by this mode fired.
    fn on_timer(&mut self, _ctx: &mut LevelCtx, _word: &Word, _ev: TimerEvent) {}

    /// Cancel pending mode-owned timers.
    fn cleanup(&mut self, _ctx: &mut LevelCtx) {}

    /// Whether this mode takes typed character input at all.
    fn accepts_typing(&self) -> bool {
        true
    }

    /// Enter/Space in non-typing modes. `Some(signal)` requests a transition.
    fn advance_key(&mut self, _ctx: &mut LevelCtx, _word: &Word) -> Option<Signal> {
        None
    }
}

/// Closed-set factory. Only the progressive mode needs randomness (choice
/// palette shuffling).
pub fn make_level(key: LevelKey, tuning: Tuning, rng: SmallRng) -> Box<dyn Level> {
    match key {
        LevelKey::VocabularyLearning => Box::new(VocabularyLevel::new(tuning)),
        LevelKey::Progressive => Box::new(ProgressiveLevel::new(tuning, rng)),
        LevelKey::PronounceMeaning
        | LevelKey::PronounceOnly
        | LevelKey::MeaningOnly
        | LevelKey::PronounceBlind => {
            Box::new(MaskedLevel::new(key, MaskedStyle::for_key(key), tuning))
        }
    }
}
