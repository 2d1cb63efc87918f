use std::collections::HashMap;

use crate::session::result::BestRecord;
use crate::session::word::WordSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Locale {
    English,
    Japanese,
}

impl Locale {
    pub fn tag(self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Japanese => "ja",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Type,
    Mistype,
    Correct,
    Excellent,
    Complete,
}

/// Speech and feedback-tone playback. Fire-and-forget; implementations cancel
/// any in-flight utterance before starting a new one.
pub trait AudioSink {
    fn speak(&mut self, text: &str, locale: Locale);
    fn feedback(&mut self, tone: Tone);
}

/// Degraded-operation sink: every call is a no-op.
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn speak(&mut self, _text: &str, _locale: Locale) {}
    fn feedback(&mut self, _tone: Tone) {}
}

/// Best-record lookups and writes. Write failures are the implementation's
/// problem; the session never retries and never blocks on them.
pub trait RecordSink {
    fn best_for(&self, key: &str) -> Option<BestRecord>;
    /// Store `record` if it beats the current best. Returns true if stored.
    fn put_if_better(&mut self, key: &str, record: &BestRecord) -> bool;
}

/// In-memory record sink. Used in tests and as a fallback when the on-disk
/// store cannot be created.
#[derive(Default)]
pub struct MemoryRecords {
    records: HashMap<String, BestRecord>,
}

impl RecordSink for MemoryRecords {
    fn best_for(&self, key: &str) -> Option<BestRecord> {
        self.records.get(key).cloned()
    }

    fn put_if_better(&mut self, key: &str, record: &BestRecord) -> bool {
        match self.records.get(key) {
            Some(best) if !record.beats(best) => false,
            _ => {
                self.records.insert(key.to_string(), record.clone());
                true
            }
        }
    }
}

/// Where rounds get their words and the namespace their records live under.
/// The key namespace is owned by the source, so the session never branches on
/// lesson kind.
pub trait LessonSource {
    fn draw_words(&mut self) -> WordSet;
    fn record_key(&self, level: crate::engine::level::LevelKey) -> String;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharStatus {
    Pending,
    Correct,
    Incorrect,
    Hidden,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharCell {
    pub ch: char,
    pub status: CharStatus,
}

impl CharCell {
    pub fn new(ch: char, status: CharStatus) -> Self {
        Self { ch, status }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintChoice {
    pub letter: char,
    pub consumed: bool,
}

/// Display surface the engine pushes state into. Implementations decide how
/// cells and hint palettes actually look.
pub trait Renderer {
    fn set_character_statuses(&mut self, cells: &[CharCell]);
    fn set_hint_choices(&mut self, choices: &[HintChoice]);
    fn set_meaning(&mut self, meaning: Option<&str>);
    fn set_message(&mut self, message: Option<&str>);
}

/// Renderer that retains the last pushed state. The terminal widgets draw
/// from it each frame, and tests assert against it directly.
#[derive(Clone, Debug, Default)]
pub struct FrameBuffer {
    pub cells: Vec<CharCell>,
    pub hints: Vec<HintChoice>,
    pub meaning: Option<String>,
    pub message: Option<String>,
}

impl Renderer for FrameBuffer {
    fn set_character_statuses(&mut self, cells: &[CharCell]) {
        self.cells = cells.to_vec();
    }

    fn set_hint_choices(&mut self, choices: &[HintChoice]) {
        self.hints = choices.to_vec();
    }

    fn set_meaning(&mut self, meaning: Option<&str>) {
        self.meaning = meaning.map(str::to_string);
    }

    fn set_message(&mut self, message: Option<&str>) {
        self.message = message.map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(accuracy: u32, elapsed_ms: u64) -> BestRecord {
        BestRecord {
            accuracy,
            elapsed_ms,
            achieved_at: Utc::now(),
        }
    }

    #[test]
    fn test_memory_records_first_write_always_stores() {
        let mut sink = MemoryRecords::default();
        assert!(sink.put_if_better("k", &record(80, 9000)));
        assert_eq!(sink.best_for("k").unwrap().accuracy, 80);
    }

    #[test]
    fn test_memory_records_higher_accuracy_wins() {
        let mut sink = MemoryRecords::default();
        sink.put_if_better("k", &record(80, 9000));
        assert!(sink.put_if_better("k", &record(90, 12000)));
        assert!(!sink.put_if_better("k", &record(85, 1000)));
        assert_eq!(sink.best_for("k").unwrap().accuracy, 90);
    }

    #[test]
    fn test_memory_records_tie_broken_by_elapsed() {
        let mut sink = MemoryRecords::default();
        sink.put_if_better("k", &record(90, 9000));
        assert!(sink.put_if_better("k", &record(90, 8000)));
        assert!(!sink.put_if_better("k", &record(90, 8500)));
        assert_eq!(sink.best_for("k").unwrap().elapsed_ms, 8000);
    }

    #[test]
    fn test_frame_buffer_retains_last_push() {
        let mut frame = FrameBuffer::default();
        frame.set_character_statuses(&[CharCell::new('a', CharStatus::Correct)]);
        frame.set_meaning(Some("りんご"));
        assert_eq!(frame.cells.len(), 1);
        assert_eq!(frame.meaning.as_deref(), Some("りんご"));
        frame.set_meaning(None);
        assert!(frame.meaning.is_none());
    }
}
