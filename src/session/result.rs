use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::round::RoundState;

/// Outcome of one completed round, handed to record/XP consumers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundSummary {
    pub level: String,
    pub accuracy: u32,
    pub elapsed_ms: u64,
    pub mistakes: u32,
    pub word_count: usize,
    pub skipped_words: usize,
    pub chars_typed: usize,
    pub new_record: bool,
    pub timestamp: DateTime<Utc>,
}

impl RoundSummary {
    pub fn from_round(round: &RoundState, level: &str, word_count: usize) -> Self {
        Self {
            level: level.to_string(),
            accuracy: round.accuracy(),
            elapsed_ms: round.elapsed_ms(),
            mistakes: round.mistake_count,
            word_count,
            skipped_words: round.skipped_words,
            chars_typed: round.chars_typed,
            new_record: false,
            timestamp: Utc::now(),
        }
    }

    pub fn as_record(&self) -> BestRecord {
        BestRecord {
            accuracy: self.accuracy,
            elapsed_ms: self.elapsed_ms,
            achieved_at: self.timestamp,
        }
    }
}

/// Stored best for one lesson/level key. "Better" means higher accuracy,
/// tie-broken by lower elapsed time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BestRecord {
    pub accuracy: u32,
    pub elapsed_ms: u64,
    pub achieved_at: DateTime<Utc>,
}

impl BestRecord {
    pub fn beats(&self, other: &BestRecord) -> bool {
        self.accuracy > other.accuracy
            || (self.accuracy == other.accuracy && self.elapsed_ms < other.elapsed_ms)
    }
}
