use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::session::result::BestRecord;
use crate::session::word::Word;

const SCHEMA_VERSION: u32 = 1;

/// Best records keyed by the lesson source's record namespace
/// (e.g. `level:starter:progressive`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordsData {
    pub schema_version: u32,
    pub records: HashMap<String, BestRecord>,
}

impl Default for RecordsData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            records: HashMap::new(),
        }
    }
}

impl RecordsData {
    /// Stale schema versions reset rather than migrate.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

/// One user-authored lesson.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LessonData {
    pub name: String,
    pub words: Vec<Word>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LessonListData {
    pub schema_version: u32,
    pub lessons: Vec<LessonData>,
}

impl Default for LessonListData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            lessons: Vec::new(),
        }
    }
}

impl LessonListData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}
