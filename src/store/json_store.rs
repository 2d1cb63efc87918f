use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use log::warn;
use serde::{Serialize, de::DeserializeOwned};

use crate::session::result::BestRecord;
use crate::sinks::RecordSink;
use crate::store::schema::{LessonData, LessonListData, RecordsData};

/// JSON-file persistence for best records and the saved lesson list.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("speldr");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    /// Atomic write: full content to a .tmp sibling, fsync, rename over.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_records(&self) -> RecordsData {
        let data: RecordsData = self.load("records.json");
        if data.needs_reset() {
            RecordsData::default()
        } else {
            data
        }
    }

    pub fn save_records(&self, data: &RecordsData) -> Result<()> {
        self.save("records.json", data)
    }

    pub fn load_lessons(&self) -> LessonListData {
        let data: LessonListData = self.load("lessons.json");
        if data.needs_reset() {
            LessonListData::default()
        } else {
            data
        }
    }

    pub fn save_lessons(&self, data: &LessonListData) -> Result<()> {
        self.save("lessons.json", data)
    }

    pub fn upsert_lesson(&self, lesson: LessonData) -> Result<()> {
        let mut data = self.load_lessons();
        match data.lessons.iter_mut().find(|l| l.name == lesson.name) {
            Some(existing) => *existing = lesson,
            None => data.lessons.push(lesson),
        }
        self.save_lessons(&data)
    }

    pub fn find_lesson(&self, name: &str) -> Option<LessonData> {
        self.load_lessons()
            .lessons
            .into_iter()
            .find(|l| l.name == name)
    }
}

impl RecordSink for JsonStore {
    fn best_for(&self, key: &str) -> Option<BestRecord> {
        self.load_records().records.get(key).cloned()
    }

    fn put_if_better(&mut self, key: &str, record: &BestRecord) -> bool {
        let mut data = self.load_records();
        let stored = match data.records.get(key) {
            Some(best) if !record.beats(best) => false,
            _ => {
                data.records.insert(key.to_string(), record.clone());
                true
            }
        };
        if stored && let Err(err) = self.save_records(&data) {
            // Never block round progression on a failed write.
            warn!("failed to persist record for {key}: {err}");
        }
        stored
    }
}
