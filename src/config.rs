use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::level::Tuning;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_lesson")]
    pub lesson: String,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_words_per_round")]
    pub words_per_round: usize,
    #[serde(default = "default_vocabulary_toggle_count")]
    pub vocabulary_toggle_count: u32,
    #[serde(default = "default_consecutive_mistake_limit")]
    pub consecutive_mistake_limit: u32,
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
    #[serde(default = "default_hint_flash_ms")]
    pub hint_flash_ms: u64,
    #[serde(default = "default_meaning_reveal_ms")]
    pub meaning_reveal_ms: u64,
    #[serde(default = "default_banner_ms")]
    pub banner_ms: u64,
}

fn default_lesson() -> String {
    "starter".to_string()
}
fn default_level() -> String {
    "progressive".to_string()
}
fn default_words_per_round() -> usize {
    10
}
fn default_vocabulary_toggle_count() -> u32 {
    5
}
fn default_consecutive_mistake_limit() -> u32 {
    3
}
fn default_advance_delay_ms() -> u64 {
    700
}
fn default_hint_flash_ms() -> u64 {
    600
}
fn default_meaning_reveal_ms() -> u64 {
    1500
}
fn default_banner_ms() -> u64 {
    2000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lesson: default_lesson(),
            level: default_level(),
            words_per_round: default_words_per_round(),
            vocabulary_toggle_count: default_vocabulary_toggle_count(),
            consecutive_mistake_limit: default_consecutive_mistake_limit(),
            advance_delay_ms: default_advance_delay_ms(),
            hint_flash_ms: default_hint_flash_ms(),
            meaning_reveal_ms: default_meaning_reveal_ms(),
            banner_ms: default_banner_ms(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("speldr")
            .join("config.toml")
    }

    /// Clamp out-of-range values and reset unknown level keys, so stale
    /// configs from older versions load cleanly.
    pub fn validate(&mut self) {
        self.words_per_round = self.words_per_round.clamp(1, 100);
        self.vocabulary_toggle_count = self.vocabulary_toggle_count.clamp(1, 20);
        self.consecutive_mistake_limit = self.consecutive_mistake_limit.clamp(1, 10);
        self.advance_delay_ms = self.advance_delay_ms.clamp(0, 5000);
        self.hint_flash_ms = self.hint_flash_ms.clamp(100, 5000);
        self.meaning_reveal_ms = self.meaning_reveal_ms.clamp(100, 10000);
        self.banner_ms = self.banner_ms.clamp(100, 10000);
        if crate::engine::level::LevelKey::parse(&self.level).is_none() {
            self.level = default_level();
        }
    }

    pub fn tuning(&self) -> Tuning {
        Tuning {
            vocabulary_toggle_count: self.vocabulary_toggle_count,
            consecutive_mistake_limit: self.consecutive_mistake_limit,
            hint_flash_ms: self.hint_flash_ms,
            meaning_reveal_ms: self.meaning_reveal_ms,
        }
    }
}
