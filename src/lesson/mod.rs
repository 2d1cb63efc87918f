use log::warn;
use rand::rngs::SmallRng;
use rust_embed::RustEmbed;

use crate::engine::level::LevelKey;
use crate::error::EngineError;
use crate::session::word::{Word, WordSet};
use crate::sinks::LessonSource;
use crate::store::schema::LessonData;

/// Default lesson files shipped with the binary, one `word, meaning` pair per
/// line.
#[derive(RustEmbed)]
#[folder = "assets/lessons/"]
struct LessonAssets;

/// Parse lesson text: one `word, meaning` pair per line. Blank lines and
/// `#` comments are skipped; a line without a comma is a word with no
/// meaning. Lines that reduce to an empty word are dropped with a warning
/// rather than poisoning the lesson.
pub fn parse_lesson(text: &str) -> Vec<Word> {
    let mut words = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (text, meaning) = match line.split_once(',') {
            Some((text, meaning)) => (text.trim(), meaning.trim()),
            None => (line, ""),
        };
        if text.is_empty() {
            warn!("lesson line {}: empty word, skipping", number + 1);
            continue;
        }
        words.push(Word::new(text, meaning));
    }
    words
}

pub fn builtin_lesson_names() -> Vec<String> {
    let mut names: Vec<String> = LessonAssets::iter()
        .filter_map(|path| path.strip_suffix(".txt").map(str::to_string))
        .collect();
    names.sort();
    names
}

pub fn builtin_lesson(name: &str) -> Result<Vec<Word>, EngineError> {
    let file = LessonAssets::get(&format!("{name}.txt"))
        .ok_or_else(|| EngineError::LessonNotFound(name.to_string()))?;
    let text = String::from_utf8_lossy(&file.data);
    Ok(parse_lesson(&text))
}

/// A built-in level list. Record keys live under the `level:` namespace.
pub struct BuiltinLesson {
    name: String,
    pool: Vec<Word>,
    words_per_round: usize,
    rng: SmallRng,
}

impl BuiltinLesson {
    pub fn load(name: &str, words_per_round: usize, rng: SmallRng) -> Result<Self, EngineError> {
        let pool = builtin_lesson(name)?;
        Ok(Self {
            name: name.to_string(),
            pool,
            words_per_round,
            rng,
        })
    }
}

impl LessonSource for BuiltinLesson {
    fn draw_words(&mut self) -> WordSet {
        WordSet::draw(&self.pool, self.words_per_round, &mut self.rng)
    }

    fn record_key(&self, level: LevelKey) -> String {
        format!("level:{}:{}", self.name, level.as_str())
    }
}

/// A user-authored (stored) lesson. Record keys live under the `lesson:`
/// namespace so owned lessons never collide with built-in levels.
pub struct StoredLesson {
    data: LessonData,
    words_per_round: usize,
    rng: SmallRng,
}

impl StoredLesson {
    pub fn new(data: LessonData, words_per_round: usize, rng: SmallRng) -> Self {
        Self {
            data,
            words_per_round,
            rng,
        }
    }
}

impl LessonSource for StoredLesson {
    fn draw_words(&mut self) -> WordSet {
        WordSet::draw(&self.data.words, self.words_per_round, &mut self.rng)
    }

    fn record_key(&self, level: LevelKey) -> String {
        format!("lesson:{}:{}", self.data.name, level.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_parse_word_meaning_pairs() {
        let words = parse_lesson("apple, りんご\nbanana, バナナ\n");
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "apple");
        assert_eq!(words[0].meaning, "りんご");
    }

    #[test]
    fn test_parse_skips_blanks_and_comments() {
        let words = parse_lesson("# fruit\n\napple, りんご\n   \n");
        assert_eq!(words.len(), 1);
    }

    #[test]
    fn test_parse_line_without_comma_has_empty_meaning() {
        let words = parse_lesson("hello\n");
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].meaning, "");
    }

    #[test]
    fn test_parse_drops_empty_word() {
        let words = parse_lesson(", orphan meaning\nokay, fine\n");
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "okay");
    }

    #[test]
    fn test_parse_meaning_keeps_extra_commas() {
        let words = parse_lesson("run, 走る, かける\n");
        assert_eq!(words[0].text, "run");
        assert_eq!(words[0].meaning, "走る, かける");
    }

    #[test]
    fn test_builtin_starter_lesson_loads() {
        let words = builtin_lesson("starter").unwrap();
        assert!(!words.is_empty());
        assert!(words.iter().all(|w| !w.is_malformed()));
    }

    #[test]
    fn test_unknown_builtin_lesson_errors() {
        assert!(matches!(
            builtin_lesson("no-such-lesson"),
            Err(EngineError::LessonNotFound(_))
        ));
    }

    #[test]
    fn test_record_key_namespaces_do_not_collide() {
        let rng = SmallRng::seed_from_u64(1);
        let builtin = BuiltinLesson::load("starter", 10, rng).unwrap();
        let stored = StoredLesson::new(
            LessonData {
                name: "starter".to_string(),
                words: vec![Word::new("cat", "猫")],
            },
            10,
            SmallRng::seed_from_u64(1),
        );
        let a = builtin.record_key(LevelKey::Progressive);
        let b = stored.record_key(LevelKey::Progressive);
        assert_ne!(a, b);
        assert!(a.starts_with("level:"));
        assert!(b.starts_with("lesson:"));
    }
}
