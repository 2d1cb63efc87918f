use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// One practice item: the text to type and its meaning. Immutable once
/// authored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    #[serde(default)]
    pub meaning: String,
}

impl Word {
    pub fn new(text: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meaning: meaning.into(),
        }
    }

    /// Missing text makes a word unplayable; the round renders a placeholder
    /// for it instead of crashing.
    pub fn is_malformed(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn letters(&self) -> Vec<char> {
        self.text.chars().collect()
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The words for one round. Sampled and shuffled once at round start, stable
/// for the round's duration. The underlying lesson data is never mutated.
#[derive(Clone, Debug)]
pub struct WordSet {
    words: Vec<Word>,
}

impl WordSet {
    pub fn from_words(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Sample up to `count` words from the pool and shuffle the draw.
    pub fn draw(pool: &[Word], count: usize, rng: &mut SmallRng) -> Self {
        let mut words: Vec<Word> = pool.to_vec();
        words.shuffle(rng);
        words.truncate(count.max(1));
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }
}
