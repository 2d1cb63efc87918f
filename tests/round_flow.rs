//! End-to-end round scenarios driven through the session controller, the way
//! the terminal host drives it.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use speldr::engine::level::{LevelKey, Tuning};
use speldr::engine::validate::KeyInput;
use speldr::session::controller::{Pacing, Phase, SessionContext, SessionController};
use speldr::session::word::{Word, WordSet};
use speldr::sinks::{
    AudioSink, CharStatus, FrameBuffer, LessonSource, Locale, MemoryRecords, RecordSink, Tone,
};

struct FixedSource {
    words: Vec<Word>,
}

impl FixedSource {
    fn new(words: &[(&str, &str)]) -> Self {
        Self {
            words: words.iter().map(|(t, m)| Word::new(*t, *m)).collect(),
        }
    }
}

impl LessonSource for FixedSource {
    fn draw_words(&mut self) -> WordSet {
        WordSet::from_words(self.words.clone())
    }

    fn record_key(&self, level: LevelKey) -> String {
        format!("test:{}", level.as_str())
    }
}

#[derive(Default)]
struct SpyAudio {
    spoken: Vec<(String, Locale)>,
    tones: Vec<Tone>,
}

impl AudioSink for SpyAudio {
    fn speak(&mut self, text: &str, locale: Locale) {
        self.spoken.push((text.to_string(), locale));
    }

    fn feedback(&mut self, tone: Tone) {
        self.tones.push(tone);
    }
}

struct Host {
    audio: SpyAudio,
    frame: FrameBuffer,
    records: MemoryRecords,
}

impl Host {
    fn new() -> Self {
        Self {
            audio: SpyAudio::default(),
            frame: FrameBuffer::default(),
            records: MemoryRecords::default(),
        }
    }

    fn ctx(&mut self) -> SessionContext<'_> {
        SessionContext {
            audio: &mut self.audio,
            renderer: &mut self.frame,
            records: &mut self.records,
        }
    }
}

fn start(level: LevelKey, words: &[(&str, &str)], host: &mut Host) -> SessionController {
    let mut source = FixedSource::new(words);
    let mut controller = SessionController::new(
        level,
        &mut source,
        Tuning::default(),
        Pacing::default(),
        SmallRng::seed_from_u64(7),
    )
    .unwrap();
    controller.start_round(&mut host.ctx()).unwrap();
    controller
}

fn type_text(controller: &mut SessionController, host: &mut Host, text: &str) {
    for ch in text.chars() {
        controller.handle_key(KeyInput::Char(ch), &mut host.ctx());
    }
}

/// Fire every pending timer.
fn pump(controller: &mut SessionController, host: &mut Host) {
    let later = Instant::now() + Duration::from_millis(10_000);
    controller.tick(later, &mut host.ctx());
}

#[test]
fn progressive_reveal_walks_to_full_mask() {
    let mut host = Host::new();
    let mut c = start(LevelKey::Progressive, &[("hello", "こんにちは")], &mut host);

    // Pass 0 shows the whole word; each retype hides one more letter.
    assert!(
        host.frame
            .cells
            .iter()
            .all(|cell| cell.status == CharStatus::Pending)
    );

    for pass in 0..5 {
        type_text(&mut c, &mut host, "hello");
        assert_eq!(c.phase(), Phase::Active, "pass {pass} should stay on word");
        assert!(!c.round.input_locked);
        let hidden = host
            .frame
            .cells
            .iter()
            .filter(|cell| cell.status == CharStatus::Hidden)
            .count();
        assert_eq!(hidden, pass + 1);
        // Exactly the hidden letters appear in the hint palette.
        assert_eq!(host.frame.hints.len(), pass + 1);
    }

    // Final pass against the fully masked word ends the round.
    type_text(&mut c, &mut host, "hello");
    assert!(c.round.input_locked);
    pump(&mut c, &mut host);
    assert_eq!(c.phase(), Phase::Complete);

    let summary = c.summary().unwrap();
    assert_eq!(summary.accuracy, 100);
    assert_eq!(summary.chars_typed, 30);
    // One utterance per pass start plus the initial cue.
    assert_eq!(host.audio.spoken.len(), 6);
    assert!(
        host.audio
            .spoken
            .iter()
            .all(|(text, locale)| text == "hello" && *locale == Locale::English)
    );
}

#[test]
fn progressive_mask_regresses_after_repeated_hidden_mistakes() {
    let mut host = Host::new();
    let mut c = start(LevelKey::Progressive, &[("hello", "")], &mut host);

    // One clean pass: the trailing letter is now masked.
    type_text(&mut c, &mut host, "hello");
    assert_eq!(
        host.frame
            .cells
            .iter()
            .filter(|cell| cell.status == CharStatus::Hidden)
            .count(),
        1
    );

    // Reach the hidden position and miss it three times in a row.
    type_text(&mut c, &mut host, "hell");
    for _ in 0..3 {
        c.handle_key(KeyInput::Char('x'), &mut host.ctx());
    }

    // The mask reverted through the missed character: nothing hidden now.
    assert!(
        host.frame
            .cells
            .iter()
            .all(|cell| cell.status != CharStatus::Hidden)
    );
    assert_eq!(c.round.mistake_count, 3);
    // The typed prefix survives the regression.
    assert_eq!(c.round.typed_text(), "hell");
}

#[test]
fn pronounce_only_round_counts_every_mistake() {
    let mut host = Host::new();
    let mut c = start(LevelKey::PronounceOnly, &[("cat", "猫")], &mut host);

    // The cue was spoken, but no meaning is shown in this mode.
    assert_eq!(host.audio.spoken, vec![("cat".to_string(), Locale::English)]);
    assert_eq!(host.frame.meaning, None);

    for _ in 0..3 {
        c.handle_key(KeyInput::Char('z'), &mut host.ctx());
    }
    assert_eq!(
        host.audio.tones.iter().filter(|t| **t == Tone::Mistype).count(),
        3
    );
    type_text(&mut c, &mut host, "cat");
    pump(&mut c, &mut host);

    let summary = c.summary().unwrap();
    assert_eq!(summary.mistakes, 3);
    assert_eq!(summary.accuracy, 50);
}

#[test]
fn meaning_only_mode_stays_silent() {
    let mut host = Host::new();
    let mut c = start(LevelKey::MeaningOnly, &[("cat", "猫")], &mut host);

    assert!(host.audio.spoken.is_empty());
    assert_eq!(host.frame.meaning.as_deref(), Some("猫"));

    type_text(&mut c, &mut host, "cat");
    pump(&mut c, &mut host);
    assert_eq!(c.phase(), Phase::Complete);
    assert!(host.audio.spoken.is_empty());
}

#[test]
fn blind_mode_reveals_meaning_as_a_rescue_hint() {
    let mut host = Host::new();
    let mut c = start(LevelKey::PronounceBlind, &[("secret", "秘密")], &mut host);

    // Nothing on screen before typing, not even placeholder dots.
    assert!(host.frame.cells.is_empty());
    assert_eq!(host.frame.meaning, None);

    for _ in 0..3 {
        c.handle_key(KeyInput::Char('x'), &mut host.ctx());
    }
    assert_eq!(host.frame.meaning.as_deref(), Some("秘密"));

    // The reveal expires through the controller's timer pump.
    pump(&mut c, &mut host);
    assert_eq!(host.frame.meaning, None);
}

#[test]
fn ten_word_clean_round_sets_best_record() {
    let words: Vec<(&str, &str)> = vec![
        ("apple", "りんご"),
        ("banana", "バナナ"),
        ("school", "学校"),
        ("teacher", "先生"),
        ("student", "生徒"),
        ("library", "図書館"),
        ("morning", "朝"),
        ("evening", "夕方"),
        ("window", "窓"),
        ("garden", "庭"),
    ];
    let mut host = Host::new();
    let mut c = start(LevelKey::PronounceMeaning, &words, &mut host);

    for i in 0..10 {
        let word = c.current_word().unwrap().text.clone();
        type_text(&mut c, &mut host, &word);
        pump(&mut c, &mut host);
        if i < 9 {
            assert_eq!(c.phase(), Phase::Active);
        }
    }

    assert_eq!(c.phase(), Phase::Complete);
    let summary = c.summary().unwrap();
    assert_eq!(summary.word_count, 10);
    assert_eq!(summary.accuracy, 100);
    assert!(summary.new_record);
    assert_eq!(
        host.records
            .best_for("test:pronounce-meaning")
            .unwrap()
            .accuracy,
        100
    );
}

#[test]
fn vocabulary_round_is_keypress_driven() {
    let mut host = Host::new();
    let mut c = start(
        LevelKey::VocabularyLearning,
        &[("apple", "りんご"), ("school", "学校")],
        &mut host,
    );

    // Typed characters are ignored entirely in this mode.
    type_text(&mut c, &mut host, "apple");
    assert_eq!(c.round.chars_typed, 0);

    for word in ["apple", "school"] {
        // Five meaning/word pairs, one utterance per press.
        for _ in 0..10 {
            c.handle_key(KeyInput::Enter, &mut host.ctx());
        }
        assert!(host.audio.spoken.iter().any(|(text, _)| text == word));
        pump(&mut c, &mut host);
    }

    assert_eq!(c.phase(), Phase::Complete);
    assert_eq!(c.summary().unwrap().accuracy, 100);
}
