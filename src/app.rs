use std::time::{Duration, Instant};

use log::warn;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::engine::level::{LevelKey, level_descriptors};
use crate::lesson::{BuiltinLesson, StoredLesson, builtin_lesson_names};
use crate::session::controller::{Pacing, Phase, SessionContext, SessionController};
use crate::session::result::BestRecord;
use crate::sinks::{FrameBuffer, LessonSource, MemoryRecords, NullAudio, RecordSink};
use crate::store::json_store::JsonStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Round,
    Summary,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub session: Option<SessionController>,
    pub frame: FrameBuffer,
    pub menu_selected: usize,
    pub lesson_names: Vec<String>,
    pub last_best: Option<BestRecord>,
    pub status: Option<String>,
    pub should_quit: bool,
    audio: NullAudio,
    store: Option<JsonStore>,
    memory: MemoryRecords,
}

impl App {
    pub fn new() -> Self {
        let mut config = Config::load().unwrap_or_else(|err| {
            warn!("failed to load config, using defaults: {err}");
            Config::default()
        });
        config.validate();

        let store = match JsonStore::new() {
            Ok(store) => Some(store),
            Err(err) => {
                // Records degrade to in-memory; rounds still run.
                warn!("record store unavailable, records will not persist: {err}");
                None
            }
        };

        let menu_selected = LevelKey::parse(&config.level)
            .map(LevelKey::index)
            .unwrap_or(1);

        Self {
            screen: AppScreen::Menu,
            config,
            session: None,
            frame: FrameBuffer::default(),
            menu_selected,
            lesson_names: builtin_lesson_names(),
            last_best: None,
            status: None,
            should_quit: false,
            audio: NullAudio,
            store,
            memory: MemoryRecords::default(),
        }
    }

    /// Run `f` against the active session with a context assembled from the
    /// app's collaborator fields.
    pub fn with_session<R>(
        &mut self,
        f: impl FnOnce(&mut SessionController, &mut SessionContext) -> R,
    ) -> Option<R> {
        let App {
            session,
            audio,
            frame,
            store,
            memory,
            ..
        } = self;
        let session = session.as_mut()?;
        let records: &mut dyn RecordSink = match store.as_mut() {
            Some(store) => store,
            None => memory,
        };
        let mut ctx = SessionContext {
            audio,
            renderer: frame,
            records,
        };
        Some(f(session, &mut ctx))
    }

    pub fn selected_level(&self) -> LevelKey {
        level_descriptors()[self.menu_selected.min(5)].key
    }

    pub fn start_round(&mut self) {
        let key = self.selected_level();
        self.config.level = key.as_str().to_string();
        self.status = None;

        let words_per_round = self.config.words_per_round;
        let stored = self
            .store
            .as_ref()
            .and_then(|store| store.find_lesson(&self.config.lesson));
        let mut source: Box<dyn LessonSource> = match stored {
            Some(data) => Box::new(StoredLesson::new(
                data,
                words_per_round,
                SmallRng::from_entropy(),
            )),
            None => match BuiltinLesson::load(
                &self.config.lesson,
                words_per_round,
                SmallRng::from_entropy(),
            ) {
                Ok(lesson) => Box::new(lesson),
                Err(err) => {
                    self.status = Some(format!("{err}"));
                    return;
                }
            },
        };

        let pacing = Pacing {
            advance_delay: Duration::from_millis(self.config.advance_delay_ms),
            banner: Duration::from_millis(self.config.banner_ms),
        };
        match SessionController::new(
            key,
            source.as_mut(),
            self.config.tuning(),
            pacing,
            SmallRng::from_entropy(),
        ) {
            Ok(controller) => {
                self.frame = FrameBuffer::default();
                self.session = Some(controller);
                if let Some(Err(err)) = self.with_session(|s, ctx| s.start_round(ctx)) {
                    warn!("round failed to start: {err}");
                    self.session = None;
                    return;
                }
                self.screen = AppScreen::Round;
            }
            Err(err) => {
                self.status = Some(format!("{err}"));
            }
        }
    }

    /// Pump session timers. The round-to-summary transition rides on the same
    /// tick that completes the round.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let complete = self
            .with_session(|session, ctx| {
                session.tick(now, ctx);
                session.phase() == Phase::Complete
            })
            .unwrap_or(false);

        if complete && self.screen == AppScreen::Round {
            self.last_best = self
                .with_session(|session, ctx| ctx.records.best_for(session.record_key()))
                .flatten();
            self.screen = AppScreen::Summary;
        }
    }

    pub fn abandon_round(&mut self) {
        self.with_session(|session, ctx| session.abandon(ctx));
        self.session = None;
        self.go_to_menu();
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
        if let Err(err) = self.config.save() {
            warn!("failed to save config: {err}");
        }
    }

    pub fn menu_prev(&mut self) {
        self.menu_selected = self.menu_selected.checked_sub(1).unwrap_or(5);
    }

    pub fn menu_next(&mut self) {
        self.menu_selected = (self.menu_selected + 1) % 6;
    }

    /// Cycle through the built-in lessons. `step` is +1 or -1.
    pub fn cycle_lesson(&mut self, step: isize) {
        if self.lesson_names.is_empty() {
            return;
        }
        let len = self.lesson_names.len() as isize;
        let current = self
            .lesson_names
            .iter()
            .position(|name| *name == self.config.lesson)
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(len) as usize;
        self.config.lesson = self.lesson_names[next].clone();
        self.status = None;
    }
}
