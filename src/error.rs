use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("a round needs at least one word")]
    EmptyWordSet,

    #[error("a round is already in progress")]
    RoundInProgress,

    #[error("unknown lesson `{0}`")]
    LessonNotFound(String),

    #[error("unknown level key `{0}`")]
    UnknownLevel(String),
}
