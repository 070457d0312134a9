//! Store adapter failure semantics: every adapter call returns `Ok`,
//! `NotFound`, `Conflict`, `Unavailable`, or `Internal`. Only `Unavailable`
//! is retryable. This is intentionally narrower than `GrizabellaError` — the
//! write coordinator and planner classify it into the richer taxonomy.

#[derive(Debug, thiserror::Error, Clone)]
pub enum AdapterError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("internal adapter error: {0}")]
    Internal(String),
}

impl AdapterError {
    pub fn retryable(&self) -> bool {
        matches!(self, AdapterError::Unavailable(_))
    }
}

pub type AdapterResult<T> = std::result::Result<T, AdapterError>;
