//! The flat error taxonomy every Grizabella operation returns.

use uuid::Uuid;

/// Machine-readable error code, stable across wire/CLI boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Validation,
    SchemaConflict,
    NotFound,
    PartialWrite,
    Embedding,
    Query,
    Unavailable,
    Cancelled,
    Internal,
}

/// The error type every public Grizabella operation returns.
#[derive(Debug, thiserror::Error)]
pub enum GrizabellaError {
    /// Input violates type/schema: wrong property type, missing required
    /// property, malformed UUID, weight out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// Duplicate schema name, or delete of a type with live instances.
    #[error("schema conflict: {0}")]
    SchemaConflict(String),

    /// Referenced object, relation, or type doesn't exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Cross-store coherence couldn't be established; a `_coherence_repair`
    /// row was recorded for background fix-up.
    #[error("partial write: {stores_diverged:?} diverged from the relational write, repair row {repair_id}")]
    PartialWrite {
        stores_diverged: Vec<String>,
        repair_id: Uuid,
    },

    /// Encoder failure or dimension mismatch; the write itself still
    /// succeeded, the vector is simply missing until retried.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Unparseable or ill-typed query, including a free-standing `Not`.
    #[error("query error: {0}")]
    Query(String),

    /// Adapter reports transient I/O; retryable with backoff.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Deadline exceeded or explicit cancellation.
    #[error("cancelled")]
    Cancelled,

    /// An adapter reported a non-transient internal fault (lock poisoning,
    /// corrupted state). Not retryable, not the caller's fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GrizabellaError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GrizabellaError::Validation(_) => ErrorCode::Validation,
            GrizabellaError::SchemaConflict(_) => ErrorCode::SchemaConflict,
            GrizabellaError::NotFound(_) => ErrorCode::NotFound,
            GrizabellaError::PartialWrite { .. } => ErrorCode::PartialWrite,
            GrizabellaError::Embedding(_) => ErrorCode::Embedding,
            GrizabellaError::Query(_) => ErrorCode::Query,
            GrizabellaError::Unavailable(_) => ErrorCode::Unavailable,
            GrizabellaError::Cancelled => ErrorCode::Cancelled,
            GrizabellaError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Only `Unavailable` is retryable automatically.
    pub fn retryable(&self) -> bool {
        matches!(self, GrizabellaError::Unavailable(_))
    }

    pub fn category(&self) -> &'static str {
        match self {
            GrizabellaError::Validation(_) => "validation",
            GrizabellaError::SchemaConflict(_) => "schema",
            GrizabellaError::NotFound(_) => "not_found",
            GrizabellaError::PartialWrite { .. } => "coherence",
            GrizabellaError::Embedding(_) => "embedding",
            GrizabellaError::Query(_) => "query",
            GrizabellaError::Unavailable(_) => "availability",
            GrizabellaError::Cancelled => "cancelled",
            GrizabellaError::Internal(_) => "internal",
        }
    }

    /// CLI launcher exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            GrizabellaError::Validation(_) => 2,
            GrizabellaError::SchemaConflict(_) => 3,
            GrizabellaError::NotFound(_) => 4,
            GrizabellaError::Unavailable(_) | GrizabellaError::Cancelled => 5,
            GrizabellaError::PartialWrite { .. } | GrizabellaError::Embedding(_) => 1,
            GrizabellaError::Query(_) | GrizabellaError::Internal(_) => 1,
        }
    }
}

impl From<crate::adapters::AdapterError> for GrizabellaError {
    fn from(err: crate::adapters::AdapterError) -> Self {
        use crate::adapters::AdapterError as AE;
        match err {
            AE::NotFound(msg) => GrizabellaError::NotFound(msg),
            AE::Conflict(msg) => GrizabellaError::Validation(msg),
            AE::Unavailable(msg) => GrizabellaError::Unavailable(msg),
            AE::Internal(msg) => GrizabellaError::Internal(msg),
        }
    }
}

impl From<crate::config::ConfigError> for GrizabellaError {
    fn from(err: crate::config::ConfigError) -> Self {
        GrizabellaError::Validation(err.to_string())
    }
}

/// Result type for Grizabella operations.
pub type Result<T> = std::result::Result<T, GrizabellaError>;
