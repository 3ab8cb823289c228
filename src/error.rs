//! Error types shared by the record stores and the code built on top of them.

use thiserror::Error;

/// Result type for [`RecordStore`](crate::store::RecordStore) operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened.
    #[error("could not connect to `{url}`: {source}")]
    Connection {
        url: String,
        #[source]
        source: diesel::ConnectionError,
    },

    /// A query failed inside the database. These are surfaced unchanged.
    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// A row the caller required does not exist.
    #[error("{kind} `{id}` not found")]
    NotFound { kind: &'static str, id: String },
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}
