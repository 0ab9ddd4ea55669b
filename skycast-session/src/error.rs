use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading or writing conversation state.
#[derive(Debug, Error)]
pub enum StateAccessError {
    #[error("failed to access conversation state at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize conversation '{id}': {source}")]
    Serialize {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("conversation state at {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("state file {path:?} holds conversation '{found}', expected '{expected}'")]
    ForeignRecord {
        path: PathBuf,
        expected: String,
        found: String,
    },
}
