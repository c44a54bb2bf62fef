use std::io;
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of the durable store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Disk I/O failed; the in-memory view was not changed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// A frame failed its checksum, could not be decoded, or claims a length that
    /// committed data contradicts.
    #[error("corrupt log {} at offset {offset}: {reason}", path.display())]
    Corrupt {
        path: PathBuf,
        offset: u64,
        reason: String,
    },

    /// A failed append could not be rolled back; the log refuses further writes
    /// until the store is reopened.
    #[error("log {} is unusable after a failed rollback", path.display())]
    Poisoned { path: PathBuf },

    /// A value could not be encoded.
    #[error("encoding failed: {0}")]
    Codec(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        StoreError::Io {
            context: context.into(),
            source,
        }
    }
}
