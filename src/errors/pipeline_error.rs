use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::tts::TTSError;

/// Fatal errors raised while resolving an utterance to an audio file.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Cache directory creation, cache write or output write failed
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The synthesis call failed or its audio stream broke off
    #[error("Remote service error: {0}")]
    RemoteService(#[from] TTSError),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Adapter for `map_err` on filesystem calls touching `path`.
    pub fn filesystem(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }
}
