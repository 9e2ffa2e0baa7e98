//! Cache hit/miss resolution.
//!
//! Decides whether an utterance is served from the cache directory or
//! synthesized, and owns the lifecycle of cache entries (create on miss only).
//!
//! - DISABLED: no cache directory or caching switched off. Synthesize into the
//!   output file; the cache is never touched.
//! - HIT: the entry exists. Copy it to the output; no synthesis.
//! - MISS: create the cache directory, stream the synthesized audio into the
//!   entry, then copy the entry to the output.
//!
//! Synthesized audio is always written to a uniquely named temporary file next
//! to its destination and renamed onto it once the stream has been read to the
//! end. A broken stream leaves neither a truncated cache entry nor a truncated
//! output file, and concurrent misses for one key each publish a complete file.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};

use super::key::CacheKey;
use crate::core::tts::{AudioStream, SpeechSynthesizer, SynthesisRequest, TTSError};
use crate::errors::{PipelineError, PipelineResult};

/// Audio is copied from the synthesis stream in chunks of this many bytes.
pub const CHUNK_SIZE: usize = 4096;

const PARTIAL_PREFIX: &str = ".pollyc-";
const PARTIAL_SUFFIX: &str = ".part";

/// Where an utterance will come from, decided before any audio moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Disabled,
    Hit(PathBuf),
    Miss(PathBuf),
}

impl CacheLookup {
    /// Cache entry path, when caching is active.
    pub fn entry_path(&self) -> Option<&Path> {
        match self {
            Self::Disabled => None,
            Self::Hit(path) | Self::Miss(path) => Some(path),
        }
    }

    pub fn outcome(&self) -> CacheOutcome {
        match self {
            Self::Disabled => CacheOutcome::Disabled,
            Self::Hit(_) => CacheOutcome::Hit,
            Self::Miss(_) => CacheOutcome::Miss,
        }
    }
}

/// What [`CacheResolver::resolve`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Disabled,
    Hit,
    Miss,
}

impl CacheOutcome {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Hit => "hit",
            Self::Miss => "miss",
        }
    }
}

impl std::fmt::Display for CacheOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolves cache keys against one flat cache directory.
#[derive(Debug, Clone)]
pub struct CacheResolver {
    cache_dir: Option<PathBuf>,
    format: String,
}

impl CacheResolver {
    /// `cache_dir = None` disables caching structurally.
    pub fn new(cache_dir: Option<PathBuf>, format: impl Into<String>) -> Self {
        Self {
            cache_dir,
            format: format.into(),
        }
    }

    /// Entry path for `key`, or `None` without a cache directory.
    pub fn entry_path(&self, key: &CacheKey) -> Option<PathBuf> {
        self.cache_dir
            .as_deref()
            .map(|dir| key.path(dir, &self.format))
    }

    /// Classify `key` as disabled, hit or miss. Only a regular file at the
    /// entry path counts as a hit; a missing entry is a miss. Any other
    /// metadata failure is an error, raised before anything is synthesized.
    pub async fn lookup(
        &self,
        key: &CacheKey,
        cache_enabled: bool,
    ) -> PipelineResult<CacheLookup> {
        if !cache_enabled {
            return Ok(CacheLookup::Disabled);
        }
        let Some(path) = self.entry_path(key) else {
            return Ok(CacheLookup::Disabled);
        };

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(CacheLookup::Hit(path)),
            Ok(_) => Ok(CacheLookup::Miss(path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(CacheLookup::Miss(path)),
            Err(source) => Err(PipelineError::Filesystem { path, source }),
        }
    }

    /// Look `key` up and produce `output`, synthesizing only when needed.
    pub async fn resolve(
        &self,
        key: &CacheKey,
        cache_enabled: bool,
        output: &Path,
        synthesizer: &dyn SpeechSynthesizer,
        request: &SynthesisRequest,
    ) -> PipelineResult<CacheOutcome> {
        let lookup = self.lookup(key, cache_enabled).await?;
        self.fulfil(lookup, output, synthesizer, request).await
    }

    /// Produce `output` according to an earlier [`lookup`](Self::lookup).
    pub async fn fulfil(
        &self,
        lookup: CacheLookup,
        output: &Path,
        synthesizer: &dyn SpeechSynthesizer,
        request: &SynthesisRequest,
    ) -> PipelineResult<CacheOutcome> {
        let outcome = lookup.outcome();

        match lookup {
            CacheLookup::Disabled => {
                debug!(output = %output.display(), "Caching disabled, synthesizing to output");
                let stream = synthesizer.synthesize(request).await?;
                let written = stream_to_file(stream, output).await?;
                debug!(bytes = written, "Audio written to output");
            }
            CacheLookup::Hit(entry) => {
                debug!(entry = %entry.display(), "Cache hit, copying entry to output");
                copy_file(&entry, output).await?;
            }
            CacheLookup::Miss(entry) => {
                self.populate(&entry, synthesizer, request).await?;
                copy_file(&entry, output).await?;
            }
        }

        Ok(outcome)
    }

    /// Synthesize into `entry`, publishing it only after a complete read.
    async fn populate(
        &self,
        entry: &Path,
        synthesizer: &dyn SpeechSynthesizer,
        request: &SynthesisRequest,
    ) -> PipelineResult<()> {
        if let Some(dir) = self.cache_dir.as_deref() {
            fs::create_dir_all(dir)
                .await
                .map_err(PipelineError::filesystem(dir))?;
        }

        let stream = synthesizer.synthesize(request).await?;
        let written = stream_to_file(stream, entry).await?;

        info!(entry = %entry.display(), bytes = written, "Cache entry created");
        Ok(())
    }
}

/// Directory that receives the temporary file for `target`.
fn staging_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Uniquely named temporary file beside `target`, removed when dropped.
fn stage(target: &Path) -> PipelineResult<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .suffix(PARTIAL_SUFFIX)
        .tempfile_in(staging_dir(target))
        .map_err(PipelineError::filesystem(target))
}

/// Rename a fully written temporary file onto `target`.
fn publish(partial: NamedTempFile, target: &Path) -> PipelineResult<()> {
    partial
        .persist(target)
        .map_err(|e| PipelineError::Filesystem {
            path: target.to_path_buf(),
            source: e.error,
        })?;
    Ok(())
}

/// Drain `stream` into `target` in [`CHUNK_SIZE`] reads.
///
/// `target` is replaced only once the whole stream has been written and
/// flushed; on any error the temporary file is dropped and `target` keeps its
/// previous state.
async fn stream_to_file(mut stream: AudioStream, target: &Path) -> PipelineResult<u64> {
    let partial = stage(target)?;
    let handle = partial
        .as_file()
        .try_clone()
        .map_err(PipelineError::filesystem(partial.path()))?;
    let mut file = fs::File::from_std(handle);

    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = stream.read(&mut buf).await.map_err(|e| {
            TTSError::AudioGenerationFailed(format!("Failed to read audio stream: {}", e))
        })?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])
            .await
            .map_err(PipelineError::filesystem(partial.path()))?;
        total += n as u64;
    }

    file.flush()
        .await
        .map_err(PipelineError::filesystem(partial.path()))?;
    drop(file);

    publish(partial, target)?;
    Ok(total)
}

/// Copy a cache entry onto `to` with the same all-or-nothing publish.
async fn copy_file(from: &Path, to: &Path) -> PipelineResult<()> {
    let partial = stage(to)?;
    fs::copy(from, partial.path())
        .await
        .map_err(PipelineError::filesystem(to))?;
    publish(partial, to)
}
