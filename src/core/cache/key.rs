//! Content-addressed cache keys.
//!
//! A key is the lowercase hex SHA-512 of `Voice~body` after combining marks are
//! stripped, so the same voice and text always land in the same cache slot.

use std::fmt;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha512};

use crate::core::text::normalize;

/// Joins the canonical voice and the body in the hash input.
const KEY_SEPARATOR: char = '~';

/// Title-case a voice identifier: first character upper, the rest lower.
///
/// The same canonical form is sent to the synthesis service.
pub fn canonical_voice(voice: &str) -> String {
    let mut chars = voice.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Hex digest identifying one (voice, text) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for `voice` speaking `body`.
    pub fn build(voice: &str, body: &str) -> Self {
        let hash_input = format!("{}{}{}", canonical_voice(voice), KEY_SEPARATOR, body);
        let normalized = normalize(&hash_input);

        let mut hasher = Sha512::new();
        hasher.update(normalized.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the cache entry, `<digest>.<format>`.
    pub fn file_name(&self, format: &str) -> String {
        format!("{}.{}", self.0, format)
    }

    /// Full path of the cache entry inside `cache_dir`.
    pub fn path(&self, cache_dir: &Path, format: &str) -> PathBuf {
        cache_dir.join(self.file_name(format))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim trailing `/` from a configured cache directory.
///
/// Returns `None` when nothing is left, which disables caching. A bare `/`
/// therefore never places the cache at the filesystem root.
pub fn normalize_cache_dir(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
