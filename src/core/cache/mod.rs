//! Content-addressed audio cache.

pub mod key;
pub mod resolver;

pub use key::{CacheKey, canonical_voice, normalize_cache_dir};
pub use resolver::{CHUNK_SIZE, CacheLookup, CacheOutcome, CacheResolver};
