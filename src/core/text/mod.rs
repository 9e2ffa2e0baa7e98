//! Text preprocessing: metatag extraction and hash normalization.

pub mod metatag;
pub mod normalizer;

pub use metatag::{
    DEFAULT_ENGINE, DEFAULT_VOICE, Metatag, ParseResult, SynthesisDirectives, parse, scan,
};
pub use normalizer::normalize;
