pub mod cache;
pub mod pipeline;
pub mod text;
pub mod tts;

// Re-export commonly used types for convenience
pub use cache::{CacheKey, CacheLookup, CacheOutcome, CacheResolver};
pub use pipeline::{PipelineReport, SpeechPipeline};
pub use text::{ParseResult, SynthesisDirectives, normalize, parse};
pub use tts::{
    AudioStream, AwsPollyTTS, AwsPollyTTSConfig, SpeechSynthesizer, SynthesisRequest, TTSError,
    TTSResult, TextType,
};
