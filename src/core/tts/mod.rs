pub mod aws_polly;
mod base;

pub use aws_polly::{AwsPollyTTS, AwsPollyTTSConfig, DEFAULT_REGION, PollyEngine, PollyOutputFormat};
pub use base::{AudioStream, SpeechSynthesizer, SynthesisRequest, TTSError, TTSResult, TextType};
