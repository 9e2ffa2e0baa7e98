//! Amazon Polly synthesis client module.
//!
//! - Engines: standard, neural, long-form, generative
//! - Output formats: mp3, ogg_vorbis, pcm
//! - Plain text and SSML input
//! - Explicit access key credentials per invocation
//!
//! # Architecture
//!
//! The client uses the AWS SDK for Rust to call Polly's SynthesizeSpeech API.
//! The SDK handles request signing; the response audio stream is returned
//! unread so the cache resolver decides where the bytes land.

mod config;
mod provider;

#[cfg(test)]
mod tests;

pub use config::{AwsPollyTTSConfig, DEFAULT_REGION, PollyEngine, PollyOutputFormat};
pub use provider::AwsPollyTTS;
