//! Base trait and types for speech synthesis clients.
//!
//! The resolution pipeline treats the remote text-to-speech service as an
//! injected capability: anything implementing [`SpeechSynthesizer`] can turn a
//! [`SynthesisRequest`] into a readable audio byte stream.

use std::pin::Pin;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;

// =============================================================================
// Error Types
// =============================================================================

/// Errors raised by a synthesis client.
#[derive(Debug, Error)]
pub enum TTSError {
    /// The request or client configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The remote service rejected or failed the request
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// The audio stream could not be read to completion
    #[error("Audio generation failed: {0}")]
    AudioGenerationFailed(String),
}

/// Result type for synthesis operations.
pub type TTSResult<T> = Result<T, TTSError>;

// =============================================================================
// Request Types
// =============================================================================

/// Input text type understood by the synthesis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextType {
    /// Plain text input
    #[default]
    Text,
    /// SSML (Speech Synthesis Markup Language) input
    Ssml,
}

impl TextType {
    /// Convert to the service's API string.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Ssml => "ssml",
        }
    }
}

impl std::fmt::Display for TextType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
    pub text_type: TextType,
    pub format: String,
    pub engine: String,
}

/// Audio returned by a synthesis client, read incrementally by the caller.
pub type AudioStream = Pin<Box<dyn AsyncRead + Send>>;

/// Trait implemented by every speech synthesis client.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `request` and hand back the audio as a byte stream.
    async fn synthesize(&self, request: &SynthesisRequest) -> TTSResult<AudioStream>;
}
