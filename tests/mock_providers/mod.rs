//! Mock Speech Synthesizers
//!
//! In-process stand-ins for the Polly client:
//! - Counting synthesizer returning fixed audio
//! - Service failure before any audio is produced
//! - Stream that breaks after a partial read

// Allow dead code in test infrastructure - not every test binary uses every mock
#![allow(dead_code)]

use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

use polly_tts_cache::{AudioStream, SpeechSynthesizer, SynthesisRequest, TTSError, TTSResult};

/// How the mock answers a synthesis request.
#[derive(Clone, Debug)]
pub enum MockBehavior {
    /// Stream the configured audio completely
    Succeed,
    /// Reject the request as the remote service would
    ServiceError(String),
    /// Deliver the first `n` bytes, then fail the read
    BreakAfter(usize),
}

/// Synthesizer double that counts calls and remembers requests.
pub struct MockSynthesizer {
    audio: Vec<u8>,
    behavior: MockBehavior,
    calls: AtomicUsize,
    requests: Mutex<Vec<SynthesisRequest>>,
}

impl MockSynthesizer {
    pub fn new(audio: impl Into<Vec<u8>>) -> Self {
        Self::with_behavior(audio, MockBehavior::Succeed)
    }

    pub fn with_behavior(audio: impl Into<Vec<u8>>, behavior: MockBehavior) -> Self {
        Self {
            audio: audio.into(),
            behavior,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self::with_behavior(Vec::<u8>::new(), MockBehavior::ServiceError(message.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SynthesisRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> TTSResult<AudioStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        match &self.behavior {
            MockBehavior::Succeed => Ok(Box::pin(Cursor::new(self.audio.clone()))),
            MockBehavior::ServiceError(message) => Err(TTSError::ProviderError(message.clone())),
            MockBehavior::BreakAfter(n) => {
                let head = self.audio[..(*n).min(self.audio.len())].to_vec();
                Ok(Box::pin(Cursor::new(head).chain(BrokenReader)))
            }
        }
    }
}

/// Reader whose every poll fails, as a dropped connection would.
struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        )))
    }
}

/// Deterministic pseudo-audio, distinct per seed.
pub fn fake_audio(seed: u8, len: usize) -> Vec<u8> {
    let mut state: u32 = 0x9E37_79B9 ^ seed as u32;
    (0..len)
        .map(|_| {
            // Linear congruential generator
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}
