//! Leading metatag parsing.
//!
//! Input text may start with any number of bracketed directives that steer the
//! synthesis call without being spoken:
//!
//! ```text
//! <voice-id="Matthew"><voice-engine="neural"><no-cache/><speak>Hi</speak>
//! ```
//!
//! Tags are scanned left to right from the very start of the text. Scanning
//! stops at the first non-tag character or at `<speak>`, which is kept in the
//! body because the service needs the SSML root element. Every other leading
//! tag is consumed, recognized or not.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::core::tts::TextType;

/// Voice used when neither the configuration nor a metatag picks one.
pub const DEFAULT_VOICE: &str = "Joanna";

/// Engine used when neither the configuration nor a metatag picks one.
pub const DEFAULT_ENGINE: &str = "standard";

/// A bracketed unit at the front of the text: `<`, anything, the first `>`.
static LEADING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<.*?>").expect("valid regex"));

static VOICE_ID_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)^<voice-id="(.*?)">$"#).expect("valid regex"));

static VOICE_ENGINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)^<voice-engine="(.*?)">$"#).expect("valid regex"));

/// Directive state threaded from configuration through parsing into resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisDirectives {
    pub voice: String,
    pub engine: String,
    pub cache_enabled: bool,
    pub text_type: TextType,
}

impl Default for SynthesisDirectives {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            engine: DEFAULT_ENGINE.to_string(),
            cache_enabled: true,
            text_type: TextType::Text,
        }
    }
}

impl SynthesisDirectives {
    /// Fold one metatag into the directive state.
    fn apply(&mut self, tag: &Metatag) {
        match tag {
            Metatag::Speak => self.text_type = TextType::Ssml,
            Metatag::VoiceId(voice) => self.voice = voice.clone(),
            Metatag::VoiceEngine(engine) => self.engine = engine.clone(),
            Metatag::NoCache => self.cache_enabled = false,
            Metatag::Unrecognized(raw) => warn!(metatag = %raw, "Metatag ignored"),
        }
    }
}

/// One leading tag, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metatag {
    /// `<speak>`: switches to SSML and ends scanning
    Speak,
    /// `<voice-id="NAME">`
    VoiceId(String),
    /// `<voice-engine="NAME">`
    VoiceEngine(String),
    /// `<no-cache/>` or `<no-cache>`
    NoCache,
    /// Anything else in brackets; dropped with a warning
    Unrecognized(String),
}

impl Metatag {
    fn classify(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        if lowered == "<speak>" {
            return Self::Speak;
        }
        if lowered == "<no-cache/>" || lowered == "<no-cache>" {
            return Self::NoCache;
        }
        if let Some(caps) = VOICE_ID_TAG.captures(raw) {
            return Self::VoiceId(caps[1].to_string());
        }
        if let Some(caps) = VOICE_ENGINE_TAG.captures(raw) {
            return Self::VoiceEngine(caps[1].to_string());
        }
        Self::Unrecognized(raw.to_string())
    }
}

/// Stripped text plus the final directive state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub directives: SynthesisDirectives,
    pub body: String,
}

/// Split `raw_text` into its leading metatags and the remaining body.
///
/// A `<speak>` tag is reported as the last metatag and is left at the start of
/// the returned body.
pub fn scan(raw_text: &str) -> (Vec<Metatag>, &str) {
    let mut tags = Vec::new();
    let mut rest = raw_text;

    while let Some(found) = LEADING_TAG.find(rest) {
        let tag = Metatag::classify(found.as_str());
        if tag == Metatag::Speak {
            tags.push(tag);
            break;
        }
        rest = &rest[found.end()..];
        tags.push(tag);
    }

    (tags, rest)
}

/// Parse leading metatags of `raw_text` on top of `initial` directives.
pub fn parse(raw_text: &str, initial: SynthesisDirectives) -> ParseResult {
    let (tags, body) = scan(raw_text);

    let mut directives = initial;
    for tag in &tags {
        directives.apply(tag);
    }

    debug!(
        metatags = tags.len(),
        voice = %directives.voice,
        engine = %directives.engine,
        cache_enabled = directives.cache_enabled,
        text_type = %directives.text_type,
        "Metatags parsed"
    );

    ParseResult {
        directives,
        body: body.to_string(),
    }
}
