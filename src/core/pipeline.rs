//! End-to-end resolution of one utterance to an audio file.
//!
//! raw text → metatag parsing → cache key → cache lookup → output file.
//! The synthesis client is only called on a cache miss or when caching is off.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::core::cache::{CacheKey, CacheOutcome, CacheResolver, canonical_voice};
use crate::core::text::{SynthesisDirectives, parse};
use crate::core::tts::{SpeechSynthesizer, SynthesisRequest};
use crate::errors::PipelineResult;

/// Everything decided while producing one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Final directives, voice in canonical form
    pub directives: SynthesisDirectives,
    /// Text sent (or that would have been sent) to the service
    pub body: String,
    pub key: CacheKey,
    /// Cache entry path, `None` when caching was disabled
    pub cache_path: Option<PathBuf>,
    pub outcome: CacheOutcome,
}

pub struct SpeechPipeline {
    config: AppConfig,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl SpeechPipeline {
    pub fn new(config: AppConfig, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            config,
            synthesizer,
        }
    }

    /// Speak the configured text into the configured output file.
    pub async fn run(&self) -> PipelineResult<PipelineReport> {
        self.speak(&self.config.text).await
    }

    /// Speak `raw_text`, honouring its leading metatags, into the configured output file.
    pub async fn speak(&self, raw_text: &str) -> PipelineResult<PipelineReport> {
        let parsed = parse(raw_text, self.config.initial_directives());
        let mut directives = parsed.directives;
        directives.voice = canonical_voice(&directives.voice);
        let body = parsed.body;

        let key = CacheKey::build(&directives.voice, &body);
        let format = self.config.format.as_str();
        let resolver = CacheResolver::new(self.config.cache_dir.clone(), format);
        let lookup = resolver.lookup(&key, directives.cache_enabled).await?;
        let cache_path = lookup.entry_path().map(|p| p.to_path_buf());

        info!(
            region = %self.config.region,
            key_id = %self.config.key_id,
            text = %body,
            voice = %directives.voice,
            engine = %directives.engine,
            format = %format,
            text_type = %directives.text_type,
            output = %self.config.output_path.display(),
            "Synthesis request"
        );
        if let Some(path) = &cache_path {
            info!(
                cache_file = %path.display(),
                cache_hit = lookup.outcome() == CacheOutcome::Hit,
                "Cache lookup"
            );
        }

        let request = SynthesisRequest {
            text: body.clone(),
            voice: directives.voice.clone(),
            text_type: directives.text_type,
            format: format.to_string(),
            engine: directives.engine.clone(),
        };

        let outcome = resolver
            .fulfil(
                lookup,
                &self.config.output_path,
                self.synthesizer.as_ref(),
                &request,
            )
            .await?;

        info!(outcome = %outcome, output = %self.config.output_path.display(), "Speech file ready");

        Ok(PipelineReport {
            directives,
            body,
            key,
            cache_path,
            outcome,
        })
    }
}
