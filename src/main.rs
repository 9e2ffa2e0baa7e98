use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing::error;
use tracing_subscriber::EnvFilter;

use polly_tts_cache::{AppConfig, AwsPollyTTS, ConfigError, ConfigLayer, SpeechPipeline};

/// pollyc - Amazon Polly speech synthesis with a local audio cache
#[derive(Parser, Debug)]
#[command(name = "pollyc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output audio file
    #[arg(short = 'o', long = "ofile", value_name = "FILE")]
    ofile: Option<String>,

    /// Text to speak, optionally prefixed with metatags
    #[arg(short = 't', long = "text")]
    text: Option<String>,

    /// AWS access key id
    #[arg(short = 'k', long = "keyid")]
    keyid: Option<String>,

    /// AWS secret access key
    #[arg(short = 'a', long = "accesskey")]
    accesskey: Option<String>,

    /// Default voice (Joanna)
    #[arg(short = 'v', long = "voiceid")]
    voiceid: Option<String>,

    /// Output format: mp3, ogg_vorbis or pcm (mp3)
    #[arg(short = 'f', long = "format")]
    format: Option<String>,

    /// Cache directory; caching is off when unset
    #[arg(short = 'c', long = "cache", value_name = "DIR")]
    cache: Option<String>,

    /// AWS region (us-west-1)
    #[arg(short = 'r', long = "region")]
    region: Option<String>,

    /// Default engine: standard, neural, long-form or generative (standard)
    #[arg(short = 'e', long = "engine")]
    engine: Option<String>,

    /// Path to configuration file (YAML)
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

impl Cli {
    fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            ofile: self.ofile.clone(),
            text: self.text.clone(),
            key_id: self.keyid.clone(),
            access_key: self.accesskey.clone(),
            voice: self.voiceid.clone(),
            format: self.format.clone(),
            cache: self.cache.clone(),
            region: self.region.clone(),
            engine: self.engine.clone(),
        }
    }
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let config = match AppConfig::load(cli.config.as_deref(), cli.layer()) {
        Ok(config) => config,
        Err(ConfigError::MissingMandatory(option)) => {
            eprintln!("mandatory option is missing: {option}");
            Cli::command().print_help()?;
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e).context("Invalid configuration"),
    };

    let synthesizer =
        AwsPollyTTS::new(config.polly_config()).context("Failed to create Polly client")?;
    let pipeline = SpeechPipeline::new(config, Arc::new(synthesizer));

    if let Err(e) = pipeline.run().await {
        error!(error = %e, "Speech synthesis failed");
        return Err(e.into());
    }

    Ok(ExitCode::SUCCESS)
}
