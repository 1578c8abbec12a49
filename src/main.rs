use std::path::PathBuf;

use clap::Parser;
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use volc_tts::{synthesize, AudioSink, Config, Error, SynthesisParams};

/// Streaming speech synthesis over the unidirectional WebSocket endpoint.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Application key (falls back to VOLC_APP_KEY).
    #[arg(long)]
    app_key: Option<String>,

    /// Access key (falls back to VOLC_ACCESS_KEY).
    #[arg(long)]
    access_key: Option<String>,

    /// Voice to synthesize with.
    #[arg(long)]
    voice: String,

    /// Text to convert.
    #[arg(long)]
    text: String,

    /// Output audio encoding.
    #[arg(long, default_value = "wav")]
    encoding: String,

    /// Overrides the voice-derived resource id.
    #[arg(long)]
    resource_id: Option<String>,

    /// WebSocket endpoint URL.
    #[arg(long)]
    endpoint: Option<String>,

    /// Directory the audio artifact is written into.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut builder = Config::builder();
    if let Some(app_key) = &args.app_key {
        builder = builder.with_app_key(app_key);
    }
    if let Some(access_key) = &args.access_key {
        builder = builder.with_access_key(access_key);
    }
    if let Some(resource_id) = &args.resource_id {
        builder = builder.with_resource_id(resource_id);
    }
    if let Some(endpoint) = &args.endpoint {
        builder = builder.with_endpoint(endpoint);
    }
    let config = builder.build();

    if config.app_key().is_empty() || config.access_key().expose_secret().is_empty() {
        tracing::error!(
            "missing credentials: pass --app-key/--access-key or set VOLC_APP_KEY/VOLC_ACCESS_KEY"
        );
        std::process::exit(2);
    }

    if let Err(err) = run(&config, &args).await {
        tracing::error!(error = %err, "synthesis failed");
        std::process::exit(1);
    }
}

async fn run(config: &Config, args: &Args) -> Result<(), Error> {
    let params = SynthesisParams::new(&args.voice, &args.text).with_encoding(&args.encoding);
    let audio = synthesize(config, &params).await?;
    tracing::info!(bytes = audio.len(), "audio received");
    AudioSink::new(&args.output_dir).save(params.voice(), params.encoding(), &audio)?;
    Ok(())
}
