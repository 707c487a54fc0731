use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vocalyzer::{AnalysisConfig, AppConfig, VoiceAnalyzer};

/// Vocalyzer - voice-quality analysis for sung scales
///
/// Splits a recording into short windows, classifies vocal-cord vibration,
/// contact, larynx position and strength per window, and prints the grouped
/// result with feedback as JSON.
#[derive(Parser, Debug)]
#[command(name = "vocalyzer")]
#[command(version)]
#[command(about = "Voice-quality analysis for vocal recordings", long_about = None)]
struct Args {
    /// Input audio file path (supports MP3, OGG, FLAC, WAV, etc.)
    #[arg(value_name = "INPUT")]
    input_file: PathBuf,

    /// Classifier weights (JSON); defaults to models/voice_model.json
    #[arg(long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Write the JSON result here instead of stdout
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

impl Args {
    /// Validate CLI arguments
    fn validate(&self) -> Result<()> {
        if self.input_file.is_dir() {
            bail!("Input path is a directory: {:?}", self.input_file);
        }
        if let Some(output) = &self.output {
            if output.is_dir() {
                bail!("Output path is a directory: {:?}", output);
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    args.validate()
        .context("Failed to validate command-line arguments")?;

    let app = AppConfig::from_override(args.model.clone())?;
    info!(input = ?args.input_file, model = ?app.model_path, "analyzing recording");

    let analyzer = VoiceAnalyzer::new(AnalysisConfig::default());
    let result = analyzer
        .analyze_path(&args.input_file, &app.model_path)
        .context("Voice analysis failed")?;
    if let Some(reason) = result.fallback {
        warn!(%reason, "emitting canned fallback result");
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write result to {:?}", path))?;
            info!(output = ?path, "result written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
