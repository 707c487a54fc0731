use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

pub(crate) const MODELS_DIR: &str = "models";
pub(crate) const DEFAULT_MODEL_FILE: &str = "voice_model.json";

/// Immutable pipeline constants shared by every analysis component.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Sample rate every waveform is analyzed at.
    pub sample_rate: u32,
    /// Micro-segment duration in seconds.
    pub segment_duration: f64,
    /// Fraction of a window shared with its successor.
    pub overlap: f64,
    /// Windows with mean frame RMS below this are treated as silence.
    pub energy_threshold: f32,
    /// Feature extraction pads shorter segments up to this duration.
    pub min_feature_duration: f64,
    pub n_fft: usize,
    pub hop_length: usize,
    pub n_mfcc: usize,
    pub n_mels: usize,
    /// Search range for the per-segment pitch tracker.
    pub pitch_min_hz: f64,
    pub pitch_max_hz: f64,
    /// Search range used for the pitch scalar inside the feature vector.
    pub feature_pitch_min_hz: f64,
    pub feature_pitch_max_hz: f64,
    /// Maximum start-to-previous-end gap for two segments to merge.
    pub adjacency_tolerance: f64,
}

impl AnalysisConfig {
    /// Hop between consecutive window starts.
    pub fn segment_hop(&self) -> f64 {
        self.segment_duration * (1.0 - self.overlap)
    }

    pub fn segment_samples(&self) -> usize {
        (self.segment_duration * self.sample_rate as f64) as usize
    }

    pub fn min_feature_samples(&self) -> usize {
        (self.min_feature_duration * self.sample_rate as f64) as usize
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22_050,
            segment_duration: 0.2,
            overlap: 0.5,
            energy_threshold: 0.01,
            min_feature_duration: 0.1,
            n_fft: 2048,
            hop_length: 512,
            n_mfcc: 13,
            n_mels: 128,
            pitch_min_hz: 80.0,
            pitch_max_hz: 1200.0,
            feature_pitch_min_hz: 150.0,
            feature_pitch_max_hz: 4000.0,
            adjacency_tolerance: 0.05,
        }
    }
}

/// Locations of runtime assets (classifier weights).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_path: PathBuf,
}

impl AppConfig {
    /// Use `path` verbatim when given, otherwise discover the bundled weights.
    ///
    /// A discovered path may still point at a missing file; the pipeline
    /// degrades to the canned result in that case.
    pub fn from_override(path: Option<PathBuf>) -> Result<Self> {
        let model_path = match path {
            Some(custom) => custom,
            None => default_model_path()?,
        };
        Ok(Self { model_path })
    }
}

fn default_model_path() -> Result<PathBuf> {
    if let Ok(dir) = models_dir_near_executable() {
        return Ok(dir.join(DEFAULT_MODEL_FILE));
    }
    let cwd = std::env::current_dir().context("unable to resolve working directory")?;
    Ok(models_dir_under(&cwd)
        .unwrap_or_else(|| PathBuf::from(MODELS_DIR))
        .join(DEFAULT_MODEL_FILE))
}

fn models_dir_near_executable() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("unable to resolve current executable path")?;
    exe.ancestors()
        .find_map(models_dir_under)
        .ok_or_else(|| anyhow!("could not locate a models directory alongside binary"))
}

fn models_dir_under(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(MODELS_DIR);
    candidate.is_dir().then_some(candidate)
}
