pub(crate) mod pitch;
pub(crate) mod spectrum;
pub(crate) mod statistics;

use aus::analysis;
use ndarray::Array1;

use crate::config::AnalysisConfig;
use crate::voice::{Result, VoiceError};

use spectrum::{compute_spectrograms, power_to_db};
use statistics as stats;

/// Number of trailing scalar statistics appended after the spectral means.
pub const SCALAR_FEATURES: usize = 11;
const TOP_DB: f64 = 80.0;

/// Fixed-order feature vector handed to the classifier.
pub type FeatureVector = Array1<f32>;

/// Turns one micro-segment into a fixed-length feature vector.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: AnalysisConfig,
}

impl FeatureExtractor {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Length of every vector produced by [`FeatureExtractor::extract`].
    pub fn dimension(&self) -> usize {
        self.config.n_mfcc + self.config.n_mels + SCALAR_FEATURES
    }

    pub fn extract(&self, samples: &[f32]) -> Result<FeatureVector> {
        let config = &self.config;
        let audio = pad_to_minimum(samples, config.min_feature_samples());
        if audio.iter().any(|s| !s.is_finite()) {
            return Err(VoiceError::Feature(
                "segment contains non-finite samples".to_string(),
            ));
        }

        let spectrograms = compute_spectrograms(&audio, config);
        let magnitude = &spectrograms.magnitude;

        let mfcc = analysis::mel::mfcc_spectrogram(&spectrograms.mel, config.n_mfcc, None);
        let log_mel = power_to_db(&spectrograms.mel, TOP_DB);

        let rms = stats::rms_frames(&audio, config.n_fft, config.hop_length);
        let zcr = stats::zero_crossing_rates(&audio, config.n_fft, config.hop_length);
        let pitch_track = pitch::dominant_frequencies(
            magnitude,
            config.feature_pitch_min_hz,
            config.feature_pitch_max_hz,
        );
        let [rms_start, rms_middle, rms_end] = stats::rms_thirds(&rms);

        let mut features = Vec::with_capacity(self.dimension());
        features.extend(stats::column_means(&mfcc, config.n_mfcc));
        features.extend(stats::column_means(&log_mel, config.n_mels));
        features.extend([
            stats::mean(&zcr),
            stats::mean(&stats::spectral_centroids(&magnitude.frames, &magnitude.freqs)),
            pitch::mean_voiced(&pitch_track).unwrap_or(0.0),
            stats::mean(&rms),
            stats::variance(&rms),
            stats::mean(&stats::onset_strength(&log_mel)),
            stats::mean(&stats::spectral_rolloffs(&magnitude.frames, &magnitude.freqs)),
            stats::mean(&stats::spectral_contrasts(&magnitude.frames, &magnitude.freqs)),
            rms_start,
            rms_middle,
            rms_end,
        ]);

        if features.len() != self.dimension() {
            return Err(VoiceError::Feature(format!(
                "assembled {} features, expected {}",
                features.len(),
                self.dimension()
            )));
        }
        Ok(features
            .into_iter()
            .map(|v| if v.is_finite() { v as f32 } else { 0.0 })
            .collect())
    }
}

fn pad_to_minimum(samples: &[f32], min_len: usize) -> Vec<f32> {
    let mut audio = samples.to_vec();
    if audio.len() < min_len {
        audio.resize(min_len, 0.0);
    }
    audio
}
