//! Micro-segmentation with silence rejection and per-window pitch.

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::types::{Segment, Waveform};

use super::features::{pitch, spectrum, statistics};

/// Cuts a waveform into overlapping fixed-duration windows.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: AnalysisConfig,
}

impl Segmenter {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Retained windows in temporal order, indexed from 1.
    ///
    /// Windows shorter than half the nominal length and windows whose mean
    /// frame RMS falls below the energy threshold produce no segment and do
    /// not consume an index.
    pub fn segment(&self, waveform: &Waveform) -> Vec<Segment> {
        let config = &self.config;
        let sr = waveform.sample_rate as f64;
        let duration = waveform.duration_secs();
        let window = config.segment_duration;
        let hop = config.segment_hop();
        let min_samples = 0.5 * window * sr;
        let last_start = duration - window / 2.0;

        let mut segments = Vec::new();
        let mut silent = 0usize;
        if hop <= 0.0 || sr <= 0.0 {
            return segments;
        }

        let mut step = 0usize;
        loop {
            let start_time = step as f64 * hop;
            if start_time >= last_start {
                break;
            }
            step += 1;

            let end_time = (start_time + window).min(duration);
            let start_idx = ((start_time * sr) as usize).min(waveform.samples.len());
            let end_idx = ((end_time * sr) as usize).min(waveform.samples.len());
            let samples = &waveform.samples[start_idx..end_idx.max(start_idx)];
            if (samples.len() as f64) < min_samples {
                continue;
            }

            let rms = statistics::rms_frames(samples, config.n_fft, config.hop_length);
            if (statistics::mean(&rms) as f32) < config.energy_threshold {
                silent += 1;
                continue;
            }

            segments.push(Segment {
                index: segments.len() + 1,
                start_time,
                end_time,
                samples: samples.to_vec(),
                pitch: self.estimate_pitch(samples),
            });
        }

        debug!(
            retained = segments.len(),
            silent,
            duration_secs = duration,
            "segmentation finished"
        );
        segments
    }

    /// Mean dominant frequency inside the configured pitch range.
    pub fn estimate_pitch(&self, samples: &[f32]) -> Option<f64> {
        let spectrogram = spectrum::magnitude_spectrogram(samples, &self.config);
        let track = pitch::dominant_frequencies(
            &spectrogram,
            self.config.pitch_min_hz,
            self.config.pitch_max_hz,
        );
        pitch::mean_voiced(&track)
    }
}
