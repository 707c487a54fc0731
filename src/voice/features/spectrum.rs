use aus::analysis;
use aus::analysis::mel::MelFilterbank;
use aus::spectrum;
use aus::WindowType;

use crate::config::AnalysisConfig;

const MIN_MEL_FREQ: f64 = 0.0;

/// Frame-major magnitude spectrogram plus the frequency of each bin.
pub(crate) struct MagnitudeSpectrogram {
    pub frames: Vec<Vec<f64>>,
    pub freqs: Vec<f64>,
}

pub(crate) struct SpectrogramBundle {
    pub magnitude: MagnitudeSpectrogram,
    pub mel: Vec<Vec<f64>>,
}

/// Hann-windowed STFT magnitudes at the configured FFT size and hop.
pub(crate) fn magnitude_spectrogram(samples: &[f32], config: &AnalysisConfig) -> MagnitudeSpectrogram {
    let mut audio: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    if audio.len() < config.n_fft {
        audio.resize(config.n_fft, 0.0);
    }
    let stft = spectrum::rstft(&audio, config.n_fft, config.hop_length, WindowType::Hanning);
    let (frames, _) = spectrum::complex_to_polar_rstft(&stft);
    let freqs = spectrum::rfftfreq(config.n_fft, config.sample_rate);
    MagnitudeSpectrogram { frames, freqs }
}

pub(crate) fn compute_spectrograms(samples: &[f32], config: &AnalysisConfig) -> SpectrogramBundle {
    let magnitude = magnitude_spectrogram(samples, config);
    let power = analysis::make_power_spectrogram(&magnitude.frames);
    let filterbank = MelFilterbank::new(
        MIN_MEL_FREQ,
        (config.sample_rate as f64) / 2.0,
        config.n_mels,
        &magnitude.freqs,
        true,
    );
    let mel = analysis::mel::make_mel_spectrogram(&power, &filterbank);
    SpectrogramBundle { magnitude, mel }
}

/// Convert a power spectrogram to decibels relative to 1.0, clipped to
/// `top_db` below the loudest cell.
pub(crate) fn power_to_db(power: &[Vec<f64>], top_db: f64) -> Vec<Vec<f64>> {
    const AMIN: f64 = 1e-10;
    let mut db: Vec<Vec<f64>> = power
        .iter()
        .map(|frame| frame.iter().map(|&p| 10.0 * p.max(AMIN).log10()).collect())
        .collect();
    let peak = db
        .iter()
        .flat_map(|frame| frame.iter().copied())
        .fold(f64::NEG_INFINITY, f64::max);
    if peak.is_finite() {
        let floor = peak - top_db;
        db.iter_mut()
            .flat_map(|frame| frame.iter_mut())
            .for_each(|v| *v = v.max(floor));
    }
    db
}
