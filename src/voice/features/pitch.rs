use super::spectrum::MagnitudeSpectrogram;

/// Dominant frequency per frame inside `[fmin, fmax)`, 0.0 where the band is silent.
pub(crate) fn dominant_frequencies(
    spectrogram: &MagnitudeSpectrogram,
    fmin: f64,
    fmax: f64,
) -> Vec<f64> {
    let bins: Vec<usize> = spectrogram
        .freqs
        .iter()
        .enumerate()
        .filter_map(|(idx, &freq)| (freq >= fmin && freq < fmax).then_some(idx))
        .collect();
    spectrogram
        .frames
        .iter()
        .map(|frame| frame_peak(frame, &spectrogram.freqs, &bins))
        .collect()
}

fn frame_peak(frame: &[f64], freqs: &[f64], bins: &[usize]) -> f64 {
    let peak = bins
        .iter()
        .copied()
        .filter(|&idx| idx < frame.len())
        .fold(None, |best: Option<usize>, idx| match best {
            Some(current) if frame[current] >= frame[idx] => Some(current),
            _ => Some(idx),
        });
    match peak {
        Some(idx) if frame[idx] > 0.0 && frame[idx].is_finite() => refine(frame, freqs, idx),
        _ => 0.0,
    }
}

/// Parabolic interpolation around a peak bin.
fn refine(frame: &[f64], freqs: &[f64], idx: usize) -> f64 {
    if idx == 0 || idx + 1 >= frame.len() || idx + 1 >= freqs.len() {
        return freqs[idx];
    }
    let (left, centre, right) = (frame[idx - 1], frame[idx], frame[idx + 1]);
    let denom = left - 2.0 * centre + right;
    if denom.abs() < f64::EPSILON {
        return freqs[idx];
    }
    let shift = (0.5 * (left - right) / denom).clamp(-0.5, 0.5);
    let bin_width = freqs[idx + 1] - freqs[idx];
    freqs[idx] + shift * bin_width
}

/// Mean of the non-zero estimates, `None` when every frame was unvoiced.
pub(crate) fn mean_voiced(estimates: &[f64]) -> Option<f64> {
    let voiced: Vec<f64> = estimates
        .iter()
        .copied()
        .filter(|&f| f > 0.0 && f.is_finite())
        .collect();
    if voiced.is_empty() {
        None
    } else {
        Some(voiced.iter().sum::<f64>() / voiced.len() as f64)
    }
}
