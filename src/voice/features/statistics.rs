use aus::analysis;

const ROLLOFF_PERCENT: f64 = 0.85;
const CONTRAST_QUANTILE: f64 = 0.02;
const CONTRAST_FMIN: f64 = 200.0;
const CONTRAST_BANDS: usize = 6;
const AMIN: f64 = 1e-10;

/// Split `samples` into centered, zero-padded frames.
pub(crate) fn frame_signal(samples: &[f32], frame_len: usize, hop: usize) -> Vec<Vec<f32>> {
    let frame_len = frame_len.max(1);
    let hop = hop.max(1);
    let pad = frame_len / 2;
    let mut padded = vec![0.0_f32; pad];
    padded.extend_from_slice(samples);
    padded.extend(std::iter::repeat(0.0).take(pad));
    if padded.len() < frame_len {
        return Vec::new();
    }
    let count = 1 + (padded.len() - frame_len) / hop;
    (0..count)
        .map(|idx| padded[idx * hop..idx * hop + frame_len].to_vec())
        .collect()
}

pub(crate) fn rms_frames(samples: &[f32], frame_len: usize, hop: usize) -> Vec<f64> {
    frame_signal(samples, frame_len, hop)
        .iter()
        .map(|frame| {
            let energy: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
            (energy / frame.len() as f64).sqrt()
        })
        .collect()
}

// Crossings per sample; aus reports crossings per second.
pub(crate) fn zero_crossing_rates(samples: &[f32], frame_len: usize, hop: usize) -> Vec<f64> {
    frame_signal(samples, frame_len, hop)
        .iter()
        .map(|frame| {
            let crossings = frame
                .windows(2)
                .filter(|pair| pair[0].is_sign_negative() != pair[1].is_sign_negative())
                .count();
            crossings as f64 / frame.len() as f64
        })
        .collect()
}

/// Magnitude-weighted centroid per frame; silent frames report 0.0.
pub(crate) fn spectral_centroids(frames: &[Vec<f64>], freqs: &[f64]) -> Vec<f64> {
    frames
        .iter()
        .map(|frame| {
            if frame.iter().sum::<f64>() <= 0.0 || frame.len() > freqs.len() {
                return 0.0;
            }
            analysis::spectral_centroid(frame, freqs)
        })
        .collect()
}

// aus computes rolloff over power; this follows the magnitude spectrum.
pub(crate) fn spectral_rolloffs(frames: &[Vec<f64>], freqs: &[f64]) -> Vec<f64> {
    frames
        .iter()
        .map(|frame| {
            let total: f64 = frame.iter().sum();
            if total <= 0.0 {
                return 0.0;
            }
            let threshold = ROLLOFF_PERCENT * total;
            let mut cumulative = 0.0;
            for (magnitude, freq) in frame.iter().zip(freqs) {
                cumulative += magnitude;
                if cumulative >= threshold {
                    return *freq;
                }
            }
            freqs.last().copied().unwrap_or(0.0)
        })
        .collect()
}

/// Peak-to-valley contrast in dB over octave sub-bands, one value per band per frame.
pub(crate) fn spectral_contrasts(frames: &[Vec<f64>], freqs: &[f64]) -> Vec<f64> {
    let nyquist = freqs.last().copied().unwrap_or(0.0);
    let mut edges = vec![0.0];
    edges.extend((0..CONTRAST_BANDS).map(|k| CONTRAST_FMIN * 2f64.powi(k as i32)));
    let top_edge = edges.last().copied().unwrap_or(0.0);
    edges.push(nyquist.max(top_edge));

    let bands: Vec<Vec<usize>> = edges
        .windows(2)
        .enumerate()
        .map(|(band, edge)| {
            let last = band == edges.len() - 2;
            freqs
                .iter()
                .enumerate()
                .filter(|&(_, &f)| f >= edge[0] && (f < edge[1] || (last && f <= edge[1])))
                .map(|(idx, _)| idx)
                .collect()
        })
        .collect();

    let mut contrasts = Vec::with_capacity(frames.len() * bands.len());
    for frame in frames {
        for bins in &bands {
            let mut values: Vec<f64> = bins
                .iter()
                .filter_map(|&idx| frame.get(idx).copied())
                .collect();
            if values.is_empty() {
                contrasts.push(0.0);
                continue;
            }
            values.sort_by(f64::total_cmp);
            let k = ((CONTRAST_QUANTILE * values.len() as f64).round() as usize).max(1);
            let valley = mean(&values[..k]);
            let peak = mean(&values[values.len() - k..]);
            contrasts.push(10.0 * peak.max(AMIN).log10() - 10.0 * valley.max(AMIN).log10());
        }
    }
    contrasts
}

/// Mean positive frame-to-frame increase across log-mel bands.
pub(crate) fn onset_strength(log_mel: &[Vec<f64>]) -> Vec<f64> {
    if log_mel.is_empty() {
        return Vec::new();
    }
    let mut envelope = Vec::with_capacity(log_mel.len());
    envelope.push(0.0);
    for pair in log_mel.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        let bands = current.len().min(previous.len()).max(1);
        let rise: f64 = current
            .iter()
            .zip(previous.iter())
            .map(|(c, p)| (c - p).max(0.0))
            .sum();
        envelope.push(rise / bands as f64);
    }
    envelope
}

/// Per-column mean across frames, always `width` long.
pub(crate) fn column_means(frames: &[Vec<f64>], width: usize) -> Vec<f64> {
    let mut sums = vec![0.0; width];
    if frames.is_empty() {
        return sums;
    }
    for frame in frames {
        for (sum, value) in sums.iter_mut().zip(frame.iter()) {
            *sum += value;
        }
    }
    sums.iter_mut().for_each(|s| *s /= frames.len() as f64);
    sums
}

/// RMS means over the first, middle and last thirds of the frames.
pub(crate) fn rms_thirds(rms: &[f64]) -> [f64; 3] {
    let n = rms.len();
    if n < 3 {
        let overall = mean(rms);
        return [overall; 3];
    }
    [
        mean(&rms[..n / 3]),
        mean(&rms[n / 3..(2 * n) / 3]),
        mean(&rms[(2 * n) / 3..]),
    ]
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population variance.
pub(crate) fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}
