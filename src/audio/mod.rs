pub mod decoder;
pub mod resample;

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::types::Waveform;

/// Decode `path` and bring it to `target_rate`.
pub fn load_waveform<P: AsRef<Path>>(path: P, target_rate: u32) -> Result<Waveform> {
    let decoded = decoder::decode_audio(path)?;
    if decoded.sample_rate == target_rate {
        return Ok(decoded);
    }
    debug!(
        from = decoded.sample_rate,
        to = target_rate,
        "resampling decoded audio"
    );
    let samples = resample::linear_resample(&decoded.samples, decoded.sample_rate, target_rate)?;
    Ok(Waveform::new(samples, target_rate))
}
