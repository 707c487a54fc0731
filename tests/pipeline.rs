use std::f32::consts::PI;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use vocalyzer::types::{AttributeCodes, Waveform};
use vocalyzer::voice::classifier::{
    AttributeScores, DenseLayer, HeadWeights, MlpWeights, VoiceClassifier,
};
use vocalyzer::voice::fallback::{fallback_result, FallbackReason};
use vocalyzer::voice::features::FeatureVector;
use vocalyzer::{VoiceAnalyzer, VoiceError};

const SAMPLE_RATE: u32 = 22_050;
const FEATURES: usize = 152;

/// Always predicts M_L / H_L / M_M / M_H; optionally fails the first N calls.
struct FixedClassifier {
    input_size: usize,
    failures: usize,
    calls: AtomicUsize,
}

impl FixedClassifier {
    fn new(input_size: usize, failures: usize) -> Self {
        Self {
            input_size,
            failures,
            calls: AtomicUsize::new(0),
        }
    }
}

impl VoiceClassifier for FixedClassifier {
    fn input_size(&self) -> usize {
        self.input_size
    }

    fn predict(&self, _features: &FeatureVector) -> vocalyzer::voice::Result<AttributeScores> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(VoiceError::Classification("injected failure".into()));
        }
        Ok(AttributeScores {
            vocal_cord: [0.0, 1.0, 0.0, 1.0, 0.0, 0.0],
            contact: [0.0, 0.0, 1.0, 1.0, 0.0, 0.0],
            larynx: [0.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            strength: [0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        })
    }
}

fn sine_wave(freq: f32, seconds: f32) -> Vec<f32> {
    let count = (SAMPLE_RATE as f32 * seconds) as usize;
    (0..count)
        .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / SAMPLE_RATE as f32).sin())
        .collect()
}

fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for sample in samples {
        writer.write_sample((sample * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

fn bias_head(first: usize, second: usize) -> DenseLayer {
    let mut bias = vec![0.0; 6];
    bias[first] = 1.0;
    bias[3 + second] = 1.0;
    DenseLayer {
        weights: vec![vec![0.0; FEATURES]; 6],
        bias,
    }
}

fn write_model(path: &Path) -> Result<()> {
    let weights = MlpWeights {
        layers: Vec::new(),
        heads: HeadWeights {
            vocal_cord: bias_head(1, 0),
            contact: bias_head(2, 0),
            larynx: bias_head(1, 1),
            strength: bias_head(1, 2),
        },
    };
    std::fs::write(path, serde_json::to_string(&weights)?)?;
    Ok(())
}

fn expected_codes() -> AttributeCodes {
    AttributeCodes::parse(["M_L", "H_L", "M_M", "M_H"]).unwrap()
}

#[test]
fn steady_tone_is_one_group_in_one_band() -> Result<()> {
    let analyzer = VoiceAnalyzer::default();
    let waveform = Waveform::new(sine_wave(220.0, 1.0), SAMPLE_RATE);
    let classifier = FixedClassifier::new(FEATURES, 0);

    let result = analyzer.analyze_waveform("tone.wav", &waveform, Some(&classifier))?;

    assert!(!result.is_fallback());
    assert_eq!(result.wav_key, "tone.wav");
    assert_eq!(result.segments.len(), 9);
    assert!(result.segments.iter().all(|s| s.codes == expected_codes()));
    assert_eq!(result.consolidated_segments.len(), 1);
    assert_eq!(
        result.consolidated_segments[0].segment_indices,
        (1..=9).collect::<Vec<_>>()
    );
    assert_eq!(result.pitch_groups.len(), 1);
    assert_eq!(result.pitch_groups[0].pitch_group, "중하 음역");
    assert_eq!(
        result.scale_type,
        "높은 음에서 성대가 무겁게 진동하는 경향이 있습니다. 성대 접촉률이 높아 소리가 긴장될 수 있습니다."
    );
    Ok(())
}

#[test]
fn failed_segments_are_skipped_and_survivors_renumbered() -> Result<()> {
    let analyzer = VoiceAnalyzer::default();
    let waveform = Waveform::new(sine_wave(220.0, 1.0), SAMPLE_RATE);
    let classifier = FixedClassifier::new(FEATURES, 2);

    let result = analyzer.analyze_waveform("tone.wav", &waveform, Some(&classifier))?;

    assert!(!result.is_fallback());
    let indices: Vec<usize> = result.segments.iter().map(|s| s.segment_index).collect();
    assert_eq!(indices, (1..=7).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn total_classification_failure_falls_back() -> Result<()> {
    let analyzer = VoiceAnalyzer::default();
    let waveform = Waveform::new(sine_wave(220.0, 1.0), SAMPLE_RATE);
    let classifier = FixedClassifier::new(FEATURES, usize::MAX);

    let result = analyzer.analyze_waveform("tone.wav", &waveform, Some(&classifier))?;
    assert_eq!(result.fallback, Some(FallbackReason::NoClassifiedSegments));
    Ok(())
}

#[test]
fn silence_falls_back() -> Result<()> {
    let analyzer = VoiceAnalyzer::default();
    let waveform = Waveform::new(vec![0.0; SAMPLE_RATE as usize], SAMPLE_RATE);
    let classifier = FixedClassifier::new(FEATURES, 0);

    let result = analyzer.analyze_waveform("quiet.wav", &waveform, Some(&classifier))?;
    assert_eq!(result.fallback, Some(FallbackReason::NoSegments));
    assert_eq!(result.wav_key, "quiet.wav");
    Ok(())
}

#[test]
fn input_size_mismatch_is_fatal() {
    let analyzer = VoiceAnalyzer::default();
    let waveform = Waveform::new(sine_wave(220.0, 1.0), SAMPLE_RATE);
    let classifier = FixedClassifier::new(FEATURES + 1, 0);

    let outcome = analyzer.analyze_waveform("tone.wav", &waveform, Some(&classifier));
    assert!(matches!(outcome, Err(VoiceError::Configuration(_))));
}

#[test]
fn unreadable_file_returns_canned_result_keyed_by_base_name() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let bogus = dir.path().join("scale_take.wav");
    std::fs::write(&bogus, b"definitely not audio")?;

    let result = VoiceAnalyzer::default().analyze_path(&bogus, dir.path().join("model.json"))?;

    let canned = fallback_result("scale_take.wav", FallbackReason::WaveformUnreadable);
    assert_eq!(result, canned);
    assert_eq!(result.wav_key, "scale_take.wav");
    Ok(())
}

#[test]
fn missing_weights_fall_back() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let wav = dir.path().join("take.wav");
    write_wav(&wav, &sine_wave(220.0, 1.0), SAMPLE_RATE)?;

    let result = VoiceAnalyzer::default().analyze_path(&wav, dir.path().join("absent.json"))?;
    assert_eq!(result.fallback, Some(FallbackReason::ModelUnavailable));
    Ok(())
}

#[test]
fn wav_file_with_json_weights_runs_end_to_end() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let wav = dir.path().join("take.wav");
    let model = dir.path().join("voice_model.json");
    // recorded at 44.1 kHz; loading resamples to the pipeline rate
    write_wav(&wav, &sine_wave_at(330.0, 1.0, 44_100), 44_100)?;
    write_model(&model)?;

    let result = VoiceAnalyzer::default().analyze_path(&wav, &model)?;

    assert!(!result.is_fallback());
    assert_eq!(result.wav_key, "take.wav");
    assert!(!result.segments.is_empty());
    assert!(result.segments.iter().all(|s| s.codes == expected_codes()));
    assert_eq!(result.pitch_groups[0].pitch_group, "중상 음역");

    let json = serde_json::to_value(&result)?;
    assert_eq!(json["wavKey"], "take.wav");
    assert_eq!(json["segments"][0]["vocalCord"], "M_L");
    assert!(json["consolidatedSegments"][0]["feedback"].is_string());
    assert!(json.get("fallback").is_none());
    Ok(())
}

fn sine_wave_at(freq: f32, seconds: f32, sample_rate: u32) -> Vec<f32> {
    let count = (sample_rate as f32 * seconds) as usize;
    (0..count)
        .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}
