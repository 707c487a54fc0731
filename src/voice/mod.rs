pub mod classifier;
pub mod consolidate;
pub mod fallback;
pub mod features;
pub mod feedback;
pub mod labels;
pub mod pitch_groups;
pub mod segmenter;

use std::path::Path;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::audio::load_waveform;
use crate::config::AnalysisConfig;
use crate::types::{round2_value, AnalysisResult, LabeledSegment, Segment, Waveform};

use classifier::{MlpClassifier, VoiceClassifier};
use consolidate::consolidate_with_tolerance;
use fallback::{fallback_result, FallbackReason};
use features::FeatureExtractor;
use feedback::overall_feedback;
use labels::decode_scores;
use pitch_groups::group_by_pitch;
use segmenter::Segmenter;

/// Convenient alias for results returned by the voice pipeline.
pub type Result<T> = std::result::Result<T, VoiceError>;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("failed to load audio: {0}")]
    Load(String),
    #[error("failed to load classifier: {0}")]
    ModelLoad(String),
    /// Feature and classifier shapes disagree; not recoverable by fallback.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("feature extraction failed: {0}")]
    Feature(String),
    #[error("classification failed: {0}")]
    Classification(String),
}

/// End-to-end analysis: segmentation, classification, grouping, feedback.
#[derive(Debug, Clone, Default)]
pub struct VoiceAnalyzer {
    config: AnalysisConfig,
    segmenter: Segmenter,
    extractor: FeatureExtractor,
}

impl VoiceAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            segmenter: Segmenter::new(config.clone()),
            extractor: FeatureExtractor::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn feature_dimension(&self) -> usize {
        self.extractor.dimension()
    }

    /// Analyze an audio file with weights read from `model_path`.
    ///
    /// Unreadable audio and unusable weights produce the fallback record keyed
    /// by the file's base name.
    pub fn analyze_path<P, M>(&self, path: P, model_path: M) -> Result<AnalysisResult>
    where
        P: AsRef<Path>,
        M: AsRef<Path>,
    {
        let path = path.as_ref();
        let wav_key = wav_key(path);

        let waveform = match self.load(path) {
            Ok(waveform) => waveform,
            Err(err) => {
                warn!(wav_key = %wav_key, error = %err, "returning fallback result");
                return Ok(fallback_result(&wav_key, FallbackReason::WaveformUnreadable));
            }
        };

        let classifier = match MlpClassifier::load(model_path.as_ref()) {
            Ok(classifier) => Some(classifier),
            Err(err) => {
                warn!(error = %err, "classifier unavailable");
                None
            }
        };

        self.analyze_waveform(
            &wav_key,
            &waveform,
            classifier.as_ref().map(|c| c as &dyn VoiceClassifier),
        )
    }

    fn load(&self, path: &Path) -> Result<Waveform> {
        load_waveform(path, self.config.sample_rate)
            .map_err(|err| VoiceError::Load(format!("{err:#}")))
    }

    /// Analyze an already-decoded waveform at the configured sample rate.
    pub fn analyze_waveform(
        &self,
        wav_key: &str,
        waveform: &Waveform,
        classifier: Option<&dyn VoiceClassifier>,
    ) -> Result<AnalysisResult> {
        if waveform.sample_rate != self.config.sample_rate {
            return Err(VoiceError::Configuration(format!(
                "waveform is {} Hz, pipeline runs at {} Hz",
                waveform.sample_rate, self.config.sample_rate
            )));
        }

        let head_len = waveform.samples.len().min(self.config.segment_samples());
        let feature_size = match self.extractor.extract(&waveform.samples[..head_len]) {
            Ok(head) => head.len(),
            Err(err) => {
                warn!(wav_key, error = %err, "could not resolve feature dimension");
                return Ok(fallback_result(wav_key, FallbackReason::InputSizeUnresolved));
            }
        };

        let Some(classifier) = classifier else {
            return Ok(fallback_result(wav_key, FallbackReason::ModelUnavailable));
        };
        if classifier.input_size() != feature_size {
            return Err(VoiceError::Configuration(format!(
                "classifier expects {} features, extractor produces {feature_size}",
                classifier.input_size()
            )));
        }

        let segments = self.segmenter.segment(waveform);
        if segments.is_empty() {
            warn!(wav_key, "no voiced segments found");
            return Ok(fallback_result(wav_key, FallbackReason::NoSegments));
        }

        let labeled = self.classify_segments(&segments, classifier);
        if labeled.is_empty() {
            warn!(wav_key, total = segments.len(), "no segment could be classified");
            return Ok(fallback_result(
                wav_key,
                FallbackReason::NoClassifiedSegments,
            ));
        }

        let consolidated_segments =
            consolidate_with_tolerance(&labeled, self.config.adjacency_tolerance);
        let pitch_groups = group_by_pitch(&labeled);
        let scale_type = overall_feedback(&labeled[0].codes);

        info!(
            wav_key,
            segments = labeled.len(),
            skipped = segments.len() - labeled.len(),
            groups = consolidated_segments.len(),
            pitch_groups = pitch_groups.len(),
            "analysis complete"
        );

        Ok(AnalysisResult {
            wav_key: wav_key.to_string(),
            scale_type,
            segments: labeled,
            consolidated_segments,
            pitch_groups,
            fallback: None,
        })
    }

    /// Classify every segment in parallel; failures are dropped and the
    /// survivors renumbered from 1.
    fn classify_segments(
        &self,
        segments: &[Segment],
        classifier: &dyn VoiceClassifier,
    ) -> Vec<LabeledSegment> {
        let outcomes: Vec<Option<LabeledSegment>> = segments
            .par_iter()
            .map(|segment| match self.classify_one(segment, classifier) {
                Ok(labeled) => Some(labeled),
                Err(err) => {
                    warn!(segment = segment.index, error = %err, "skipping segment");
                    None
                }
            })
            .collect();

        let mut labeled: Vec<LabeledSegment> = outcomes.into_iter().flatten().collect();
        for (position, segment) in labeled.iter_mut().enumerate() {
            segment.segment_index = position + 1;
        }
        debug!(classified = labeled.len(), "segments classified");
        labeled
    }

    fn classify_one(
        &self,
        segment: &Segment,
        classifier: &dyn VoiceClassifier,
    ) -> Result<LabeledSegment> {
        let features = self.extractor.extract(&segment.samples)?;
        let scores = classifier.predict(&features)?;
        Ok(LabeledSegment {
            segment_index: segment.index,
            start_time_sec: segment.start_time,
            end_time_sec: segment.end_time,
            codes: decode_scores(&scores),
            // banding and averaging see the reported 2-decimal pitch
            pitch: segment.pitch.map(round2_value),
        })
    }
}

/// Base name of `path`, used as the result key.
pub fn wav_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
