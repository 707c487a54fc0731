//! Vocal voice-quality analysis: segmentation, attribute classification,
//! grouping and rule-based feedback.

pub mod audio;
pub mod config;
pub mod types;
pub mod voice;

pub use config::{AnalysisConfig, AppConfig};
pub use types::{AnalysisResult, AttributeCode, AttributeCodes, LabeledSegment, Waveform};
pub use voice::{VoiceAnalyzer, VoiceError};
