mod mlp;

pub use mlp::{DenseLayer, HeadWeights, MlpClassifier, MlpWeights};

use crate::voice::features::FeatureVector;
use crate::voice::Result;

/// Width of each per-attribute score vector: three onset plus three sustain scores.
pub const SCORE_WIDTH: usize = 6;

/// Raw classifier output for one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeScores {
    pub vocal_cord: [f32; SCORE_WIDTH],
    pub contact: [f32; SCORE_WIDTH],
    pub larynx: [f32; SCORE_WIDTH],
    pub strength: [f32; SCORE_WIDTH],
}

/// Anything that maps a feature vector to four attribute score vectors.
///
/// Implementations must be side-effect free; one instance is shared across
/// segments classified in parallel.
pub trait VoiceClassifier: Send + Sync {
    /// Feature dimensionality the model was built for.
    fn input_size(&self) -> usize;

    fn predict(&self, features: &FeatureVector) -> Result<AttributeScores>;
}
