use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{AttributeScores, VoiceClassifier, SCORE_WIDTH};
use crate::voice::features::FeatureVector;
use crate::voice::{Result, VoiceError};

/// One dense layer in `[out][in]` row layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadWeights {
    pub vocal_cord: DenseLayer,
    pub contact: DenseLayer,
    pub larynx: DenseLayer,
    pub strength: DenseLayer,
}

/// Serialized weights: shared ReLU layers followed by four linear heads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpWeights {
    pub layers: Vec<DenseLayer>,
    pub heads: HeadWeights,
}

#[derive(Debug, Clone)]
struct Dense {
    weights: Array2<f32>,
    bias: Array1<f32>,
}

impl Dense {
    fn from_layer(layer: &DenseLayer, name: &str) -> Result<Self> {
        let rows = layer.weights.len();
        let cols = layer.weights.first().map(Vec::len).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(VoiceError::ModelLoad(format!("{name} has an empty weight matrix")));
        }
        if layer.weights.iter().any(|row| row.len() != cols) {
            return Err(VoiceError::ModelLoad(format!("{name} has ragged weight rows")));
        }
        if layer.bias.len() != rows {
            return Err(VoiceError::ModelLoad(format!(
                "{name} bias has {} entries for {rows} outputs",
                layer.bias.len()
            )));
        }
        let flat: Vec<f32> = layer.weights.iter().flatten().copied().collect();
        let weights = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|err| VoiceError::ModelLoad(format!("{name}: {err}")))?;
        Ok(Self {
            weights,
            bias: Array1::from(layer.bias.clone()),
        })
    }

    fn inputs(&self) -> usize {
        self.weights.ncols()
    }

    fn outputs(&self) -> usize {
        self.weights.nrows()
    }

    fn forward(&self, input: &Array1<f32>) -> Array1<f32> {
        self.weights.dot(input) + &self.bias
    }
}

/// Feed-forward classifier evaluated with `ndarray`.
#[derive(Debug, Clone)]
pub struct MlpClassifier {
    layers: Vec<Dense>,
    heads: [Dense; 4],
}

impl MlpClassifier {
    /// Read JSON weights from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            VoiceError::ModelLoad(format!("cannot open weights {}: {err}", path.display()))
        })?;
        let weights: MlpWeights = serde_json::from_reader(BufReader::new(file)).map_err(|err| {
            VoiceError::ModelLoad(format!("cannot parse weights {}: {err}", path.display()))
        })?;
        let classifier = Self::from_weights(&weights)?;
        info!(
            path = %path.display(),
            input_size = classifier.input_size(),
            hidden_layers = classifier.layers.len(),
            "classifier weights loaded"
        );
        Ok(classifier)
    }

    pub fn from_weights(weights: &MlpWeights) -> Result<Self> {
        let layers = weights
            .layers
            .iter()
            .enumerate()
            .map(|(idx, layer)| Dense::from_layer(layer, &format!("layer {idx}")))
            .collect::<Result<Vec<_>>>()?;
        for (idx, pair) in layers.windows(2).enumerate() {
            if pair[1].inputs() != pair[0].outputs() {
                return Err(VoiceError::ModelLoad(format!(
                    "layer {} expects {} inputs but layer {idx} emits {}",
                    idx + 1,
                    pair[1].inputs(),
                    pair[0].outputs()
                )));
            }
        }

        let heads = [
            Dense::from_layer(&weights.heads.vocal_cord, "vocalCord head")?,
            Dense::from_layer(&weights.heads.contact, "contact head")?,
            Dense::from_layer(&weights.heads.larynx, "larynx head")?,
            Dense::from_layer(&weights.heads.strength, "strength head")?,
        ];
        let trunk_width = layers.last().map(Dense::outputs);
        for head in &heads {
            if head.outputs() != SCORE_WIDTH {
                return Err(VoiceError::ModelLoad(format!(
                    "heads must emit {SCORE_WIDTH} scores, found {}",
                    head.outputs()
                )));
            }
            if trunk_width.is_some_and(|width| width != head.inputs()) {
                return Err(VoiceError::ModelLoad(
                    "head input width does not match the last shared layer".to_string(),
                ));
            }
        }
        if trunk_width.is_none() && heads.iter().any(|h| h.inputs() != heads[0].inputs()) {
            return Err(VoiceError::ModelLoad(
                "heads disagree on input width".to_string(),
            ));
        }

        Ok(Self { layers, heads })
    }
}

impl VoiceClassifier for MlpClassifier {
    fn input_size(&self) -> usize {
        self.layers
            .first()
            .map(Dense::inputs)
            .unwrap_or_else(|| self.heads[0].inputs())
    }

    fn predict(&self, features: &FeatureVector) -> Result<AttributeScores> {
        if features.len() != self.input_size() {
            return Err(VoiceError::Classification(format!(
                "feature vector has {} values, model expects {}",
                features.len(),
                self.input_size()
            )));
        }
        let hidden = self.layers.iter().fold(features.clone(), |x, layer| {
            layer.forward(&x).mapv(|v| v.max(0.0))
        });
        let [vocal_cord, contact, larynx, strength] = self.heads.each_ref().map(|head| {
            let mut scores = [0.0_f32; SCORE_WIDTH];
            for (slot, value) in scores.iter_mut().zip(head.forward(&hidden).iter()) {
                *slot = *value;
            }
            scores
        });
        Ok(AttributeScores {
            vocal_cord,
            contact,
            larynx,
            strength,
        })
    }
}
