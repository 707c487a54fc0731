//! Core types for the vocalyzer analysis pipeline

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::voice::fallback::FallbackReason;

/// Raw audio data representation (mono, f32 samples)
#[derive(Debug, Clone)]
pub struct Waveform {
    /// Audio samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz (22050 for the analysis pipeline)
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// A retained micro-segment of the waveform
#[derive(Debug, Clone)]
pub struct Segment {
    /// 1-based position among retained segments
    pub index: usize,
    pub start_time: f64, // seconds
    pub end_time: f64,   // seconds
    pub samples: Vec<f32>,
    /// Dominant pitch in Hz, `None` when no frame produced an estimate
    pub pitch: Option<f64>,
}

impl Segment {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Onset/sustain severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Low,
    Mid,
    High,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Low, Level::Mid, Level::High];

    /// Category position used by the classifier output layout.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            Level::Low => 0,
            Level::Mid => 1,
            Level::High => 2,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Level::Low => 'L',
            Level::Mid => 'M',
            Level::High => 'H',
        }
    }

    fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "L" => Some(Level::Low),
            "M" => Some(Level::Mid),
            "H" => Some(Level::High),
            _ => None,
        }
    }
}

/// Two-token attribute code such as `M_H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct AttributeCode {
    pub first: Level,
    pub second: Level,
}

impl AttributeCode {
    pub const fn new(first: Level, second: Level) -> Self {
        Self { first, second }
    }

    /// Row-major severity on the 3×3 grid: `L_L` = 1 … `H_H` = 9.
    pub fn severity(self) -> u8 {
        (self.first.index() * 3 + self.second.index() + 1) as u8
    }

    pub fn from_severity(score: u8) -> Option<Self> {
        if !(1..=9).contains(&score) {
            return None;
        }
        let zero_based = (score - 1) as usize;
        Some(Self::new(
            Level::from_index(zero_based / 3)?,
            Level::from_index(zero_based % 3)?,
        ))
    }

    /// True when either token is `level`.
    pub fn contains(self, level: Level) -> bool {
        self.first == level || self.second == level
    }
}

impl Default for AttributeCode {
    fn default() -> Self {
        Self::new(Level::Mid, Level::Mid)
    }
}

impl fmt::Display for AttributeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.first.letter(), self.second.letter())
    }
}

impl FromStr for AttributeCode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (first, second) = raw
            .split_once('_')
            .ok_or_else(|| format!("attribute code '{raw}' must look like X_Y"))?;
        match (Level::from_letter(first), Level::from_letter(second)) {
            (Some(first), Some(second)) => Ok(Self::new(first, second)),
            _ => Err(format!("attribute code '{raw}' uses tokens outside L/M/H")),
        }
    }
}

impl From<AttributeCode> for String {
    fn from(code: AttributeCode) -> Self {
        code.to_string()
    }
}

impl TryFrom<String> for AttributeCode {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// The four voice-quality attributes predicted per segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeCodes {
    pub vocal_cord: AttributeCode,
    pub contact: AttributeCode,
    pub larynx: AttributeCode,
    pub strength: AttributeCode,
}

impl AttributeCodes {
    pub fn new(
        vocal_cord: AttributeCode,
        contact: AttributeCode,
        larynx: AttributeCode,
        strength: AttributeCode,
    ) -> Self {
        Self {
            vocal_cord,
            contact,
            larynx,
            strength,
        }
    }

    /// Parse four codes in `vocalCord, contact, larynx, strength` order.
    pub fn parse(codes: [&str; 4]) -> Result<Self, String> {
        Ok(Self::new(
            codes[0].parse()?,
            codes[1].parse()?,
            codes[2].parse()?,
            codes[3].parse()?,
        ))
    }

    pub fn as_array(&self) -> [AttributeCode; 4] {
        [self.vocal_cord, self.contact, self.larynx, self.strength]
    }
}

/// A classified segment as reported in the analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledSegment {
    pub segment_index: usize,
    #[serde(serialize_with = "round2")]
    pub start_time_sec: f64,
    #[serde(serialize_with = "round2")]
    pub end_time_sec: f64,
    #[serde(flatten)]
    pub codes: AttributeCodes,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "round2_opt"
    )]
    pub pitch: Option<f64>,
}

/// Run of adjacent, identically labeled segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedGroup {
    pub group_index: usize,
    #[serde(serialize_with = "round2")]
    pub start_time_sec: f64,
    #[serde(serialize_with = "round2")]
    pub end_time_sec: f64,
    pub segment_indices: Vec<usize>,
    #[serde(flatten)]
    pub codes: AttributeCodes,
    pub feedback: String,
}

/// Segments bucketed into one named pitch band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchGroup {
    pub pitch_group: String,
    #[serde(serialize_with = "round2")]
    pub avg_pitch: f64,
    #[serde(serialize_with = "round2")]
    pub start_time_sec: f64,
    #[serde(serialize_with = "round2")]
    pub end_time_sec: f64,
    pub segment_count: usize,
    #[serde(flatten)]
    pub codes: AttributeCodes,
    pub feedback: String,
    pub segment_indices: Vec<usize>,
}

/// Terminal output of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub wav_key: String,
    pub scale_type: String,
    pub segments: Vec<LabeledSegment>,
    pub consolidated_segments: Vec<ConsolidatedGroup>,
    pub pitch_groups: Vec<PitchGroup>,
    /// Set when the record is the canned fallback rather than a real analysis
    #[serde(skip)]
    pub fallback: Option<FallbackReason>,
}

impl AnalysisResult {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Round to two decimal places.
pub fn round2_value(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round2_value(*value))
}

fn round2_opt<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_some(&round2_value(*v)),
        None => serializer.serialize_none(),
    }
}
