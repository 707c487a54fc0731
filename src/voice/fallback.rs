//! Canned result substituted when a genuine analysis cannot be produced.

use std::fmt;

use crate::types::{AnalysisResult, AttributeCodes, ConsolidatedGroup, LabeledSegment, PitchGroup};

/// Why the pipeline returned the canned record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    WaveformUnreadable,
    InputSizeUnresolved,
    ModelUnavailable,
    NoSegments,
    NoClassifiedSegments,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FallbackReason::WaveformUnreadable => "waveform could not be loaded",
            FallbackReason::InputSizeUnresolved => "classifier input size could not be resolved",
            FallbackReason::ModelUnavailable => "classifier weights are missing or invalid",
            FallbackReason::NoSegments => "no voiced segments after silence rejection",
            FallbackReason::NoClassifiedSegments => "every segment failed classification",
        };
        f.write_str(text)
    }
}

const SCALE_TYPE: &str = "낮은 음에서 성대를 필요 보다 조금 더 두껍게 진동 시킵니다. 좀 더 가볍게 발성할 필요가 있습니다. 높은 음에서 성대가 가볍게 진동하는 느낌은 좋으나, 후두의 상승으로 톤의 변화가 급격하게 발생하기도 합니다. 또한 부분적으로 필요 보다 좀 더 가볍게 진동하는 경향도 보입니다.";

const STEADY: [&str; 4] = ["M_L", "H_L", "M_M", "M_H"];
const LIFTED: [&str; 4] = ["M_H", "M_L", "M_H", "M_L"];
const RISING_LARYNX: [&str; 4] = ["M_H", "M_L", "H_L", "M_L"];

/// (start, end, codes, pitch) for segments 1..=6.
const SEGMENTS: [(f64, f64, [&str; 4], f64); 6] = [
    (1.0, 1.2, STEADY, 130.5),
    (1.2, 1.4, STEADY, 135.8),
    (1.4, 1.6, LIFTED, 220.3),
    (1.6, 1.8, LIFTED, 245.2),
    (1.8, 2.0, RISING_LARYNX, 360.7),
    (2.0, 2.2, STEADY, 450.1),
];

const STEADY_GROUP_FEEDBACK: &str =
    "성대가 중간 정도 두께로 진동하며, 접촉률이 높고, 후두 위치는 중간, 발성 강도는 중간 수준입니다.";

/// (start, end, member indices, codes, feedback).
const GROUPS: [(f64, f64, &[usize], [&str; 4], &str); 4] = [
    (1.0, 1.4, &[1, 2], STEADY, STEADY_GROUP_FEEDBACK),
    (
        1.4,
        1.8,
        &[3, 4],
        LIFTED,
        "고음에서 성대 진동이 좋으나, 성대 접촉이 약하고 후두 위치가 높습니다.",
    ),
    (
        1.8,
        2.0,
        &[5],
        RISING_LARYNX,
        "후두의 급격한 변화가 관찰됩니다. 더 안정적인 발성이 필요합니다.",
    ),
    (2.0, 2.2, &[6], STEADY, STEADY_GROUP_FEEDBACK),
];

/// (band, average pitch, start, end, member indices, codes, feedback).
const PITCH_GROUPS: [(&str, f64, f64, f64, &[usize], [&str; 4], &str); 4] = [
    (
        "낮은 음역",
        133.2,
        1.0,
        1.4,
        &[1, 2],
        STEADY,
        "낮은 음역에서는 성대가 중간 정도 두께로 진동하며, 성대 접촉이 강하나 약간 느슨합니다. 후두 위치가 적절합니다. 발성 강도가 적절하나 약간 강합니다. 이 낮은 음역대에서는 성대 접촉을 적절히 유지하면서 후두를 이완시키는 것이 도움이 됩니다.",
    ),
    (
        "중간 음역",
        232.8,
        1.4,
        1.8,
        &[3, 4],
        LIFTED,
        "중간 음역에서는 성대가 적절한 두께로 강하게 진동합니다. 성대 접촉이 적절하나 약간 부족합니다. 후두 위치가 적절하나 약간 높습니다. 발성 강도가 적절하나 약간 부족합니다. 이 중간 음역대에서는 균형 잡힌 발성이 중요하며, 과도한 힘을 빼고 자연스럽게 발성하세요.",
    ),
    (
        "중상 음역",
        360.7,
        1.8,
        2.0,
        &[5],
        RISING_LARYNX,
        "중상 음역에서는 성대가 적절한 두께로 강하게 진동합니다. 성대 접촉이 적절하나 약간 부족합니다. 후두 위치가 높으나 약간 이완되어 있습니다. 발성 강도가 적절하나 약간 부족합니다. 이 중상 음역대에서는 성대가 너무 얇아지지 않도록 하면서 후두 긴장을 조절하세요.",
    ),
    (
        "높은 음역",
        450.1,
        2.0,
        2.2,
        &[6],
        STEADY,
        "높은 음역에서는 성대가 적절한 두께로 진동하나 약간 부족합니다. 성대 접촉이 강하나 약간 느슨합니다. 후두 위치가 적절합니다. 발성 강도가 적절하나 약간 강합니다. 이 높은 음역대에서는 후두가 과도하게 상승하지 않도록 주의하면서 성대 접촉을 유지하세요.",
    ),
];

/// The fixed degraded-mode record, identical for every call except `wav_key`.
pub fn fallback_result(wav_key: &str, reason: FallbackReason) -> AnalysisResult {
    let segments = SEGMENTS
        .iter()
        .enumerate()
        .map(|(position, &(start, end, codes, pitch))| LabeledSegment {
            segment_index: position + 1,
            start_time_sec: start,
            end_time_sec: end,
            codes: fixture_codes(codes),
            pitch: Some(pitch),
        })
        .collect();

    let consolidated_segments = GROUPS
        .iter()
        .enumerate()
        .map(
            |(position, &(start, end, indices, codes, feedback))| ConsolidatedGroup {
                group_index: position + 1,
                start_time_sec: start,
                end_time_sec: end,
                segment_indices: indices.to_vec(),
                codes: fixture_codes(codes),
                feedback: feedback.to_string(),
            },
        )
        .collect();

    let pitch_groups = PITCH_GROUPS
        .iter()
        .map(
            |&(band, avg_pitch, start, end, indices, codes, feedback)| PitchGroup {
                pitch_group: band.to_string(),
                avg_pitch,
                start_time_sec: start,
                end_time_sec: end,
                segment_count: indices.len(),
                codes: fixture_codes(codes),
                feedback: feedback.to_string(),
                segment_indices: indices.to_vec(),
            },
        )
        .collect();

    AnalysisResult {
        wav_key: wav_key.to_string(),
        scale_type: SCALE_TYPE.to_string(),
        segments,
        consolidated_segments,
        pitch_groups,
        fallback: Some(reason),
    }
}

fn fixture_codes(raw: [&str; 4]) -> AttributeCodes {
    // fixture literals are all well-formed
    AttributeCodes::parse(raw).unwrap_or_default()
}
