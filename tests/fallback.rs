use serde_json::{json, Value};
use vocalyzer::voice::fallback::{fallback_result, FallbackReason};

fn canned_record(wav_key: &str) -> Value {
    json!({
        "wavKey": wav_key,
        "scaleType": "낮은 음에서 성대를 필요 보다 조금 더 두껍게 진동 시킵니다. 좀 더 가볍게 발성할 필요가 있습니다. 높은 음에서 성대가 가볍게 진동하는 느낌은 좋으나, 후두의 상승으로 톤의 변화가 급격하게 발생하기도 합니다. 또한 부분적으로 필요 보다 좀 더 가볍게 진동하는 경향도 보입니다.",
        "segments": [
            {"segmentIndex": 1, "startTimeSec": 1.0, "endTimeSec": 1.2, "vocalCord": "M_L", "contact": "H_L", "larynx": "M_M", "strength": "M_H", "pitch": 130.5},
            {"segmentIndex": 2, "startTimeSec": 1.2, "endTimeSec": 1.4, "vocalCord": "M_L", "contact": "H_L", "larynx": "M_M", "strength": "M_H", "pitch": 135.8},
            {"segmentIndex": 3, "startTimeSec": 1.4, "endTimeSec": 1.6, "vocalCord": "M_H", "contact": "M_L", "larynx": "M_H", "strength": "M_L", "pitch": 220.3},
            {"segmentIndex": 4, "startTimeSec": 1.6, "endTimeSec": 1.8, "vocalCord": "M_H", "contact": "M_L", "larynx": "M_H", "strength": "M_L", "pitch": 245.2},
            {"segmentIndex": 5, "startTimeSec": 1.8, "endTimeSec": 2.0, "vocalCord": "M_H", "contact": "M_L", "larynx": "H_L", "strength": "M_L", "pitch": 360.7},
            {"segmentIndex": 6, "startTimeSec": 2.0, "endTimeSec": 2.2, "vocalCord": "M_L", "contact": "H_L", "larynx": "M_M", "strength": "M_H", "pitch": 450.1}
        ],
        "consolidatedSegments": [
            {
                "groupIndex": 1, "startTimeSec": 1.0, "endTimeSec": 1.4, "segmentIndices": [1, 2],
                "vocalCord": "M_L", "contact": "H_L", "larynx": "M_M", "strength": "M_H",
                "feedback": "성대가 중간 정도 두께로 진동하며, 접촉률이 높고, 후두 위치는 중간, 발성 강도는 중간 수준입니다."
            },
            {
                "groupIndex": 2, "startTimeSec": 1.4, "endTimeSec": 1.8, "segmentIndices": [3, 4],
                "vocalCord": "M_H", "contact": "M_L", "larynx": "M_H", "strength": "M_L",
                "feedback": "고음에서 성대 진동이 좋으나, 성대 접촉이 약하고 후두 위치가 높습니다."
            },
            {
                "groupIndex": 3, "startTimeSec": 1.8, "endTimeSec": 2.0, "segmentIndices": [5],
                "vocalCord": "M_H", "contact": "M_L", "larynx": "H_L", "strength": "M_L",
                "feedback": "후두의 급격한 변화가 관찰됩니다. 더 안정적인 발성이 필요합니다."
            },
            {
                "groupIndex": 4, "startTimeSec": 2.0, "endTimeSec": 2.2, "segmentIndices": [6],
                "vocalCord": "M_L", "contact": "H_L", "larynx": "M_M", "strength": "M_H",
                "feedback": "성대가 중간 정도 두께로 진동하며, 접촉률이 높고, 후두 위치는 중간, 발성 강도는 중간 수준입니다."
            }
        ],
        "pitchGroups": [
            {
                "pitchGroup": "낮은 음역", "avgPitch": 133.2, "startTimeSec": 1.0, "endTimeSec": 1.4, "segmentCount": 2,
                "vocalCord": "M_L", "contact": "H_L", "larynx": "M_M", "strength": "M_H",
                "feedback": "낮은 음역에서는 성대가 중간 정도 두께로 진동하며, 성대 접촉이 강하나 약간 느슨합니다. 후두 위치가 적절합니다. 발성 강도가 적절하나 약간 강합니다. 이 낮은 음역대에서는 성대 접촉을 적절히 유지하면서 후두를 이완시키는 것이 도움이 됩니다.",
                "segmentIndices": [1, 2]
            },
            {
                "pitchGroup": "중간 음역", "avgPitch": 232.8, "startTimeSec": 1.4, "endTimeSec": 1.8, "segmentCount": 2,
                "vocalCord": "M_H", "contact": "M_L", "larynx": "M_H", "strength": "M_L",
                "feedback": "중간 음역에서는 성대가 적절한 두께로 강하게 진동합니다. 성대 접촉이 적절하나 약간 부족합니다. 후두 위치가 적절하나 약간 높습니다. 발성 강도가 적절하나 약간 부족합니다. 이 중간 음역대에서는 균형 잡힌 발성이 중요하며, 과도한 힘을 빼고 자연스럽게 발성하세요.",
                "segmentIndices": [3, 4]
            },
            {
                "pitchGroup": "중상 음역", "avgPitch": 360.7, "startTimeSec": 1.8, "endTimeSec": 2.0, "segmentCount": 1,
                "vocalCord": "M_H", "contact": "M_L", "larynx": "H_L", "strength": "M_L",
                "feedback": "중상 음역에서는 성대가 적절한 두께로 강하게 진동합니다. 성대 접촉이 적절하나 약간 부족합니다. 후두 위치가 높으나 약간 이완되어 있습니다. 발성 강도가 적절하나 약간 부족합니다. 이 중상 음역대에서는 성대가 너무 얇아지지 않도록 하면서 후두 긴장을 조절하세요.",
                "segmentIndices": [5]
            },
            {
                "pitchGroup": "높은 음역", "avgPitch": 450.1, "startTimeSec": 2.0, "endTimeSec": 2.2, "segmentCount": 1,
                "vocalCord": "M_L", "contact": "H_L", "larynx": "M_M", "strength": "M_H",
                "feedback": "높은 음역에서는 성대가 적절한 두께로 진동하나 약간 부족합니다. 성대 접촉이 강하나 약간 느슨합니다. 후두 위치가 적절합니다. 발성 강도가 적절하나 약간 강합니다. 이 높은 음역대에서는 후두가 과도하게 상승하지 않도록 주의하면서 성대 접촉을 유지하세요.",
                "segmentIndices": [6]
            }
        ]
    })
}

#[test]
fn fallback_matches_canned_record_field_by_field() {
    let actual = serde_json::to_value(fallback_result(
        "take.wav",
        FallbackReason::WaveformUnreadable,
    ))
    .unwrap();
    let expected = canned_record("take.wav");

    for key in ["wavKey", "scaleType"] {
        assert_eq!(actual[key], expected[key], "{key}");
    }
    for list in ["segments", "consolidatedSegments", "pitchGroups"] {
        let actual_items = actual[list].as_array().unwrap();
        let expected_items = expected[list].as_array().unwrap();
        assert_eq!(actual_items.len(), expected_items.len(), "{list} length");
        for (position, (got, want)) in actual_items.iter().zip(expected_items).enumerate() {
            for (field, value) in want.as_object().unwrap() {
                assert_eq!(&got[field], value, "{list}[{position}].{field}");
            }
        }
    }
    assert_eq!(actual, expected);
}

#[test]
fn pitch_group_feedback_is_the_canned_text() {
    let result = fallback_result("x.wav", FallbackReason::ModelUnavailable);
    assert!(result.pitch_groups[0]
        .feedback
        .starts_with("낮은 음역에서는 성대가 중간 정도 두께로 진동하며, 성대 접촉이 강하나"));
}
