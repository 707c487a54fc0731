//! Decoding of raw classifier scores into attribute codes.

use crate::types::{AttributeCode, AttributeCodes, Level};

use super::classifier::{AttributeScores, SCORE_WIDTH};

const HALF: usize = SCORE_WIDTH / 2;

/// Decode one 6-wide score vector: onset from `0..3`, sustain from `3..6`.
pub fn decode(scores: &[f32; SCORE_WIDTH]) -> AttributeCode {
    AttributeCode::new(argmax_level(&scores[..HALF]), argmax_level(&scores[HALF..]))
}

pub fn decode_scores(scores: &AttributeScores) -> AttributeCodes {
    AttributeCodes::new(
        decode(&scores.vocal_cord),
        decode(&scores.contact),
        decode(&scores.larynx),
        decode(&scores.strength),
    )
}

/// Lowest index wins ties; NaN never wins.
fn argmax_level(scores: &[f32]) -> Level {
    let mut best = 0;
    for (idx, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] || (scores[best].is_nan() && !score.is_nan()) {
            best = idx;
        }
    }
    Level::from_index(best).unwrap_or(Level::Low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_both_halves() {
        let code = decode(&[0.1, 0.7, 0.2, 0.0, 0.1, 0.9]);
        assert_eq!(code.to_string(), "M_H");
        let code = decode(&[3.0, -1.0, 2.0, -5.0, -4.0, -6.0]);
        assert_eq!(code.to_string(), "L_M");
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        assert_eq!(decode(&[0.5, 0.5, 0.5, 0.0, 1.0, 1.0]).to_string(), "L_M");
    }

    #[test]
    fn positive_scaling_does_not_change_code() {
        let raw = [0.3, -0.2, 1.4, 0.9, 0.95, -3.0];
        let expected = decode(&raw);
        for factor in [0.001_f32, 0.5, 3.0, 1000.0] {
            let scaled = raw.map(|s| s * factor);
            assert_eq!(decode(&scaled), expected);
        }
    }

    #[test]
    fn nan_scores_never_win() {
        assert_eq!(
            decode(&[f32::NAN, 0.2, 0.1, 0.0, f32::NAN, 0.3]).to_string(),
            "M_H"
        );
    }

    #[test]
    fn decodes_every_attribute() {
        let scores = AttributeScores {
            vocal_cord: [0.0, 1.0, 0.0, 1.0, 0.0, 0.0],
            contact: [0.0, 0.0, 1.0, 1.0, 0.0, 0.0],
            larynx: [0.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            strength: [0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        };
        let codes = decode_scores(&scores);
        assert_eq!(
            codes,
            AttributeCodes::parse(["M_L", "H_L", "M_M", "M_H"]).unwrap()
        );
    }
}
