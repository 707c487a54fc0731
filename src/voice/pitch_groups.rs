//! Grouping of labeled segments into named pitch bands.

use crate::types::{round2_value, AttributeCode, AttributeCodes, LabeledSegment, PitchGroup};

use super::feedback::pitch_band_feedback;

/// Half-open frequency range `[min_hz, max_hz)` with a display name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchBand {
    pub name: &'static str,
    pub min_hz: f64,
    pub max_hz: f64,
}

impl PitchBand {
    const fn new(name: &'static str, min_hz: f64, max_hz: f64) -> Self {
        Self {
            name,
            min_hz,
            max_hz,
        }
    }

    fn contains(&self, pitch: f64) -> bool {
        pitch >= self.min_hz && pitch < self.max_hz
    }
}

pub const PITCH_BANDS: [PitchBand; 7] = [
    PitchBand::new("매우 낮은 음역", 80.0, 130.0),
    PitchBand::new("낮은 음역", 130.0, 180.0),
    PitchBand::new("중하 음역", 180.0, 240.0),
    PitchBand::new("중간 음역", 240.0, 300.0),
    PitchBand::new("중상 음역", 300.0, 400.0),
    PitchBand::new("높은 음역", 400.0, 600.0),
    PitchBand::new("매우 높은 음역", 600.0, 1200.0),
];

/// Band position for `pitch`; out-of-range values clamp to the outer bands.
pub fn band_index(pitch: f64) -> usize {
    let last = PITCH_BANDS.len() - 1;
    if pitch < PITCH_BANDS[0].min_hz {
        return 0;
    }
    PITCH_BANDS
        .iter()
        .position(|band| band.contains(pitch))
        .unwrap_or(last)
}

/// One group per non-empty band, sorted ascending by average pitch.
///
/// Segments without a pitch are left out.
pub fn group_by_pitch(segments: &[LabeledSegment]) -> Vec<PitchGroup> {
    let mut members: [Vec<&LabeledSegment>; PITCH_BANDS.len()] = Default::default();
    for segment in segments {
        if let Some(pitch) = segment.pitch.filter(|p| !p.is_nan()) {
            members[band_index(pitch)].push(segment);
        }
    }

    let mut groups: Vec<PitchGroup> = PITCH_BANDS
        .iter()
        .zip(members.iter())
        .filter(|(_, members)| !members.is_empty())
        .map(|(band, members)| build_group(band, members))
        .collect();
    groups.sort_by(|a, b| a.avg_pitch.total_cmp(&b.avg_pitch));
    groups
}

fn build_group(band: &PitchBand, members: &[&LabeledSegment]) -> PitchGroup {
    let pitches: Vec<f64> = members.iter().filter_map(|s| s.pitch).collect();
    let avg_pitch = round2_value(pitches.iter().sum::<f64>() / pitches.len() as f64);
    let start_time_sec = members
        .iter()
        .map(|s| s.start_time_sec)
        .fold(f64::INFINITY, f64::min);
    let end_time_sec = members
        .iter()
        .map(|s| s.end_time_sec)
        .fold(f64::NEG_INFINITY, f64::max);

    let codes = AttributeCodes::new(
        average_code(members.iter().map(|s| s.codes.vocal_cord)),
        average_code(members.iter().map(|s| s.codes.contact)),
        average_code(members.iter().map(|s| s.codes.larynx)),
        average_code(members.iter().map(|s| s.codes.strength)),
    );

    PitchGroup {
        pitch_group: band.name.to_string(),
        avg_pitch,
        start_time_sec,
        end_time_sec,
        segment_count: members.len(),
        codes,
        feedback: pitch_band_feedback(band.name, &codes),
        segment_indices: members.iter().map(|s| s.segment_index).collect(),
    }
}

/// Mean severity rounded half-to-even, mapped back onto the grid.
pub fn average_code<I>(codes: I) -> AttributeCode
where
    I: IntoIterator<Item = AttributeCode>,
{
    let (sum, count) = codes
        .into_iter()
        .fold((0u32, 0u32), |(sum, count), code| {
            (sum + u32::from(code.severity()), count + 1)
        });
    if count == 0 {
        return AttributeCode::default();
    }
    let mean = f64::from(sum) / f64::from(count);
    AttributeCode::from_severity(mean.round_ties_even() as u8).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> AttributeCode {
        raw.parse().unwrap()
    }

    #[test]
    fn bands_cover_boundaries() {
        assert_eq!(band_index(79.9), 0);
        assert_eq!(band_index(80.0), 0);
        assert_eq!(band_index(130.0), 1);
        assert_eq!(band_index(239.99), 2);
        assert_eq!(band_index(599.9), 5);
        assert_eq!(band_index(1199.0), 6);
        assert_eq!(band_index(1200.0), 6);
        assert_eq!(band_index(5000.0), 6);
    }

    #[test]
    fn average_of_identical_codes_is_that_code() {
        let averaged = average_code([code("H_L"), code("H_L"), code("H_L")]);
        assert_eq!(averaged, code("H_L"));
    }

    #[test]
    fn average_rounds_to_nearest_severity() {
        // (1 + 9 + 9) / 3 = 6.33 -> 6
        assert_eq!(average_code([code("L_L"), code("H_H"), code("H_H")]), code("M_H"));
    }

    #[test]
    fn half_way_average_rounds_to_even() {
        // M_L = 4, M_M = 5; 4.5 -> 4
        assert_eq!(average_code([code("M_L"), code("M_M")]), code("M_L"));
        // M_M = 5, M_H = 6; 5.5 -> 6
        assert_eq!(average_code([code("M_M"), code("M_H")]), code("M_H"));
    }

    #[test]
    fn empty_average_defaults_to_mid() {
        assert_eq!(average_code(std::iter::empty()), code("M_M"));
    }
}
