//! Merging of time-adjacent segments that share identical codes.

use crate::types::{ConsolidatedGroup, LabeledSegment};

use super::feedback::segment_feedback;

/// Gap tolerance used by [`consolidate`].
pub const DEFAULT_ADJACENCY_TOLERANCE: f64 = 0.05;

pub fn consolidate(segments: &[LabeledSegment]) -> Vec<ConsolidatedGroup> {
    consolidate_with_tolerance(segments, DEFAULT_ADJACENCY_TOLERANCE)
}

/// Single pass over segments ordered by start time.
///
/// A segment joins the open group when its codes match exactly and it starts
/// less than `tolerance` seconds after the group ends. Overlapping segments
/// have a negative gap and always qualify.
pub fn consolidate_with_tolerance(
    segments: &[LabeledSegment],
    tolerance: f64,
) -> Vec<ConsolidatedGroup> {
    let mut ordered: Vec<&LabeledSegment> = segments.iter().collect();
    ordered.sort_by(|a, b| a.start_time_sec.total_cmp(&b.start_time_sec));

    let mut groups: Vec<ConsolidatedGroup> = Vec::new();
    for segment in ordered {
        if let Some(open) = groups.last_mut() {
            if open.codes == segment.codes && segment.start_time_sec - open.end_time_sec < tolerance
            {
                open.end_time_sec = segment.end_time_sec;
                open.segment_indices.push(segment.segment_index);
                continue;
            }
        }
        groups.push(ConsolidatedGroup {
            group_index: groups.len() + 1,
            start_time_sec: segment.start_time_sec,
            end_time_sec: segment.end_time_sec,
            segment_indices: vec![segment.segment_index],
            codes: segment.codes,
            feedback: String::new(),
        });
    }

    for group in &mut groups {
        group.feedback = segment_feedback(&group.codes);
    }
    groups
}
