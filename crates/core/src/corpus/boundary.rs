//! Seam correction between adjacent utterances of one recording.
//!
//! The aligner pads both edges of every utterance with a fixed silence
//! marker of [`BOUNDARY_PAD`] ms and stores that pad as the duration of the
//! edge symbol. Where two utterances of the same recording touch, each one is
//! extended into its neighbour's pad window and the edge symbol absorbs the
//! extra time, so the duration sum keeps matching the window.

use crate::error::PrepError;
use crate::types::Utterance;

/// Duration the aligner assigns to edge padding (ms).
pub const BOUNDARY_PAD: u32 = 130;

/// Index of the trailing pad: the last duration equal to [`BOUNDARY_PAD`].
///
/// Index 0 is never considered, it holds the leading pad. A phoneme that
/// legitimately lasts exactly the pad length is indistinguishable from the
/// marker, so the last match wins.
pub fn trailing_pad_index(durations: &[u32]) -> Option<usize> {
    (1..durations.len())
        .rev()
        .find(|&i| durations[i] == BOUNDARY_PAD)
}

fn widen(
    duration: u32,
    delta: i64,
    item: &Utterance,
    position: usize,
) -> Result<u32, PrepError> {
    i64::from(duration)
        .checked_add(delta)
        .and_then(|widened| u32::try_from(widened).ok())
        .ok_or_else(|| {
            PrepError::boundary(
                &item.source_id,
                position,
                format!("widening {} by {} gives an invalid duration", duration, delta),
            )
        })
}

/// Window time arithmetic that left the `i64` range.
fn checked_time(
    value: Option<i64>,
    item: &Utterance,
    position: usize,
) -> Result<i64, PrepError> {
    value.ok_or_else(|| {
        PrepError::boundary(&item.source_id, position, "window time out of range")
    })
}

fn seam_open(earlier: &Utterance, later: &Utterance) -> bool {
    earlier.same_recording(later) && earlier.padding.trailing && later.padding.leading
}

/// Correct the utterance at `position`, reading neighbours from `utterances`.
pub(crate) fn correct_at(
    utterances: &[Utterance],
    position: usize,
) -> Result<Utterance, PrepError> {
    let item = utterances.get(position).ok_or_else(|| {
        PrepError::boundary(
            "",
            position,
            format!("position out of range ({} utterances)", utterances.len()),
        )
    })?;
    let mut corrected = item.clone();

    let prev = position
        .checked_sub(1)
        .and_then(|p| utterances.get(p))
        .filter(|prev| seam_open(prev, item));
    if let Some(prev) = prev {
        let pad = i64::from(BOUNDARY_PAD);
        let new_start = checked_time(prev.end.checked_sub(pad), item, position)?;
        let delta = checked_time(item.start.checked_sub(new_start), item, position)?;
        let first = corrected.durations.first_mut().ok_or_else(|| {
            PrepError::boundary(&item.source_id, position, "utterance has no durations")
        })?;
        *first = widen(*first, delta, item, position)?;
        corrected.start = new_start;
        corrected.padding.leading = false;
    }

    let next = utterances
        .get(position + 1)
        .filter(|next| seam_open(item, next));
    if let Some(next) = next {
        let pad = i64::from(BOUNDARY_PAD);
        let new_end = checked_time(next.start.checked_add(pad), item, position)?;
        let delta = checked_time(new_end.checked_sub(item.end), item, position)?;
        let idx = trailing_pad_index(&corrected.durations).ok_or_else(|| {
            PrepError::boundary(
                &item.source_id,
                position,
                format!("no trailing duration equal to {}", BOUNDARY_PAD),
            )
        })?;
        corrected.durations[idx] = widen(corrected.durations[idx], delta, item, position)?;
        corrected.end = new_end;
        corrected.padding.trailing = false;
    }

    if corrected.start != item.start || corrected.end != item.end {
        log::debug!(
            "{}[{}]: window {}..{} -> {}..{}",
            item.source_id,
            position,
            item.start,
            item.end,
            corrected.start,
            corrected.end
        );
    }
    Ok(corrected)
}

/// Correct every seam of an ordered utterance list.
///
/// The input must be ordered by recording and file position. Seams whose
/// pads were already absorbed are left untouched, so running this twice is
/// the same as running it once.
pub fn correct_boundaries(utterances: &[Utterance]) -> Result<Vec<Utterance>, PrepError> {
    (0..utterances.len())
        .map(|i| correct_at(utterances, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EdgePadding;

    fn utt(source: &str, start: i64, end: i64, durations: Vec<u32>) -> Utterance {
        let n = durations.len();
        Utterance {
            source_id: source.into(),
            start,
            end,
            text: "x".repeat(n),
            phonemes: vec!["X".into(); n],
            durations,
            padding: EdgePadding::default(),
        }
    }

    #[test]
    fn test_trailing_pad_index() {
        assert_eq!(trailing_pad_index(&[130, 50, 130, 20]), Some(2));
        assert_eq!(trailing_pad_index(&[130, 50, 20]), None);
        assert_eq!(trailing_pad_index(&[130]), None);
        assert_eq!(trailing_pad_index(&[]), None);
    }

    #[test]
    fn test_isolated_utterance_unchanged() {
        let list = vec![utt("A", 0, 300, vec![150, 150])];
        let out = correct_boundaries(&list).unwrap();
        assert_eq!(out, list);
    }

    #[test]
    fn test_different_recordings_unchanged() {
        let list = vec![
            utt("A", 0, 1000, vec![130, 740, 130]),
            utt("B", 1050, 2000, vec![130, 690, 130]),
        ];
        let out = correct_boundaries(&list).unwrap();
        assert_eq!(out, list);
    }

    #[test]
    fn test_adjacent_seam() {
        let list = vec![
            utt("A", 0, 1000, vec![130, 740, 130]),
            utt("A", 1050, 2000, vec![130, 690, 130]),
        ];
        let out = correct_boundaries(&list).unwrap();

        // Earlier utterance runs into the later one's leading pad
        assert_eq!(out[0].start, 0);
        assert_eq!(out[0].end, 1050 + 130);
        assert_eq!(out[0].durations, vec![130, 740, 130 + 180]);
        assert!(!out[0].padding.trailing);
        assert!(out[0].padding.leading);

        // Later utterance starts inside the earlier one's trailing pad
        assert_eq!(out[1].start, 1000 - 130);
        assert_eq!(out[1].end, 2000);
        assert_eq!(out[1].durations, vec![130 + 180, 690, 130]);
        assert!(!out[1].padding.leading);
    }

    #[test]
    fn test_seam_windows_meet_at_pad() {
        let list = vec![
            utt("A", 0, 1000, vec![130, 740, 130]),
            utt("A", 1050, 2000, vec![130, 690, 130]),
        ];
        let out = correct_boundaries(&list).unwrap();
        let pad = i64::from(BOUNDARY_PAD);
        assert_eq!(out[0].end - pad, list[1].start);
        assert_eq!(out[1].start + pad, list[0].end);
    }

    #[test]
    fn test_duration_mass_tracks_window() {
        let list = vec![
            utt("A", 0, 1000, vec![130, 740, 130]),
            utt("A", 1050, 2000, vec![130, 690, 130]),
            utt("A", 2100, 2500, vec![130, 140, 130]),
        ];
        let out = correct_boundaries(&list).unwrap();
        for (before, after) in list.iter().zip(out.iter()) {
            let widened = (after.end - after.start) - (before.end - before.start);
            let added = after.total_duration() as i64 - before.total_duration() as i64;
            assert_eq!(added, widened);
        }
    }

    #[test]
    fn test_trailing_pad_not_last_entry() {
        // Pad sits before a trailing zero-length symbol
        let list = vec![
            utt("A", 0, 1000, vec![130, 740, 130, 0]),
            utt("A", 1050, 2000, vec![130, 690, 130]),
        ];
        let out = correct_boundaries(&list).unwrap();
        assert_eq!(out[0].durations, vec![130, 740, 310, 0]);
    }

    #[test]
    fn test_missing_pad_marker_fails() {
        let list = vec![
            utt("A", 0, 1000, vec![130, 740, 129]),
            utt("A", 1050, 2000, vec![130, 690, 130]),
        ];
        let err = correct_boundaries(&list).unwrap_err();
        match err {
            PrepError::Boundary {
                source_id,
                position,
                ..
            } => {
                assert_eq!(source_id, "A");
                assert_eq!(position, 0);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_negative_widening_fails() {
        // Overlapping input would shrink the leading duration below zero
        let list = vec![
            utt("A", 0, 1000, vec![130, 740, 130]),
            utt("A", 500, 2000, vec![130, 1240, 130]),
        ];
        assert!(correct_boundaries(&list).is_err());
    }

    #[test]
    fn test_second_pass_is_noop() {
        let list = vec![
            utt("A", 0, 1000, vec![130, 740, 130]),
            utt("A", 1050, 2000, vec![130, 690, 130]),
            utt("B", 0, 500, vec![130, 240, 130]),
        ];
        let once = correct_boundaries(&list).unwrap();
        let twice = correct_boundaries(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_input_not_mutated() {
        let list = vec![
            utt("A", 0, 1000, vec![130, 740, 130]),
            utt("A", 1050, 2000, vec![130, 690, 130]),
        ];
        let snapshot = list.clone();
        let _ = correct_boundaries(&list).unwrap();
        assert_eq!(list, snapshot);
    }

    #[test]
    fn test_extreme_times_fail_instead_of_overflowing() {
        let list = vec![
            utt("A", 0, i64::MIN, vec![130, 130]),
            utt("A", 0, 300, vec![130, 130]),
        ];
        let err = correct_boundaries(&list).unwrap_err();
        assert!(matches!(err, PrepError::Boundary { position: 0, .. }));

        let list = vec![
            utt("A", 0, 1000, vec![130, 740, 130]),
            utt("A", i64::MAX, i64::MAX, vec![130, 130]),
        ];
        assert!(correct_boundaries(&list).is_err());
    }

    #[test]
    fn test_extreme_times_through_pipeline() {
        use crate::config::PrepConfig;
        use crate::corpus::pipeline::prepare;

        let result = prepare(
            ["A|0|-9223372036854775808|ab|a b|130 130", "A|0|300|ab|a b|130 130"],
            &PrepConfig::default(),
        );
        assert!(matches!(result, Err(PrepError::Boundary { .. })));
    }

    #[test]
    fn test_correct_at_out_of_range() {
        let list = vec![utt("A", 0, 300, vec![150, 150])];
        let err = correct_at(&list, 3).unwrap_err();
        assert!(matches!(err, PrepError::Boundary { position: 3, .. }));
        assert!(correct_at(&[], 0).is_err());
    }
}
