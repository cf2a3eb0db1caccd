//! Left/right text context from neighbouring utterances.

use crate::types::{ContextualUtterance, MergedUtterance};

/// Characters the aligner puts in front of a transcript for the leading
/// silence position.
pub const LEADING_MARKERS: &[char] = &[' ', '_'];

/// Drop the aligner's leading silence marker, if present.
pub fn strip_leading_marker(text: &str) -> &str {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if LEADING_MARKERS.contains(&c) => chars.as_str(),
        _ => text,
    }
}

/// Neighbour range `[start, end)` for `position`, never crossing into
/// another recording.
pub fn context_window(
    items: &[MergedUtterance],
    position: usize,
    prev: usize,
    next: usize,
) -> (usize, usize) {
    let focal = &items[position].utterance;
    let mut start = position.saturating_sub(prev);
    let mut end = items.len().min(position.saturating_add(next).saturating_add(1));

    while start < position && !items[start].utterance.same_recording(focal) {
        start += 1;
    }
    while end > position + 1 && !items[end - 1].utterance.same_recording(focal) {
        end -= 1;
    }
    (start, end)
}

fn joined_text(items: &[MergedUtterance]) -> String {
    items
        .iter()
        .map(|m| strip_leading_marker(&m.utterance.text))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Attach context strings to every merged utterance, keeping order.
pub fn build_contexts(
    items: Vec<MergedUtterance>,
    prev: usize,
    next: usize,
) -> Vec<ContextualUtterance> {
    let contexts: Vec<(String, String)> = (0..items.len())
        .map(|i| {
            let (start, end) = context_window(&items, i, prev, next);
            (joined_text(&items[start..i]), joined_text(&items[i + 1..end]))
        })
        .collect();

    items
        .into_iter()
        .zip(contexts)
        .map(|(merged, (left_context, right_context))| ContextualUtterance {
            merged,
            left_context,
            right_context,
        })
        .collect()
}
