//! Duration timeline to per-frame symbol index.

/// Map every whole analysis frame to the symbol active at its start.
///
/// Symbol `k` occupies `[sum(durations[..k]), sum(durations[..=k]))`. Frame
/// `f` starts at `f * frame_ms` and maps to the first symbol whose interval
/// ends after that point, which never selects a zero-length interval. There
/// are `sum(durations) / frame_ms` frames; a trailing partial frame is
/// dropped.
///
/// `frame_ms` must be positive ([`PrepConfig::frame_ms`] guarantees it). A
/// zero frame size yields an empty map in release builds.
///
/// [`PrepConfig::frame_ms`]: crate::config::PrepConfig::frame_ms
pub fn frame_to_phoneme(durations: &[u32], frame_ms: u32) -> Vec<usize> {
    debug_assert!(frame_ms > 0, "frame size must be positive");
    if frame_ms == 0 {
        return Vec::new();
    }
    let frame_ms = u64::from(frame_ms);

    let ends: Vec<u64> = durations
        .iter()
        .scan(0u64, |acc, &d| {
            *acc += u64::from(d);
            Some(*acc)
        })
        .collect();
    let total = ends.last().copied().unwrap_or(0);
    let n_frames = total / frame_ms;

    let mut frames = Vec::with_capacity(n_frames as usize);
    let mut current = 0;
    for frame in 0..n_frames {
        let t = frame * frame_ms;
        // t < total, so some interval still ends after t
        while t >= ends[current] {
            current += 1;
        }
        frames.push(current);
    }
    frames
}
