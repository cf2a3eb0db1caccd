//! End-to-end corpus preparation: parse, correct, merge, contextualise,
//! split.

use serde::{Deserialize, Serialize};

use crate::config::PrepConfig;
use crate::error::PrepError;
use crate::types::TrainingRecord;

use super::boundary::correct_boundaries;
use super::context::build_contexts;
use super::merge::merge;
use super::parse::parse_alignments;
use super::split::{dev_stride, split_dataset};

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CorpusStats {
    pub lines_read: usize,
    pub lines_skipped: usize,
    pub utterances: usize,
    /// Sum of corrected durations (ms)
    pub total_audio_ms: u64,
    pub train: usize,
    pub dev: usize,
}

/// Output of a preparation run.
#[derive(Debug, Clone)]
pub struct PreparedCorpus {
    pub train: Vec<TrainingRecord>,
    pub dev: Vec<TrainingRecord>,
    pub stats: CorpusStats,
}

/// Stable-sort by recording and number records `{prefix}_{index:08}`.
pub fn assign_ids(records: &mut [TrainingRecord], prefix: &str) {
    records.sort_by(|a, b| a.orig_filename.cmp(&b.orig_filename));
    for (i, record) in records.iter_mut().enumerate() {
        record.id = Some(format!("{}_{:08}", prefix, i));
    }
}

fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    format!(
        "{}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        ms % 1000
    )
}

/// Run the full pipeline over alignment lines in file order.
pub fn prepare<'a, I>(lines: I, config: &PrepConfig) -> Result<PreparedCorpus, PrepError>
where
    I: IntoIterator<Item = &'a str>,
{
    let frame_ms = config.frame_ms()?;

    let parsed = parse_alignments(lines)?;
    let corrected = correct_boundaries(&parsed.utterances)?;
    let total_audio_ms: u64 = corrected.iter().map(|u| u.total_duration()).sum();

    let merged: Vec<_> = corrected.into_iter().map(|u| merge(u, frame_ms)).collect();
    let contextual = build_contexts(merged, config.prev_sentences, config.next_sentences);
    let records: Vec<TrainingRecord> = contextual
        .into_iter()
        .map(|c| TrainingRecord::from_contextual(c, &config.speaker))
        .collect();

    let utterances = records.len();
    log::debug!("Dev stride: {}", dev_stride(config.dev_ratio));
    let mut split = split_dataset(records, config.dev_ratio);
    assign_ids(&mut split.train, &config.prefix);
    assign_ids(&mut split.dev, &config.prefix);

    let stats = CorpusStats {
        lines_read: parsed.lines_read,
        lines_skipped: parsed.skipped,
        utterances,
        total_audio_ms,
        train: split.train.len(),
        dev: split.dev.len(),
    };
    log::info!(
        "Found {} valid sentences, with a total audio time of {}",
        stats.utterances,
        format_duration(stats.total_audio_ms)
    );
    log::info!(
        "Trainset will contain {} examples and devset {} examples",
        stats.train,
        stats.dev
    );

    Ok(PreparedCorpus {
        train: split.train,
        dev: split.dev,
        stats,
    })
}
