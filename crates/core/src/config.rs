//! Options for a corpus preparation run.

use serde::{Deserialize, Serialize};

use crate::error::PrepError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrepConfig {
    /// Preceding utterances used as left context
    pub prev_sentences: usize,
    /// Following utterances used as right context
    pub next_sentences: usize,
    /// Fraction of utterances routed to the dev partition
    pub dev_ratio: f64,
    /// Speaker label copied onto every record
    pub speaker: String,
    /// Sample rate of the feature extractor (Hz)
    pub sample_rate: u32,
    /// Analysis hop (samples)
    pub hop_size: u32,
    /// Prefix for record ids
    pub prefix: String,
}

impl PrepConfig {
    pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;
    pub const DEFAULT_HOP_SIZE: u32 = 240;

    /// Length of one analysis frame in alignment time units (ms).
    ///
    /// The hop must cover a whole number of milliseconds, otherwise the
    /// frame grid drifts against the duration timeline.
    pub fn frame_ms(&self) -> Result<u32, PrepError> {
        if self.sample_rate == 0 || self.hop_size == 0 {
            return Err(PrepError::invalid_config(
                "sample rate and hop size must be positive",
            ));
        }
        let scaled = u64::from(self.hop_size) * 1000;
        let rate = u64::from(self.sample_rate);
        if scaled % rate != 0 {
            return Err(PrepError::invalid_config(format!(
                "hop of {} samples at {} Hz is not a whole number of milliseconds",
                self.hop_size, self.sample_rate
            )));
        }
        let frame = scaled / rate;
        u32::try_from(frame)
            .map_err(|_| PrepError::invalid_config(format!("frame of {} ms is too long", frame)))
    }
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            prev_sentences: 5,
            next_sentences: 5,
            dev_ratio: 0.001,
            speaker: "none".to_string(),
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
            hop_size: Self::DEFAULT_HOP_SIZE,
            prefix: "FILE".to_string(),
        }
    }
}
