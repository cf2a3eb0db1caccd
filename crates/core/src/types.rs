use serde::{Deserialize, Serialize};

/// Which edge pads an utterance still owns.
///
/// The aligner surrounds every utterance with a fixed silence pad. Once a
/// seam between two utterances of the same recording has been corrected the
/// pad is absorbed and the flag is cleared, so a second pass leaves it alone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgePadding {
    pub leading: bool,
    pub trailing: bool,
}

impl Default for EdgePadding {
    fn default() -> Self {
        Self {
            leading: true,
            trailing: true,
        }
    }
}

/// One utterance from a forced-alignment export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Utterance {
    /// Originating recording
    pub source_id: String,
    /// Window start (ms)
    pub start: i64,
    /// Window end (ms)
    pub end: i64,
    /// Transcript, one phoneme/duration per character
    pub text: String,
    pub phonemes: Vec<String>,
    /// Per-character durations (ms)
    pub durations: Vec<u32>,
    #[serde(default)]
    pub padding: EdgePadding,
}

/// A single position of the character/phoneme/duration walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedSymbol<'a> {
    pub ch: char,
    pub phoneme: &'a str,
    pub duration: u32,
}

impl Utterance {
    /// Walk text, phonemes and durations in lock-step.
    pub fn aligned(&self) -> impl Iterator<Item = AlignedSymbol<'_>> + '_ {
        self.text
            .chars()
            .zip(self.phonemes.iter())
            .zip(self.durations.iter())
            .map(|((ch, phoneme), &duration)| AlignedSymbol {
                ch,
                phoneme: phoneme.as_str(),
                duration,
            })
    }

    /// Sum of all durations (ms).
    pub fn total_duration(&self) -> u64 {
        self.durations.iter().map(|&d| u64::from(d)).sum()
    }

    pub fn same_recording(&self, other: &Utterance) -> bool {
        self.source_id == other.source_id
    }
}

/// Utterance with its hybrid symbol stream and frame mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedUtterance {
    pub utterance: Utterance,
    /// Phonemes for letters, literal characters otherwise
    pub hybrid: Vec<String>,
    pub words: Vec<String>,
    /// Word index per hybrid symbol
    pub phon2word: Vec<usize>,
    /// Duration per hybrid symbol (placeholders removed)
    pub durations: Vec<u32>,
    /// Hybrid index per analysis frame
    pub frame2phon: Vec<usize>,
}

/// Merged utterance plus text from its neighbours in the same recording.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextualUtterance {
    pub merged: MergedUtterance,
    pub left_context: String,
    pub right_context: String,
}

/// The record handed to feature extraction and training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub orig_start: i64,
    pub orig_end: i64,
    pub orig_filename: String,
    pub orig_text: String,
    pub phones: Vec<String>,
    pub words: Vec<String>,
    pub phon2word: Vec<usize>,
    pub frame2phon: Vec<usize>,
    pub speaker: String,
    pub left_context: String,
    pub right_context: String,
}

impl TrainingRecord {
    pub fn from_contextual(item: ContextualUtterance, speaker: &str) -> Self {
        let ContextualUtterance {
            merged,
            left_context,
            right_context,
        } = item;
        Self {
            id: None,
            orig_start: merged.utterance.start,
            orig_end: merged.utterance.end,
            orig_filename: merged.utterance.source_id,
            orig_text: merged.utterance.text,
            phones: merged.hybrid,
            words: merged.words,
            phon2word: merged.phon2word,
            frame2phon: merged.frame2phon,
            speaker: speaker.to_string(),
            left_context,
            right_context,
        }
    }
}

/// Dataset partition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Train,
    Dev,
}

impl Partition {
    pub fn name(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Dev => "dev",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utterance() -> Utterance {
        Utterance {
            source_id: "chapter01".into(),
            start: 0,
            end: 300,
            text: "a,".into(),
            phonemes: vec!["AH".into(), ",".into()],
            durations: vec![200, 100],
            padding: EdgePadding::default(),
        }
    }

    #[test]
    fn test_aligned_walks_in_lock_step() {
        let u = utterance();
        let symbols: Vec<AlignedSymbol> = u.aligned().collect();
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].ch, 'a');
        assert_eq!(symbols[0].phoneme, "AH");
        assert_eq!(symbols[0].duration, 200);
        assert_eq!(symbols[1].ch, ',');
    }

    #[test]
    fn test_total_duration() {
        assert_eq!(utterance().total_duration(), 300);
    }

    #[test]
    fn test_padding_defaults_to_owned() {
        let p = EdgePadding::default();
        assert!(p.leading);
        assert!(p.trailing);
    }

    #[test]
    fn test_training_record_schema_keys() {
        let merged = MergedUtterance {
            utterance: utterance(),
            hybrid: vec!["AH".into(), ",".into()],
            words: vec!["a".into(), ",".into()],
            phon2word: vec![0, 1],
            durations: vec![200, 100],
            frame2phon: vec![0; 30],
        };
        let record = TrainingRecord::from_contextual(
            ContextualUtterance {
                merged,
                left_context: String::new(),
                right_context: "next".into(),
            },
            "none",
        );
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "orig_start",
            "orig_end",
            "orig_filename",
            "orig_text",
            "phones",
            "words",
            "phon2word",
            "frame2phon",
            "speaker",
            "left_context",
            "right_context",
        ] {
            assert!(obj.contains_key(key), "missing key {}", key);
        }
        assert!(!obj.contains_key("id"));
        assert_eq!(obj["orig_filename"], "chapter01");
        assert_eq!(obj["right_context"], "next");
    }

    #[test]
    fn test_partition_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Partition::Dev).unwrap(), "\"dev\"");
        assert_eq!(Partition::Train.name(), "train");
    }
}
