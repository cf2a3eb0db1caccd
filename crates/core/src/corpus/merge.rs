//! Character/phoneme hybrid stream.
//!
//! Letters are replaced by their aligned phoneme, everything else (spaces,
//! punctuation, digits the aligner kept literal) passes through. Letters the
//! aligner marked silent with [`PLACEHOLDER_PHONEME`] are dropped together
//! with their word index and duration before frames are mapped.

use crate::types::{MergedUtterance, Utterance};

use super::frames::frame_to_phoneme;
use super::words::{char_word_indices, tokenize};

/// Phoneme the aligner emits for letters with no sound of their own.
pub const PLACEHOLDER_PHONEME: &str = "_";

/// One surviving position of the hybrid stream.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HybridSymbol {
    symbol: String,
    word: usize,
    duration: u32,
}

fn is_placeholder(ch: char, phoneme: &str) -> bool {
    ch.is_alphabetic() && !ch.is_whitespace() && phoneme == PLACEHOLDER_PHONEME
}

/// Build the hybrid stream, word map and frame map for one utterance.
pub fn merge(utterance: Utterance, frame_ms: u32) -> MergedUtterance {
    let words = tokenize(&utterance.text);
    let word_of = char_word_indices(&utterance.text, &words);

    let mut dropped = 0usize;
    let mut dropped_ms = 0u64;
    let symbols: Vec<HybridSymbol> = utterance
        .aligned()
        .zip(word_of.iter())
        .filter_map(|(sym, &word)| {
            if is_placeholder(sym.ch, sym.phoneme) {
                dropped += 1;
                dropped_ms += u64::from(sym.duration);
                return None;
            }
            let symbol = if sym.ch.is_alphabetic() {
                sym.phoneme.to_string()
            } else {
                sym.ch.to_string()
            };
            Some(HybridSymbol {
                symbol,
                word,
                duration: sym.duration,
            })
        })
        .collect();

    if dropped_ms > 0 {
        log::warn!(
            "{} ({}..{}): {} placeholder symbol(s) carried {} ms, dropped from the timeline",
            utterance.source_id,
            utterance.start,
            utterance.end,
            dropped,
            dropped_ms
        );
    }

    let mut hybrid = Vec::with_capacity(symbols.len());
    let mut phon2word = Vec::with_capacity(symbols.len());
    let mut durations = Vec::with_capacity(symbols.len());
    for s in symbols {
        hybrid.push(s.symbol);
        phon2word.push(s.word);
        durations.push(s.duration);
    }
    let frame2phon = frame_to_phoneme(&durations, frame_ms);

    MergedUtterance {
        utterance,
        hybrid,
        words,
        phon2word,
        durations,
        frame2phon,
    }
}
