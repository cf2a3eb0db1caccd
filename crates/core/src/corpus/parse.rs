//! Alignment export parsing.
//!
//! Each line is `source_id|start|end|text|phonemes|durations`, with phonemes
//! and durations space-separated and parallel to the characters of `text`.

use crate::error::PrepError;
use crate::types::{EdgePadding, Utterance};

/// Parsed utterances plus bookkeeping about what was filtered.
#[derive(Debug, Clone, Default)]
pub struct ParsedCorpus {
    pub utterances: Vec<Utterance>,
    pub lines_read: usize,
    pub skipped: usize,
}

/// Text carrying a `{...}` annotation marks an unreliable alignment.
fn is_annotated(text: &str) -> bool {
    text.contains('{') && text.contains('}')
}

fn parse_int<T: std::str::FromStr>(
    token: &str,
    what: &str,
    line_no: usize,
    line: &str,
) -> Result<T, PrepError> {
    token
        .trim()
        .parse::<T>()
        .map_err(|_| PrepError::malformed(line_no, line, format!("invalid {} '{}'", what, token)))
}

/// Parse a single line. `line_no` is 1-based and only used for diagnostics.
///
/// Returns `Ok(None)` for lines that are filtered by policy (too few fields,
/// annotated text).
pub fn parse_line(line_no: usize, raw: &str) -> Result<Option<Utterance>, PrepError> {
    let line = raw.trim();
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 6 {
        return Ok(None);
    }
    let text = parts[3];
    if is_annotated(text) {
        return Ok(None);
    }

    let start: i64 = parse_int(parts[1], "start", line_no, line)?;
    let end: i64 = parse_int(parts[2], "end", line_no, line)?;
    let phonemes: Vec<String> = parts[4].split(' ').map(str::to_string).collect();
    let durations = parts[5]
        .trim()
        .split(' ')
        .map(|token| parse_int::<u32>(token, "duration", line_no, line))
        .collect::<Result<Vec<u32>, PrepError>>()?;

    let text_len = text.chars().count();
    if text_len != phonemes.len() || text_len != durations.len() {
        return Err(PrepError::malformed(
            line_no,
            line,
            format!(
                "length mismatch: {} characters, {} phonemes, {} durations",
                text_len,
                phonemes.len(),
                durations.len()
            ),
        ));
    }

    Ok(Some(Utterance {
        source_id: parts[0].to_string(),
        start,
        end,
        text: text.to_string(),
        phonemes,
        durations,
        padding: EdgePadding::default(),
    }))
}

/// Parse a whole alignment export, keeping input order.
pub fn parse_alignments<'a, I>(lines: I) -> Result<ParsedCorpus, PrepError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut corpus = ParsedCorpus::default();
    for (i, line) in lines.into_iter().enumerate() {
        corpus.lines_read += 1;
        match parse_line(i + 1, line)? {
            Some(utterance) => corpus.utterances.push(utterance),
            None => {
                log::debug!("Skipping line {}: {:?}", i + 1, line);
                corpus.skipped += 1;
            }
        }
    }
    log::info!(
        "Parsed {} utterances from {} lines ({} skipped)",
        corpus.utterances.len(),
        corpus.lines_read,
        corpus.skipped
    );
    Ok(corpus)
}
