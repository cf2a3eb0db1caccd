//! Word segmentation for the hybrid merger.
//!
//! Tokens are maximal alphanumeric runs (an apostrophe between two
//! alphanumerics stays inside the word), maximal whitespace runs, and single
//! punctuation characters. Concatenating the tokens gives back the input, so
//! every character of the text belongs to exactly one token.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Space,
    Punct,
}

fn classify(c: char) -> CharClass {
    if c.is_alphanumeric() {
        CharClass::Word
    } else if c.is_whitespace() {
        CharClass::Space
    } else {
        CharClass::Punct
    }
}

/// Split text into word, whitespace and punctuation tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_class: Option<CharClass> = None;

    for (i, &c) in chars.iter().enumerate() {
        let mut class = classify(c);
        if c == '\'' && current_class == Some(CharClass::Word) {
            let next_is_word = chars
                .get(i + 1)
                .map(|&n| classify(n) == CharClass::Word)
                .unwrap_or(false);
            if next_is_word {
                class = CharClass::Word;
            }
        }

        let extends = matches!(
            (current_class, class),
            (Some(CharClass::Word), CharClass::Word) | (Some(CharClass::Space), CharClass::Space)
        );
        if !extends && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        current.push(c);
        current_class = Some(class);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Word index for every character of `text`, given its tokens.
///
/// A running character counter walks through each token's length and moves
/// on to the next token once it is consumed.
pub fn char_word_indices(text: &str, words: &[String]) -> Vec<usize> {
    let lengths: Vec<usize> = words.iter().map(|w| w.chars().count()).collect();
    let mut indices = Vec::with_capacity(text.len());
    let mut word = 0;
    let mut consumed = 0;
    for _ in text.chars() {
        indices.push(word);
        consumed += 1;
        if lengths.get(word).is_some_and(|&len| consumed == len) {
            consumed = 0;
            word += 1;
        }
    }
    indices
}
