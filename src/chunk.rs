//! Sentence-aligned text chunker.
//!
//! Splits document text into sentences and packs whole sentences into chunks
//! of roughly `chunk_size` characters. Sentences are never cut: a chunk closes
//! before the sentence that would push it to the limit, and a sentence longer
//! than the limit becomes a chunk of its own.
//!
//! Sentence detection is a heuristic (terminal punctuation followed by
//! whitespace). It splits after abbreviations such as "e.g. " and that is
//! accepted behavior.

use std::sync::LazyLock;

use regex::Regex;

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("sentence boundary regex"));

/// Splits `text` at every whitespace run that directly follows `.`, `!` or
/// `?`. The punctuation stays with the preceding sentence; pieces are returned
/// untrimmed and may be empty.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_BOUNDARY.find_iter(text) {
        // the punctuation mark is a single ASCII byte
        let end = m.start() + 1;
        sentences.push(&text[start..end]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences
}

/// Packs the sentences of `text` into chunks of about `chunk_size` chars.
///
/// A sentence joins the current chunk when the chunk is empty or when the
/// summed sentence lengths stay strictly below `chunk_size`; join spaces are
/// not counted. Returns an empty vec for blank input.
pub fn extract_semantic_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for sentence in split_sentences(text) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        let sentence_len = sentence.chars().count();

        if current_len == 0 || current_len + sentence_len < chunk_size {
            current.push(sentence);
            current_len += sentence_len;
        } else {
            chunks.push(current.join(" "));
            current = vec![sentence];
            current_len = sentence_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}
