//! Lexical relevance scoring of a chunk against a keyword set.
//!
//! The score adds up four signals, all computed on the case-folded chunk:
//!
//! | Signal | Contribution |
//! |--------|--------------|
//! | keyword hit | `+1` per keyword found as a substring |
//! | position bonus | `max(0, 100 - offset) / 100` for the first hit of each keyword |
//! | bigram | `+3` per adjacent keyword pair `"a b"` found verbatim |
//! | capitalized query word | `+2` per query token starting uppercase that occurs in the chunk |
//!
//! Offsets are measured in characters. Capitalization is read from the raw
//! query, never the normalized one, so proper nouns keep their weight.

/// Offsets at or beyond this many chars earn no position bonus.
const POSITION_WINDOW: usize = 100;
const BIGRAM_BONUS: f64 = 3.0;
const CAPITALIZED_BONUS: f64 = 2.0;

/// Score of one chunk and the keywords it matched, in keyword order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkScore {
    pub score: f64,
    pub found: Vec<String>,
}

impl ChunkScore {
    pub fn is_relevant(&self) -> bool {
        self.score > 0.0
    }
}

pub fn score_chunk(keywords: &[String], chunk: &str, original_query: &str) -> ChunkScore {
    let folded = chunk.to_lowercase();
    let mut score = 0.0;
    let mut found = Vec::new();

    for keyword in keywords {
        if let Some(byte_pos) = folded.find(keyword.as_str()) {
            let offset = folded[..byte_pos].chars().count();
            let bonus = POSITION_WINDOW.saturating_sub(offset) as f64 / POSITION_WINDOW as f64;
            score += 1.0 + bonus;
            found.push(keyword.clone());
        }
    }

    if keywords.len() >= 2 {
        for pair in keywords.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            if folded.contains(&bigram) {
                score += BIGRAM_BONUS;
            }
        }
    }

    for word in original_query.split_whitespace() {
        if is_capitalized(word) && folded.contains(&word.to_lowercase()) {
            score += CAPITALIZED_BONUS;
        }
    }

    ChunkScore {
        score: round2(score),
        found,
    }
}

fn is_capitalized(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.is_uppercase() && chars.next().is_some(),
        None => false,
    }
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
