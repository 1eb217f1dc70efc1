//! Core data models used throughout Notes Harness.
//!
//! These types carry documents and ranked fragments between the corpus
//! sources, the ranking engine and the CLI.

use serde::Serialize;

/// Full text of one document, as handed to the ranking engine.
///
/// Produced both by the notes directory (one per loaded file) and by the
/// document store (stored chunk rows joined back together).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusDocument {
    pub filename: String,
    pub content: String,
}

impl CorpusDocument {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// A ranked chunk returned from a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    pub filename: String,
    pub relevance_score: f64,
    /// Matched keywords, at most five.
    pub found_words: Vec<String>,
    /// The matched chunk with its neighbors.
    pub context: String,
    pub chunk_index: usize,
}

/// Stored document metadata, without its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub id: i64,
    pub name: String,
    pub created_at: String, // RFC 3339
}
