//! Corpus search: per-document ranking, merging and rendering.
//!
//! [`search_document`] chunks one document, scores every chunk and renders a
//! context window around each hit. [`search_corpus`] does that for a whole
//! corpus, merges the hits, sorts them by score and keeps the top results.
//! [`render_results`] turns the hits into the text block handed to the
//! language model, or [`NO_INFO_SENTINEL`] when nothing matched.
//!
//! Everything except [`run_search`] is pure and synchronous.

use anyhow::Result;
use rayon::prelude::*;
use std::collections::BTreeSet;

use crate::chunk::extract_semantic_chunks;
use crate::config::Config;
use crate::corpus::{CorpusSource, NotesDirectory};
use crate::db;
use crate::keywords::KeywordExtractor;
use crate::models::{CorpusDocument, ScoredResult};
use crate::score::score_chunk;
use crate::store::{SqliteStore, UserDocuments};

/// Returned verbatim when a search finds nothing. Callers match on it exactly.
pub const NO_INFO_SENTINEL: &str = "INFO: No relevant information was found in the documents.";

/// Prefix marking the matched chunk inside its context window.
pub const MATCH_MARKER: &str = "[MATCH] ";
/// Separator between the chunks of a context window.
pub const CONTEXT_SEPARATOR: &str = "\n[...]\n";

const FILE_LABEL: &str = "File: ";
const MAX_FOUND_WORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub chunk_size: usize,
    /// Top-K cap applied after the corpus-wide sort.
    pub final_limit: usize,
}

/// Ranks the chunks of one document against `query`.
///
/// Results come in chunk order and only for chunks with a positive score.
pub fn search_document(
    extractor: &KeywordExtractor,
    query: &str,
    content: &str,
    filename: &str,
    chunk_size: usize,
) -> Vec<ScoredResult> {
    let keywords = extractor.extract_keywords(query);
    rank_chunks(&keywords, query, content, filename, chunk_size)
}

fn rank_chunks(
    keywords: &[String],
    query: &str,
    content: &str,
    filename: &str,
    chunk_size: usize,
) -> Vec<ScoredResult> {
    let chunks = extract_semantic_chunks(content, chunk_size);

    chunks
        .iter()
        .enumerate()
        .filter_map(|(idx, chunk)| {
            let scored = score_chunk(keywords, chunk, query);
            if !scored.is_relevant() {
                return None;
            }

            let mut found_words = scored.found;
            found_words.truncate(MAX_FOUND_WORDS);

            Some(ScoredResult {
                filename: filename.to_string(),
                relevance_score: scored.score,
                found_words,
                context: context_window(&chunks, idx),
                chunk_index: idx,
            })
        })
        .collect()
}

/// Renders chunk `idx` with one neighbor on each side, marking the hit.
pub fn context_window(chunks: &[String], idx: usize) -> String {
    let start = idx.saturating_sub(1);
    let end = chunks.len().min(idx + 2);

    (start..end)
        .map(|i| {
            if i == idx {
                format!("{}{}", MATCH_MARKER, chunks[i])
            } else {
                chunks[i].clone()
            }
        })
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Searches every document and returns the best `final_limit` hits.
///
/// Documents are scored in parallel; hits are concatenated in corpus order
/// before a stable descending sort, so equal scores keep that order.
pub fn search_corpus(
    extractor: &KeywordExtractor,
    query: &str,
    documents: &[CorpusDocument],
    settings: &SearchSettings,
) -> Vec<ScoredResult> {
    let keywords = extractor.extract_keywords(query);
    tracing::debug!(?keywords, documents = documents.len(), "searching corpus");

    let per_document: Vec<Vec<ScoredResult>> = documents
        .par_iter()
        .filter(|doc| !doc.content.is_empty())
        .map(|doc| {
            rank_chunks(
                &keywords,
                query,
                &doc.content,
                &doc.filename,
                settings.chunk_size,
            )
        })
        .collect();

    merge_results(per_document, settings.final_limit)
}

/// Concatenates per-document hits, sorts by descending score and truncates.
pub fn merge_results(per_document: Vec<Vec<ScoredResult>>, limit: usize) -> Vec<ScoredResult> {
    let mut results: Vec<ScoredResult> = per_document.into_iter().flatten().collect();

    results.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(limit);
    results
}

/// Formats results as numbered blocks, or the sentinel when there are none.
pub fn render_results(results: &[ScoredResult]) -> String {
    if results.is_empty() {
        return NO_INFO_SENTINEL.to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "\nRESULT {}:\n{}{}\nRelevance: {:.2}\n---\n{}\n---",
                i + 1,
                FILE_LABEL,
                r.filename,
                r.relevance_score,
                r.context
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sorted, deduplicated filenames cited in a rendered result block.
pub fn extract_sources(rendered: &str) -> Vec<String> {
    rendered
        .lines()
        .filter_map(|line| line.strip_prefix(FILE_LABEL))
        .map(|name| name.trim().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// CLI entry point: searches the notes directory, or a user's stored
/// documents when `user` is given, and prints the rendered results.
pub async fn run_search(
    config: &Config,
    query: &str,
    user: Option<String>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let source: Box<dyn CorpusSource> = match user {
        Some(user_id) => {
            let store = SqliteStore::new(db::connect(config).await?);
            store.init_schema().await?;
            Box::new(UserDocuments::new(store, user_id))
        }
        None => Box::new(NotesDirectory::new(config.notes.clone())),
    };

    let documents = source.documents().await?;

    let mut settings = config.search_settings();
    if let Some(lim) = limit {
        settings.final_limit = lim.max(1);
    }

    let extractor = config.keyword_extractor();
    let results = search_corpus(&extractor, query, &documents, &settings);

    tracing::info!(
        source = %source.describe(),
        documents = documents.len(),
        results = results.len(),
        "search finished"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let rendered = render_results(&results);
    println!("{}", rendered);

    let sources = extract_sources(&rendered);
    if !sources.is_empty() {
        println!();
        println!("Sources:");
        for (i, s) in sources.iter().enumerate() {
            println!("  {}. {}", i + 1, s);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::{Concept, ConceptTable};

    fn plain_extractor() -> KeywordExtractor {
        KeywordExtractor::new(ConceptTable::default())
    }

    fn settings(final_limit: usize) -> SearchSettings {
        SearchSettings {
            chunk_size: 500,
            final_limit,
        }
    }

    fn result(filename: &str, score: f64) -> ScoredResult {
        ScoredResult {
            filename: filename.to_string(),
            relevance_score: score,
            found_words: Vec::new(),
            context: String::new(),
            chunk_index: 0,
        }
    }

    #[test]
    fn test_empty_content() {
        let hits = search_document(&plain_extractor(), "rust", "", "a.md", 500);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_only_positive_scores_emitted() {
        let content = "Rust is a language. Python is another. Go is third.";
        let hits = search_document(&plain_extractor(), "python", content, "a.md", 20);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk_index, 1);
        assert!(hits[0].relevance_score > 0.0);
        assert_eq!(hits[0].found_words, vec!["python"]);
    }

    #[test]
    fn test_context_window_middle() {
        let chunks: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(context_window(&chunks, 1), "a\n[...]\n[MATCH] b\n[...]\nc");
    }

    #[test]
    fn test_context_window_edges() {
        let chunks: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(context_window(&chunks, 0), "[MATCH] a\n[...]\nb");
        assert_eq!(context_window(&chunks, 2), "b\n[...]\n[MATCH] c");
        let single = vec!["only".to_string()];
        assert_eq!(context_window(&single, 0), "[MATCH] only");
    }

    #[test]
    fn test_found_words_capped_at_five() {
        let ex = KeywordExtractor::new(ConceptTable::new(vec![Concept::new(
            "one",
            &["two", "three", "four", "five", "six", "seven"],
        )]));
        let content = "one two three four five six seven";
        let hits = search_document(&ex, "one", content, "a.md", 500);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].found_words, vec!["one", "two", "three", "four", "five"]);
    }

    #[test]
    fn test_higher_score_document_first() {
        let merged = merge_results(
            vec![vec![result("a.md", 5.0)], vec![result("b.md", 7.0)]],
            10,
        );
        assert_eq!(merged[0].filename, "b.md");
        assert_eq!(merged[1].filename, "a.md");
    }

    #[test]
    fn test_merge_is_stable_and_truncates() {
        let merged = merge_results(
            vec![
                vec![result("a.md", 2.0), result("a.md", 3.0)],
                vec![result("b.md", 3.0), result("c.md", 1.0)],
            ],
            3,
        );
        let names: Vec<(&str, f64)> = merged
            .iter()
            .map(|r| (r.filename.as_str(), r.relevance_score))
            .collect();
        assert_eq!(names, vec![("a.md", 3.0), ("b.md", 3.0), ("a.md", 2.0)]);
    }

    #[test]
    fn test_corpus_ranks_across_documents() {
        let docs = vec![
            CorpusDocument::new("weak.md", "Some filler text. Then rust appears late."),
            CorpusDocument::new("strong.md", "Rust ownership rules. Rust ownership again."),
            CorpusDocument::new("empty.md", ""),
        ];
        let hits = search_corpus(&plain_extractor(), "rust ownership", &docs, &settings(10));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].filename, "strong.md");
        assert_eq!(hits[1].filename, "weak.md");
        assert!(hits[0].relevance_score > hits[1].relevance_score);
    }

    #[test]
    fn test_corpus_top_k() {
        let docs: Vec<CorpusDocument> = (0..8)
            .map(|i| CorpusDocument::new(format!("{}.md", i), "rust notes"))
            .collect();
        let hits = search_corpus(&plain_extractor(), "rust", &docs, &settings(3));
        assert_eq!(hits.len(), 3);
        // equal scores keep corpus order
        let names: Vec<&str> = hits.iter().map(|h| h.filename.as_str()).collect();
        assert_eq!(names, vec!["0.md", "1.md", "2.md"]);
    }

    #[test]
    fn test_no_hits_renders_sentinel() {
        let docs = vec![CorpusDocument::new("a.md", "Nothing relevant here.")];
        let hits = search_corpus(&plain_extractor(), "kubernetes", &docs, &settings(5));
        assert!(hits.is_empty());
        assert_eq!(render_results(&hits), NO_INFO_SENTINEL);
    }

    #[test]
    fn test_render_format() {
        let mut r = result("notes.md", 3.5);
        r.context = "[MATCH] hello".to_string();
        let rendered = render_results(&[r.clone(), r]);
        assert!(rendered.starts_with("\nRESULT 1:\nFile: notes.md\nRelevance: 3.50\n---\n[MATCH] hello\n---"));
        assert!(rendered.contains("\n\nRESULT 2:\n"));
    }

    #[test]
    fn test_extract_sources() {
        let rendered = render_results(&[
            result("b.md", 3.0),
            result("a.md", 2.0),
            result("b.md", 1.0),
        ]);
        assert_eq!(extract_sources(&rendered), vec!["a.md", "b.md"]);
        assert!(extract_sources(NO_INFO_SENTINEL).is_empty());
    }

    #[test]
    fn test_search_is_pure() {
        let ex = plain_extractor();
        let content = "Alpha beta. Gamma delta.";
        let a = search_document(&ex, "beta", content, "x.md", 500);
        let b = search_document(&ex, "beta", content, "x.md", 500);
        assert_eq!(a, b);
    }
}
