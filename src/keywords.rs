//! Query keyword extraction.
//!
//! Turns a natural-language question into an ordered keyword set: the query
//! is case-folded, stripped of punctuation, filtered against a fixed stop-word
//! list and expanded through a [`ConceptTable`] of related terms.
//!
//! Order matters. The scorer builds bigrams from adjacent keywords, so the
//! set keeps first-seen order through expansion and deduplication.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Anything that is not a Latin or Cyrillic letter, a digit or whitespace.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zа-яё0-9\s]").expect("keyword normalization regex"));

/// Question words, prepositions and short connectives dropped from queries.
pub const STOP_WORDS: &[&str] = &[
    "кто", "что", "где", "когда", "почему", "как", "какая", "какой", "какие", "чем", "зачем",
    "откуда", "куда", "чему", "на", "в", "о", "об", "про", "за", "до", "из", "по", "при", "там",
    "тут", "этот", "эта", "это", "такое",
];

/// Tokens must be longer than this (in chars) to count as keywords.
const MIN_KEYWORD_CHARS: usize = 2;

/// One entry of the concept table: a canonical term and its related terms.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Concept {
    pub key: String,
    #[serde(default)]
    pub related: Vec<String>,
}

impl Concept {
    pub fn new(key: &str, related: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            related: related.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Immutable, ordered synonym table used for query expansion.
///
/// Entries are matched in table order, which determines where related terms
/// land in the expanded keyword set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptTable {
    entries: Vec<Concept>,
}

impl ConceptTable {
    /// Builds a table from configured entries. Terms are lowercased so they
    /// can match case-folded queries and chunks.
    pub fn new(entries: Vec<Concept>) -> Self {
        let entries = entries
            .into_iter()
            .map(|c| Concept {
                key: c.key.to_lowercase(),
                related: c.related.iter().map(|r| r.to_lowercase()).collect(),
            })
            .collect();
        Self { entries }
    }

    /// The table used when the configuration does not define `[[concepts]]`.
    pub fn builtin() -> Self {
        Self::new(vec![
            Concept::new("договор", &["договор", "контракт", "соглашение", "сделка"]),
            Concept::new("оплата", &["оплата", "платеж", "платёж", "счет", "счёт"]),
            Concept::new("срок", &["срок", "дедлайн", "период", "дата"]),
            Concept::new(
                "ответственность",
                &["ответственность", "штраф", "неустойка", "пеня"],
            ),
            Concept::new("персонаж", &["персонаж", "герой", "героиня", "действующее"]),
            Concept::new("глава", &["глава", "раздел", "часть"]),
            Concept::new("contract", &["contract", "agreement", "deal"]),
            Concept::new("payment", &["payment", "invoice", "billing"]),
        ])
    }

    pub fn entries(&self) -> &[Concept] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Related-term lists of every entry whose key is `word` or whose related
    /// list contains `word`, in table order.
    pub fn related_to<'a>(&'a self, word: &'a str) -> impl Iterator<Item = &'a [String]> + 'a {
        self.entries
            .iter()
            .filter(move |c| c.key == word || c.related.iter().any(|r| r == word))
            .map(|c| c.related.as_slice())
    }
}

/// Extracts expanded keyword sets from queries.
///
/// Holds no mutable state; one instance can serve concurrent searches.
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor {
    concepts: ConceptTable,
}

impl KeywordExtractor {
    pub fn new(concepts: ConceptTable) -> Self {
        Self { concepts }
    }

    /// Extracts the ordered keyword set for `query`.
    ///
    /// Falls back to the unexpanded base keywords when expansion yields
    /// nothing, so the result is empty only when the query has no usable
    /// tokens at all.
    pub fn extract_keywords(&self, query: &str) -> Vec<String> {
        let base = base_keywords(query);

        let result: Vec<String> = {
            let mut expanded: Vec<&str> = Vec::new();
            for kw in &base {
                expanded.push(kw.as_str());
                for related in self.concepts.related_to(kw) {
                    expanded.extend(related.iter().map(String::as_str));
                }
            }

            let mut seen: HashSet<&str> = HashSet::new();
            expanded
                .into_iter()
                .filter(|kw| seen.insert(*kw))
                .map(str::to_string)
                .collect()
        };

        if result.is_empty() {
            base
        } else {
            result
        }
    }
}

/// Normalized query tokens with stop words and short tokens removed.
fn base_keywords(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    let normalized = NON_WORD.replace_all(&lowered, " ");

    normalized
        .split_whitespace()
        .filter(|w| !is_stop_word(w) && w.chars().count() > MIN_KEYWORD_CHARS)
        .map(str::to_string)
        .collect()
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}
