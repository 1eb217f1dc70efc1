use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::chunk::DEFAULT_CHUNK_SIZE;
use crate::keywords::{Concept, ConceptTable, KeywordExtractor};
use crate::search::SearchSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub notes: NotesConfig,
    /// Replaces the built-in concept table when present.
    #[serde(default)]
    pub concepts: Option<Vec<Concept>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Number of results kept after the corpus-wide sort.
    #[serde(default = "default_final_limit")]
    pub final_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            final_limit: default_final_limit(),
        }
    }
}

fn default_final_limit() -> usize {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotesConfig {
    #[serde(default = "default_notes_root")]
    pub root: PathBuf,
    /// Files whose name starts with any of these are never read.
    #[serde(default = "default_ignored_prefixes")]
    pub ignored_prefixes: Vec<String>,
    /// Lowercase extensions with a leading dot.
    #[serde(default = "default_supported_extensions")]
    pub supported_extensions: Vec<String>,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            root: default_notes_root(),
            ignored_prefixes: default_ignored_prefixes(),
            supported_extensions: default_supported_extensions(),
            max_depth: default_max_depth(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

fn default_notes_root() -> PathBuf {
    PathBuf::from("./notes")
}
fn default_ignored_prefixes() -> Vec<String> {
    vec!["~$".to_string(), ".".to_string()]
}
fn default_supported_extensions() -> Vec<String> {
    [".pdf", ".docx", ".txt", ".md", ".json"]
        .iter()
        .map(|e| e.to_string())
        .collect()
}
fn default_max_depth() -> usize {
    1
}

impl Config {
    /// Defaults for commands that can run without a config file.
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/nh.sqlite"),
            },
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            notes: NotesConfig::default(),
            concepts: None,
        }
    }

    pub fn concept_table(&self) -> ConceptTable {
        match &self.concepts {
            Some(entries) => ConceptTable::new(entries.clone()),
            None => ConceptTable::builtin(),
        }
    }

    pub fn keyword_extractor(&self) -> KeywordExtractor {
        KeywordExtractor::new(self.concept_table())
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            chunk_size: self.chunking.chunk_size,
            final_limit: self.retrieval.final_limit,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&content)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Like [`load_config`], but a missing file yields [`Config::minimal`].
/// A file that exists and fails to parse is still an error.
pub fn load_config_or_minimal(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config not found, using defaults");
        return Ok(Config::minimal());
    }
    load_config(path)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.chunking.chunk_size == 0 {
        anyhow::bail!("chunking.chunk_size must be > 0");
    }

    if config.retrieval.final_limit < 1 {
        anyhow::bail!("retrieval.final_limit must be >= 1");
    }

    for ext in &config.notes.supported_extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            anyhow::bail!(
                "notes.supported_extensions entries must look like '.md', got '{}'",
                ext
            );
        }
    }

    if let Some(concepts) = &config.concepts {
        for concept in concepts {
            if concept.key.trim().is_empty() {
                anyhow::bail!("concepts entries must have a non-empty key");
            }
        }
    }

    Ok(config)
}
