//! Corpus enumeration and the [`CorpusSource`] abstraction.
//!
//! A corpus source yields [`CorpusDocument`]s for the ranking engine. Two
//! sources exist: the notes directory on disk ([`NotesDirectory`]) and a
//! user's uploaded documents in SQLite ([`crate::store::UserDocuments`]).
//!
//! File filtering is two pure predicates, [`should_skip_file`] and
//! [`is_supported_extension`], that take their configuration explicitly.

use anyhow::{bail, Result};
use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::NotesConfig;
use crate::extract::read_document;
use crate::models::CorpusDocument;

/// Anything that can hand a corpus of full-text documents to the search.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Short human-readable description, used in logs.
    fn describe(&self) -> String;

    /// Loads every document of the corpus. Documents that could not be read
    /// come back with empty content rather than as errors.
    async fn documents(&self) -> Result<Vec<CorpusDocument>>;
}

/// A candidate note file found under the notes root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFile {
    pub path: PathBuf,
    /// Path relative to the notes root, `/`-separated on all platforms.
    pub relative_path: String,
}

/// True when `filename` starts with one of the ignored prefixes.
pub fn should_skip_file(filename: &str, ignored_prefixes: &[String]) -> bool {
    ignored_prefixes
        .iter()
        .any(|prefix| filename.starts_with(prefix.as_str()))
}

/// True when the lowercased extension of `path` (with its dot) is listed in
/// `extensions`. Files without an extension are never supported.
pub fn is_supported_extension(path: &Path, extensions: &[String]) -> bool {
    let ext = match path.extension() {
        Some(e) => format!(".{}", e.to_string_lossy().to_lowercase()),
        None => return false,
    };
    extensions.iter().any(|e| e.to_lowercase() == ext)
}

/// Lists the note files under `notes.root` that pass all filters, sorted by
/// relative path.
pub fn scan_notes(notes: &NotesConfig) -> Result<Vec<NoteFile>> {
    let root = &notes.root;
    if !root.exists() {
        bail!("Notes root does not exist: {}", root.display());
    }

    let exclude_set = build_globset(&notes.exclude_globs)?;
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(notes.max_depth.max(1))
        .follow_links(notes.follow_symlinks);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable notes entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy();
        if should_skip_file(&filename, &notes.ignored_prefixes) {
            continue;
        }

        let path = entry.path();
        if !is_supported_extension(path, &notes.supported_extensions) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if exclude_set.is_match(&rel_str) {
            continue;
        }

        files.push(NoteFile {
            path: path.to_path_buf(),
            relative_path: rel_str,
        });
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    Ok(files)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// The notes directory configured under `[notes]`.
#[derive(Debug, Clone)]
pub struct NotesDirectory {
    notes: NotesConfig,
}

impl NotesDirectory {
    pub fn new(notes: NotesConfig) -> Self {
        Self { notes }
    }

    /// Scans and loads every note synchronously.
    pub fn load_blocking(&self) -> Result<Vec<CorpusDocument>> {
        let files = scan_notes(&self.notes)?;
        let documents = files
            .into_iter()
            .map(|f| {
                let content = read_document(&f.path, &self.notes.ignored_prefixes);
                CorpusDocument::new(f.relative_path, content)
            })
            .collect();
        Ok(documents)
    }
}

#[async_trait]
impl CorpusSource for NotesDirectory {
    fn describe(&self) -> String {
        format!("notes:{}", self.notes.root.display())
    }

    async fn documents(&self) -> Result<Vec<CorpusDocument>> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.load_blocking()).await?
    }
}
