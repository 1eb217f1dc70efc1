//! Document upload: load → chunk → store.
//!
//! Reads a file through the same loader the notes search uses, splits it
//! with the sentence chunker and persists the chunks for one user.

use anyhow::{bail, Result};
use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};

use crate::chunk::extract_semantic_chunks;
use crate::config::Config;
use crate::db;
use crate::extract::read_document;
use crate::store::SqliteStore;

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub document_id: i64,
    pub filename: String,
    pub chunks: usize,
}

/// Loads, chunks and stores `path` for `user_id`.
///
/// Fails without writing anything when no text could be read from the file.
pub async fn ingest_file(
    config: &Config,
    store: &SqliteStore,
    user_id: &str,
    path: &Path,
) -> Result<IngestReport> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let owned: PathBuf = path.to_path_buf();
    let prefixes = config.notes.ignored_prefixes.clone();
    let text = tokio::task::spawn_blocking(move || read_document(&owned, &prefixes)).await?;

    if text.is_empty() {
        bail!("could not read any text from {}", path.display());
    }

    let chunks = extract_semantic_chunks(&text, config.chunking.chunk_size);
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let document_id = store
        .save_document(user_id, &filename, &chunks, &created_at)
        .await?;

    tracing::info!(
        user = user_id,
        document_id,
        filename = %filename,
        chunks = chunks.len(),
        "document stored"
    );

    Ok(IngestReport {
        document_id,
        filename,
        chunks: chunks.len(),
    })
}

/// CLI entry point for `nh upload`.
pub async fn run_upload(config: &Config, path: &Path, user_id: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    store.init_schema().await?;

    let report = ingest_file(config, &store, user_id, path).await?;

    println!("Upload {}", report.filename);
    println!("  document id: {}", report.document_id);
    println!("  chunks: {}", report.chunks);
    println!("ok");

    store.pool().close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_config(tmp: &TempDir) -> Config {
        let mut cfg = Config::minimal();
        cfg.db.path = tmp.path().join("data/nh.sqlite");
        cfg.chunking.chunk_size = 25;
        cfg
    }

    async fn open_store(cfg: &Config) -> SqliteStore {
        let store = SqliteStore::new(db::connect(cfg).await.unwrap());
        store.init_schema().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_ingest_chunks_and_stores() {
        let tmp = TempDir::new().unwrap();
        let cfg = test_config(&tmp);
        let store = open_store(&cfg).await;

        let path = tmp.path().join("notes.md");
        fs::write(&path, "Aaaaaaaaa. Bbbbbbbbb. Ccccccccc. Ddddddddd.").unwrap();

        let report = ingest_file(&cfg, &store, "alice", &path).await.unwrap();
        assert_eq!(report.filename, "notes.md");
        assert_eq!(report.chunks, 2);
        assert_eq!(store.count_chunks(report.document_id).await.unwrap(), 2);

        let listed = store.list_documents("alice").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "notes.md");
        assert!(listed[0].created_at.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_unreadable_file_stores_nothing() {
        let tmp = TempDir::new().unwrap();
        let cfg = test_config(&tmp);
        let store = open_store(&cfg).await;

        let path = tmp.path().join("picture.png");
        fs::write(&path, "not text").unwrap();

        let err = ingest_file(&cfg, &store, "alice", &path).await.unwrap_err();
        assert!(err.to_string().contains("could not read any text"));
        assert!(store.list_documents("alice").await.unwrap().is_empty());
    }
}
