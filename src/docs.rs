//! Stored document management commands.
//!
//! CLI entry points for `nh init` and `nh docs ...`, thin wrappers over
//! [`SqliteStore`].

use anyhow::{bail, Result};

use crate::config::Config;
use crate::db;
use crate::store::SqliteStore;

async fn open_store(config: &Config) -> Result<SqliteStore> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    store.init_schema().await?;
    Ok(store)
}

pub async fn run_init(config: &Config) -> Result<()> {
    let store = open_store(config).await?;
    store.pool().close().await;
    println!("Database initialized successfully.");
    Ok(())
}

pub async fn run_list(config: &Config, user_id: &str, json: bool) -> Result<()> {
    let store = open_store(config).await?;
    let docs = store.list_documents(user_id).await?;

    if json {
        let payload = serde_json::json!({ "user_id": user_id, "documents": docs });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if docs.is_empty() {
        println!("No documents for user '{}'.", user_id);
    } else {
        println!("{:<6} {:<8} {:<22} NAME", "ID", "CHUNKS", "CREATED");
        for doc in &docs {
            let chunks = store.count_chunks(doc.id).await?;
            println!(
                "{:<6} {:<8} {:<22} {}",
                doc.id, chunks, doc.created_at, doc.name
            );
        }
    }

    store.pool().close().await;
    Ok(())
}

pub async fn run_delete(config: &Config, user_id: &str, document_id: i64) -> Result<()> {
    let store = open_store(config).await?;
    let deleted = store.delete_document(user_id, document_id).await?;
    store.pool().close().await;

    if !deleted {
        bail!("document not found: {}", document_id);
    }
    tracing::info!(user = user_id, document_id, "document deleted");
    println!("deleted document {}", document_id);
    Ok(())
}

pub async fn run_clear(config: &Config, user_id: &str) -> Result<()> {
    let store = open_store(config).await?;
    let count = store.delete_all_documents(user_id).await?;
    store.pool().close().await;

    tracing::info!(user = user_id, count, "documents cleared");
    println!("deleted documents: {}", count);
    Ok(())
}
