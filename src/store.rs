//! SQLite document store for uploaded documents.
//!
//! Each document belongs to one user and owns an ordered list of chunk rows.
//! The search never reads chunk rows individually: [`SqliteStore::get_user_documents`]
//! joins them back into full text with `\n`, which the ranking engine then
//! re-chunks. That round trip is lossy with respect to the stored boundaries.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::corpus::CorpusSource;
use crate::models::{CorpusDocument, DocumentSummary};

/// SQLite-backed store of user documents and their chunks.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the `documents` and `chunks` tables if they do not exist.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chunks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                document_id INTEGER NOT NULL,
                text TEXT NOT NULL,
                FOREIGN KEY (document_id) REFERENCES documents(id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_user_id ON documents(user_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_document_id ON chunks(document_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Stores a document and its chunks in one transaction; returns the new id.
    pub async fn save_document(
        &self,
        user_id: &str,
        name: &str,
        chunks: &[String],
        created_at: &str,
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let doc_id = sqlx::query("INSERT INTO documents (user_id, name, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(name)
            .bind(created_at)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        for chunk in chunks {
            sqlx::query("INSERT INTO chunks (document_id, text) VALUES (?, ?)")
                .bind(doc_id)
                .bind(chunk)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(doc_id)
    }

    /// Full text of every document of `user_id` that has at least one chunk,
    /// chunks joined by `\n` in insertion order.
    pub async fn get_user_documents(&self, user_id: &str) -> Result<Vec<CorpusDocument>> {
        let rows = sqlx::query(
            r#"
            SELECT d.id, d.name, c.text
            FROM documents d
            JOIN chunks c ON c.document_id = d.id
            WHERE d.user_id = ?
            ORDER BY d.id, c.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut documents: Vec<(i64, CorpusDocument)> = Vec::new();
        for row in &rows {
            let id: i64 = row.get("id");
            let text: String = row.get("text");
            if let Some((last_id, doc)) = documents.last_mut() {
                if *last_id == id {
                    doc.content.push('\n');
                    doc.content.push_str(&text);
                    continue;
                }
            }
            documents.push((id, CorpusDocument::new(row.get::<String, _>("name"), text)));
        }

        Ok(documents.into_iter().map(|(_, doc)| doc).collect())
    }

    pub async fn list_documents(&self, user_id: &str) -> Result<Vec<DocumentSummary>> {
        let rows = sqlx::query(
            "SELECT id, name, created_at FROM documents WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| DocumentSummary {
                id: row.get("id"),
                name: row.get("name"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// Deletes one document of `user_id` with its chunks. Returns false when
    /// no such document exists for that user.
    pub async fn delete_document(&self, user_id: &str, document_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ? AND user_id = ?")
            .bind(document_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes every document of `user_id`; returns how many were removed.
    pub async fn delete_all_documents(&self, user_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_chunks(&self, document_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks WHERE document_id = ?")
            .bind(document_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// The uploaded documents of one user, as a corpus.
#[derive(Debug, Clone)]
pub struct UserDocuments {
    store: SqliteStore,
    user_id: String,
}

impl UserDocuments {
    pub fn new(store: SqliteStore, user_id: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl CorpusSource for UserDocuments {
    fn describe(&self) -> String {
        format!("user:{}", self.user_id)
    }

    async fn documents(&self) -> Result<Vec<CorpusDocument>> {
        self.store.get_user_documents(&self.user_id).await
    }
}
