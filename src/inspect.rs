//! Debugging commands: show how a query is expanded and how a file is chunked.

use anyhow::{bail, Result};
use std::path::Path;

use crate::chunk::extract_semantic_chunks;
use crate::config::Config;
use crate::extract::read_document;

pub fn run_keywords(config: &Config, query: &str) -> Result<()> {
    let keywords = config.keyword_extractor().extract_keywords(query);
    if keywords.is_empty() {
        println!("No keywords.");
        return Ok(());
    }
    for kw in keywords {
        println!("{}", kw);
    }
    Ok(())
}

pub fn run_chunk(config: &Config, path: &Path, chunk_size: Option<usize>) -> Result<()> {
    let text = read_document(path, &config.notes.ignored_prefixes);
    if text.is_empty() {
        bail!("could not read any text from {}", path.display());
    }

    let size = chunk_size.unwrap_or(config.chunking.chunk_size).max(1);
    let chunks = extract_semantic_chunks(&text, size);

    println!("--- Chunks ({}) ---", chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        println!("[chunk {}] ({} chars)", i, chunk.chars().count());
        println!("{}", chunk);
        println!();
    }
    Ok(())
}
