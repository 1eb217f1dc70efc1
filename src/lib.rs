//! # Notes Harness
//!
//! A local-first lexical retrieval engine for notes and uploaded documents.
//!
//! Notes Harness answers "where do my documents talk about this?" without an
//! embedding service. Documents are split into sentence-aligned chunks, every
//! chunk is scored against an expanded keyword set, and the best chunks are
//! rendered with their neighbors as a context block for a language model.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────────────────┐
//! │ Notes dir    │──▶│   Loader    │──▶│ Chunk ▸ Score ▸ Merge    │──▶ context
//! │ SQLite store │   │ pdf/docx/md │   │ (keywords, top-K)        │    block
//! └──────────────┘   └─────────────┘   └──────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! nh init                              # create database
//! nh search "Что такое договор"        # search the notes directory
//! nh upload ./contract.docx            # store a document for the default user
//! nh search "сроки оплаты" --user default
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`keywords`] | Query keyword extraction and concept expansion |
//! | [`chunk`] | Sentence-aligned chunking |
//! | [`score`] | Lexical chunk scoring |
//! | [`search`] | Per-document search, corpus merge, rendering |
//! | [`extract`] | Plain-text loading of pdf/docx/txt/md/json |
//! | [`corpus`] | Notes enumeration and the corpus source trait |
//! | [`store`] | SQLite store of uploaded documents |
//! | [`ingest`] | Upload pipeline |
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`db`] | Database connection |

pub mod chunk;
pub mod config;
pub mod corpus;
pub mod db;
pub mod docs;
pub mod extract;
pub mod ingest;
pub mod inspect;
pub mod keywords;
pub mod models;
pub mod score;
pub mod search;
pub mod sources;
pub mod store;
