//! `snipsync_core` keeps copies of text in sync across a set of documents.
//! A span of text is defined once between definition markers and copied into
//! every reference span that names it, so code samples in documentation never
//! drift from the code they were taken from.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Files on disk
//!   -> project (collects text files into a Corpus)
//!   -> document (splits each document into lines, classifying markers)
//!   -> validate (corpus wide structural checks)
//!   -> resolve + indent (find definition or file content, strip indentation)
//!   -> template (wrap content, e.g. in a markdown code fence)
//!   -> engine (rewrite reference spans, report changed documents)
//! ```
//!
//! ## Markers
//!
//! Two grammars are built in. The bracket family is the default:
//!
//! ```text
//! // snippet[install]
//! cargo install snipsync
//! // /snippet
//!
//! <!-- insertSnippet[install] -->
//! <!-- /insertSnippet -->
//!
//! <!-- insertFile[src/main.rs] -->
//! <!-- /insertFile -->
//! ```
//!
//! The colon family repeats the id on end markers, e.g. `snippet: install`
//! and `/snippet: install`. See [`SyntaxFamily`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use snipsync_core::ScanOptions;
//! use snipsync_core::SyncOptions;
//! use snipsync_core::collect_files;
//! use snipsync_core::load_documents;
//! use snipsync_core::sync_documents;
//! use snipsync_core::write_changes;
//!
//! let files = collect_files(&[PathBuf::from(".")], &ScanOptions::default()).unwrap();
//! let corpus = load_documents(&files).unwrap();
//! let result = sync_documents(corpus.into_documents(), &SyncOptions::default()).unwrap();
//!
//! if !result.is_ok() {
//! 	write_changes(&result.changes).unwrap();
//! }
//! ```

pub use config::*;
pub use document::*;
pub use engine::*;
pub use error::*;
pub use indent::*;
pub use marker::*;
pub use project::*;
pub use resolve::*;
pub use template::*;
pub use validate::*;

pub mod config;
mod document;
mod engine;
#[allow(unused_assignments)]
mod error;
mod indent;
mod marker;
pub mod project;
mod resolve;
mod template;
mod validate;

#[cfg(test)]
mod __fixtures;
