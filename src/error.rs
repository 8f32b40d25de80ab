//! The error taxonomy: a single [`DiffError`] carrying a human-readable
//! message, with variants distinguishable by message substring (`spec.md`
//! §7) for compatibility with callers that pattern-match on diagnostic text.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DiffError {
    #[error("Patch must start with *** Begin Patch")]
    InvalidFormat,

    #[error("Missing End Patch")]
    MissingEndPatch,

    #[error("Unknown Line: {line}")]
    UnknownLine { line: String },

    #[error("Invalid Line: {line}")]
    InvalidLine { line: String },

    #[error("Duplicate Path: {path}")]
    DuplicatePath { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Missing File: {path}")]
    MissingFile { path: String },

    #[error("File already exists: {path}")]
    FileAlreadyExists { path: String },

    #[error("Invalid Context {index}:\n{context}")]
    InvalidContext { index: usize, context: String },

    #[error("Invalid EOF Context {index}:\n{context}")]
    InvalidEofContext { index: usize, context: String },

    #[error("Invalid Add File Line: {line}")]
    InvalidAddFileLine { line: String },

    /// An internal invariant violation: the rewriter was handed chunks that
    /// are not monotonically ordered, or a non-`Update` action reached it.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error for {path}: {message}")]
    Io { path: PathBuf, message: String },
}
