//! The patch data model: chunks, actions, patches, commits, and snapshots.
//!
//! Everything here is a plain value. Nothing in this module touches the
//! filesystem or does any parsing; it only describes the shapes the rest of
//! the crate passes around.

use std::collections::HashMap;
use std::path::PathBuf;

/// A single contiguous edit inside a file.
///
/// `orig_index` is the zero-based line position in the *original* file
/// where the chunk starts. At least one of `del_lines`/`ins_lines` is
/// non-empty; an all-context chunk is never emitted by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub orig_index: usize,
    pub del_lines: Vec<String>,
    pub ins_lines: Vec<String>,
}

/// What to do with one file, as parsed from a patch section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchAction {
    Add { new_file: String },
    Delete,
    Update {
        chunks: Vec<Chunk>,
        move_path: Option<PathBuf>,
    },
}

/// A parsed patch: one action per referenced file, in section order.
///
/// Order matters (it governs the order mutations are later applied in), and
/// duplicate paths are rejected at insertion time, so this is a `Vec` of
/// pairs rather than a `HashMap` — pulling in `indexmap` for one ordered map
/// would be adding a dependency the teacher crate never needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    actions: Vec<(PathBuf, PatchAction)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `path` already has an action (duplicate-path check).
    pub fn contains(&self, path: &std::path::Path) -> bool {
        self.actions.iter().any(|(p, _)| p == path)
    }

    pub fn insert(&mut self, path: PathBuf, action: PatchAction) {
        self.actions.push((path, action));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &PatchAction)> {
        self.actions.iter().map(|(p, a)| (p, a))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// A single file mutation, computed by the planner but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Delete { old: String },
    Add { new: String },
    Update {
        old: String,
        new: String,
        move_path: Option<PathBuf>,
    },
}

/// The planner's output: an ordered list of filesystem mutations.
///
/// A pure value — no side effects have occurred yet. Order mirrors `Patch`'s
/// section order, which the driver then applies front-to-back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    changes: Vec<(PathBuf, FileChange)>,
}

impl Commit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: PathBuf, change: FileChange) {
        self.changes.push((path, change));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &FileChange)> {
        self.changes.iter().map(|(p, c)| (p, c))
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// The immutable, read-through view of original file contents, loaded once
/// at driver entry. Lookup-heavy and never iterated in a meaningful order,
/// unlike `Patch`/`Commit`, so a `HashMap` is the right shape here.
pub type FileSnapshot = HashMap<PathBuf, String>;

/// Splits file content into its line model: split on `\n`, no trailing-
/// newline magic. A file ending in `\n` yields a trailing empty line, which
/// is a real element and may appear in chunks.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

/// Joins a line model back into file content. Inverse of [`split_lines`].
pub fn join_lines(lines: &[String]) -> String {
    lines.join("\n")
}
