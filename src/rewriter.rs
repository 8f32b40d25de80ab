//! The File Rewriter: applies a file's ordered chunks to its original line
//! vector to produce a new line vector.

use crate::error::DiffError;
use crate::model::Chunk;

/// Walks a cursor across `lines`, emitting unmodified spans verbatim and
/// splicing in each chunk's insertions in place of its deletions.
///
/// `chunks` must be ordered with non-decreasing `orig_index`, each satisfying
/// `orig_index <= lines.len()`; violations are an internal invariant error,
/// not a user-facing parse failure (the parser is responsible for producing
/// well-ordered chunks via the Context Locator's monotonic cursor).
pub fn rewrite(lines: &[String], chunks: &[Chunk]) -> Result<Vec<String>, DiffError> {
    let mut dest = Vec::new();
    let mut cursor = 0usize;

    for chunk in chunks {
        if chunk.orig_index > lines.len() {
            return Err(DiffError::Internal(format!(
                "chunk.orig_index {} > len(lines) {}",
                chunk.orig_index,
                lines.len()
            )));
        }
        if cursor > chunk.orig_index {
            return Err(DiffError::Internal(format!(
                "orig_index {} > chunk.orig_index {}",
                cursor, chunk.orig_index
            )));
        }

        dest.extend_from_slice(&lines[cursor..chunk.orig_index]);
        dest.extend(chunk.ins_lines.iter().cloned());
        cursor = chunk.orig_index + chunk.del_lines.len();
    }

    dest.extend_from_slice(&lines[cursor..]);
    Ok(dest)
}
