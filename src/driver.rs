//! The Driver: the crate's single end-to-end entry point. Ties the patch
//! envelope check, path collection, snapshot loading, parsing, planning, and
//! backend application into one `&str -> Result<String, DiffError>` call.

use std::path::PathBuf;

use log::info;

use crate::backend::{BackendError, FileBackend};
use crate::error::DiffError;
use crate::model::{Commit, FileChange, FileSnapshot, Patch};
use crate::parser::parse_patch_body;
use crate::planner::plan;

const BEGIN_MARKER: &str = "*** Begin Patch\n";
const UPDATE_FILE_PREFIX: &str = "*** Update File: ";
const DELETE_FILE_PREFIX: &str = "*** Delete File: ";
const ADD_FILE_PREFIX: &str = "*** Add File: ";

/// Scans header lines only, collecting `Update`/`Delete` paths (files that
/// must already exist) and `Add` paths (files that must not).
fn collect_paths(text: &str) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut needed = Vec::new();
    let mut added = Vec::new();
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix(UPDATE_FILE_PREFIX) {
            needed.push(PathBuf::from(rest));
        } else if let Some(rest) = line.strip_prefix(DELETE_FILE_PREFIX) {
            needed.push(PathBuf::from(rest));
        } else if let Some(rest) = line.strip_prefix(ADD_FILE_PREFIX) {
            added.push(PathBuf::from(rest));
        }
    }
    (needed, added)
}

fn read_one(backend: &dyn FileBackend, path: &PathBuf) -> Result<(PathBuf, String), DiffError> {
    match backend.read(path) {
        Ok(text) => Ok((path.clone(), text)),
        Err(BackendError::NotFound(p)) => Err(DiffError::FileNotFound {
            path: p.display().to_string(),
        }),
        Err(other) => Err(DiffError::Io {
            path: path.clone(),
            message: other.to_string(),
        }),
    }
}

#[cfg(feature = "parallel")]
fn load_snapshot(backend: &dyn FileBackend, paths: &[PathBuf]) -> Result<FileSnapshot, DiffError> {
    use rayon::prelude::*;

    paths
        .par_iter()
        .map(|p| read_one(backend, p))
        .collect::<Result<Vec<_>, _>>()
        .map(|pairs| pairs.into_iter().collect())
}

#[cfg(not(feature = "parallel"))]
fn load_snapshot(backend: &dyn FileBackend, paths: &[PathBuf]) -> Result<FileSnapshot, DiffError> {
    paths
        .iter()
        .map(|p| read_one(backend, p))
        .collect::<Result<Vec<_>, _>>()
        .map(|pairs| pairs.into_iter().collect())
}

/// Confirms that none of `paths` already exist via `backend.read`. A
/// successful read is the error case here; `NotFound` is the expected,
/// passing outcome (mirrors the reference implementation's
/// `identify_files_added` check, which treats "read succeeded" as the
/// failure condition for an `Add File`).
fn check_add_paths_absent(backend: &dyn FileBackend, paths: &[PathBuf]) -> Result<(), DiffError> {
    for path in paths {
        match backend.read(path) {
            Ok(_) => {
                return Err(DiffError::FileAlreadyExists {
                    path: path.display().to_string(),
                })
            }
            Err(BackendError::NotFound(_)) => continue,
            Err(other) => {
                return Err(DiffError::Io {
                    path: path.clone(),
                    message: other.to_string(),
                })
            }
        }
    }
    Ok(())
}

/// Rejects an `Update + Move` whose destination already exists.
///
/// The reference implementation performs no such check; the destination is
/// silently overwritten. That is undefined behavior this crate declines to
/// reproduce: rejecting with `FileAlreadyExists` up front, before any write
/// in the commit has happened, is the safer choice and is called out as an
/// intentional deviation.
fn check_move_destinations_absent(backend: &dyn FileBackend, commit: &Commit) -> Result<(), DiffError> {
    for (_path, change) in commit.iter() {
        if let FileChange::Update {
            move_path: Some(dest), ..
        } = change
        {
            match backend.read(dest) {
                Ok(_) => {
                    return Err(DiffError::FileAlreadyExists {
                        path: dest.display().to_string(),
                    })
                }
                Err(BackendError::NotFound(_)) => continue,
                Err(other) => return Err(to_io_err(dest, other)),
            }
        }
    }
    Ok(())
}

fn to_io_err(path: &PathBuf, err: BackendError) -> DiffError {
    match err {
        BackendError::NotFound(p) => DiffError::FileNotFound {
            path: p.display().to_string(),
        },
        other => DiffError::Io {
            path: path.clone(),
            message: other.to_string(),
        },
    }
}

/// Applies `change` to `path` via `backend`, returning its receipt string.
/// For an `Update` with a `move_path`, writes the new file under the move
/// destination first and deletes the source only after the write succeeds
/// (write-then-unlink, so a crash mid-commit never loses data).
fn apply_change(backend: &dyn FileBackend, path: &PathBuf, change: &FileChange) -> Result<String, DiffError> {
    match change {
        FileChange::Delete { .. } => backend.delete(path).map_err(|e| to_io_err(path, e)),
        FileChange::Add { new } => backend.write(path, new).map_err(|e| to_io_err(path, e)),
        FileChange::Update { new, move_path, .. } => {
            let dest = move_path.as_ref().unwrap_or(path);
            let receipt = backend.write(dest, new).map_err(|e| to_io_err(dest, e))?;
            if move_path.is_some() {
                backend.delete(path).map_err(|e| to_io_err(path, e))?;
            }
            Ok(receipt)
        }
    }
}

/// Parses `text` against `snapshot` without touching any backend, returning
/// the parsed [`Patch`] and the total accumulated fuzz. Lets a caller (or a
/// future dry-run preview) inspect a patch before applying it.
pub fn parse_only(text: &str, snapshot: &FileSnapshot) -> Result<(Patch, u32), DiffError> {
    if !text.starts_with(BEGIN_MARKER) {
        return Err(DiffError::InvalidFormat);
    }
    parse_patch_body(text, snapshot)
}

/// Runs the full pipeline through planning but stops short of applying any
/// mutation. Used by the CLI's dry-run preview: the resulting [`model::Commit`]
/// carries old/new text for each file without a single `write`/`delete` call
/// reaching the backend.
pub fn plan_patch(text: &str, backend: &dyn FileBackend) -> Result<Commit, DiffError> {
    if !text.starts_with(BEGIN_MARKER) {
        return Err(DiffError::InvalidFormat);
    }

    let (needed, added) = collect_paths(text);
    let snapshot: FileSnapshot = load_snapshot(backend, &needed)?;
    check_add_paths_absent(backend, &added)?;

    let (patch, _fuzz) = parse_patch_body(text, &snapshot)?;
    let commit = plan(&patch, &snapshot)?;
    check_move_destinations_absent(backend, &commit)?;
    Ok(commit)
}

/// The end-to-end entry point: format check, path collection, snapshot load,
/// add-path existence check, parse, plan, apply via `backend`.
///
/// Returns the `\n`-joined concatenation of every mutation's receipt, in
/// commit order.
pub fn apply_patch(text: &str, backend: &dyn FileBackend) -> Result<String, DiffError> {
    if !text.starts_with(BEGIN_MARKER) {
        return Err(DiffError::InvalidFormat);
    }

    let (needed, added) = collect_paths(text);
    info!(
        "driver: {} file(s) referenced for update/delete, {} for add",
        needed.len(),
        added.len()
    );

    let snapshot: FileSnapshot = load_snapshot(backend, &needed)?;
    check_add_paths_absent(backend, &added)?;

    let (patch, fuzz) = parse_patch_body(text, &snapshot)?;
    if fuzz > 0 {
        info!("driver: parsed with accumulated fuzz {fuzz}");
    }

    let commit = plan(&patch, &snapshot)?;
    check_move_destinations_absent(backend, &commit)?;

    let mut receipts = Vec::with_capacity(commit.iter().count());
    for (path, change) in commit.iter() {
        let receipt = apply_change(backend, path, change)?;
        info!("driver: applied {path:?}: {receipt}");
        receipts.push(receipt);
    }

    Ok(receipts.join("\n"))
}
