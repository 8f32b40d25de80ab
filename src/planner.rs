//! The Planner: turns a parsed patch plus loaded originals into an ordered
//! list of filesystem mutations. A pure computation — no side effects.

use crate::error::DiffError;
use crate::model::{split_lines, Commit, FileChange, FileSnapshot, Patch, PatchAction};
use crate::rewriter::rewrite;

pub fn plan(patch: &Patch, snapshot: &FileSnapshot) -> Result<Commit, DiffError> {
    let mut commit = Commit::new();

    for (path, action) in patch.iter() {
        match action {
            PatchAction::Delete => {
                let old = snapshot.get(path).cloned().unwrap_or_default();
                commit.push(path.clone(), FileChange::Delete { old });
            }
            PatchAction::Add { new_file } => {
                commit.push(
                    path.clone(),
                    FileChange::Add {
                        new: new_file.clone(),
                    },
                );
            }
            PatchAction::Update { chunks, move_path } => {
                let old = snapshot.get(path).cloned().unwrap_or_default();
                let lines = split_lines(&old);
                let new_lines = rewrite(&lines, chunks)?;
                commit.push(
                    path.clone(),
                    FileChange::Update {
                        old,
                        new: new_lines.join("\n"),
                        move_path: move_path.clone(),
                    },
                );
            }
        }
    }

    Ok(commit)
}
