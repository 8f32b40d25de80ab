//! The Patch Parser: a cursor-driven recursive-descent recognizer over the
//! line-split patch text, driving the header grammar and dispatching each
//! file section to the Hunk Scanner and Context Locator.

use log::{debug, trace};
use std::path::PathBuf;

use crate::canon::canon;
use crate::error::DiffError;
use crate::locator::locate;
use crate::model::{split_lines, Chunk, FileSnapshot, Patch, PatchAction};
use crate::scanner::scan_hunk;

const UPDATE_FILE_PREFIX: &str = "*** Update File: ";
const DELETE_FILE_PREFIX: &str = "*** Delete File: ";
const ADD_FILE_PREFIX: &str = "*** Add File: ";
const MOVE_FILE_TO_PREFIX: &str = "*** Move File To: ";
const PATCH_SUFFIX: &str = "*** End Patch";
const DEFLINE_PREFIX: &str = "@@ ";

/// End-of-section prefixes for the per-file grammar rules (the same set the
/// Hunk Scanner uses to find section boundaries, plus the patch suffix).
const UPDATE_END_PREFIXES: &[&str] = &[
    PATCH_SUFFIX,
    UPDATE_FILE_PREFIX,
    DELETE_FILE_PREFIX,
    ADD_FILE_PREFIX,
    "*** End of File",
];

const ADD_END_PREFIXES: &[&str] = &[PATCH_SUFFIX, UPDATE_FILE_PREFIX, DELETE_FILE_PREFIX, ADD_FILE_PREFIX];

struct Parser<'a> {
    current_files: &'a FileSnapshot,
    lines: Vec<String>,
    index: usize,
    patch: Patch,
    fuzz: u32,
}

impl<'a> Parser<'a> {
    fn new(current_files: &'a FileSnapshot, lines: Vec<String>) -> Self {
        Self {
            current_files,
            lines,
            index: 0,
            patch: Patch::new(),
            fuzz: 0,
        }
    }

    fn is_done(&self, prefixes: &[&str]) -> bool {
        if self.index >= self.lines.len() {
            return true;
        }
        let line = &self.lines[self.index];
        prefixes.iter().any(|p| line.starts_with(p))
    }

    fn startswith(&self, prefix: &str) -> bool {
        self.index < self.lines.len() && self.lines[self.index].starts_with(prefix)
    }

    /// Reads the current line if it starts with `prefix`, advancing the
    /// cursor and returning the remainder. Mirrors the reference
    /// implementation's quirk where a matched-but-empty remainder is
    /// treated the same as a non-match by the caller (the cursor still
    /// advances; only paths with real content ever occur in practice).
    fn read_str(&mut self, prefix: &str) -> Option<String> {
        if self.index >= self.lines.len() {
            return None;
        }
        if let Some(rest) = self.lines[self.index].strip_prefix(prefix) {
            self.index += 1;
            if rest.is_empty() {
                None
            } else {
                Some(rest.to_string())
            }
        } else {
            None
        }
    }

    fn parse(&mut self) -> Result<(), DiffError> {
        while !self.is_done(&[PATCH_SUFFIX]) {
            if let Some(path) = self.read_str(UPDATE_FILE_PREFIX) {
                if self.patch.contains(std::path::Path::new(&path)) {
                    return Err(DiffError::DuplicatePath { path });
                }
                let move_to = self.read_str(MOVE_FILE_TO_PREFIX);
                let Some(text) = self.current_files.get(&PathBuf::from(&path)) else {
                    return Err(DiffError::MissingFile { path });
                };
                let text = text.clone();
                let mut action = self.parse_update_file(&text)?;
                if let Some(move_to) = move_to {
                    if let PatchAction::Update { move_path, .. } = &mut action {
                        *move_path = Some(PathBuf::from(move_to));
                    }
                }
                self.patch.insert(PathBuf::from(path), action);
                continue;
            }

            if let Some(path) = self.read_str(DELETE_FILE_PREFIX) {
                if self.patch.contains(std::path::Path::new(&path)) {
                    return Err(DiffError::DuplicatePath { path });
                }
                if !self.current_files.contains_key(&PathBuf::from(&path)) {
                    return Err(DiffError::MissingFile { path });
                }
                self.patch.insert(PathBuf::from(path), PatchAction::Delete);
                continue;
            }

            if let Some(path) = self.read_str(ADD_FILE_PREFIX) {
                if self.patch.contains(std::path::Path::new(&path)) {
                    return Err(DiffError::DuplicatePath { path });
                }
                if self.current_files.contains_key(&PathBuf::from(&path)) {
                    return Err(DiffError::FileAlreadyExists { path });
                }
                let action = self.parse_add_file()?;
                self.patch.insert(PathBuf::from(path), action);
                continue;
            }

            let line = self.lines.get(self.index).cloned().unwrap_or_default();
            return Err(DiffError::UnknownLine { line });
        }

        if !self.startswith(PATCH_SUFFIX) {
            return Err(DiffError::MissingEndPatch);
        }
        self.index += 1;
        Ok(())
    }

    fn parse_update_file(&mut self, text: &str) -> Result<PatchAction, DiffError> {
        let file_lines = split_lines(text);
        let mut index = 0usize;
        let mut chunks: Vec<Chunk> = Vec::new();

        while !self.is_done(UPDATE_END_PREFIXES) {
            let def_str = self.read_str(DEFLINE_PREFIX);
            let mut section_str = false;
            if def_str.is_none() && self.index < self.lines.len() && self.lines[self.index] == "@@" {
                section_str = true;
                self.index += 1;
            }

            if def_str.is_none() && !section_str && index != 0 {
                let line = self.lines.get(self.index).cloned().unwrap_or_default();
                return Err(DiffError::InvalidLine { line });
            }

            if let Some(def_str) = &def_str {
                if !def_str.trim().is_empty() {
                    let canonical_def = canon(def_str);
                    let mut found = false;
                    for i in index..file_lines.len() {
                        if canon(&file_lines[i]) == canonical_def {
                            index = i + 1;
                            found = true;
                            break;
                        }
                    }
                    if !found {
                        let canonical_def_trimmed = canon(def_str.trim());
                        for i in index..file_lines.len() {
                            if canon(file_lines[i].trim()) == canonical_def_trimmed {
                                index = i + 1;
                                self.fuzz += 1;
                                found = true;
                                break;
                            }
                        }
                    }
                    if !found {
                        trace!("    parser: @@ defline not found, continuing from unchanged cursor {index}");
                    }
                }
            }

            let scan = scan_hunk(&self.lines, self.index)?;
            let result = locate(&file_lines, &scan.context, index, scan.eof);
            let Some(new_index) = result.index else {
                let ctx_text = scan.context.join("\n");
                return Err(if scan.eof {
                    DiffError::InvalidEofContext {
                        index,
                        context: ctx_text,
                    }
                } else {
                    DiffError::InvalidContext {
                        index,
                        context: ctx_text,
                    }
                });
            };

            self.fuzz += result.fuzz;
            debug!("    parser: located chunk context at {new_index} (fuzz {})", result.fuzz);
            for mut ch in scan.chunks {
                ch.orig_index += new_index;
                chunks.push(ch);
            }

            index = new_index + scan.context.len();
            self.index = scan.cursor;
        }

        Ok(PatchAction::Update {
            chunks,
            move_path: None,
        })
    }

    fn parse_add_file(&mut self) -> Result<PatchAction, DiffError> {
        let mut lines = Vec::new();
        while !self.is_done(ADD_END_PREFIXES) {
            let s = self.lines[self.index].clone();
            self.index += 1;
            let Some(rest) = s.strip_prefix('+') else {
                return Err(DiffError::InvalidAddFileLine { line: s });
            };
            lines.push(rest.to_string());
        }
        Ok(PatchAction::Add {
            new_file: lines.join("\n"),
        })
    }
}

/// Parses patch `text` (the `*** Begin Patch` prefix has already been
/// confirmed by the caller, but the full text including that line is still
/// expected here, since the parser's cursor starts at index 1 to skip past
/// it) into a [`Patch`] plus the total accumulated fuzz, against `snapshot`
/// for Update/Delete lookups.
///
/// Requires the last line to be exactly `*** End Patch`, matching the
/// reference implementation's upfront `lines[-1] != PATCH_SUFFIX.strip()`
/// check. This rejects trailing content after the terminator that the
/// parser's own permissive `startswith` terminator test would otherwise miss.
pub fn parse_patch_body(text: &str, snapshot: &FileSnapshot) -> Result<(Patch, u32), DiffError> {
    let lines = split_lines(text.trim_end());
    if lines.len() < 2 || lines.last().map(String::as_str) != Some(PATCH_SUFFIX) {
        return Err(DiffError::MissingEndPatch);
    }
    let mut parser = Parser::new(snapshot, lines);
    parser.index = 1;
    parser.parse()?;
    Ok((parser.patch, parser.fuzz))
}
