//! The Hunk Scanner: reads one contiguous run of ` `/`-`/`+` lines into a
//! structured list of edit chunks plus the reconstructed old-side context.

use crate::error::DiffError;
use crate::model::Chunk;

/// Prefixes (after trimming their own trailing space) that end a hunk run.
/// Preserved byte-for-byte per `spec.md`'s open question: a bare
/// `*** Update File` with no path still matches this list and later
/// surfaces as `Unknown Line` one level up, which is intentional.
const SECTION_TERMINATOR_PREFIXES: &[&str] = &[
    "@@",
    "*** End Patch",
    "*** Update File:",
    "*** Delete File:",
    "*** Add File:",
    "*** End of File",
];

const END_OF_FILE_MARKER: &str = "*** End of File";

fn is_section_terminator(line: &str) -> bool {
    line == "***" || SECTION_TERMINATOR_PREFIXES.iter().any(|p| line.starts_with(p))
}

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
enum Mode {
    Keep,
    Add,
    Delete,
}

/// The result of scanning one section: the reconstructed old-side context,
/// the chunks found within it, the cursor just past the consumed lines, and
/// whether the section's terminator was `*** End of File`.
pub struct ScanResult {
    pub context: Vec<String>,
    pub chunks: Vec<Chunk>,
    pub cursor: usize,
    pub eof: bool,
}

/// Reads the patch stream from `lines[start..]` until the next section
/// terminator, classifying each line by its first byte and splitting chunks
/// whenever the mode returns to `Keep` after having been `Add` or `Delete`.
pub fn scan_hunk(lines: &[String], start: usize) -> Result<ScanResult, DiffError> {
    let mut index = start;
    let mut old: Vec<String> = Vec::new();
    let mut del_lines: Vec<String> = Vec::new();
    let mut ins_lines: Vec<String> = Vec::new();
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut mode = Mode::Keep;

    while index < lines.len() {
        let s = &lines[index];
        if is_section_terminator(s) {
            break;
        }
        if s.starts_with("***") {
            return Err(DiffError::InvalidLine { line: s.clone() });
        }

        index += 1;
        let last_mode = mode;
        let (new_mode, payload): (Mode, &str) = if let Some(rest) = s.strip_prefix('+') {
            (Mode::Add, rest)
        } else if let Some(rest) = s.strip_prefix('-') {
            (Mode::Delete, rest)
        } else if let Some(rest) = s.strip_prefix(' ') {
            (Mode::Keep, rest)
        } else {
            // Tolerate a missing leading space: treat the whole line as kept.
            (Mode::Keep, s.as_str())
        };
        mode = new_mode;

        if mode == Mode::Keep && last_mode != mode && (!ins_lines.is_empty() || !del_lines.is_empty()) {
            chunks.push(Chunk {
                orig_index: old.len() - del_lines.len(),
                del_lines: std::mem::take(&mut del_lines),
                ins_lines: std::mem::take(&mut ins_lines),
            });
        }

        match mode {
            Mode::Delete => {
                del_lines.push(payload.to_string());
                old.push(payload.to_string());
            }
            Mode::Add => ins_lines.push(payload.to_string()),
            Mode::Keep => old.push(payload.to_string()),
        }
    }

    if !ins_lines.is_empty() || !del_lines.is_empty() {
        chunks.push(Chunk {
            orig_index: old.len() - del_lines.len(),
            del_lines,
            ins_lines,
        });
    }

    if index < lines.len() && lines[index] == END_OF_FILE_MARKER {
        index += 1;
        return Ok(ScanResult {
            context: old,
            chunks,
            cursor: index,
            eof: true,
        });
    }

    Ok(ScanResult {
        context: old,
        chunks,
        cursor: index,
        eof: false,
    })
}
