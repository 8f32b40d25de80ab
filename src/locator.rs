//! The Context Locator: finds a slice of target lines under three tolerance
//! levels, with EOF-anchored retry.

use crate::canon::canon;
use log::{debug, trace};

/// The result of a context search: `index` is `None` when the context could
/// not be found at all; `fuzz` accumulates tolerance cost (0 exact, 1
/// trailing-whitespace, 100 all-whitespace, plus 10000 if an EOF anchor was
/// honored only in spirit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateResult {
    pub index: Option<usize>,
    pub fuzz: u32,
}

/// Three-pass tolerant search for `context` within `lines`, scanning
/// `i in [start, len(lines) - len(context)]` in order and returning the
/// first hit of the first pass that matches at all.
fn find_context_core(lines: &[String], context: &[String], start: usize) -> LocateResult {
    if context.is_empty() {
        return LocateResult {
            index: Some(start),
            fuzz: 0,
        };
    }
    if context.len() > lines.len() {
        return LocateResult {
            index: None,
            fuzz: 0,
        };
    }
    let last_start = lines.len() - context.len();
    if start > last_start {
        return LocateResult {
            index: None,
            fuzz: 0,
        };
    }

    // Pass 1: exact match after canonicalization.
    let canonical_context = canon(&context.join("\n"));
    for i in start..=last_start {
        let segment = canon(&lines[i..i + context.len()].join("\n"));
        if segment == canonical_context {
            trace!("    locator: exact match at {i}");
            return LocateResult {
                index: Some(i),
                fuzz: 0,
            };
        }
    }

    // Pass 2: ignore trailing whitespace per line.
    let ctx_rstrip = canon(
        &context
            .iter()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n"),
    );
    for i in start..=last_start {
        let segment = canon(
            &lines[i..i + context.len()]
                .iter()
                .map(|l| l.trim_end())
                .collect::<Vec<_>>()
                .join("\n"),
        );
        if segment == ctx_rstrip {
            trace!("    locator: trailing-whitespace-tolerant match at {i}");
            return LocateResult {
                index: Some(i),
                fuzz: 1,
            };
        }
    }

    // Pass 3: ignore all surrounding whitespace per line.
    let ctx_strip = canon(
        &context
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join("\n"),
    );
    for i in start..=last_start {
        let segment = canon(
            &lines[i..i + context.len()]
                .iter()
                .map(|l| l.trim())
                .collect::<Vec<_>>()
                .join("\n"),
        );
        if segment == ctx_strip {
            trace!("    locator: all-whitespace-tolerant match at {i}");
            return LocateResult {
                index: Some(i),
                fuzz: 100,
            };
        }
    }

    debug!("    locator: no match for context of {} line(s)", context.len());
    LocateResult {
        index: None,
        fuzz: 0,
    }
}

/// [`find_context_core`] with EOF handling: when `eof` is true, first tries
/// a match pinned at `len(lines) - len(context)`; if that fails, retries
/// from `start` and adds `10000` fuzz to signal the anchor was honored only
/// in spirit, not in position.
pub fn locate(lines: &[String], context: &[String], start: usize, eof: bool) -> LocateResult {
    if !eof {
        return find_context_core(lines, context, start);
    }
    if context.len() <= lines.len() {
        let pinned_start = lines.len() - context.len();
        let result = find_context_core(lines, context, pinned_start);
        if result.index.is_some() {
            return result;
        }
    }
    let result = find_context_core(lines, context, start);
    LocateResult {
        index: result.index,
        fuzz: result.fuzz + 10000,
    }
}
