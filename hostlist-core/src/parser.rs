use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::assembler::{AssemblerState, HostBlockDraft, Step};
use crate::classify::{classify_line, split_statements, LineKind};
use crate::context::ParseContext;

/// Errors that can occur while reading a host list.
///
/// Structural defects (unclosed blocks, blocks without an address) are not
/// errors; those blocks are dropped and counted in [`ParseStats`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input was empty or contained only whitespace.
    #[error("host list is empty")]
    Empty,
    /// Input bytes were not valid UTF-8.
    #[error("host list is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// Failed to read input file.
    #[error("failed to read host list file: {0}")]
    Io(#[from] std::io::Error),
}

/// Counters for one parse run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Physical lines scanned.
    pub lines: usize,
    pub blocks_opened: usize,
    pub emitted: usize,
    pub dropped: usize,
}

/// Finished drafts in input order plus run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostList {
    pub hosts: Vec<HostBlockDraft>,
    pub stats: ParseStats,
}

/// Parse host-list text into drafts.
pub fn parse(text: &str) -> Result<HostList, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut ctx = ParseContext::default();
    let mut state = AssemblerState::Idle;
    let mut out = HostList::default();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        out.stats.lines = line_no;
        for statement in split_statements(raw) {
            let kind = classify_line(statement);
            ctx.observe(&kind);
            if matches!(kind, LineKind::BlockOpen { .. }) {
                out.stats.blocks_opened += 1;
            }
            let step = state.step(&kind, &ctx, line_no);
            state = collect(&mut out, step);
        }
    }

    let step = state.finish(out.stats.lines);
    collect(&mut out, step);
    Ok(out)
}

/// Parse a host-list file.
pub fn parse_file(path: &Path) -> Result<HostList, ParseError> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes)?;
    parse(&text)
}

/// Classify every logical statement of `text`, with 1-based line numbers.
pub fn classify_all(text: &str) -> Vec<(usize, String, LineKind)> {
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        for statement in split_statements(raw) {
            out.push((idx + 1, statement.to_string(), classify_line(statement)));
        }
    }
    out
}

fn collect(out: &mut HostList, step: Step) -> AssemblerState {
    if let Some(draft) = step.emitted {
        out.stats.emitted += 1;
        out.hosts.push(draft);
    }
    if let Some(draft) = step.dropped {
        debug!(
            host = %draft.name,
            start_line = draft.start_line,
            end_line = draft.end_line,
            "dropping host block without fixed-address"
        );
        out.stats.dropped += 1;
    }
    step.state
}
