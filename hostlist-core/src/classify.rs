//! Line classification for the host-list dialect.
//!
//! The dialect is line oriented but tolerates several statements on one
//! physical line (`host A { fixed-address 10.0.0.5; }`). [`split_statements`]
//! breaks a physical line into logical statements and [`classify_line`] tags
//! each one.

use serde::Serialize;

/// Token that marks a comment line as a section header.
pub const SECTION_TOKEN: &str = "FAIXAS";
/// Prefix of a seal-range comment (after the leading `#`).
pub const SEAL_TOKEN: &str = "LACRE";
/// Attribute carrying the host IPv4 address.
pub const FIXED_ADDRESS: &str = "fixed-address";

/// Classification of one logical line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineKind {
    Blank,
    Comment,
    /// Comment containing `FAIXAS` with a `|title|` payload.
    SectionHeader { title: String },
    /// `#LACRE = <digits>` comment; only the first digit run is kept.
    SealMarker { seal: String },
    /// `host <name> {`
    BlockOpen { name: String },
    /// `fixed-address <a.b.c.d>;`
    Address { ip: String },
    BlockClose,
    Other,
}

impl LineKind {
    /// Short tag used by inspection output.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Comment => "comment",
            Self::SectionHeader { .. } => "section",
            Self::SealMarker { .. } => "seal",
            Self::BlockOpen { .. } => "open",
            Self::Address { .. } => "address",
            Self::BlockClose => "close",
            Self::Other => "other",
        }
    }
}

/// Split a physical line into logical statements.
///
/// Boundaries are `{` and `;` (kept at the end of the statement) and `}`
/// (always a statement of its own). A statement starting with `host` runs to
/// the first `{` or the end of the line, so host names keep any `#`, `;` or
/// `}` they contain. A `#` at the start of a statement begins a comment that
/// runs to the end of the line. Whitespace-only pieces are dropped; a blank
/// line yields a single empty statement so callers still see it.
pub fn split_statements(line: &str) -> Vec<&str> {
    if line.trim().is_empty() {
        return vec![""];
    }

    let mut out = Vec::new();
    let mut start = 0;
    let mut idx = 0;
    while let Some(ch) = line[idx..].chars().next() {
        if line[start..idx].trim().is_empty() {
            if ch == '#' {
                push_piece(&mut out, &line[idx..]);
                return out;
            }
            if opens_block(&line[idx..]) {
                let end = line[idx..]
                    .find('{')
                    .map_or(line.len(), |pos| idx + pos + 1);
                push_piece(&mut out, &line[idx..end]);
                start = end;
                idx = end;
                continue;
            }
        }

        let next = idx + ch.len_utf8();
        match ch {
            '{' | ';' => {
                push_piece(&mut out, &line[start..next]);
                start = next;
            }
            '}' => {
                push_piece(&mut out, &line[start..idx]);
                push_piece(&mut out, "}");
                start = next;
            }
            _ => {}
        }
        idx = next;
    }
    push_piece(&mut out, &line[start..]);
    out
}

fn opens_block(rest: &str) -> bool {
    rest.strip_prefix("host")
        .is_some_and(|tail| tail.starts_with(char::is_whitespace))
}

fn push_piece<'a>(out: &mut Vec<&'a str>, piece: &'a str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        out.push(trimmed);
    }
}

/// Classify one logical line.
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    if let Some(body) = trimmed.strip_prefix('#') {
        if let Some(seal) = seal_value(body) {
            return LineKind::SealMarker { seal };
        }
        if let Some(title) = section_title(body) {
            return LineKind::SectionHeader { title };
        }
        return LineKind::Comment;
    }

    if trimmed == "}" {
        return LineKind::BlockClose;
    }

    if let Some(name) = host_name(trimmed) {
        return LineKind::BlockOpen { name };
    }

    if let Some(ip) = fixed_address(trimmed) {
        return LineKind::Address { ip };
    }

    LineKind::Other
}

fn section_title(body: &str) -> Option<String> {
    if !body.contains(SECTION_TOKEN) {
        return None;
    }
    let (_, rest) = body.split_once('|')?;
    let (title, _) = rest.split_once('|')?;
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn seal_value(body: &str) -> Option<String> {
    let rest = body.trim_start().strip_prefix(SEAL_TOKEN)?;
    let rest = rest.trim_start().strip_prefix('=')?;
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    (!digits.is_empty()).then_some(digits)
}

fn host_name(line: &str) -> Option<String> {
    let rest = line.strip_prefix("host")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name = match rest.split_once('{') {
        Some((name, _)) => name,
        None => rest,
    }
    .trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn fixed_address(line: &str) -> Option<String> {
    let (_, rest) = line.split_once(FIXED_ADDRESS)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let (candidate, _) = rest.split_once(';')?;
    let candidate = candidate.trim();
    is_dotted_quad(candidate).then(|| candidate.to_string())
}

/// True for four dot-separated groups of one to three digits, each <= 255.
///
/// Leading zeros are accepted since hand-edited legacy files carry them.
pub fn is_dotted_quad(value: &str) -> bool {
    let parts: Vec<&str> = value.split('.').collect();
    parts.len() == 4
        && parts.iter().all(|part| {
            (1..=3).contains(&part.len())
                && part.bytes().all(|b| b.is_ascii_digit())
                && part.parse::<u16>().is_ok_and(|n| n <= 255)
        })
}
