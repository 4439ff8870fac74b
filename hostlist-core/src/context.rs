use serde::Serialize;

use crate::classify::LineKind;

/// Section and seal currently in force while scanning a host list.
///
/// Values persist until a later comment overwrites them and are read, never
/// reset, when a block opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseContext {
    pub section: Option<String>,
    pub seal_id: Option<String>,
}

impl ParseContext {
    /// Apply a classified line. Only section headers and seal markers change
    /// the context.
    pub fn observe(&mut self, kind: &LineKind) {
        match kind {
            LineKind::SectionHeader { title } => self.section = Some(title.clone()),
            LineKind::SealMarker { seal } => self.seal_id = Some(seal.clone()),
            _ => {}
        }
    }
}
