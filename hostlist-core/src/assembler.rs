//! Host block state machine.
//!
//! The assembler is either [`AssemblerState::Idle`] or holding one open
//! draft. Every transition returns the next state plus whatever draft the
//! transition finished, so the flush-on-reopen and flush-on-EOF rules can be
//! exercised without the rest of the parser.

use serde::Serialize;

use crate::classify::LineKind;
use crate::context::ParseContext;

/// One host block under construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostBlockDraft {
    pub name: String,
    pub ip: Option<String>,
    /// Never filled from the dialect; exists for callers that learn the MAC
    /// out of band.
    pub mac: Option<String>,
    /// Section in force when the block opened.
    pub section: Option<String>,
    /// Seal in force when the block opened.
    pub seal_id: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
}

impl HostBlockDraft {
    fn open(name: &str, ctx: &ParseContext, line: usize) -> Self {
        Self {
            name: name.to_string(),
            ip: None,
            mac: None,
            section: ctx.section.clone(),
            seal_id: ctx.seal_id.clone(),
            start_line: line,
            end_line: line,
        }
    }

    /// A draft is emitted only when it carries a non-empty address.
    pub fn is_complete(&self) -> bool {
        self.ip.as_deref().is_some_and(|ip| !ip.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssemblerState {
    #[default]
    Idle,
    Open(HostBlockDraft),
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: AssemblerState,
    /// Draft finished by this transition and complete enough to keep.
    pub emitted: Option<HostBlockDraft>,
    /// Draft finished by this transition but discarded for lack of address.
    pub dropped: Option<HostBlockDraft>,
}

impl Step {
    fn stay(state: AssemblerState) -> Self {
        Self {
            state,
            emitted: None,
            dropped: None,
        }
    }

    fn closing(state: AssemblerState, mut finished: HostBlockDraft, line: usize) -> Self {
        finished.end_line = line;
        if finished.is_complete() {
            Self {
                state,
                emitted: Some(finished),
                dropped: None,
            }
        } else {
            Self {
                state,
                emitted: None,
                dropped: Some(finished),
            }
        }
    }
}

impl AssemblerState {
    /// Consume one classified line.
    ///
    /// `ctx` must already reflect the line (the parser observes before
    /// stepping), which keeps context changes forward-only for open blocks:
    /// a draft copies the context once, at open time.
    pub fn step(self, kind: &LineKind, ctx: &ParseContext, line: usize) -> Step {
        match (self, kind) {
            (Self::Idle, LineKind::BlockOpen { name }) => {
                Step::stay(Self::Open(HostBlockDraft::open(name, ctx, line)))
            }
            (Self::Open(previous), LineKind::BlockOpen { name }) => {
                // Previous block never closed.
                let next = Self::Open(HostBlockDraft::open(name, ctx, line));
                Step::closing(next, previous, line)
            }
            (Self::Open(mut draft), LineKind::Address { ip }) => {
                draft.ip = Some(ip.clone());
                draft.end_line = line;
                Step::stay(Self::Open(draft))
            }
            (Self::Open(draft), LineKind::BlockClose) => Step::closing(Self::Idle, draft, line),
            (state, _) => Step::stay(state),
        }
    }

    /// End of input: flush whatever block is still open.
    pub fn finish(self, line: usize) -> Step {
        match self {
            Self::Idle => Step::stay(Self::Idle),
            Self::Open(draft) => Step::closing(Self::Idle, draft, line),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{AssemblerState, HostBlockDraft};
    use crate::classify::LineKind;
    use crate::context::ParseContext;

    fn open(name: &str) -> LineKind {
        LineKind::BlockOpen {
            name: name.to_string(),
        }
    }

    fn addr(ip: &str) -> LineKind {
        LineKind::Address { ip: ip.to_string() }
    }

    #[test]
    fn close_with_address_emits() {
        let ctx = ParseContext {
            section: Some("SALC".to_string()),
            seal_id: Some("9".to_string()),
        };
        let step = AssemblerState::Idle.step(&open("pc1"), &ctx, 1);
        assert!(step.state.is_open());
        let step = step.state.step(&addr("10.0.0.1"), &ctx, 2);
        let step = step.state.step(&LineKind::BlockClose, &ctx, 3);

        assert_eq!(step.state, AssemblerState::Idle);
        assert_eq!(
            step.emitted,
            Some(HostBlockDraft {
                name: "pc1".to_string(),
                ip: Some("10.0.0.1".to_string()),
                mac: None,
                section: Some("SALC".to_string()),
                seal_id: Some("9".to_string()),
                start_line: 1,
                end_line: 3,
            })
        );
    }

    #[test]
    fn close_without_address_drops() {
        let ctx = ParseContext::default();
        let step = AssemblerState::Idle.step(&open("pc1"), &ctx, 1);
        let step = step.state.step(&LineKind::BlockClose, &ctx, 2);
        assert!(step.emitted.is_none());
        assert_eq!(step.dropped.map(|d| d.name), Some("pc1".to_string()));
    }

    #[test]
    fn reopen_flushes_previous_block() {
        let ctx = ParseContext::default();
        let step = AssemblerState::Idle.step(&open("a"), &ctx, 1);
        let step = step.state.step(&addr("1.1.1.1"), &ctx, 1);
        let step = step.state.step(&open("b"), &ctx, 2);

        assert_eq!(step.emitted.map(|d| d.name), Some("a".to_string()));
        match step.state {
            AssemblerState::Open(draft) => {
                assert_eq!(draft.name, "b");
                assert!(draft.ip.is_none());
            }
            AssemblerState::Idle => panic!("expected an open block"),
        }
    }

    #[test]
    fn finish_flushes_or_drops() {
        let ctx = ParseContext::default();
        let step = AssemblerState::Idle.step(&open("a"), &ctx, 1);
        let step = step.state.step(&addr("1.1.1.1"), &ctx, 2);
        let done = step.state.finish(2);
        assert_eq!(done.emitted.map(|d| d.end_line), Some(2));

        let step = AssemblerState::Idle.step(&open("b"), &ctx, 1);
        let done = step.state.finish(1);
        assert!(done.emitted.is_none());
        assert!(done.dropped.is_some());

        let done = AssemblerState::Idle.finish(5);
        assert!(done.emitted.is_none() && done.dropped.is_none());
    }

    #[test]
    fn idle_ignores_addresses_and_closes() {
        let ctx = ParseContext::default();
        let step = AssemblerState::Idle.step(&addr("1.1.1.1"), &ctx, 1);
        let step = step.state.step(&LineKind::BlockClose, &ctx, 2);
        assert_eq!(step.state, AssemblerState::Idle);
        assert!(step.emitted.is_none() && step.dropped.is_none());
    }

    #[test]
    fn later_address_overwrites_earlier() {
        let ctx = ParseContext::default();
        let step = AssemblerState::Idle.step(&open("a"), &ctx, 1);
        let step = step.state.step(&addr("1.1.1.1"), &ctx, 2);
        let step = step.state.step(&addr("1.1.1.2"), &ctx, 3);
        let step = step.state.step(&LineKind::BlockClose, &ctx, 4);
        assert_eq!(
            step.emitted.and_then(|d| d.ip),
            Some("1.1.1.2".to_string())
        );
    }
}
