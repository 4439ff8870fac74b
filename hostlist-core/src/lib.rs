//! Reading and writing ISC-dhcpd style host lists.
//!
//! The dialect is the subset of `dhcpd.conf` found in hand-maintained
//! equipment lists: `host <name> { ... }` blocks with a `fixed-address`
//! attribute, plus two comment conventions. A comment containing `FAIXAS`
//! names the section for the blocks that follow it, and `#LACRE = <digits>`
//! sets the tamper-seal number.
//!
//! Parsing is a fold over classified statements: [`classify`] tags each
//! statement, [`context`] tracks the section and seal in force, and
//! [`assembler`] turns open/attribute/close statements into
//! [`HostBlockDraft`]s. [`writer`] emits the same dialect.

pub mod assembler;
pub mod classify;
pub mod context;
pub mod parser;
pub mod writer;

pub use assembler::{AssemblerState, HostBlockDraft, Step};
pub use classify::{classify_line, is_dotted_quad, split_statements, LineKind};
pub use context::ParseContext;
pub use parser::{classify_all, parse, parse_file, HostList, ParseError, ParseStats};
pub use writer::{write, write_file, HostEntry, HostGroup, WriteError};
