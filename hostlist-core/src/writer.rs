use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::classify::SECTION_TOKEN;

const RULE_WIDTH: usize = 60;

/// Errors that can occur while writing a host list.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to write output file.
    #[error("failed to write host list file: {0}")]
    Io(#[from] std::io::Error),
}

/// One host line pair inside a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub name: String,
    pub ip: String,
}

/// A titled run of hosts, written under one boxed header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostGroup {
    pub title: String,
    pub hosts: Vec<HostEntry>,
}

/// Serialize groups into host-list text. Empty groups are skipped.
///
/// The header line re-parses as a section header whose title is the group
/// title, so a written file carries its grouping back in as context.
pub fn write(groups: &[HostGroup]) -> String {
    let rule = "#".repeat(RULE_WIDTH);
    let mut out = String::new();

    for group in groups.iter().filter(|g| !g.hosts.is_empty()) {
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "#  {SECTION_TOKEN}  |  {}  |  {} equipamento(s)\n",
            group.title,
            group.hosts.len()
        ));
        out.push_str(&rule);
        out.push('\n');

        for host in &group.hosts {
            out.push_str(&format!("host {} {{\n", host.name));
            out.push_str("hardware ethernet;\n");
            out.push_str(&format!("fixed-address {};\n", host.ip));
            out.push_str("}\n");
        }
        out.push('\n');
    }

    out
}

/// Serialize groups and write them to `path`.
pub fn write_file(groups: &[HostGroup], path: &Path) -> Result<(), WriteError> {
    fs::write(path, write(groups))?;
    Ok(())
}
