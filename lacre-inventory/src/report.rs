use colored::Colorize;
use hostlist_core::{LineKind, ParseStats};

use crate::conflicts::{ConflictGroup, ResolutionError};
use crate::csv_import::CsvImportSummary;
use crate::equipment::{Equipment, EquipmentRecord};

/// Render conflict groups for terminal output.
pub fn render_conflicts_text(groups: &[ConflictGroup]) -> String {
    let mut out = Vec::new();
    out.push(format!("conflicts groups={}", groups.len()).cyan().to_string());
    if groups.is_empty() {
        out.push("- none".to_string());
        return out.join("\n");
    }

    for group in groups {
        out.push(
            format!(
                "! {}={} members={} problems=[{}]",
                group.key_type,
                group.value,
                group.members.len(),
                group.problem_labels().join(", ")
            )
            .yellow()
            .to_string(),
        );
        for member in &group.members {
            out.push(format!("  - {}", render_member(member)));
        }
    }
    out.join("\n")
}

fn render_member(item: &Equipment) -> String {
    format!("{} {}", item.id, render_record(&item.record))
}

fn render_record(r: &EquipmentRecord) -> String {
    let mut line = format!(
        "name=\"{}\" ip={} mac={} seal={} section=\"{}\" responsible=\"{}\"",
        r.name,
        r.ip,
        r.mac,
        if r.seal.is_empty() { "-" } else { r.seal.as_str() },
        r.section,
        r.responsible
    );
    if let Some(context) = &r.context_section {
        line.push_str(&format!(" context=\"{context}\""));
    }
    line
}

/// Render one line per stored record.
pub fn render_equipment(items: &[Equipment]) -> String {
    items
        .iter()
        .map(render_member)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one line per record not yet stored.
pub fn render_records(records: &[EquipmentRecord]) -> String {
    records
        .iter()
        .map(|r| format!("- {}", render_record(r)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_parse_stats(stats: &ParseStats) -> String {
    format!(
        "parse lines={} blocks={} emitted={} dropped={}",
        stats.lines, stats.blocks_opened, stats.emitted, stats.dropped
    )
}

pub fn render_csv_summary(summary: &CsvImportSummary) -> String {
    format!(
        "csv_import imported={} duplicates={} malformed={}",
        summary.imported, summary.duplicates, summary.malformed
    )
}

/// Render classified statements, one per line.
pub fn render_classified(rows: &[(usize, String, LineKind)]) -> String {
    rows.iter()
        .map(|(line, text, kind)| {
            let detail = match kind {
                LineKind::SectionHeader { title } => format!(" title=\"{title}\""),
                LineKind::SealMarker { seal } => format!(" seal={seal}"),
                LineKind::BlockOpen { name } => format!(" name=\"{name}\""),
                LineKind::Address { ip } => format!(" ip={ip}"),
                _ => String::new(),
            };
            let tag = format!("{:<7}", kind.tag());
            let tag = match kind {
                LineKind::SectionHeader { .. } | LineKind::SealMarker { .. } => tag.cyan(),
                LineKind::BlockOpen { .. } | LineKind::BlockClose => tag.green(),
                LineKind::Address { .. } => tag.yellow(),
                _ => tag.dimmed(),
            };
            format!("{line:>5} {tag}{detail}  | {text}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a gate rejection with one line per surviving collision.
pub fn render_rejection(err: &ResolutionError) -> String {
    match err {
        ResolutionError::StillConflicting(rows) => {
            let mut out = vec!["resolve rejected".red().to_string()];
            for row in rows {
                out.push(format!("- {row}"));
            }
            out.join("\n")
        }
        other => format!("{} {other}", "resolve rejected:".red()),
    }
}
