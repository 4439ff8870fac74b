//! Bulk CSV import and export.
//!
//! Six columns: name, ip, mac, seal, section, responsible. Cells may be
//! wrapped in double quotes, with `""` standing for a literal quote. The
//! first line is a header.
//!
//! Rows are split on line breaks before quotes are considered. A quoted
//! cell holding a newline breaks its row in two and each half is read as a
//! row of its own.

use serde::Serialize;
use tracing::debug;

use crate::equipment::{
    Equipment, EquipmentRecord, NO_RESPONSIBLE, NO_SECTION, PLACEHOLDER_MAC,
};
use crate::store::{RecordStore, StoreError};

pub const CSV_HEADER: [&str; 6] = ["name", "ip", "mac", "seal", "section", "responsible"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CsvImportSummary {
    pub imported: usize,
    /// Rows whose IP or MAC already exists in the store.
    pub duplicates: usize,
    /// Rows with fewer than six columns.
    pub malformed: usize,
}

/// Split one CSV line into unquoted cell values.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    quoted = false;
                }
            }
            '"' if cell.trim().is_empty() => {
                cell.clear();
                quoted = true;
            }
            ',' if !quoted => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(ch),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

/// Import CSV rows into `store`.
///
/// Malformed and duplicate rows are counted and skipped; only store failures
/// abort the run.
pub fn import_csv(text: &str, store: &mut dyn RecordStore) -> Result<CsvImportSummary, StoreError> {
    let mut summary = CsvImportSummary::default();
    let mut existing = store.list();

    for (idx, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let cells = split_csv_line(line);
        let Some(record) = record_from_cells(&cells) else {
            debug!(line = idx + 1, columns = cells.len(), "skipping malformed csv row");
            summary.malformed += 1;
            continue;
        };
        if is_duplicate(&existing, &record) {
            debug!(line = idx + 1, ip = %record.ip, "skipping duplicate csv row");
            summary.duplicates += 1;
            continue;
        }
        existing.push(store.add(record)?);
        summary.imported += 1;
    }

    Ok(summary)
}

fn record_from_cells(cells: &[String]) -> Option<EquipmentRecord> {
    let [name, ip, mac, seal, section, responsible, ..] = cells else {
        return None;
    };
    Some(EquipmentRecord {
        name: name.clone(),
        ip: ip.clone(),
        mac: or_default(mac, PLACEHOLDER_MAC),
        seal: seal.clone(),
        section: or_default(section, NO_SECTION),
        responsible: or_default(responsible, NO_RESPONSIBLE),
        category: None,
        context_section: None,
    })
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn is_duplicate(existing: &[Equipment], record: &EquipmentRecord) -> bool {
    existing.iter().any(|item| {
        (!record.ip.is_empty() && item.record.ip == record.ip)
            || (record.has_real_mac()
                && item.record.has_real_mac()
                && item.record.mac.eq_ignore_ascii_case(&record.mac))
    })
}

/// Render the collection as CSV with a header line.
pub fn write_csv(items: &[Equipment]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push('\n');
    for item in items {
        let r = &item.record;
        let row = [&r.name, &r.ip, &r.mac, &r.seal, &r.section, &r.responsible]
            .iter()
            .map(|cell| quote(cell))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
