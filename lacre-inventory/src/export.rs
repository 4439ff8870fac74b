//! Host-list generation from equipment records.
//!
//! Records are grouped by `section` and written through
//! [`hostlist_core::write`]. The dialect has no MAC slot, so `mac` is never
//! written and a re-import resets it to the placeholder.

use hostlist_core::{HostEntry, HostGroup};

use crate::equipment::EquipmentRecord;

/// Group records by section. Groups appear in first-seen order and members
/// keep their input order.
pub fn group_by_section<'a, I>(records: I) -> Vec<HostGroup>
where
    I: IntoIterator<Item = &'a EquipmentRecord>,
{
    let mut groups: Vec<HostGroup> = Vec::new();
    for record in records {
        let entry = HostEntry {
            name: record.name.clone(),
            ip: record.ip.clone(),
        };
        match groups.iter_mut().find(|g| g.title == record.section) {
            Some(group) => group.hosts.push(entry),
            None => groups.push(HostGroup {
                title: record.section.clone(),
                hosts: vec![entry],
            }),
        }
    }
    groups
}

/// Render records as host-list text.
pub fn generate<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a EquipmentRecord>,
{
    hostlist_core::write(&group_by_section(records))
}

#[cfg(test)]
mod tests {
    use super::{generate, group_by_section};
    use crate::equipment::EquipmentRecord;

    fn record(name: &str, ip: &str, section: &str) -> EquipmentRecord {
        EquipmentRecord {
            name: name.to_string(),
            ip: ip.to_string(),
            mac: "aa:bb:cc:dd:ee:ff".to_string(),
            seal: "1".to_string(),
            section: section.to_string(),
            responsible: "x".to_string(),
            category: None,
            context_section: None,
        }
    }

    #[test]
    fn groups_keep_first_seen_and_insertion_order() {
        let records = vec![
            record("a", "10.0.0.1", "SALC"),
            record("b", "10.0.0.2", "FUSEX"),
            record("c", "10.0.0.3", "SALC"),
        ];
        let groups = group_by_section(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].title, "SALC");
        let names: Vec<&str> = groups[0].hosts.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(groups[1].title, "FUSEX");
    }

    #[test]
    fn mac_is_never_written() {
        let records = vec![record("a", "10.0.0.1", "SALC")];
        let text = generate(&records);
        assert!(!text.contains("aa:bb:cc:dd:ee:ff"));
        assert!(text.contains("hardware ethernet;\n"));
        assert!(text.contains("|  SALC  |  1 equipamento(s)"));
    }
}
