//! Duplicate IP, MAC, and seal detection.
//!
//! ## Detection Strategy
//!
//! 1. Index every record by IP, MAC, and seal
//! 2. Report each value shared by two or more records as a [`ConflictGroup`]
//! 3. Tag each group with the key types for which *every* member's own value
//!    is duplicated somewhere in the collection
//!
//! Step 3 looks at each member independently: an IP group gets the MAC tag
//! whenever each member's MAC is shared with some record, not necessarily
//! with the other members of the group. Pairs duplicated on two keys are
//! reported once per key.
//!
//! Empty values and the import placeholder MAC are not indexed, so unknown
//! data never forms a conflict. MACs compare case-insensitively.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

use crate::equipment::{Equipment, EquipmentRecord};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ValueEnum,
)]
pub enum KeyType {
    #[serde(rename = "IP")]
    Ip,
    #[serde(rename = "MAC")]
    Mac,
    #[serde(rename = "SEAL")]
    Seal,
}

impl KeyType {
    pub const ALL: [KeyType; 3] = [KeyType::Ip, KeyType::Mac, KeyType::Seal];

    /// Operator-facing problem label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ip => "IP Duplicado",
            Self::Mac => "MAC Duplicado",
            Self::Seal => "Lacre Duplicado",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ip => "IP",
            Self::Mac => "MAC",
            Self::Seal => "SEAL",
        }
    }

    /// Indexable value of this key on `record`, if any.
    pub fn value_of(self, record: &EquipmentRecord) -> Option<Cow<'_, str>> {
        match self {
            Self::Ip => self.normalize(&record.ip),
            Self::Mac if record.has_real_mac() => self.normalize(&record.mac),
            Self::Mac => None,
            Self::Seal => self.normalize(&record.seal),
        }
    }

    /// Comparable form of a raw value: trimmed, and lower-cased for MACs.
    pub fn normalize(self, raw: &str) -> Option<Cow<'_, str>> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        match self {
            Self::Mac if value.bytes().any(|b| b.is_ascii_uppercase()) => {
                Some(Cow::Owned(value.to_ascii_lowercase()))
            }
            _ => Some(Cow::Borrowed(value)),
        }
    }
}

impl Display for KeyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records sharing one key value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictGroup {
    pub key_type: KeyType,
    pub value: String,
    pub members: Vec<Equipment>,
    pub problem_types: BTreeSet<KeyType>,
}

impl ConflictGroup {
    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    pub fn problem_labels(&self) -> Vec<&'static str> {
        self.problem_types.iter().map(|k| k.label()).collect()
    }
}

/// Value -> member positions, one map per key type.
struct KeyIndex<'a> {
    maps: BTreeMap<KeyType, BTreeMap<Cow<'a, str>, Vec<usize>>>,
}

impl<'a> KeyIndex<'a> {
    fn build(collection: &'a [Equipment]) -> Self {
        let mut maps: BTreeMap<KeyType, BTreeMap<Cow<'a, str>, Vec<usize>>> = BTreeMap::new();
        for key in KeyType::ALL {
            let map = maps.entry(key).or_default();
            for (idx, item) in collection.iter().enumerate() {
                if let Some(value) = key.value_of(&item.record) {
                    map.entry(value).or_default().push(idx);
                }
            }
        }
        Self { maps }
    }

    fn is_duplicated(&self, key: KeyType, record: &EquipmentRecord) -> bool {
        key.value_of(record)
            .and_then(|value| self.maps.get(&key)?.get(value.as_ref()))
            .is_some_and(|rows| rows.len() > 1)
    }
}

/// Find every IP, MAC, and seal value shared by two or more records.
///
/// Groups are ordered by key type (IP, MAC, seal) then by value; members keep
/// collection order.
pub fn detect_conflicts(collection: &[Equipment]) -> Vec<ConflictGroup> {
    let index = KeyIndex::build(collection);

    let mut out = Vec::new();
    for (key, map) in &index.maps {
        for (value, rows) in map {
            if rows.len() < 2 {
                continue;
            }
            let members: Vec<Equipment> =
                rows.iter().map(|&idx| collection[idx].clone()).collect();
            let problem_types = KeyType::ALL
                .into_iter()
                .filter(|other| {
                    members
                        .iter()
                        .all(|m| index.is_duplicated(*other, &m.record))
                })
                .collect();
            out.push(ConflictGroup {
                key_type: *key,
                value: value.to_string(),
                members,
                problem_types,
            });
        }
    }
    tracing::debug!(
        records = collection.len(),
        groups = out.len(),
        "conflict detection finished"
    );
    out
}

/// Find the group for `(key, value)` in a fresh detection run.
pub fn find_group(collection: &[Equipment], key: KeyType, value: &str) -> Option<ConflictGroup> {
    let value = key.normalize(value)?;
    detect_conflicts(collection)
        .into_iter()
        .find(|g| g.key_type == key && g.value == value.as_ref())
}

/// Replacement values for one member's colliding fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberEdit {
    pub id: String,
    pub ip: Option<String>,
    pub mac: Option<String>,
    pub seal: Option<String>,
}

impl MemberEdit {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set one field by key type.
    pub fn set(&mut self, key: KeyType, value: impl Into<String>) {
        let value = Some(value.into());
        match key {
            KeyType::Ip => self.ip = value,
            KeyType::Mac => self.mac = value,
            KeyType::Seal => self.seal = value,
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.ip.is_none() && self.mac.is_none() && self.seal.is_none()
    }

    fn apply(&self, record: &mut EquipmentRecord) {
        if let Some(ip) = &self.ip {
            record.ip = ip.trim().to_string();
        }
        if let Some(mac) = &self.mac {
            record.mac = mac.trim().to_string();
        }
        if let Some(seal) = &self.seal {
            record.seal = seal.trim().to_string();
        }
    }
}

/// A collision that survives the proposed edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemainingConflict {
    pub key_type: KeyType,
    pub value: String,
    pub member_ids: Vec<String>,
}

impl Display for RemainingConflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} still shared by {}",
            self.key_type,
            self.value,
            self.member_ids.join(",")
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("no edits proposed for the conflict group")]
    NoEdits,
    #[error("equipment {0} is not in the collection")]
    UnknownMember(String),
    #[error("equipment {0} is not a member of the conflict group")]
    NotInGroup(String),
    #[error("edits leave {} conflict(s): {}", .0.len(), join_remaining(.0))]
    StillConflicting(Vec<RemainingConflict>),
}

fn join_remaining(rows: &[RemainingConflict]) -> String {
    rows.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check proposed edits for a conflict group before they are persisted.
///
/// The edits are applied to a copy of `collection` and detection is re-run.
/// Only the key types in the group's `problem_types` are checked: the edits
/// are rejected if any edited member still sits in a group of one of those
/// types. An empty edit list, or one where no edit sets a field, is rejected
/// with [`ResolutionError::NoEdits`]. On success the edited records are
/// returned for the caller to persist; nothing is written here.
pub fn validate_resolution(
    collection: &[Equipment],
    group: &ConflictGroup,
    edits: &[MemberEdit],
) -> Result<Vec<Equipment>, ResolutionError> {
    if edits.iter().all(MemberEdit::is_empty) {
        return Err(ResolutionError::NoEdits);
    }

    let mut proposed = collection.to_vec();
    let mut edited = Vec::with_capacity(edits.len());

    for edit in edits {
        if !group.contains(&edit.id) {
            return Err(ResolutionError::NotInGroup(edit.id.clone()));
        }
        let item = proposed
            .iter_mut()
            .find(|item| item.id == edit.id)
            .ok_or_else(|| ResolutionError::UnknownMember(edit.id.clone()))?;
        edit.apply(&mut item.record);
        edited.push(item.clone());
    }

    let remaining: Vec<RemainingConflict> = detect_conflicts(&proposed)
        .into_iter()
        .filter(|g| group.problem_types.contains(&g.key_type))
        .filter(|g| edits.iter().any(|e| g.contains(&e.id)))
        .map(|g| RemainingConflict {
            key_type: g.key_type,
            value: g.value,
            member_ids: g.members.into_iter().map(|m| m.id).collect(),
        })
        .collect();

    if !remaining.is_empty() {
        return Err(ResolutionError::StillConflicting(remaining));
    }
    Ok(edited)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{
        detect_conflicts, find_group, validate_resolution, KeyType, MemberEdit, ResolutionError,
    };
    use crate::equipment::{Equipment, EquipmentRecord, PLACEHOLDER_MAC};

    fn eq(id: &str, ip: &str, mac: &str, seal: &str) -> Equipment {
        Equipment::new(
            id,
            EquipmentRecord {
                name: format!("host {id}"),
                ip: ip.to_string(),
                mac: mac.to_string(),
                seal: seal.to_string(),
                section: "SALC".to_string(),
                responsible: "x".to_string(),
                category: None,
                context_section: None,
            },
        )
    }

    fn keys(groups: &[super::ConflictGroup]) -> BTreeSet<(KeyType, String)> {
        groups
            .iter()
            .map(|g| (g.key_type, g.value.clone()))
            .collect()
    }

    #[test]
    fn distinct_values_yield_no_conflicts() {
        let items = vec![
            eq("a", "10.0.0.1", "aa:00:00:00:00:01", "1"),
            eq("b", "10.0.0.2", "aa:00:00:00:00:02", "2"),
            eq("c", "10.0.0.3", "aa:00:00:00:00:03", "3"),
        ];
        assert!(detect_conflicts(&items).is_empty());
    }

    #[test]
    fn placeholder_mac_and_empty_seal_are_ignored() {
        let items = vec![
            eq("a", "10.0.0.1", PLACEHOLDER_MAC, ""),
            eq("b", "10.0.0.2", PLACEHOLDER_MAC, ""),
            eq("c", "10.0.0.3", "", " "),
            eq("d", "10.0.0.4", "", ""),
        ];
        assert!(detect_conflicts(&items).is_empty());
    }

    #[test]
    fn shared_ip_forms_one_group() {
        let items = vec![
            eq("a", "10.0.0.5", PLACEHOLDER_MAC, ""),
            eq("b", "10.0.0.5", PLACEHOLDER_MAC, ""),
        ];
        let groups = detect_conflicts(&items);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key_type, KeyType::Ip);
        assert_eq!(groups[0].value, "10.0.0.5");
        let ids: Vec<&str> = groups[0].members.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(groups[0].problem_types, BTreeSet::from([KeyType::Ip]));
    }

    #[test]
    fn pair_sharing_ip_and_mac_is_reported_per_key() {
        let items = vec![
            eq("a", "10.0.0.5", "aa:00:00:00:00:01", "1"),
            eq("b", "10.0.0.5", "aa:00:00:00:00:01", "2"),
        ];
        let groups = detect_conflicts(&items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key_type, KeyType::Ip);
        assert_eq!(groups[1].key_type, KeyType::Mac);
        let both = BTreeSet::from([KeyType::Ip, KeyType::Mac]);
        assert_eq!(groups[0].problem_types, both);
        assert_eq!(groups[1].problem_types, both);
    }

    #[test]
    fn problem_types_use_each_members_own_value() {
        // a/b share an IP; a's MAC is shared with c, b's with d.
        let items = vec![
            eq("a", "10.0.0.5", "aa:00:00:00:00:01", ""),
            eq("b", "10.0.0.5", "aa:00:00:00:00:02", ""),
            eq("c", "10.0.0.6", "aa:00:00:00:00:01", ""),
            eq("d", "10.0.0.7", "aa:00:00:00:00:02", ""),
        ];
        let groups = detect_conflicts(&items);
        let ip_group = groups
            .iter()
            .find(|g| g.key_type == KeyType::Ip)
            .expect("ip group");
        assert!(ip_group.problem_types.contains(&KeyType::Mac));
        assert_eq!(ip_group.problem_labels(), vec!["IP Duplicado", "MAC Duplicado"]);

        // Only one MAC group member has its IP duplicated: no IP tag.
        let mac_group = groups
            .iter()
            .find(|g| g.key_type == KeyType::Mac && g.value == "aa:00:00:00:00:01")
            .expect("mac group");
        assert_eq!(mac_group.problem_types, BTreeSet::from([KeyType::Mac]));
    }

    #[test]
    fn key_pairs_do_not_depend_on_input_order() {
        let mut items = vec![
            eq("a", "10.0.0.5", "aa:00:00:00:00:01", "7"),
            eq("b", "10.0.0.5", "aa:00:00:00:00:02", "8"),
            eq("c", "10.0.0.6", "aa:00:00:00:00:01", "7"),
            eq("d", "10.0.0.7", "aa:00:00:00:00:03", "9"),
        ];
        let forward = keys(&detect_conflicts(&items));
        items.reverse();
        let backward = keys(&detect_conflicts(&items));
        items.swap(0, 2);
        let shuffled = keys(&detect_conflicts(&items));
        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
        assert_eq!(forward.len(), 3);
    }

    #[test]
    fn gate_accepts_edit_that_clears_conflict() {
        let items = vec![
            eq("a", "10.0.0.5", PLACEHOLDER_MAC, ""),
            eq("b", "10.0.0.5", PLACEHOLDER_MAC, ""),
            eq("c", "10.0.0.7", PLACEHOLDER_MAC, ""),
        ];
        let group = detect_conflicts(&items).remove(0);
        let mut edit = MemberEdit::new("b");
        edit.set(KeyType::Ip, "10.0.0.6");

        let edited = validate_resolution(&items, &group, &[edit]).expect("gate should pass");
        assert_eq!(edited.len(), 1);
        assert_eq!(edited[0].record.ip, "10.0.0.6");
    }

    #[test]
    fn gate_rejects_edit_onto_third_records_value() {
        let items = vec![
            eq("a", "10.0.0.5", PLACEHOLDER_MAC, ""),
            eq("b", "10.0.0.5", PLACEHOLDER_MAC, ""),
            eq("c", "10.0.0.7", PLACEHOLDER_MAC, ""),
        ];
        let group = detect_conflicts(&items).remove(0);
        let mut edit = MemberEdit::new("b");
        edit.set(KeyType::Ip, "10.0.0.7");

        match validate_resolution(&items, &group, &[edit]) {
            Err(ResolutionError::StillConflicting(rows)) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].value, "10.0.0.7");
                assert_eq!(rows[0].member_ids, vec!["b", "c"]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn gate_only_checks_original_problem_types() {
        // IP-only group; the edit introduces a seal clash, which is not checked.
        let items = vec![
            eq("a", "10.0.0.5", PLACEHOLDER_MAC, "1"),
            eq("b", "10.0.0.5", PLACEHOLDER_MAC, "2"),
            eq("c", "10.0.0.7", PLACEHOLDER_MAC, "3"),
        ];
        let group = detect_conflicts(&items).remove(0);
        let mut edit = MemberEdit::new("b");
        edit.set(KeyType::Ip, "10.0.0.6");
        edit.set(KeyType::Seal, "3");
        assert!(validate_resolution(&items, &group, &[edit]).is_ok());
    }

    #[test]
    fn gate_rejects_edits_outside_group() {
        let items = vec![
            eq("a", "10.0.0.5", PLACEHOLDER_MAC, ""),
            eq("b", "10.0.0.5", PLACEHOLDER_MAC, ""),
            eq("c", "10.0.0.7", PLACEHOLDER_MAC, ""),
        ];
        let group = detect_conflicts(&items).remove(0);
        let mut edit = MemberEdit::new("c");
        edit.set(KeyType::Ip, "10.0.0.8");
        assert_eq!(
            validate_resolution(&items, &group, &[edit]),
            Err(ResolutionError::NotInGroup("c".to_string()))
        );
    }

    #[test]
    fn gate_rejects_empty_edit_list() {
        let items = vec![
            eq("a", "10.0.0.5", PLACEHOLDER_MAC, ""),
            eq("b", "10.0.0.5", PLACEHOLDER_MAC, ""),
        ];
        let group = detect_conflicts(&items).remove(0);
        assert_eq!(
            validate_resolution(&items, &group, &[]),
            Err(ResolutionError::NoEdits)
        );
        assert_eq!(
            validate_resolution(&items, &group, &[MemberEdit::new("b")]),
            Err(ResolutionError::NoEdits)
        );
    }

    #[test]
    fn mac_comparison_ignores_case() {
        let items = vec![
            eq("a", "10.0.0.1", "AA:BB:CC:00:00:01", ""),
            eq("b", "10.0.0.2", "aa:bb:cc:00:00:01", ""),
            eq("c", "10.0.0.3", " Aa:Bb:cC:00:00:01 ", ""),
        ];
        let groups = detect_conflicts(&items);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key_type, KeyType::Mac);
        assert_eq!(groups[0].value, "aa:bb:cc:00:00:01");
        assert_eq!(groups[0].members.len(), 3);

        let found = find_group(&items, KeyType::Mac, "AA:BB:CC:00:00:01").expect("group");
        assert_eq!(found.members.len(), 3);
        assert!(find_group(&items, KeyType::Ip, "10.0.0.1").is_none());
    }

    #[test]
    fn group_json_uses_alert_shape() {
        let items = vec![
            eq("a", "10.0.0.5", PLACEHOLDER_MAC, ""),
            eq("b", "10.0.0.5", PLACEHOLDER_MAC, ""),
        ];
        let value = serde_json::to_value(&detect_conflicts(&items)[0]).expect("serialize");
        assert_eq!(value["keyType"], "IP");
        assert_eq!(value["value"], "10.0.0.5");
        assert_eq!(value["problemTypes"], serde_json::json!(["IP"]));
        assert_eq!(value["members"].as_array().map(Vec::len), Some(2));
    }
}
