use serde::{Deserialize, Serialize};

/// MAC assigned when the source carries none.
pub const PLACEHOLDER_MAC: &str = "00:00:00:00:00:00";
/// Section assigned when no heuristic or context applies.
pub const NO_SECTION: &str = "SEM SEÇÃO";
/// Responsible party assigned when no heuristic applies.
pub const NO_RESPONSIBLE: &str = "Não definido";

/// Equipment fields as held by the record store, without the store id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub name: String,
    pub ip: String,
    pub mac: String,
    /// Tamper-seal ("lacre") number; empty when unknown.
    pub seal: String,
    pub section: String,
    pub responsible: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Section named by the `FAIXAS` comment in force when the host was
    /// parsed. Kept beside `section` so callers can choose which to trust.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_section: Option<String>,
}

impl EquipmentRecord {
    /// False for an empty MAC or the import placeholder.
    pub fn has_real_mac(&self) -> bool {
        let mac = self.mac.trim();
        !mac.is_empty() && !mac.eq_ignore_ascii_case(PLACEHOLDER_MAC)
    }
}

/// An equipment record with its store id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    #[serde(flatten)]
    pub record: EquipmentRecord,
}

impl Equipment {
    pub fn new(id: impl Into<String>, record: EquipmentRecord) -> Self {
        Self {
            id: id.into(),
            record,
        }
    }
}
