//! Draft-to-record normalization.
//!
//! A parsed host block carries a name, an address, and whatever section and
//! seal comments were in force when it opened. Normalization fills the
//! remaining record fields from the name heuristics.

use clap::ValueEnum;
use hostlist_core::{HostBlockDraft, HostList};
use serde::Serialize;
use tracing::debug;

use crate::equipment::{EquipmentRecord, NO_RESPONSIBLE, NO_SECTION, PLACEHOLDER_MAC};
use crate::heuristics::Heuristics;

/// Which mechanism decides the record's `section`.
///
/// The comment-derived section is always kept in `context_section`
/// regardless of the choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SectionSource {
    /// Name heuristics only; `FAIXAS` comments are ignored for `section`.
    #[default]
    Heuristic,
    /// `FAIXAS` comment in force when the block opened.
    Context,
    /// Comment section when present, otherwise the heuristics.
    PreferContext,
}

/// Map one draft onto an equipment record.
pub fn normalize(
    draft: &HostBlockDraft,
    heuristics: &Heuristics,
    source: SectionSource,
) -> EquipmentRecord {
    let heuristic = heuristics.section_for(&draft.name);
    let context = draft
        .section
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let section = match source {
        SectionSource::Heuristic => heuristic,
        SectionSource::Context => context,
        SectionSource::PreferContext => context.or(heuristic),
    }
    .unwrap_or_else(|| {
        debug!(name = %draft.name, ?source, "no section matched");
        NO_SECTION
    });

    EquipmentRecord {
        name: draft.name.clone(),
        ip: draft.ip.clone().unwrap_or_default(),
        mac: draft
            .mac
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_MAC.to_string()),
        seal: draft.seal_id.clone().unwrap_or_default(),
        section: section.to_string(),
        responsible: heuristics
            .responsible_for(&draft.name)
            .unwrap_or(NO_RESPONSIBLE)
            .to_string(),
        category: None,
        context_section: context.map(ToOwned::to_owned),
    }
}

/// Normalize every emitted draft of a parse run, in input order.
pub fn normalize_all(
    list: &HostList,
    heuristics: &Heuristics,
    source: SectionSource,
) -> Vec<EquipmentRecord> {
    list.hosts
        .iter()
        .map(|draft| normalize(draft, heuristics, source))
        .collect()
}

#[cfg(test)]
mod tests {
    use hostlist_core::HostBlockDraft;

    use super::{normalize, SectionSource};
    use crate::equipment::{NO_RESPONSIBLE, NO_SECTION, PLACEHOLDER_MAC};
    use crate::heuristics::default_heuristics;

    fn draft(name: &str, section: Option<&str>, seal: Option<&str>) -> HostBlockDraft {
        HostBlockDraft {
            name: name.to_string(),
            ip: Some("10.0.0.1".to_string()),
            mac: None,
            section: section.map(ToOwned::to_owned),
            seal_id: seal.map(ToOwned::to_owned),
            start_line: 1,
            end_line: 4,
        }
    }

    #[test]
    fn heuristic_section_overrides_context() {
        let rec = normalize(
            &draft("pc fusex 01", Some("FAIXAS SALC"), Some("123")),
            &default_heuristics(),
            SectionSource::Heuristic,
        );
        assert_eq!(rec.section, "FUSEX");
        assert_eq!(rec.context_section.as_deref(), Some("FAIXAS SALC"));
        assert_eq!(rec.seal, "123");
        assert_eq!(rec.mac, PLACEHOLDER_MAC);
        assert_eq!(rec.ip, "10.0.0.1");
    }

    #[test]
    fn unmatched_names_take_sentinels() {
        let rec = normalize(
            &draft("camera 7", Some("FAIXAS SALC"), None),
            &default_heuristics(),
            SectionSource::Heuristic,
        );
        assert_eq!(rec.section, NO_SECTION);
        assert_eq!(rec.responsible, NO_RESPONSIBLE);
        assert_eq!(rec.seal, "");
    }

    #[test]
    fn context_sources_use_comment_section() {
        let tables = default_heuristics();
        let with_ctx = draft("pc fusex", Some("FAIXAS SALC"), None);
        let without_ctx = draft("pc fusex", None, None);

        assert_eq!(
            normalize(&with_ctx, &tables, SectionSource::Context).section,
            "FAIXAS SALC"
        );
        assert_eq!(
            normalize(&without_ctx, &tables, SectionSource::Context).section,
            NO_SECTION
        );
        assert_eq!(
            normalize(&without_ctx, &tables, SectionSource::PreferContext).section,
            "FUSEX"
        );
    }

    #[test]
    fn out_of_band_mac_is_kept() {
        let mut d = draft("pc", None, None);
        d.mac = Some("aa:bb:cc:dd:ee:ff".to_string());
        let rec = normalize(&d, &default_heuristics(), SectionSource::Heuristic);
        assert_eq!(rec.mac, "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn responsible_from_name_fragment() {
        let rec = normalize(
            &draft("notebook sgt silva", None, None),
            &default_heuristics(),
            SectionSource::Heuristic,
        );
        assert_eq!(rec.responsible, "Sgt Silva");
    }
}
