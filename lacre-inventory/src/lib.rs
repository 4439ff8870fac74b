//! Networked equipment inventory: host-list import/export and duplicate audit.
//!
//! A facility keeps its equipment (name, IP, MAC, tamper seal, section,
//! responsible party) in a hand-maintained dhcpd host list. This library
//! turns that list into equipment records, writes records back out in the
//! same dialect, and audits a collection for equipment sharing an IP, MAC,
//! or seal.
//!
//! # Architecture
//!
//! ## Import & Export
//!
//! - [`normalize`] — Map parsed host blocks onto [`equipment::EquipmentRecord`]s
//! - [`heuristics`] — Section and responsible-party tables keyed by name fragments
//! - [`export`] — Group records by section and write the host-list dialect
//! - [`csv_import`] — Six-column CSV bulk import and export
//!
//! ## Audit
//!
//! - [`conflicts`] — Duplicate detection and the resolution write-gate
//!
//! ## Boundaries
//!
//! - [`store`] — Record store contract plus memory and JSON file stores
//! - [`report`] — Terminal-friendly colored output
//!
//! # Examples
//!
//! ```ignore
//! use hostlist_core::parse_file;
//! use lacre_inventory::conflicts::detect_conflicts;
//! use lacre_inventory::heuristics::default_heuristics;
//! use lacre_inventory::normalize::{normalize_all, SectionSource};
//! use lacre_inventory::store::{MemoryStore, RecordStore};
//!
//! let list = parse_file("dhcpd-hosts.conf".as_ref())?;
//! let records = normalize_all(&list, &default_heuristics(), SectionSource::Heuristic);
//! let store = MemoryStore::with_records(records);
//! for group in detect_conflicts(&store.list()) {
//!     println!("{}={} ({} members)", group.key_type, group.value, group.members.len());
//! }
//! ```
//!
//! # Built on hostlist-core
//!
//! Line classification, block assembly, and dialect writing live in
//! `hostlist-core`. Everything equipment-specific is in this crate.

pub mod conflicts;
pub mod csv_import;
pub mod equipment;
pub mod export;
pub mod heuristics;
pub mod normalize;
pub mod report;
pub mod store;
