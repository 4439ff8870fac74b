//! Name-pattern tables for sections and responsible parties.
//!
//! Both tables are ordered `(pattern, label)` lists evaluated first match
//! wins against the lower-cased host name. They are data: the built-in set
//! ships in `mappings/heuristics.toml` and a site can supply its own file.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// One substring rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NameRule {
    pub pattern: String,
    pub label: String,
}

impl NameRule {
    fn new(pattern: &str, label: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            label: label.to_string(),
        }
    }

    fn matches(&self, lowered_name: &str) -> bool {
        let pattern = self.pattern.trim().to_lowercase();
        !pattern.is_empty() && lowered_name.contains(&pattern)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Heuristics {
    #[serde(default, rename = "section")]
    pub sections: Vec<NameRule>,
    #[serde(default, rename = "responsible")]
    pub responsibles: Vec<NameRule>,
}

impl Heuristics {
    /// Section label for `name`, if any rule matches.
    pub fn section_for(&self, name: &str) -> Option<&str> {
        first_match(&self.sections, name)
    }

    /// Responsible party for `name`, if any rule matches.
    pub fn responsible_for(&self, name: &str) -> Option<&str> {
        first_match(&self.responsibles, name)
    }

    fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.responsibles.is_empty()
    }
}

fn first_match<'a>(rules: &'a [NameRule], name: &str) -> Option<&'a str> {
    let lowered = name.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.label.as_str())
}

/// Errors returned when loading heuristic files.
#[derive(Debug, Error)]
pub enum HeuristicsLoadError {
    #[error("failed to read heuristics file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse heuristics file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load heuristic tables from a TOML file.
pub fn load_heuristics(path: &Path) -> Result<Heuristics, HeuristicsLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| HeuristicsLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_heuristics(&raw, path.display().to_string())
}

/// Built-in tables.
pub fn default_heuristics() -> Heuristics {
    let embedded = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/mappings/heuristics.toml"
    ));
    match parse_heuristics(embedded, "embedded heuristics".to_string()) {
        Ok(tables) if !tables.is_empty() => tables,
        _ => fallback_heuristics(),
    }
}

fn parse_heuristics(raw: &str, path: String) -> Result<Heuristics, HeuristicsLoadError> {
    toml::from_str(raw).map_err(|source| HeuristicsLoadError::Parse { path, source })
}

fn fallback_heuristics() -> Heuristics {
    Heuristics {
        sections: vec![
            NameRule::new("fusex", "FUSEX"),
            NameRule::new("secinfo", "INFORMÁTICA"),
            NameRule::new("almox", "ALMOXARIFADO"),
            NameRule::new("salc", "SALC"),
        ],
        responsibles: vec![NameRule::new("secinfo", "Seção de Informática")],
    }
}
