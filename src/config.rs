//! The category map: which normalized SKU aliases belong to which report
//! column, in which order the columns appear, and which two categories carry
//! the backrest override semantics.
//!
//! The map is an operator-edited JSON file (`sku_map.json`). Every top-level
//! key is optional and fills from the defaults, so a hand-trimmed file keeps
//! working. Aliases are stored normalized and deduplicated both on load and on
//! save, and alias sets must be disjoint across categories: an overlap is a
//! load error rather than a silent first-match-wins.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ListError, Result};
use crate::normalize::normalize_token;

/// How a category's aggregate is rendered in the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain unit totals.
    #[default]
    Numeric,
    /// Reserved for categories with non-numeric renderings.
    Other,
}

/// A single report column: the alias spellings that resolve to it and how its
/// aggregate is rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    #[serde(default)]
    pub aliases: BTreeSet<String>,
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Names of the two categories with override semantics: backrest with an
/// extra cover, and the bare backrest it falls back to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialRules {
    #[serde(default = "default_enc_capa")]
    pub enc_capa_category: String,
    #[serde(default = "default_enc_base")]
    pub enc_base_category: String,
}

impl Default for SpecialRules {
    fn default() -> Self {
        Self {
            enc_capa_category: default_enc_capa(),
            enc_base_category: default_enc_base(),
        }
    }
}

fn default_enc_capa() -> String {
    "ENC_CAPA".to_string()
}

fn default_enc_base() -> String {
    "ENC".to_string()
}

fn default_priorities() -> Vec<String> {
    ["PR", "R70", "ENC", "ENC_CAPA", "XUXAO", "BB", "RAMPA"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// The full category configuration consumed by the pipeline.
///
/// Passed immutably into every pipeline function; nothing in the crate
/// mutates it after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMap {
    #[serde(default = "default_priorities")]
    pub priorities: Vec<String>,
    #[serde(default)]
    pub categories: BTreeMap<String, CategorySpec>,
    #[serde(default)]
    pub special_rules: SpecialRules,
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self {
            priorities: default_priorities(),
            categories: BTreeMap::new(),
            special_rules: SpecialRules::default(),
        }
    }
}

impl CategoryMap {
    /// Loads the map from `path`, or returns the defaults when the file does
    /// not exist. Aliases are normalized, deduplicated, and checked for
    /// overlap across categories.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "category map not found, using defaults");
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        let mut map: Self = serde_json::from_str(&data)?;
        map.sanitize();
        map.validate_disjoint()?;
        Ok(map)
    }

    /// Persists the map as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut map = self.clone();
        map.sanitize();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(&map)?)?;
        Ok(())
    }

    /// Returns the category owning the given normalized SKU key, if any.
    pub fn category_for_alias(&self, sku_norm: &str) -> Option<&str> {
        if sku_norm.is_empty() {
            return None;
        }
        self.categories
            .iter()
            .find(|(_, spec)| spec.aliases.contains(sku_norm))
            .map(|(name, _)| name.as_str())
    }

    /// Report column order: configured priorities first (filtered to
    /// categories that exist), then the remaining categories alphabetically,
    /// case-insensitive.
    pub fn column_order(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .priorities
            .iter()
            .filter(|name| self.categories.contains_key(*name))
            .cloned()
            .collect();
        let mut remaining: Vec<String> = self
            .categories
            .keys()
            .filter(|name| !columns.contains(name))
            .cloned()
            .collect();
        remaining.sort_by_key(|name| name.to_lowercase());
        columns.extend(remaining);
        columns
    }

    fn sanitize(&mut self) {
        for spec in self.categories.values_mut() {
            spec.aliases = spec
                .aliases
                .iter()
                .map(|alias| normalize_token(alias))
                .filter(|alias| !alias.is_empty())
                .collect();
        }
    }

    fn validate_disjoint(&self) -> Result<()> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for (name, spec) in &self.categories {
            for alias in &spec.aliases {
                if let Some(first) = seen.insert(alias, name) {
                    return Err(ListError::AliasOverlap {
                        alias: alias.clone(),
                        first: first.to_string(),
                        second: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
