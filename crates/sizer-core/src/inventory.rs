//! Input documents supplied by the surrounding tooling: the candidate
//! system list, the reference sizing catalog, and per-system overrides.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use crate::error::{SizingError, SizingResult};
use crate::types::Tier;

/// One system of the landscape with the SKU chosen for each tier.
/// Tiers missing from `skus` are not generated for this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSystem {
    pub moniker: String,
    #[serde(default)]
    pub environment: String,
    pub skus: BTreeMap<Tier, String>,
}

impl CandidateSystem {
    pub fn new(moniker: &str, environment: &str) -> Self {
        Self {
            moniker: moniker.to_string(),
            environment: environment.to_string(),
            skus: BTreeMap::new(),
        }
    }

    /// Builder method: assign a SKU to a tier.
    pub fn with_sku(mut self, tier: Tier, sku: &str) -> Self {
        self.skus.insert(tier, sku.to_string());
        self
    }
}

/// Identifies one (system, tier) pair; overrides are addressed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemKey {
    pub moniker: String,
    pub tier: Tier,
}

impl SystemKey {
    pub fn new(moniker: &str, tier: Tier) -> Self {
        Self { moniker: moniker.to_string(), tier }
    }
}

impl fmt::Display for SystemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.moniker, self.tier)
    }
}

// ── Reference sizing catalog ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDisk {
    pub name: String,
    pub count: u32,
    pub size_gb: u32,
}

/// Published sizing for one SKU. Only the storage list is consulted;
/// other fields in the source document are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub storage: Vec<CatalogDisk>,
}

impl CatalogEntry {
    pub fn disk(&self, name: &str) -> Option<&CatalogDisk> {
        self.storage.iter().find(|d| d.name == name)
    }
}

/// SKU → published capacity entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl ReferenceCatalog {
    pub fn from_json_str(content: &str) -> SizingResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> SizingResult<Self> {
        Self::from_json_str(&read(path)?)
    }

    pub fn insert(&mut self, sku: &str, entry: CatalogEntry) {
        self.entries.insert(sku.to_string(), entry);
    }

    pub fn get(&self, sku: &str) -> Option<&CatalogEntry> {
        self.entries.get(sku)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Overrides ──────────────────────────────────────────────────────

/// moniker → tier → raw `key = value` override pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideDocument {
    systems: HashMap<String, BTreeMap<Tier, BTreeMap<String, String>>>,
}

impl OverrideDocument {
    pub fn from_json_str(content: &str) -> SizingResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> SizingResult<Self> {
        Self::from_json_str(&read(path)?)
    }

    pub fn insert(&mut self, key: &SystemKey, name: &str, value: &str) {
        self.systems
            .entry(key.moniker.clone())
            .or_default()
            .entry(key.tier)
            .or_default()
            .insert(name.to_string(), value.to_string());
    }

    /// Raw pairs for one (system, tier), in key order.
    pub fn for_system(&self, key: &SystemKey) -> Vec<(String, String)> {
        self.systems
            .get(&key.moniker)
            .and_then(|tiers| tiers.get(&key.tier))
            .map(|pairs| pairs.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }
}

/// Load the candidate system list. Order is significant.
pub fn load_candidates(path: &Path) -> SizingResult<Vec<CandidateSystem>> {
    Ok(serde_json::from_str(&read(path)?)?)
}

fn read(path: &Path) -> SizingResult<String> {
    std::fs::read_to_string(path).map_err(|source| SizingError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_ignores_unknown_fields() {
        let json = r#"{
            "Standard_M64s": {
                "role": "db",
                "compute": { "vm_size": "Standard_M64s" },
                "storage": [
                    { "name": "data", "count": 4, "size_gb": 512, "caching": "None" },
                    { "name": "log", "count": 2, "size_gb": 256 }
                ]
            }
        }"#;
        let catalog = ReferenceCatalog::from_json_str(json).unwrap();
        let entry = catalog.get("Standard_M64s").unwrap();
        assert_eq!(entry.disk("data").unwrap().count, 4);
        assert_eq!(entry.disk("log").unwrap().size_gb, 256);
        assert!(entry.disk("shared").is_none());
    }

    #[test]
    fn test_parse_candidates() {
        let json = r#"[
            { "moniker": "X00", "environment": "prod",
              "skus": { "db": "Standard_M64s", "app": "Standard_D8s_v5" } }
        ]"#;
        let systems: Vec<CandidateSystem> = serde_json::from_str(json).unwrap();
        assert_eq!(systems[0].skus[&Tier::Db], "Standard_M64s");
        assert!(!systems[0].skus.contains_key(&Tier::Web));
    }

    #[test]
    fn test_overrides_by_system_and_tier() {
        let json = r#"{
            "X00": {
                "db": { "storage_data_count_override": "4", "compute_vm_size_override": "Standard_M128s" },
                "app": { "compute_accelerated_networking_override": "false" }
            }
        }"#;
        let doc = OverrideDocument::from_json_str(json).unwrap();
        let db = doc.for_system(&SystemKey::new("X00", Tier::Db));
        assert_eq!(db.len(), 2);
        assert_eq!(db[0].0, "compute_vm_size_override");
        assert!(doc.for_system(&SystemKey::new("X00", Tier::Web)).is_empty());
        assert!(doc.for_system(&SystemKey::new("Y00", Tier::Db)).is_empty());
    }

    #[test]
    fn test_system_key_display() {
        assert_eq!(SystemKey::new("X00", Tier::Scsha).to_string(), "X00/scsha");
    }
}
