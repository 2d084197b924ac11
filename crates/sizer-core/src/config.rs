//! sizer.toml policy configuration parser.
//!
//! Every field has a default, so an absent or empty file yields the
//! standard policy. Striping thresholds and performance tiers are not
//! configurable here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{SizingError, SizingResult};
use crate::types::DiskType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SizingConfig {
    pub disks: DiskPolicy,
    pub compute: ComputePolicy,
    pub capacity: CapacityPolicy,
    pub memory: MemoryPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskPolicy {
    pub os_size_gb: u32,
    pub sap_binaries_size_gb: u32,
    pub backup_disk_count: u32,
    /// Backup capacity as a multiple of total data capacity.
    pub backup_multiplier: f64,
    pub os_disk_type: DiskType,
    /// Disk type for data and log.
    pub performance_disk_type: DiskType,
    pub shared_disk_type: DiskType,
    pub sap_binaries_disk_type: DiskType,
    pub backup_disk_type: DiskType,
}

impl Default for DiskPolicy {
    fn default() -> Self {
        Self {
            os_size_gb: 256,
            sap_binaries_size_gb: 128,
            backup_disk_count: 4,
            backup_multiplier: 2.0,
            os_disk_type: DiskType::PremiumSsd,
            performance_disk_type: DiskType::PremiumSsdV2,
            shared_disk_type: DiskType::PremiumSsd,
            sap_binaries_disk_type: DiskType::PremiumSsd,
            backup_disk_type: DiskType::PremiumZrs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputePolicy {
    pub accelerated_networking: bool,
}

impl Default for ComputePolicy {
    fn default() -> Self {
        Self { accelerated_networking: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CapacityPolicy {
    /// Also pin catalog-sourced log capacity to the fixed large-memory
    /// log size. Off by default: the catalog is authoritative.
    pub apply_log_floor_to_catalog: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MemoryPolicy {
    /// Exact SKU → GiB figures, consulted before the built-in table.
    pub facts: BTreeMap<String, u32>,
}

impl SizingConfig {
    pub fn from_file(path: &Path) -> SizingResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SizingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> SizingResult<Self> {
        let config: SizingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise the default policy.
    pub fn load(path: Option<&Path>) -> SizingResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> SizingResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> SizingResult<()> {
        let d = &self.disks;
        if d.backup_disk_count == 0 {
            return Err(invalid("disks.backup_disk_count", "must be at least 1"));
        }
        if !d.backup_multiplier.is_finite() || d.backup_multiplier <= 0.0 {
            return Err(invalid(
                "disks.backup_multiplier",
                format!("must be a positive number, got {}", d.backup_multiplier),
            ));
        }
        if d.os_size_gb == 0 {
            return Err(invalid("disks.os_size_gb", "must be at least 1"));
        }
        if d.sap_binaries_size_gb == 0 {
            return Err(invalid("disks.sap_binaries_size_gb", "must be at least 1"));
        }
        if let Some((sku, _)) = self.memory.facts.iter().find(|(_, gib)| **gib == 0) {
            return Err(invalid("memory.facts", format!("{sku} has zero memory")));
        }
        if !d.backup_disk_type.is_zone_redundant() {
            return Err(invalid(
                "disks.backup_disk_type",
                format!("{} is not zone-redundant", d.backup_disk_type),
            ));
        }
        if d.backup_disk_type == d.performance_disk_type {
            return Err(invalid(
                "disks.backup_disk_type",
                "must differ from the data/log disk type",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SizingError {
    SizingError::InvalidPolicy { field, reason: reason.into() }
}
