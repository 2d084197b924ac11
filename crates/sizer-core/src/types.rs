//! Shared types used across the sizer crates.
//!
//! Field and variant names on the serialized types are a compatibility
//! contract with the downstream deployment tooling and must not change.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to parse one of the enumerated wire names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseNameError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseNameError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

// ── Tiers and roles ────────────────────────────────────────────────

/// System tier produced per deployment. Declaration order is the
/// serialization order of the master catalog buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Db,
    App,
    Scs,
    Scsha,
    Web,
}

impl Tier {
    pub const ALL: [Tier; 5] = [Tier::Db, Tier::App, Tier::Scs, Tier::Scsha, Tier::Web];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Db => "db",
            Tier::App => "app",
            Tier::Scs => "scs",
            Tier::Scsha => "scsha",
            Tier::Web => "web",
        }
    }

    /// Only the database tier carries the full data/log/shared/backup layout.
    pub fn is_database(&self) -> bool {
        matches!(self, Tier::Db)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseNameError::new("tier", s))
    }
}

/// Storage purpose of a disk group. Serialized as the `name` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StorageRole {
    #[serde(rename = "os")]
    Os,
    #[serde(rename = "data")]
    Data,
    #[serde(rename = "log")]
    Log,
    #[serde(rename = "shared")]
    Shared,
    #[serde(rename = "sap")]
    SapBinaries,
    #[serde(rename = "backup")]
    Backup,
}

impl StorageRole {
    pub const ALL: [StorageRole; 6] = [
        StorageRole::Os,
        StorageRole::Data,
        StorageRole::Log,
        StorageRole::Shared,
        StorageRole::SapBinaries,
        StorageRole::Backup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageRole::Os => "os",
            StorageRole::Data => "data",
            StorageRole::Log => "log",
            StorageRole::Shared => "shared",
            StorageRole::SapBinaries => "sap",
            StorageRole::Backup => "backup",
        }
    }
}

impl fmt::Display for StorageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageRole {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("sapbinaries") {
            return Ok(StorageRole::SapBinaries);
        }
        StorageRole::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseNameError::new("storage role", s))
    }
}

// ── Disk attributes ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiskType {
    #[serde(rename = "Premium_LRS")]
    PremiumSsd,
    #[serde(rename = "PremiumV2_LRS")]
    PremiumSsdV2,
    #[serde(rename = "Premium_ZRS")]
    PremiumZrs,
    #[serde(rename = "Standard_LRS")]
    StandardHdd,
}

impl DiskType {
    pub const ALL: [DiskType; 4] = [
        DiskType::PremiumSsd,
        DiskType::PremiumSsdV2,
        DiskType::PremiumZrs,
        DiskType::StandardHdd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiskType::PremiumSsd => "Premium_LRS",
            DiskType::PremiumSsdV2 => "PremiumV2_LRS",
            DiskType::PremiumZrs => "Premium_ZRS",
            DiskType::StandardHdd => "Standard_LRS",
        }
    }

    /// Whether IOPS and throughput are provisioned independently of size.
    pub fn is_performance_configurable(&self) -> bool {
        matches!(self, DiskType::PremiumSsdV2)
    }

    pub fn is_zone_redundant(&self) -> bool {
        matches!(self, DiskType::PremiumZrs)
    }
}

impl fmt::Display for DiskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiskType {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiskType::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseNameError::new("disk type", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Caching {
    None,
    ReadOnly,
    ReadWrite,
}

impl Caching {
    pub fn as_str(&self) -> &'static str {
        match self {
            Caching::None => "None",
            Caching::ReadOnly => "ReadOnly",
            Caching::ReadWrite => "ReadWrite",
        }
    }
}

impl fmt::Display for Caching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Caching {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Caching::None, Caching::ReadOnly, Caching::ReadWrite]
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseNameError::new("caching mode", s))
    }
}

// ── Sizing records ─────────────────────────────────────────────────

/// Published performance target for a memory tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceTarget {
    pub data_throughput_mbps: u32,
    pub data_iops: u32,
    pub log_throughput_mbps: u32,
    pub log_iops: u32,
}

impl PerformanceTarget {
    pub const fn new(
        data_throughput_mbps: u32,
        data_iops: u32,
        log_throughput_mbps: u32,
        log_iops: u32,
    ) -> Self {
        Self { data_throughput_mbps, data_iops, log_throughput_mbps, log_iops }
    }
}

/// Where the data/log capacity of a plan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacitySource {
    OfficialCatalog,
    MemoryFormula,
}

/// Total data and log capacity for one SKU, with provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityPlan {
    pub total_data_gib: f64,
    pub total_log_gib: f64,
    pub source: CapacitySource,
}

/// One homogeneous set of disks serving a single storage role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskGroup {
    #[serde(rename = "name")]
    pub role: StorageRole,
    pub fullname: String,
    pub count: u32,
    pub disk_type: DiskType,
    pub size_gb: u32,
    pub caching: Caching,
    pub write_accelerator: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lun_start: Option<u32>,
    #[serde(rename = "disk_iops_read_write", default, skip_serializing_if = "Option::is_none")]
    pub iops: Option<u32>,
    #[serde(rename = "disk_mbps_read_write", default, skip_serializing_if = "Option::is_none")]
    pub throughput_mbps: Option<u32>,
}

impl DiskGroup {
    pub fn total_size_gb(&self) -> u64 {
        u64::from(self.count) * u64::from(self.size_gb)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeProfile {
    pub vm_size: String,
    pub accelerated_networking: bool,
}

/// Compute and storage layout for one (system, tier) pair.
/// `compute` is serialized before `storage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfiguration {
    pub compute: ComputeProfile,
    pub storage: Vec<DiskGroup>,
}

impl SystemConfiguration {
    pub fn disk_group(&self, role: StorageRole) -> Option<&DiskGroup> {
        self.storage.iter().find(|g| g.role == role)
    }

    pub fn disk_group_mut(&mut self, role: StorageRole) -> Option<&mut DiskGroup> {
        self.storage.iter_mut().find(|g| g.role == role)
    }

    pub fn roles(&self) -> Vec<StorageRole> {
        self.storage.iter().map(|g| g.role).collect()
    }
}

/// Tier bucket → SKU → configuration. All five buckets are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterCatalog {
    buckets: BTreeMap<Tier, BTreeMap<String, SystemConfiguration>>,
}

impl Default for MasterCatalog {
    fn default() -> Self {
        Self {
            buckets: Tier::ALL.into_iter().map(|t| (t, BTreeMap::new())).collect(),
        }
    }
}

impl MasterCatalog {
    pub fn bucket(&self, tier: Tier) -> &BTreeMap<String, SystemConfiguration> {
        static EMPTY: BTreeMap<String, SystemConfiguration> = BTreeMap::new();
        self.buckets.get(&tier).unwrap_or(&EMPTY)
    }

    pub fn bucket_mut(&mut self, tier: Tier) -> &mut BTreeMap<String, SystemConfiguration> {
        self.buckets.entry(tier).or_default()
    }

    pub fn get(&self, tier: Tier, sku: &str) -> Option<&SystemConfiguration> {
        self.buckets.get(&tier).and_then(|b| b.get(sku))
    }

    /// Total number of configurations across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
