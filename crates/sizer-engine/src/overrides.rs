//! Override directives applied on top of an assembled configuration.
//!
//! Keys take the shape `compute_<property>_override` or
//! `storage_<role>_<property>_override`. Each directive touches exactly
//! one field; in particular `count` and `size_gb` never rescale each
//! other. A bad directive is skipped with a warning and never aborts
//! assembly.

use std::fmt;

use serde::Serialize;
use sizer_core::{Caching, DiskGroup, DiskType, StorageRole, SystemConfiguration, SystemKey};
use tracing::{debug, warn};

use crate::capacity::{MIN_DISK_IOPS, MIN_DISK_MBPS};

pub const OVERRIDE_SUFFIX: &str = "_override";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeProperty {
    VmSize,
    AcceleratedNetworking,
}

impl ComputeProperty {
    const ALL: [ComputeProperty; 2] = [ComputeProperty::VmSize, ComputeProperty::AcceleratedNetworking];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComputeProperty::VmSize => "vm_size",
            ComputeProperty::AcceleratedNetworking => "accelerated_networking",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProperty {
    DiskType,
    Count,
    SizeGb,
    Caching,
    Iops,
    Throughput,
}

type StorageSetter = fn(&mut DiskGroup, &str) -> Result<(), SkipReason>;

impl StorageProperty {
    const ALL: [StorageProperty; 6] = [
        StorageProperty::DiskType,
        StorageProperty::Count,
        StorageProperty::SizeGb,
        StorageProperty::Caching,
        StorageProperty::Iops,
        StorageProperty::Throughput,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageProperty::DiskType => "disk_type",
            StorageProperty::Count => "count",
            StorageProperty::SizeGb => "size_gb",
            StorageProperty::Caching => "caching",
            StorageProperty::Iops => "iops",
            StorageProperty::Throughput => "throughput",
        }
    }

    /// Typed setter for this property.
    fn setter(&self) -> StorageSetter {
        match self {
            StorageProperty::DiskType => set_disk_type,
            StorageProperty::Count => set_count,
            StorageProperty::SizeGb => set_size_gb,
            StorageProperty::Caching => set_caching,
            StorageProperty::Iops => set_iops,
            StorageProperty::Throughput => set_throughput,
        }
    }

    fn parse(name: &str) -> Option<Self> {
        StorageProperty::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

/// A parsed directive with its raw (trimmed) value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Compute { property: ComputeProperty, value: String },
    Storage { role: StorageRole, property: StorageProperty, value: String },
}

/// Why a directive was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    EmptyValue,
    UnknownSection { section: String },
    UnknownComputeProperty { property: String },
    UnknownStorageRole { role: String },
    UnknownStorageProperty { property: String },
    MissingRole { role: StorageRole },
    InvalidValue { property: String, value: String, expected: &'static str },
    NotPerformanceConfigurable { role: StorageRole, disk_type: DiskType },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyValue => write!(f, "empty value"),
            SkipReason::UnknownSection { section } => write!(f, "unknown section {section:?}"),
            SkipReason::UnknownComputeProperty { property } => {
                write!(f, "unknown compute property {property:?}")
            }
            SkipReason::UnknownStorageRole { role } => write!(f, "unknown storage role {role:?}"),
            SkipReason::UnknownStorageProperty { property } => {
                write!(f, "unknown storage property {property:?}")
            }
            SkipReason::MissingRole { role } => write!(f, "configuration has no {role} storage"),
            SkipReason::InvalidValue { property, value, expected } => {
                write!(f, "invalid {property} value {value:?}, expected {expected}")
            }
            SkipReason::NotPerformanceConfigurable { role, disk_type } => {
                write!(f, "{role} uses {disk_type}, which has no configurable performance")
            }
        }
    }
}

/// Result of applying one system's override set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverrideOutcome {
    pub applied: Vec<String>,
    pub skipped: Vec<SkippedDirective>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDirective {
    pub key: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

impl OverrideOutcome {
    pub fn is_clean(&self) -> bool {
        self.skipped.iter().all(|s| s.reason == SkipReason::EmptyValue)
    }
}

/// Parse one raw `key = value` pair.
pub fn parse_directive(key: &str, value: &str) -> Result<Directive, SkipReason> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SkipReason::EmptyValue);
    }

    let key = key.trim();
    let key = key.strip_suffix(OVERRIDE_SUFFIX).unwrap_or(key);
    let (section, rest) = key.split_once('_').unwrap_or((key, ""));

    match section {
        "compute" => {
            let property = ComputeProperty::ALL
                .into_iter()
                .find(|p| p.as_str() == rest)
                .ok_or_else(|| SkipReason::UnknownComputeProperty { property: rest.to_string() })?;
            Ok(Directive::Compute { property, value: value.to_string() })
        }
        "storage" => {
            let (role, property) = rest.split_once('_').unwrap_or((rest, ""));
            let role = role
                .parse::<StorageRole>()
                .map_err(|_| SkipReason::UnknownStorageRole { role: role.to_string() })?;
            let property = StorageProperty::parse(property).ok_or_else(|| {
                SkipReason::UnknownStorageProperty { property: property.to_string() }
            })?;
            Ok(Directive::Storage { role, property, value: value.to_string() })
        }
        other => Err(SkipReason::UnknownSection { section: other.to_string() }),
    }
}

/// Apply one parsed directive to `config`.
pub fn apply_directive(config: &mut SystemConfiguration, directive: &Directive) -> Result<(), SkipReason> {
    match directive {
        Directive::Compute { property: ComputeProperty::VmSize, value } => {
            config.compute.vm_size = value.clone();
            Ok(())
        }
        Directive::Compute { property: ComputeProperty::AcceleratedNetworking, value } => {
            config.compute.accelerated_networking =
                parse_bool(value, ComputeProperty::AcceleratedNetworking.as_str())?;
            Ok(())
        }
        Directive::Storage { role, property, value } => {
            let group = config
                .disk_group_mut(*role)
                .ok_or(SkipReason::MissingRole { role: *role })?;
            (property.setter())(group, value)
        }
    }
}

/// Apply a system's raw override pairs in order. Empty values are
/// skipped silently; every other rejection is logged.
pub fn apply_overrides(
    system: &SystemKey,
    config: &mut SystemConfiguration,
    pairs: &[(String, String)],
) -> OverrideOutcome {
    let mut outcome = OverrideOutcome::default();

    for (key, value) in pairs {
        let result = parse_directive(key, value).and_then(|d| apply_directive(config, &d));
        match result {
            Ok(()) => {
                debug!(system = %system, key = %key, value = %value.trim(), "applied override");
                outcome.applied.push(key.clone());
            }
            Err(SkipReason::EmptyValue) => {
                outcome.skipped.push(SkippedDirective { key: key.clone(), reason: SkipReason::EmptyValue });
            }
            Err(reason) => {
                warn!(system = %system, key = %key, %reason, "skipping override");
                outcome.skipped.push(SkippedDirective { key: key.clone(), reason });
            }
        }
    }

    outcome
}

// ── Setters ────────────────────────────────────────────────────────

fn set_disk_type(group: &mut DiskGroup, value: &str) -> Result<(), SkipReason> {
    let disk_type = value
        .parse::<DiskType>()
        .map_err(|_| invalid("disk_type", value, "Premium_LRS, PremiumV2_LRS, Premium_ZRS or Standard_LRS"))?;
    group.disk_type = disk_type;
    if disk_type.is_performance_configurable() {
        group.iops.get_or_insert(MIN_DISK_IOPS);
        group.throughput_mbps.get_or_insert(MIN_DISK_MBPS);
    } else {
        group.iops = None;
        group.throughput_mbps = None;
    }
    Ok(())
}

fn set_count(group: &mut DiskGroup, value: &str) -> Result<(), SkipReason> {
    group.count = parse_positive(value, "count")?;
    Ok(())
}

fn set_size_gb(group: &mut DiskGroup, value: &str) -> Result<(), SkipReason> {
    group.size_gb = parse_positive(value, "size_gb")?;
    Ok(())
}

fn set_caching(group: &mut DiskGroup, value: &str) -> Result<(), SkipReason> {
    group.caching = value
        .parse::<Caching>()
        .map_err(|_| invalid("caching", value, "None, ReadOnly or ReadWrite"))?;
    Ok(())
}

fn set_iops(group: &mut DiskGroup, value: &str) -> Result<(), SkipReason> {
    require_configurable(group)?;
    let iops = parse_positive(value, "iops")?;
    if iops < MIN_DISK_IOPS {
        return Err(invalid("iops", value, "at least 3000"));
    }
    group.iops = Some(iops);
    Ok(())
}

fn set_throughput(group: &mut DiskGroup, value: &str) -> Result<(), SkipReason> {
    require_configurable(group)?;
    let mbps = parse_positive(value, "throughput")?;
    if mbps < MIN_DISK_MBPS {
        return Err(invalid("throughput", value, "at least 125"));
    }
    group.throughput_mbps = Some(mbps);
    Ok(())
}

fn require_configurable(group: &DiskGroup) -> Result<(), SkipReason> {
    if group.disk_type.is_performance_configurable() {
        Ok(())
    } else {
        Err(SkipReason::NotPerformanceConfigurable { role: group.role, disk_type: group.disk_type })
    }
}

fn parse_positive(value: &str, property: &str) -> Result<u32, SkipReason> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(property, value, "a positive integer")),
    }
}

fn parse_bool(value: &str, property: &str) -> Result<bool, SkipReason> {
    value
        .to_ascii_lowercase()
        .parse::<bool>()
        .map_err(|_| invalid(property, value, "true or false"))
}

fn invalid(property: &str, value: &str, expected: &'static str) -> SkipReason {
    SkipReason::InvalidValue {
        property: property.to_string(),
        value: value.to_string(),
        expected,
    }
}
