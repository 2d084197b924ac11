//! Data/log capacity planning and per-disk striping.
//!
//! Capacity comes from the reference catalog when it publishes both a
//! data and a log layout for the SKU, otherwise from a memory formula.
//! The striping policy is the same for both paths.

use serde::Serialize;
use sizer_core::config::CapacityPolicy;
use sizer_core::{CapacityPlan, CapacitySource, PerformanceTarget, ReferenceCatalog};
use tracing::debug;

/// Memory above which log capacity is pinned to [`LARGE_MEMORY_LOG_GIB`]
/// and shared capacity to [`MAX_SHARED_GIB`].
pub const LARGE_MEMORY_GIB: u32 = 1024;
pub const LARGE_MEMORY_LOG_GIB: f64 = 500.0;
pub const MAX_SHARED_GIB: u32 = 1024;

pub const DATA_MEMORY_FACTOR: f64 = 1.2;
pub const LOG_MEMORY_FACTOR: f64 = 0.5;

pub const LOG_DISK_COUNT: u32 = 2;

/// Per-disk minimums of the performance-configurable disk tier.
pub const MIN_DISK_IOPS: u32 = 3000;
pub const MIN_DISK_MBPS: u32 = 125;

/// Decide total data and log capacity for `sku`.
pub fn plan_capacity(
    sku: &str,
    memory_gib: u32,
    catalog: &ReferenceCatalog,
    policy: &CapacityPolicy,
) -> CapacityPlan {
    let published = catalog
        .get(sku)
        .and_then(|entry| Some((entry.disk("data")?, entry.disk("log")?)));

    if let Some((data, log)) = published {
        let total_data_gib = f64::from(data.count) * f64::from(data.size_gb);
        let mut total_log_gib = f64::from(log.count) * f64::from(log.size_gb);
        if policy.apply_log_floor_to_catalog && memory_gib > LARGE_MEMORY_GIB {
            total_log_gib = LARGE_MEMORY_LOG_GIB;
        }
        debug!(sku, total_data_gib, total_log_gib, "capacity from reference catalog");
        return CapacityPlan {
            total_data_gib,
            total_log_gib,
            source: CapacitySource::OfficialCatalog,
        };
    }

    let memory = f64::from(memory_gib);
    let total_log_gib = if memory_gib > LARGE_MEMORY_GIB {
        LARGE_MEMORY_LOG_GIB
    } else {
        memory * LOG_MEMORY_FACTOR
    };
    CapacityPlan {
        total_data_gib: memory * DATA_MEMORY_FACTOR,
        total_log_gib,
        source: CapacitySource::MemoryFormula,
    }
}

/// Number of data disks to stripe `total_data_gib` across.
pub fn data_disk_count(total_data_gib: f64) -> u32 {
    if total_data_gib < 2048.0 {
        2
    } else if total_data_gib < 8192.0 {
        4
    } else {
        8
    }
}

/// Per-disk figures for one striped volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StripeLayout {
    pub count: u32,
    pub size_gb: u32,
    pub iops: u32,
    pub throughput_mbps: u32,
}

impl StripeLayout {
    pub fn total_iops(&self) -> u64 {
        u64::from(self.count) * u64::from(self.iops)
    }

    pub fn total_throughput_mbps(&self) -> u64 {
        u64::from(self.count) * u64::from(self.throughput_mbps)
    }
}

/// Split a volume across `count` disks. Size rounds to nearest;
/// performance rounds up so the stripe never falls below the target,
/// then is raised to the per-disk minimum.
pub fn stripe(total_gib: f64, count: u32, target_iops: u32, target_mbps: u32) -> StripeLayout {
    let count = count.max(1);
    StripeLayout {
        count,
        size_gb: round_gib(total_gib / f64::from(count)),
        iops: target_iops.div_ceil(count).max(MIN_DISK_IOPS),
        throughput_mbps: target_mbps.div_ceil(count).max(MIN_DISK_MBPS),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VolumePlan {
    pub data: StripeLayout,
    pub log: StripeLayout,
}

/// Apply the striping policy to a capacity plan.
pub fn distribute(plan: &CapacityPlan, target: &PerformanceTarget) -> VolumePlan {
    VolumePlan {
        data: stripe(
            plan.total_data_gib,
            data_disk_count(plan.total_data_gib),
            target.data_iops,
            target.data_throughput_mbps,
        ),
        log: stripe(
            plan.total_log_gib,
            LOG_DISK_COUNT,
            target.log_iops,
            target.log_throughput_mbps,
        ),
    }
}

pub fn shared_size_gib(memory_gib: u32) -> u32 {
    memory_gib.min(MAX_SHARED_GIB)
}

/// Per-disk backup size.
pub fn backup_disk_size_gib(total_data_gib: f64, multiplier: f64, disk_count: u32) -> u32 {
    round_gib(total_data_gib * multiplier / f64::from(disk_count.max(1)))
}

pub(crate) fn round_gib(value: f64) -> u32 {
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizer_core::inventory::{CatalogDisk, CatalogEntry};

    fn make_catalog(sku: &str, disks: &[(&str, u32, u32)]) -> ReferenceCatalog {
        let mut catalog = ReferenceCatalog::default();
        catalog.insert(
            sku,
            CatalogEntry {
                role: Some("db".to_string()),
                storage: disks
                    .iter()
                    .map(|(name, count, size_gb)| CatalogDisk {
                        name: name.to_string(),
                        count: *count,
                        size_gb: *size_gb,
                    })
                    .collect(),
            },
        );
        catalog
    }

    #[test]
    fn catalog_path_multiplies_count_by_size() {
        let catalog = make_catalog("Standard_M64s", &[("data", 4, 512), ("log", 2, 256)]);
        let plan = plan_capacity("Standard_M64s", 1024, &catalog, &CapacityPolicy::default());
        assert_eq!(plan.source, CapacitySource::OfficialCatalog);
        assert_eq!(plan.total_data_gib, 2048.0);
        assert_eq!(plan.total_log_gib, 512.0);
    }

    #[test]
    fn catalog_entry_without_log_uses_formula() {
        let catalog = make_catalog("Standard_M64s", &[("data", 4, 512)]);
        let plan = plan_capacity("Standard_M64s", 1024, &catalog, &CapacityPolicy::default());
        assert_eq!(plan.source, CapacitySource::MemoryFormula);
        assert_eq!(plan.total_data_gib, 1024.0 * 1.2);
    }

    #[test]
    fn formula_path() {
        let plan = plan_capacity("Standard_E32ds_v5", 256, &ReferenceCatalog::default(), &CapacityPolicy::default());
        assert_eq!(plan.source, CapacitySource::MemoryFormula);
        assert_eq!(plan.total_data_gib, 256.0 * 1.2);
        assert_eq!(plan.total_log_gib, 128.0);
    }

    #[test]
    fn log_pinned_above_large_memory_only() {
        let empty = ReferenceCatalog::default();
        let policy = CapacityPolicy::default();
        assert_eq!(plan_capacity("a", 1024, &empty, &policy).total_log_gib, 512.0);
        assert_eq!(plan_capacity("a", 1025, &empty, &policy).total_log_gib, 500.0);
        assert_eq!(plan_capacity("a", 12000, &empty, &policy).total_log_gib, 500.0);
    }

    #[test]
    fn catalog_log_floor_is_opt_in() {
        let catalog = make_catalog("Standard_M128s", &[("data", 4, 1024), ("log", 2, 512)]);
        let off = plan_capacity("Standard_M128s", 2048, &catalog, &CapacityPolicy::default());
        assert_eq!(off.total_log_gib, 1024.0);

        let on = plan_capacity(
            "Standard_M128s",
            2048,
            &catalog,
            &CapacityPolicy { apply_log_floor_to_catalog: true },
        );
        assert_eq!(on.total_log_gib, 500.0);
        assert_eq!(on.source, CapacitySource::OfficialCatalog);
    }

    #[test]
    fn data_disk_count_thresholds() {
        assert_eq!(data_disk_count(0.0), 2);
        assert_eq!(data_disk_count(2047.9), 2);
        assert_eq!(data_disk_count(2048.0), 4);
        assert_eq!(data_disk_count(8191.0), 4);
        assert_eq!(data_disk_count(8192.0), 8);
        assert_eq!(data_disk_count(1e9), 8);
    }

    #[test]
    fn stripe_rounds_size_and_ceils_performance() {
        let layout = stripe(1228.8, 2, 12001, 801);
        assert_eq!(layout.size_gb, 614);
        assert_eq!(layout.iops, 6001);
        assert_eq!(layout.throughput_mbps, 401);
    }

    #[test]
    fn stripe_applies_floors() {
        let layout = stripe(100.0, 2, 3000, 200);
        assert_eq!(layout.iops, MIN_DISK_IOPS);
        assert_eq!(layout.throughput_mbps, MIN_DISK_MBPS);
    }

    #[test]
    fn stripes_cover_target_for_all_sizes() {
        let empty = ReferenceCatalog::default();
        let policy = CapacityPolicy::default();
        for memory in (16..32_000).step_by(37) {
            let plan = plan_capacity("x", memory, &empty, &policy);
            let target = crate::performance::resolve_performance(memory);
            let volumes = distribute(&plan, &target);

            assert!([2, 4, 8].contains(&volumes.data.count));
            assert_eq!(volumes.log.count, 2);
            assert!(volumes.data.total_iops() >= u64::from(target.data_iops));
            assert!(volumes.log.total_iops() >= u64::from(target.log_iops));
            assert!(volumes.data.total_throughput_mbps() >= u64::from(target.data_throughput_mbps));
            assert!(volumes.log.total_throughput_mbps() >= u64::from(target.log_throughput_mbps));
            assert!(volumes.data.iops >= MIN_DISK_IOPS && volumes.log.iops >= MIN_DISK_IOPS);
            assert!(volumes.data.throughput_mbps >= MIN_DISK_MBPS);
        }
    }

    #[test]
    fn shared_is_capped() {
        assert_eq!(shared_size_gib(512), 512);
        assert_eq!(shared_size_gib(1024), 1024);
        assert_eq!(shared_size_gib(11400), 1024);
    }

    #[test]
    fn backup_size_per_disk() {
        assert_eq!(backup_disk_size_gib(12000.0, 2.0, 4), 6000);
        assert_eq!(backup_disk_size_gib(1228.8, 2.0, 4), 614);
    }
}
