//! Configuration assembly: builds the disk layout for one (tier, SKU).
//!
//! The database tier gets six disk groups in a fixed order:
//! os, data, log, shared, sap, backup. Every other tier gets os and sap.

use serde::Serialize;
use sizer_core::config::DiskPolicy;
use sizer_core::{
    CapacityPlan, Caching, ComputeProfile, DiskGroup, DiskType, PerformanceTarget,
    ReferenceCatalog, SizingConfig, StorageRole, SystemConfiguration, Tier,
};
use tracing::info;

use crate::capacity::{self, StripeLayout, VolumePlan};
use crate::memory::{MemoryResolution, MemoryResolver};
use crate::performance::resolve_performance;

pub const DATA_LUN_START: u32 = 0;
pub const LOG_LUN_START: u32 = 10;
pub const SHARED_LUN: u32 = 20;
pub const SAP_BINARIES_LUN: u32 = 30;
pub const BACKUP_LUN_START: u32 = 40;

/// Intermediate sizing figures behind a database-tier layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseSizing {
    pub target: PerformanceTarget,
    pub plan: CapacityPlan,
    pub volumes: VolumePlan,
    pub shared_gib: u32,
    pub backup_disk_gib: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub memory: MemoryResolution,
    pub database: Option<DatabaseSizing>,
    pub configuration: SystemConfiguration,
}

pub struct ConfigurationAssembler<'a> {
    config: &'a SizingConfig,
    catalog: &'a ReferenceCatalog,
    memory: &'a MemoryResolver,
}

impl<'a> ConfigurationAssembler<'a> {
    pub fn new(
        config: &'a SizingConfig,
        catalog: &'a ReferenceCatalog,
        memory: &'a MemoryResolver,
    ) -> Self {
        Self { config, catalog, memory }
    }

    pub fn assemble(&self, tier: Tier, sku: &str) -> Assembly {
        let memory = self.memory.resolve(sku);
        let compute = ComputeProfile {
            vm_size: sku.to_string(),
            accelerated_networking: self.config.compute.accelerated_networking,
        };
        let disks = &self.config.disks;

        if !tier.is_database() {
            let storage = vec![
                os_group(disks),
                fixed_group(
                    StorageRole::SapBinaries,
                    disks.sap_binaries_disk_type,
                    disks.sap_binaries_size_gb,
                    0,
                ),
            ];
            return Assembly {
                memory,
                database: None,
                configuration: SystemConfiguration { compute, storage },
            };
        }

        let sizing = self.size_database(sku, memory.memory_gib);
        info!(
            sku,
            memory_gib = memory.memory_gib,
            source = ?sizing.plan.source,
            data_disks = sizing.volumes.data.count,
            "sized database tier"
        );

        let storage = vec![
            os_group(disks),
            striped_group(
                StorageRole::Data,
                disks.performance_disk_type,
                &sizing.volumes.data,
                DATA_LUN_START,
            ),
            striped_group(
                StorageRole::Log,
                disks.performance_disk_type,
                &sizing.volumes.log,
                LOG_LUN_START,
            ),
            fixed_group(StorageRole::Shared, disks.shared_disk_type, sizing.shared_gib, SHARED_LUN),
            fixed_group(
                StorageRole::SapBinaries,
                disks.sap_binaries_disk_type,
                disks.sap_binaries_size_gb,
                SAP_BINARIES_LUN,
            ),
            DiskGroup {
                count: disks.backup_disk_count,
                ..fixed_group(
                    StorageRole::Backup,
                    disks.backup_disk_type,
                    sizing.backup_disk_gib,
                    BACKUP_LUN_START,
                )
            },
        ];

        Assembly {
            memory,
            database: Some(sizing),
            configuration: SystemConfiguration { compute, storage },
        }
    }

    fn size_database(&self, sku: &str, memory_gib: u32) -> DatabaseSizing {
        let target = resolve_performance(memory_gib);
        let plan = capacity::plan_capacity(sku, memory_gib, self.catalog, &self.config.capacity);
        let volumes = capacity::distribute(&plan, &target);
        DatabaseSizing {
            target,
            plan,
            volumes,
            shared_gib: capacity::shared_size_gib(memory_gib),
            backup_disk_gib: capacity::backup_disk_size_gib(
                plan.total_data_gib,
                self.config.disks.backup_multiplier,
                self.config.disks.backup_disk_count,
            ),
        }
    }
}

fn os_group(disks: &DiskPolicy) -> DiskGroup {
    DiskGroup {
        role: StorageRole::Os,
        fullname: String::new(),
        count: 1,
        disk_type: disks.os_disk_type,
        size_gb: disks.os_size_gb,
        caching: Caching::ReadWrite,
        write_accelerator: false,
        lun_start: None,
        iops: None,
        throughput_mbps: None,
    }
}

fn fixed_group(role: StorageRole, disk_type: DiskType, size_gb: u32, lun: u32) -> DiskGroup {
    DiskGroup {
        role,
        fullname: String::new(),
        count: 1,
        disk_type,
        size_gb,
        caching: Caching::None,
        write_accelerator: false,
        lun_start: Some(lun),
        iops: None,
        throughput_mbps: None,
    }
}

fn striped_group(role: StorageRole, disk_type: DiskType, layout: &StripeLayout, lun: u32) -> DiskGroup {
    let configurable = disk_type.is_performance_configurable();
    DiskGroup {
        role,
        fullname: String::new(),
        count: layout.count,
        disk_type,
        size_gb: layout.size_gb,
        caching: Caching::None,
        write_accelerator: false,
        lun_start: Some(lun),
        iops: configurable.then_some(layout.iops),
        throughput_mbps: configurable.then_some(layout.throughput_mbps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizer_core::CapacitySource;

    fn assemble(tier: Tier, sku: &str) -> Assembly {
        let config = SizingConfig::default();
        let catalog = ReferenceCatalog::default();
        let memory = MemoryResolver::new();
        ConfigurationAssembler::new(&config, &catalog, &memory).assemble(tier, sku)
    }

    #[test]
    fn database_layout_order() {
        let a = assemble(Tier::Db, "Standard_M64s");
        assert_eq!(
            a.configuration.roles(),
            vec![
                StorageRole::Os,
                StorageRole::Data,
                StorageRole::Log,
                StorageRole::Shared,
                StorageRole::SapBinaries,
                StorageRole::Backup,
            ]
        );
    }

    #[test]
    fn non_database_layout() {
        for tier in [Tier::App, Tier::Scs, Tier::Scsha, Tier::Web] {
            let a = assemble(tier, "Standard_D8s_v5");
            assert_eq!(a.configuration.roles(), vec![StorageRole::Os, StorageRole::SapBinaries]);
            let sap = a.configuration.disk_group(StorageRole::SapBinaries).unwrap();
            assert_eq!(sap.lun_start, Some(0));
            assert_eq!(sap.size_gb, 128);
            assert!(a.database.is_none());
        }
    }

    #[test]
    fn database_luns_and_caching() {
        let a = assemble(Tier::Db, "Standard_M64s");
        let c = &a.configuration;
        let os = c.disk_group(StorageRole::Os).unwrap();
        assert_eq!((os.count, os.size_gb, os.caching), (1, 256, Caching::ReadWrite));
        assert_eq!(os.lun_start, None);

        let luns: Vec<Option<u32>> = c.storage.iter().skip(1).map(|g| g.lun_start).collect();
        assert_eq!(luns, vec![Some(0), Some(10), Some(20), Some(30), Some(40)]);
        assert!(c.storage.iter().skip(1).all(|g| g.caching == Caching::None));
    }

    #[test]
    fn performance_fields_only_on_configurable_disks() {
        let a = assemble(Tier::Db, "Standard_M64s");
        for group in &a.configuration.storage {
            let configurable = group.disk_type.is_performance_configurable();
            assert_eq!(group.iops.is_some(), configurable, "{}", group.role);
            assert_eq!(group.throughput_mbps.is_some(), configurable, "{}", group.role);
        }
    }

    #[test]
    fn backup_is_zone_redundant_and_distinct() {
        let a = assemble(Tier::Db, "Standard_M64s");
        let backup = a.configuration.disk_group(StorageRole::Backup).unwrap();
        let data = a.configuration.disk_group(StorageRole::Data).unwrap();
        assert_eq!(backup.disk_type, DiskType::PremiumZrs);
        assert_ne!(backup.disk_type, data.disk_type);
        assert_eq!(backup.count, 4);
    }

    #[test]
    fn compute_defaults() {
        let a = assemble(Tier::Web, "Standard_D4s_v5");
        assert_eq!(a.configuration.compute.vm_size, "Standard_D4s_v5");
        assert!(a.configuration.compute.accelerated_networking);
    }

    #[test]
    fn serialized_compute_precedes_storage() {
        let a = assemble(Tier::Db, "Standard_M64s");
        let json = serde_json::to_string(&a.configuration).unwrap();
        assert!(json.find("\"compute\"").unwrap() < json.find("\"storage\"").unwrap());
    }

    #[test]
    fn database_sizing_recorded() {
        let a = assemble(Tier::Db, "Standard_M64s");
        let sizing = a.database.unwrap();
        assert_eq!(sizing.plan.source, CapacitySource::MemoryFormula);
        assert_eq!(sizing.shared_gib, 1024);
    }
}
