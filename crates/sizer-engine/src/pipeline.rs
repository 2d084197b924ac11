//! Per-system sizing pipeline and the run over a whole landscape.
//!
//! Each (system, tier) pair is sized independently, so the pairs fan out
//! across the rayon pool. Results are collected in input order and merged
//! by a single writer, which keeps first-seen deduplication deterministic.

use rayon::prelude::*;
use serde::Serialize;
use sizer_core::{
    CandidateSystem, MasterCatalog, OverrideDocument, ReferenceCatalog, SizingConfig,
    SystemConfiguration, SystemKey, Tier,
};
use tracing::info;

use crate::aggregate::CatalogAggregator;
use crate::assembler::{ConfigurationAssembler, DatabaseSizing};
use crate::memory::{MemoryResolution, MemoryResolver};
use crate::overrides::{OverrideOutcome, apply_overrides};

/// Everything computed for one (system, tier) pair.
#[derive(Debug, Clone, Serialize)]
pub struct SystemRecord {
    pub moniker: String,
    pub environment: String,
    pub tier: Tier,
    pub sku: String,
    pub memory: MemoryResolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseSizing>,
    pub overrides: OverrideOutcome,
    /// Whether this record's configuration made it into the catalog.
    pub retained: bool,
    #[serde(skip)]
    pub configuration: SystemConfiguration,
}

#[derive(Debug)]
pub struct SizingRun {
    pub catalog: MasterCatalog,
    pub records: Vec<SystemRecord>,
}

impl SizingRun {
    pub fn duplicates(&self) -> usize {
        self.records.iter().filter(|r| !r.retained).count()
    }
}

pub struct Sizer<'a> {
    config: &'a SizingConfig,
    catalog: &'a ReferenceCatalog,
    overrides: &'a OverrideDocument,
    memory: MemoryResolver,
}

impl<'a> Sizer<'a> {
    pub fn new(
        config: &'a SizingConfig,
        catalog: &'a ReferenceCatalog,
        overrides: &'a OverrideDocument,
    ) -> Self {
        Self {
            config,
            catalog,
            overrides,
            memory: MemoryResolver::new().with_facts(&config.memory.facts),
        }
    }

    pub fn memory(&self) -> &MemoryResolver {
        &self.memory
    }

    /// Size one (system, tier) pair and apply its overrides.
    pub fn size_system(&self, system: &CandidateSystem, tier: Tier, sku: &str) -> SystemRecord {
        let key = SystemKey::new(&system.moniker, tier);
        let assembler = ConfigurationAssembler::new(self.config, self.catalog, &self.memory);
        let assembly = assembler.assemble(tier, sku);

        let mut configuration = assembly.configuration;
        let overrides = apply_overrides(&key, &mut configuration, &self.overrides.for_system(&key));

        SystemRecord {
            moniker: system.moniker.clone(),
            environment: system.environment.clone(),
            tier,
            sku: sku.to_string(),
            memory: assembly.memory,
            database: assembly.database,
            overrides,
            retained: false,
            configuration,
        }
    }

    /// Size every system in `systems` and build the master catalog.
    pub fn run(&self, systems: &[CandidateSystem]) -> SizingRun {
        let jobs: Vec<(&CandidateSystem, Tier, &str)> = systems
            .iter()
            .flat_map(|s| s.skus.iter().map(move |(tier, sku)| (s, *tier, sku.as_str())))
            .collect();

        let mut records: Vec<SystemRecord> = jobs
            .par_iter()
            .map(|(system, tier, sku)| self.size_system(system, *tier, sku))
            .collect();

        let mut aggregator = CatalogAggregator::new();
        for record in &mut records {
            record.retained = aggregator.insert(record.tier, &record.sku, record.configuration.clone());
        }

        info!(
            systems = systems.len(),
            configurations = records.len() - aggregator.duplicates(),
            duplicates = aggregator.duplicates(),
            "sizing run complete"
        );

        SizingRun { catalog: aggregator.finish(), records }
    }
}
