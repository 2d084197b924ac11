//! VM SKU → memory capacity resolution.
//!
//! Lookup order: curated fact table, then a per-series estimate from the
//! core count embedded in the SKU name, then a fixed fallback. Resolution
//! never fails; an unknown SKU always yields an estimate.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// Memory assumed when neither the table nor a series pattern matches.
pub const FALLBACK_MEMORY_GIB: u32 = 256;

/// GiB per vCPU for the memory-optimized M series.
pub const M_SERIES_GIB_PER_CORE: u32 = 20;

/// GiB per vCPU for the E series.
pub const E_SERIES_GIB_PER_CORE: u32 = 8;

/// Known SKUs and their memory in GiB.
static MEMORY_FACTS: &[(&str, u32)] = &[
    // General purpose (application tiers).
    ("Standard_D4s_v5", 16),
    ("Standard_D8s_v5", 32),
    ("Standard_D16s_v5", 64),
    ("Standard_D32s_v5", 128),
    ("Standard_D4ds_v5", 16),
    ("Standard_D8ds_v5", 32),
    ("Standard_D16ds_v5", 64),
    // E series.
    ("Standard_E4ds_v5", 32),
    ("Standard_E8ds_v5", 64),
    ("Standard_E16ds_v5", 128),
    ("Standard_E20ds_v5", 160),
    ("Standard_E32ds_v5", 256),
    ("Standard_E48ds_v5", 384),
    ("Standard_E64ds_v5", 512),
    ("Standard_E96ds_v5", 672),
    ("Standard_E104ids_v5", 672),
    ("Standard_E20ds_v4", 160),
    ("Standard_E32ds_v4", 256),
    ("Standard_E48ds_v4", 384),
    ("Standard_E64ds_v4", 504),
    ("Standard_E64s_v3", 432),
    // M series, first generation.
    ("Standard_M32ts", 192),
    ("Standard_M32ls", 256),
    ("Standard_M64ls", 512),
    ("Standard_M64s", 1024),
    ("Standard_M64ms", 1792),
    ("Standard_M128s", 2048),
    ("Standard_M128ms", 3892),
    // Mv2.
    ("Standard_M32dms_v2", 875),
    ("Standard_M64ds_v2", 1024),
    ("Standard_M64dms_v2", 1792),
    ("Standard_M128ds_v2", 2048),
    ("Standard_M128dms_v2", 3892),
    ("Standard_M192ids_v2", 2048),
    ("Standard_M192idms_v2", 4096),
    ("Standard_M208s_v2", 2850),
    ("Standard_M208ms_v2", 5700),
    ("Standard_M416s_v2", 5700),
    ("Standard_M416s_8_v2", 7600),
    ("Standard_M416ms_v2", 11400),
    ("Standard_M832ixs", 14902),
    ("Standard_M832ixs_v2", 23088),
    // Mv3.
    ("Standard_M176ds_3_v3", 2794),
    ("Standard_M176ds_4_v3", 3892),
    ("Standard_M624ds_12_v3", 11400),
    ("Standard_M832ds_12_v3", 11400),
    ("Standard_M832ids_16_v3", 15200),
    ("Standard_M832is_16_v3", 15200),
    ("Standard_M896ixds_32_v3", 30400),
    ("Standard_M1792ixds_32_v3", 30400),
];

static FACT_INDEX: LazyLock<HashMap<&'static str, u32>> =
    LazyLock::new(|| MEMORY_FACTS.iter().copied().collect());

/// Series letter followed by the leading core-count digits.
static SERIES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:standard_)?([a-z])(\d+)").expect("series pattern is a valid regex")
});

/// How a memory figure was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorySource {
    FactTable,
    SeriesEstimate,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryResolution {
    pub memory_gib: u32,
    pub source: MemorySource,
}

/// Resolves SKUs against the built-in fact table plus any extra facts
/// supplied by the caller. Extra facts take precedence.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    extra: HashMap<String, u32>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: register an exact memory figure for a SKU.
    pub fn with_fact(mut self, sku: &str, memory_gib: u32) -> Self {
        self.extra.insert(sku.to_string(), memory_gib);
        self
    }

    pub fn with_facts<'a>(mut self, facts: impl IntoIterator<Item = (&'a String, &'a u32)>) -> Self {
        self.extra.extend(facts.into_iter().map(|(k, v)| (k.clone(), *v)));
        self
    }

    pub fn resolve(&self, sku: &str) -> MemoryResolution {
        if let Some(&memory_gib) = self.extra.get(sku).or_else(|| FACT_INDEX.get(sku)) {
            return MemoryResolution { memory_gib, source: MemorySource::FactTable };
        }

        if let Some(memory_gib) = estimate_from_series(sku) {
            debug!(sku, memory_gib, "estimated memory from SKU series");
            return MemoryResolution { memory_gib, source: MemorySource::SeriesEstimate };
        }

        debug!(sku, memory_gib = FALLBACK_MEMORY_GIB, "unrecognised SKU, using fallback memory");
        MemoryResolution { memory_gib: FALLBACK_MEMORY_GIB, source: MemorySource::Fallback }
    }

    pub fn memory_gib(&self, sku: &str) -> u32 {
        self.resolve(sku).memory_gib
    }
}

fn estimate_from_series(sku: &str) -> Option<u32> {
    let caps = SERIES_RE.captures(sku)?;
    let per_core = match caps[1].to_ascii_uppercase().as_str() {
        "M" => M_SERIES_GIB_PER_CORE,
        "E" => E_SERIES_GIB_PER_CORE,
        _ => return None,
    };
    let cores: u32 = caps[2].parse().ok()?;
    cores.checked_mul(per_core)
}
