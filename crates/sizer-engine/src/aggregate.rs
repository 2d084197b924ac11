//! Single-writer merge of per-system configurations into the master catalog.

use sizer_core::{MasterCatalog, SystemConfiguration, Tier};
use tracing::debug;

/// Collects configurations keyed by (tier, SKU). The first configuration
/// seen for a key wins; later ones are dropped.
#[derive(Debug, Default)]
pub struct CatalogAggregator {
    catalog: MasterCatalog,
    duplicates: usize,
}

impl CatalogAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when `sku` was already present in the tier bucket.
    pub fn insert(&mut self, tier: Tier, sku: &str, config: SystemConfiguration) -> bool {
        let bucket = self.catalog.bucket_mut(tier);
        if bucket.contains_key(sku) {
            debug!(tier = %tier, sku, "duplicate SKU, keeping first configuration");
            self.duplicates += 1;
            return false;
        }
        bucket.insert(sku.to_string(), config);
        true
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn finish(self) -> MasterCatalog {
        self.catalog
    }
}
