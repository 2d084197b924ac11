//! Landscape sizer engine: per-VM storage and compute configuration.
//!
//! Given a SKU and a tier, this crate resolves the VM's memory, the
//! published performance target for that memory, the data/log capacity
//! and its striping across disks, and assembles the full disk layout.
//! Overrides are applied last, field by field.
//!
//! # Components
//!
//! - **`memory`**: SKU → memory (fact table, series estimate, fallback)
//! - **`performance`**: memory → data/log IOPS and throughput target
//! - **`capacity`**: catalog-or-formula capacity, striping, per-disk figures
//! - **`assembler`**: disk layout per tier
//! - **`overrides`**: `<section>_<property>_override` directives
//! - **`aggregate`**: deduplicating merge into the master catalog
//! - **`pipeline`**: per-system pipeline and parallel landscape run

pub mod aggregate;
pub mod assembler;
pub mod capacity;
pub mod memory;
pub mod overrides;
pub mod performance;
pub mod pipeline;
pub mod report;

pub use aggregate::CatalogAggregator;
pub use assembler::{Assembly, ConfigurationAssembler, DatabaseSizing};
pub use capacity::{StripeLayout, VolumePlan, data_disk_count, distribute, plan_capacity};
pub use memory::{MemoryResolution, MemoryResolver, MemorySource};
pub use overrides::{Directive, OverrideOutcome, SkipReason, apply_overrides, parse_directive};
pub use performance::resolve_performance;
pub use pipeline::{Sizer, SizingRun, SystemRecord};
