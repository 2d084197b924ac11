//! Human-readable sizing report.

use sizer_core::{StorageRole, Tier};

use crate::overrides::SkipReason;
use crate::pipeline::SizingRun;

pub fn format_report(run: &SizingRun) -> String {
    let mut out = String::new();

    let total = run.records.len();
    let duplicates = run.duplicates();
    let skipped: usize = run.records.iter().map(|r| r.overrides.skipped.len()).sum();
    let applied: usize = run.records.iter().map(|r| r.overrides.applied.len()).sum();

    out.push_str("\n╔══════════════════════════════════════════╗\n");
    out.push_str("║  Landscape Sizing Report                 ║\n");
    out.push_str("╠══════════════════════════════════════════╣\n");
    out.push_str(&format!("║  Systems sized:  {:<24}║\n", total));
    out.push_str(&format!("║  Configurations: {:<24}║\n", run.catalog.len()));
    out.push_str(&format!("║  Duplicates:     {:<24}║\n", duplicates));
    out.push_str(&format!("║  Overrides:      {:<24}║\n", format!("{applied} applied, {skipped} skipped")));
    out.push_str("╚══════════════════════════════════════════╝\n\n");

    for tier in Tier::ALL {
        let bucket = run.catalog.bucket(tier);
        out.push_str(&format!("{} ({} SKUs):\n", tier.as_str().to_uppercase(), bucket.len()));
        for (sku, config) in bucket {
            let disks: Vec<String> = config
                .storage
                .iter()
                .map(|g| format!("{}={}x{}", g.role, g.count, g.size_gb))
                .collect();
            out.push_str(&format!("  • {sku}: {}\n", disks.join(" ")));
        }
        out.push('\n');
    }

    let database: Vec<_> = run
        .records
        .iter()
        .filter(|r| r.retained)
        .filter_map(|r| r.database.as_ref().map(|d| (r, d)))
        .collect();
    if !database.is_empty() {
        out.push_str("DATABASE SIZING:\n\n");
        for (record, sizing) in database {
            out.push_str(&format!("  {} ({})\n", record.sku, record.moniker));
            out.push_str(&format!(
                "     Memory:   {} GiB ({:?})\n",
                record.memory.memory_gib, record.memory.source
            ));
            out.push_str(&format!(
                "     Capacity: data {:.0} GiB, log {:.0} GiB ({:?})\n",
                sizing.plan.total_data_gib, sizing.plan.total_log_gib, sizing.plan.source
            ));
            out.push_str(&format!(
                "     Target:   data {} IOPS / {} MB/s, log {} IOPS / {} MB/s\n",
                sizing.target.data_iops,
                sizing.target.data_throughput_mbps,
                sizing.target.log_iops,
                sizing.target.log_throughput_mbps
            ));
            if let Some(data) = record.configuration.disk_group(StorageRole::Data) {
                out.push_str(&format!("     Data:     {} disks\n", data.count));
            }
            out.push('\n');
        }
    }

    let rejected: Vec<_> = run
        .records
        .iter()
        .flat_map(|r| r.overrides.skipped.iter().map(move |s| (r, s)))
        .filter(|(_, s)| s.reason != SkipReason::EmptyValue)
        .collect();
    if !rejected.is_empty() {
        out.push_str("⚠️  SKIPPED OVERRIDES:\n\n");
        for (record, skipped) in rejected {
            out.push_str(&format!(
                "  • {}/{} {}: {}\n",
                record.moniker, record.tier, skipped.key, skipped.reason
            ));
        }
        out.push('\n');
    }

    out
}

/// Per-system records as pretty JSON, for machine consumption.
pub fn report_json(run: &SizingRun) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&run.records)
}
