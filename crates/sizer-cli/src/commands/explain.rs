use std::path::Path;

use sizer_core::{ReferenceCatalog, SizingConfig, Tier};
use sizer_engine::{ConfigurationAssembler, MemoryResolver};

pub fn explain(sku: &str, catalog: Option<&str>, config: Option<&str>) -> anyhow::Result<()> {
    println!("{}", render(sku, catalog, config)?);
    Ok(())
}

fn render(sku: &str, catalog: Option<&str>, config: Option<&str>) -> anyhow::Result<String> {
    let config = SizingConfig::load(config.map(Path::new))?;
    let catalog = match catalog {
        Some(path) => ReferenceCatalog::from_file(Path::new(path))?,
        None => ReferenceCatalog::default(),
    };
    let memory = MemoryResolver::new().with_facts(&config.memory.facts);
    let assembly = ConfigurationAssembler::new(&config, &catalog, &memory).assemble(Tier::Db, sku);

    let mut out = String::new();
    out.push_str(&format!("SKU:      {sku}\n"));
    out.push_str(&format!(
        "Memory:   {} GiB ({:?})\n",
        assembly.memory.memory_gib, assembly.memory.source
    ));
    if let Some(sizing) = &assembly.database {
        let t = &sizing.target;
        out.push_str(&format!(
            "Target:   data {} IOPS / {} MB/s, log {} IOPS / {} MB/s\n",
            t.data_iops, t.data_throughput_mbps, t.log_iops, t.log_throughput_mbps
        ));
        out.push_str(&format!(
            "Capacity: data {:.1} GiB, log {:.1} GiB ({:?})\n",
            sizing.plan.total_data_gib, sizing.plan.total_log_gib, sizing.plan.source
        ));
    }
    out.push_str("\nStorage:\n");
    for g in &assembly.configuration.storage {
        out.push_str(&format!(
            "  {:<7} {} x {:>5} GiB  {:<14} {:<9}",
            g.role.as_str(),
            g.count,
            g.size_gb,
            g.disk_type.as_str(),
            g.caching.as_str()
        ));
        if let (Some(iops), Some(mbps)) = (g.iops, g.throughput_mbps) {
            out.push_str(&format!("  {iops} IOPS / {mbps} MB/s per disk"));
        }
        if let Some(lun) = g.lun_start {
            out.push_str(&format!("  LUN {lun}"));
        }
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explains_fact_table_sku() {
        let out = render("Standard_M64s", None, None).unwrap();
        assert!(out.contains("Memory:   1024 GiB (FactTable)"));
        assert!(out.contains("MemoryFormula"));
        assert!(out.contains("data    2 x   614 GiB"));
    }

    #[test]
    fn explains_unknown_sku_with_fallback() {
        let out = render("Standard_L8s_v3", None, None).unwrap();
        assert!(out.contains("256 GiB (Fallback)"));
    }
}
