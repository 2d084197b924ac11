use std::path::Path;

use anyhow::{Context, bail};
use sizer_core::{OverrideDocument, ReferenceCatalog, SizingConfig, load_candidates};
use sizer_engine::{Sizer, SizingRun, report};
use tracing::info;

pub struct GenerateArgs {
    pub systems: String,
    pub catalog: Option<String>,
    pub overrides: Option<String>,
    pub config: Option<String>,
    pub output: Option<String>,
    pub report: String,
    pub jobs: usize,
}

pub fn generate(args: &GenerateArgs) -> anyhow::Result<()> {
    if !matches!(args.report.as_str(), "text" | "json" | "none") {
        bail!("unknown report format {:?} (expected text, json or none)", args.report);
    }

    let run = size_landscape(args)?;
    let rendered = run.catalog.to_json_pretty()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered).with_context(|| format!("writing {path}"))?;
            info!(path = %path, configurations = run.catalog.len(), "wrote master catalog");
        }
        None => println!("{rendered}"),
    }

    match args.report.as_str() {
        "json" => eprintln!("{}", report::report_json(&run)?),
        "text" => eprintln!("{}", report::format_report(&run)),
        _ => {}
    }

    Ok(())
}

/// Load every input document and run the sizer over the landscape.
pub fn size_landscape(args: &GenerateArgs) -> anyhow::Result<SizingRun> {
    let config = SizingConfig::load(args.config.as_deref().map(Path::new))?;
    let systems = load_candidates(Path::new(&args.systems))?;
    let catalog = match &args.catalog {
        Some(path) => ReferenceCatalog::from_file(Path::new(path))?,
        None => ReferenceCatalog::default(),
    };
    let overrides = match &args.overrides {
        Some(path) => OverrideDocument::from_file(Path::new(path))?,
        None => OverrideDocument::default(),
    };

    info!(
        systems = systems.len(),
        catalog_entries = catalog.len(),
        "sizing landscape"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs)
        .build()
        .context("building worker pool")?;
    let sizer = Sizer::new(&config, &catalog, &overrides);
    Ok(pool.install(|| sizer.run(&systems)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizer_core::{StorageRole, Tier};

    fn write(dir: &Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn args(systems: String) -> GenerateArgs {
        GenerateArgs {
            systems,
            catalog: None,
            overrides: None,
            config: None,
            output: None,
            report: "none".to_string(),
            jobs: 2,
        }
    }

    #[test]
    fn sizes_landscape_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let systems = write(
            dir.path(),
            "systems.json",
            r#"[
                { "moniker": "X00", "environment": "prod",
                  "skus": { "db": "Standard_M64s", "app": "Standard_D8s_v5", "web": "Standard_D4s_v5" } },
                { "moniker": "X01", "environment": "qa",
                  "skus": { "db": "Standard_M64s" } }
            ]"#,
        );
        let catalog = write(
            dir.path(),
            "catalog.json",
            r#"{ "Standard_M64s": { "role": "db", "storage": [
                { "name": "data", "count": 4, "size_gb": 512 },
                { "name": "log", "count": 2, "size_gb": 256 } ] } }"#,
        );
        let overrides = write(
            dir.path(),
            "overrides.json",
            r#"{ "X00": { "db": { "storage_log_caching_override": "ReadOnly" } } }"#,
        );

        let mut a = args(systems);
        a.catalog = Some(catalog);
        a.overrides = Some(overrides);
        let run = size_landscape(&a).unwrap();

        assert_eq!(run.catalog.len(), 3);
        assert_eq!(run.duplicates(), 1);
        let db = run.catalog.get(Tier::Db, "Standard_M64s").unwrap();
        let data = db.disk_group(StorageRole::Data).unwrap();
        assert_eq!((data.count, data.size_gb), (4, 512));
        assert_eq!(
            db.disk_group(StorageRole::Log).unwrap().caching,
            sizer_core::Caching::ReadOnly
        );
    }

    #[test]
    fn writes_catalog_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let systems = write(
            dir.path(),
            "systems.json",
            r#"[{ "moniker": "X00", "skus": { "scsha": "Standard_E16ds_v5" } }]"#,
        );
        let output = dir.path().join("custom_sizes.json");
        let mut a = args(systems);
        a.output = Some(output.to_string_lossy().into_owned());
        generate(&a).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert!(written["scsha"]["Standard_E16ds_v5"]["compute"].is_object());
        assert!(written["db"].as_object().unwrap().is_empty());
    }

    #[test]
    fn missing_systems_file_is_fatal() {
        let err = size_landscape(&args("/nonexistent/systems.json".to_string())).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/systems.json"));
    }

    #[test]
    fn rejects_unknown_report_format() {
        let mut a = args("unused.json".to_string());
        a.report = "yaml".to_string();
        assert!(generate(&a).is_err());
    }
}
