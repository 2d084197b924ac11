//! `sizer init-config`: write the default policy file.

use std::path::Path;

use anyhow::bail;
use sizer_core::SizingConfig;

pub fn init_config(path: &str) -> anyhow::Result<()> {
    let output = Path::new(path);
    if output.exists() {
        bail!("{} already exists", output.display());
    }
    std::fs::write(output, SizingConfig::default().to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_loadable_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sizer.toml");
        let path_str = path.to_string_lossy().into_owned();

        init_config(&path_str).unwrap();
        assert_eq!(SizingConfig::from_file(&path).unwrap(), SizingConfig::default());

        assert!(init_config(&path_str).is_err());
    }
}
