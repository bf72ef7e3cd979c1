use std::path::Path;

use anyhow::{bail, Result};

use vitrine_core::AppConfig;

pub fn run(config: &AppConfig, path: &Path, init: bool, show_path: bool) -> Result<()> {
    if show_path {
        println!("{}", path.display());
        return Ok(());
    }

    if init {
        if path.exists() {
            bail!(
                "{} already exists; remove it first to regenerate the defaults",
                path.display()
            );
        }
        AppConfig::default().save_to(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    print!("{}", config.to_toml()?);
    Ok(())
}
