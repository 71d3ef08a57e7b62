//! Init command - write an example asymptote.toml

use anyhow::{Context, Result};
use asymptote::config::{AnalysisConfig, PROJECT_CONFIG_FILE};
use console::style;
use std::path::Path;

/// Run the init command
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let dir = dir
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", dir.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join(PROJECT_CONFIG_FILE);
    if config_path.exists() && !force {
        println!(
            "{} Config already exists at {} (use --force to overwrite)",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, AnalysisConfig::example_toml())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), false).unwrap();
        let written = std::fs::read_to_string(dir.path().join(PROJECT_CONFIG_FILE)).unwrap();
        assert_eq!(written, AnalysisConfig::example_toml());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROJECT_CONFIG_FILE);
        std::fs::write(&path, "runs = 9\n").unwrap();

        run(dir.path(), false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "runs = 9\n");

        run(dir.path(), true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), AnalysisConfig::example_toml());
    }
}
