use std::path::Path;

use anyhow::{Context, Result};

use super::Config;

/// File name looked up in the project directory.
pub const CONFIG_FILE: &str = ".postroj.yaml";

/// Load config from a `.postroj.yaml` file in the given directory.
///
/// A missing file is not an error; defaults are returned instead.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("invalid config in {}", path.display()))?;
    Ok(config)
}
