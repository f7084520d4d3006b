use std::fs;
use std::path::{Path, PathBuf};

use bizfin_core::EngineConfig;

/// Config picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "bizfin.toml";

pub fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Load engine defaults from TOML. A missing file yields the built-in
/// defaults; an unreadable or malformed one is an error.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_path);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(EngineConfig::default());
    }
    let data = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
    let config = parse_config(&data)
        .map_err(|e| format!("Failed to parse config '{}': {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), ?config, "config loaded");
    Ok(config)
}

pub fn parse_config(data: &str) -> Result<EngineConfig, toml::de::Error> {
    toml::from_str(data)
}
