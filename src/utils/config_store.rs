//! ConfigStore - Local Configuration Storage

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Serialize, de::DeserializeOwned};

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "xdash.toml";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("org", "Team488", "XDash")
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

/// Get the application config directory, creating it if needed
pub fn app_config_dir() -> Result<PathBuf> {
    let dir = project_dirs()?.config_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating config directory {}", dir.display()))?;
    Ok(dir)
}

/// Get the application data directory (logs), creating it if needed
pub fn app_data_dir() -> Result<PathBuf> {
    let dir = project_dirs()?.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating data directory {}", dir.display()))?;
    Ok(dir)
}

/// Default location of the config file
pub fn config_path() -> Result<PathBuf> {
    Ok(app_config_dir()?.join(CONFIG_FILE))
}

/// Load a TOML config file. A missing file is written out with
/// `T::default()` so it can be edited; failing to write it is an error.
pub fn load_or_init<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Serialize + Default,
{
    if !path.exists() {
        let config = T::default();
        save_config(path, &config)
            .with_context(|| format!("writing default config to {}", path.display()))?;
        return Ok(config);
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: T =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// Save a TOML config file
pub fn save_config<T: Serialize>(path: &Path, config: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
