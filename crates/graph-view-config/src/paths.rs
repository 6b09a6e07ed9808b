//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/graph-view/`, `~/.cache/graph-view/`
//! - macOS: `~/Library/Application Support/graph-view/`, `~/Library/Caches/graph-view/`
//! - Windows: `%APPDATA%\graph-view\`, `%LOCALAPPDATA%\graph-view\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "graph-view";

/// Get the application config directory, creating it when missing
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the application cache directory, creating it when missing
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get path to the persisted extension state file
pub fn state_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("state.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_exists() {
        let dir = config_dir().unwrap();
        assert!(dir.exists());
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_state_path() {
        let path = state_path().unwrap();
        assert!(path.ends_with("state.json"));
    }
}
