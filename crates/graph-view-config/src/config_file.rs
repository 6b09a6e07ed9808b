use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = ".graph-view.toml";

/// Directories searched for `.graph-view.toml`, in order of precedence:
/// the current working directory, then the home directory
pub fn config_search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from(".")];
    dirs.extend(dirs::home_dir());
    dirs
}

/// Load config file content from the first of [`config_search_dirs`] that has one
pub fn load_config_file() -> Option<String> {
    load_config_file_from(&config_search_dirs())
}

/// Content of the first readable `.graph-view.toml` among `dirs`
pub fn load_config_file_from(dirs: &[PathBuf]) -> Option<String> {
    dirs.iter().find_map(|dir| read_config(dir))
}

fn read_config(dir: &Path) -> Option<String> {
    let path = dir.join(CONFIG_FILE);
    match std::fs::read_to_string(&path) {
        Ok(content) => {
            log::debug!("Loaded config from {}", path.display());
            Some(content)
        }
        Err(_) => None,
    }
}
