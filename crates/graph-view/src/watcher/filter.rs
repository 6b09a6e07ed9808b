//! Which file changes are worth a reload
//!
//! Everything in the working tree counts. Inside `.git` only the files that
//! change what the graph shows count; lock files, object writes, logs and
//! the like are noise.

use regex::Regex;
use std::path::{Component, Path};
use std::sync::OnceLock;

/// Whether a change at `relative` (relative to the repository root) should
/// trigger a reload
pub fn is_relevant(relative: &Path) -> bool {
    static GIT_DIR_ALLOWLIST: OnceLock<Option<Regex>> = OnceLock::new();

    let mut components = relative.components();
    match components.next() {
        Some(Component::Normal(first)) if first == ".git" => {
            let inner = components
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            GIT_DIR_ALLOWLIST
                .get_or_init(|| {
                    Regex::new(r"^(config|index|HEAD|refs/stash|refs/(heads|remotes|tags)/.+)$")
                        .map_err(|e| log::error!("Invalid .git allowlist pattern: {}", e))
                        .ok()
                })
                .as_ref()
                .is_some_and(|allowlist| allowlist.is_match(&inner))
        }
        Some(_) => true,
        None => false,
    }
}
