//! View configuration
//!
//! Configuration loaded from `.graph-view.toml`. The whole struct is embedded
//! into every render snapshot sent to the rendering surface.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Order in which commits are listed in the graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitOrdering {
    #[default]
    Date,
    AuthorDate,
    Topo,
}

impl CommitOrdering {
    /// The `git log` flag selecting this ordering
    pub fn as_flag(&self) -> &'static str {
        match self {
            CommitOrdering::Date => "--date-order",
            CommitOrdering::AuthorDate => "--author-date-order",
            CommitOrdering::Topo => "--topo-order",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphStyle {
    #[default]
    Rounded,
    Angular,
}

/// File watcher timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatcherConfig {
    /// Quiet period after the last accepted change before the view is told to reload
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Changes are still dropped for this long after the last unmute
    #[serde(default = "default_resume_grace_ms")]
    pub resume_grace_ms: u64,
}

fn default_debounce_ms() -> u64 {
    750
}

fn default_resume_grace_ms() -> u64 {
    1500
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            resume_grace_ms: default_resume_grace_ms(),
        }
    }
}

/// View configuration loaded from `.graph-view.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    #[serde(default)]
    pub graph_style: GraphStyle,

    #[serde(default)]
    pub commit_ordering: CommitOrdering,

    /// Number of commits requested by the first load of a repository
    #[serde(default = "default_initial_load_commits")]
    pub initial_load_commits: u32,

    /// Number of additional commits requested by "load more"
    #[serde(default = "default_load_more_commits")]
    pub load_more_commits: u32,

    #[serde(default = "default_true")]
    pub show_remote_branches: bool,

    #[serde(default = "default_true")]
    pub show_stashes: bool,

    #[serde(default = "default_true")]
    pub show_tags: bool,

    #[serde(default)]
    pub fetch_avatars: bool,

    #[serde(default)]
    pub include_commits_mentioned_by_reflogs: bool,

    #[serde(default)]
    pub only_follow_first_parent: bool,

    /// strftime-style pattern used by the surface to format commit dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub watcher: WatcherConfig,
}

fn default_initial_load_commits() -> u32 {
    300
}

fn default_load_more_commits() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            graph_style: GraphStyle::default(),
            commit_ordering: CommitOrdering::default(),
            initial_load_commits: default_initial_load_commits(),
            load_more_commits: default_load_more_commits(),
            show_remote_branches: true,
            show_stashes: true,
            show_tags: true,
            fetch_avatars: false,
            include_commits_mentioned_by_reflogs: false,
            only_follow_first_parent: false,
            date_format: default_date_format(),
            watcher: WatcherConfig::default(),
        }
    }
}

impl ViewConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        Self::load_from(&crate::config_file::config_search_dirs())
    }

    /// Load from the first `.graph-view.toml` among `dirs`, falling back to
    /// defaults when none exists or it does not parse
    pub fn load_from(dirs: &[PathBuf]) -> Self {
        if let Some(content) = crate::load_config_file_from(dirs) {
            match Self::parse(&content) {
                Ok(config) => {
                    log::info!("Loaded view config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default view config");
        Self::default()
    }

    /// Parse a TOML document, filling missing keys with defaults
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
