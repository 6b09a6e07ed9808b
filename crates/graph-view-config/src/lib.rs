//! Configuration and persisted state for the graph view controller
//!
//! This crate provides:
//! - File path utilities for config, cache and state files
//! - Configuration file loading (TOML)
//! - View configuration (ViewConfig) embedded into every render
//! - The extension-state store (last active repository, per-repo UI state,
//!   code-review sessions)

pub mod config_file;
pub mod paths;
pub mod state_store;
pub mod view_config;

pub use config_file::{config_search_dirs, load_config_file, load_config_file_from};
pub use paths::{cache_dir, config_dir, state_path};
pub use state_store::{CodeReview, ExtensionStateStore, FileStateStore};
pub use view_config::{CommitOrdering, GraphStyle, ViewConfig, WatcherConfig};
