use graph_view_backend::RepoSet;
use graph_view_config::ViewConfig;
use serde::Serialize;

use super::{LoadViewTarget, RefreshId};

/// Latest refresh ids the surface issued, per query class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSnapshot {
    pub repo_info: RefreshId,
    pub commits: RefreshId,
}

/// Snapshot embedded into a full render of the graph view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialState {
    pub config: ViewConfig,
    pub last_active_repo: Option<String>,
    pub load_view_to: Option<LoadViewTarget>,
    pub repos: RepoSet,
    pub refresh_ids: RefreshSnapshot,
}
