//! Repository manager contract
//!
//! The repository manager owns the set of known repositories. It discovers
//! them, notices when they disappear, and broadcasts every change to the set.

use crate::types::RepoSet;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// A change to the set of known repositories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoChangeEvent {
    /// The complete repository set after the change
    pub repos: RepoSet,
    pub num_repos: usize,
    /// Repository the view should switch to, if the change asked for one
    pub load_repo: Option<String>,
}

impl RepoChangeEvent {
    pub fn new(repos: RepoSet, load_repo: Option<String>) -> Self {
        Self {
            num_repos: repos.len(),
            repos,
            load_repo,
        }
    }
}

#[async_trait]
pub trait RepoManager: Send + Sync {
    /// Snapshot of the known repositories
    fn repos(&self) -> RepoSet;

    /// Drop repositories that no longer exist on disk
    ///
    /// Returns `true` when the set changed. A change is also announced to
    /// subscribers.
    async fn check_repos_exist(&self) -> bool;

    /// Scan the workspace for repositories
    ///
    /// Returns `true` when at least one repository was found.
    async fn search_workspace_for_repos(&self) -> bool;

    /// Subscribe to repository set changes
    ///
    /// Dropping the receiver deregisters the subscriber.
    fn subscribe(&self) -> broadcast::Receiver<RepoChangeEvent>;
}
