//! Latest refresh ids per query class
//!
//! The surface tags its repository-info and commit-list queries with an
//! increasing id and drops any response whose id is no longer the newest it
//! issued. The controller only remembers the newest id per class so a full
//! re-render can hand them back; it never rejects or delays a query.

use crate::protocol::{RefreshId, RefreshSnapshot};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryClass {
    RepoInfo,
    Commits,
}

/// Shared record of the latest refresh id per query class
#[derive(Debug, Clone, Default)]
pub struct RefreshCoordinator {
    inner: Arc<Latest>,
}

#[derive(Debug, Default)]
struct Latest {
    repo_info: AtomicI64,
    commits: AtomicI64,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as the latest for `class` and hand it back for the response
    pub fn issue(&self, class: QueryClass, id: RefreshId) -> RefreshId {
        self.slot(class).store(id.0, Ordering::SeqCst);
        id
    }

    pub fn latest(&self, class: QueryClass) -> RefreshId {
        RefreshId(self.slot(class).load(Ordering::SeqCst))
    }

    pub fn snapshot(&self) -> RefreshSnapshot {
        RefreshSnapshot {
            repo_info: self.latest(QueryClass::RepoInfo),
            commits: self.latest(QueryClass::Commits),
        }
    }

    fn slot(&self, class: QueryClass) -> &AtomicI64 {
        match class {
            QueryClass::RepoInfo => &self.inner.repo_info,
            QueryClass::Commits => &self.inner.commits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_are_tracked_independently() {
        let refresh = RefreshCoordinator::new();
        assert_eq!(refresh.issue(QueryClass::RepoInfo, RefreshId(5)), RefreshId(5));
        refresh.issue(QueryClass::Commits, RefreshId(9));

        assert_eq!(refresh.latest(QueryClass::RepoInfo), RefreshId(5));
        assert_eq!(refresh.latest(QueryClass::Commits), RefreshId(9));
    }

    #[test]
    fn test_latest_issue_wins_even_when_older() {
        let refresh = RefreshCoordinator::new();
        refresh.issue(QueryClass::Commits, RefreshId(10));
        refresh.issue(QueryClass::Commits, RefreshId(4));

        assert_eq!(refresh.latest(QueryClass::Commits), RefreshId(4));
    }

    #[test]
    fn test_clones_share_state() {
        let refresh = RefreshCoordinator::new();
        let other = refresh.clone();
        other.issue(QueryClass::RepoInfo, RefreshId(2));

        let snapshot = refresh.snapshot();
        assert_eq!(snapshot.repo_info, RefreshId(2));
        assert_eq!(snapshot.commits, RefreshId(0));
    }
}
