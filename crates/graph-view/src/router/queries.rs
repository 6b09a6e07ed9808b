//! Read-only requests and the code review bookkeeping

use super::MessageRouter;
use crate::protocol::{RefreshId, Response};
use crate::refresh::QueryClass;
use graph_view_backend::{CommitQuery, GitCommitStash, UNCOMMITTED};

const NO_REPOSITORIES_FOUND: &str = "No Git repositories were found in the current workspace.";

impl MessageRouter {
    pub(super) async fn load_repos(&self, check: bool) -> Response {
        let repo_manager = &self.collaborators.repo_manager;
        if check && repo_manager.check_repos_exist().await {
            log::debug!("Repository set changed while checking it");
        }

        Response::LoadRepos {
            repos: repo_manager.repos(),
            last_active_repo: self.collaborators.state_store.last_active_repo(),
            load_view_to: None,
        }
    }

    /// Repository info, with errors from a vanished repository reported as
    /// "not a repository" rather than as a failure
    pub(super) async fn load_repo_info(
        &self,
        repo: String,
        refresh_id: RefreshId,
        show_remote_branches: bool,
        show_stashes: bool,
        hide_remotes: Vec<String>,
    ) -> Response {
        let refresh_id = self.refresh.issue(QueryClass::RepoInfo, refresh_id);
        let source = &self.collaborators.data_source;

        let mut info = source
            .get_repo_info(&repo, show_remote_branches, show_stashes, &hide_remotes)
            .await;
        let mut is_repo = true;
        if info.error.is_some() && source.repo_root(&repo).await.is_none() {
            log::info!("{} is no longer a repository", repo);
            is_repo = false;
            info.error = None;
        }

        if info.error.is_none() && is_repo {
            self.switch_current_repo(&repo);
        }

        Response::LoadRepoInfo {
            refresh_id,
            is_repo,
            info,
        }
    }

    pub(super) async fn load_commits(
        &self,
        repo: String,
        refresh_id: RefreshId,
        query: CommitQuery,
    ) -> Response {
        let refresh_id = self.refresh.issue(QueryClass::Commits, refresh_id);
        let data = self
            .collaborators
            .data_source
            .get_commits(&repo, &query)
            .await;

        Response::LoadCommits { refresh_id, data }
    }

    pub(super) async fn commit_details(
        &self,
        repo: String,
        commit_hash: String,
        has_parents: bool,
        stash: Option<GitCommitStash>,
        avatar_email: Option<String>,
        refresh: bool,
    ) -> Response {
        let source = &self.collaborators.data_source;
        let avatars = &self.collaborators.avatars;

        let details = async {
            if commit_hash == UNCOMMITTED {
                source.get_uncommitted_details(&repo).await
            } else if let Some(stash) = &stash {
                source.get_stash_details(&repo, &commit_hash, stash).await
            } else {
                source
                    .get_commit_details(&repo, &commit_hash, has_parents)
                    .await
            }
        };
        let avatar = async {
            match &avatar_email {
                Some(email) => avatars.get_avatar_image(email).await,
                None => None,
            }
        };
        let (data, avatar) = tokio::join!(details, avatar);

        let code_review = if commit_hash == UNCOMMITTED {
            None
        } else {
            self.collaborators
                .state_store
                .code_review(&repo, &commit_hash)
        };

        Response::CommitDetails {
            data,
            avatar,
            code_review,
            refresh,
        }
    }

    pub(super) async fn compare_commits(
        &self,
        repo: String,
        commit_hash: String,
        compare_with_hash: String,
        from_hash: String,
        to_hash: String,
        refresh: bool,
    ) -> Response {
        let data = self
            .collaborators
            .data_source
            .get_commit_comparison(&repo, &from_hash, &to_hash)
            .await;

        let code_review = if to_hash == UNCOMMITTED {
            None
        } else {
            self.collaborators
                .state_store
                .code_review(&repo, &format!("{}-{}", from_hash, to_hash))
        };

        Response::CompareCommits {
            commit_hash,
            compare_with_hash,
            data,
            code_review,
            refresh,
        }
    }

    /// Answer with a cached avatar, or start fetching one in the background
    pub(super) async fn fetch_avatar(
        &self,
        email: String,
        repo: String,
        remote: Option<String>,
        commits: Vec<String>,
    ) -> Response {
        let avatars = &self.collaborators.avatars;
        let image = avatars.get_avatar_image(&email).await;
        if image.is_none() {
            avatars.fetch_avatar_image(&email, &repo, remote.as_deref(), &commits);
        }

        Response::FetchAvatar { email, image }
    }

    pub(super) async fn rescan_for_repos(&self) -> Response {
        let found = self
            .collaborators
            .repo_manager
            .search_workspace_for_repos()
            .await;

        Response::RescanForRepos {
            error: (!found).then(|| NO_REPOSITORIES_FOUND.to_string()),
        }
    }

    pub(super) fn start_code_review(
        &self,
        repo: String,
        id: String,
        files: Vec<String>,
        last_viewed_file: Option<String>,
        commit_hash: String,
        compare_with_hash: Option<String>,
    ) -> Response {
        let (code_review, error) = match self.collaborators.state_store.start_code_review(
            &repo,
            &id,
            files,
            last_viewed_file,
        ) {
            Ok(review) => (Some(review), None),
            Err(e) => {
                log::warn!("Failed to start code review {}: {:#}", id, e);
                (None, Some(format!("{:#}", e)))
            }
        };

        Response::StartCodeReview {
            commit_hash,
            compare_with_hash,
            code_review,
            error,
        }
    }

    pub(super) fn end_code_review(&self, repo: &str, id: &str) -> Response {
        let error = self
            .collaborators
            .state_store
            .end_code_review(repo, id)
            .err()
            .map(|e| format!("{:#}", e));

        Response::EndCodeReview { error }
    }
}
