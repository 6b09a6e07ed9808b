//! Repository data source trait
//!
//! The data source executes the actual repository queries and mutations.
//! Mutations report an [`ErrorInfo`]; queries report a result object that
//! carries its own `error` field. Nothing here returns a Rust error: every
//! failure is data the controller forwards to the rendering surface.

use crate::types::{
    ActionOn, CommitQuery, ErrorInfo, GitCommitComparisonData, GitCommitData,
    GitCommitDetailsData, GitCommitStash, GitConfigLocation, GitPushBranchMode, GitRepoConfigData,
    GitRepoInfo, GitResetMode, GitTagDetailsData, GitUserKey, MergeOptions, RemoteEdit, TagType,
};
use async_trait::async_trait;

/// Repository data source
///
/// Defines one async method per repository operation the controller can
/// request. Implementations typically shell out to `git`.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: several requests may be in flight
/// at once and each handler holds a shared reference.
///
/// # Example
///
/// ```rust,ignore
/// use graph_view_backend::DataSource;
///
/// async fn head_of(source: &dyn DataSource, repo: &str) -> Option<String> {
///     source.get_repo_info(repo, true, true, &[]).await.head
/// }
/// ```
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Whether the git executable could not be located
    ///
    /// When true the rendering surface shows a fixed error page instead of the
    /// graph, regardless of the known repositories.
    fn is_git_executable_unknown(&self) -> bool;

    /// Resolve the root of the repository containing `path`
    ///
    /// Returns `None` when `path` is no longer inside a repository.
    async fn repo_root(&self, path: &str) -> Option<String>;

    // === Queries ===

    /// Branches, remotes, stashes and HEAD of a repository
    ///
    /// # Arguments
    ///
    /// * `repo` - Repository root path
    /// * `show_remote_branches` - Include remote-tracking branches
    /// * `show_stashes` - Include stashes
    /// * `hide_remotes` - Remotes whose branches are left out
    async fn get_repo_info(
        &self,
        repo: &str,
        show_remote_branches: bool,
        show_stashes: bool,
        hide_remotes: &[String],
    ) -> GitRepoInfo;

    /// The commit list to draw
    async fn get_commits(&self, repo: &str, query: &CommitQuery) -> GitCommitData;

    async fn get_commit_details(
        &self,
        repo: &str,
        commit_hash: &str,
        has_parents: bool,
    ) -> GitCommitDetailsData;

    async fn get_stash_details(
        &self,
        repo: &str,
        commit_hash: &str,
        stash: &GitCommitStash,
    ) -> GitCommitDetailsData;

    /// Details of the working-tree changes
    async fn get_uncommitted_details(&self, repo: &str) -> GitCommitDetailsData;

    /// Files changed between two revisions
    async fn get_commit_comparison(
        &self,
        repo: &str,
        from_hash: &str,
        to_hash: &str,
    ) -> GitCommitComparisonData;

    async fn get_tag_details(&self, repo: &str, tag_name: &str) -> GitTagDetailsData;

    /// Repository configuration, limited to the listed remotes
    async fn get_config(&self, repo: &str, remotes: &[String]) -> GitRepoConfigData;

    // === Remotes ===

    async fn add_remote(
        &self,
        repo: &str,
        name: &str,
        url: &str,
        push_url: Option<&str>,
        fetch: bool,
    ) -> ErrorInfo;

    async fn delete_remote(&self, repo: &str, name: &str) -> ErrorInfo;

    async fn edit_remote(&self, repo: &str, edit: &RemoteEdit) -> ErrorInfo;

    async fn prune_remote(&self, repo: &str, name: &str) -> ErrorInfo;

    /// Fetch from one remote, or from all remotes when `remote` is `None`
    async fn fetch(
        &self,
        repo: &str,
        remote: Option<&str>,
        prune: bool,
        prune_tags: bool,
    ) -> ErrorInfo;

    async fn fetch_into_local_branch(
        &self,
        repo: &str,
        remote: &str,
        remote_branch: &str,
        local_branch: &str,
        force: bool,
    ) -> ErrorInfo;

    // === Branches ===

    /// Check out a local branch, or create it tracking `remote_branch`
    async fn checkout_branch(
        &self,
        repo: &str,
        branch_name: &str,
        remote_branch: Option<&str>,
    ) -> ErrorInfo;

    async fn checkout_commit(&self, repo: &str, commit_hash: &str) -> ErrorInfo;

    async fn create_branch(
        &self,
        repo: &str,
        branch_name: &str,
        commit_hash: &str,
        force: bool,
    ) -> ErrorInfo;

    async fn rename_branch(&self, repo: &str, old_name: &str, new_name: &str) -> ErrorInfo;

    async fn delete_branch(&self, repo: &str, branch_name: &str, force: bool) -> ErrorInfo;

    async fn delete_remote_branch(&self, repo: &str, branch_name: &str, remote: &str)
        -> ErrorInfo;

    async fn merge(
        &self,
        repo: &str,
        obj: &str,
        action_on: ActionOn,
        options: MergeOptions,
    ) -> ErrorInfo;

    async fn rebase(
        &self,
        repo: &str,
        obj: &str,
        action_on: ActionOn,
        ignore_date: bool,
        interactive: bool,
    ) -> ErrorInfo;

    async fn pull_branch(
        &self,
        repo: &str,
        branch_name: &str,
        remote: &str,
        create_new_commit: bool,
        squash: bool,
    ) -> ErrorInfo;

    /// Push a branch to a single remote
    async fn push_branch(
        &self,
        repo: &str,
        branch_name: &str,
        remote: &str,
        set_upstream: bool,
        mode: GitPushBranchMode,
    ) -> ErrorInfo;

    // === Tags ===

    #[allow(clippy::too_many_arguments)]
    async fn add_tag(
        &self,
        repo: &str,
        tag_name: &str,
        commit_hash: &str,
        tag_type: TagType,
        message: &str,
        force: bool,
    ) -> ErrorInfo;

    /// Delete a tag locally, and first on `delete_on_remote` when given
    async fn delete_tag(
        &self,
        repo: &str,
        tag_name: &str,
        delete_on_remote: Option<&str>,
    ) -> ErrorInfo;

    /// Push a tag to a single remote
    ///
    /// # Arguments
    ///
    /// * `commit_hash` - Commit the tag is expected to point at on the remote
    /// * `skip_remote_check` - Push without verifying the remote's copy of the tag
    async fn push_tag(
        &self,
        repo: &str,
        tag_name: &str,
        remote: &str,
        commit_hash: &str,
        skip_remote_check: bool,
    ) -> ErrorInfo;

    // === Commits ===

    async fn cherrypick_commit(
        &self,
        repo: &str,
        commit_hash: &str,
        parent_index: u32,
        record_origin: bool,
        no_commit: bool,
    ) -> ErrorInfo;

    async fn revert_commit(&self, repo: &str, commit_hash: &str, parent_index: u32) -> ErrorInfo;

    async fn drop_commit(&self, repo: &str, commit_hash: &str) -> ErrorInfo;

    async fn reset_to_commit(&self, repo: &str, commit: &str, mode: GitResetMode) -> ErrorInfo;

    async fn clean_untracked_files(&self, repo: &str, directories: bool) -> ErrorInfo;

    async fn reset_file_to_revision(
        &self,
        repo: &str,
        commit_hash: &str,
        file_path: &str,
    ) -> ErrorInfo;

    // === Stashes ===

    async fn apply_stash(&self, repo: &str, selector: &str, reinstate_index: bool) -> ErrorInfo;

    async fn pop_stash(&self, repo: &str, selector: &str, reinstate_index: bool) -> ErrorInfo;

    async fn drop_stash(&self, repo: &str, selector: &str) -> ErrorInfo;

    async fn branch_from_stash(&self, repo: &str, selector: &str, branch_name: &str)
        -> ErrorInfo;

    async fn push_stash(&self, repo: &str, message: &str, include_untracked: bool) -> ErrorInfo;

    // === Config ===

    async fn set_config_value(
        &self,
        repo: &str,
        key: GitUserKey,
        value: &str,
        location: GitConfigLocation,
    ) -> ErrorInfo;

    async fn unset_config_value(
        &self,
        repo: &str,
        key: GitUserKey,
        location: GitConfigLocation,
    ) -> ErrorInfo;
}
