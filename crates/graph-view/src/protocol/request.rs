//! Inbound messages from the rendering surface
//!
//! Every message carries a `command` discriminator. Commands that expect a
//! reply are [`Request`]s; the two commands that only persist local state are
//! [`Notification`]s and never get a reply.

use crate::pull_request::PullRequestConfig;
use graph_view_backend::{
    ActionOn, ClipboardKind, CommitQuery, DiffTarget, GitCommitStash, GitConfigLocation,
    GitPushBranchMode, GitResetMode, MergeOptions, RemoteEdit, TagType,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RefreshId;

/// Commands that are answered with exactly one [`Response`](super::Response)
/// carrying the same command tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Request {
    // === Queries ===
    LoadRepos {
        /// Verify the known repositories still exist before answering
        check: bool,
    },
    LoadRepoInfo {
        repo: String,
        refresh_id: RefreshId,
        show_remote_branches: bool,
        show_stashes: bool,
        #[serde(default)]
        hide_remotes: Vec<String>,
    },
    LoadCommits {
        repo: String,
        refresh_id: RefreshId,
        #[serde(flatten)]
        query: CommitQuery,
    },
    CommitDetails {
        repo: String,
        commit_hash: String,
        has_parents: bool,
        stash: Option<GitCommitStash>,
        avatar_email: Option<String>,
        refresh: bool,
    },
    CompareCommits {
        repo: String,
        commit_hash: String,
        compare_with_hash: String,
        from_hash: String,
        to_hash: String,
        refresh: bool,
    },
    TagDetails {
        repo: String,
        tag_name: String,
        commit_hash: String,
    },
    LoadConfig {
        repo: String,
        remotes: Vec<String>,
    },
    FetchAvatar {
        email: String,
        repo: String,
        remote: Option<String>,
        commits: Vec<String>,
    },
    RescanForRepos,

    // === Remotes ===
    AddRemote {
        repo: String,
        name: String,
        url: String,
        push_url: Option<String>,
        fetch: bool,
    },
    DeleteRemote {
        repo: String,
        name: String,
    },
    EditRemote {
        repo: String,
        #[serde(flatten)]
        edit: RemoteEdit,
    },
    PruneRemote {
        repo: String,
        name: String,
    },
    Fetch {
        repo: String,
        /// Remote to fetch from, all remotes when absent
        name: Option<String>,
        prune: bool,
        prune_tags: bool,
    },
    FetchIntoLocalBranch {
        repo: String,
        remote: String,
        remote_branch: String,
        local_branch: String,
        force: bool,
    },

    // === Branches ===
    CheckoutBranch {
        repo: String,
        branch_name: String,
        remote_branch: Option<String>,
    },
    CheckoutCommit {
        repo: String,
        commit_hash: String,
    },
    CreateBranch {
        repo: String,
        commit_hash: String,
        branch_name: String,
        checkout: bool,
        force: bool,
    },
    RenameBranch {
        repo: String,
        old_name: String,
        new_name: String,
    },
    DeleteBranch {
        repo: String,
        branch_name: String,
        force_delete: bool,
        #[serde(default)]
        delete_on_remotes: Vec<String>,
    },
    DeleteRemoteBranch {
        repo: String,
        branch_name: String,
        remote: String,
    },
    Merge {
        repo: String,
        obj: String,
        action_on: ActionOn,
        #[serde(flatten)]
        options: MergeOptions,
    },
    Rebase {
        repo: String,
        obj: String,
        action_on: ActionOn,
        ignore_date: bool,
        interactive: bool,
    },
    PullBranch {
        repo: String,
        branch_name: String,
        remote: String,
        create_new_commit: bool,
        squash: bool,
    },
    PushBranch {
        repo: String,
        branch_name: String,
        remotes: Vec<String>,
        set_upstream: bool,
        #[serde(default)]
        mode: GitPushBranchMode,
    },

    // === Tags ===
    AddTag {
        repo: String,
        commit_hash: String,
        tag_name: String,
        #[serde(rename = "type")]
        tag_type: TagType,
        #[serde(default)]
        message: String,
        push_to_remote: Option<String>,
        force: bool,
    },
    DeleteTag {
        repo: String,
        tag_name: String,
        delete_on_remote: Option<String>,
    },
    PushTag {
        repo: String,
        tag_name: String,
        remotes: Vec<String>,
        commit_hash: String,
        skip_remote_check: bool,
    },

    // === Commits ===
    CherrypickCommit {
        repo: String,
        commit_hash: String,
        parent_index: u32,
        record_origin: bool,
        no_commit: bool,
    },
    RevertCommit {
        repo: String,
        commit_hash: String,
        parent_index: u32,
    },
    DropCommit {
        repo: String,
        commit_hash: String,
    },
    ResetToCommit {
        repo: String,
        commit: String,
        reset_mode: GitResetMode,
    },
    CleanUntrackedFiles {
        repo: String,
        directories: bool,
    },
    ResetFileToRevision {
        repo: String,
        commit_hash: String,
        file_path: String,
    },

    // === Stashes ===
    ApplyStash {
        repo: String,
        selector: String,
        reinstate_index: bool,
    },
    PopStash {
        repo: String,
        selector: String,
        reinstate_index: bool,
    },
    DropStash {
        repo: String,
        selector: String,
    },
    BranchFromStash {
        repo: String,
        selector: String,
        branch_name: String,
    },
    PushStash {
        repo: String,
        message: String,
        include_untracked: bool,
    },

    // === User identity ===
    EditUserDetails {
        repo: String,
        name: String,
        email: String,
        location: GitConfigLocation,
        delete_local_name: bool,
        delete_local_email: bool,
    },
    DeleteUserDetails {
        repo: String,
        name: bool,
        email: bool,
        location: GitConfigLocation,
    },

    // === Pull requests ===
    CreatePullRequest {
        repo: String,
        config: PullRequestConfig,
        source_remote: String,
        source_owner: String,
        source_repo: String,
        source_branch: String,
        push: bool,
    },

    // === Code review ===
    StartCodeReview {
        repo: String,
        id: String,
        files: Vec<String>,
        last_viewed_file: Option<String>,
        commit_hash: String,
        compare_with_hash: Option<String>,
    },
    EndCodeReview {
        repo: String,
        id: String,
    },

    // === Host workbench ===
    ViewScm,
    OpenExternalUrl {
        url: String,
    },
    CopyToClipboard {
        #[serde(rename = "type")]
        kind: ClipboardKind,
        data: String,
    },
    OpenFile {
        repo: String,
        hash: Option<String>,
        file_path: String,
    },
    ViewDiff {
        repo: String,
        #[serde(flatten)]
        target: DiffTarget,
    },
}

impl Request {
    /// The command tag on the wire
    pub fn command(&self) -> &'static str {
        self.into()
    }
}

/// Commands that only persist local state and are never answered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Notification {
    CodeReviewFileReviewed {
        repo: String,
        id: String,
        file_path: String,
    },
    SetRepoState {
        repo: String,
        state: Value,
    },
}

impl Notification {
    pub const COMMANDS: [&'static str; 2] = ["codeReviewFileReviewed", "setRepoState"];

    pub fn command(&self) -> &'static str {
        self.into()
    }
}
