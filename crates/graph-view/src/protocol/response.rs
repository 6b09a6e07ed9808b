//! Outbound messages to the rendering surface
//!
//! Replies carry the command tag of the request they answer. `refresh`,
//! `loadRepos` and `fetchAvatar` are also sent unsolicited.

use graph_view_backend::{
    ErrorInfo, GitCommitComparisonData, GitCommitData, GitCommitDetailsData, GitRepoConfigData,
    GitRepoInfo, GitTagDetailsData, RepoSet,
};
use graph_view_config::CodeReview;
use serde::Serialize;

use super::{LoadViewTarget, RefreshId};

#[derive(Debug, Clone, PartialEq, Serialize, strum::IntoStaticStr)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Response {
    // === Queries ===
    LoadRepos {
        repos: RepoSet,
        last_active_repo: Option<String>,
        load_view_to: Option<LoadViewTarget>,
    },
    LoadRepoInfo {
        refresh_id: RefreshId,
        is_repo: bool,
        #[serde(flatten)]
        info: GitRepoInfo,
    },
    LoadCommits {
        refresh_id: RefreshId,
        #[serde(flatten)]
        data: GitCommitData,
    },
    CommitDetails {
        #[serde(flatten)]
        data: GitCommitDetailsData,
        avatar: Option<String>,
        code_review: Option<CodeReview>,
        refresh: bool,
    },
    CompareCommits {
        commit_hash: String,
        compare_with_hash: String,
        #[serde(flatten)]
        data: GitCommitComparisonData,
        code_review: Option<CodeReview>,
        refresh: bool,
    },
    TagDetails {
        tag_name: String,
        commit_hash: String,
        #[serde(flatten)]
        data: GitTagDetailsData,
    },
    LoadConfig {
        repo: String,
        #[serde(flatten)]
        data: GitRepoConfigData,
    },
    FetchAvatar {
        email: String,
        image: Option<String>,
    },
    RescanForRepos {
        error: ErrorInfo,
    },

    // === Single-step mutations ===
    AddRemote { error: ErrorInfo },
    DeleteRemote { error: ErrorInfo },
    EditRemote { error: ErrorInfo },
    PruneRemote { error: ErrorInfo },
    Fetch { error: ErrorInfo },
    FetchIntoLocalBranch { error: ErrorInfo },
    CheckoutBranch { error: ErrorInfo },
    CheckoutCommit { error: ErrorInfo },
    RenameBranch { error: ErrorInfo },
    DeleteRemoteBranch { error: ErrorInfo },
    Merge { error: ErrorInfo },
    Rebase { error: ErrorInfo },
    PullBranch { error: ErrorInfo },
    DeleteTag { error: ErrorInfo },
    RevertCommit { error: ErrorInfo },
    DropCommit { error: ErrorInfo },
    ResetToCommit { error: ErrorInfo },
    CleanUntrackedFiles { error: ErrorInfo },
    ResetFileToRevision { error: ErrorInfo },
    ApplyStash { error: ErrorInfo },
    PopStash { error: ErrorInfo },
    DropStash { error: ErrorInfo },
    BranchFromStash { error: ErrorInfo },
    PushStash { error: ErrorInfo },

    // === Compound mutations ===
    AddTag { errors: Vec<ErrorInfo> },
    PushTag { errors: Vec<ErrorInfo> },
    CreateBranch { errors: Vec<ErrorInfo> },
    DeleteBranch { errors: Vec<ErrorInfo> },
    PushBranch { errors: Vec<ErrorInfo> },
    CherrypickCommit { errors: Vec<ErrorInfo> },
    EditUserDetails { errors: Vec<ErrorInfo> },
    DeleteUserDetails { errors: Vec<ErrorInfo> },
    CreatePullRequest {
        push: bool,
        errors: Vec<ErrorInfo>,
    },

    // === Code review ===
    StartCodeReview {
        commit_hash: String,
        compare_with_hash: Option<String>,
        code_review: Option<CodeReview>,
        error: ErrorInfo,
    },
    EndCodeReview { error: ErrorInfo },

    // === Host workbench ===
    ViewScm { error: ErrorInfo },
    OpenExternalUrl { error: ErrorInfo },
    CopyToClipboard { error: ErrorInfo },
    OpenFile { error: ErrorInfo },
    ViewDiff { error: ErrorInfo },

    /// The repository changed on disk and the surface should reload
    Refresh,
}

impl Response {
    pub fn command(&self) -> &'static str {
        self.into()
    }
}
