//! Repository data transfer objects
//!
//! These types are what the data source hands back and what the controller
//! forwards to the rendering surface. Field names serialize in camelCase,
//! matching the surface's message schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of a single repository operation
///
/// `None` is success. `Some(message)` is a human-readable failure. Callers
/// test for `None` to decide whether a dependent step may run.
pub type ErrorInfo = Option<String>;

/// Commit hash the surface uses for the working-tree changes
pub const UNCOMMITTED: &str = "*";

/// Known repositories, keyed by absolute root path
///
/// Values are the per-repository settings owned by the repository manager;
/// the controller forwards them untouched.
pub type RepoSet = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitStash {
    pub hash: String,
    pub base_hash: String,
    pub untracked_files_hash: Option<String>,
    pub selector: String,
    pub author: String,
    pub email: String,
    pub date: i64,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepoInfo {
    pub branches: Vec<String>,
    pub head: Option<String>,
    pub remotes: Vec<String>,
    pub stashes: Vec<GitStash>,
    pub error: ErrorInfo,
}

impl GitRepoInfo {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommitTag {
    pub name: String,
    pub annotated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommitRemote {
    pub name: String,
    /// Remote the ref belongs to, `None` for remote HEAD refs that could not be attributed
    pub remote: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommitStash {
    pub self_hash: String,
    pub untracked_files_hash: Option<String>,
    pub selector: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommit {
    pub hash: String,
    pub parents: Vec<String>,
    pub author: String,
    pub email: String,
    pub date: i64,
    pub message: String,
    pub heads: Vec<String>,
    pub tags: Vec<GitCommitTag>,
    pub remotes: Vec<GitCommitRemote>,
    pub stash: Option<GitCommitStash>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommitData {
    pub commits: Vec<GitCommit>,
    pub head: Option<String>,
    pub tags: Vec<String>,
    pub more_commits_available: bool,
    pub error: ErrorInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GitFileStatus {
    #[serde(rename = "A")]
    Added,
    #[serde(rename = "M")]
    Modified,
    #[serde(rename = "D")]
    Deleted,
    #[serde(rename = "R")]
    Renamed,
    #[serde(rename = "U")]
    Untracked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitFileChange {
    pub old_file_path: String,
    pub new_file_path: String,
    #[serde(rename = "type")]
    pub change_type: GitFileStatus,
    pub additions: Option<u32>,
    pub deletions: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommitDetails {
    pub hash: String,
    pub parents: Vec<String>,
    pub author: String,
    pub author_email: String,
    pub author_date: i64,
    pub committer: String,
    pub committer_email: String,
    pub committer_date: i64,
    pub body: String,
    pub file_changes: Vec<GitFileChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommitDetailsData {
    pub commit_details: Option<GitCommitDetails>,
    pub error: ErrorInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommitComparisonData {
    pub file_changes: Vec<GitFileChange>,
    pub error: ErrorInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitTagDetails {
    pub hash: String,
    pub tagger_name: String,
    pub tagger_email: String,
    pub tagger_date: i64,
    pub message: String,
    pub signed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitTagDetailsData {
    pub details: Option<GitTagDetails>,
    pub error: ErrorInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepoConfigBranch {
    pub remote: Option<String>,
    pub push_remote: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRemoteConfig {
    pub name: String,
    pub url: Option<String>,
    pub push_url: Option<String>,
}

/// A config key's value at local and global scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitConfigValues {
    pub local: Option<String>,
    pub global: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitUserConfig {
    pub name: GitConfigValues,
    pub email: GitConfigValues,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepoConfig {
    pub branches: BTreeMap<String, GitRepoConfigBranch>,
    pub diff_tool: Option<String>,
    pub gui_diff_tool: Option<String>,
    pub push_default: Option<String>,
    pub remotes: Vec<GitRemoteConfig>,
    pub user: GitUserConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepoConfigData {
    pub config: Option<GitRepoConfig>,
    pub error: ErrorInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitConfigLocation {
    Local,
    Global,
    System,
}

impl GitConfigLocation {
    pub fn as_flag(&self) -> &'static str {
        match self {
            GitConfigLocation::Local => "--local",
            GitConfigLocation::Global => "--global",
            GitConfigLocation::System => "--system",
        }
    }
}

/// User identity keys the controller edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GitUserKey {
    Name,
    Email,
}

impl GitUserKey {
    pub fn as_key(&self) -> &'static str {
        match self {
            GitUserKey::Name => "user.name",
            GitUserKey::Email => "user.email",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitResetMode {
    Soft,
    Mixed,
    Hard,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GitPushBranchMode {
    #[default]
    Normal,
    Force,
    ForceWithLease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    Annotated,
    Lightweight,
}

/// What kind of ref a merge or rebase is performed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionOn {
    Branch,
    RemoteTrackingBranch,
    Commit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOptions {
    pub create_new_commit: bool,
    pub squash: bool,
    pub no_commit: bool,
}

/// Old and new values of a remote being edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEdit {
    pub name_old: String,
    pub name_new: String,
    pub url_old: Option<String>,
    pub url_new: Option<String>,
    pub push_url_old: Option<String>,
    pub push_url_new: Option<String>,
}

/// Parameters of a commit-list query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitQuery {
    /// Branches to show, `None` for all
    pub branches: Option<Vec<String>>,
    pub max_commits: u32,
    pub show_tags: bool,
    pub show_remote_branches: bool,
    pub include_commits_mentioned_by_reflogs: bool,
    pub only_follow_first_parent: bool,
    pub commit_ordering: crate::CommitOrdering,
    pub remotes: Vec<String>,
    pub hide_remotes: Vec<String>,
    pub stashes: Vec<GitStash>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClipboardKind {
    CommitHash,
    BranchName,
    TagName,
    FilePath,
    Subject,
    StashName,
}

/// A file diff the host should open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffTarget {
    pub from_hash: String,
    pub to_hash: String,
    pub old_file_path: String,
    pub new_file_path: String,
    #[serde(rename = "type")]
    pub change_type: GitFileStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_repo_info_serializes_null_error() {
        let info = GitRepoInfo {
            branches: vec!["main".to_string()],
            head: Some("main".to_string()),
            ..GitRepoInfo::default()
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["error"], json!(null));
        assert_eq!(value["head"], json!("main"));
    }

    #[test]
    fn test_file_change_uses_status_letters() {
        let change = GitFileChange {
            old_file_path: "a.rs".to_string(),
            new_file_path: "b.rs".to_string(),
            change_type: GitFileStatus::Renamed,
            additions: Some(1),
            deletions: None,
        };
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["type"], json!("R"));
        assert_eq!(value["oldFilePath"], json!("a.rs"));
    }

    #[test]
    fn test_push_mode_wire_names() {
        assert_eq!(
            serde_json::to_value(GitPushBranchMode::ForceWithLease).unwrap(),
            json!("force-with-lease")
        );
        assert_eq!(
            serde_json::from_value::<ActionOn>(json!("remoteTrackingBranch")).unwrap(),
            ActionOn::RemoteTrackingBranch
        );
    }

    #[test]
    fn test_user_keys() {
        assert_eq!(GitUserKey::Name.as_key(), "user.name");
        assert_eq!(GitUserKey::Email.as_key(), "user.email");
        assert_eq!(GitConfigLocation::Global.as_flag(), "--global");
    }
}
