//! Call-recording collaborators for unit tests

use crate::error::GraphViewError;
use crate::refresh::RefreshCoordinator;
use crate::router::{Collaborators, HostServices, MessageRouter};
use crate::session::CurrentRepo;
use crate::surface::{ChannelSurface, SurfacePeer};
use crate::transport::Outbound;
use crate::watcher::{FileWatcherGate, WatchBackend, WatchHandle};
use async_trait::async_trait;
use graph_view_backend::{
    ActionOn, AvatarResolver, ClipboardKind, CommitQuery, DataSource, DiffTarget, ErrorInfo,
    GitCommitComparisonData, GitCommitData, GitCommitDetailsData, GitCommitStash,
    GitConfigLocation, GitPushBranchMode, GitRepoConfigData, GitRepoInfo, GitResetMode,
    GitTagDetailsData, GitUserKey, MergeOptions, RemoteEdit, RepoChangeEvent, RepoManager,
    RepoSet, TagType, Workbench,
};
use graph_view_config::{FileStateStore, WatcherConfig};
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc, Notify};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}

pub(crate) fn repo_set(roots: &[&str]) -> RepoSet {
    roots
        .iter()
        .map(|root| (root.to_string(), json!({})))
        .collect()
}

/// Records every call as a label such as `push_tag:origin` and fails the
/// labels it was told to fail
#[derive(Default)]
pub(crate) struct MockDataSource {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, String>>,
    holds: Mutex<HashMap<String, Arc<Notify>>>,
    mute_probe: Mutex<Option<FileWatcherGate>>,
    muted_during: Mutex<Vec<bool>>,
    repo_info: Mutex<GitRepoInfo>,
    repo_root: Mutex<Option<String>>,
    git_unknown: Mutex<bool>,
}

impl MockDataSource {
    pub fn fail(&self, label: &str, message: &str) {
        lock(&self.failures).insert(label.to_string(), message.to_string());
    }

    /// Make calls labelled `label` wait until the returned handle is notified
    pub fn hold(&self, label: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        lock(&self.holds).insert(label.to_string(), Arc::clone(&notify));
        notify
    }

    /// Record whether `gate` was muted during each call
    pub fn probe_mute(&self, gate: FileWatcherGate) {
        *lock(&self.mute_probe) = Some(gate);
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn muted_during(&self) -> Vec<bool> {
        lock(&self.muted_during).clone()
    }

    pub fn set_repo_info(&self, info: GitRepoInfo) {
        *lock(&self.repo_info) = info;
    }

    pub fn set_repo_root(&self, root: Option<&str>) {
        *lock(&self.repo_root) = root.map(str::to_string);
    }

    pub fn set_git_unknown(&self, unknown: bool) {
        *lock(&self.git_unknown) = unknown;
    }

    async fn call(&self, label: String) -> ErrorInfo {
        lock(&self.calls).push(label.clone());
        if let Some(gate) = lock(&self.mute_probe).as_ref() {
            lock(&self.muted_during).push(gate.is_muted());
        }
        let hold = lock(&self.holds).get(&label).cloned();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        lock(&self.failures).get(&label).cloned()
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    fn is_git_executable_unknown(&self) -> bool {
        *lock(&self.git_unknown)
    }

    async fn repo_root(&self, path: &str) -> Option<String> {
        self.call(format!("repo_root:{path}")).await;
        lock(&self.repo_root).clone()
    }

    async fn get_repo_info(
        &self,
        repo: &str,
        _show_remote_branches: bool,
        _show_stashes: bool,
        _hide_remotes: &[String],
    ) -> GitRepoInfo {
        self.call(format!("get_repo_info:{repo}")).await;
        lock(&self.repo_info).clone()
    }

    async fn get_commits(&self, repo: &str, query: &CommitQuery) -> GitCommitData {
        self.call(format!("get_commits:{repo}:{}", query.max_commits))
            .await;
        GitCommitData::default()
    }

    async fn get_commit_details(
        &self,
        _repo: &str,
        commit_hash: &str,
        _has_parents: bool,
    ) -> GitCommitDetailsData {
        let error = self.call(format!("get_commit_details:{commit_hash}")).await;
        GitCommitDetailsData {
            commit_details: None,
            error,
        }
    }

    async fn get_stash_details(
        &self,
        _repo: &str,
        commit_hash: &str,
        stash: &GitCommitStash,
    ) -> GitCommitDetailsData {
        self.call(format!("get_stash_details:{commit_hash}:{}", stash.selector))
            .await;
        GitCommitDetailsData::default()
    }

    async fn get_uncommitted_details(&self, _repo: &str) -> GitCommitDetailsData {
        self.call("get_uncommitted_details".to_string()).await;
        GitCommitDetailsData::default()
    }

    async fn get_commit_comparison(
        &self,
        _repo: &str,
        from_hash: &str,
        to_hash: &str,
    ) -> GitCommitComparisonData {
        self.call(format!("get_commit_comparison:{from_hash}..{to_hash}"))
            .await;
        GitCommitComparisonData::default()
    }

    async fn get_tag_details(&self, _repo: &str, tag_name: &str) -> GitTagDetailsData {
        let error = self.call(format!("get_tag_details:{tag_name}")).await;
        GitTagDetailsData {
            details: None,
            error,
        }
    }

    async fn get_config(&self, _repo: &str, _remotes: &[String]) -> GitRepoConfigData {
        self.call("get_config".to_string()).await;
        GitRepoConfigData::default()
    }

    async fn add_remote(
        &self,
        _repo: &str,
        name: &str,
        _url: &str,
        _push_url: Option<&str>,
        _fetch: bool,
    ) -> ErrorInfo {
        self.call(format!("add_remote:{name}")).await
    }

    async fn delete_remote(&self, _repo: &str, name: &str) -> ErrorInfo {
        self.call(format!("delete_remote:{name}")).await
    }

    async fn edit_remote(&self, _repo: &str, edit: &RemoteEdit) -> ErrorInfo {
        self.call(format!("edit_remote:{}", edit.name_old)).await
    }

    async fn prune_remote(&self, _repo: &str, name: &str) -> ErrorInfo {
        self.call(format!("prune_remote:{name}")).await
    }

    async fn fetch(
        &self,
        _repo: &str,
        remote: Option<&str>,
        _prune: bool,
        _prune_tags: bool,
    ) -> ErrorInfo {
        self.call(format!("fetch:{}", remote.unwrap_or("*"))).await
    }

    async fn fetch_into_local_branch(
        &self,
        _repo: &str,
        remote: &str,
        _remote_branch: &str,
        local_branch: &str,
        _force: bool,
    ) -> ErrorInfo {
        self.call(format!("fetch_into_local_branch:{remote}:{local_branch}"))
            .await
    }

    async fn checkout_branch(
        &self,
        _repo: &str,
        branch_name: &str,
        _remote_branch: Option<&str>,
    ) -> ErrorInfo {
        self.call(format!("checkout_branch:{branch_name}")).await
    }

    async fn checkout_commit(&self, _repo: &str, commit_hash: &str) -> ErrorInfo {
        self.call(format!("checkout_commit:{commit_hash}")).await
    }

    async fn create_branch(
        &self,
        _repo: &str,
        branch_name: &str,
        _commit_hash: &str,
        _force: bool,
    ) -> ErrorInfo {
        self.call(format!("create_branch:{branch_name}")).await
    }

    async fn rename_branch(&self, _repo: &str, old_name: &str, new_name: &str) -> ErrorInfo {
        self.call(format!("rename_branch:{old_name}:{new_name}")).await
    }

    async fn delete_branch(&self, _repo: &str, branch_name: &str, _force: bool) -> ErrorInfo {
        self.call(format!("delete_branch:{branch_name}")).await
    }

    async fn delete_remote_branch(
        &self,
        _repo: &str,
        _branch_name: &str,
        remote: &str,
    ) -> ErrorInfo {
        self.call(format!("delete_remote_branch:{remote}")).await
    }

    async fn merge(
        &self,
        _repo: &str,
        obj: &str,
        _action_on: ActionOn,
        _options: MergeOptions,
    ) -> ErrorInfo {
        self.call(format!("merge:{obj}")).await
    }

    async fn rebase(
        &self,
        _repo: &str,
        obj: &str,
        _action_on: ActionOn,
        _ignore_date: bool,
        _interactive: bool,
    ) -> ErrorInfo {
        self.call(format!("rebase:{obj}")).await
    }

    async fn pull_branch(
        &self,
        _repo: &str,
        branch_name: &str,
        remote: &str,
        _create_new_commit: bool,
        _squash: bool,
    ) -> ErrorInfo {
        self.call(format!("pull_branch:{remote}:{branch_name}")).await
    }

    async fn push_branch(
        &self,
        _repo: &str,
        branch_name: &str,
        remote: &str,
        _set_upstream: bool,
        _mode: GitPushBranchMode,
    ) -> ErrorInfo {
        self.call(format!("push_branch:{remote}:{branch_name}")).await
    }

    async fn add_tag(
        &self,
        _repo: &str,
        tag_name: &str,
        _commit_hash: &str,
        _tag_type: TagType,
        _message: &str,
        _force: bool,
    ) -> ErrorInfo {
        self.call(format!("add_tag:{tag_name}")).await
    }

    async fn delete_tag(
        &self,
        _repo: &str,
        tag_name: &str,
        _delete_on_remote: Option<&str>,
    ) -> ErrorInfo {
        self.call(format!("delete_tag:{tag_name}")).await
    }

    async fn push_tag(
        &self,
        _repo: &str,
        _tag_name: &str,
        remote: &str,
        _commit_hash: &str,
        _skip_remote_check: bool,
    ) -> ErrorInfo {
        self.call(format!("push_tag:{remote}")).await
    }

    async fn cherrypick_commit(
        &self,
        _repo: &str,
        commit_hash: &str,
        _parent_index: u32,
        _record_origin: bool,
        _no_commit: bool,
    ) -> ErrorInfo {
        self.call(format!("cherrypick_commit:{commit_hash}")).await
    }

    async fn revert_commit(&self, _repo: &str, commit_hash: &str, _parent_index: u32) -> ErrorInfo {
        self.call(format!("revert_commit:{commit_hash}")).await
    }

    async fn drop_commit(&self, _repo: &str, commit_hash: &str) -> ErrorInfo {
        self.call(format!("drop_commit:{commit_hash}")).await
    }

    async fn reset_to_commit(&self, _repo: &str, commit: &str, _mode: GitResetMode) -> ErrorInfo {
        self.call(format!("reset_to_commit:{commit}")).await
    }

    async fn clean_untracked_files(&self, _repo: &str, _directories: bool) -> ErrorInfo {
        self.call("clean_untracked_files".to_string()).await
    }

    async fn reset_file_to_revision(
        &self,
        _repo: &str,
        _commit_hash: &str,
        file_path: &str,
    ) -> ErrorInfo {
        self.call(format!("reset_file_to_revision:{file_path}")).await
    }

    async fn apply_stash(&self, _repo: &str, selector: &str, _reinstate_index: bool) -> ErrorInfo {
        self.call(format!("apply_stash:{selector}")).await
    }

    async fn pop_stash(&self, _repo: &str, selector: &str, _reinstate_index: bool) -> ErrorInfo {
        self.call(format!("pop_stash:{selector}")).await
    }

    async fn drop_stash(&self, _repo: &str, selector: &str) -> ErrorInfo {
        self.call(format!("drop_stash:{selector}")).await
    }

    async fn branch_from_stash(
        &self,
        _repo: &str,
        selector: &str,
        branch_name: &str,
    ) -> ErrorInfo {
        self.call(format!("branch_from_stash:{selector}:{branch_name}"))
            .await
    }

    async fn push_stash(&self, _repo: &str, _message: &str, _include_untracked: bool) -> ErrorInfo {
        self.call("push_stash".to_string()).await
    }

    async fn set_config_value(
        &self,
        _repo: &str,
        key: GitUserKey,
        _value: &str,
        _location: GitConfigLocation,
    ) -> ErrorInfo {
        self.call(format!("set_config_value:{}", key.as_key())).await
    }

    async fn unset_config_value(
        &self,
        _repo: &str,
        key: GitUserKey,
        location: GitConfigLocation,
    ) -> ErrorInfo {
        self.call(format!(
            "unset_config_value:{}:{}",
            key.as_key(),
            location.as_flag()
        ))
        .await
    }
}

pub(crate) struct MockRepoManager {
    repos: Mutex<RepoSet>,
    events: broadcast::Sender<RepoChangeEvent>,
    check_calls: Mutex<usize>,
    search_finds: Mutex<bool>,
}

impl Default for MockRepoManager {
    fn default() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            repos: Mutex::new(RepoSet::new()),
            events,
            check_calls: Mutex::new(0),
            search_finds: Mutex::new(true),
        }
    }
}

impl MockRepoManager {
    pub fn with_repos(roots: &[&str]) -> Self {
        let manager = Self::default();
        *lock(&manager.repos) = repo_set(roots);
        manager
    }

    /// Replace the repository set and announce the change
    pub fn change(&self, roots: &[&str], load_repo: Option<&str>) {
        let repos = repo_set(roots);
        *lock(&self.repos) = repos.clone();
        // No subscribers is fine
        let _ = self
            .events
            .send(RepoChangeEvent::new(repos, load_repo.map(str::to_string)));
    }

    pub fn set_search_finds(&self, finds: bool) {
        *lock(&self.search_finds) = finds;
    }

    pub fn check_calls(&self) -> usize {
        *lock(&self.check_calls)
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}

#[async_trait]
impl RepoManager for MockRepoManager {
    fn repos(&self) -> RepoSet {
        lock(&self.repos).clone()
    }

    async fn check_repos_exist(&self) -> bool {
        *lock(&self.check_calls) += 1;
        false
    }

    async fn search_workspace_for_repos(&self) -> bool {
        *lock(&self.search_finds)
    }

    fn subscribe(&self) -> broadcast::Receiver<RepoChangeEvent> {
        self.events.subscribe()
    }
}

#[derive(Default)]
pub(crate) struct MockAvatars {
    cache: Mutex<HashMap<String, String>>,
    fetches: Mutex<Vec<String>>,
}

impl MockAvatars {
    pub fn cache(&self, email: &str, image: &str) {
        lock(&self.cache).insert(email.to_string(), image.to_string());
    }

    pub fn fetches(&self) -> Vec<String> {
        lock(&self.fetches).clone()
    }
}

#[async_trait]
impl AvatarResolver for MockAvatars {
    async fn get_avatar_image(&self, email: &str) -> Option<String> {
        lock(&self.cache).get(email).cloned()
    }

    fn fetch_avatar_image(
        &self,
        email: &str,
        _repo: &str,
        _remote: Option<&str>,
        _commits: &[String],
    ) {
        lock(&self.fetches).push(email.to_string());
    }
}

#[derive(Default)]
pub(crate) struct MockWorkbench {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, String>>,
    error_messages: Mutex<Vec<String>>,
}

impl MockWorkbench {
    pub fn fail(&self, label: &str, message: &str) {
        lock(&self.failures).insert(label.to_string(), message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn error_messages(&self) -> Vec<String> {
        lock(&self.error_messages).clone()
    }

    fn call(&self, label: String) -> ErrorInfo {
        lock(&self.calls).push(label.clone());
        lock(&self.failures).get(&label).cloned()
    }
}

#[async_trait]
impl Workbench for MockWorkbench {
    async fn view_scm(&self) -> ErrorInfo {
        self.call("view_scm".to_string())
    }

    async fn open_external_url(&self, url: &str) -> ErrorInfo {
        self.call(format!("open_external_url:{url}"))
    }

    async fn copy_to_clipboard(&self, kind: ClipboardKind, data: &str) -> ErrorInfo {
        self.call(format!("copy_to_clipboard:{kind:?}:{data}"))
    }

    async fn open_file(&self, _repo: &str, hash: Option<&str>, file_path: &str) -> ErrorInfo {
        self.call(format!("open_file:{}:{file_path}", hash.unwrap_or("-")))
    }

    async fn view_diff(&self, _repo: &str, target: &DiffTarget) -> ErrorInfo {
        self.call(format!("view_diff:{}", target.new_file_path))
    }

    fn show_error_message(&self, message: &str) {
        lock(&self.error_messages).push(message.to_string());
    }
}

/// Watch backend driven by the test
#[derive(Default)]
pub(crate) struct ManualWatchBackend {
    watches: Mutex<Vec<(PathBuf, mpsc::UnboundedSender<PathBuf>)>>,
    failing: AtomicBool,
}

impl ManualWatchBackend {
    pub fn failing() -> Self {
        let backend = Self::default();
        backend.set_failing(true);
        backend
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn watched_roots(&self) -> Vec<PathBuf> {
        lock(&self.watches)
            .iter()
            .map(|(root, _)| root.clone())
            .collect()
    }

    /// Send a change to the most recent watch
    pub fn emit(&self, path: PathBuf) {
        if let Some((_, events)) = lock(&self.watches).last() {
            let _ = events.send(path);
        }
    }

    pub fn emit_on(&self, index: usize, path: PathBuf) {
        if let Some((_, events)) = lock(&self.watches).get(index) {
            let _ = events.send(path);
        }
    }
}

impl WatchBackend for ManualWatchBackend {
    fn watch(
        &self,
        root: &Path,
        events: mpsc::UnboundedSender<PathBuf>,
    ) -> Result<WatchHandle, GraphViewError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(GraphViewError::Watch {
                path: root.to_path_buf(),
                message: "watch limit reached".to_string(),
            });
        }
        lock(&self.watches).push((root.to_path_buf(), events));
        Ok(Box::new(()))
    }
}

/// Concrete handles on the mocks behind a [`Collaborators`]
#[derive(Clone)]
pub(crate) struct Mocks {
    pub data_source: Arc<MockDataSource>,
    pub repo_manager: Arc<MockRepoManager>,
    pub state_store: Arc<FileStateStore>,
    pub avatars: Arc<MockAvatars>,
    pub workbench: Arc<MockWorkbench>,
}

impl Mocks {
    pub fn new(repo_manager: MockRepoManager) -> Self {
        Self {
            data_source: Arc::new(MockDataSource::default()),
            repo_manager: Arc::new(repo_manager),
            state_store: Arc::new(FileStateStore::in_memory()),
            avatars: Arc::new(MockAvatars::default()),
            workbench: Arc::new(MockWorkbench::default()),
        }
    }

    pub fn host_services(&self) -> HostServices {
        HostServices {
            data_source: self.data_source.clone(),
            repo_manager: self.repo_manager.clone(),
            avatars: self.avatars.clone(),
            workbench: self.workbench.clone(),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            data_source: self.data_source.clone(),
            repo_manager: self.repo_manager.clone(),
            state_store: self.state_store.clone(),
            avatars: self.avatars.clone(),
            workbench: self.workbench.clone(),
        }
    }
}

/// A router wired to mocks and a channel surface
pub(crate) struct RouterHarness {
    pub router: Arc<MessageRouter>,
    pub peer: SurfacePeer,
    pub mocks: Mocks,
    pub gate: FileWatcherGate,
    pub backend: Arc<ManualWatchBackend>,
    pub refresh: RefreshCoordinator,
    pub current_repo: CurrentRepo,
}

impl RouterHarness {
    pub fn new() -> Self {
        let mocks = Mocks::new(MockRepoManager::with_repos(&["/work/app"]));
        let (parts, peer) = ChannelSurface::pair();
        let backend = Arc::new(ManualWatchBackend::default());
        let gate = FileWatcherGate::new(WatcherConfig::default(), backend.clone(), || {});
        let refresh = RefreshCoordinator::new();
        let current_repo = CurrentRepo::default();
        let outbound = Outbound::new(parts.surface, mocks.workbench.clone());

        let router = MessageRouter::new(
            mocks.collaborators(),
            refresh.clone(),
            gate.clone(),
            outbound,
            current_repo.clone(),
        );
        mocks.data_source.probe_mute(gate.clone());

        Self {
            router: Arc::new(router),
            peer,
            mocks,
            gate,
            backend,
            refresh,
            current_repo,
        }
    }

    /// Dispatch the request encoded by `message` and return every message sent
    pub async fn request(&mut self, message: serde_json::Value) -> Vec<serde_json::Value> {
        match crate::protocol::InboundMessage::from_json(&message.to_string()) {
            Ok(crate::protocol::InboundMessage::Request(request)) => {
                self.router.dispatch(request).await
            }
            Ok(crate::protocol::InboundMessage::Notification(notification)) => {
                self.router.notify(notification).await
            }
            Err(e) => panic!("test message does not decode: {e}"),
        }
        self.peer.drain_messages()
    }

    /// Like [`RouterHarness::request`] for requests answered by exactly one message
    pub async fn respond(&mut self, message: serde_json::Value) -> serde_json::Value {
        let mut sent = self.request(message).await;
        assert_eq!(sent.len(), 1, "expected exactly one response, got {sent:?}");
        sent.remove(0)
    }
}
