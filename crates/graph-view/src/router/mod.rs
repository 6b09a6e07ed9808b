//! Request dispatch
//!
//! [`MessageRouter`] maps every inbound [`Request`] to its handler and sends
//! exactly one [`Response`] with the same command tag. [`Notification`]s are
//! handled without a reply.
//!
//! The file watcher gate is muted for the whole time a handler runs, so the
//! command's own writes to the repository do not bounce back as a refresh.
//! The mute is a scoped guard and is released on every exit path.

mod compound_commands;
mod queries;

use crate::protocol::{Notification, Request, Response};
use crate::refresh::RefreshCoordinator;
use crate::session::CurrentRepo;
use crate::transport::Outbound;
use crate::watcher::FileWatcherGate;
use graph_view_backend::{AvatarResolver, DataSource, RepoManager, Workbench};
use graph_view_config::ExtensionStateStore;
use std::sync::Arc;

/// The external services a session works with
#[derive(Clone)]
pub struct Collaborators {
    pub data_source: Arc<dyn DataSource>,
    pub repo_manager: Arc<dyn RepoManager>,
    pub state_store: Arc<dyn ExtensionStateStore>,
    pub avatars: Arc<dyn AvatarResolver>,
    pub workbench: Arc<dyn Workbench>,
}

/// The services a host provides; the state store is opened by the controller
#[derive(Clone)]
pub struct HostServices {
    pub data_source: Arc<dyn DataSource>,
    pub repo_manager: Arc<dyn RepoManager>,
    pub avatars: Arc<dyn AvatarResolver>,
    pub workbench: Arc<dyn Workbench>,
}

impl HostServices {
    pub fn with_state_store(self, state_store: Arc<dyn ExtensionStateStore>) -> Collaborators {
        Collaborators {
            data_source: self.data_source,
            repo_manager: self.repo_manager,
            state_store,
            avatars: self.avatars,
            workbench: self.workbench,
        }
    }
}

pub struct MessageRouter {
    collaborators: Collaborators,
    refresh: RefreshCoordinator,
    gate: FileWatcherGate,
    outbound: Outbound,
    current_repo: CurrentRepo,
}

impl MessageRouter {
    pub(crate) fn new(
        collaborators: Collaborators,
        refresh: RefreshCoordinator,
        gate: FileWatcherGate,
        outbound: Outbound,
        current_repo: CurrentRepo,
    ) -> Self {
        Self {
            collaborators,
            refresh,
            gate,
            outbound,
            current_repo,
        }
    }

    /// Handle `request` and send its response
    pub async fn dispatch(&self, request: Request) {
        let command = request.command();
        log::debug!("Handling \"{}\"", command);

        let _mute = self.gate.mute();
        let response = self.respond(request).await;
        self.outbound.send(response);
        log::trace!("Handled \"{}\"", command);
    }

    /// Persist the state carried by `notification`
    pub async fn notify(&self, notification: Notification) {
        let command = notification.command();
        log::debug!("Handling \"{}\"", command);

        let _mute = self.gate.mute();
        let store = &self.collaborators.state_store;
        let result = match notification {
            Notification::CodeReviewFileReviewed {
                repo,
                id,
                file_path,
            } => store.update_code_review(&repo, &id, &file_path),
            Notification::SetRepoState { repo, state } => store.set_repo_state(&repo, state),
        };

        if let Err(e) = result {
            log::warn!("Failed to persist \"{}\": {:#}", command, e);
        }
    }

    async fn respond(&self, request: Request) -> Response {
        let source = self.collaborators.data_source.as_ref();
        let workbench = self.collaborators.workbench.as_ref();

        match request {
            // === Queries ===
            Request::LoadRepos { check } => self.load_repos(check).await,
            Request::LoadRepoInfo {
                repo,
                refresh_id,
                show_remote_branches,
                show_stashes,
                hide_remotes,
            } => {
                self.load_repo_info(
                    repo,
                    refresh_id,
                    show_remote_branches,
                    show_stashes,
                    hide_remotes,
                )
                .await
            }
            Request::LoadCommits {
                repo,
                refresh_id,
                query,
            } => self.load_commits(repo, refresh_id, query).await,
            Request::CommitDetails {
                repo,
                commit_hash,
                has_parents,
                stash,
                avatar_email,
                refresh,
            } => {
                self.commit_details(repo, commit_hash, has_parents, stash, avatar_email, refresh)
                    .await
            }
            Request::CompareCommits {
                repo,
                commit_hash,
                compare_with_hash,
                from_hash,
                to_hash,
                refresh,
            } => {
                self.compare_commits(
                    repo,
                    commit_hash,
                    compare_with_hash,
                    from_hash,
                    to_hash,
                    refresh,
                )
                .await
            }
            Request::TagDetails {
                repo,
                tag_name,
                commit_hash,
            } => Response::TagDetails {
                data: source.get_tag_details(&repo, &tag_name).await,
                tag_name,
                commit_hash,
            },
            Request::LoadConfig { repo, remotes } => Response::LoadConfig {
                data: source.get_config(&repo, &remotes).await,
                repo,
            },
            Request::FetchAvatar {
                email,
                repo,
                remote,
                commits,
            } => self.fetch_avatar(email, repo, remote, commits).await,
            Request::RescanForRepos => self.rescan_for_repos().await,

            // === Remotes ===
            Request::AddRemote {
                repo,
                name,
                url,
                push_url,
                fetch,
            } => Response::AddRemote {
                error: source
                    .add_remote(&repo, &name, &url, push_url.as_deref(), fetch)
                    .await,
            },
            Request::DeleteRemote { repo, name } => Response::DeleteRemote {
                error: source.delete_remote(&repo, &name).await,
            },
            Request::EditRemote { repo, edit } => Response::EditRemote {
                error: source.edit_remote(&repo, &edit).await,
            },
            Request::PruneRemote { repo, name } => Response::PruneRemote {
                error: source.prune_remote(&repo, &name).await,
            },
            Request::Fetch {
                repo,
                name,
                prune,
                prune_tags,
            } => Response::Fetch {
                error: source
                    .fetch(&repo, name.as_deref(), prune, prune_tags)
                    .await,
            },
            Request::FetchIntoLocalBranch {
                repo,
                remote,
                remote_branch,
                local_branch,
                force,
            } => Response::FetchIntoLocalBranch {
                error: source
                    .fetch_into_local_branch(&repo, &remote, &remote_branch, &local_branch, force)
                    .await,
            },

            // === Branches ===
            Request::CheckoutBranch {
                repo,
                branch_name,
                remote_branch,
            } => Response::CheckoutBranch {
                error: source
                    .checkout_branch(&repo, &branch_name, remote_branch.as_deref())
                    .await,
            },
            Request::CheckoutCommit { repo, commit_hash } => Response::CheckoutCommit {
                error: source.checkout_commit(&repo, &commit_hash).await,
            },
            Request::CreateBranch {
                repo,
                commit_hash,
                branch_name,
                checkout,
                force,
            } => {
                self.create_branch(&repo, &commit_hash, &branch_name, checkout, force)
                    .await
            }
            Request::RenameBranch {
                repo,
                old_name,
                new_name,
            } => Response::RenameBranch {
                error: source.rename_branch(&repo, &old_name, &new_name).await,
            },
            Request::DeleteBranch {
                repo,
                branch_name,
                force_delete,
                delete_on_remotes,
            } => {
                self.delete_branch(&repo, &branch_name, force_delete, &delete_on_remotes)
                    .await
            }
            Request::DeleteRemoteBranch {
                repo,
                branch_name,
                remote,
            } => Response::DeleteRemoteBranch {
                error: source
                    .delete_remote_branch(&repo, &branch_name, &remote)
                    .await,
            },
            Request::Merge {
                repo,
                obj,
                action_on,
                options,
            } => Response::Merge {
                error: source.merge(&repo, &obj, action_on, options).await,
            },
            Request::Rebase {
                repo,
                obj,
                action_on,
                ignore_date,
                interactive,
            } => Response::Rebase {
                error: source
                    .rebase(&repo, &obj, action_on, ignore_date, interactive)
                    .await,
            },
            Request::PullBranch {
                repo,
                branch_name,
                remote,
                create_new_commit,
                squash,
            } => Response::PullBranch {
                error: source
                    .pull_branch(&repo, &branch_name, &remote, create_new_commit, squash)
                    .await,
            },
            Request::PushBranch {
                repo,
                branch_name,
                remotes,
                set_upstream,
                mode,
            } => {
                self.push_branch(&repo, &branch_name, &remotes, set_upstream, mode)
                    .await
            }

            // === Tags ===
            Request::AddTag {
                repo,
                commit_hash,
                tag_name,
                tag_type,
                message,
                push_to_remote,
                force,
            } => {
                self.add_tag(
                    &repo,
                    &commit_hash,
                    &tag_name,
                    tag_type,
                    &message,
                    push_to_remote.as_deref(),
                    force,
                )
                .await
            }
            Request::DeleteTag {
                repo,
                tag_name,
                delete_on_remote,
            } => Response::DeleteTag {
                error: source
                    .delete_tag(&repo, &tag_name, delete_on_remote.as_deref())
                    .await,
            },
            Request::PushTag {
                repo,
                tag_name,
                remotes,
                commit_hash,
                skip_remote_check,
            } => {
                self.push_tag(&repo, &tag_name, &remotes, &commit_hash, skip_remote_check)
                    .await
            }

            // === Commits ===
            Request::CherrypickCommit {
                repo,
                commit_hash,
                parent_index,
                record_origin,
                no_commit,
            } => {
                self.cherrypick_commit(&repo, &commit_hash, parent_index, record_origin, no_commit)
                    .await
            }
            Request::RevertCommit {
                repo,
                commit_hash,
                parent_index,
            } => Response::RevertCommit {
                error: source
                    .revert_commit(&repo, &commit_hash, parent_index)
                    .await,
            },
            Request::DropCommit { repo, commit_hash } => Response::DropCommit {
                error: source.drop_commit(&repo, &commit_hash).await,
            },
            Request::ResetToCommit {
                repo,
                commit,
                reset_mode,
            } => Response::ResetToCommit {
                error: source.reset_to_commit(&repo, &commit, reset_mode).await,
            },
            Request::CleanUntrackedFiles { repo, directories } => Response::CleanUntrackedFiles {
                error: source.clean_untracked_files(&repo, directories).await,
            },
            Request::ResetFileToRevision {
                repo,
                commit_hash,
                file_path,
            } => Response::ResetFileToRevision {
                error: source
                    .reset_file_to_revision(&repo, &commit_hash, &file_path)
                    .await,
            },

            // === Stashes ===
            Request::ApplyStash {
                repo,
                selector,
                reinstate_index,
            } => Response::ApplyStash {
                error: source.apply_stash(&repo, &selector, reinstate_index).await,
            },
            Request::PopStash {
                repo,
                selector,
                reinstate_index,
            } => Response::PopStash {
                error: source.pop_stash(&repo, &selector, reinstate_index).await,
            },
            Request::DropStash { repo, selector } => Response::DropStash {
                error: source.drop_stash(&repo, &selector).await,
            },
            Request::BranchFromStash {
                repo,
                selector,
                branch_name,
            } => Response::BranchFromStash {
                error: source
                    .branch_from_stash(&repo, &selector, &branch_name)
                    .await,
            },
            Request::PushStash {
                repo,
                message,
                include_untracked,
            } => Response::PushStash {
                error: source.push_stash(&repo, &message, include_untracked).await,
            },

            // === User identity ===
            Request::EditUserDetails {
                repo,
                name,
                email,
                location,
                delete_local_name,
                delete_local_email,
            } => {
                self.edit_user_details(
                    &repo,
                    &name,
                    &email,
                    location,
                    delete_local_name,
                    delete_local_email,
                )
                .await
            }
            Request::DeleteUserDetails {
                repo,
                name,
                email,
                location,
            } => self.delete_user_details(&repo, name, email, location).await,

            // === Pull requests ===
            Request::CreatePullRequest {
                repo,
                config,
                source_remote,
                source_owner,
                source_repo,
                source_branch,
                push,
            } => {
                self.create_pull_request(
                    &repo,
                    &config,
                    &source_remote,
                    &source_owner,
                    &source_repo,
                    &source_branch,
                    push,
                )
                .await
            }

            // === Code review ===
            Request::StartCodeReview {
                repo,
                id,
                files,
                last_viewed_file,
                commit_hash,
                compare_with_hash,
            } => self.start_code_review(
                repo,
                id,
                files,
                last_viewed_file,
                commit_hash,
                compare_with_hash,
            ),
            Request::EndCodeReview { repo, id } => self.end_code_review(&repo, &id),

            // === Host workbench ===
            Request::ViewScm => Response::ViewScm {
                error: workbench.view_scm().await,
            },
            Request::OpenExternalUrl { url } => Response::OpenExternalUrl {
                error: workbench.open_external_url(&url).await,
            },
            Request::CopyToClipboard { kind, data } => Response::CopyToClipboard {
                error: workbench.copy_to_clipboard(kind, &data).await,
            },
            Request::OpenFile {
                repo,
                hash,
                file_path,
            } => Response::OpenFile {
                error: workbench
                    .open_file(&repo, hash.as_deref(), &file_path)
                    .await,
            },
            Request::ViewDiff { repo, target } => Response::ViewDiff {
                error: workbench.view_diff(&repo, &target).await,
            },
        }
    }

    /// Make `repo` the session's current repository and watch it
    ///
    /// The repository is only recorded once its watch is in place, so a
    /// failed watch is retried by the next repository load. Nothing changes
    /// while the gate is suspended.
    fn switch_current_repo(&self, repo: &str) {
        if self.current_repo.get().as_deref() == Some(repo) {
            return;
        }
        match self.gate.start(repo) {
            Ok(true) => {}
            Ok(false) => {
                log::debug!("Ignoring repository {} while the view is inactive", repo);
                return;
            }
            Err(e) => {
                log::error!("{}", e);
                self.current_repo.clear();
                return;
            }
        }
        self.current_repo.replace(repo);
        if !self.gate.is_enabled() {
            // Suspended between starting the watch and recording the repo
            self.current_repo.clear();
            return;
        }
        log::info!("Current repository is now {}", repo);

        if let Err(e) = self
            .collaborators
            .state_store
            .set_last_active_repo(Some(repo))
        {
            log::warn!("Failed to remember last active repository: {:#}", e);
        }
    }
}
