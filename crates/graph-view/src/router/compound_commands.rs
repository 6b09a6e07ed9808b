//! Requests made of several repository operations
//!
//! | Command | Policy | Steps |
//! |---------|--------|-------|
//! | `addTag` | short-circuit | create, push to `pushToRemote` |
//! | `pushTag` | short-circuit | push to each remote |
//! | `createBranch` | short-circuit | create, check out |
//! | `pushBranch` | short-circuit | push to each remote |
//! | `cherrypickCommit` | short-circuit | cherry-pick, show SCM view |
//! | `createPullRequest` | short-circuit | push (or skip), open URL |
//! | `editUserDetails` | short-circuit | set name, set email, unset local name, unset local email |
//! | `deleteBranch` | run-all | delete local, delete on each remote |
//! | `deleteUserDetails` | run-all | unset name, unset email |

use super::MessageRouter;
use crate::compound::CompoundOperation;
use crate::protocol::Response;
use crate::pull_request::{self, PullRequestConfig, PullRequestSource};
use graph_view_backend::{GitConfigLocation, GitPushBranchMode, GitUserKey, TagType};

impl MessageRouter {
    #[allow(clippy::too_many_arguments)]
    pub(super) async fn add_tag(
        &self,
        repo: &str,
        commit_hash: &str,
        tag_name: &str,
        tag_type: TagType,
        message: &str,
        push_to_remote: Option<&str>,
        force: bool,
    ) -> Response {
        let source = self.collaborators.data_source.as_ref();

        let mut op = CompoundOperation::short_circuit().step(
            source.add_tag(repo, tag_name, commit_hash, tag_type, message, force),
        );
        if let Some(remote) = push_to_remote {
            op = op.step(source.push_tag(repo, tag_name, remote, commit_hash, false));
        }

        Response::AddTag {
            errors: op.execute().await,
        }
    }

    pub(super) async fn push_tag(
        &self,
        repo: &str,
        tag_name: &str,
        remotes: &[String],
        commit_hash: &str,
        skip_remote_check: bool,
    ) -> Response {
        let source = self.collaborators.data_source.as_ref();

        let errors = CompoundOperation::short_circuit()
            .steps(remotes.iter().map(|remote| {
                source.push_tag(repo, tag_name, remote, commit_hash, skip_remote_check)
            }))
            .execute()
            .await;

        Response::PushTag { errors }
    }

    pub(super) async fn create_branch(
        &self,
        repo: &str,
        commit_hash: &str,
        branch_name: &str,
        checkout: bool,
        force: bool,
    ) -> Response {
        let source = self.collaborators.data_source.as_ref();

        let errors = CompoundOperation::short_circuit()
            .step(source.create_branch(repo, branch_name, commit_hash, force))
            .step_if(checkout, source.checkout_branch(repo, branch_name, None))
            .execute()
            .await;

        Response::CreateBranch { errors }
    }

    pub(super) async fn delete_branch(
        &self,
        repo: &str,
        branch_name: &str,
        force_delete: bool,
        delete_on_remotes: &[String],
    ) -> Response {
        let source = self.collaborators.data_source.as_ref();

        let errors = CompoundOperation::run_all()
            .step(source.delete_branch(repo, branch_name, force_delete))
            .steps(
                delete_on_remotes
                    .iter()
                    .map(|remote| source.delete_remote_branch(repo, branch_name, remote)),
            )
            .execute()
            .await;

        Response::DeleteBranch { errors }
    }

    pub(super) async fn push_branch(
        &self,
        repo: &str,
        branch_name: &str,
        remotes: &[String],
        set_upstream: bool,
        mode: GitPushBranchMode,
    ) -> Response {
        let source = self.collaborators.data_source.as_ref();

        let errors = CompoundOperation::short_circuit()
            .steps(remotes.iter().map(|remote| {
                source.push_branch(repo, branch_name, remote, set_upstream, mode)
            }))
            .execute()
            .await;

        Response::PushBranch { errors }
    }

    pub(super) async fn cherrypick_commit(
        &self,
        repo: &str,
        commit_hash: &str,
        parent_index: u32,
        record_origin: bool,
        no_commit: bool,
    ) -> Response {
        let source = self.collaborators.data_source.as_ref();
        let workbench = self.collaborators.workbench.as_ref();

        // Without a commit the picked changes are staged for the user to review
        let errors = CompoundOperation::short_circuit()
            .step(source.cherrypick_commit(
                repo,
                commit_hash,
                parent_index,
                record_origin,
                no_commit,
            ))
            .step_if(no_commit, workbench.view_scm())
            .execute()
            .await;

        Response::CherrypickCommit { errors }
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) async fn create_pull_request(
        &self,
        repo: &str,
        config: &PullRequestConfig,
        source_remote: &str,
        source_owner: &str,
        source_repo: &str,
        source_branch: &str,
        push: bool,
    ) -> Response {
        let source = self.collaborators.data_source.as_ref();
        let workbench = self.collaborators.workbench.as_ref();

        let errors = CompoundOperation::short_circuit()
            .step(async move {
                if push {
                    source
                        .push_branch(
                            repo,
                            source_branch,
                            source_remote,
                            true,
                            GitPushBranchMode::Normal,
                        )
                        .await
                } else {
                    None
                }
            })
            .step(async move {
                let target = PullRequestSource {
                    owner: source_owner,
                    repo: source_repo,
                    branch: source_branch,
                };
                match pull_request::build_url(config, target) {
                    Ok(url) => workbench.open_external_url(&url).await,
                    Err(e) => Some(e.to_string()),
                }
            })
            .execute()
            .await;

        Response::CreatePullRequest { push, errors }
    }

    pub(super) async fn edit_user_details(
        &self,
        repo: &str,
        name: &str,
        email: &str,
        location: GitConfigLocation,
        delete_local_name: bool,
        delete_local_email: bool,
    ) -> Response {
        let source = self.collaborators.data_source.as_ref();

        let errors = CompoundOperation::short_circuit()
            .step(source.set_config_value(repo, GitUserKey::Name, name, location))
            .step(source.set_config_value(repo, GitUserKey::Email, email, location))
            .step_if(
                delete_local_name,
                source.unset_config_value(repo, GitUserKey::Name, GitConfigLocation::Local),
            )
            .step_if(
                delete_local_email,
                source.unset_config_value(repo, GitUserKey::Email, GitConfigLocation::Local),
            )
            .execute()
            .await;

        Response::EditUserDetails { errors }
    }

    pub(super) async fn delete_user_details(
        &self,
        repo: &str,
        name: bool,
        email: bool,
        location: GitConfigLocation,
    ) -> Response {
        let source = self.collaborators.data_source.as_ref();

        let errors = CompoundOperation::run_all()
            .step_if(
                name,
                source.unset_config_value(repo, GitUserKey::Name, location),
            )
            .step_if(
                email,
                source.unset_config_value(repo, GitUserKey::Email, location),
            )
            .execute()
            .await;

        Response::DeleteUserDetails { errors }
    }
}
