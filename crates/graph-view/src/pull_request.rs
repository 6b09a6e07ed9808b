//! Pull request URL construction
//!
//! Each provider has a URL template with positional placeholders:
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `$1` | host root URL |
//! | `$2` | source owner |
//! | `$3` | source repository |
//! | `$4` | source branch |
//! | `$5` | destination owner |
//! | `$6` | destination repository |
//! | `$7` | destination project id |
//! | `$8` | destination branch |

use crate::error::GraphViewError;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const BITBUCKET_TEMPLATE: &str = "$1/$2/$3/pull-requests/new?source=$2/$3::$4&dest=$5/$6::$8";
const GITHUB_TEMPLATE: &str = "$1/$5/$6/compare/$8...$2:$4";
const GITLAB_TEMPLATE: &str =
    "$1/$2/$3/-/merge_requests/new?merge_request[source_branch]=$4&merge_request[target_branch]=$8";
const GITLAB_PROJECT_ID_SUFFIX: &str = "&merge_request[target_project_id]=$7";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestProvider {
    Bitbucket,
    Custom,
    GitHub,
    GitLab,
}

/// A user-defined provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProvider {
    pub name: String,
    pub template_url: String,
}

/// Per-repository pull request settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestConfig {
    pub provider: PullRequestProvider,
    pub custom: Option<CustomProvider>,
    pub host_root_url: String,
    pub source_remote: String,
    pub source_owner: String,
    pub source_repo: String,
    pub dest_remote: Option<String>,
    pub dest_owner: String,
    pub dest_repo: String,
    pub dest_project_id: String,
    pub dest_branch: String,
}

/// The source side of a pull request
#[derive(Debug, Clone, Copy)]
pub struct PullRequestSource<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    pub branch: &'a str,
}

/// Build the "new pull request" URL for `source` under `config`
pub fn build_url(
    config: &PullRequestConfig,
    source: PullRequestSource<'_>,
) -> Result<String, GraphViewError> {
    let template = match config.provider {
        PullRequestProvider::Bitbucket => BITBUCKET_TEMPLATE.to_string(),
        PullRequestProvider::GitHub => GITHUB_TEMPLATE.to_string(),
        PullRequestProvider::GitLab if config.dest_project_id.is_empty() => {
            GITLAB_TEMPLATE.to_string()
        }
        PullRequestProvider::GitLab => format!("{}{}", GITLAB_TEMPLATE, GITLAB_PROJECT_ID_SUFFIX),
        PullRequestProvider::Custom => config
            .custom
            .as_ref()
            .map(|custom| custom.template_url.clone())
            .ok_or(GraphViewError::MissingPullRequestTemplate)?,
    };

    let values: [&str; 8] = [
        config.host_root_url.trim_end_matches('/'),
        source.owner,
        source.repo,
        source.branch,
        &config.dest_owner,
        &config.dest_repo,
        &config.dest_project_id,
        &config.dest_branch,
    ];

    static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();
    let placeholder = PLACEHOLDER
        .get_or_init(|| {
            Regex::new(r"\$([1-8])")
                .map_err(|e| log::error!("Invalid placeholder pattern: {}", e))
                .ok()
        })
        .as_ref()
        .ok_or(GraphViewError::MissingPullRequestTemplate)?;

    let url = placeholder.replace_all(&template, |caps: &Captures| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| values.get(index - 1))
            .map(|value| value.to_string())
            .unwrap_or_default()
    });

    Ok(url.into_owned())
}
