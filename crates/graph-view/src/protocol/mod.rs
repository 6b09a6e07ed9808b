//! Wire protocol between the controller and the rendering surface
//!
//! Messages in both directions are JSON objects with a `command`
//! discriminator and camelCase fields.

mod initial_state;
mod request;
mod response;

pub use initial_state::{InitialState, RefreshSnapshot};
pub use request::{Notification, Request};
pub use response::Response;

use crate::error::GraphViewError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Correlation token the surface attaches to refresh-sensitive queries
///
/// Echoed back untouched so the surface can drop responses to queries it has
/// since superseded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshId(pub i64);

impl std::fmt::Display for RefreshId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the surface should navigate once repository data is loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadViewTarget {
    pub repo: String,
    pub commit_details: Option<CommitDetailsTarget>,
}

impl LoadViewTarget {
    pub fn repo(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            commit_details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDetailsTarget {
    pub commit_hash: String,
    pub compare_with_hash: Option<String>,
}

/// A decoded inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Request(Request),
    Notification(Notification),
}

impl InboundMessage {
    /// Decode a raw message from the surface
    ///
    /// The `command` field decides whether the message is a fire-and-forget
    /// notification or a request that expects a response.
    pub fn from_json(text: &str) -> Result<Self, GraphViewError> {
        let value: Value = serde_json::from_str(text)?;
        let command = value
            .get("command")
            .and_then(Value::as_str)
            .ok_or(GraphViewError::MissingCommand)?;

        if Notification::COMMANDS.contains(&command) {
            Ok(Self::Notification(serde_json::from_value(value)?))
        } else {
            Ok(Self::Request(serde_json::from_value(value)?))
        }
    }

    pub fn command(&self) -> &'static str {
        match self {
            Self::Request(request) => request.command(),
            Self::Notification(notification) => notification.command(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_view_backend::{CommitOrdering, GitResetMode, TagType};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decodes_request_with_refresh_id() {
        let text = json!({
            "command": "loadRepoInfo",
            "repo": "/work/app",
            "refreshId": 41,
            "showRemoteBranches": true,
            "showStashes": false,
            "hideRemotes": ["upstream"]
        })
        .to_string();

        let message = InboundMessage::from_json(&text).unwrap();
        assert_eq!(
            message,
            InboundMessage::Request(Request::LoadRepoInfo {
                repo: "/work/app".to_string(),
                refresh_id: RefreshId(41),
                show_remote_branches: true,
                show_stashes: false,
                hide_remotes: vec!["upstream".to_string()],
            })
        );
        assert_eq!(message.command(), "loadRepoInfo");
    }

    #[test]
    fn test_decodes_flattened_commit_query() {
        let text = json!({
            "command": "loadCommits",
            "repo": "/work/app",
            "refreshId": 3,
            "branches": null,
            "maxCommits": 300,
            "showTags": true,
            "showRemoteBranches": true,
            "includeCommitsMentionedByReflogs": false,
            "onlyFollowFirstParent": false,
            "commitOrdering": "topo",
            "remotes": ["origin"],
            "hideRemotes": [],
            "stashes": []
        })
        .to_string();

        match InboundMessage::from_json(&text).unwrap() {
            InboundMessage::Request(Request::LoadCommits {
                refresh_id, query, ..
            }) => {
                assert_eq!(refresh_id, RefreshId(3));
                assert_eq!(query.max_commits, 300);
                assert_eq!(query.commit_ordering, CommitOrdering::Topo);
                assert_eq!(query.branches, None);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_decodes_notifications_separately() {
        let text = json!({
            "command": "setRepoState",
            "repo": "/work/app",
            "state": {"columnWidths": [10, 20]}
        })
        .to_string();

        let message = InboundMessage::from_json(&text).unwrap();
        assert!(matches!(
            message,
            InboundMessage::Notification(Notification::SetRepoState { .. })
        ));
        assert_eq!(message.command(), "setRepoState");
    }

    #[test]
    fn test_decodes_renamed_type_fields() {
        let text = json!({
            "command": "addTag",
            "repo": "/r",
            "commitHash": "abc",
            "tagName": "v1",
            "type": "lightweight",
            "pushToRemote": "origin",
            "force": false
        })
        .to_string();

        match InboundMessage::from_json(&text).unwrap() {
            InboundMessage::Request(Request::AddTag {
                tag_type, message, ..
            }) => {
                assert_eq!(tag_type, TagType::Lightweight);
                assert_eq!(message, "");
            }
            other => panic!("unexpected message: {:?}", other),
        }

        let text = json!({
            "command": "resetToCommit",
            "repo": "/r",
            "commit": "abc",
            "resetMode": "hard"
        })
        .to_string();
        assert!(matches!(
            InboundMessage::from_json(&text).unwrap(),
            InboundMessage::Request(Request::ResetToCommit {
                reset_mode: GitResetMode::Hard,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_command_is_rejected() {
        let err = InboundMessage::from_json(r#"{"repo": "/r"}"#).unwrap_err();
        assert!(matches!(err, GraphViewError::MissingCommand));
    }

    #[test]
    fn test_unknown_command_is_a_decode_error() {
        let err = InboundMessage::from_json(r#"{"command": "formatDisk"}"#).unwrap_err();
        assert!(matches!(err, GraphViewError::Decode(_)));
    }

    #[test]
    fn test_load_view_target_wire_shape() {
        let target = LoadViewTarget {
            repo: "/r".to_string(),
            commit_details: Some(CommitDetailsTarget {
                commit_hash: "abc".to_string(),
                compare_with_hash: None,
            }),
        };
        assert_eq!(
            serde_json::to_value(&target).unwrap(),
            json!({
                "repo": "/r",
                "commitDetails": {"commitHash": "abc", "compareWithHash": null}
            })
        );
    }
}
