//! Collaborator contracts for the graph view controller
//!
//! The controller talks to four external services. Each one is a trait so
//! hosts can plug in their own implementation and tests can use mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 graph-view controller                 │
//! └──────────────────────────────────────────────────────┘
//!      │              │                │              │
//!      ▼              ▼                ▼              ▼
//! ┌──────────┐ ┌─────────────┐ ┌──────────────┐ ┌───────────┐
//! │DataSource│ │ RepoManager │ │AvatarResolver│ │ Workbench │
//! │ (git ops)│ │ (repo set)  │ │  (images)    │ │ (host UI) │
//! └──────────┘ └─────────────┘ └──────────────┘ └───────────┘
//! ```

pub mod avatar;
pub mod data_source;
pub mod repo_manager;
pub mod types;
pub mod workbench;

pub use avatar::AvatarResolver;
pub use data_source::DataSource;
pub use repo_manager::{RepoChangeEvent, RepoManager};
pub use types::*;
pub use workbench::Workbench;

// Shared with the view configuration so both sides agree on the wire names
pub use graph_view_config::CommitOrdering;
