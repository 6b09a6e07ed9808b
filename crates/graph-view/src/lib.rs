//! Graph view session controller
//!
//! Sits between a rendering surface, which only speaks serialized messages,
//! and the repository collaborators from `graph-view-backend`. It correlates
//! requests with responses, keeps the file watcher quiet while commands run
//! and manages the surface's lifecycle as it is shown, hidden and closed.
//!
//! # Message flow
//!
//! ```text
//!  surface ──json──▶ message_loop ──Request──▶ MessageRouter ──▶ DataSource
//!     ▲                                             │
//!     │                                       (gate muted)
//!     └──────────── Outbound ◀──Response────────────┘
//! ```
//!
//! Visibility changes, repository set changes and file changes reach the
//! [`GraphViewSession`] directly and may re-render or push state without a
//! request.

pub mod avatar_relay;
pub mod broadcaster;
pub mod compound;
pub mod error;
pub mod logger;
pub mod message_loop;
pub mod protocol;
pub mod pull_request;
pub mod refresh;
pub mod router;
pub mod session;
pub mod surface;
pub mod transport;
pub mod watcher;

#[cfg(test)]
pub(crate) mod test_support;

pub use avatar_relay::AvatarRelay;
pub use compound::{CompoundOperation, FailurePolicy};
pub use error::GraphViewError;
pub use message_loop::run_message_loop;
pub use protocol::{
    CommitDetailsTarget, InboundMessage, LoadViewTarget, Notification, RefreshId, Request,
    Response,
};
pub use refresh::{QueryClass, RefreshCoordinator};
pub use router::{Collaborators, HostServices, MessageRouter};
pub use session::{GraphViewSession, Lifecycle, SessionSlot};
pub use surface::{
    ChannelSurface, ChannelSurfaceHost, OutboundFrame, RenderedView, Surface, SurfaceEvent,
    SurfaceHost, SurfaceParts, SurfacePeer,
};
pub use watcher::{FileWatcherGate, MuteGuard, NotifyBackend, WatchBackend};
