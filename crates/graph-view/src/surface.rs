//! Rendering surface contract
//!
//! A surface is the sandboxed UI hosting the graph. The controller renders it,
//! posts messages to it, reveals it and disposes it; everything coming back
//! arrives as [`SurfaceEvent`]s on a channel.
//!
//! [`ChannelSurface`] implements the contract over plain channels. Hosts embed
//! it by driving the matching [`SurfacePeer`].

use crate::error::GraphViewError;
use crate::protocol::{InitialState, Response};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// What a full render shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum RenderedView {
    /// The git executable could not be found
    GitUnavailable { message: String },
    /// No repositories are known
    NoRepositories,
    /// The interactive graph
    Graph(InitialState),
}

/// Events raised by a surface
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// A raw JSON message from the graph view
    Message(String),
    VisibilityChanged(bool),
    /// The user or the host closed the surface
    Disposed,
}

pub trait Surface: Send + Sync {
    fn post(&self, message: &Response) -> Result<(), GraphViewError>;

    /// Replace the surface's contents
    fn render(&self, view: RenderedView) -> Result<(), GraphViewError>;

    /// Bring the surface to the front
    fn reveal(&self);

    /// Close the surface. Safe to call more than once.
    fn dispose(&self);
}

/// A newly created surface and the stream of its events
pub struct SurfaceParts {
    pub surface: Arc<dyn Surface>,
    pub events: mpsc::UnboundedReceiver<SurfaceEvent>,
}

/// Creates surfaces on demand
pub trait SurfaceHost: Send + Sync {
    fn create_surface(&self) -> Result<SurfaceParts, GraphViewError>;
}

/// Everything a [`ChannelSurface`] sends towards the UI
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundFrame {
    Render(RenderedView),
    /// A serialized [`Response`]
    Message(String),
    Reveal,
    Dispose,
}

pub struct ChannelSurface {
    frames: mpsc::UnboundedSender<OutboundFrame>,
    closed: AtomicBool,
}

impl ChannelSurface {
    /// Create a surface together with the peer that drives it
    pub fn pair() -> (SurfaceParts, SurfacePeer) {
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let surface = Arc::new(ChannelSurface {
            frames: frames_tx,
            closed: AtomicBool::new(false),
        });

        (
            SurfaceParts {
                surface,
                events: events_rx,
            },
            SurfacePeer {
                events: events_tx,
                frames: frames_rx,
            },
        )
    }

    fn send(&self, frame: OutboundFrame) -> Result<(), GraphViewError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(GraphViewError::SurfaceClosed);
        }
        self.frames
            .send(frame)
            .map_err(|_| GraphViewError::SurfaceClosed)
    }
}

impl Surface for ChannelSurface {
    fn post(&self, message: &Response) -> Result<(), GraphViewError> {
        let text = serde_json::to_string(message)?;
        self.send(OutboundFrame::Message(text))
    }

    fn render(&self, view: RenderedView) -> Result<(), GraphViewError> {
        self.send(OutboundFrame::Render(view))
    }

    fn reveal(&self) {
        if self.send(OutboundFrame::Reveal).is_err() {
            log::debug!("Reveal requested for a closed surface");
        }
    }

    fn dispose(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        // The UI side may already be gone
        let _ = self.frames.send(OutboundFrame::Dispose);
    }
}

/// The UI end of a [`ChannelSurface`]
pub struct SurfacePeer {
    events: mpsc::UnboundedSender<SurfaceEvent>,
    frames: mpsc::UnboundedReceiver<OutboundFrame>,
}

impl SurfacePeer {
    /// Deliver a raw message to the controller
    pub fn send(&self, message: impl Into<String>) -> bool {
        self.events.send(SurfaceEvent::Message(message.into())).is_ok()
    }

    pub fn set_visible(&self, visible: bool) -> bool {
        self.events
            .send(SurfaceEvent::VisibilityChanged(visible))
            .is_ok()
    }

    /// Close the surface from the UI side
    pub fn close(&self) -> bool {
        self.events.send(SurfaceEvent::Disposed).is_ok()
    }

    pub async fn recv(&mut self) -> Option<OutboundFrame> {
        self.frames.recv().await
    }

    /// Every frame sent so far that has not been read yet
    pub fn drain(&mut self) -> Vec<OutboundFrame> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.frames.try_recv() {
            frames.push(frame);
        }
        frames
    }

    /// Drain pending frames and decode the messages among them
    pub fn drain_messages(&mut self) -> Vec<serde_json::Value> {
        self.drain()
            .into_iter()
            .filter_map(|frame| match frame {
                OutboundFrame::Message(text) => serde_json::from_str(&text).ok(),
                _ => None,
            })
            .collect()
    }
}

/// [`SurfaceHost`] handing out [`ChannelSurface`]s
///
/// The peer of every created surface is kept until taken with
/// [`ChannelSurfaceHost::take_peer`].
#[derive(Default)]
pub struct ChannelSurfaceHost {
    peers: Mutex<Vec<SurfacePeer>>,
    created: AtomicBool,
}

impl ChannelSurfaceHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest peer not taken yet
    pub fn take_peer(&self) -> Option<SurfacePeer> {
        let mut peers = self.peers.lock().unwrap_or_else(|p| p.into_inner());
        if peers.is_empty() {
            None
        } else {
            Some(peers.remove(0))
        }
    }

    pub fn has_created(&self) -> bool {
        self.created.load(Ordering::SeqCst)
    }
}

impl SurfaceHost for ChannelSurfaceHost {
    fn create_surface(&self) -> Result<SurfaceParts, GraphViewError> {
        let (parts, peer) = ChannelSurface::pair();
        self.peers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(peer);
        self.created.store(true, Ordering::SeqCst);
        Ok(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_posts_serialized_messages() {
        let (parts, mut peer) = ChannelSurface::pair();
        parts.surface.post(&Response::Refresh).unwrap();
        parts.surface.reveal();

        let frames = peer.drain();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], OutboundFrame::Reveal);
        match &frames[0] {
            OutboundFrame::Message(text) => {
                let value: serde_json::Value = serde_json::from_str(text).unwrap();
                assert_eq!(value, json!({"command": "refresh"}));
            }
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[test]
    fn test_disposed_surface_rejects_posts() {
        let (parts, mut peer) = ChannelSurface::pair();
        parts.surface.dispose();
        parts.surface.dispose();

        let err = parts.surface.post(&Response::Refresh).unwrap_err();
        assert!(matches!(err, GraphViewError::SurfaceClosed));
        assert_eq!(peer.drain(), vec![OutboundFrame::Dispose]);
    }

    #[test]
    fn test_post_fails_when_peer_is_gone() {
        let (parts, peer) = ChannelSurface::pair();
        drop(peer);

        assert!(parts.surface.render(RenderedView::NoRepositories).is_err());
    }

    #[test]
    fn test_host_hands_out_peers_in_order() {
        let host = ChannelSurfaceHost::new();
        assert!(!host.has_created());

        let first = host.create_surface().unwrap();
        let _second = host.create_surface().unwrap();
        assert!(host.has_created());

        let mut peer = host.take_peer().unwrap();
        first.surface.reveal();
        assert_eq!(peer.drain(), vec![OutboundFrame::Reveal]);
        assert!(host.take_peer().is_some());
        assert!(host.take_peer().is_none());
    }

    #[test]
    fn test_rendered_view_is_tagged() {
        assert_eq!(
            serde_json::to_value(RenderedView::NoRepositories).unwrap(),
            json!({"view": "noRepositories"})
        );
    }
}
