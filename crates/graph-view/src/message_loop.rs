//! Inbound event loop of a session
//!
//! Reads events raised by the surface until the surface closes or the session
//! is disposed:
//! - raw messages are decoded and handled on their own task, so a slow
//!   request never holds up the ones behind it
//! - visibility changes and disposal are applied in order, inline
//!
//! Messages that fail to decode are logged and dropped.

use crate::protocol::InboundMessage;
use crate::session::GraphViewSession;
use crate::surface::SurfaceEvent;
use std::sync::Weak;
use tokio::sync::mpsc;

pub async fn run_message_loop(
    session: Weak<GraphViewSession>,
    mut events: mpsc::UnboundedReceiver<SurfaceEvent>,
) {
    log::debug!("Message loop started");

    while let Some(event) = events.recv().await {
        let Some(session) = session.upgrade() else {
            break;
        };
        if session.is_disposed() {
            break;
        }

        match event {
            SurfaceEvent::Message(text) => match InboundMessage::from_json(&text) {
                Ok(message) => {
                    tokio::spawn(async move {
                        session.handle(message).await;
                    });
                }
                Err(e) => log::error!("Dropped message from the graph view: {}", e),
            },
            SurfaceEvent::VisibilityChanged(visible) => session.set_visible(visible),
            SurfaceEvent::Disposed => {
                session.dispose();
                break;
            }
        }
    }

    log::debug!("Message loop stopped");
}
