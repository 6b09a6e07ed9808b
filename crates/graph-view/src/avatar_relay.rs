//! Delivers avatars resolved in the background to the open graph view

use crate::protocol::Response;
use crate::transport::Outbound;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared handle the avatar resolver uses to push images to the active session
#[derive(Clone, Default)]
pub struct AvatarRelay {
    target: Arc<Mutex<Option<Outbound>>>,
}

impl AvatarRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, outbound: Outbound) {
        *self.lock() = Some(outbound);
    }

    pub(crate) fn deregister(&self) {
        self.lock().take();
    }

    pub fn is_connected(&self) -> bool {
        self.lock().is_some()
    }

    /// Push `image` for `email` to the active session, if there is one
    pub fn deliver(&self, email: &str, image: &str) {
        let target = self.lock().clone();
        match target {
            Some(outbound) => outbound.send(Response::FetchAvatar {
                email: email.to_string(),
                image: Some(image.to_string()),
            }),
            None => log::debug!("No graph view open for the avatar of {}", email),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Outbound>> {
        self.target.lock().unwrap_or_else(|p| p.into_inner())
    }
}
