//! Reacts to changes of the known repository set
//!
//! The graph shell differs between "no repositories" and "some repositories",
//! so crossing that boundary needs a full render. Any other change only needs
//! the new repository list pushed to the shell that is already there.

use graph_view_backend::RepoChangeEvent;
use std::sync::Mutex;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSetAction {
    FullRender,
    PushRepos,
}

/// Decide how a session showing `is_loaded` reacts to a set of `num_repos`
pub fn classify(is_loaded: bool, num_repos: usize) -> RepoSetAction {
    if (num_repos == 0 && is_loaded) || (num_repos > 0 && !is_loaded) {
        RepoSetAction::FullRender
    } else {
        RepoSetAction::PushRepos
    }
}

/// Forwards repository manager events to a session while attached
#[derive(Default)]
pub struct RepoSetBroadcaster {
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl RepoSetBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start forwarding events from `events` to `on_event`
    ///
    /// Replaces any previous subscription. Must be called from within a tokio
    /// runtime.
    pub fn attach<F>(&self, mut events: broadcast::Receiver<RepoChangeEvent>, on_event: F)
    where
        F: Fn(RepoChangeEvent) + Send + 'static,
    {
        let listener = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => on_event(event),
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!("Missed {} repository set changes", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        let previous = self
            .listener
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .replace(listener);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Stop forwarding. The subscription is released with the listener task.
    pub fn detach(&self) {
        let listener = self.listener.lock().unwrap_or_else(|p| p.into_inner()).take();
        if let Some(listener) = listener {
            listener.abort();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .as_ref()
            .is_some_and(|listener| !listener.is_finished())
    }
}

impl Drop for RepoSetBroadcaster {
    fn drop(&mut self) {
        self.detach();
    }
}
