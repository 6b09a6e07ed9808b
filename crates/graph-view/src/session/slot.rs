use super::GraphViewSession;
use crate::avatar_relay::AvatarRelay;
use crate::error::GraphViewError;
use crate::protocol::LoadViewTarget;
use crate::router::{Collaborators, HostServices};
use crate::surface::SurfaceHost;
use crate::watcher::{NotifyBackend, WatchBackend};
use graph_view_config::{FileStateStore, ViewConfig};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Holds the single graph view session of a window
///
/// [`SessionSlot::create_or_reveal`] opens a session when there is none and
/// otherwise brings the existing one to the front. A disposed session counts
/// as no session.
pub struct SessionSlot {
    host: Arc<dyn SurfaceHost>,
    collaborators: Collaborators,
    config: ViewConfig,
    watch_backend: Arc<dyn WatchBackend>,
    relay: AvatarRelay,
    current: Mutex<Option<Arc<GraphViewSession>>>,
}

impl SessionSlot {
    pub fn new(
        host: Arc<dyn SurfaceHost>,
        collaborators: Collaborators,
        config: ViewConfig,
    ) -> Self {
        Self {
            host,
            collaborators,
            config,
            watch_backend: Arc::new(NotifyBackend),
            relay: AvatarRelay::new(),
            current: Mutex::new(None),
        }
    }

    /// A slot configured from `.graph-view.toml` and persisting state in the
    /// user's config directory
    ///
    /// Also starts file logging unless the host already enabled a logger.
    pub fn from_environment(
        host: Arc<dyn SurfaceHost>,
        services: HostServices,
    ) -> anyhow::Result<Self> {
        if log::max_level() == log::LevelFilter::Off {
            crate::logger::init(&crate::logger::log_file_path())?;
        }
        let state_store = Arc::new(FileStateStore::load_default()?);
        let config = ViewConfig::load();
        Ok(Self::new(host, services.with_state_store(state_store), config))
    }

    /// Like [`Self::from_environment`] with explicit config directories and
    /// state file
    pub fn from_locations(
        host: Arc<dyn SurfaceHost>,
        services: HostServices,
        config_dirs: &[PathBuf],
        state_path: &Path,
    ) -> Self {
        let config = ViewConfig::load_from(config_dirs);
        let state_store = Arc::new(FileStateStore::load(state_path));
        Self::new(host, services.with_state_store(state_store), config)
    }

    /// Use `backend` instead of the native file watcher
    pub fn with_watch_backend(mut self, backend: Arc<dyn WatchBackend>) -> Self {
        self.watch_backend = backend;
        self
    }

    /// Show the graph view, navigating to `target` if given
    ///
    /// Must be called from within a tokio runtime.
    pub fn create_or_reveal(
        &self,
        target: Option<LoadViewTarget>,
    ) -> Result<Arc<GraphViewSession>, GraphViewError> {
        let mut current = self.lock();

        if let Some(session) = current.as_ref().filter(|s| !s.is_disposed()) {
            session.reveal(target);
            return Ok(Arc::clone(session));
        }

        let session = GraphViewSession::open(
            self.host.as_ref(),
            self.collaborators.clone(),
            self.config.clone(),
            Arc::clone(&self.watch_backend),
            self.relay.clone(),
            target,
        )?;
        *current = Some(Arc::clone(&session));
        Ok(session)
    }

    /// The open session, if any
    pub fn current(&self) -> Option<Arc<GraphViewSession>> {
        let mut current = self.lock();
        if current.as_ref().is_some_and(|s| s.is_disposed()) {
            current.take();
        }
        current.clone()
    }

    /// Handle for delivering background-fetched avatars to the open session
    pub fn avatar_relay(&self) -> AvatarRelay {
        self.relay.clone()
    }

    /// Dispose the open session and empty the slot
    pub fn dispose(&self) {
        let session = self.lock().take();
        if let Some(session) = session {
            session.dispose();
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<GraphViewSession>>> {
        self.current.lock().unwrap_or_else(|p| p.into_inner())
    }
}
