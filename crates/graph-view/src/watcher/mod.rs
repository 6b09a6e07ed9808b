//! File watcher gate
//!
//! Watches the active repository and tells its owner when the repository
//! changed on disk, unless the change was most likely caused by one of our
//! own commands.
//!
//! # States
//!
//! ```text
//!            start(repo)               start(other)
//! stopped ───────────────▶ watching ───────────────▶ watching(other)
//!    ▲                        │
//!    └──────── stop() ────────┘
//! ```
//!
//! A suspended gate refuses to start watching until it is resumed, and a
//! closed gate never watches again. Owners suspend it while their view is
//! hidden, so a request finishing late cannot leave a watch behind.
//!
//! Muting is orthogonal to the watch state. It is a counter: every
//! [`FileWatcherGate::mute`] hands out a [`MuteGuard`] and changes are dropped
//! while any guard is alive, so overlapping commands cannot unmute each other.
//! After the last guard drops, changes stay suppressed for a short grace
//! period to swallow the command's trailing writes.
//!
//! Accepted changes are debounced: a burst of writes produces one signal.

mod filter;

pub use filter::is_relevant;

use crate::error::GraphViewError;
use graph_view_config::WatcherConfig;
use notify::{RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Keeps an OS watch alive until dropped
pub type WatchHandle = Box<dyn Send>;

/// Source of raw file change events
pub trait WatchBackend: Send + Sync {
    /// Watch `root` recursively and send every changed path to `events`
    fn watch(
        &self,
        root: &Path,
        events: mpsc::UnboundedSender<PathBuf>,
    ) -> Result<WatchHandle, GraphViewError>;
}

/// [`WatchBackend`] on top of the platform's native watcher
#[derive(Debug, Default, Clone, Copy)]
pub struct NotifyBackend;

impl WatchBackend for NotifyBackend {
    fn watch(
        &self,
        root: &Path,
        events: mpsc::UnboundedSender<PathBuf>,
    ) -> Result<WatchHandle, GraphViewError> {
        let watch_error = |e: notify::Error| GraphViewError::Watch {
            path: root.to_path_buf(),
            message: e.to_string(),
        };

        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_create() || event.kind.is_modify() || event.kind.is_remove())
                    {
                        return;
                    }
                    for path in event.paths {
                        // Receiver gone means the watch is being torn down
                        let _ = events.send(path);
                    }
                }
                Err(e) => log::warn!("File watcher error: {}", e),
            })
            .map_err(watch_error)?;
        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(watch_error)?;

        Ok(Box::new(watcher))
    }
}

type OnChange = Arc<dyn Fn() + Send + Sync>;

/// Cheaply cloneable handle to a session's file watcher
#[derive(Clone)]
pub struct FileWatcherGate {
    shared: Arc<GateShared>,
}

struct GateShared {
    config: WatcherConfig,
    backend: Arc<dyn WatchBackend>,
    on_change: OnChange,
    state: Mutex<GateState>,
}

struct GateState {
    active: Option<ActiveWatch>,
    suspended: bool,
    closed: bool,
    mute_count: usize,
    resume_at: Option<Instant>,
    pending: Option<JoinHandle<()>>,
    generation: u64,
}

impl Default for GateState {
    fn default() -> Self {
        Self {
            active: None,
            suspended: false,
            closed: false,
            mute_count: 0,
            resume_at: None,
            pending: None,
            generation: 0,
        }
    }
}

struct ActiveWatch {
    repo: String,
    root: PathBuf,
    _handle: WatchHandle,
    pump: JoinHandle<()>,
}

impl Drop for ActiveWatch {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

impl FileWatcherGate {
    /// Create a stopped gate that calls `on_change` after each accepted burst
    pub fn new(
        config: WatcherConfig,
        backend: Arc<dyn WatchBackend>,
        on_change: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            shared: Arc::new(GateShared {
                config,
                backend,
                on_change: Arc::new(on_change),
                state: Mutex::new(GateState::default()),
            }),
        }
    }

    /// Watch `repo`, replacing any previous watch
    ///
    /// Returns `Ok(false)` without watching while the gate is suspended or
    /// closed. Must be called from within a tokio runtime.
    pub fn start(&self, repo: &str) -> Result<bool, GraphViewError> {
        self.stop();
        if !self.is_enabled() {
            log::debug!("Not watching {} while the gate is suspended", repo);
            return Ok(false);
        }

        let root = std::fs::canonicalize(repo).unwrap_or_else(|_| PathBuf::from(repo));
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let handle = self.shared.backend.watch(&root, events_tx)?;

        let weak = Arc::downgrade(&self.shared);
        let pump = tokio::spawn(async move {
            while let Some(path) = events_rx.recv().await {
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                FileWatcherGate { shared }.observe(&path);
            }
        });

        let watch = ActiveWatch {
            repo: repo.to_string(),
            root,
            _handle: handle,
            pump,
        };
        let previous = {
            let mut state = self.lock();
            if state.suspended || state.closed {
                // Suspended while the backend was setting up the watch
                drop(state);
                drop(watch);
                log::debug!("Dropped watch on {} after suspension", repo);
                return Ok(false);
            }
            state.active.replace(watch)
        };
        if let Some(previous) = previous {
            log::debug!("Replaced concurrent watch on {}", previous.repo);
        }

        log::info!("Watching {} for changes", repo);
        Ok(true)
    }

    /// Stop watching and refuse to start again until [`Self::resume`]
    pub fn suspend(&self) {
        self.lock().suspended = true;
        self.stop();
    }

    /// Allow watching again after [`Self::suspend`]. Has no effect once closed.
    pub fn resume(&self) {
        self.lock().suspended = false;
    }

    /// Stop watching for good
    pub fn close(&self) {
        self.lock().closed = true;
        self.stop();
    }

    /// Whether [`Self::start`] would install a watch
    pub fn is_enabled(&self) -> bool {
        let state = self.lock();
        !state.suspended && !state.closed
    }

    /// Stop watching and cancel any pending change signal
    pub fn stop(&self) {
        let (previous, pending) = {
            let mut state = self.lock();
            (state.active.take(), state.pending.take())
        };
        if let Some(pending) = pending {
            pending.abort();
        }
        if let Some(previous) = previous {
            log::info!("Stopped watching {}", previous.repo);
        }
    }

    /// Suppress change signals until the returned guard is dropped
    pub fn mute(&self) -> MuteGuard {
        self.lock().mute_count += 1;
        MuteGuard { gate: self.clone() }
    }

    pub fn is_watching(&self) -> bool {
        self.lock().active.is_some()
    }

    pub fn watched_repo(&self) -> Option<String> {
        self.lock().active.as_ref().map(|active| active.repo.clone())
    }

    pub fn is_muted(&self) -> bool {
        self.lock().mute_count > 0
    }

    /// Feed a raw change event through the gate
    pub fn observe(&self, path: &Path) {
        let mut state = self.lock();
        let Some(active) = state.active.as_ref() else {
            return;
        };
        if state.mute_count > 0 || state.resume_at.is_some_and(|at| Instant::now() < at) {
            log::trace!("Dropped change while muted: {}", path.display());
            return;
        }
        let Ok(relative) = path.strip_prefix(&active.root) else {
            return;
        };
        if !is_relevant(relative) {
            return;
        }

        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        state.generation += 1;
        let generation = state.generation;
        let delay = Duration::from_millis(self.shared.config.debounce_ms);
        let weak = Arc::downgrade(&self.shared);
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(&weak, generation);
        }));
    }

    fn unmute(&self) {
        let mut state = self.lock();
        state.mute_count = state.mute_count.saturating_sub(1);
        if state.mute_count == 0 {
            state.resume_at =
                Some(Instant::now() + Duration::from_millis(self.shared.config.resume_grace_ms));
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.shared.lock()
    }
}

impl GateShared {
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn fire(shared: &Weak<GateShared>, generation: u64) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    {
        let mut state = shared.lock();
        if state.generation != generation {
            return;
        }
        state.pending = None;
        if state.active.is_none() || state.mute_count > 0 {
            return;
        }
    }
    log::debug!("Repository changed on disk");
    (shared.on_change)();
}

/// Keeps the gate muted while alive
#[must_use = "the gate unmutes as soon as the guard is dropped"]
pub struct MuteGuard {
    gate: FileWatcherGate,
}

impl Drop for MuteGuard {
    fn drop(&mut self) {
        self.gate.unmute();
    }
}
