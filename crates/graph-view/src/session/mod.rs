//! Graph view session
//!
//! A [`GraphViewSession`] owns one rendering surface for its whole life and
//! wires the router, the file watcher gate, the repository set broadcaster and
//! the avatar relay to it.
//!
//! # Lifecycle
//!
//! ```text
//!               hidden                     closed
//! Visible ◀──────────────▶ Hidden ───────────────▶ Disposed
//!    │          shown                                  ▲
//!    └─────────────────────────────────────────────────┘
//! ```
//!
//! - Going hidden stops the watcher and forgets the current repository.
//! - Becoming visible renders the surface from scratch.
//! - Disposal is terminal and may be requested more than once.
//!
//! Sessions are created through [`SessionSlot`], which keeps at most one open.

mod render;
mod slot;

pub use slot::SessionSlot;

use crate::avatar_relay::AvatarRelay;
use crate::broadcaster::{self, RepoSetAction, RepoSetBroadcaster};
use crate::error::GraphViewError;
use crate::message_loop::run_message_loop;
use crate::protocol::{InboundMessage, LoadViewTarget, Response};
use crate::refresh::RefreshCoordinator;
use crate::router::{Collaborators, MessageRouter};
use crate::surface::{Surface, SurfaceHost};
use crate::transport::Outbound;
use crate::watcher::{FileWatcherGate, WatchBackend};
use graph_view_backend::RepoChangeEvent;
use graph_view_config::ViewConfig;
use render::RenderInputs;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Visible,
    Hidden,
    Disposed,
}

/// The repository the session currently shows and watches
#[derive(Debug, Clone, Default)]
pub(crate) struct CurrentRepo(Arc<Mutex<Option<String>>>);

impl CurrentRepo {
    pub(crate) fn get(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Set `repo` as current. Returns `false` if it already was.
    pub(crate) fn replace(&self, repo: &str) -> bool {
        let mut current = self.lock();
        if current.as_deref() == Some(repo) {
            return false;
        }
        *current = Some(repo.to_string());
        true
    }

    pub(crate) fn clear(&self) {
        self.lock().take();
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.0.lock().unwrap_or_else(|p| p.into_inner())
    }
}

struct SessionState {
    lifecycle: Lifecycle,
    /// Whether the last render had at least one repository to show
    is_loaded: bool,
    /// Navigation target for the next render only
    load_view_to: Option<LoadViewTarget>,
}

pub struct GraphViewSession {
    collaborators: Collaborators,
    config: ViewConfig,
    surface: Arc<dyn Surface>,
    outbound: Outbound,
    router: MessageRouter,
    refresh: RefreshCoordinator,
    gate: FileWatcherGate,
    current_repo: CurrentRepo,
    broadcaster: RepoSetBroadcaster,
    relay: AvatarRelay,
    state: Mutex<SessionState>,
}

impl GraphViewSession {
    /// Open a new surface on `host`, render it and start serving it
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(
        host: &dyn SurfaceHost,
        collaborators: Collaborators,
        config: ViewConfig,
        watch_backend: Arc<dyn WatchBackend>,
        relay: AvatarRelay,
        load_view_to: Option<LoadViewTarget>,
    ) -> Result<Arc<Self>, GraphViewError> {
        let parts = host.create_surface()?;

        let session = Arc::new_cyclic(|weak: &std::sync::Weak<GraphViewSession>| {
            let on_change = weak.clone();
            let gate = FileWatcherGate::new(config.watcher, watch_backend, move || {
                if let Some(session) = on_change.upgrade() {
                    session.on_files_changed();
                }
            });
            let outbound = Outbound::new(
                Arc::clone(&parts.surface),
                Arc::clone(&collaborators.workbench),
            );
            let refresh = RefreshCoordinator::new();
            let current_repo = CurrentRepo::default();
            let router = MessageRouter::new(
                collaborators.clone(),
                refresh.clone(),
                gate.clone(),
                outbound.clone(),
                current_repo.clone(),
            );

            GraphViewSession {
                collaborators,
                config,
                surface: parts.surface,
                outbound,
                router,
                refresh,
                gate,
                current_repo,
                broadcaster: RepoSetBroadcaster::new(),
                relay,
                state: Mutex::new(SessionState {
                    lifecycle: Lifecycle::Visible,
                    is_loaded: false,
                    load_view_to,
                }),
            }
        });

        session.relay.register(session.outbound.clone());

        let weak = Arc::downgrade(&session);
        session.broadcaster.attach(
            session.collaborators.repo_manager.subscribe(),
            move |event| {
                if let Some(session) = weak.upgrade() {
                    session.on_repos_changed(event);
                }
            },
        );

        session.render();
        tokio::spawn(run_message_loop(Arc::downgrade(&session), parts.events));

        log::info!("Graph view opened");
        Ok(session)
    }

    /// Handle one decoded message from the surface
    pub async fn handle(&self, message: InboundMessage) {
        match message {
            InboundMessage::Request(request) => self.router.dispatch(request).await,
            InboundMessage::Notification(notification) => self.router.notify(notification).await,
        }
    }

    /// Render the surface from scratch
    ///
    /// The pending navigation target is used by this render and then dropped.
    pub fn render(&self) {
        let repos = self.collaborators.repo_manager.repos();
        let view = {
            let mut state = self.lock();
            state.is_loaded = !repos.is_empty();
            render::build_view(RenderInputs {
                config: &self.config,
                git_unknown: self.collaborators.data_source.is_git_executable_unknown(),
                repos,
                last_active_repo: self.collaborators.state_store.last_active_repo(),
                load_view_to: state.load_view_to.take(),
                refresh_ids: self.refresh.snapshot(),
            })
        };
        self.outbound.render(view);
    }

    pub fn set_visible(&self, visible: bool) {
        {
            let mut state = self.lock();
            let next = if visible {
                Lifecycle::Visible
            } else {
                Lifecycle::Hidden
            };
            if state.lifecycle == Lifecycle::Disposed || state.lifecycle == next {
                return;
            }
            state.lifecycle = next;
        }

        if visible {
            log::debug!("Graph view shown");
            self.gate.resume();
            self.render();
        } else {
            log::debug!("Graph view hidden");
            self.gate.suspend();
            self.current_repo.clear();
        }
    }

    /// React to a change of the known repository set
    pub fn on_repos_changed(&self, event: RepoChangeEvent) {
        let load_view_to = event.load_repo.map(LoadViewTarget::repo);
        let action = {
            let mut state = self.lock();
            if state.lifecycle != Lifecycle::Visible {
                return;
            }
            let action = broadcaster::classify(state.is_loaded, event.num_repos);
            if action == RepoSetAction::FullRender {
                state.load_view_to = load_view_to.clone();
            }
            action
        };

        match action {
            RepoSetAction::FullRender => self.render(),
            RepoSetAction::PushRepos => self.outbound.send(Response::LoadRepos {
                repos: event.repos,
                last_active_repo: self.collaborators.state_store.last_active_repo(),
                load_view_to,
            }),
        }
    }

    /// The watched repository changed on disk
    pub fn on_files_changed(&self) {
        if self.lifecycle() == Lifecycle::Visible {
            self.outbound.send(Response::Refresh);
        }
    }

    /// Bring the surface to the front, navigating to `target` if given
    ///
    /// A visible surface is told about `target` right away. A hidden one keeps
    /// it for the render that happens when it is shown again.
    pub fn reveal(&self, target: Option<LoadViewTarget>) {
        let visible = {
            let mut state = self.lock();
            match state.lifecycle {
                Lifecycle::Disposed => return,
                Lifecycle::Visible => true,
                Lifecycle::Hidden => {
                    state.load_view_to = target.clone();
                    false
                }
            }
        };

        if visible {
            if let Some(target) = target {
                self.outbound.send(Response::LoadRepos {
                    repos: self.collaborators.repo_manager.repos(),
                    last_active_repo: self.collaborators.state_store.last_active_repo(),
                    load_view_to: Some(target),
                });
            }
        }
        self.surface.reveal();
    }

    /// Release the watcher, the subscriptions and the surface
    pub fn dispose(&self) {
        {
            let mut state = self.lock();
            if state.lifecycle == Lifecycle::Disposed {
                return;
            }
            state.lifecycle = Lifecycle::Disposed;
            state.load_view_to = None;
        }

        self.outbound.mark_disposed();
        self.relay.deregister();
        self.broadcaster.detach();
        self.gate.close();
        self.current_repo.clear();
        self.surface.dispose();
        log::info!("Graph view disposed");
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lock().lifecycle
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle() == Lifecycle::Disposed
    }

    /// Whether the last render had repositories to show
    pub fn is_loaded(&self) -> bool {
        self.lock().is_loaded
    }

    pub fn current_repo(&self) -> Option<String> {
        self.current_repo.get()
    }

    pub fn pending_load_view_to(&self) -> Option<LoadViewTarget> {
        self.lock().load_view_to.clone()
    }

    pub fn gate(&self) -> &FileWatcherGate {
        &self.gate
    }

    pub fn router(&self) -> &MessageRouter {
        &self.router
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}
