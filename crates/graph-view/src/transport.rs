//! Outbound side of a session
//!
//! [`Outbound`] is the only way controller code talks to the surface. Once the
//! session is disposed every send is dropped quietly; a send that fails while
//! the session is still alive is reported to the user through the workbench.

use crate::protocol::Response;
use crate::surface::{RenderedView, Surface};
use graph_view_backend::Workbench;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct Outbound {
    surface: Arc<dyn Surface>,
    workbench: Arc<dyn Workbench>,
    disposed: Arc<AtomicBool>,
}

impl Outbound {
    pub fn new(surface: Arc<dyn Surface>, workbench: Arc<dyn Workbench>) -> Self {
        Self {
            surface,
            workbench,
            disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn send(&self, response: Response) {
        let command = response.command();
        if self.is_disposed() {
            log::debug!("Dropped \"{}\" for a disposed graph view", command);
            return;
        }
        if let Err(e) = self.surface.post(&response) {
            self.report_failure(command, &e);
        }
    }

    pub fn render(&self, view: RenderedView) {
        if self.is_disposed() {
            log::debug!("Dropped render for a disposed graph view");
            return;
        }
        if let Err(e) = self.surface.render(view) {
            self.report_failure("render", &e);
        }
    }

    pub fn mark_disposed(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn report_failure(&self, command: &str, error: &crate::GraphViewError) {
        // Disposal may have raced the send
        if self.is_disposed() {
            return;
        }
        log::error!("Failed to send \"{}\" to the graph view: {}", command, error);
        self.workbench.show_error_message(&format!(
            "Unable to send \"{}\" message to the graph view.",
            command
        ));
    }
}
