//! Host workbench contract
//!
//! Operations the controller asks the hosting editor to perform outside the
//! rendering surface: opening files and diffs, external URLs, the clipboard
//! and the source-control view.

use crate::types::{ClipboardKind, DiffTarget, ErrorInfo};
use async_trait::async_trait;

#[async_trait]
pub trait Workbench: Send + Sync {
    /// Reveal the host's source-control view
    async fn view_scm(&self) -> ErrorInfo;

    async fn open_external_url(&self, url: &str) -> ErrorInfo;

    async fn copy_to_clipboard(&self, kind: ClipboardKind, data: &str) -> ErrorInfo;

    /// Open a file from the working tree, or at `hash` when given
    async fn open_file(&self, repo: &str, hash: Option<&str>, file_path: &str) -> ErrorInfo;

    async fn view_diff(&self, repo: &str, target: &DiffTarget) -> ErrorInfo;

    /// Show an error notification outside the rendering surface
    fn show_error_message(&self, message: &str);
}
