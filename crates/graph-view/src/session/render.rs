use crate::protocol::{InitialState, LoadViewTarget, RefreshSnapshot};
use crate::surface::RenderedView;
use graph_view_backend::RepoSet;
use graph_view_config::ViewConfig;

pub(crate) const GIT_UNAVAILABLE_MESSAGE: &str =
    "Unable to find a Git executable. Install Git, or set its path in the host settings, then reopen the graph view.";

/// Inputs of one full render
pub(crate) struct RenderInputs<'a> {
    pub config: &'a ViewConfig,
    pub git_unknown: bool,
    pub repos: RepoSet,
    pub last_active_repo: Option<String>,
    pub load_view_to: Option<LoadViewTarget>,
    pub refresh_ids: RefreshSnapshot,
}

/// Pick what the surface shows. A missing git executable wins over an empty
/// repository set.
pub(crate) fn build_view(inputs: RenderInputs<'_>) -> RenderedView {
    if inputs.git_unknown {
        RenderedView::GitUnavailable {
            message: GIT_UNAVAILABLE_MESSAGE.to_string(),
        }
    } else if inputs.repos.is_empty() {
        RenderedView::NoRepositories
    } else {
        RenderedView::Graph(InitialState {
            config: inputs.config.clone(),
            last_active_repo: inputs.last_active_repo,
            load_view_to: inputs.load_view_to,
            repos: inputs.repos,
            refresh_ids: inputs.refresh_ids,
        })
    }
}
