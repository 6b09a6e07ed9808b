use std::path::PathBuf;
use thiserror::Error;

/// Infrastructure failures inside the controller
///
/// Repository operation failures never show up here; those travel to the
/// surface as `ErrorInfo` data.
#[derive(Error, Debug)]
pub enum GraphViewError {
    #[error("malformed message from the graph view: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("message from the graph view has no command")]
    MissingCommand,

    #[error("unable to watch {}: {message}", path.display())]
    Watch { path: PathBuf, message: String },

    #[error("the graph view surface is closed")]
    SurfaceClosed,

    #[error("the graph view session has been disposed")]
    Disposed,

    #[error("custom pull request provider has no URL template")]
    MissingPullRequestTemplate,
}
