//! gr-results: run timelines and their on-disk store.

pub mod hash;
pub mod resolve;
pub mod snapshot;
pub mod store;
pub mod timeline;
pub mod types;

pub use hash::compute_run_id;
pub use resolve::resolve;
pub use snapshot::{CellMetadata, GridSnapshot, Step, TimelineEntry};
pub use store::RunStore;
pub use timeline::{CellChange, OverlayConfig, PATH_OVERLAY_OFFSET, PATH_STEP_INCREMENT, RunTimeline};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Grid error: {0}")]
    Core(#[from] gr_core::CoreError),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Invalid timeline: {what}")]
    InvalidTimeline { what: String },
}
