//! Synchronized playback of recorded grid-search runs.
//!
//! Timelines come from `gr-results`; this crate advances several of them on
//! one shared virtual clock and forwards the resolved frames to a
//! [`RenderSink`].

pub mod config;
pub mod error;
pub mod progress;
pub mod scheduler;
pub mod sink;

pub use config::{ReplayConfig, load_config, parse_config};
pub use error::{ConfigError, PlaybackError, PlaybackResult};
pub use progress::{PlaybackProgress, PlaybackStage};
pub use scheduler::{
    DEFAULT_DELAY, DEFAULT_STEP_DIFFERENCE, PlaybackOptions, PlaybackOutcome, render_at,
    render_initial, run_playback,
};
pub use sink::{FrameBuffer, RenderSink};
