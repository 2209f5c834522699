use gr_core::AlgorithmType;
use gr_results::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStage {
    Rendering,
    Flushing,
    Cancelled,
    Completed,
}

impl PlaybackStage {
    pub fn label(&self) -> &'static str {
        match self {
            PlaybackStage::Rendering => "rendering",
            PlaybackStage::Flushing => "flushing",
            PlaybackStage::Cancelled => "cancelled",
            PlaybackStage::Completed => "completed",
        }
    }
}

/// Progress readout emitted once per tick and once at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackProgress {
    pub stage: PlaybackStage,
    pub tick: usize,
    /// Virtual clock value of the tick just rendered.
    pub clock_step: Step,
    /// Furthest recorded step actually on screen, never past `clock_step`.
    pub displayed_step: Step,
    pub max_steps: Step,
    /// Runs that finished during this tick.
    pub completed: Vec<AlgorithmType>,
    pub completed_runs: usize,
    pub total_runs: usize,
    pub elapsed_wall_s: f64,
}

impl PlaybackProgress {
    pub fn fraction_complete(&self) -> f64 {
        if self.max_steps == 0 {
            return 1.0;
        }
        (self.displayed_step as f64 / self.max_steps as f64).min(1.0)
    }
}
