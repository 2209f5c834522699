//! Lockstep playback of several recorded runs.
//!
//! One virtual clock drives every timeline. Each tick resolves the snapshot
//! each unfinished run had at the clock value and pushes it to the sink; a run
//! whose history is exhausted reports its path weight and drops out. The only
//! suspension point is the pause between ticks.

use std::num::NonZeroU64;
use std::time::{Duration, Instant};

use gr_core::AlgorithmType;
use gr_results::{RunTimeline, Step};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::PlaybackResult;
use crate::progress::{PlaybackProgress, PlaybackStage};
use crate::sink::RenderSink;

pub const DEFAULT_STEP_DIFFERENCE: NonZeroU64 = NonZeroU64::MIN;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct PlaybackOptions {
    pub step_difference: NonZeroU64,
    pub delay: Duration,
    /// Checked at the top of every tick.
    pub cancel: Option<CancellationToken>,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            step_difference: DEFAULT_STEP_DIFFERENCE,
            delay: DEFAULT_DELAY,
            cancel: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackOutcome {
    pub ticks: usize,
    /// Clock value of the last tick rendered.
    pub last_step: Step,
    pub cancelled: bool,
    /// Path weight reported per run, in completion order.
    pub totals: Vec<(AlgorithmType, u64)>,
}

/// Push one resolved snapshot to the sink; returns the entry's step.
fn render_entry<S: RenderSink + ?Sized>(
    timeline: &RunTimeline,
    step: Step,
    sink: &mut S,
) -> PlaybackResult<Step> {
    let algorithm = timeline.algorithm();
    let entry = timeline.entry_at(step);
    for cell in entry.snapshot.iter() {
        sink.render_cell(cell.id, cell.state, algorithm)?;
    }
    Ok(entry.step)
}

/// Show the last frame, report the weight, and retire the run.
fn finish<S: RenderSink + ?Sized>(
    timeline: &mut RunTimeline,
    sink: &mut S,
    totals: &mut Vec<(AlgorithmType, u64)>,
) -> PlaybackResult<()> {
    render_entry(timeline, timeline.total_steps(), sink)?;
    let weight = timeline.total_weight();
    sink.render_total_weight(weight, timeline.algorithm())?;
    timeline.mark_complete();
    totals.push((timeline.algorithm(), weight));
    info!(
        algorithm = %timeline.algorithm(),
        total_steps = timeline.total_steps(),
        weight,
        "run playback complete"
    );
    Ok(())
}

/// Render the seed frame of every run after clearing its previous output.
pub fn render_initial<S: RenderSink + ?Sized>(
    timelines: &[RunTimeline],
    sink: &mut S,
) -> PlaybackResult<()> {
    for timeline in timelines {
        sink.reset_run(timeline.algorithm())?;
        render_entry(timeline, 0, sink)?;
    }
    Ok(())
}

/// Render every run as it was at `step` (scrubbing). Completion flags are
/// left alone. Returns the furthest recorded step shown.
pub fn render_at<S: RenderSink + ?Sized>(
    timelines: &[RunTimeline],
    step: Step,
    sink: &mut S,
) -> PlaybackResult<Step> {
    let mut furthest = 0;
    for timeline in timelines {
        furthest = furthest.max(render_entry(timeline, step, sink)?);
    }
    Ok(furthest)
}

/// Play every timeline to completion in lockstep.
///
/// Returns once every run is marked complete, or early if the cancel token
/// fires. Sink errors abort playback and are returned as-is.
pub async fn run_playback<S: RenderSink + ?Sized>(
    timelines: &mut [RunTimeline],
    options: &PlaybackOptions,
    sink: &mut S,
    mut progress: Option<&mut dyn FnMut(PlaybackProgress)>,
) -> PlaybackResult<PlaybackOutcome> {
    let started = Instant::now();
    let step_difference = options.step_difference.get();
    let max_steps = timelines.iter().map(|t| t.total_steps()).max().unwrap_or(0);
    let total_runs = timelines.len();

    let mut outcome = PlaybackOutcome {
        ticks: 0,
        last_step: 0,
        cancelled: false,
        totals: Vec::with_capacity(total_runs),
    };

    info!(runs = total_runs, max_steps, step_difference, "starting playback");

    let mut step: Step = 0;
    while step <= max_steps {
        if options.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            info!(step, "playback cancelled");
            outcome.cancelled = true;
            if let Some(cb) = progress.as_mut() {
                cb(PlaybackProgress {
                    stage: PlaybackStage::Cancelled,
                    tick: outcome.ticks,
                    clock_step: outcome.last_step,
                    displayed_step: outcome.last_step.min(max_steps),
                    max_steps,
                    completed: Vec::new(),
                    completed_runs: outcome.totals.len(),
                    total_runs,
                    elapsed_wall_s: started.elapsed().as_secs_f64(),
                });
            }
            return Ok(outcome);
        }

        let mut completed = Vec::new();
        let mut displayed_step = 0;
        for timeline in timelines.iter_mut() {
            if timeline.is_complete() {
                displayed_step = displayed_step.max(timeline.total_steps());
                continue;
            }
            if step >= timeline.total_steps() {
                finish(timeline, sink, &mut outcome.totals)?;
                completed.push(timeline.algorithm());
                displayed_step = displayed_step.max(timeline.total_steps());
                continue;
            }
            displayed_step = displayed_step.max(render_entry(timeline, step, sink)?);
        }

        outcome.ticks += 1;
        outcome.last_step = step;
        debug!(step, displayed_step, completed = completed.len(), "tick");

        if let Some(cb) = progress.as_mut() {
            cb(PlaybackProgress {
                stage: PlaybackStage::Rendering,
                tick: outcome.ticks,
                clock_step: step,
                displayed_step: displayed_step.min(step),
                max_steps,
                completed,
                completed_runs: outcome.totals.len(),
                total_runs,
                elapsed_wall_s: started.elapsed().as_secs_f64(),
            });
        }

        step = match step.checked_add(step_difference) {
            Some(next) => next,
            None => break,
        };
        tokio::time::sleep(options.delay).await;
    }

    // Runs whose last step falls between the final tick and the next one.
    let mut flushed = Vec::new();
    for timeline in timelines.iter_mut().filter(|t| !t.is_complete()) {
        finish(timeline, sink, &mut outcome.totals)?;
        flushed.push(timeline.algorithm());
    }

    if let Some(cb) = progress.as_mut() {
        let stage = if flushed.is_empty() {
            PlaybackStage::Completed
        } else {
            PlaybackStage::Flushing
        };
        cb(PlaybackProgress {
            stage,
            tick: outcome.ticks,
            clock_step: outcome.last_step,
            displayed_step: max_steps,
            max_steps,
            completed: flushed,
            completed_runs: outcome.totals.len(),
            total_runs,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
        });
    }

    Ok(outcome)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::sink::FrameBuffer;
    use gr_core::{Grid, GridDims};
    use proptest::prelude::*;
    use std::sync::Arc;

    proptest! {
        #[test]
        fn every_run_reports_once(
            totals in prop::collection::vec(0_u64..120, 1..5),
            step_difference in 1_u64..25,
        ) {
            let dims = GridDims::new(2, 2).unwrap();
            let grid = Arc::new(Grid::uniform(dims, 1));
            let mut runs: Vec<RunTimeline> = totals
                .iter()
                .zip(AlgorithmType::ALL)
                .map(|(&total, algorithm)| {
                    let mut run = RunTimeline::new(
                        grid.clone(),
                        dims.cell_id(0).unwrap(),
                        dims.cell_id(3).unwrap(),
                        algorithm,
                    );
                    if total > 0 {
                        run.append_step(total, &[]);
                    }
                    run
                })
                .collect();
            let options = PlaybackOptions {
                step_difference: NonZeroU64::new(step_difference).unwrap(),
                delay: Duration::ZERO,
                cancel: None,
            };

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let mut buffer = FrameBuffer::new();
            let outcome = runtime
                .block_on(run_playback(&mut runs, &options, &mut buffer, None))
                .unwrap();

            prop_assert!(runs.iter().all(RunTimeline::is_complete));
            prop_assert_eq!(outcome.totals.len(), runs.len());
            let max = *totals.iter().max().unwrap();
            prop_assert_eq!(outcome.ticks as u64, max / step_difference + 1);
            prop_assert!(outcome.last_step <= max);
        }
    }
}
