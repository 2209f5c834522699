//! Recorder for one algorithm run.
//!
//! A run starts with a seed entry at step 0. The algorithm driver appends
//! sparse steps while it executes, then hands over the final path once. The
//! path overlay is appended as a blank "reset" entry followed by one entry per
//! path cell, so playback pauses before drawing the path.

use std::num::NonZeroU64;
use std::sync::Arc;

use gr_core::{AlgorithmType, Cell, CellId, CellState, Grid};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::resolve::resolve;
use crate::snapshot::{GridSnapshot, Step, TimelineEntry};
use crate::{ResultsError, ResultsResult};

/// Steps between the last recorded step and the blank reset entry.
pub const PATH_OVERLAY_OFFSET: NonZeroU64 = NonZeroU64::new(10).unwrap();
/// Steps between successive path-cell reveals.
pub const PATH_STEP_INCREMENT: NonZeroU64 = NonZeroU64::new(5).unwrap();

/// Shape of the final-path overlay. Recorder and scheduler must agree on it.
///
/// Both gaps are non-zero so overlay entries always land on fresh steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub path_overlay_offset: NonZeroU64,
    pub path_step_increment: NonZeroU64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            path_overlay_offset: PATH_OVERLAY_OFFSET,
            path_step_increment: PATH_STEP_INCREMENT,
        }
    }
}

/// A single cell transition reported by the algorithm driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub id: CellId,
    pub new_state: CellState,
}

impl CellChange {
    pub fn new(id: CellId, new_state: CellState) -> Self {
        Self { id, new_state }
    }
}

#[derive(Debug, Clone)]
pub struct RunTimeline {
    grid: Arc<Grid>,
    start: CellId,
    end: CellId,
    algorithm: AlgorithmType,
    overlay: OverlayConfig,
    entries: Vec<TimelineEntry>,
    final_path: Vec<Cell>,
    path_recorded: bool,
    complete: bool,
}

impl RunTimeline {
    pub fn new(grid: Arc<Grid>, start: CellId, end: CellId, algorithm: AlgorithmType) -> Self {
        let seed = GridSnapshot::seed(&grid, start, end);
        Self {
            grid,
            start,
            end,
            algorithm,
            overlay: OverlayConfig::default(),
            entries: vec![TimelineEntry {
                step: 0,
                snapshot: seed,
            }],
            final_path: Vec::new(),
            path_recorded: false,
            complete: false,
        }
    }

    /// Override the path overlay shape. Call before `set_final_path`.
    pub fn with_overlay(mut self, overlay: OverlayConfig) -> Self {
        self.overlay = overlay;
        self
    }

    /// Rebuild a recorded run, checking the timeline invariants.
    ///
    /// `final_path` is `None` when the run never reached `set_final_path`.
    pub fn from_parts(
        grid: Arc<Grid>,
        start: CellId,
        end: CellId,
        algorithm: AlgorithmType,
        overlay: OverlayConfig,
        entries: Vec<TimelineEntry>,
        final_path: Option<Vec<Cell>>,
    ) -> ResultsResult<Self> {
        let dims = grid.dims();
        if !dims.contains(start) || !dims.contains(end) {
            return Err(ResultsError::InvalidTimeline {
                what: format!("endpoints {start}/{end} outside {}x{} grid", dims.rows, dims.cols),
            });
        }
        match entries.first() {
            None => {
                return Err(ResultsError::InvalidTimeline {
                    what: "timeline has no entries".to_string(),
                });
            }
            Some(first) if first.step != 0 => {
                return Err(ResultsError::InvalidTimeline {
                    what: format!("first entry is at step {}, expected 0", first.step),
                });
            }
            Some(_) => {}
        }
        if let Some(pair) = entries.windows(2).find(|w| w[0].step >= w[1].step) {
            return Err(ResultsError::InvalidTimeline {
                what: format!(
                    "steps not strictly increasing ({} then {})",
                    pair[0].step, pair[1].step
                ),
            });
        }
        if let Some(entry) = entries.iter().find(|e| e.snapshot.len() != grid.len()) {
            return Err(ResultsError::InvalidTimeline {
                what: format!(
                    "snapshot at step {} has {} cells, grid has {}",
                    entry.step,
                    entry.snapshot.len(),
                    grid.len()
                ),
            });
        }
        let path_recorded = final_path.is_some();
        let final_path = final_path.unwrap_or_default();
        if let Some(cell) = final_path.iter().find(|c| !dims.contains(c.id)) {
            return Err(ResultsError::InvalidTimeline {
                what: format!("path cell {} outside grid", cell.id),
            });
        }

        Ok(Self {
            grid,
            start,
            end,
            algorithm,
            overlay,
            entries,
            final_path,
            path_recorded,
            complete: false,
        })
    }

    /// Record the cells that changed at `step`.
    ///
    /// `step` must not be lower than the last recorded step. Cells not listed
    /// keep their previous state; the start and end cells never change.
    /// Repeating the last step folds the changes into that entry, so steps
    /// stay strictly increasing. The seed frame is fixed: changes at step 0
    /// are dropped.
    pub fn append_step(&mut self, step: Step, changes: &[CellChange]) {
        debug_assert!(
            step >= self.total_steps(),
            "append_step({step}) after step {}",
            self.total_steps()
        );

        let same_step = step == self.total_steps();
        if same_step && self.entries.len() == 1 {
            if !changes.is_empty() {
                warn!(
                    algorithm = %self.algorithm,
                    changes = changes.len(),
                    "ignoring changes recorded at the seed step"
                );
            }
            return;
        }

        let mut snapshot = self.latest().snapshot.clone();
        for change in changes {
            let current = snapshot.state(change.id);
            if current.is_endpoint() || change.new_state.is_endpoint() {
                warn!(
                    algorithm = %self.algorithm,
                    cell = %change.id,
                    ?current,
                    requested = ?change.new_state,
                    "ignoring change that would move a start/end marker"
                );
                continue;
            }
            snapshot.set_state(change.id, change.new_state);
        }
        if same_step {
            let last = self.entries.len() - 1;
            self.entries[last].snapshot = snapshot;
        } else {
            self.entries.push(TimelineEntry { step, snapshot });
        }
    }

    /// Record the final path and append the overlay animation.
    pub fn set_final_path(&mut self, path: Vec<Cell>) {
        if self.path_recorded {
            warn!(algorithm = %self.algorithm, "final path already set; appending a second overlay");
        }

        let reset_step = self.total_steps() + self.overlay.path_overlay_offset.get();
        self.entries.push(TimelineEntry {
            step: reset_step,
            snapshot: GridSnapshot::seed(&self.grid, self.start, self.end),
        });

        for cell in &path {
            let mut snapshot = self.latest().snapshot.clone();
            if !snapshot.state(cell.id).is_endpoint() {
                snapshot.set_state(cell.id, CellState::ShortestPath);
            }
            let step = self.total_steps() + self.overlay.path_step_increment.get();
            self.entries.push(TimelineEntry { step, snapshot });
        }

        debug!(
            algorithm = %self.algorithm,
            path_len = path.len(),
            total_steps = self.total_steps(),
            entries = self.entries.len(),
            "final path recorded"
        );
        self.final_path = path;
        self.path_recorded = true;
    }

    fn latest(&self) -> &TimelineEntry {
        // `new` and `from_parts` both guarantee at least the seed entry.
        &self.entries[self.entries.len() - 1]
    }

    /// Step of the last recorded entry.
    pub fn total_steps(&self) -> Step {
        self.latest().step
    }

    /// Sum of the weights along the final path (0 when no path exists).
    pub fn total_weight(&self) -> u64 {
        self.final_path.iter().map(|c| u64::from(c.weight)).sum()
    }

    /// Latest recorded entry at or before `step`.
    pub fn entry_at(&self, step: Step) -> &TimelineEntry {
        resolve(&self.entries, step)
    }

    pub fn algorithm(&self) -> AlgorithmType {
        self.algorithm
    }

    pub fn start(&self) -> CellId {
        self.start
    }

    pub fn end(&self) -> CellId {
        self.end
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    pub fn overlay(&self) -> OverlayConfig {
        self.overlay
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn final_path(&self) -> &[Cell] {
        &self.final_path
    }

    pub fn has_final_path(&self) -> bool {
        self.path_recorded
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Set by the playback consumer once the animation has played out.
    pub fn mark_complete(&mut self) {
        self.complete = true;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use gr_core::GridDims;
    use proptest::prelude::*;

    fn state_strategy() -> impl Strategy<Value = CellState> {
        prop_oneof![
            Just(CellState::Unvisited),
            Just(CellState::Frontier),
            Just(CellState::Visited),
            Just(CellState::ShortestPath),
        ]
    }

    proptest! {
        #[test]
        fn appends_never_rewrite_history(
            rows in 1_u32..6,
            cols in 2_u32..6,
            batches in prop::collection::vec(
                (1_u64..20, prop::collection::vec((0_usize..36, state_strategy()), 0..6)),
                1..12,
            ),
        ) {
            let dims = GridDims::new(rows, cols).unwrap();
            let grid = Arc::new(Grid::uniform(dims, 1));
            let start = dims.cell_id(0).unwrap();
            let end = dims.cell_id(dims.size() - 1).unwrap();
            let mut run = RunTimeline::new(grid, start, end, AlgorithmType::Dijkstra);

            let mut step = 0;
            for (gap, changes) in batches {
                let before: Vec<TimelineEntry> = run.entries().to_vec();
                step += gap;
                let changes: Vec<CellChange> = changes
                    .into_iter()
                    .map(|(i, s)| CellChange::new(dims.cell_id(i % dims.size()).unwrap(), s))
                    .collect();
                run.append_step(step, &changes);

                prop_assert_eq!(run.total_steps(), step);
                prop_assert_eq!(&run.entries()[..before.len()], &before[..]);
                let latest = &run.entries().last().unwrap().snapshot;
                prop_assert_eq!(latest.count(CellState::StartNode), 1);
                prop_assert_eq!(latest.count(CellState::EndNode), 1);
            }
        }

        #[test]
        fn overlay_steps_follow_offset_and_increment(
            prior in 0_u64..100,
            offset in 1_u64..20,
            increment in 1_u64..10,
            path_len in 0_usize..8,
            from_start in any::<bool>(),
        ) {
            let dims = GridDims::new(3, 3).unwrap();
            let grid = Arc::new(Grid::uniform(dims, 2));
            let start = dims.cell_id(0).unwrap();
            let end = dims.cell_id(8).unwrap();
            let overlay = OverlayConfig {
                path_overlay_offset: NonZeroU64::new(offset).unwrap(),
                path_step_increment: NonZeroU64::new(increment).unwrap(),
            };
            let mut run = RunTimeline::new(grid.clone(), start, end, AlgorithmType::AStar)
                .with_overlay(overlay);
            if prior > 0 {
                run.append_step(prior, &[]);
            }
            // Paths either run from the start cell or stop at the end cell.
            let first = if from_start { 0 } else { 1 };
            let path: Vec<Cell> = (first..first + path_len)
                .map(|i| grid.cell(dims.cell_id(i).unwrap()))
                .collect();
            let before = run.entries().len();
            run.set_final_path(path.clone());

            let appended: Vec<Step> = run.entries()[before..].iter().map(|e| e.step).collect();
            let expected: Vec<Step> = (0..=path_len as u64)
                .map(|k| prior + offset + k * increment)
                .collect();
            prop_assert_eq!(appended, expected);

            let marked = path.iter().filter(|c| c.id != start && c.id != end).count();
            let last = &run.entries().last().unwrap().snapshot;
            prop_assert_eq!(last.count(CellState::ShortestPath), marked);
            prop_assert_eq!(last.state(start), CellState::StartNode);
            prop_assert_eq!(last.state(end), CellState::EndNode);
            prop_assert_eq!(run.total_weight(), 2 * path_len as u64);
        }
    }
}
