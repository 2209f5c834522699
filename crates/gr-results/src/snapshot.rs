//! Per-step grid snapshots.

use gr_core::{CellId, CellState, Grid, Weight};
use serde::{Deserialize, Serialize};

/// Playback/recording step counter.
pub type Step = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMetadata {
    pub id: CellId,
    pub state: CellState,
    pub weight: Weight,
}

/// Dense state of every cell at one recorded step.
///
/// Indexed by `CellId`. Recorded snapshots are never edited; new steps are
/// produced by cloning the previous snapshot and applying overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridSnapshot {
    cells: Vec<CellMetadata>,
}

impl GridSnapshot {
    /// Everything `Unvisited` except the two endpoints.
    pub fn seed(grid: &Grid, start: CellId, end: CellId) -> Self {
        let cells = grid
            .cells()
            .iter()
            .map(|cell| {
                let state = if cell.id == start {
                    CellState::StartNode
                } else if cell.id == end {
                    CellState::EndNode
                } else {
                    CellState::Unvisited
                };
                CellMetadata {
                    id: cell.id,
                    state,
                    weight: cell.weight,
                }
            })
            .collect();
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Panics if `id` is outside the grid this snapshot was built from.
    pub fn cell(&self, id: CellId) -> &CellMetadata {
        &self.cells[id.index()]
    }

    pub fn state(&self, id: CellId) -> CellState {
        self.cell(id).state
    }

    pub fn cells(&self) -> &[CellMetadata] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellMetadata> {
        self.cells.iter()
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }

    pub(crate) fn set_state(&mut self, id: CellId, state: CellState) {
        self.cells[id.index()].state = state;
    }
}

/// One recorded point on a run's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub step: Step,
    pub snapshot: GridSnapshot,
}
