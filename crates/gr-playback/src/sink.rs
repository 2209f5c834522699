//! Rendering sink interface and an in-memory implementation.

use std::collections::BTreeMap;

use gr_core::{AlgorithmType, CellId, CellState, GridDims};

use crate::error::PlaybackResult;

/// Destination for rendered frames.
///
/// `render_cell` must be idempotent: the scheduler re-sends every cell of the
/// resolved snapshot on each tick. An `Err` halts playback.
pub trait RenderSink {
    fn render_cell(
        &mut self,
        cell: CellId,
        state: CellState,
        algorithm: AlgorithmType,
    ) -> PlaybackResult<()>;

    fn render_total_weight(&mut self, weight: u64, algorithm: AlgorithmType)
    -> PlaybackResult<()>;

    /// Clear any per-run output (e.g. a previous total) before the first frame.
    fn reset_run(&mut self, _algorithm: AlgorithmType) -> PlaybackResult<()> {
        Ok(())
    }
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn render_cell(
        &mut self,
        cell: CellId,
        state: CellState,
        algorithm: AlgorithmType,
    ) -> PlaybackResult<()> {
        (**self).render_cell(cell, state, algorithm)
    }

    fn render_total_weight(
        &mut self,
        weight: u64,
        algorithm: AlgorithmType,
    ) -> PlaybackResult<()> {
        (**self).render_total_weight(weight, algorithm)
    }

    fn reset_run(&mut self, algorithm: AlgorithmType) -> PlaybackResult<()> {
        (**self).reset_run(algorithm)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct RunFrame {
    states: Vec<CellState>,
    total_weight: Option<u64>,
}

/// Keeps the latest state of every cell per algorithm.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    frames: BTreeMap<AlgorithmType, RunFrame>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn algorithms(&self) -> impl Iterator<Item = AlgorithmType> + '_ {
        self.frames.keys().copied()
    }

    pub fn state(&self, algorithm: AlgorithmType, cell: CellId) -> Option<CellState> {
        self.frames
            .get(&algorithm)
            .and_then(|f| f.states.get(cell.index()).copied())
    }

    pub fn total_weight(&self, algorithm: AlgorithmType) -> Option<u64> {
        self.frames.get(&algorithm).and_then(|f| f.total_weight)
    }

    pub fn count(&self, algorithm: AlgorithmType, state: CellState) -> usize {
        self.frames
            .get(&algorithm)
            .map(|f| f.states.iter().filter(|s| **s == state).count())
            .unwrap_or(0)
    }

    /// One line per grid row; cells never rendered show as blanks.
    pub fn frame_text(&self, algorithm: AlgorithmType, dims: GridDims) -> Option<String> {
        let frame = self.frames.get(&algorithm)?;
        let mut out = String::with_capacity(dims.size() + dims.rows as usize);
        for index in 0..dims.size() {
            if index > 0 && index % dims.cols as usize == 0 {
                out.push('\n');
            }
            out.push(frame.states.get(index).map_or(' ', |s| glyph(*s)));
        }
        Some(out)
    }
}

fn glyph(state: CellState) -> char {
    match state {
        CellState::Unvisited => '.',
        CellState::StartNode => 'S',
        CellState::EndNode => 'E',
        CellState::Frontier => '+',
        CellState::Visited => 'o',
        CellState::ShortestPath => '*',
    }
}

impl RenderSink for FrameBuffer {
    fn render_cell(
        &mut self,
        cell: CellId,
        state: CellState,
        algorithm: AlgorithmType,
    ) -> PlaybackResult<()> {
        let frame = self.frames.entry(algorithm).or_default();
        let index = cell.index();
        if frame.states.len() <= index {
            frame.states.resize(index + 1, CellState::Unvisited);
        }
        frame.states[index] = state;
        Ok(())
    }

    fn render_total_weight(&mut self, weight: u64, algorithm: AlgorithmType) -> PlaybackResult<()> {
        self.frames.entry(algorithm).or_default().total_weight = Some(weight);
        Ok(())
    }

    fn reset_run(&mut self, algorithm: AlgorithmType) -> PlaybackResult<()> {
        self.frames.insert(algorithm, RunFrame::default());
        Ok(())
    }
}
