//! Record, store, reload and replay several runs on one clock.

use std::fs;
use std::num::NonZeroU64;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use gr_core::{AlgorithmType, CellState, Grid, GridDims};
use gr_playback::{FrameBuffer, PlaybackOptions, PlaybackStage, render_initial, run_playback};
use gr_results::{CellChange, RunStore, RunTimeline};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

/// 3x3 grid, start top-left, end bottom-right, centre weighs 2.
fn grid() -> Arc<Grid> {
    let dims = GridDims::new(3, 3).unwrap();
    Arc::new(Grid::new(dims, vec![1, 1, 1, 1, 2, 1, 1, 1, 1]).unwrap())
}

fn direct_run(grid: &Arc<Grid>) -> RunTimeline {
    let id = |i| grid.dims().cell_id(i).unwrap();
    let mut run = RunTimeline::new(grid.clone(), id(0), id(8), AlgorithmType::Dijkstra);
    run.append_step(5, &[CellChange::new(id(4), CellState::Visited)]);
    run.set_final_path(vec![grid.cell(id(4)), grid.cell(id(8))]);
    run
}

fn wandering_run(grid: &Arc<Grid>) -> RunTimeline {
    let id = |i| grid.dims().cell_id(i).unwrap();
    let mut run = RunTimeline::new(grid.clone(), id(0), id(8), AlgorithmType::DepthFirst);
    let order = [1, 2, 5];
    for (n, &cell) in order.iter().enumerate() {
        run.append_step(
            (n as u64 + 1) * 4,
            &[CellChange::new(id(cell), CellState::Visited)],
        );
    }
    run.set_final_path(
        [1, 2, 5, 8]
            .iter()
            .map(|&i| grid.cell(id(i)))
            .collect(),
    );
    run
}

#[tokio::test]
async fn stored_runs_replay_to_their_final_paths() {
    let root = unique_temp_dir("gr_playback_replay");
    let store = RunStore::new(root.clone()).expect("failed to create store");
    let grid = grid();

    let direct = store.save_run(&direct_run(&grid)).unwrap();
    let wandering = store.save_run(&wandering_run(&grid)).unwrap();
    assert_eq!(direct.total_steps, 25);
    assert_eq!(wandering.total_steps, 12 + 10 + 4 * 5);

    let mut runs = vec![
        store.load_run(&direct.run_id).unwrap(),
        store.load_run(&wandering.run_id).unwrap(),
    ];

    let mut buffer = FrameBuffer::new();
    render_initial(&runs, &mut buffer).unwrap();
    let dims = grid.dims();
    assert_eq!(
        buffer.frame_text(AlgorithmType::Dijkstra, dims).unwrap(),
        "S..\n...\n..E"
    );

    let options = PlaybackOptions {
        step_difference: NonZeroU64::new(10).unwrap(),
        delay: Duration::ZERO,
        cancel: None,
    };
    let mut events = Vec::new();
    let outcome = run_playback(&mut runs, &options, &mut buffer, Some(&mut |e| events.push(e)))
        .await
        .unwrap();

    assert!(runs.iter().all(RunTimeline::is_complete));
    assert_eq!(
        outcome.totals,
        vec![(AlgorithmType::Dijkstra, 3), (AlgorithmType::DepthFirst, 4)]
    );
    assert_eq!(buffer.total_weight(AlgorithmType::Dijkstra), Some(3));
    assert_eq!(buffer.total_weight(AlgorithmType::DepthFirst), Some(4));

    // Final frames show the full path, with endpoints untouched.
    assert_eq!(
        buffer.frame_text(AlgorithmType::Dijkstra, dims).unwrap(),
        "S..\n.*.\n..E"
    );
    assert_eq!(
        buffer.frame_text(AlgorithmType::DepthFirst, dims).unwrap(),
        "S**\n..*\n..E"
    );

    // Ticks at 0..=40 cover the longer (42-step) run; it is flushed after the loop.
    let last = events.last().unwrap();
    assert_eq!(last.stage, PlaybackStage::Flushing);
    assert_eq!(last.completed, vec![AlgorithmType::DepthFirst]);
    assert!(
        events
            .iter()
            .all(|e| e.displayed_step <= e.clock_step || e.stage != PlaybackStage::Rendering)
    );

    let _ = fs::remove_dir_all(root);
}
