use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use gr_core::AlgorithmType;
use gr_playback::{
    FrameBuffer, PlaybackProgress, PlaybackResult, PlaybackStage, ReplayConfig, load_config,
    render_initial, run_playback,
};
use gr_results::{RunStore, RunTimeline};
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gr-cli")]
#[command(about = "GridReplay CLI - replay recorded grid-search runs side by side", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored runs
    Runs {
        /// Run store directory
        store: PathBuf,
        /// Only list runs of this algorithm (e.g. dijkstra, a-star)
        #[arg(short, long)]
        algorithm: Option<AlgorithmType>,
    },
    /// Show details of a stored run
    Show {
        /// Run store directory
        store: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Replay stored runs in lockstep
    Replay {
        /// Run store directory
        store: PathBuf,
        /// Run IDs to replay (all stored runs when omitted)
        run_ids: Vec<String>,
        /// Replay config YAML file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Clock advance per tick (overrides config)
        #[arg(long)]
        step_difference: Option<NonZeroU64>,
        /// Pause between ticks in milliseconds (overrides config)
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Print each run's final frame
        #[arg(long)]
        frames: bool,
    },
}

#[tokio::main]
async fn main() -> PlaybackResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Runs { store, algorithm } => cmd_runs(&store, algorithm),
        Commands::Show { store, run_id } => cmd_show(&store, &run_id),
        Commands::Replay {
            store,
            run_ids,
            config,
            step_difference,
            delay_ms,
            frames,
        } => {
            let mut replay_config = match config {
                Some(path) => load_config(&path)?,
                None => ReplayConfig::default(),
            };
            if let Some(step_difference) = step_difference {
                replay_config.step_difference = step_difference;
            }
            if let Some(delay_ms) = delay_ms {
                replay_config.delay_ms = delay_ms;
            }
            cmd_replay(&store, &run_ids, &replay_config, frames).await
        }
    }
}

fn cmd_runs(store_path: &Path, algorithm: Option<AlgorithmType>) -> PlaybackResult<()> {
    let store = RunStore::new(store_path.to_path_buf())?;
    let runs: Vec<_> = store
        .list_runs()?
        .into_iter()
        .filter(|m| algorithm.is_none_or(|a| m.algorithm == a))
        .collect();

    if runs.is_empty() {
        println!("No stored runs in {}", store.root_dir().display());
    } else {
        println!("Stored runs:");
        for manifest in runs {
            println!(
                "  {}  {:<18} {}x{}  steps={}  weight={}  ({})",
                &manifest.run_id[..manifest.run_id.len().min(12)],
                manifest.algorithm,
                manifest.dims.rows,
                manifest.dims.cols,
                manifest.total_steps,
                manifest.total_weight,
                manifest.timestamp
            );
        }
    }
    Ok(())
}

fn cmd_show(store_path: &Path, run_id: &str) -> PlaybackResult<()> {
    let store = RunStore::new(store_path.to_path_buf())?;
    let manifest = store.load_manifest(run_id)?;
    let run = store.load_run(run_id)?;

    println!("Run: {}", manifest.run_id);
    println!("  Algorithm:   {}", manifest.algorithm);
    println!("  Recorded:    {}", manifest.timestamp);
    println!("  Grid:        {}x{}", manifest.dims.rows, manifest.dims.cols);
    println!("  Start/End:   {} / {}", manifest.start, manifest.end);
    println!("  Entries:     {}", run.entries().len());
    println!("  Total steps: {}", run.total_steps());
    println!("  Path cells:  {}", run.final_path().len());
    println!("  Path weight: {}", run.total_weight());

    let mut buffer = FrameBuffer::new();
    gr_playback::render_at(std::slice::from_ref(&run), run.total_steps(), &mut buffer)?;
    print_frame(&buffer, &run);
    Ok(())
}

async fn cmd_replay(
    store_path: &Path,
    run_ids: &[String],
    config: &ReplayConfig,
    frames: bool,
) -> PlaybackResult<()> {
    let store = RunStore::new(store_path.to_path_buf())?;

    let ids: Vec<String> = if run_ids.is_empty() {
        store.list_runs()?.into_iter().map(|m| m.run_id).collect()
    } else {
        run_ids.to_vec()
    };
    if ids.is_empty() {
        println!("Nothing to replay in {}", store_path.display());
        return Ok(());
    }

    let mut runs: Vec<RunTimeline> = Vec::with_capacity(ids.len());
    for id in &ids {
        let run = store.load_run(id)?;
        if run.overlay() != config.overlay {
            warn!(
                run_id = %id,
                recorded = ?run.overlay(),
                expected = ?config.overlay,
                "run was recorded with a different path overlay"
            );
        }
        runs.push(run);
    }

    println!(
        "Replaying {} run(s): step_difference={} delay={}ms",
        runs.len(),
        config.step_difference,
        config.delay_ms
    );

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let mut options = config.playback_options();
    options.cancel = Some(cancel);

    let mut buffer = FrameBuffer::new();
    render_initial(&runs, &mut buffer)?;

    let mut last_emit = Instant::now();
    let outcome = run_playback(
        &mut runs,
        &options,
        &mut buffer,
        Some(&mut |event| {
            let emit_now = event.stage != PlaybackStage::Rendering
                || !event.completed.is_empty()
                || last_emit.elapsed() >= Duration::from_millis(100);
            if emit_now {
                render_cli_progress(&event);
                last_emit = Instant::now();
            }
        }),
    )
    .await?;
    clear_progress_line();

    if outcome.cancelled {
        println!("✗ Replay cancelled at step {}", outcome.last_step);
    } else {
        println!("✓ Replay finished after {} ticks", outcome.ticks);
    }
    for (algorithm, weight) in &outcome.totals {
        println!("  {:<18} total distance: {}", algorithm, weight);
    }

    if frames {
        for run in &runs {
            print_frame(&buffer, run);
        }
    }
    Ok(())
}

fn print_frame(buffer: &FrameBuffer, run: &RunTimeline) {
    if let Some(text) = buffer.frame_text(run.algorithm(), run.grid().dims()) {
        println!("\n[{}]", run.algorithm());
        println!("{}", text);
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &PlaybackProgress) {
    let width = 28usize;
    let fraction = event.fraction_complete();
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    print!(
        "\r[{}] {:>6.2}%  phase={}  step={}/{}  done={}/{}  elapsed={:.1}s",
        bar,
        fraction * 100.0,
        event.stage.label(),
        event.displayed_step,
        event.max_steps,
        event.completed_runs,
        event.total_runs,
        event.elapsed_wall_s
    );
    let _ = io::stdout().flush();
}
