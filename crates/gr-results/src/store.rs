//! Run storage API.
//!
//! Layout per run: `<root>/<run_id>/{manifest.json, grid.json, path.json, timeline.jsonl}`.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use gr_core::{Cell, Grid};
use tracing::{debug, info};

use crate::hash::compute_run_id;
use crate::snapshot::TimelineEntry;
use crate::timeline::RunTimeline;
use crate::types::{GridRecord, RunManifest};
use crate::{ResultsError, ResultsResult};

#[derive(Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &PathBuf {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join("manifest.json").exists()
    }

    /// Persist a finished run and return its manifest.
    pub fn save_run(&self, run: &RunTimeline) -> ResultsResult<RunManifest> {
        let manifest = RunManifest {
            run_id: compute_run_id(run),
            algorithm: run.algorithm(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            dims: run.grid().dims(),
            start: run.start(),
            end: run.end(),
            total_steps: run.total_steps(),
            total_weight: run.total_weight(),
            entry_count: run.entries().len(),
            overlay: run.overlay(),
        };

        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let manifest_json = serde_json::to_string_pretty(&manifest)?;
        fs::write(run_dir.join("manifest.json"), manifest_json)?;

        let grid = GridRecord {
            dims: run.grid().dims(),
            weights: run.grid().weights().collect(),
        };
        fs::write(run_dir.join("grid.json"), serde_json::to_string(&grid)?)?;
        // `null` marks a run whose search never produced a path result.
        let path = run.has_final_path().then(|| run.final_path());
        fs::write(run_dir.join("path.json"), serde_json::to_string(&path)?)?;

        let mut timeline_content = String::new();
        for entry in run.entries() {
            let line = serde_json::to_string(entry)?;
            timeline_content.push_str(&line);
            timeline_content.push('\n');
        }
        fs::write(run_dir.join("timeline.jsonl"), timeline_content)?;

        info!(
            run_id = %manifest.run_id,
            algorithm = %manifest.algorithm,
            entries = manifest.entry_count,
            "saved run"
        );
        Ok(manifest)
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id).join("manifest.json");

        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    /// Rebuild a stored run. The returned timeline is not marked complete.
    pub fn load_run(&self, run_id: &str) -> ResultsResult<RunTimeline> {
        let manifest = self.load_manifest(run_id)?;
        let run_dir = self.run_dir(run_id);

        let grid_record: GridRecord =
            serde_json::from_str(&fs::read_to_string(run_dir.join("grid.json"))?)?;
        let grid = Arc::new(Grid::new(grid_record.dims, grid_record.weights)?);

        let final_path: Option<Vec<Cell>> =
            serde_json::from_str(&fs::read_to_string(run_dir.join("path.json"))?)?;

        let content = fs::read_to_string(run_dir.join("timeline.jsonl"))?;
        let mut entries = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                let entry: TimelineEntry = serde_json::from_str(line)?;
                entries.push(entry);
            }
        }

        debug!(run_id, entries = entries.len(), "loaded run");
        RunTimeline::from_parts(
            grid,
            manifest.start,
            manifest.end,
            manifest.algorithm,
            manifest.overlay,
            entries,
            final_path,
        )
    }

    /// All stored runs, ordered by algorithm then run id.
    pub fn list_runs(&self) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id) {
                    runs.push(manifest);
                }
            }
        }

        runs.sort_by(|a, b| {
            a.algorithm
                .cmp(&b.algorithm)
                .then_with(|| a.run_id.cmp(&b.run_id))
        });
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
