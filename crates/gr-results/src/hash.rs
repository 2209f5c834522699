//! Content-based hashing for run IDs.

use gr_core::CellId;
use sha2::{Digest, Sha256};

use crate::timeline::RunTimeline;

/// Hash of everything that determines a run: grid, endpoints, algorithm,
/// overlay shape, recorded history and final path.
pub fn compute_run_id(run: &RunTimeline) -> String {
    let mut hasher = Sha256::new();

    let dims = run.grid().dims();
    hasher.update(dims.rows.to_le_bytes());
    hasher.update(dims.cols.to_le_bytes());
    for weight in run.grid().weights() {
        hasher.update(weight.to_le_bytes());
    }

    hasher.update(u32::from(run.start()).to_le_bytes());
    hasher.update(u32::from(run.end()).to_le_bytes());
    hasher.update(run.algorithm().as_str().as_bytes());

    let overlay_json = serde_json::to_string(&run.overlay()).unwrap_or_default();
    hasher.update(overlay_json.as_bytes());

    for entry in run.entries() {
        hasher.update(entry.step.to_le_bytes());
        let states: Vec<u8> = entry.snapshot.iter().map(|c| c.state as u8).collect();
        hasher.update(&states);
    }

    let path: Option<Vec<CellId>> = run
        .has_final_path()
        .then(|| run.final_path().iter().map(|c| c.id).collect());
    let path_json = serde_json::to_string(&path).unwrap_or_default();
    hasher.update(path_json.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
