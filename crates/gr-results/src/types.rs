//! Persisted run metadata.

use gr_core::{AlgorithmType, CellId, GridDims, Weight};
use serde::{Deserialize, Serialize};

use crate::snapshot::Step;
use crate::timeline::OverlayConfig;

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub algorithm: AlgorithmType,
    pub timestamp: String,
    pub dims: GridDims,
    pub start: CellId,
    pub end: CellId,
    pub total_steps: Step,
    pub total_weight: u64,
    pub entry_count: usize,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

/// Grid weights as written to `grid.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRecord {
    pub dims: GridDims,
    pub weights: Vec<Weight>,
}
