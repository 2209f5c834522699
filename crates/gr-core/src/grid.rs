//! Grid geometry and the fixed per-cell weights shared by every run.

use crate::error::{CoreError, CoreResult};
use crate::ids::CellId;

/// Traversal cost of a single cell.
pub type Weight = u32;

pub const DEFAULT_ROWS: u32 = 20;
pub const DEFAULT_COLS: u32 = 40;

/// Row/column extent of a grid. Cells are numbered row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDims {
    pub rows: u32,
    pub cols: u32,
}

impl Default for GridDims {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

impl GridDims {
    pub fn new(rows: u32, cols: u32) -> CoreResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(CoreError::InvalidArg {
                what: "grid dimensions must be non-zero",
            });
        }
        if rows.checked_mul(cols).is_none() {
            return Err(CoreError::InvalidArg {
                what: "grid size overflows u32",
            });
        }
        Ok(Self { rows, cols })
    }

    /// Total cell count (`ROWS * COLS`).
    pub fn size(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn contains(&self, id: CellId) -> bool {
        id.index() < self.size()
    }

    /// Bounds-checked cell id for a row-major index.
    pub fn cell_id(&self, index: usize) -> CoreResult<CellId> {
        let len = self.size();
        if index >= len {
            return Err(CoreError::IndexOob {
                what: "cell index",
                index,
                len,
            });
        }
        // size() fits in u32 (checked in `new`), so index < size does too.
        CellId::from_index(index as u32).ok_or(CoreError::IndexOob {
            what: "cell index",
            index,
            len,
        })
    }

    pub fn cell_at(&self, row: u32, col: u32) -> CoreResult<CellId> {
        if row >= self.rows {
            return Err(CoreError::IndexOob {
                what: "row",
                index: row as usize,
                len: self.rows as usize,
            });
        }
        if col >= self.cols {
            return Err(CoreError::IndexOob {
                what: "col",
                index: col as usize,
                len: self.cols as usize,
            });
        }
        self.cell_id(row as usize * self.cols as usize + col as usize)
    }

    /// `(row, col)` of a cell.
    pub fn row_col(&self, id: CellId) -> (u32, u32) {
        let index = id.index() as u32;
        (index / self.cols, index % self.cols)
    }

    /// All cell ids in row-major order.
    pub fn ids(&self) -> impl Iterator<Item = CellId> + '_ {
        (0..self.size() as u32).filter_map(CellId::from_index)
    }
}

/// A grid position together with its fixed weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub id: CellId,
    pub weight: Weight,
}

/// Full grid of weights, assigned before any run starts and never changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dims: GridDims,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from row-major weights. `weights.len()` must equal `dims.size()`.
    pub fn new(dims: GridDims, weights: Vec<Weight>) -> CoreResult<Self> {
        if weights.len() != dims.size() {
            return Err(CoreError::Invariant {
                what: "weight count must equal rows * cols",
            });
        }
        let cells = dims
            .ids()
            .zip(weights)
            .map(|(id, weight)| Cell { id, weight })
            .collect();
        Ok(Self { dims, cells })
    }

    pub fn uniform(dims: GridDims, weight: Weight) -> Self {
        let cells = dims.ids().map(|id| Cell { id, weight }).collect();
        Self { dims, cells }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Panics if `id` does not belong to this grid.
    pub fn cell(&self, id: CellId) -> Cell {
        self.cells[id.index()]
    }

    pub fn get(&self, id: CellId) -> Option<Cell> {
        self.cells.get(id.index()).copied()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn weights(&self) -> impl Iterator<Item = Weight> + '_ {
        self.cells.iter().map(|c| c.weight)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn every_index_maps_to_its_row_and_col(rows in 1_u32..64, cols in 1_u32..64) {
            let dims = GridDims::new(rows, cols).unwrap();
            for (index, id) in dims.ids().enumerate() {
                prop_assert_eq!(id.index(), index);
                let (row, col) = dims.row_col(id);
                prop_assert_eq!(dims.cell_at(row, col).unwrap(), id);
            }
            prop_assert!(dims.cell_id(dims.size()).is_err());
        }
    }
}
