use core::fmt;
use core::num::NonZeroU32;

use crate::error::CoreError;

/// Row-major index of a grid cell.
///
/// - `u32` keeps snapshots small
/// - `NonZero` lets `Option<CellId>` stay the same size as `CellId`
///
/// Bounds-checked construction goes through [`GridDims::cell_id`](crate::GridDims::cell_id).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "u32", try_from = "u32"))]
pub struct CellId(NonZeroU32);

impl CellId {
    /// Store index+1; `None` only for `u32::MAX`.
    pub(crate) fn from_index(index: u32) -> Option<Self> {
        index.checked_add(1).and_then(NonZeroU32::new).map(Self)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl From<CellId> for u32 {
    fn from(id: CellId) -> Self {
        id.0.get() - 1
    }
}

impl TryFrom<u32> for CellId {
    type Error = CoreError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        CellId::from_index(index).ok_or(CoreError::IndexOob {
            what: "cell id",
            index: index as usize,
            len: u32::MAX as usize,
        })
    }
}

impl fmt::Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellId({})", self.index())
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = CellId::try_from(i).unwrap();
            assert_eq!(id.index(), i as usize);
            assert_eq!(u32::from(id), i);
        }
    }

    #[test]
    fn max_index_is_rejected() {
        assert!(CellId::try_from(u32::MAX).is_err());
    }

    #[test]
    fn option_cell_id_is_small() {
        assert_eq!(
            core::mem::size_of::<CellId>(),
            core::mem::size_of::<Option<CellId>>()
        );
    }
}
