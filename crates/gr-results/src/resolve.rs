//! Random-access lookup into a sparse timeline.

use std::cmp::Ordering;

use crate::snapshot::{Step, TimelineEntry};

/// Latest entry whose step does not exceed `target`.
///
/// `entries` must be non-empty and sorted by strictly increasing step. A
/// `target` before the first entry floors to the first entry so the seed
/// state is shown.
pub fn resolve(entries: &[TimelineEntry], target: Step) -> &TimelineEntry {
    let mut nearest = &entries[0];
    let mut lo = 0;
    let mut hi = entries.len();

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let entry = &entries[mid];
        match entry.step.cmp(&target) {
            Ordering::Equal => return entry,
            Ordering::Less => {
                nearest = entry;
                lo = mid + 1;
            }
            Ordering::Greater => hi = mid,
        }
    }

    nearest
}
