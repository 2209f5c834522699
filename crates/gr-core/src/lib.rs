//! gr-core: shared vocabulary for gridreplay.
//!
//! Contains:
//! - ids (bounds-checked cell ids)
//! - grid (dimensions, cells, fixed weights)
//! - state (cell states and algorithm identifiers)
//! - error (shared error types)

pub mod error;
pub mod grid;
pub mod ids;
pub mod state;

pub use error::{CoreError, CoreResult};
pub use grid::*;
pub use ids::*;
pub use state::*;
