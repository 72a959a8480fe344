//! Release notes: contributor bookkeeping, commit filtering, per-version
//! aggregation, rendering and the persisted hand-off between stages.

pub mod aggregate;
pub mod contributors;
pub mod filter;
pub mod format;
pub mod model;
pub mod serialize;
pub mod sources;

pub use aggregate::{NotesAggregator, NotesRequest};
