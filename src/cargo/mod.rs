//! Cargo workspace integration
//!
//! - **metadata**: name and version of the released package via cargo_metadata

pub mod metadata;
