//! Benchmark support crate for dendra.
//!
//! Generates synthetic point clouds and single-linkage merge histories over
//! them so the Criterion benches can time tree cuts, log replay and scene
//! construction at realistic sizes.

pub mod error;
pub mod linkage;
pub mod params;
pub mod source;
