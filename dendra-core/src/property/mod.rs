//! Property-based tests for the partition, replay and geometry engines.
//!
//! Histories come from [`crate::test_utils::merge_history`]: random pairwise
//! merges at strictly increasing heights, recorded both as a tree and as a
//! step log ending in the completion marker.

mod geometry;
mod partitions;
