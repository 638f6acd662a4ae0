//! Benchmark parameter types.

use std::fmt;

/// Parameters for a partition or scene benchmark run.
#[derive(Clone, Debug)]
pub struct SessionBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Number of Gaussian-like blobs the points are drawn around.
    pub blobs: usize,
}

impl fmt::Display for SessionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},blobs={}", self.point_count, self.blobs)
    }
}
