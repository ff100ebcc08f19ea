//! Full-pass sweep strategies.
//!
//! Each strategy writes every interior cell of `next` exactly once from
//! `current` and reports whether any cell changed. They differ only in how
//! rows are scheduled, never in the result.

pub mod chunked;
pub mod fork_join;
pub mod single;

use std::fmt;
use std::str::FromStr;

use crate::grid::Grid;

pub use chunked::chunked_sweep;
pub use fork_join::fork_join_sweep;
pub use single::sweep_rows;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SweepStrategy {
    /// Row by row on the calling thread.
    Single,
    /// Recursive halving with `rayon::join` down to the sequential threshold.
    #[default]
    ForkJoin,
    /// One rayon task per row via `par_chunks_mut`.
    Chunked,
}

impl SweepStrategy {
    pub const ALL: [SweepStrategy; 3] = [
        SweepStrategy::Single,
        SweepStrategy::ForkJoin,
        SweepStrategy::Chunked,
    ];

    /// Runs one pass over `grid`, filling `next` from `current`.
    ///
    /// Parallel strategies use whichever rayon pool is current; call this
    /// inside `ThreadPool::install` to pin the worker count.
    pub fn sweep(self, grid: &mut Grid, threshold: usize) -> bool {
        let stride = grid.stride();
        let (src, dst) = grid.sweep_buffers();
        match self {
            SweepStrategy::Single => sweep_rows(src, dst, 1, stride),
            SweepStrategy::ForkJoin => fork_join_sweep(src, dst, 1, stride, threshold),
            SweepStrategy::Chunked => chunked_sweep(src, dst, 1, stride),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SweepStrategy::Single => "single",
            SweepStrategy::ForkJoin => "fork-join",
            SweepStrategy::Chunked => "chunked",
        }
    }
}

impl fmt::Display for SweepStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SweepStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SweepStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| format!("unknown strategy '{}' (expected single, fork-join or chunked)", s))
    }
}
