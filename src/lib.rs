//! # sandpile_rust
//!
//! Parallel Abelian sandpile simulation. Grains on a rectangular grid topple
//! onto their four neighbours until every cell holds at most three; grains
//! pushed past the edge fall into an absorbing border.
//!
//! One pass reads the `current` buffer and writes `next`; the rows of `next`
//! are split between rayon tasks so no two tasks write the same cell.

pub mod config;
pub mod driver;
pub mod error;
pub mod grid;
pub mod implementations;
pub mod io;
pub mod stencil;

pub use config::SimulationConfig;
pub use driver::{stabilize, ConvergenceDriver, Phase, Stabilized};
pub use error::{Result, SandpileError};
pub use grid::{Buffer, Grid, MAX_GRAINS, SEQUENTIAL_THRESHOLD};
pub use implementations::SweepStrategy;
