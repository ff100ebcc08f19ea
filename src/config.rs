//! Simulation settings.

use crate::error::{Result, SandpileError};
use crate::grid::SEQUENTIAL_THRESHOLD;
use crate::implementations::SweepStrategy;

/// Tuning knobs for a run. None of them changes the computed result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Row ranges at or below this size are swept sequentially.
    pub sequential_threshold: usize,
    /// Worker threads; `None` lets rayon pick one per logical CPU.
    pub workers: Option<usize>,
    pub strategy: SweepStrategy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            sequential_threshold: SEQUENTIAL_THRESHOLD,
            workers: None,
            strategy: SweepStrategy::default(),
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.sequential_threshold = threshold;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_strategy(mut self, strategy: SweepStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sequential_threshold == 0 {
            return Err(SandpileError::Config(
                "sequential threshold must be at least 1".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(SandpileError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
