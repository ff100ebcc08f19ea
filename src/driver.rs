//! Iterate-to-fixed-point loop.

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, trace};

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::grid::Grid;

/// Driver state. `Stable` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Stable,
}

/// Final configuration and the number of committed passes that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stabilized {
    pub grid: Grid,
    pub steps: u64,
}

/// Runs full passes until one of them changes nothing.
///
/// The worker pool is built once here and reused for every pass; dropping the
/// driver shuts it down.
pub struct ConvergenceDriver {
    grid: Grid,
    config: SimulationConfig,
    pool: ThreadPool,
    steps: u64,
    passes: u64,
    phase: Phase,
}

impl ConvergenceDriver {
    pub fn new(grid: Grid, config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("sandpile-worker-{}", i));
        if let Some(workers) = config.workers {
            builder = builder.num_threads(workers);
        }
        let pool = builder.build()?;
        debug!(
            workers = pool.current_num_threads(),
            threshold = config.sequential_threshold,
            strategy = %config.strategy,
            "worker pool ready"
        );

        Ok(ConvergenceDriver {
            grid,
            config,
            pool,
            steps: 0,
            passes: 0,
            phase: Phase::Running,
        })
    }

    /// One pass without committing; returns whether `next` differs from `current`.
    pub fn sweep(&mut self) -> bool {
        let strategy = self.config.strategy;
        let threshold = self.config.sequential_threshold;
        let grid = &mut self.grid;
        let changed = self.pool.install(|| strategy.sweep(grid, threshold));
        debug_assert_eq!(changed, !self.grid.equals_current_next());
        changed
    }

    /// One pass plus commit. A no-op once stable.
    pub fn step(&mut self) -> Phase {
        if self.phase == Phase::Stable {
            return Phase::Stable;
        }

        self.passes += 1;
        if self.sweep() {
            self.grid.commit();
            self.steps += 1;
            trace!(step = self.steps, "pass committed");
            if self.steps % 100 == 0 {
                debug!(step = self.steps, "still toppling");
            }
        } else {
            self.phase = Phase::Stable;
        }
        self.phase
    }

    /// Steps until stable and returns the number of committed passes.
    pub fn run(&mut self) -> u64 {
        info!(
            rows = self.grid.rows(),
            cols = self.grid.cols(),
            grains = self.grid.total_grains(),
            "starting simulation"
        );
        while self.step() == Phase::Running {}
        info!(steps = self.steps, grains = self.grid.total_grains(), "reached stable state");
        self.steps
    }

    /// Committed passes only. A grid that changes once and then settles reports
    /// 1 here; [`passes`](Self::passes) also counts the final unchanged pass.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Passes executed, including the final one that found nothing to change.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

/// Stabilises `grid` with a fresh driver.
pub fn stabilize(grid: Grid, config: SimulationConfig) -> Result<Stabilized> {
    let mut driver = ConvergenceDriver::new(grid, config)?;
    let steps = driver.run();
    Ok(Stabilized {
        grid: driver.into_grid(),
        steps,
    })
}
