//! Parallel scenario execution.
//!
//! Scenarios are independent: each owns its identifier-partitioned scratch
//! directory and artifact paths, so the whole matrix can run on a worker
//! pool with no shared mutable state. Steps inside one scenario stay
//! strictly sequential.

use crate::scenario::{
    validate_unique_ids, BuildInvoker, HarnessError, Materializer, MatrixResult, Scenario,
    ScenarioRunner,
};
use std::fs;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// Default number of parallel jobs (uses available parallelism).
fn default_jobs() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Parallel matrix executor.
pub struct ParallelRun<M, I> {
    /// Underlying scenario runner
    runner: ScenarioRunner<M, I>,
    /// Number of parallel jobs
    jobs: usize,
    /// Whether to stop scheduling new scenarios after a failure
    fail_fast: bool,
}

impl<M, I> ParallelRun<M, I>
where
    M: Materializer + Sync,
    I: BuildInvoker + Sync,
{
    /// Create a new parallel run.
    pub fn new(runner: ScenarioRunner<M, I>) -> Self {
        Self { runner, jobs: default_jobs(), fail_fast: false }
    }

    /// Set the number of parallel jobs (0 selects available parallelism).
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = if jobs == 0 { default_jobs() } else { jobs };
        self
    }

    /// Set fail-fast mode (stop scheduling after the first failure).
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Get the number of parallel jobs.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Get the underlying runner.
    pub fn runner(&self) -> &ScenarioRunner<M, I> {
        &self.runner
    }

    /// Run the matrix on the worker pool.
    ///
    /// Results come back in input order regardless of completion order.
    /// With fail-fast, scenarios already running complete normally; only
    /// unscheduled ones are dropped.
    pub fn run(&self, scenarios: &[Scenario]) -> Result<MatrixResult, HarnessError> {
        let start = Instant::now();
        validate_unique_ids(scenarios)?;
        fs::create_dir_all(self.runner.context().scratch_root())?;

        if scenarios.is_empty() {
            return Ok(MatrixResult::new());
        }

        // Single-worker or single-scenario runs stay sequential
        let mut result = if self.jobs == 1 || scenarios.len() == 1 {
            let mut result = MatrixResult::new();
            for scenario in scenarios {
                let scenario_result = self.runner.run_scenario(scenario);
                let failed = !scenario_result.is_passed();
                result.add_result(scenario_result);
                if failed && self.fail_fast {
                    break;
                }
            }
            result
        } else {
            self.run_pool(scenarios)
        };

        result.total_duration = start.elapsed();
        Ok(result)
    }

    /// Execute scenarios on scoped worker threads with an atomic work queue.
    fn run_pool(&self, scenarios: &[Scenario]) -> MatrixResult {
        let results = Mutex::new(Vec::new());
        let failed = AtomicBool::new(false);
        let next_idx = AtomicUsize::new(0);
        let fail_fast = self.fail_fast;

        std::thread::scope(|s| {
            let num_workers = self.jobs.min(scenarios.len());

            for _ in 0..num_workers {
                let results = &results;
                let failed = &failed;
                let next_idx = &next_idx;

                s.spawn(move || {
                    loop {
                        // Check if we should stop
                        if fail_fast && failed.load(Ordering::SeqCst) {
                            break;
                        }

                        // Get next work item
                        let idx = next_idx.fetch_add(1, Ordering::SeqCst);
                        if idx >= scenarios.len() {
                            break;
                        }

                        let scenario_result = self.runner.run_scenario(&scenarios[idx]);

                        if !scenario_result.is_passed() && fail_fast {
                            failed.store(true, Ordering::SeqCst);
                        }

                        results.lock().unwrap().push((idx, scenario_result));
                    }
                });
            }
        });

        // Sort results by original index to maintain deterministic order
        let mut collected = results.into_inner().unwrap();
        collected.sort_by_key(|(idx, _)| *idx);

        let mut result = MatrixResult::new();
        for (_, scenario_result) in collected {
            result.add_result(scenario_result);
        }
        result
    }
}
