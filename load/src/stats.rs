//! Per-task request statistics
//!
//! Each simulated user keeps its own [`LoadStats`]; the driver merges them
//! once the users have stopped.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Counters and latency bounds for one task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Requests attempted
    pub requests: u64,
    /// Requests that failed
    pub failures: u64,
    total: Duration,
    min: Option<Duration>,
    max: Duration,
}

impl TaskStats {
    /// Record one attempt
    pub fn record(&mut self, elapsed: Duration, success: bool) {
        self.requests += 1;
        if !success {
            self.failures += 1;
        }
        self.total += elapsed;
        self.min = Some(self.min.map_or(elapsed, |m| m.min(elapsed)));
        self.max = self.max.max(elapsed);
    }

    /// Fold another task's numbers into this one
    pub fn merge(&mut self, other: &Self) {
        self.requests += other.requests;
        self.failures += other.failures;
        self.total += other.total;
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = self.max.max(other.max);
    }

    /// Fastest attempt
    #[must_use]
    pub fn min(&self) -> Duration {
        self.min.unwrap_or_default()
    }

    /// Slowest attempt
    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Mean latency
    #[must_use]
    pub fn mean(&self) -> Duration {
        if self.requests == 0 {
            return Duration::ZERO;
        }
        // Request counts stay far below u32::MAX in any realistic run
        let requests = u32::try_from(self.requests).unwrap_or(u32::MAX);
        self.total / requests
    }
}

/// Statistics for every task a user (or the whole run) performed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    tasks: BTreeMap<&'static str, TaskStats>,
}

impl LoadStats {
    /// Record one attempt of `task`
    pub fn record(&mut self, task: &'static str, elapsed: Duration, success: bool) {
        self.tasks.entry(task).or_default().record(elapsed, success);
    }

    /// Fold another set of statistics into this one
    pub fn merge(&mut self, other: &Self) {
        for (task, stats) in &other.tasks {
            self.tasks.entry(task).or_default().merge(stats);
        }
    }

    /// Statistics for one task
    #[must_use]
    pub fn task(&self, task: &str) -> Option<&TaskStats> {
        self.tasks.get(task)
    }

    /// Requests across all tasks
    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.tasks.values().map(|s| s.requests).sum()
    }

    /// Failures across all tasks
    #[must_use]
    pub fn total_failures(&self) -> u64 {
        self.tasks.values().map(|s| s.failures).sum()
    }

    /// Whether any attempt failed
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.total_failures() > 0
    }
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<24} {:>9} {:>9} {:>10} {:>10} {:>10}",
            "Task", "Requests", "Failures", "Min (ms)", "Mean (ms)", "Max (ms)"
        )?;
        for (task, stats) in &self.tasks {
            writeln!(
                f,
                "{:<24} {:>9} {:>9} {:>10} {:>10} {:>10}",
                task,
                stats.requests,
                stats.failures,
                stats.min().as_millis(),
                stats.mean().as_millis(),
                stats.max().as_millis()
            )?;
        }
        write!(
            f,
            "{:<24} {:>9} {:>9}",
            "Aggregated",
            self.total_requests(),
            self.total_failures()
        )
    }
}
