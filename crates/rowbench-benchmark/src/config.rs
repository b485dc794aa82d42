//! Benchmark configuration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rowbench_config::{LimitsConfig, TournamentConfig};
use tempfile::TempDir;
use rowbench_validator::DEFAULT_EPSILON;

/// Configuration for benchmarking candidates.
///
/// Controls run counts, per-run limits, validation tolerance, and where
/// candidate output files go.
///
/// # Example
///
/// ```
/// use rowbench_benchmark::BenchmarkConfig;
/// use std::time::Duration;
///
/// let config = BenchmarkConfig::new()
///     .with_run_count(5)
///     .with_timeout(Duration::from_secs(30))
///     .with_memory_limit(512 * 1024 * 1024);
///
/// assert_eq!(config.run_count(), 5);
/// assert_eq!(config.timeout(), Duration::from_secs(30));
/// assert_eq!(config.memory_limit(), 512 * 1024 * 1024);
/// ```
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    run_count: usize,
    timeout: Duration,
    memory_limit: u64,
    build_timeout: Duration,
    epsilon: f64,
    sample_interval: Duration,
    work_dir: Option<PathBuf>,
    keep_outputs: bool,
    workers: Option<usize>,
}

impl BenchmarkConfig {
    /// Creates a configuration with tournament defaults.
    ///
    /// Defaults:
    /// - run_count: 1
    /// - timeout: 5 minutes
    /// - memory_limit: 8 GiB
    /// - build_timeout: 10 minutes
    /// - epsilon: 0.05
    /// - sample_interval: 50 ms
    ///
    /// # Example
    ///
    /// ```
    /// use rowbench_benchmark::BenchmarkConfig;
    ///
    /// let config = BenchmarkConfig::new();
    /// assert_eq!(config.run_count(), 1);
    /// assert_eq!(config.epsilon(), 0.05);
    /// ```
    pub fn new() -> Self {
        let limits = LimitsConfig::default();
        Self {
            run_count: 1,
            timeout: limits.timeout(),
            memory_limit: limits.memory_bytes,
            build_timeout: limits.build_timeout(),
            epsilon: DEFAULT_EPSILON,
            sample_interval: Duration::from_millis(50),
            work_dir: None,
            keep_outputs: false,
            workers: None,
        }
    }

    /// Builds a configuration from a loaded tournament file.
    pub fn from_tournament(config: &TournamentConfig) -> Self {
        let mut benchmark = Self::new()
            .with_run_count(config.runs)
            .with_limits(&config.limits)
            .with_epsilon(config.epsilon)
            .with_keep_outputs(config.keep_outputs);
        benchmark.work_dir = config.work_dir.clone();
        benchmark.workers = config.workers;
        benchmark
    }

    /// Sets the number of timed runs per candidate.
    ///
    /// # Example
    ///
    /// ```
    /// use rowbench_benchmark::BenchmarkConfig;
    ///
    /// let config = BenchmarkConfig::new().with_run_count(10);
    /// assert_eq!(config.run_count(), 10);
    /// ```
    pub fn with_run_count(mut self, count: usize) -> Self {
        self.run_count = count;
        self
    }

    /// Sets the wall-clock limit per run.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the resident memory limit per run, in bytes.
    pub fn with_memory_limit(mut self, bytes: u64) -> Self {
        self.memory_limit = bytes;
        self
    }

    /// Applies run timeout, memory limit and build timeout at once.
    pub fn with_limits(mut self, limits: &LimitsConfig) -> Self {
        self.timeout = limits.timeout();
        self.memory_limit = limits.memory_bytes;
        self.build_timeout = limits.build_timeout();
        self
    }

    /// Sets the wall-clock limit for the build step.
    pub fn with_build_timeout(mut self, timeout: Duration) -> Self {
        self.build_timeout = timeout;
        self
    }

    /// Sets the validation tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets how often memory is sampled and the abort flag checked.
    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    /// Sets the directory that receives candidate output files.
    ///
    /// # Example
    ///
    /// ```
    /// use rowbench_benchmark::BenchmarkConfig;
    /// use std::path::Path;
    ///
    /// let config = BenchmarkConfig::new().with_work_dir("target/rowbench");
    /// assert_eq!(config.work_dir(), Path::new("target/rowbench"));
    /// ```
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Keeps candidate output files after validation.
    pub fn with_keep_outputs(mut self, keep: bool) -> Self {
        self.keep_outputs = keep;
        self
    }

    /// Sets the number of candidates benchmarked concurrently.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Returns the number of timed runs per candidate.
    pub fn run_count(&self) -> usize {
        self.run_count
    }

    /// Returns the wall-clock limit per run.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the memory limit per run, in bytes.
    pub fn memory_limit(&self) -> u64 {
        self.memory_limit
    }

    /// Returns the build timeout.
    pub fn build_timeout(&self) -> Duration {
        self.build_timeout
    }

    /// Returns the validation tolerance.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the sampling interval.
    pub fn sample_interval(&self) -> Duration {
        self.sample_interval
    }

    /// Returns the work directory, defaulting to `<tmp>/rowbench`.
    pub fn work_dir(&self) -> PathBuf {
        self.work_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("rowbench"))
    }

    /// Returns true if output files are kept.
    pub fn keep_outputs(&self) -> bool {
        self.keep_outputs
    }

    /// Returns the worker count, defaulting to available parallelism.
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Creates a fresh directory for one candidate's files.
    ///
    /// Every call gets its own directory, even for ids that sanitize to the
    /// same name.
    pub(crate) fn candidate_dir(&self, candidate_id: &str) -> io::Result<TempDir> {
        candidate_dir(&self.work_dir(), candidate_id)
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn candidate_dir(root: &Path, candidate_id: &str) -> io::Result<TempDir> {
    let safe: String = candidate_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    fs::create_dir_all(root)?;
    tempfile::Builder::new()
        .prefix(&format!("{}-", safe))
        .tempdir_in(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowbench_config::CandidateConfig;

    #[test]
    fn test_from_tournament() {
        let tournament = TournamentConfig::new()
            .with_runs(4)
            .with_epsilon(0.1)
            .with_workers(3)
            .with_limits(LimitsConfig::new(1500, 1 << 20))
            .with_candidate(CandidateConfig::new("a", "python"));
        let config = BenchmarkConfig::from_tournament(&tournament);
        assert_eq!(config.run_count(), 4);
        assert_eq!(config.epsilon(), 0.1);
        assert_eq!(config.workers(), 3);
        assert_eq!(config.timeout(), Duration::from_millis(1500));
        assert_eq!(config.memory_limit(), 1 << 20);
    }

    #[test]
    fn test_candidate_dir_is_sanitized() {
        let root = tempfile::tempdir().unwrap();
        let dir = candidate_dir(&root.path().join("work"), "team/a b").unwrap();
        let name = dir.path().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("team_a_b-"));
        assert_eq!(dir.path().parent(), Some(root.path().join("work").as_path()));
    }

    #[test]
    fn test_colliding_ids_get_separate_dirs() {
        let root = tempfile::tempdir().unwrap();
        let slash = candidate_dir(root.path(), "team/a").unwrap();
        let underscore = candidate_dir(root.path(), "team_a").unwrap();
        let again = candidate_dir(root.path(), "team_a").unwrap();
        assert_ne!(slash.path(), underscore.path());
        assert_ne!(underscore.path(), again.path());
    }
}
