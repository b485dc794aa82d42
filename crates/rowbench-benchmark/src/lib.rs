//! Benchmark harness for rowbench.
//!
//! This crate runs candidate programs as isolated processes, folds the
//! validator's verdict into their timings, and ranks them.
//!
//! # Overview
//!
//! - [`Benchmark`] builds a candidate once, runs it `run_count` times
//!   sequentially, and validates the output of the final run
//! - [`run_process`] enforces the wall-clock and memory limits of one run
//!   and kills the candidate's whole process group on breach or abort
//! - [`summarize`] computes median, mean, population standard deviation and
//!   a 95% confidence interval over the successful runs
//! - [`Tournament`] benchmarks many candidates on a fixed-size worker pool
//! - [`rank`] orders results: validated first, then by median, standard
//!   deviation and id
//! - [`TournamentReport`] is the JSON record of a whole tournament
//!
//! Candidate failures never surface as errors. They are recorded in the
//! [`SubmissionResult`](rowbench_core::SubmissionResult) so one broken
//! submission cannot stop the rest of a tournament.
//!
//! # Example
//!
//! ```
//! use rowbench_benchmark::{BenchmarkConfig, CandidateSpec};
//! use std::time::Duration;
//!
//! let config = BenchmarkConfig::new()
//!     .with_run_count(5)
//!     .with_timeout(Duration::from_secs(10))
//!     .with_memory_limit(1 << 30);
//! let candidate = CandidateSpec::from_command_line("py", "python", "python3 solution.py").unwrap();
//!
//! assert_eq!(config.run_count(), 5);
//! assert_eq!(candidate.program, "python3");
//! ```
//!
//! Running it against a dataset and its reference:
//!
//! ```text
//! let benchmark = Benchmark::new(config).with_abort(abort);
//! let result = benchmark.run(&candidate, Path::new("measurements.txt"), &reference)?;
//! println!("{}", result.to_json()?);
//! ```

mod abort;
mod candidate;
mod config;
mod process;
mod ranking;
mod report;
mod runner;
mod statistics;
mod tournament;

pub use abort::AbortHandle;
pub use candidate::{CandidateSpec, INPUT_PLACEHOLDER};
pub use config::BenchmarkConfig;
pub use process::{run_process, ProcessLimits, ProcessOutcome, ProcessRequest};
pub use ranking::{rank, Leaderboard, LeaderboardEntry};
pub use report::TournamentReport;
pub use runner::Benchmark;
pub use statistics::{summarize, Z_95};
pub use tournament::{Tournament, TournamentOutcome};
