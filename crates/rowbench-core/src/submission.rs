//! Run measurements and submission results.
//!
//! These types are the JSON contract handed to leaderboard tooling. Field
//! names are camelCase and must stay stable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::report::{IssueKind, ValidationReport};

/// One timed execution attempt of a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMeasurement {
    /// Wall-clock time from spawn to exit, in milliseconds.
    pub wall_time_ms: f64,
    /// Peak resident memory of the candidate process group, in bytes.
    pub peak_memory_bytes: u64,
    /// Exit code, `None` if the process was killed by a signal or never started.
    pub exit_code: Option<i32>,
    /// Terminating signal, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<i32>,
    pub timed_out: bool,
    pub out_of_memory: bool,
    /// Aborted by the operator.
    #[serde(default)]
    pub cancelled: bool,
}

impl RunMeasurement {
    /// Classifies the run.
    ///
    /// Cancellation wins over timeout, timeout over memory breach, and any
    /// other non-zero or missing exit code is a crash.
    pub fn outcome(&self) -> RunOutcome {
        if self.cancelled {
            RunOutcome::Cancelled
        } else if self.timed_out {
            RunOutcome::Timeout
        } else if self.out_of_memory {
            RunOutcome::OutOfMemory
        } else if self.exit_code == Some(0) {
            RunOutcome::Success
        } else {
            RunOutcome::Crash
        }
    }

    /// Returns true if the run exited cleanly within its limits.
    pub fn is_success(&self) -> bool {
        self.outcome() == RunOutcome::Success
    }
}

/// Classification of a [`RunMeasurement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    Success,
    Timeout,
    OutOfMemory,
    Crash,
    Cancelled,
}

impl RunOutcome {
    /// The issue kind recorded when a failed run was supposed to produce the
    /// output under validation.
    pub fn issue_kind(self) -> Option<IssueKind> {
        match self {
            RunOutcome::Success => None,
            RunOutcome::Timeout => Some(IssueKind::Timeout),
            RunOutcome::OutOfMemory => Some(IssueKind::OutOfMemory),
            RunOutcome::Crash => Some(IssueKind::ProcessCrash),
            RunOutcome::Cancelled => Some(IssueKind::Cancelled),
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunOutcome::Success => "ok",
            RunOutcome::Timeout => "timeout",
            RunOutcome::OutOfMemory => "out of memory",
            RunOutcome::Crash => "crash",
            RunOutcome::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Timing statistics over the successful runs of a candidate, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Number of successful runs the statistics cover.
    pub samples: usize,
    pub median: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub stddev: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

/// Everything known about one benchmarked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub candidate_id: String,
    pub language: String,
    pub validation: ValidationReport,
    pub runs: Vec<RunMeasurement>,
    /// `None` when no run succeeded.
    pub summary: Option<RunSummary>,
}

impl SubmissionResult {
    /// Returns true if the submission may appear on the leaderboard: the
    /// output validated and at least one run produced timing data.
    pub fn is_eligible(&self) -> bool {
        self.validation.passed && self.summary.is_some()
    }

    /// Median wall time, if any run succeeded.
    pub fn median_ms(&self) -> Option<f64> {
        self.summary.map(|s| s.median)
    }

    /// Highest peak memory across runs.
    pub fn peak_memory_bytes(&self) -> u64 {
        self.runs
            .iter()
            .map(|r| r.peak_memory_bytes)
            .max()
            .unwrap_or(0)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
