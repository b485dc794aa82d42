//! JSON record of a whole tournament.

use std::fs;
use std::path::Path;

use chrono::Utc;
use rowbench_core::{Result, SubmissionResult};
use serde::{Deserialize, Serialize};

use crate::config::BenchmarkConfig;
use crate::ranking::Leaderboard;
use crate::tournament::TournamentOutcome;

/// JSON record of a whole tournament.
///
/// `speedup` is the slowest ranked median divided by the fastest, present
/// when at least two candidates are ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentReport {
    /// RFC 3339 timestamp.
    pub generated_at: String,
    pub input: String,
    pub runs: usize,
    pub timeout_ms: u64,
    pub memory_bytes: u64,
    pub results: Vec<SubmissionResult>,
    pub leaderboard: Leaderboard,
    pub fastest: Option<String>,
    pub slowest: Option<String>,
    pub speedup: Option<f64>,
}

impl TournamentReport {
    /// Builds a report stamped with the current time.
    pub fn new(outcome: &TournamentOutcome, config: &BenchmarkConfig) -> Self {
        let ranked: Vec<_> = outcome.leaderboard.eligible().collect();
        let fastest = ranked.first().copied();
        let slowest = ranked.last().copied();
        let speedup = match (fastest, slowest) {
            (Some(fast), Some(slow)) if ranked.len() > 1 => {
                match (fast.median_ms, slow.median_ms) {
                    (Some(f), Some(s)) if f > 0.0 => Some(s / f),
                    _ => None,
                }
            }
            _ => None,
        };

        Self {
            generated_at: Utc::now().to_rfc3339(),
            input: outcome.input.display().to_string(),
            runs: config.run_count(),
            timeout_ms: config.timeout().as_millis() as u64,
            memory_bytes: config.memory_limit(),
            results: outcome.results.clone(),
            leaderboard: outcome.leaderboard.clone(),
            fastest: fastest.map(|e| e.candidate_id.clone()),
            slowest: slowest.map(|e| e.candidate_id.clone()),
            speedup,
        }
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Writes pretty-printed JSON to a file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json + "\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::rank;
    use rowbench_core::{IssueKind, RunMeasurement, RunSummary, ValidationIssue, ValidationReport};
    use std::path::PathBuf;

    fn run(ms: f64, exit_code: Option<i32>) -> RunMeasurement {
        RunMeasurement {
            wall_time_ms: ms,
            peak_memory_bytes: 2048,
            exit_code,
            signal: None,
            timed_out: false,
            out_of_memory: false,
            cancelled: false,
        }
    }

    fn submission(id: &str, median: f64) -> SubmissionResult {
        SubmissionResult {
            candidate_id: id.to_string(),
            language: "cpp".to_string(),
            validation: ValidationReport::from_issues(vec![]),
            runs: vec![run(median, Some(0))],
            summary: Some(RunSummary {
                samples: 1,
                median,
                mean: median,
                stddev: 0.0,
                ci_low: median,
                ci_high: median,
            }),
        }
    }

    fn failed(id: &str) -> SubmissionResult {
        SubmissionResult {
            candidate_id: id.to_string(),
            language: "python".to_string(),
            validation: ValidationReport::from_issues(vec![ValidationIssue::new(
                IssueKind::MissingKey,
                "key absent from output",
            )
            .with_key("Oslo")]),
            runs: vec![run(10.0, Some(0))],
            summary: None,
        }
    }

    fn outcome(results: Vec<SubmissionResult>) -> TournamentOutcome {
        TournamentOutcome {
            input: PathBuf::from("data/measurements.txt"),
            leaderboard: rank(&results),
            results,
        }
    }

    #[test]
    fn test_report_speedup() {
        let outcome = outcome(vec![submission("slow", 400.0), submission("fast", 100.0), failed("bad")]);
        let report = TournamentReport::new(&outcome, &BenchmarkConfig::new().with_run_count(3));
        assert_eq!(report.fastest.as_deref(), Some("fast"));
        assert_eq!(report.slowest.as_deref(), Some("slow"));
        assert_eq!(report.speedup, Some(4.0));
        assert_eq!(report.runs, 3);
        assert!(chrono::DateTime::parse_from_rfc3339(&report.generated_at).is_ok());
    }

    #[test]
    fn test_single_entry_has_no_speedup() {
        let report = TournamentReport::new(&outcome(vec![submission("only", 5.0)]), &BenchmarkConfig::new());
        assert_eq!(report.fastest.as_deref(), Some("only"));
        assert_eq!(report.speedup, None);
    }

    #[test]
    fn test_report_json_fields() {
        let report = TournamentReport::new(&outcome(vec![submission("a", 5.0)]), &BenchmarkConfig::new());
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["input"], "data/measurements.txt");
        assert_eq!(json["timeoutMs"], 300_000);
        assert_eq!(json["results"][0]["candidateId"], "a");
        assert_eq!(json["leaderboard"][0]["rank"], 1);
        assert!(json["generatedAt"].is_string());
    }
}
