//! Leaderboard ranking.
//!
//! Correctness gates speed: only candidates whose output validated and that
//! produced timing data are ranked. Among those, a lower median wins, then
//! a lower standard deviation, then the candidate id so the order is total.

use std::cmp::Ordering;

use rowbench_core::SubmissionResult;
use serde::{Deserialize, Serialize};

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based rank, `None` for ineligible candidates.
    pub rank: Option<usize>,
    pub candidate_id: String,
    pub language: String,
    pub passed: bool,
    pub median_ms: Option<f64>,
    pub stddev_ms: Option<f64>,
    pub peak_memory_bytes: u64,
}

impl LeaderboardEntry {
    fn from_result(result: &SubmissionResult) -> Self {
        Self {
            rank: None,
            candidate_id: result.candidate_id.clone(),
            language: result.language.clone(),
            passed: result.validation.passed,
            median_ms: result.summary.map(|s| s.median),
            stddev_ms: result.summary.map(|s| s.stddev),
            peak_memory_bytes: result.peak_memory_bytes(),
        }
    }
}

/// Ranked entries followed by unranked ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Entries with a rank, best first.
    pub fn eligible(&self) -> impl Iterator<Item = &LeaderboardEntry> {
        self.entries.iter().filter(|e| e.rank.is_some())
    }

    pub fn winner(&self) -> Option<&LeaderboardEntry> {
        self.entries.first().filter(|e| e.rank.is_some())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ranks submission results.
///
/// Ineligible results keep their input order after the ranked ones.
///
/// # Example
///
/// ```
/// use rowbench_benchmark::rank;
///
/// let leaderboard = rank(&[]);
/// assert!(leaderboard.is_empty());
/// assert!(leaderboard.winner().is_none());
/// ```
pub fn rank(results: &[SubmissionResult]) -> Leaderboard {
    let (mut eligible, ineligible): (Vec<&SubmissionResult>, Vec<&SubmissionResult>) =
        results.iter().partition(|r| r.is_eligible());
    eligible.sort_by(|a, b| compare(a, b));

    let ranked = eligible.into_iter().enumerate().map(|(i, result)| LeaderboardEntry {
        rank: Some(i + 1),
        ..LeaderboardEntry::from_result(result)
    });
    let unranked = ineligible.into_iter().map(LeaderboardEntry::from_result);
    Leaderboard {
        entries: ranked.chain(unranked).collect(),
    }
}

fn compare(a: &SubmissionResult, b: &SubmissionResult) -> Ordering {
    let key = |r: &SubmissionResult| {
        r.summary
            .map(|s| (s.median, s.stddev))
            .unwrap_or((f64::INFINITY, f64::INFINITY))
    };
    let (a_median, a_stddev) = key(a);
    let (b_median, b_stddev) = key(b);
    a_median
        .total_cmp(&b_median)
        .then_with(|| a_stddev.total_cmp(&b_stddev))
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowbench_core::{IssueKind, RunSummary, ValidationReport};

    fn result(id: &str, passed: bool, median: Option<f64>, stddev: f64) -> SubmissionResult {
        let validation = if passed {
            ValidationReport::from_issues(vec![])
        } else {
            ValidationReport::execution_failure(IssueKind::ValueMismatch, "wrong")
        };
        SubmissionResult {
            candidate_id: id.to_string(),
            language: "go".to_string(),
            validation,
            runs: vec![],
            summary: median.map(|median| RunSummary {
                samples: 3,
                median,
                mean: median,
                stddev,
                ci_low: median,
                ci_high: median,
            }),
        }
    }

    fn order(leaderboard: &Leaderboard) -> Vec<(&str, Option<usize>)> {
        leaderboard
            .entries
            .iter()
            .map(|e| (e.candidate_id.as_str(), e.rank))
            .collect()
    }

    #[test]
    fn test_correctness_gates_speed() {
        let results = [result("B", false, Some(300.0), 0.0), result("A", true, Some(500.0), 0.0)];
        let leaderboard = rank(&results);
        assert_eq!(order(&leaderboard), vec![("A", Some(1)), ("B", None)]);
        assert_eq!(leaderboard.winner().unwrap().candidate_id, "A");
    }

    #[test]
    fn test_median_then_stddev_then_id() {
        let results = [
            result("slow", true, Some(900.0), 1.0),
            result("jittery", true, Some(100.0), 30.0),
            result("steady", true, Some(100.0), 2.0),
            result("twin-b", true, Some(400.0), 5.0),
            result("twin-a", true, Some(400.0), 5.0),
        ];
        let leaderboard = rank(&results);
        assert_eq!(
            order(&leaderboard),
            vec![
                ("steady", Some(1)),
                ("jittery", Some(2)),
                ("twin-a", Some(3)),
                ("twin-b", Some(4)),
                ("slow", Some(5)),
            ]
        );
    }

    #[test]
    fn test_passed_without_timing_is_unranked() {
        let results = [
            result("no-runs", true, None, 0.0),
            result("failed", false, None, 0.0),
            result("ok", true, Some(1.0), 0.0),
        ];
        let leaderboard = rank(&results);
        assert_eq!(
            order(&leaderboard),
            vec![("ok", Some(1)), ("no-runs", None), ("failed", None)]
        );
        assert_eq!(leaderboard.eligible().count(), 1);
    }

    #[test]
    fn test_no_winner_when_nothing_passes() {
        let leaderboard = rank(&[result("x", false, Some(1.0), 0.0)]);
        assert!(leaderboard.winner().is_none());
        assert_eq!(leaderboard.len(), 1);
    }

    #[test]
    fn test_entry_json_fields() {
        let leaderboard = rank(&[result("A", true, Some(12.5), 0.5)]);
        let json = serde_json::to_value(&leaderboard).unwrap();
        assert_eq!(json[0]["rank"], 1);
        assert_eq!(json[0]["candidateId"], "A");
        assert_eq!(json[0]["medianMs"], 12.5);
        assert_eq!(json[0]["stddevMs"], 0.5);
        assert_eq!(json[0]["peakMemoryBytes"], 0);
    }
}
