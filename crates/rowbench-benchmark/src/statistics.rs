//! Timing statistics over successful runs.

use rowbench_core::{RunMeasurement, RunSummary};

/// z-score of a two-sided 95% confidence interval.
pub const Z_95: f64 = 1.96;

/// Summarizes the wall times of the successful runs.
///
/// Returns `None` when no run succeeded. The interval is
/// `median ± 1.96 * stddev / sqrt(n)` and collapses onto the median for a
/// single sample.
///
/// # Example
///
/// ```
/// use rowbench_benchmark::summarize;
/// use rowbench_core::RunMeasurement;
///
/// let run = |ms: f64| RunMeasurement {
///     wall_time_ms: ms,
///     peak_memory_bytes: 0,
///     exit_code: Some(0),
///     signal: None,
///     timed_out: false,
///     out_of_memory: false,
///     cancelled: false,
/// };
/// let summary = summarize(&[run(100.0), run(300.0), run(200.0)]).unwrap();
/// assert_eq!(summary.median, 200.0);
/// assert_eq!(summary.mean, 200.0);
/// assert!(summary.ci_low < 200.0 && summary.ci_high > 200.0);
/// ```
pub fn summarize(runs: &[RunMeasurement]) -> Option<RunSummary> {
    let mut times: Vec<f64> = runs
        .iter()
        .filter(|run| run.is_success())
        .map(|run| run.wall_time_ms)
        .collect();
    if times.is_empty() {
        return None;
    }
    times.sort_by(f64::total_cmp);

    let n = times.len();
    let median = median_of_sorted(&times);
    let mean = times.iter().sum::<f64>() / n as f64;
    let variance = times.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n as f64;
    let stddev = variance.sqrt();
    let half_width = if n > 1 {
        Z_95 * stddev / (n as f64).sqrt()
    } else {
        0.0
    };

    Some(RunSummary {
        samples: n,
        median,
        mean,
        stddev,
        ci_low: median - half_width,
        ci_high: median + half_width,
    })
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(ms: f64, exit_code: Option<i32>) -> RunMeasurement {
        RunMeasurement {
            wall_time_ms: ms,
            peak_memory_bytes: 0,
            exit_code,
            signal: None,
            timed_out: false,
            out_of_memory: false,
            cancelled: false,
        }
    }

    #[test]
    fn test_no_successes() {
        assert_eq!(summarize(&[]), None);
        assert_eq!(summarize(&[run(10.0, Some(1)), run(5.0, None)]), None);
    }

    #[test]
    fn test_single_sample_collapses_interval() {
        let summary = summarize(&[run(42.0, Some(0))]).unwrap();
        assert_eq!(summary.samples, 1);
        assert_eq!(summary.median, 42.0);
        assert_eq!(summary.stddev, 0.0);
        assert_eq!(summary.ci_low, 42.0);
        assert_eq!(summary.ci_high, 42.0);
    }

    #[test]
    fn test_even_count_median_and_population_stddev() {
        let runs = [
            run(2.0, Some(0)),
            run(4.0, Some(0)),
            run(4.0, Some(0)),
            run(4.0, Some(0)),
            run(5.0, Some(0)),
            run(5.0, Some(0)),
            run(7.0, Some(0)),
            run(9.0, Some(0)),
        ];
        let summary = summarize(&runs).unwrap();
        assert_eq!(summary.median, 4.5);
        assert_eq!(summary.mean, 5.0);
        assert!((summary.stddev - 2.0).abs() < 1e-12);
        let half = 1.96 * 2.0 / 8f64.sqrt();
        assert!((summary.ci_low - (4.5 - half)).abs() < 1e-12);
        assert!((summary.ci_high - (4.5 + half)).abs() < 1e-12);
    }

    #[test]
    fn test_failed_runs_are_excluded() {
        let mut timed_out = run(1.0, None);
        timed_out.timed_out = true;
        let summary = summarize(&[run(100.0, Some(0)), timed_out, run(50.0, Some(3))]).unwrap();
        assert_eq!(summary.samples, 1);
        assert_eq!(summary.median, 100.0);
    }
}
