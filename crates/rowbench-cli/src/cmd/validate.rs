//! `rowbench validate` -- Check a candidate output against a reference.

use clap::Args;
use std::path::PathBuf;

use rowbench_validator::{Validator, DEFAULT_EPSILON};

use super::{load_reference, CmdResult};

#[derive(Args)]
pub struct ValidateArgs {
    /// Output produced by the candidate
    #[arg(long)]
    candidate_output: PathBuf,
    /// Reference output file
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    reference: Option<PathBuf>,
    /// Dataset to aggregate instead of reading a reference file
    #[arg(long)]
    input: Option<PathBuf>,
    /// Tolerance for min/mean/max comparisons
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,
    /// Output the report as JSON
    #[arg(long)]
    json: bool,
}

/// Returns whether the candidate passed.
pub fn run(args: ValidateArgs) -> CmdResult<bool> {
    if !args.epsilon.is_finite() || args.epsilon < 0.0 {
        return Err(format!("epsilon must be a non-negative number (got {})", args.epsilon).into());
    }
    let reference = load_reference(args.reference.as_deref(), args.input.as_deref())?;
    let report = Validator::new()
        .with_epsilon(args.epsilon)
        .validate_file(&args.candidate_output, &reference)
        .map_err(|e| format!("cannot read {}: {e}", args.candidate_output.display()))?;

    if args.json {
        crate::output::print_json(&report);
    } else {
        print!("{}", report);
    }
    Ok(report.passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowbench_test::{write_file, SCENARIO_INPUT, SCENARIO_REFERENCE};

    fn args(dir: &std::path::Path, output: &str) -> ValidateArgs {
        ValidateArgs {
            candidate_output: write_file(dir, "candidate.txt", output),
            reference: Some(write_file(dir, "reference.txt", SCENARIO_REFERENCE)),
            input: None,
            epsilon: DEFAULT_EPSILON,
            json: false,
        }
    }

    #[test]
    fn test_reference_passes() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(args(dir.path(), SCENARIO_REFERENCE)).unwrap());
    }

    #[test]
    fn test_misordered_output_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!run(args(dir.path(), "B=2.0/2.0/2.0\nA=1.0/2.0/3.0")).unwrap());
    }

    #[test]
    fn test_reference_from_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path(), SCENARIO_REFERENCE);
        args.reference = None;
        args.input = Some(write_file(dir.path(), "m.txt", SCENARIO_INPUT));
        args.json = true;
        assert!(run(args).unwrap());
    }

    #[test]
    fn test_missing_candidate_output_is_tooling_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path(), SCENARIO_REFERENCE);
        args.candidate_output = dir.path().join("absent.txt");
        assert!(run(args).is_err());
    }

    #[test]
    fn test_negative_epsilon_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path(), SCENARIO_REFERENCE);
        args.epsilon = -1.0;
        assert!(run(args).is_err());
    }
}
