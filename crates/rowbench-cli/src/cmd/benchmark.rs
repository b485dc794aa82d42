//! `rowbench benchmark` -- Benchmark one candidate program.
//!
//! Exits 0 whenever the harness worked, even if the candidate failed: the
//! written JSON says whether it passed.

use clap::Args;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use rowbench_benchmark::{Benchmark, BenchmarkConfig, CandidateSpec};
use rowbench_config::{DEFAULT_MEMORY_BYTES, DEFAULT_TIMEOUT_MS};
use rowbench_validator::DEFAULT_EPSILON;

use super::{abort_on_ctrl_c, load_reference, CmdResult};

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Command line of the candidate; `{input}` is replaced by the dataset path
    #[arg(long)]
    candidate: String,
    /// Dataset fed to the candidate on stdin
    #[arg(long)]
    input: PathBuf,
    /// Number of timed runs
    #[arg(long, default_value_t = 1)]
    runs: usize,
    /// Wall-clock limit per run
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,
    /// Resident memory limit per run
    #[arg(long, default_value_t = DEFAULT_MEMORY_BYTES)]
    memory_limit_bytes: u64,
    /// Path of the SubmissionResult JSON
    #[arg(long)]
    out: PathBuf,
    /// Candidate id recorded in the result
    #[arg(long, default_value = "candidate")]
    id: String,
    /// Candidate language recorded in the result
    #[arg(long, default_value = "unknown")]
    language: String,
    /// Build command run once before the timed runs
    #[arg(long)]
    build: Option<String>,
    /// Working directory of the candidate
    #[arg(long)]
    workdir: Option<PathBuf>,
    /// Precomputed reference output; the input is aggregated otherwise
    #[arg(long)]
    reference: Option<PathBuf>,
    /// Tolerance for min/mean/max comparisons
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,
    /// Keep per-run output files under this directory
    #[arg(long)]
    keep_outputs: Option<PathBuf>,
}

pub fn run(args: BenchmarkArgs) -> CmdResult {
    let config = config(&args)?;
    let mut candidate = CandidateSpec::from_command_line(&args.id, &args.language, &args.candidate)?;
    if let Some(workdir) = &args.workdir {
        candidate = candidate.with_workdir(workdir);
    }
    if let Some(build) = &args.build {
        candidate = candidate.with_build(build.split_whitespace().map(str::to_string).collect());
    }

    let reference = load_reference(args.reference.as_deref(), Some(&args.input))?;
    let abort = abort_on_ctrl_c()?;
    let result = Benchmark::new(config)
        .with_abort(abort)
        .run(&candidate, &args.input, &reference)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.out, result.to_json()? + "\n")?;

    println!("Benchmarked {} ({})", result.candidate_id, result.language);
    crate::output::print_kv(
        "Validation:",
        if result.validation.passed { "passed" } else { "failed" },
    );
    crate::output::print_kv("Runs:", &result.runs.len().to_string());
    crate::output::print_kv("Median:", &crate::output::ms(result.median_ms()));
    crate::output::print_kv("Result:", &args.out.display().to_string());
    if !result.validation.passed {
        print!("{}", result.validation);
    }
    Ok(())
}

fn config(args: &BenchmarkArgs) -> CmdResult<BenchmarkConfig> {
    if args.runs == 0 {
        return Err("--runs must be at least 1".into());
    }
    if args.timeout_ms == 0 || args.memory_limit_bytes == 0 {
        return Err("--timeout-ms and --memory-limit-bytes must be positive".into());
    }
    if !args.epsilon.is_finite() || args.epsilon < 0.0 {
        return Err(format!("epsilon must be a non-negative number (got {})", args.epsilon).into());
    }
    let mut config = BenchmarkConfig::new()
        .with_run_count(args.runs)
        .with_timeout(Duration::from_millis(args.timeout_ms))
        .with_memory_limit(args.memory_limit_bytes)
        .with_epsilon(args.epsilon);
    if let Some(dir) = &args.keep_outputs {
        config = config.with_work_dir(dir).with_keep_outputs(true);
    }
    Ok(config)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use rowbench_test::scripts::{failing_candidate, printing_candidate};
    use rowbench_test::{write_file, SCENARIO_INPUT, SCENARIO_REFERENCE};

    fn args(dir: &std::path::Path, script: &std::path::Path) -> BenchmarkArgs {
        BenchmarkArgs {
            candidate: format!("/bin/sh {}", script.display()),
            input: write_file(dir, "m.txt", SCENARIO_INPUT),
            runs: 2,
            timeout_ms: 20_000,
            memory_limit_bytes: DEFAULT_MEMORY_BYTES,
            out: dir.join("results/result.json"),
            id: "sh-ok".to_string(),
            language: "sh".to_string(),
            build: None,
            workdir: None,
            reference: None,
            epsilon: DEFAULT_EPSILON,
            keep_outputs: None,
        }
    }

    fn read_json(path: &std::path::Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_benchmark_writes_submission_result() {
        let dir = tempfile::tempdir().unwrap();
        let script = printing_candidate(dir.path(), "ok.sh", SCENARIO_REFERENCE);
        let args = args(dir.path(), &script);
        let out = args.out.clone();
        run(args).unwrap();

        let json = read_json(&out);
        assert_eq!(json["candidateId"], "sh-ok");
        assert_eq!(json["validation"]["passed"], true);
        assert_eq!(json["runs"].as_array().unwrap().len(), 2);
        assert_eq!(json["summary"]["samples"], 2);
    }

    #[test]
    fn test_failed_candidate_still_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let script = failing_candidate(dir.path(), "fail.sh", 4);
        let args = args(dir.path(), &script);
        let out = args.out.clone();
        run(args).unwrap();

        let json = read_json(&out);
        assert_eq!(json["validation"]["passed"], false);
        assert_eq!(json["validation"]["issues"][0]["kind"], "ProcessCrash");
        assert!(json["summary"].is_null());
    }

    #[test]
    fn test_zero_runs_is_tooling_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = printing_candidate(dir.path(), "ok.sh", SCENARIO_REFERENCE);
        let mut args = args(dir.path(), &script);
        args.runs = 0;
        assert!(run(args).is_err());
    }
}
