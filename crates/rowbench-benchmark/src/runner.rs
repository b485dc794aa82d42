//! Benchmark runner.

use std::fs;
use std::path::{Path, PathBuf};

use rowbench_core::{
    IssueKind, ReferenceResult, Result, RowbenchError, RunMeasurement, RunOutcome,
    SubmissionResult, ValidationReport,
};
use rowbench_validator::Validator;
use tracing::{debug, info, warn};

use crate::abort::AbortHandle;
use crate::candidate::{resolve_program, substitute, CandidateSpec};
use crate::config::BenchmarkConfig;
use crate::process::{run_process, ProcessLimits, ProcessRequest};
use crate::statistics::summarize;

/// Bytes of stderr quoted in failure messages.
const STDERR_TAIL_BYTES: u64 = 500;

/// Benchmarks one candidate at a time.
///
/// Every run is a fresh process with its own limits. Runs of one candidate
/// are strictly sequential; only the output of the final run is validated,
/// but every run is timed.
///
/// A failing candidate is never an error here: crashes, timeouts, memory
/// breaches and build failures end up inside the returned
/// [`SubmissionResult`]. Errors mean the harness itself could not work,
/// e.g. the work directory is not writable.
#[derive(Debug, Clone, Default)]
pub struct Benchmark {
    config: BenchmarkConfig,
    abort: AbortHandle,
}

impl Benchmark {
    /// Creates a benchmark with its own abort flag.
    pub fn new(config: BenchmarkConfig) -> Self {
        Self {
            config,
            abort: AbortHandle::new(),
        }
    }

    /// Shares an abort flag, typically wired to Ctrl-C.
    pub fn with_abort(mut self, abort: AbortHandle) -> Self {
        self.abort = abort;
        self
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn abort_handle(&self) -> &AbortHandle {
        &self.abort
    }

    /// Builds (if configured), runs and validates one candidate.
    pub fn run(
        &self,
        candidate: &CandidateSpec,
        input: &Path,
        reference: &ReferenceResult,
    ) -> Result<SubmissionResult> {
        if self.config.run_count() == 0 {
            return Err(RowbenchError::InvalidConfig(
                "run count must be at least 1".to_string(),
            ));
        }
        let input = std::path::absolute(input)?;
        let dir = self.config.candidate_dir(&candidate.id)?;

        let result = self.run_in(candidate, &input, reference, dir.path());
        if self.config.keep_outputs() {
            let kept = dir.keep();
            debug!(event = "outputs_kept", candidate = %candidate.id, dir = %kept.display());
        } else {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                debug!(event = "cleanup_failed", dir = %path.display(), error = %e);
            }
        }
        let result = result?;

        info!(
            event = "candidate_end",
            candidate = %result.candidate_id,
            passed = result.validation.passed,
            runs = result.runs.len(),
            median_ms = result.median_ms().unwrap_or(f64::NAN),
        );
        Ok(result)
    }

    fn run_in(
        &self,
        candidate: &CandidateSpec,
        input: &Path,
        reference: &ReferenceResult,
        dir: &Path,
    ) -> Result<SubmissionResult> {
        let finish = |validation: ValidationReport, runs: Vec<RunMeasurement>| SubmissionResult {
            candidate_id: candidate.id.clone(),
            language: candidate.language.clone(),
            summary: summarize(&runs),
            validation,
            runs,
        };

        if let Some(build) = &candidate.build {
            if let Some(failure) = self.build(candidate, build, input, dir)? {
                return Ok(finish(failure, Vec::new()));
            }
        }

        let limits = ProcessLimits {
            timeout: self.config.timeout(),
            memory_bytes: self.config.memory_limit(),
            sample_interval: self.config.sample_interval(),
        };
        let program = spawnable(candidate.resolved_program())?;
        let args = candidate.resolved_args(input);

        let mut runs = Vec::with_capacity(self.config.run_count());
        let mut last_output = None;
        for index in 1..=self.config.run_count() {
            if self.abort.is_aborted() {
                break;
            }
            let stdout = dir.join(format!("run-{}.out", index));
            let stderr = dir.join(format!("run-{}.err", index));
            debug!(event = "run_start", candidate = %candidate.id, run = index);

            let request = ProcessRequest {
                program: program.clone(),
                args: args.clone(),
                workdir: candidate.workdir.as_deref(),
                env: &candidate.env,
                stdin: Some(input),
                stdout: &stdout,
                stderr: &stderr,
            };
            let run = run_process(&request, &limits, &self.abort)?.to_measurement();
            log_run(&candidate.id, index, &run);
            runs.push(run);
            last_output = Some((stdout, stderr));
        }

        let validation = match (runs.last(), last_output) {
            (Some(run), Some((stdout, stderr))) => match run.outcome().issue_kind() {
                Some(kind) => ValidationReport::execution_failure(
                    kind,
                    format!(
                        "run {} {}",
                        runs.len(),
                        describe_failure(run, &limits, &stderr)
                    ),
                ),
                None => Validator::new()
                    .with_epsilon(self.config.epsilon())
                    .validate_file(&stdout, reference)?,
            },
            _ => ValidationReport::execution_failure(
                IssueKind::Cancelled,
                "cancelled before the first run",
            ),
        };
        Ok(finish(validation, runs))
    }

    /// Runs the build command. Returns a failed report if the build failed.
    fn build(
        &self,
        candidate: &CandidateSpec,
        argv: &[String],
        input: &Path,
        dir: &Path,
    ) -> Result<Option<ValidationReport>> {
        let Some((program, args)) = argv.split_first() else {
            return Err(RowbenchError::InvalidConfig(format!(
                "candidate '{}' has an empty build command",
                candidate.id
            )));
        };
        if self.abort.is_aborted() {
            return Ok(Some(ValidationReport::execution_failure(
                IssueKind::Cancelled,
                "cancelled before the build",
            )));
        }

        let stdout = dir.join("build.out");
        let stderr = dir.join("build.err");
        let limits = ProcessLimits {
            timeout: self.config.build_timeout(),
            memory_bytes: u64::MAX,
            sample_interval: self.config.sample_interval(),
        };
        let request = ProcessRequest {
            program: spawnable(resolve_program(program, candidate.workdir.as_deref()))?,
            args: substitute(args, input),
            workdir: candidate.workdir.as_deref(),
            env: &candidate.env,
            stdin: None,
            stdout: &stdout,
            stderr: &stderr,
        };
        let outcome = run_process(&request, &limits, &self.abort)?;
        info!(
            event = "build_end",
            candidate = %candidate.id,
            success = outcome.succeeded(),
            wall_ms = outcome.wall_time.as_millis() as u64,
        );
        if outcome.succeeded() {
            return Ok(None);
        }

        let run = outcome.to_measurement();
        let kind = if run.cancelled {
            IssueKind::Cancelled
        } else {
            IssueKind::BuildFailure
        };
        warn!(event = "build_failed", candidate = %candidate.id, outcome = %run.outcome());
        Ok(Some(ValidationReport::execution_failure(
            kind,
            format!("build {}", describe_failure(&run, &limits, &stderr)),
        )))
    }
}

fn log_run(candidate: &str, index: usize, run: &RunMeasurement) {
    let outcome = run.outcome();
    if outcome == RunOutcome::Success {
        info!(
            event = "run_end",
            candidate,
            run = index,
            wall_ms = run.wall_time_ms,
            peak_bytes = run.peak_memory_bytes,
        );
    } else {
        warn!(
            event = "run_end",
            candidate,
            run = index,
            outcome = %outcome,
            wall_ms = run.wall_time_ms,
            peak_bytes = run.peak_memory_bytes,
        );
    }
}

/// Human-readable cause of a failed process, without subject.
fn describe_failure(run: &RunMeasurement, limits: &ProcessLimits, stderr: &Path) -> String {
    match run.outcome() {
        RunOutcome::Success => "succeeded".to_string(),
        RunOutcome::Cancelled => "cancelled by operator".to_string(),
        RunOutcome::Timeout => format!("timed out after {} ms", limits.timeout.as_millis()),
        RunOutcome::OutOfMemory => {
            format!("exceeded memory limit of {} bytes", limits.memory_bytes)
        }
        RunOutcome::Crash => {
            let cause = match (run.exit_code, run.signal) {
                (Some(code), _) => format!("exited with code {}", code),
                (None, Some(signal)) => format!("killed by signal {}", signal),
                (None, None) => "failed to start".to_string(),
            };
            match stderr_tail(stderr) {
                Some(tail) => format!("{}: {}", cause, tail),
                None => cause,
            }
        }
    }
}

fn stderr_tail(path: &Path) -> Option<String> {
    let bytes = fs::read(path).ok()?;
    let start = bytes.len().saturating_sub(STDERR_TAIL_BYTES as usize);
    let tail = String::from_utf8_lossy(&bytes[start..]).trim().to_string();
    (!tail.is_empty()).then_some(tail)
}

/// Makes relative paths with a directory component absolute, so they do not
/// depend on how the child's working directory is applied.
fn spawnable(program: PathBuf) -> Result<PathBuf> {
    if program.is_relative() && program.components().count() > 1 {
        Ok(std::path::absolute(&program)?)
    } else {
        Ok(program)
    }
}
