//! End-to-end runs of scripted candidates.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use rowbench_benchmark::{rank, AbortHandle, Benchmark, BenchmarkConfig, CandidateSpec};
use rowbench_core::{IssueKind, ReferenceResult};
use rowbench_test::scripts::{failing_candidate, printing_candidate, sleeping_candidate, write_script};
use rowbench_test::{reference_of, write_file, SCENARIO_INPUT, SCENARIO_REFERENCE};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    input: PathBuf,
    reference: ReferenceResult,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "measurements.txt", SCENARIO_INPUT);
        Self {
            dir,
            input,
            reference: reference_of(SCENARIO_INPUT),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn config(&self) -> BenchmarkConfig {
        BenchmarkConfig::new()
            .with_timeout(Duration::from_secs(20))
            .with_sample_interval(Duration::from_millis(10))
            .with_work_dir(self.path().join("work"))
    }
}

fn sh(id: &str, script: &Path) -> CandidateSpec {
    CandidateSpec::new(
        id,
        "sh",
        vec!["/bin/sh".to_string(), script.display().to_string()],
    )
    .unwrap()
}

#[test]
fn test_correct_candidate_passes_every_run() {
    let fx = Fixture::new();
    let script = printing_candidate(fx.path(), "ok.sh", SCENARIO_REFERENCE);
    let benchmark = Benchmark::new(fx.config().with_run_count(3));

    let result = benchmark.run(&sh("ok", &script), &fx.input, &fx.reference).unwrap();

    assert!(result.validation.passed, "{}", result.validation);
    assert_eq!(result.runs.len(), 3);
    assert!(result.runs.iter().all(|r| r.exit_code == Some(0)));
    assert!(result.runs.iter().all(|r| r.peak_memory_bytes > 0));
    let summary = result.summary.unwrap();
    assert_eq!(summary.samples, 3);
    assert!(summary.ci_low <= summary.median && summary.median <= summary.ci_high);
    assert!(result.is_eligible());

    // Outputs are removed unless kept.
    let leftovers = std::fs::read_dir(fx.path().join("work")).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[test]
fn test_outputs_kept_on_request() {
    let fx = Fixture::new();
    let script = printing_candidate(fx.path(), "ok.sh", SCENARIO_REFERENCE);
    let benchmark = Benchmark::new(fx.config().with_keep_outputs(true));

    benchmark.run(&sh("kept", &script), &fx.input, &fx.reference).unwrap();

    let dirs: Vec<_> = std::fs::read_dir(fx.path().join("work"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(dirs.len(), 1);
    let output = std::fs::read_to_string(dirs[0].join("run-1.out")).unwrap();
    assert_eq!(output.trim_end(), SCENARIO_REFERENCE);
}

#[test]
fn test_sleeping_candidate_times_out_and_is_unranked() {
    let fx = Fixture::new();
    let script = sleeping_candidate(fx.path(), "sleepy.sh", 30);
    let benchmark = Benchmark::new(fx.config().with_timeout(Duration::from_millis(300)));

    let started = Instant::now();
    let result = benchmark.run(&sh("sleepy", &script), &fx.input, &fx.reference).unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    let run = &result.runs[0];
    assert!(run.timed_out);
    assert_eq!(run.exit_code, None);
    assert!(run.wall_time_ms >= 300.0);
    assert!(!result.validation.passed);
    assert_eq!(result.validation.count(IssueKind::Timeout), 1);
    assert!(result.summary.is_none());

    let leaderboard = rank(&[result]);
    assert!(leaderboard.winner().is_none());
    assert_eq!(leaderboard.entries[0].rank, None);
}

#[test]
fn test_non_zero_exit_is_a_crash() {
    let fx = Fixture::new();
    let script = failing_candidate(fx.path(), "fail.sh", 3);
    let result = Benchmark::new(fx.config())
        .run(&sh("fail", &script), &fx.input, &fx.reference)
        .unwrap();

    assert_eq!(result.runs[0].exit_code, Some(3));
    let issue = &result.validation.issues[0];
    assert_eq!(issue.kind, IssueKind::ProcessCrash);
    assert_eq!(issue.message, "run 1 exited with code 3");
}

#[test]
fn test_missing_program_is_a_crash() {
    let fx = Fixture::new();
    let candidate = CandidateSpec::new(
        "ghost",
        "c",
        vec![fx.path().join("no-such-binary").display().to_string()],
    )
    .unwrap();
    let result = Benchmark::new(fx.config())
        .run(&candidate, &fx.input, &fx.reference)
        .unwrap();

    assert_eq!(result.runs[0].exit_code, None);
    assert_eq!(result.validation.count(IssueKind::ProcessCrash), 1);
    assert!(result.validation.issues[0].message.contains("failed to start"));
}

#[test]
fn test_wrong_output_fails_validation_but_keeps_timings() {
    let fx = Fixture::new();
    let script = printing_candidate(fx.path(), "wrong.sh", "A=1.0/2.5/3.0\nB=2.0/2.0/2.0");
    let result = Benchmark::new(fx.config())
        .run(&sh("wrong", &script), &fx.input, &fx.reference)
        .unwrap();

    assert!(!result.validation.passed);
    assert_eq!(result.validation.count(IssueKind::ValueMismatch), 1);
    assert!(result.summary.is_some());
    assert!(!result.is_eligible());
}

#[test]
fn test_placeholder_workdir_and_env() {
    let fx = Fixture::new();
    let body = format!(
        "cat > /dev/null\ntest -f \"$1\" || exit 7\ntest \"$ROWBENCH_GREETING\" = hello || exit 9\ntest -f marker || exit 11\nprintf '{}\\n'",
        SCENARIO_REFERENCE.replace('\n', "\\n")
    );
    let script = write_script(fx.path(), "args.sh", &body);
    write_file(fx.path(), "marker", "");
    let candidate = CandidateSpec::new(
        "args",
        "sh",
        vec![
            "/bin/sh".to_string(),
            script.display().to_string(),
            "{input}".to_string(),
        ],
    )
    .unwrap()
    .with_workdir(fx.path())
    .with_env("ROWBENCH_GREETING", "hello");

    let result = Benchmark::new(fx.config())
        .run(&candidate, &fx.input, &fx.reference)
        .unwrap();
    assert!(result.validation.passed, "{}", result.validation);
}

#[test]
fn test_build_step_runs_first() {
    let fx = Fixture::new();
    let build = format!(
        "printf '{}\\n' > built.txt",
        SCENARIO_REFERENCE.replace('\n', "\\n")
    );
    let candidate = CandidateSpec::new(
        "built",
        "sh",
        vec![
            "/bin/sh".to_string(),
            "-c".to_string(),
            "cat > /dev/null; cat built.txt".to_string(),
        ],
    )
    .unwrap()
    .with_workdir(fx.path())
    .with_build(vec!["/bin/sh".to_string(), "-c".to_string(), build]);

    let result = Benchmark::new(fx.config())
        .run(&candidate, &fx.input, &fx.reference)
        .unwrap();
    assert!(result.validation.passed, "{}", result.validation);
}

#[test]
fn test_build_failure_skips_runs() {
    let fx = Fixture::new();
    let script = printing_candidate(fx.path(), "ok.sh", SCENARIO_REFERENCE);
    let candidate = sh("broken", &script).with_build(vec![
        "/bin/sh".to_string(),
        "-c".to_string(),
        "echo 'solution.cpp:1: error: expected ;' >&2; exit 2".to_string(),
    ]);

    let result = Benchmark::new(fx.config().with_run_count(3))
        .run(&candidate, &fx.input, &fx.reference)
        .unwrap();

    assert!(result.runs.is_empty());
    assert!(result.summary.is_none());
    let issue = &result.validation.issues[0];
    assert_eq!(issue.kind, IssueKind::BuildFailure);
    assert!(issue.message.starts_with("build exited with code 2"));
    assert!(issue.message.contains("expected ;"));
}

#[test]
fn test_abort_before_start_records_cancellation() {
    let fx = Fixture::new();
    let script = printing_candidate(fx.path(), "ok.sh", SCENARIO_REFERENCE);
    let abort = AbortHandle::new();
    abort.abort();

    let result = Benchmark::new(fx.config())
        .with_abort(abort)
        .run(&sh("never", &script), &fx.input, &fx.reference)
        .unwrap();

    assert!(result.runs.is_empty());
    assert_eq!(result.validation.count(IssueKind::Cancelled), 1);
}

#[test]
fn test_abort_kills_in_flight_run() {
    let fx = Fixture::new();
    let script = sleeping_candidate(fx.path(), "sleepy.sh", 30);
    let abort = AbortHandle::new();
    let trigger = abort.clone();
    let benchmark = Benchmark::new(fx.config().with_run_count(5)).with_abort(abort);

    let started = Instant::now();
    let killer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        trigger.abort();
    });
    let result = benchmark.run(&sh("sleepy", &script), &fx.input, &fx.reference).unwrap();
    killer.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(result.runs.len(), 1);
    let run = &result.runs[0];
    assert!(run.cancelled);
    assert!(!run.timed_out);
    assert_eq!(run.exit_code, None);
    assert_eq!(result.validation.count(IssueKind::Cancelled), 1);
}

#[cfg(target_os = "linux")]
#[test]
fn test_memory_breach_is_killed() {
    let fx = Fixture::new();
    let script = sleeping_candidate(fx.path(), "sleepy.sh", 30);
    let result = Benchmark::new(fx.config().with_memory_limit(1))
        .run(&sh("hungry", &script), &fx.input, &fx.reference)
        .unwrap();

    let run = &result.runs[0];
    assert!(run.out_of_memory);
    assert!(run.peak_memory_bytes > 1);
    assert_eq!(result.validation.count(IssueKind::OutOfMemory), 1);
}

#[cfg(target_os = "linux")]
#[test]
fn test_orphaned_grandchild_is_killed() {
    let fx = Fixture::new();
    let pid_file = fx.path().join("grandchild.pid");
    let body = format!(
        "cat > /dev/null\nsleep 60 > /dev/null 2>&1 &\necho $! > '{}'\nprintf '{}\\n'",
        pid_file.display(),
        SCENARIO_REFERENCE.replace('\n', "\\n")
    );
    let script = write_script(fx.path(), "forks.sh", &body);

    let result = Benchmark::new(fx.config())
        .run(&sh("forks", &script), &fx.input, &fx.reference)
        .unwrap();
    assert!(result.validation.passed, "{}", result.validation);

    let pid: u32 = std::fs::read_to_string(&pid_file).unwrap().trim().parse().unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        // Gone, or a zombie waiting to be reaped.
        let alive = match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            Ok(stat) => !stat.contains(") Z "),
            Err(_) => false,
        };
        if !alive {
            break;
        }
        assert!(Instant::now() < deadline, "grandchild {} survived its run", pid);
        thread::sleep(Duration::from_millis(20));
    }
}
