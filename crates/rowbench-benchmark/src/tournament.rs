//! Concurrent benchmarking of many candidates.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rowbench_core::{
    IssueKind, ReferenceResult, Result, RowbenchError, SubmissionResult, ValidationReport,
};
use tracing::{info, warn};

use crate::abort::AbortHandle;
use crate::candidate::CandidateSpec;
use crate::config::BenchmarkConfig;
use crate::ranking::{rank, Leaderboard};
use crate::runner::Benchmark;

/// Results of one tournament, in candidate input order.
#[derive(Debug, Clone)]
pub struct TournamentOutcome {
    pub input: PathBuf,
    pub results: Vec<SubmissionResult>,
    pub leaderboard: Leaderboard,
}

/// Runs every candidate against one dataset on a fixed-size worker pool.
///
/// Each worker benchmarks one candidate at a time, so a candidate's runs
/// never overlap each other. The reference is shared read-only by all
/// workers.
#[derive(Debug, Clone)]
pub struct Tournament {
    benchmark: Benchmark,
    candidates: Vec<CandidateSpec>,
}

impl Tournament {
    pub fn new(config: BenchmarkConfig) -> Self {
        Self {
            benchmark: Benchmark::new(config),
            candidates: Vec::new(),
        }
    }

    pub fn with_abort(mut self, abort: AbortHandle) -> Self {
        self.benchmark = self.benchmark.with_abort(abort);
        self
    }

    pub fn with_candidate(mut self, candidate: CandidateSpec) -> Self {
        self.candidates.push(candidate);
        self
    }

    pub fn with_candidates(mut self, candidates: impl IntoIterator<Item = CandidateSpec>) -> Self {
        self.candidates.extend(candidates);
        self
    }

    pub fn candidates(&self) -> &[CandidateSpec] {
        &self.candidates
    }

    /// Benchmarks every candidate and ranks the results.
    ///
    /// A candidate that fails never stops the others. When the harness
    /// itself fails for one candidate, that candidate gets a
    /// `HarnessFailure` result and the rest are still ranked. Only a worker
    /// pool that cannot be built is an error.
    pub fn run(&self, input: &Path, reference: Arc<ReferenceResult>) -> Result<TournamentOutcome> {
        let workers = self.benchmark.config().workers().max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("rowbench-worker-{}", i))
            .build()
            .map_err(|e| RowbenchError::Harness(e.to_string()))?;

        info!(
            event = "tournament_start",
            candidates = self.candidates.len(),
            workers,
            runs = self.benchmark.config().run_count(),
        );
        let start = Instant::now();

        let results: Vec<SubmissionResult> = pool.install(|| {
            self.candidates
                .par_iter()
                .map(|candidate| match self.benchmark.run(candidate, input, &reference) {
                    Ok(result) => result,
                    Err(e) => harness_failure(candidate, e),
                })
                .collect()
        });
        let leaderboard = rank(&results);

        info!(
            event = "tournament_end",
            candidates = results.len(),
            eligible = leaderboard.eligible().count(),
            duration_ms = start.elapsed().as_millis() as u64,
        );
        Ok(TournamentOutcome {
            input: input.to_path_buf(),
            results,
            leaderboard,
        })
    }
}

fn harness_failure(candidate: &CandidateSpec, error: RowbenchError) -> SubmissionResult {
    warn!(event = "candidate_error", candidate = %candidate.id, error = %error);
    SubmissionResult {
        candidate_id: candidate.id.clone(),
        language: candidate.language.clone(),
        validation: ValidationReport::execution_failure(
            IssueKind::HarnessFailure,
            error.to_string(),
        ),
        runs: Vec::new(),
        summary: None,
    }
}
