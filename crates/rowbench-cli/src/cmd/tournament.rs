//! `rowbench tournament` -- Benchmark every configured candidate and rank them.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use rowbench_benchmark::{BenchmarkConfig, CandidateSpec, Tournament, TournamentReport};
use rowbench_config::TournamentConfig;

use super::{abort_on_ctrl_c, load_reference, CmdResult};

#[derive(Args)]
pub struct TournamentArgs {
    /// Tournament config (.toml, .yaml or .yml)
    #[arg(long)]
    config: PathBuf,
    /// Path of the tournament report JSON
    #[arg(long)]
    out: PathBuf,
}

pub fn run(args: TournamentArgs) -> CmdResult {
    let config = TournamentConfig::load(&args.config)?;
    let candidates = config
        .candidates
        .iter()
        .map(CandidateSpec::from_config)
        .collect::<Result<Vec<_>, _>>()?;
    let reference = load_reference(
        config.dataset.reference.as_deref(),
        Some(&config.dataset.input),
    )?;

    let benchmark_config = BenchmarkConfig::from_tournament(&config);
    let outcome = Tournament::new(benchmark_config.clone())
        .with_abort(abort_on_ctrl_c()?)
        .with_candidates(candidates)
        .run(&config.dataset.input, Arc::new(reference))?;

    let report = TournamentReport::new(&outcome, &benchmark_config);
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    report.to_file(&args.out)?;

    println!("Leaderboard ({} candidates)", report.leaderboard.len());
    for entry in &report.leaderboard.entries {
        let rank = entry
            .rank
            .map(|r| format!("#{r}"))
            .unwrap_or_else(|| "--".to_string());
        crate::output::print_kv(
            &format!("{rank} {}", entry.candidate_id),
            &format!(
                "{} │ {}",
                crate::output::ms(entry.median_ms),
                if entry.passed { "passed" } else { "failed" }
            ),
        );
    }
    if let (Some(fastest), Some(speedup)) = (&report.fastest, report.speedup) {
        println!("{fastest} is {speedup:.2}x faster than the slowest ranked candidate");
    }
    println!("Report written: {}", args.out.display());
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use rowbench_test::scripts::printing_candidate;
    use rowbench_test::{write_file, SCENARIO_INPUT, SCENARIO_REFERENCE};

    #[test]
    fn test_tournament_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "measurements.txt", SCENARIO_INPUT);
        let good = printing_candidate(dir.path(), "good.sh", SCENARIO_REFERENCE);
        let bad = printing_candidate(dir.path(), "bad.sh", "A=1.0/2.0/3.0");
        let config = write_file(
            dir.path(),
            "tournament.toml",
            &format!(
                r#"
runs = 2
workers = 2

[limits]
timeout_ms = 20000

[dataset]
input = "measurements.txt"

[[candidates]]
id = "bad"
language = "sh"
command = ["/bin/sh", "{bad}"]

[[candidates]]
id = "good"
language = "sh"
command = ["/bin/sh", "{good}"]
"#,
                bad = bad.display(),
                good = good.display(),
            ),
        );
        let out = dir.path().join("report.json");
        run(TournamentArgs {
            config,
            out: out.clone(),
        })
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["leaderboard"][0]["candidateId"], "good");
        assert_eq!(json["leaderboard"][0]["rank"], 1);
        assert!(json["leaderboard"][1]["rank"].is_null());
        assert_eq!(json["runs"], 2);
        assert_eq!(json["results"][0]["runs"].as_array().unwrap().len(), 2);
    }
}
