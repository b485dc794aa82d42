//! Colorful console output for rowbench.
//!
//! Provides a custom `tracing` layer that renders dataset, validation and
//! benchmark events as colored one-line summaries on stderr, leaving stdout
//! to command output.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (generation, aggregation, builds, runs, tournaments)
//! - **DEBUG**: Per-run detail (run start)
//! - **WARN**: Candidate failures (crash, timeout, memory breach, cancellation)
//!
//! The default filter is `rowbench=info`; `RUST_LOG` overrides it.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default filter directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "rowbench=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init() {
    INIT.get_or_init(|| {
        EPOCH.get_or_init(Instant::now);
        print_banner();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(RowbenchConsoleLayer)
            .try_init();
    });
}

fn elapsed_secs() -> f64 {
    EPOCH
        .get()
        .map(|epoch| epoch.elapsed().as_secs_f64())
        .unwrap_or(0.0)
}

fn print_banner() {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(
        stderr,
        "{} {}",
        "rowbench".bright_cyan().bold(),
        format!("v{} - billion row tournament engine", VERSION).bright_white()
    );
    let _ = stderr.flush();
}

/// A tracing layer that formats rowbench events with colors.
pub struct RowbenchConsoleLayer;

impl<S: Subscriber> Layer<S> for RowbenchConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("rowbench") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{} {}", format_elapsed(), output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    candidate: Option<String>,
    outcome: Option<String>,
    program: Option<String>,
    error: Option<String>,
    message: Option<String>,
    seed: Option<u64>,
    rows: Option<u64>,
    keys: Option<u64>,
    bytes: Option<u64>,
    lines: Option<u64>,
    issues: Option<u64>,
    run: Option<u64>,
    runs: Option<u64>,
    workers: Option<u64>,
    candidates: Option<u64>,
    eligible: Option<u64>,
    peak_bytes: Option<u64>,
    elapsed_ms: Option<u64>,
    duration_ms: Option<u64>,
    wall_ms: Option<f64>,
    median_ms: Option<f64>,
    passed: Option<bool>,
    success: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        self.record_text(field, s);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "seed" => self.seed = Some(value),
            "rows" => self.rows = Some(value),
            "keys" => self.keys = Some(value),
            "bytes" => self.bytes = Some(value),
            "lines" => self.lines = Some(value),
            "issues" => self.issues = Some(value),
            "run" => self.run = Some(value),
            "runs" => self.runs = Some(value),
            "workers" => self.workers = Some(value),
            "candidates" => self.candidates = Some(value),
            "eligible" => self.eligible = Some(value),
            "peak_bytes" => self.peak_bytes = Some(value),
            "elapsed_ms" => self.elapsed_ms = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "wall_ms" => self.wall_ms = Some(value as f64),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "wall_ms" => self.wall_ms = Some(value),
            "median_ms" => self.median_ms = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "passed" => self.passed = Some(value),
            "success" => self.success = Some(value),
            _ => {}
        }
    }
}

impl EventVisitor {
    fn record_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "event" => self.event = Some(value),
            "candidate" => self.candidate = Some(value),
            "outcome" => self.outcome = Some(value),
            "program" => self.program = Some(value),
            "error" => self.error = Some(value),
            "message" => self.message = Some(value),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "generate_start" => format_generate_start(v),
        "generate_end" => format_generate_end(v),
        "aggregate_end" => format_aggregate_end(v),
        "validate_end" => format_validate_end(v),
        "build_end" => format_build_end(v),
        "build_failed" | "spawn_failed" => format_failure(v),
        "run_start" => format_run_start(v),
        "run_end" => format_run_end(v, level),
        "candidate_end" => format_candidate_end(v),
        "tournament_start" => format_tournament_start(v),
        "tournament_end" => format_tournament_end(v),
        _ if level <= Level::WARN => v
            .message
            .as_deref()
            .map(|m| format!("{} {}", "!".bright_red().bold(), m))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn candidate(v: &EventVisitor) -> String {
    v.candidate
        .as_deref()
        .unwrap_or("?")
        .white()
        .bold()
        .to_string()
}

fn format_generate_start(v: &EventVisitor) -> String {
    format!(
        "{} Generating │ {} rows │ {} keys │ seed {}",
        "▶".bright_green().bold(),
        count(v.rows).bright_yellow(),
        count(v.keys).bright_yellow(),
        v.seed.unwrap_or(0).bright_magenta()
    )
}

fn format_generate_end(v: &EventVisitor) -> String {
    format!(
        "{} Generated │ {} rows │ {} │ {}",
        "■".bright_cyan().bold(),
        count(v.rows).bright_yellow(),
        format_bytes(v.bytes.unwrap_or(0)).bright_yellow(),
        format_duration_ms(v.elapsed_ms.unwrap_or(0)).yellow()
    )
}

fn format_aggregate_end(v: &EventVisitor) -> String {
    format!(
        "{} Aggregated │ {} rows │ {} keys │ {}",
        "■".bright_cyan().bold(),
        count(v.rows).bright_yellow(),
        count(v.keys).bright_yellow(),
        format_duration_ms(v.elapsed_ms.unwrap_or(0)).yellow()
    )
}

fn format_validate_end(v: &EventVisitor) -> String {
    let status = if v.passed.unwrap_or(false) {
        "PASSED".bright_green().bold().to_string()
    } else {
        format!("FAILED ({} issues)", count(v.issues))
            .bright_red()
            .bold()
            .to_string()
    };
    format!(
        "{} Validated │ {} lines │ {}",
        "✓".bright_blue(),
        count(v.lines).white(),
        status
    )
}

fn format_build_end(v: &EventVisitor) -> String {
    let icon = if v.success.unwrap_or(false) {
        "✓".bright_green().to_string()
    } else {
        "✗".bright_red().to_string()
    };
    format!(
        "{} Built {} │ {}",
        icon,
        candidate(v),
        format_duration_ms(v.wall_ms.unwrap_or(0.0) as u64).yellow()
    )
}

fn format_failure(v: &EventVisitor) -> String {
    let subject = v
        .candidate
        .as_deref()
        .or(v.program.as_deref())
        .unwrap_or("?");
    let cause = v
        .outcome
        .as_deref()
        .or(v.error.as_deref())
        .unwrap_or("failed");
    format!(
        "{} {} │ {}",
        "✗".bright_red().bold(),
        subject.white().bold(),
        cause.bright_red()
    )
}

fn format_run_start(v: &EventVisitor) -> String {
    format!("{} {} run {}", "▶".bright_blue(), candidate(v), count(v.run))
}

fn format_run_end(v: &EventVisitor, level: Level) -> String {
    let icon = if level <= Level::WARN {
        "✗".bright_red().to_string()
    } else {
        "✓".bright_green().to_string()
    };
    let mut output = format!(
        "{} {} run {} │ {} │ {}",
        icon,
        candidate(v),
        count(v.run),
        format!("{:.1}ms", v.wall_ms.unwrap_or(0.0)).bright_magenta().bold(),
        format_bytes(v.peak_bytes.unwrap_or(0)).white()
    );
    if let Some(outcome) = &v.outcome {
        output.push_str(&format!(" │ {}", outcome.bright_red()));
    }
    output
}

fn format_candidate_end(v: &EventVisitor) -> String {
    let status = if v.passed.unwrap_or(false) {
        "PASSED".bright_green().bold().to_string()
    } else {
        "FAILED".bright_red().bold().to_string()
    };
    let median = match v.median_ms {
        Some(ms) if ms.is_finite() => format!("median {:.1}ms", ms),
        _ => "no timing".to_string(),
    };
    format!(
        "{} {} │ {} runs │ {} │ {}",
        "◀".bright_cyan(),
        candidate(v),
        count(v.runs),
        median.bright_magenta(),
        status
    )
}

fn format_tournament_start(v: &EventVisitor) -> String {
    format!(
        "{} Tournament │ {} candidates │ {} workers │ {} runs each",
        "▶".bright_green().bold(),
        count(v.candidates).bright_yellow(),
        count(v.workers).bright_yellow(),
        count(v.runs).bright_yellow()
    )
}

fn format_tournament_end(v: &EventVisitor) -> String {
    format!(
        "{} Tournament complete │ {} of {} ranked │ {}",
        "■".bright_cyan().bold(),
        count(v.eligible).bright_green(),
        count(v.candidates).white(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow()
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(8 * 1024 * 1024 * 1024), "8.0 GiB");
    }

    #[test]
    fn test_generate_end_uses_thousands_separators() {
        let visitor = EventVisitor {
            event: Some("generate_end".to_string()),
            rows: Some(1_000_000),
            bytes: Some(14 * 1024 * 1024),
            elapsed_ms: Some(830),
            ..EventVisitor::default()
        };
        let line = format_event(&visitor, Level::INFO);
        assert!(line.contains("1,000,000"));
        assert!(line.contains("14.0 MiB"));
        assert!(line.contains("830ms"));
    }

    #[test]
    fn test_candidate_end_without_timing() {
        let visitor = EventVisitor {
            event: Some("candidate_end".to_string()),
            candidate: Some("py".to_string()),
            runs: Some(1),
            median_ms: Some(f64::NAN),
            passed: Some(false),
            ..EventVisitor::default()
        };
        let line = format_event(&visitor, Level::INFO);
        assert!(line.contains("no timing"));
        assert!(line.contains("FAILED"));
    }

    #[test]
    fn test_unknown_events_are_silent() {
        let visitor = EventVisitor {
            event: Some("cleanup_failed".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&visitor, Level::DEBUG).is_empty());
    }
}
