//! Configuration system for rowbench tournaments.
//!
//! Load the candidate roster, resource limits and run counts from TOML or
//! YAML files instead of long command lines.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use rowbench_config::TournamentConfig;
//! use std::time::Duration;
//!
//! let config = TournamentConfig::from_toml_str(r#"
//!     runs = 3
//!
//!     [limits]
//!     timeout_ms = 60000
//!
//!     [dataset]
//!     input = "data/sample-1m.txt"
//!
//!     [[candidates]]
//!     id = "python-baseline"
//!     language = "python"
//!     workdir = "submissions/python"
//!
//!     [[candidates]]
//!     id = "cpp-mmap"
//!     language = "cpp"
//!     workdir = "submissions/cpp"
//! "#).unwrap();
//!
//! assert_eq!(config.runs, 3);
//! assert_eq!(config.limits.timeout(), Duration::from_secs(60));
//! assert_eq!(config.candidates.len(), 2);
//! assert_eq!(config.candidates[0].resolved_command().unwrap(), vec!["python3", "solution.py"]);
//! ```
//!
//! Defaults apply to everything except the candidate list:
//!
//! ```
//! use rowbench_config::TournamentConfig;
//!
//! let config = TournamentConfig::default();
//! assert_eq!(config.runs, 1);
//! assert_eq!(config.epsilon, 0.05);
//! assert!(config.validate().is_err()); // no candidates yet
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default numeric tolerance when comparing candidate statistics.
pub const DEFAULT_EPSILON: f64 = 0.05;

/// Default per-run wall-clock limit (5 minutes).
pub const DEFAULT_TIMEOUT_MS: u64 = 300_000;

/// Default per-run memory limit (8 GiB).
pub const DEFAULT_MEMORY_BYTES: u64 = 8 * 1024 * 1024 * 1024;

/// Default limit for a candidate's build step (10 minutes).
pub const DEFAULT_BUILD_TIMEOUT_MS: u64 = 600_000;

/// Main tournament configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TournamentConfig {
    /// Timed runs per candidate.
    #[serde(default = "default_runs")]
    pub runs: usize,

    /// Tolerance for min/mean/max comparisons.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Concurrent candidates; defaults to the number of CPU cores.
    #[serde(default)]
    pub workers: Option<usize>,

    /// Directory for per-run candidate output files.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,

    /// Keep candidate output files after validation.
    #[serde(default)]
    pub keep_outputs: bool,

    /// Per-run resource limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Shared input dataset.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Candidate roster.
    #[serde(default)]
    pub candidates: Vec<CandidateConfig>,
}

fn default_runs() -> usize {
    1
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            epsilon: default_epsilon(),
            workers: None,
            work_dir: None,
            keep_outputs: false,
            limits: LimitsConfig::default(),
            dataset: DatasetConfig::default(),
            candidates: Vec::new(),
        }
    }
}

impl TournamentConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing the format by extension.
    ///
    /// `.yaml` and `.yml` files are parsed as YAML, everything else as TOML.
    /// Relative paths inside the file are resolved against the file's
    /// directory, and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, fails to parse, or is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path)?,
            _ => Self::from_toml_file(path)?,
        };
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the number of timed runs per candidate.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Sets the comparison tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Sets the per-run limits.
    pub fn with_limits(mut self, limits: LimitsConfig) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the input dataset.
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.dataset.input = input.into();
        self
    }

    /// Adds a candidate.
    pub fn with_candidate(mut self, candidate: CandidateConfig) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Resolves relative paths against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.dataset.input);
        if let Some(reference) = self.dataset.reference.as_mut() {
            resolve(reference);
        }
        if let Some(work_dir) = self.work_dir.as_mut() {
            resolve(work_dir);
        }
        for candidate in &mut self.candidates {
            if let Some(workdir) = candidate.workdir.as_mut() {
                resolve(workdir);
            }
        }
    }

    /// Checks invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runs == 0 {
            return Err(ConfigError::Invalid("runs must be at least 1".into()));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "epsilon must be a non-negative number, got {}",
                self.epsilon
            )));
        }
        if self.workers == Some(0) {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        self.limits.validate()?;

        if self.candidates.is_empty() {
            return Err(ConfigError::Invalid("no candidates configured".into()));
        }
        let mut seen = HashSet::new();
        for candidate in &self.candidates {
            if candidate.id.trim().is_empty() {
                return Err(ConfigError::Invalid("candidate id must not be empty".into()));
            }
            if !seen.insert(candidate.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate candidate id '{}'",
                    candidate.id
                )));
            }
            candidate.resolved_command()?;
        }
        Ok(())
    }

    /// Returns the worker count, falling back to available parallelism.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// Per-run resource limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LimitsConfig {
    /// Wall-clock limit per run, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Resident memory limit per run, in bytes.
    #[serde(default = "default_memory_bytes")]
    pub memory_bytes: u64,

    /// Wall-clock limit for the build step, in milliseconds.
    #[serde(default = "default_build_timeout_ms")]
    pub build_timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_memory_bytes() -> u64 {
    DEFAULT_MEMORY_BYTES
}

fn default_build_timeout_ms() -> u64 {
    DEFAULT_BUILD_TIMEOUT_MS
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            memory_bytes: DEFAULT_MEMORY_BYTES,
            build_timeout_ms: DEFAULT_BUILD_TIMEOUT_MS,
        }
    }
}

impl LimitsConfig {
    /// Creates limits with the given timeout and memory ceiling.
    pub fn new(timeout_ms: u64, memory_bytes: u64) -> Self {
        Self {
            timeout_ms,
            memory_bytes,
            ..Self::default()
        }
    }

    /// Returns the run timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the build timeout as a Duration.
    pub fn build_timeout(&self) -> Duration {
        Duration::from_millis(self.build_timeout_ms)
    }

    /// Checks that every limit is non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be positive".into()));
        }
        if self.memory_bytes == 0 {
            return Err(ConfigError::Invalid("memory_bytes must be positive".into()));
        }
        if self.build_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "build_timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Dataset locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DatasetConfig {
    /// Measurements file fed to every candidate.
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Precomputed reference output; computed from `input` when absent.
    #[serde(default)]
    pub reference: Option<PathBuf>,
}

fn default_input() -> PathBuf {
    PathBuf::from("data/measurements.txt")
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            reference: None,
        }
    }
}

/// One participant submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CandidateConfig {
    /// Unique identifier on the leaderboard.
    pub id: String,

    /// Implementation language; selects a preset when `command` is absent.
    pub language: String,

    /// Program and arguments. `{input}` is replaced with the dataset path.
    #[serde(default)]
    pub command: Option<Vec<String>>,

    /// Build command run once before timing.
    #[serde(default)]
    pub build: Option<Vec<String>>,

    /// Working directory for build and runs.
    #[serde(default)]
    pub workdir: Option<PathBuf>,

    /// Extra environment variables.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl CandidateConfig {
    /// Creates a candidate that uses its language preset.
    pub fn new(id: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            language: language.into(),
            command: None,
            build: None,
            workdir: None,
            env: BTreeMap::new(),
        }
    }

    /// Sets an explicit command line.
    pub fn with_command<I, S>(mut self, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = Some(argv.into_iter().map(Into::into).collect());
        self
    }

    /// Sets an explicit build command.
    pub fn with_build<I, S>(mut self, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build = Some(argv.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the working directory.
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    /// Returns the run command, falling back to the language preset.
    pub fn resolved_command(&self) -> Result<Vec<String>, ConfigError> {
        match &self.command {
            Some(argv) if argv.is_empty() => Err(ConfigError::Invalid(format!(
                "candidate '{}' has an empty command",
                self.id
            ))),
            Some(argv) => Ok(argv.clone()),
            None => LanguagePreset::for_language(&self.language)
                .map(|preset| owned(preset.run))
                .ok_or_else(|| {
                    ConfigError::Invalid(format!(
                        "candidate '{}': no command given and no preset for language '{}'",
                        self.id, self.language
                    ))
                }),
        }
    }

    /// Returns the build command, falling back to the language preset.
    ///
    /// An explicit command without an explicit build never inherits the
    /// preset build.
    pub fn resolved_build(&self) -> Option<Vec<String>> {
        match (&self.build, &self.command) {
            (Some(argv), _) if argv.is_empty() => None,
            (Some(argv), _) => Some(argv.clone()),
            (None, Some(_)) => None,
            (None, None) => LanguagePreset::for_language(&self.language)
                .and_then(|preset| preset.build)
                .map(owned),
        }
    }
}

fn owned(argv: &[&str]) -> Vec<String> {
    argv.iter().map(|s| s.to_string()).collect()
}

/// Build and run commands for a supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguagePreset {
    pub language: &'static str,
    pub build: Option<&'static [&'static str]>,
    pub run: &'static [&'static str],
}

const PRESETS: &[LanguagePreset] = &[
    LanguagePreset {
        language: "python",
        build: None,
        run: &["python3", "solution.py"],
    },
    LanguagePreset {
        language: "java",
        build: Some(&["javac", "Solution.java"]),
        run: &["java", "-Xmx8g", "-cp", ".", "Solution"],
    },
    LanguagePreset {
        language: "cpp",
        build: Some(&["g++", "-std=c++20", "-O2", "-o", "solution", "solution.cpp"]),
        run: &["./solution"],
    },
    LanguagePreset {
        language: "go",
        build: Some(&["go", "build", "-o", "solution", "."]),
        run: &["./solution"],
    },
    LanguagePreset {
        language: "rust",
        build: Some(&["cargo", "build", "--release"]),
        run: &["./target/release/solution"],
    },
];

impl LanguagePreset {
    /// Looks up a preset by language name (case-insensitive).
    ///
    /// `c++` is accepted for `cpp`.
    pub fn for_language(language: &str) -> Option<&'static LanguagePreset> {
        let language = language.to_ascii_lowercase();
        let language = if language == "c++" { "cpp" } else { &language };
        PRESETS.iter().find(|p| p.language == language)
    }

    /// All known presets.
    pub fn all() -> &'static [LanguagePreset] {
        PRESETS
    }
}
