//! Candidate program descriptions.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use rowbench_config::CandidateConfig;
use rowbench_core::{Result, RowbenchError};

/// Placeholder replaced by the dataset path in candidate arguments.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// How to build and run one candidate.
///
/// # Example
///
/// ```
/// use rowbench_benchmark::CandidateSpec;
/// use std::path::Path;
///
/// let spec = CandidateSpec::from_command_line("cpp-fast", "cpp", "./solution --file {input}").unwrap();
/// let args = spec.resolved_args(Path::new("data/m.txt"));
/// assert_eq!(args, vec!["--file", "data/m.txt"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSpec {
    pub id: String,
    pub language: String,
    pub program: String,
    pub args: Vec<String>,
    pub workdir: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
    /// Build command run once before the timed runs.
    pub build: Option<Vec<String>>,
}

impl CandidateSpec {
    /// Creates a candidate from an argv vector.
    pub fn new(
        id: impl Into<String>,
        language: impl Into<String>,
        argv: Vec<String>,
    ) -> Result<Self> {
        let id = id.into();
        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| RowbenchError::InvalidConfig(format!("candidate '{}' has no program", id)))?;
        Ok(Self {
            id,
            language: language.into(),
            program,
            args: argv.collect(),
            workdir: None,
            env: BTreeMap::new(),
            build: None,
        })
    }

    /// Creates a candidate from a whitespace-separated command line.
    pub fn from_command_line(
        id: impl Into<String>,
        language: impl Into<String>,
        command_line: &str,
    ) -> Result<Self> {
        Self::new(
            id,
            language,
            command_line.split_whitespace().map(str::to_string).collect(),
        )
    }

    /// Creates a candidate from a tournament config entry, applying presets.
    pub fn from_config(config: &CandidateConfig) -> Result<Self> {
        let argv = config
            .resolved_command()
            .map_err(|e| RowbenchError::InvalidConfig(e.to_string()))?;
        let mut spec = Self::new(config.id.clone(), config.language.clone(), argv)?;
        spec.workdir = config.workdir.clone();
        spec.env = config.env.clone();
        spec.build = config.resolved_build();
        Ok(spec)
    }

    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    pub fn with_build(mut self, argv: Vec<String>) -> Self {
        self.build = Some(argv);
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Program path as it should be spawned.
    ///
    /// A relative path with a directory component is joined onto `workdir`,
    /// so `./solution` means the file inside the candidate's directory. Bare
    /// names are left for `PATH` lookup.
    pub fn resolved_program(&self) -> PathBuf {
        resolve_program(&self.program, self.workdir.as_deref())
    }

    /// Arguments with every `{input}` replaced by the dataset path.
    pub fn resolved_args(&self, input: &Path) -> Vec<OsString> {
        substitute(&self.args, input)
    }
}

pub(crate) fn resolve_program(program: &str, workdir: Option<&Path>) -> PathBuf {
    let path = Path::new(program);
    match workdir {
        Some(dir) if path.is_relative() && path.components().count() > 1 => dir.join(path),
        _ => path.to_path_buf(),
    }
}

pub(crate) fn substitute(args: &[String], input: &Path) -> Vec<OsString> {
    args.iter()
        .map(|arg| {
            if arg == INPUT_PLACEHOLDER {
                input.as_os_str().to_os_string()
            } else if arg.contains(INPUT_PLACEHOLDER) {
                OsString::from(arg.replace(INPUT_PLACEHOLDER, &input.to_string_lossy()))
            } else {
                OsString::from(arg)
            }
        })
        .collect()
}
